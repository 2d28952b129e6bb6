//! Fight queries.

use crate::pool::{DbError, DbResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Fight row from database.
#[derive(Debug, Clone)]
pub struct FightRow {
    pub id: String,
    pub fight_date: String,
    pub location: String,
    pub video_url: Option<String>,
    pub winner_side: Option<i64>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: String,
}

/// Fight row with listing columns.
#[derive(Debug, Clone)]
pub struct FightSummaryRow {
    pub fight: FightRow,
    pub root_value: Option<String>,
    pub participant_count: i64,
}

/// Column values for a new fight.
#[derive(Debug, Clone)]
pub struct NewFightRow<'a> {
    pub id: &'a str,
    pub fight_date: &'a str,
    pub location: &'a str,
    pub video_url: Option<&'a str>,
    pub winner_side: Option<i64>,
    pub notes: Option<&'a str>,
}

fn map_fight(row: &rusqlite::Row<'_>) -> rusqlite::Result<FightRow> {
    Ok(FightRow {
        id: row.get(0)?,
        fight_date: row.get(1)?,
        location: row.get(2)?,
        video_url: row.get(3)?,
        winner_side: row.get(4)?,
        notes: row.get(5)?,
        is_active: row.get(6)?,
        created_at: row.get(7)?,
    })
}

/// Insert a fight.
pub fn insert_fight(conn: &Connection, fight: &NewFightRow<'_>) -> DbResult<()> {
    conn.execute(
        "INSERT INTO fights (id, fight_date, location, video_url, winner_side, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            fight.id,
            fight.fight_date,
            fight.location,
            fight.video_url,
            fight.winner_side,
            fight.notes
        ],
    )?;
    Ok(())
}

/// Get a fight by ID, active or not.
pub fn get_fight(conn: &Connection, id: &str) -> DbResult<FightRow> {
    conn.query_row(
        "SELECT id, fight_date, location, video_url, winner_side, notes, is_active, created_at
         FROM fights WHERE id = ?1",
        params![id],
        map_fight,
    )
    .optional()?
    .ok_or_else(|| DbError::NotFound(format!("Fight: {}", id)))
}

/// List active fights, newest first, with their active root tag value
/// and roster size.
pub fn list_active_fights(conn: &Connection) -> DbResult<Vec<FightSummaryRow>> {
    let mut stmt = conn.prepare(
        "SELECT f.id, f.fight_date, f.location, f.video_url, f.winner_side, f.notes,
                f.is_active, f.created_at,
                (SELECT t.value FROM tags t
                  JOIN tag_types tt ON tt.id = t.tag_type_id
                  WHERE t.fight_id = f.id AND t.is_active = 1 AND tt.name = 'supercategory'
                  LIMIT 1),
                (SELECT COUNT(*) FROM participations p WHERE p.fight_id = f.id)
         FROM fights f
         WHERE f.is_active = 1
         ORDER BY f.fight_date DESC, f.created_at DESC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(FightSummaryRow {
            fight: map_fight(row)?,
            root_value: row.get(8)?,
            participant_count: row.get(9)?,
        })
    })?;

    rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
}

/// Flip the active flag on a fight.
pub fn set_fight_active(conn: &Connection, id: &str, active: bool) -> DbResult<()> {
    let changed = conn.execute(
        "UPDATE fights SET is_active = ?1 WHERE id = ?2",
        params![active, id],
    )?;
    if changed == 0 {
        return Err(DbError::NotFound(format!("Fight: {}", id)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::test_support;

    #[test]
    fn test_insert_and_list() {
        let pool = test_support::pool();
        pool.with_conn(|conn| {
            insert_fight(
                conn,
                &NewFightRow {
                    id: "a",
                    fight_date: "2018-04-28",
                    location: "Smederevo",
                    video_url: None,
                    winner_side: Some(2),
                    notes: Some("final"),
                },
            )?;
            insert_fight(
                conn,
                &NewFightRow {
                    id: "b",
                    fight_date: "2021-06-12",
                    location: "Kyiv",
                    video_url: Some("https://example.org/v/1"),
                    winner_side: None,
                    notes: None,
                },
            )?;

            let fights = list_active_fights(conn)?;
            assert_eq!(fights.len(), 2);
            assert_eq!(fights[0].fight.id, "b");
            assert_eq!(fights[0].participant_count, 0);
            assert!(fights[0].root_value.is_none());

            set_fight_active(conn, "b", false)?;
            let fights = list_active_fights(conn)?;
            assert_eq!(fights.len(), 1);
            assert_eq!(fights[0].fight.id, "a");

            assert!(!get_fight(conn, "b")?.is_active);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_rejects_bad_winner_side() {
        let pool = test_support::pool();
        let result = pool.with_conn(|conn| {
            insert_fight(
                conn,
                &NewFightRow {
                    id: "a",
                    fight_date: "2018-04-28",
                    location: "Smederevo",
                    video_url: None,
                    winner_side: Some(3),
                    notes: None,
                },
            )
        });
        assert!(matches!(result, Err(DbError::Connection(_))));
    }

    #[test]
    fn test_get_missing_fight() {
        let pool = test_support::pool();
        let result = pool.with_conn(|conn| get_fight(conn, "nope"));
        assert!(matches!(result, Err(DbError::NotFound(_))));
    }
}
