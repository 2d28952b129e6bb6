//! Participation (fight roster) queries.

use crate::pool::{DbError, DbResult};
use rusqlite::{params, Connection};

/// Participation row, joined with the fighter's name.
#[derive(Debug, Clone)]
pub struct ParticipationRow {
    pub id: String,
    pub fight_id: String,
    pub fighter_id: String,
    pub fighter_name: String,
    pub side: i64,
    pub role: String,
}

/// Insert one roster entry.
pub fn insert_participation(
    conn: &Connection,
    id: &str,
    fight_id: &str,
    fighter_id: &str,
    side: i64,
    role: &str,
) -> DbResult<()> {
    conn.execute(
        "INSERT INTO participations (id, fight_id, fighter_id, side, role)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![id, fight_id, fighter_id, side, role],
    )?;
    Ok(())
}

/// List a fight's roster ordered by side.
pub fn list_participations(conn: &Connection, fight_id: &str) -> DbResult<Vec<ParticipationRow>> {
    let mut stmt = conn.prepare(
        "SELECT p.id, p.fight_id, p.fighter_id, f.name, p.side, p.role
         FROM participations p
         JOIN fighters f ON f.id = p.fighter_id
         WHERE p.fight_id = ?1
         ORDER BY p.side,
            CASE p.role
                WHEN 'captain' THEN 1
                WHEN 'combatant' THEN 2
                WHEN 'alternate' THEN 3
                WHEN 'support' THEN 4
            END,
            f.name",
    )?;

    let rows = stmt.query_map(params![fight_id], |row| {
        Ok(ParticipationRow {
            id: row.get(0)?,
            fight_id: row.get(1)?,
            fighter_id: row.get(2)?,
            fighter_name: row.get(3)?,
            side: row.get(4)?,
            role: row.get(5)?,
        })
    })?;

    rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::test_support;

    #[test]
    fn test_one_entry_per_fighter() {
        let pool = test_support::pool();
        test_support::seed_fight(&pool, "fight");
        pool.with_conn(|conn| {
            insert_participation(conn, "p1", "fight", "f-1", 1, "combatant")?;
            let dup = insert_participation(conn, "p2", "fight", "f-1", 2, "combatant");
            assert!(matches!(dup, Err(DbError::Conflict(_))));
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_one_captain_per_side() {
        let pool = test_support::pool();
        test_support::seed_fight(&pool, "fight");
        pool.with_conn(|conn| {
            insert_participation(conn, "p1", "fight", "f-1", 1, "captain")?;
            let second = insert_participation(conn, "p2", "fight", "f-2", 1, "captain");
            assert!(matches!(second, Err(DbError::Conflict(_))));

            insert_participation(conn, "p3", "fight", "f-2", 2, "captain")?;
            let roster = list_participations(conn, "fight")?;
            assert_eq!(roster.len(), 2);
            assert_eq!(roster[0].fighter_name, "Alpha");
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_unknown_fighter_rejected_by_foreign_key() {
        let pool = test_support::pool();
        test_support::seed_fight(&pool, "fight");
        let result = pool.with_conn(|conn| {
            insert_participation(conn, "p1", "fight", "ghost", 1, "combatant")
        });
        assert!(matches!(result, Err(DbError::Connection(_))));
    }
}
