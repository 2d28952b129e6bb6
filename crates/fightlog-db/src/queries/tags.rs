//! Tag queries.
//!
//! Tags always belong to one fight. Lookups by tag ID are scoped to a fight
//! so a tag from another fight reads as missing.

use crate::pool::{DbError, DbResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Tag row from database, joined with its tag type name.
#[derive(Debug, Clone)]
pub struct TagRow {
    pub id: String,
    pub fight_id: String,
    pub tag_type_id: i64,
    pub tag_type: String,
    pub value: String,
    pub parent_tag_id: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

const TAG_SELECT: &str = "SELECT t.id, t.fight_id, t.tag_type_id, tt.name, t.value, t.parent_tag_id,
            t.is_active, t.created_at, t.updated_at
     FROM tags t
     JOIN tag_types tt ON tt.id = t.tag_type_id";

fn map_tag(row: &rusqlite::Row<'_>) -> rusqlite::Result<TagRow> {
    Ok(TagRow {
        id: row.get(0)?,
        fight_id: row.get(1)?,
        tag_type_id: row.get(2)?,
        tag_type: row.get(3)?,
        value: row.get(4)?,
        parent_tag_id: row.get(5)?,
        is_active: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

/// Insert an active tag.
pub fn insert_tag(
    conn: &Connection,
    id: &str,
    fight_id: &str,
    tag_type_id: i64,
    value: &str,
    parent_tag_id: Option<&str>,
) -> DbResult<()> {
    conn.execute(
        "INSERT INTO tags (id, fight_id, tag_type_id, value, parent_tag_id)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![id, fight_id, tag_type_id, value, parent_tag_id],
    )?;
    Ok(())
}

/// Get a tag that belongs to the given fight.
pub fn get_tag_in_fight(conn: &Connection, fight_id: &str, tag_id: &str) -> DbResult<TagRow> {
    let sql = format!("{} WHERE t.id = ?1 AND t.fight_id = ?2", TAG_SELECT);
    conn.query_row(&sql, params![tag_id, fight_id], map_tag)
        .optional()?
        .ok_or_else(|| DbError::NotFound(format!("Tag: {}", tag_id)))
}

/// List every tag on a fight, active or not, in creation order.
pub fn list_tags(conn: &Connection, fight_id: &str) -> DbResult<Vec<TagRow>> {
    let sql = format!("{} WHERE t.fight_id = ?1 ORDER BY t.created_at, t.rowid", TAG_SELECT);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![fight_id], map_tag)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
}

/// List the active tags on a fight.
pub fn list_active_tags(conn: &Connection, fight_id: &str) -> DbResult<Vec<TagRow>> {
    let sql = format!(
        "{} WHERE t.fight_id = ?1 AND t.is_active = 1 ORDER BY t.created_at, t.rowid",
        TAG_SELECT
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![fight_id], map_tag)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
}

/// Change a tag's value.
pub fn update_tag_value(conn: &Connection, id: &str, value: &str) -> DbResult<()> {
    let changed = conn.execute(
        "UPDATE tags SET value = ?1, updated_at = datetime('now') WHERE id = ?2",
        params![value, id],
    )?;
    if changed == 0 {
        return Err(DbError::NotFound(format!("Tag: {}", id)));
    }
    Ok(())
}

/// Deactivate the given tags. Already inactive tags are left alone.
/// Returns the number of tags that changed state.
pub fn deactivate_tags(conn: &Connection, ids: &[String]) -> DbResult<usize> {
    let mut stmt = conn.prepare(
        "UPDATE tags SET is_active = 0, updated_at = datetime('now')
         WHERE id = ?1 AND is_active = 1",
    )?;
    let mut changed = 0;
    for id in ids {
        changed += stmt.execute(params![id])?;
    }
    Ok(changed)
}

/// Hard-delete a tag.
pub fn delete_tag(conn: &Connection, id: &str) -> DbResult<()> {
    let changed = conn.execute("DELETE FROM tags WHERE id = ?1", params![id])?;
    if changed == 0 {
        return Err(DbError::NotFound(format!("Tag: {}", id)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbPool;
    use crate::queries::test_support;

    const SUPERCATEGORY: i64 = 1;
    const CATEGORY: i64 = 2;
    const CUSTOM: i64 = 4;

    #[test]
    fn test_scoped_lookup() {
        let pool = test_support::pool();
        test_support::seed_fight(&pool, "a");
        test_support::seed_fight(&pool, "b");
        pool.with_conn(|conn| {
            insert_tag(conn, "t1", "a", SUPERCATEGORY, "duel", None)?;
            assert_eq!(get_tag_in_fight(conn, "a", "t1")?.tag_type, "supercategory");
            assert!(matches!(get_tag_in_fight(conn, "b", "t1"), Err(DbError::NotFound(_))));
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_single_active_tag_per_type() {
        let pool = test_support::pool();
        test_support::seed_fight(&pool, "a");
        pool.with_conn(|conn| {
            insert_tag(conn, "t1", "a", SUPERCATEGORY, "duel", None)?;
            let second = insert_tag(conn, "t2", "a", SUPERCATEGORY, "group", None);
            assert!(matches!(second, Err(DbError::Conflict(_))));

            // Freeform tags are unlimited.
            insert_tag(conn, "c1", "a", CUSTOM, "rainy", None)?;
            insert_tag(conn, "c2", "a", CUSTOM, "night", None)?;

            // A deactivated tag frees the slot.
            deactivate_tags(conn, &["t1".to_string()])?;
            insert_tag(conn, "t3", "a", SUPERCATEGORY, "group", None)?;
            assert_eq!(list_active_tags(conn, "a")?.len(), 3);
            assert_eq!(list_tags(conn, "a")?.len(), 4);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_delete_orphans_inactive_children() {
        let pool = test_support::pool();
        test_support::seed_fight(&pool, "a");
        pool.with_conn(|conn| {
            insert_tag(conn, "root", "a", SUPERCATEGORY, "duel", None)?;
            insert_tag(conn, "cat", "a", CATEGORY, "profight", Some("root"))?;
            assert_eq!(deactivate_tags(conn, &["cat".to_string(), "cat".to_string()])?, 1);
            assert_eq!(list_active_tags(conn, "a")?.len(), 1);

            delete_tag(conn, "root")?;
            let orphan = get_tag_in_fight(conn, "a", "cat")?;
            assert!(orphan.parent_tag_id.is_none());
            assert!(matches!(delete_tag(conn, "root"), Err(DbError::NotFound(_))));
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_concurrent_writer_hits_unique_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("race.db");
        let first = DbPool::open(&path).unwrap();
        crate::migrations::run_migrations(&first).unwrap();
        test_support::seed_fight(&first, "a");
        let second = DbPool::open(&path).unwrap();

        // Both writers passed a service-level "no gender tag yet" check.
        let winner: DbResult<()> = first.run_in_transaction(|tx| {
            insert_tag(tx, &uuid::Uuid::new_v4().to_string(), "a", 3, "male", None)
        });
        let loser: DbResult<()> = second.run_in_transaction(|tx| {
            insert_tag(tx, &uuid::Uuid::new_v4().to_string(), "a", 3, "female", None)
        });

        assert!(winner.is_ok());
        assert!(matches!(loser, Err(DbError::Conflict(_))));
        let active = first.with_conn(|conn| list_active_tags(conn, "a")).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].value, "male");
    }
}
