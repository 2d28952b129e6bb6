//! Fighter reference-data queries.

use crate::pool::{DbError, DbResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Fighter row from database.
#[derive(Debug, Clone)]
pub struct FighterRow {
    pub id: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: String,
}

fn map_fighter(row: &rusqlite::Row<'_>) -> rusqlite::Result<FighterRow> {
    Ok(FighterRow {
        id: row.get(0)?,
        name: row.get(1)?,
        is_active: row.get(2)?,
        created_at: row.get(3)?,
    })
}

/// Register a fighter.
pub fn create_fighter(conn: &Connection, id: &str, name: &str) -> DbResult<()> {
    conn.execute(
        "INSERT INTO fighters (id, name) VALUES (?1, ?2)",
        params![id, name],
    )?;
    Ok(())
}

/// Get a fighter by ID.
pub fn get_fighter(conn: &Connection, id: &str) -> DbResult<FighterRow> {
    conn.query_row(
        "SELECT id, name, is_active, created_at FROM fighters WHERE id = ?1",
        params![id],
        map_fighter,
    )
    .optional()?
    .ok_or_else(|| DbError::NotFound(format!("Fighter: {}", id)))
}

/// List all fighters by name.
pub fn list_fighters(conn: &Connection) -> DbResult<Vec<FighterRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, is_active, created_at FROM fighters ORDER BY name, id",
    )?;
    let rows = stmt.query_map([], map_fighter)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
}

/// Whether the fighter exists and is active.
pub fn is_active_fighter(conn: &Connection, id: &str) -> DbResult<bool> {
    let active: Option<bool> = conn
        .query_row(
            "SELECT is_active FROM fighters WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(active.unwrap_or(false))
}

/// Activate or retire a fighter.
pub fn set_fighter_active(conn: &Connection, id: &str, active: bool) -> DbResult<()> {
    let changed = conn.execute(
        "UPDATE fighters SET is_active = ?1 WHERE id = ?2",
        params![active, id],
    )?;
    if changed == 0 {
        return Err(DbError::NotFound(format!("Fighter: {}", id)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::test_support;

    #[test]
    fn test_fighter_activity() {
        let pool = test_support::pool();
        pool.with_conn(|conn| {
            create_fighter(conn, "f-9", "Zulu")?;
            assert!(is_active_fighter(conn, "f-9")?);

            set_fighter_active(conn, "f-9", false)?;
            assert!(!is_active_fighter(conn, "f-9")?);
            assert!(!get_fighter(conn, "f-9")?.is_active);

            assert!(!is_active_fighter(conn, "missing")?);
            assert!(matches!(
                set_fighter_active(conn, "missing", true),
                Err(DbError::NotFound(_))
            ));
            Ok(())
        })
        .unwrap();
    }
}
