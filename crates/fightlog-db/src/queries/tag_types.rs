//! Tag type (reference data) queries. Read-only.

use crate::pool::{DbError, DbResult};
use rusqlite::Connection;

/// Tag type row from database.
#[derive(Debug, Clone)]
pub struct TagTypeRow {
    pub id: i64,
    pub name: String,
    pub parent_tag_type_id: Option<i64>,
    pub is_freeform: bool,
}

/// List all seeded tag types.
pub fn list_tag_types(conn: &Connection) -> DbResult<Vec<TagTypeRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, parent_tag_type_id, is_freeform FROM tag_types ORDER BY id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(TagTypeRow {
            id: row.get(0)?,
            name: row.get(1)?,
            parent_tag_type_id: row.get(2)?,
            is_freeform: row.get(3)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::test_support;

    #[test]
    fn test_seeded_hierarchy() {
        let pool = test_support::pool();
        let types = pool.with_conn(list_tag_types).unwrap();
        let names: Vec<&str> = types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["supercategory", "category", "gender", "custom"]);
        assert_eq!(types[1].parent_tag_type_id, Some(types[0].id));
        assert!(types[3].is_freeform);
        assert!(!types[0].is_freeform);
    }
}
