//! Fighter directory.
//!
//! The fight service only asks one question of fighters: does this ID
//! resolve to an active fighter. Registration helpers exist so the
//! directory has records to resolve.

use crate::error::{FightlogError, FightlogResult};
use fightlog_db::queries::fighters as queries;
use fightlog_db::{DbError, DbPool};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Answers whether a fighter may be put on a roster.
pub trait FighterDirectory: Send + Sync {
    fn exists_and_active(&self, fighter_id: &str) -> FightlogResult<bool>;
}

/// A fixed set of active fighter IDs.
impl FighterDirectory for HashSet<String> {
    fn exists_and_active(&self, fighter_id: &str) -> FightlogResult<bool> {
        Ok(self.contains(fighter_id))
    }
}

/// Directory backed by the `fighters` table.
#[derive(Debug, Clone)]
pub struct DbFighterDirectory {
    pool: DbPool,
}

impl DbFighterDirectory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl FighterDirectory for DbFighterDirectory {
    fn exists_and_active(&self, fighter_id: &str) -> FightlogResult<bool> {
        Ok(self
            .pool
            .with_conn(|conn| queries::is_active_fighter(conn, fighter_id))?)
    }
}

/// A registered fighter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fighter {
    pub id: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: String,
}

impl Fighter {
    /// Create from database row.
    pub fn from_row(row: queries::FighterRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

/// Register a new active fighter.
pub fn register_fighter(pool: &DbPool, name: &str) -> FightlogResult<Fighter> {
    let name = name.trim();
    if name.is_empty() {
        return Err(FightlogError::validation("Fighter name cannot be empty"));
    }
    let id = Uuid::new_v4().to_string();
    let row = pool.with_conn(|conn| {
        queries::create_fighter(conn, &id, name)?;
        queries::get_fighter(conn, &id)
    })?;
    Ok(Fighter::from_row(row))
}

/// List all fighters.
pub fn list_fighters(pool: &DbPool) -> FightlogResult<Vec<Fighter>> {
    let rows = pool.with_conn(queries::list_fighters)?;
    Ok(rows.into_iter().map(Fighter::from_row).collect())
}

/// Retire or reinstate a fighter.
pub fn set_fighter_active(pool: &DbPool, id: &str, active: bool) -> FightlogResult<()> {
    pool.with_conn(|conn| queries::set_fighter_active(conn, id, active))
        .map_err(|e| match e {
            DbError::NotFound(_) => FightlogError::FighterNotFound(id.to_string()),
            e => e.into(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_directory_tracks_activity() {
        let pool = fightlog_db::init_memory_pool().unwrap();
        let fighter = register_fighter(&pool, "  Ivan  ").unwrap();
        assert_eq!(fighter.name, "Ivan");

        let directory = DbFighterDirectory::new(pool.clone());
        assert!(directory.exists_and_active(&fighter.id).unwrap());
        assert!(!directory.exists_and_active("nobody").unwrap());

        set_fighter_active(&pool, &fighter.id, false).unwrap();
        assert!(!directory.exists_and_active(&fighter.id).unwrap());
        assert_eq!(list_fighters(&pool).unwrap().len(), 1);
    }

    #[test]
    fn test_blank_name_rejected() {
        let pool = fightlog_db::init_memory_pool().unwrap();
        assert!(matches!(
            register_fighter(&pool, "   "),
            Err(FightlogError::ValidationError(_))
        ));
    }
}
