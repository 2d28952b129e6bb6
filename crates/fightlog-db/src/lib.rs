//! Fightlog Database Layer
//!
//! SQLite persistence for fights, rosters and tags. Schema constraints
//! mirror the service-level rules so a racing writer is still caught.

pub mod migrations;
pub mod pool;
pub mod queries;

pub use pool::{DbError, DbPool, DbResult, UnitOfWork};
pub use rusqlite::Connection;

/// Open a database file and bring its schema up to date.
pub fn init_pool(path: &std::path::Path) -> DbResult<DbPool> {
    let pool = DbPool::open(path)?;
    migrations::run_migrations(&pool)?;
    tracing::debug!(path = %path.display(), "Database ready");
    Ok(pool)
}

/// Open a migrated in-memory database.
pub fn init_memory_pool() -> DbResult<DbPool> {
    let pool = DbPool::in_memory()?;
    migrations::run_migrations(&pool)?;
    Ok(pool)
}
