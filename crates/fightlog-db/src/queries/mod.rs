//! Database query implementations.
//!
//! Every function takes a plain `&Connection` so callers can run it either
//! directly through `DbPool::with_conn` or inside a unit of work.

pub mod fighters;
pub mod fights;
pub mod participations;
pub mod tag_types;
pub mod tags;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::migrations::run_migrations;
    use crate::pool::DbPool;
    use rusqlite::params;

    /// Migrated in-memory pool.
    pub fn pool() -> DbPool {
        let pool = DbPool::in_memory().unwrap();
        run_migrations(&pool).unwrap();
        pool
    }

    /// Insert a fighter and a fight with no tags.
    pub fn seed_fight(pool: &DbPool, fight_id: &str) {
        pool.with_conn(|conn| {
            conn.execute(
                "INSERT OR IGNORE INTO fighters (id, name) VALUES ('f-1', 'Alpha'), ('f-2', 'Bravo')",
                [],
            )?;
            conn.execute(
                "INSERT INTO fights (id, fight_date, location) VALUES (?1, '2019-05-04', 'Smederevo')",
                params![fight_id],
            )?;
            Ok(())
        })
        .unwrap();
    }
}
