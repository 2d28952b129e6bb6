//! CLI command definitions and handlers.

use anyhow::Result;
use clap::{Parser, Subcommand};
use fightlog_core::catalog::load_tag_catalog;
use fightlog_core::fighter::DbFighterDirectory;
use fightlog_core::FightService;
use fightlog_db::DbPool;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub mod fight;
pub mod fighter;
pub mod init;
pub mod tag;

/// Fightlog - catalog of historical fights, rosters and tags
#[derive(Parser)]
#[command(name = "fightlog")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// SQLite database file
    #[arg(long, global = true, env = "FIGHTLOG_DB", default_value = "fightlog.db")]
    pub db: PathBuf,

    /// Also write logs to this file
    #[arg(long, global = true, env = "FIGHTLOG_LOG")]
    pub log_file: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create or upgrade the database
    Init,

    /// Manage the fighter directory
    #[command(subcommand)]
    Fighter(fighter::FighterCommands),

    /// Record and inspect fights
    #[command(subcommand)]
    Fight(fight::FightCommands),

    /// Manage the tags on a fight
    #[command(subcommand)]
    Tag(tag::TagCommands),
}

impl Cli {
    pub fn execute(self) -> Result<()> {
        let json = self.json;
        match self.command {
            Commands::Init => init::execute(&self.db),
            Commands::Fighter(cmd) => fighter::execute(cmd, &open_pool(&self.db)?, json),
            Commands::Fight(cmd) => fight::execute(cmd, &service(&self.db)?, json),
            Commands::Tag(cmd) => tag::execute(cmd, &service(&self.db)?, json),
        }
    }
}

/// Open an existing database. `init` is the only command that creates one.
fn open_pool(db: &Path) -> Result<DbPool> {
    if !db.exists() {
        anyhow::bail!(
            "No database at {}. Run 'fightlog init' first.",
            db.display()
        );
    }
    Ok(fightlog_db::init_pool(db)?)
}

/// Wire the service to the database, its tag catalog and fighter directory.
fn service(db: &Path) -> Result<FightService> {
    let pool = open_pool(db)?;
    let catalog = load_tag_catalog(&pool)?;
    Ok(FightService::new(
        pool.clone(),
        Arc::new(catalog),
        Arc::new(DbFighterDirectory::new(pool)),
    ))
}
