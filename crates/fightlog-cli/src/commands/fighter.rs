//! Fighter directory commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use fightlog_core::fighter;
use fightlog_db::DbPool;

use crate::output;

#[derive(Subcommand)]
pub enum FighterCommands {
    /// Register a fighter
    Add(AddFighterArgs),

    /// List registered fighters
    List,

    /// Mark a fighter inactive so they cannot join new rosters
    Retire(FighterIdArgs),

    /// Make a retired fighter active again
    Reinstate(FighterIdArgs),
}

#[derive(Args)]
pub struct AddFighterArgs {
    /// Fighter name
    pub name: String,
}

#[derive(Args)]
pub struct FighterIdArgs {
    /// Fighter ID
    pub fighter_id: String,
}

pub fn execute(cmd: FighterCommands, pool: &DbPool, json: bool) -> Result<()> {
    match cmd {
        FighterCommands::Add(args) => {
            let f = fighter::register_fighter(pool, &args.name)?;
            if json {
                return output::print_json(&f);
            }
            println!(
                "{} Registered fighter: {} ({})",
                "✓".green().bold(),
                f.name.cyan(),
                f.id.dimmed()
            );
        }

        FighterCommands::List => {
            let fighters = fighter::list_fighters(pool)?;
            if json {
                return output::print_json(&fighters);
            }
            output::print_fighters_table(&fighters);
        }

        FighterCommands::Retire(args) => {
            fighter::set_fighter_active(pool, &args.fighter_id, false)?;
            println!("{} Retired fighter {}", "✓".green().bold(), args.fighter_id.dimmed());
        }

        FighterCommands::Reinstate(args) => {
            fighter::set_fighter_active(pool, &args.fighter_id, true)?;
            println!("{} Reinstated fighter {}", "✓".green().bold(), args.fighter_id.dimmed());
        }
    }

    Ok(())
}
