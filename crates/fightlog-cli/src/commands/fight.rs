//! Fight commands.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use colored::Colorize;
use fightlog_core::fight::model::{NewFight, DATE_FORMAT};
use fightlog_core::roster::model::{Role, RosterEntry, Side};
use fightlog_core::FightService;

use crate::output;

#[derive(Subcommand)]
pub enum FightCommands {
    /// Record a fight with its format and roster
    Create(CreateFightArgs),

    /// Show a fight with its tags and roster
    Show(FightIdArgs),

    /// List active fights, newest first
    List,

    /// Hide a fight from listings
    Deactivate(FightIdArgs),
}

#[derive(Args)]
pub struct CreateFightArgs {
    /// Fight date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub date: NaiveDate,

    /// Where the fight took place
    #[arg(long)]
    pub location: String,

    /// Fight format (duel, group)
    #[arg(long)]
    pub format: String,

    /// Side 1 entry as FIGHTER_ID[:ROLE] (combatant, captain, alternate, support)
    #[arg(long = "side1", value_parser = parse_slot, required = true)]
    pub side_one: Vec<RosterSlot>,

    /// Side 2 entry as FIGHTER_ID[:ROLE]
    #[arg(long = "side2", value_parser = parse_slot, required = true)]
    pub side_two: Vec<RosterSlot>,

    /// Winning side (1 or 2)
    #[arg(long, value_parser = parse_side)]
    pub winner: Option<Side>,

    /// Link to a recording
    #[arg(long)]
    pub video: Option<String>,

    /// Free-text notes
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args)]
pub struct FightIdArgs {
    /// Fight ID
    pub fight_id: String,
}

/// One `--side1`/`--side2` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterSlot {
    pub fighter_id: String,
    pub role: Role,
}

fn parse_slot(s: &str) -> Result<RosterSlot, String> {
    let (id, role) = match s.split_once(':') {
        Some((id, role)) => {
            let role = Role::parse(role).ok_or_else(|| format!("unknown role '{}'", role))?;
            (id, role)
        }
        None => (s, Role::Combatant),
    };
    let id = id.trim();
    if id.is_empty() {
        return Err("fighter ID cannot be empty".to_string());
    }
    Ok(RosterSlot {
        fighter_id: id.to_string(),
        role,
    })
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| format!("expected YYYY-MM-DD: {}", e))
}

fn parse_side(s: &str) -> Result<Side, String> {
    s.parse::<i64>()
        .ok()
        .and_then(Side::from_i64)
        .ok_or_else(|| format!("side must be 1 or 2, got '{}'", s))
}

fn roster(args: &CreateFightArgs) -> Vec<RosterEntry> {
    let side = |slots: &[RosterSlot], side: Side| -> Vec<RosterEntry> {
        slots
            .iter()
            .map(|slot| RosterEntry::new(slot.fighter_id.clone(), side, slot.role))
            .collect()
    };
    let mut entries = side(&args.side_one, Side::One);
    entries.extend(side(&args.side_two, Side::Two));
    entries
}

pub fn execute(cmd: FightCommands, service: &FightService, json: bool) -> Result<()> {
    match cmd {
        FightCommands::Create(args) => {
            let entries = roster(&args);
            let data = NewFight {
                date: args.date,
                location: args.location,
                video_url: args.video,
                winner_side: args.winner,
                notes: args.notes,
            };
            let fight = service.create_fight(data, &args.format, &entries)?;
            if json {
                return output::print_json(&fight);
            }
            println!(
                "{} Recorded fight: {} ({})",
                "✓".green().bold(),
                fight.location.cyan(),
                fight.id.dimmed()
            );
            println!();
            output::print_fight(&fight);
        }

        FightCommands::Show(args) => {
            let fight = service.get_fight(&args.fight_id)?;
            if json {
                return output::print_json(&fight);
            }
            output::print_fight(&fight);
        }

        FightCommands::List => {
            let fights = service.list_fights()?;
            if json {
                return output::print_json(&fights);
            }
            output::print_fights_table(&fights);
        }

        FightCommands::Deactivate(args) => {
            service.deactivate_fight(&args.fight_id)?;
            println!("{} Deactivated fight {}", "✓".green().bold(), args.fight_id.dimmed());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_slot() {
        assert_eq!(
            parse_slot("f-1").unwrap(),
            RosterSlot {
                fighter_id: "f-1".to_string(),
                role: Role::Combatant
            }
        );
        assert_eq!(parse_slot("f-2:Captain").unwrap().role, Role::Captain);
        assert!(parse_slot("f-3:referee").is_err());
        assert!(parse_slot(":support").is_err());
    }

    #[test]
    fn test_parse_side() {
        assert_eq!(parse_side("2").unwrap(), Side::Two);
        assert!(parse_side("0").is_err());
        assert!(parse_side("two").is_err());
    }

    #[test]
    fn test_roster_assigns_sides() {
        let args = CreateFightArgs {
            date: parse_date("2019-05-04").unwrap(),
            location: "Smederevo".to_string(),
            format: "duel".to_string(),
            side_one: vec![parse_slot("a").unwrap()],
            side_two: vec![parse_slot("b:captain").unwrap()],
            winner: None,
            video: None,
            notes: None,
        };
        let entries = roster(&args);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].side, Side::One);
        assert_eq!(entries[1].side, Side::Two);
        assert_eq!(entries[1].role, Role::Captain);
    }
}
