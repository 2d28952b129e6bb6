//! Participant validation.
//!
//! Runs before anything is written. Rules are checked in a fixed order and
//! the first violation wins:
//!
//! 1. at least two entries
//! 2. every fighter resolves to an active fighter
//! 3. no fighter appears twice
//! 4. both sides have someone on them
//! 5. at most one captain per side
//! 6. format size: exactly one fighting entry per side for one-on-one,
//!    at least five for group fights (alternates and support never count)

pub mod model;

use crate::error::{FightlogError, FightlogResult};
use crate::fighter::FighterDirectory;
use crate::tags::values::RootFormat;
use model::{RosterEntry, Side};
use std::collections::HashSet;
use std::fmt;

pub const MIN_ROSTER_SIZE: usize = 2;
pub const MIN_GROUP_SIDE_SIZE: usize = 5;

/// Which roster rule was broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterViolationKind {
    TooFewParticipants,
    UnknownFighter,
    DuplicateFighter,
    EmptySide,
    MultipleCaptains,
    SideSize,
}

impl RosterViolationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TooFewParticipants => "too_few_participants",
            Self::UnknownFighter => "unknown_fighter",
            Self::DuplicateFighter => "duplicate_fighter",
            Self::EmptySide => "empty_side",
            Self::MultipleCaptains => "multiple_captains",
            Self::SideSize => "side_size",
        }
    }
}

impl fmt::Display for RosterViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate a proposed roster for a fight with the given root value.
///
/// Only reads from the fighter directory. Directory failures propagate
/// as-is; rule violations come back as `FightlogError::RosterViolation`.
pub fn validate_roster(
    roster: &[RosterEntry],
    root_value: &str,
    fighters: &dyn FighterDirectory,
) -> FightlogResult<()> {
    if roster.len() < MIN_ROSTER_SIZE {
        return Err(FightlogError::roster(
            RosterViolationKind::TooFewParticipants,
            format!(
                "A fight needs at least {} participants, got {}",
                MIN_ROSTER_SIZE,
                roster.len()
            ),
        ));
    }

    for entry in roster {
        if !fighters.exists_and_active(&entry.fighter_id)? {
            return Err(FightlogError::roster(
                RosterViolationKind::UnknownFighter,
                format!("Fighter {} does not exist or is inactive", entry.fighter_id),
            ));
        }
    }

    let mut seen = HashSet::new();
    for entry in roster {
        if !seen.insert(entry.fighter_id.as_str()) {
            return Err(FightlogError::roster(
                RosterViolationKind::DuplicateFighter,
                format!("Fighter {} appears more than once", entry.fighter_id),
            ));
        }
    }

    if Side::BOTH
        .iter()
        .any(|side| !roster.iter().any(|e| e.side == *side))
    {
        return Err(FightlogError::roster(
            RosterViolationKind::EmptySide,
            "Both sides must have participants",
        ));
    }

    for side in Side::BOTH {
        let captains = roster
            .iter()
            .filter(|e| e.side == side && e.role == model::Role::Captain)
            .count();
        if captains > 1 {
            return Err(FightlogError::roster(
                RosterViolationKind::MultipleCaptains,
                format!("Side {} has {} captains; at most one is allowed", side, captains),
            ));
        }
    }

    let format = RootFormat::from_root_value(root_value).ok_or_else(|| {
        FightlogError::validation(format!("'{}' does not name a fight format", root_value))
    })?;

    for side in Side::BOTH {
        let fighting = roster
            .iter()
            .filter(|e| e.side == side && e.role.counts_as_combatant())
            .count();
        match format {
            RootFormat::OneOnOne if fighting != 1 => {
                return Err(FightlogError::roster(
                    RosterViolationKind::SideSize,
                    format!(
                        "A '{}' fight needs exactly one fighter per side; side {} has {}",
                        root_value, side, fighting
                    ),
                ));
            }
            RootFormat::Group if fighting < MIN_GROUP_SIDE_SIZE => {
                return Err(FightlogError::roster(
                    RosterViolationKind::SideSize,
                    format!(
                        "A '{}' fight needs at least {} fighters per side; side {} has {}",
                        root_value, MIN_GROUP_SIDE_SIZE, side, fighting
                    ),
                ));
            }
            _ => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::Role;

    fn directory(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn kind_of(result: FightlogResult<()>) -> RosterViolationKind {
        match result {
            Err(FightlogError::RosterViolation { kind, .. }) => kind,
            other => panic!("expected roster violation, got {:?}", other),
        }
    }

    fn group_side(prefix: &str, side: Side, fighters: usize) -> Vec<RosterEntry> {
        (0..fighters)
            .map(|i| RosterEntry::new(format!("{prefix}{i}"), side, Role::Combatant))
            .collect()
    }

    fn group_directory() -> HashSet<String> {
        (0..8)
            .flat_map(|i| [format!("a{i}"), format!("b{i}")])
            .collect()
    }

    #[test]
    fn test_valid_duel() {
        let dir = directory(&["x", "y"]);
        let roster = vec![
            RosterEntry::new("x", Side::One, Role::Combatant),
            RosterEntry::new("y", Side::Two, Role::Captain),
        ];
        assert!(validate_roster(&roster, "duel", &dir).is_ok());
    }

    #[test]
    fn test_too_few() {
        let dir = directory(&["x"]);
        let roster = vec![RosterEntry::new("x", Side::One, Role::Combatant)];
        assert_eq!(
            kind_of(validate_roster(&roster, "duel", &dir)),
            RosterViolationKind::TooFewParticipants
        );
    }

    #[test]
    fn test_first_unknown_fighter_reported() {
        let dir = directory(&["x"]);
        let roster = vec![
            RosterEntry::new("x", Side::One, Role::Combatant),
            RosterEntry::new("ghost-1", Side::Two, Role::Combatant),
            RosterEntry::new("ghost-2", Side::Two, Role::Combatant),
        ];
        match validate_roster(&roster, "duel", &dir) {
            Err(FightlogError::RosterViolation { kind, message }) => {
                assert_eq!(kind, RosterViolationKind::UnknownFighter);
                assert!(message.contains("ghost-1"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_fighter() {
        let dir = directory(&["x", "y"]);
        let roster = vec![
            RosterEntry::new("x", Side::One, Role::Combatant),
            RosterEntry::new("y", Side::Two, Role::Combatant),
            RosterEntry::new("x", Side::Two, Role::Support),
        ];
        assert_eq!(
            kind_of(validate_roster(&roster, "duel", &dir)),
            RosterViolationKind::DuplicateFighter
        );
    }

    #[test]
    fn test_all_on_one_side() {
        let dir = directory(&["a", "b", "c", "d"]);
        let roster: Vec<_> = ["a", "b", "c", "d"]
            .iter()
            .map(|id| RosterEntry::new(*id, Side::One, Role::Combatant))
            .collect();
        let err = validate_roster(&roster, "duel", &dir).unwrap_err();
        assert!(err.to_string().contains("Both sides must have participants"));
    }

    #[test]
    fn test_two_captains_same_side() {
        let dir = group_directory();
        let mut roster = group_side("a", Side::One, 5);
        roster.extend(group_side("b", Side::Two, 5));
        roster[0].role = Role::Captain;
        roster[1].role = Role::Captain;
        assert_eq!(
            kind_of(validate_roster(&roster, "group", &dir)),
            RosterViolationKind::MultipleCaptains
        );

        // One captain on each side is fine.
        roster[1].role = Role::Combatant;
        roster[5].role = Role::Captain;
        assert!(validate_roster(&roster, "group", &dir).is_ok());
    }

    #[test]
    fn test_duel_needs_exactly_one_fighter_per_side() {
        let dir = directory(&["x", "y", "z"]);
        let roster = vec![
            RosterEntry::new("x", Side::One, Role::Combatant),
            RosterEntry::new("y", Side::One, Role::Combatant),
            RosterEntry::new("z", Side::Two, Role::Combatant),
        ];
        assert_eq!(
            kind_of(validate_roster(&roster, "duel", &dir)),
            RosterViolationKind::SideSize
        );

        // A second person as support does not count.
        let roster = vec![
            RosterEntry::new("x", Side::One, Role::Combatant),
            RosterEntry::new("y", Side::One, Role::Support),
            RosterEntry::new("z", Side::Two, Role::Combatant),
        ];
        assert!(validate_roster(&roster, "duel", &dir).is_ok());
    }

    #[test]
    fn test_group_minimum_ignores_alternates() {
        let dir = group_directory();
        let mut roster = group_side("a", Side::One, 5);
        roster.extend(group_side("b", Side::Two, 6));
        assert!(validate_roster(&roster, "group", &dir).is_ok());

        roster[4].role = Role::Alternate;
        assert_eq!(
            kind_of(validate_roster(&roster, "group", &dir)),
            RosterViolationKind::SideSize
        );
    }

    #[test]
    fn test_unknown_format() {
        let dir = directory(&["x", "y"]);
        let roster = vec![
            RosterEntry::new("x", Side::One, Role::Combatant),
            RosterEntry::new("y", Side::Two, Role::Combatant),
        ];
        assert!(matches!(
            validate_roster(&roster, "melee", &dir),
            Err(FightlogError::ValidationError(_))
        ));
    }

    #[test]
    fn test_side_serializes_as_number() {
        let entry = RosterEntry::new("x", Side::Two, Role::Captain);
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"fighter_id":"x","side":2,"role":"captain"}"#);
        assert!(serde_json::from_str::<Side>("3").is_err());
    }
}
