//! Roster domain models.

use crate::error::{FightlogError, FightlogResult};
use fightlog_db::queries::participations::ParticipationRow;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two sides of a fight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Side {
    One,
    Two,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::One, Side::Two];

    pub fn as_i64(&self) -> i64 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }

    pub fn from_i64(n: i64) -> Option<Self> {
        match n {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            _ => None,
        }
    }
}

impl TryFrom<u8> for Side {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Self::from_i64(i64::from(n)).ok_or_else(|| format!("side must be 1 or 2, got {}", n))
    }
}

impl From<Side> for u8 {
    fn from(side: Side) -> u8 {
        side.as_i64() as u8
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i64())
    }
}

/// What a fighter does in a fight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Combatant,
    Captain,
    Alternate,
    Support,
}

impl Role {
    /// Parse from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "combatant" => Some(Self::Combatant),
            "captain" => Some(Self::Captain),
            "alternate" => Some(Self::Alternate),
            "support" => Some(Self::Support),
            _ => None,
        }
    }

    /// Convert to string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Combatant => "combatant",
            Self::Captain => "captain",
            Self::Alternate => "alternate",
            Self::Support => "support",
        }
    }

    /// Captains fight; alternates and support staff do not.
    pub fn counts_as_combatant(&self) -> bool {
        matches!(self, Self::Combatant | Self::Captain)
    }
}

/// A proposed roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub fighter_id: String,
    pub side: Side,
    pub role: Role,
}

impl RosterEntry {
    pub fn new(fighter_id: impl Into<String>, side: Side, role: Role) -> Self {
        Self {
            fighter_id: fighter_id.into(),
            side,
            role,
        }
    }
}

/// A stored roster entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participation {
    pub id: String,
    pub fight_id: String,
    pub fighter_id: String,
    pub fighter_name: String,
    pub side: Side,
    pub role: Role,
}

impl Participation {
    /// Create a Participation from a database row.
    pub fn from_row(row: ParticipationRow) -> FightlogResult<Self> {
        let side = Side::from_i64(row.side).ok_or_else(|| {
            FightlogError::CorruptRecord(format!("participation {} has side {}", row.id, row.side))
        })?;
        let role = Role::parse(&row.role).ok_or_else(|| {
            FightlogError::CorruptRecord(format!("participation {} has role '{}'", row.id, row.role))
        })?;
        Ok(Self {
            id: row.id,
            fight_id: row.fight_id,
            fighter_id: row.fighter_id,
            fighter_name: row.fighter_name,
            side,
            role,
        })
    }
}
