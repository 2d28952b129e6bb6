//! Fight domain models.

use crate::error::{FightlogError, FightlogResult};
use crate::roster::model::{Participation, Side};
use crate::tags::model::Tag;
use chrono::NaiveDate;
use fightlog_db::queries::fights::{FightRow, FightSummaryRow};
use serde::{Deserialize, Serialize};

/// Storage format for fight dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A fight with its tags and roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fight {
    pub id: String,
    pub date: NaiveDate,
    pub location: String,
    pub video_url: Option<String>,
    pub winner_side: Option<Side>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub tags: Vec<Tag>,
    pub participants: Vec<Participation>,
}

impl Fight {
    /// Assemble a Fight from its row and already-loaded children.
    pub fn from_row(
        row: FightRow,
        tags: Vec<Tag>,
        participants: Vec<Participation>,
    ) -> FightlogResult<Self> {
        Ok(Self {
            date: parse_date(&row.id, &row.fight_date)?,
            winner_side: parse_winner(&row.id, row.winner_side)?,
            id: row.id,
            location: row.location,
            video_url: row.video_url,
            notes: row.notes,
            is_active: row.is_active,
            created_at: row.created_at,
            tags,
            participants,
        })
    }

    /// The active root classification tag.
    pub fn root_tag(&self) -> Option<&Tag> {
        self.tags.iter().find(|t| t.is_active && t.is_root())
    }

    pub fn active_tags(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter().filter(|t| t.is_active)
    }
}

/// A row in the fight listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FightSummary {
    pub id: String,
    pub date: NaiveDate,
    pub location: String,
    pub winner_side: Option<Side>,
    pub root_value: Option<String>,
    pub participant_count: i64,
}

impl FightSummary {
    /// Create from database row.
    pub fn from_row(row: FightSummaryRow) -> FightlogResult<Self> {
        let fight = row.fight;
        Ok(Self {
            date: parse_date(&fight.id, &fight.fight_date)?,
            winner_side: parse_winner(&fight.id, fight.winner_side)?,
            id: fight.id,
            location: fight.location,
            root_value: row.root_value,
            participant_count: row.participant_count,
        })
    }
}

/// Input for creating a fight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFight {
    pub date: NaiveDate,
    pub location: String,
    pub video_url: Option<String>,
    pub winner_side: Option<Side>,
    pub notes: Option<String>,
}

impl NewFight {
    pub fn new(date: NaiveDate, location: impl Into<String>) -> Self {
        Self {
            date,
            location: location.into(),
            video_url: None,
            winner_side: None,
            notes: None,
        }
    }

    /// Check the scalar fields against `today`.
    ///
    /// The service passes the current UTC date, so a date entered in a
    /// timezone ahead of UTC can read as future until UTC catches up.
    pub fn validate(&self, today: NaiveDate) -> FightlogResult<()> {
        if self.date > today {
            return Err(FightlogError::validation(format!(
                "Fight date {} is in the future",
                self.date
            )));
        }
        if self.location.trim().is_empty() {
            return Err(FightlogError::validation("Location is required"));
        }
        Ok(())
    }
}

fn parse_date(fight_id: &str, raw: &str) -> FightlogResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|e| {
        FightlogError::CorruptRecord(format!("fight {} has date '{}': {}", fight_id, raw, e))
    })
}

fn parse_winner(fight_id: &str, raw: Option<i64>) -> FightlogResult<Option<Side>> {
    raw.map(|n| {
        Side::from_i64(n).ok_or_else(|| {
            FightlogError::CorruptRecord(format!("fight {} has winner side {}", fight_id, n))
        })
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_future_date_rejected() {
        let today = date("2024-03-01");
        assert!(NewFight::new(date("2024-03-01"), "Lviv").validate(today).is_ok());
        assert!(NewFight::new(date("2024-03-02"), "Lviv").validate(today).is_err());
    }

    #[test]
    fn test_location_required() {
        let today = date("2024-03-01");
        let err = NewFight::new(date("2020-01-01"), "  ").validate(today).unwrap_err();
        assert!(err.to_string().contains("Location is required"));
    }

    #[test]
    fn test_from_row_rejects_bad_date() {
        let row = FightRow {
            id: "f".to_string(),
            fight_date: "yesterday".to_string(),
            location: "Lviv".to_string(),
            video_url: None,
            winner_side: None,
            notes: None,
            is_active: true,
            created_at: String::new(),
        };
        assert!(matches!(
            Fight::from_row(row, vec![], vec![]),
            Err(FightlogError::CorruptRecord(_))
        ));
    }
}
