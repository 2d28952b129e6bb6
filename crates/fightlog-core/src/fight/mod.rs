//! Fight aggregate service.
//!
//! Every write runs inside one unit of work. Validation happens before the
//! first statement, so a rejected call leaves the fight untouched.

pub mod model;

use crate::catalog::TagCatalog;
use crate::error::{FightlogError, FightlogResult};
use crate::fighter::FighterDirectory;
use crate::roster::model::{Participation, RosterEntry};
use crate::roster::validate_roster;
use crate::tags::model::Tag;
use crate::tags::{compute_cascade, validate_delete, TagRules};
use fightlog_db::queries::{fights, participations, tags as tag_queries};
use fightlog_db::{Connection, DbError, DbPool};
use model::{Fight, FightSummary, NewFight, DATE_FORMAT};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Creates fights and manages their tags.
#[derive(Clone)]
pub struct FightService {
    pool: DbPool,
    catalog: Arc<dyn TagCatalog>,
    fighters: Arc<dyn FighterDirectory>,
}

impl FightService {
    pub fn new(
        pool: DbPool,
        catalog: Arc<dyn TagCatalog>,
        fighters: Arc<dyn FighterDirectory>,
    ) -> Self {
        Self {
            pool,
            catalog,
            fighters,
        }
    }

    fn rules(&self) -> TagRules<'_> {
        TagRules::new(self.catalog.as_ref())
    }

    /// Create a fight, its root tag and its roster in one unit of work.
    pub fn create_fight(
        &self,
        data: NewFight,
        root_value: &str,
        roster: &[RosterEntry],
    ) -> FightlogResult<Fight> {
        let today = chrono::Utc::now().date_naive();
        let rules = self.rules();

        let validated = data
            .validate(today)
            .and_then(|_| rules.validate_root_value(root_value))
            .and_then(|(root_type, root_value)| {
                validate_roster(roster, &root_value, self.fighters.as_ref())
                    .map(|_| (root_type, root_value))
            });
        let (root_type, root_value) = validated.map_err(|e| {
            debug!(error = %e, "Fight creation rejected");
            e
        })?;

        let fight_id = Uuid::new_v4().to_string();
        let date = data.date.format(DATE_FORMAT).to_string();

        let result = self.pool.run_in_transaction(|tx| {
            fights::insert_fight(
                tx,
                &fights::NewFightRow {
                    id: &fight_id,
                    fight_date: &date,
                    location: data.location.trim(),
                    video_url: non_blank(data.video_url.as_deref()),
                    winner_side: data.winner_side.map(|s| s.as_i64()),
                    notes: non_blank(data.notes.as_deref()),
                },
            )?;
            tag_queries::insert_tag(
                tx,
                &Uuid::new_v4().to_string(),
                &fight_id,
                root_type.id,
                &root_value,
                None,
            )?;
            for entry in roster {
                participations::insert_participation(
                    tx,
                    &Uuid::new_v4().to_string(),
                    &fight_id,
                    &entry.fighter_id,
                    entry.side.as_i64(),
                    entry.role.as_str(),
                )?;
            }
            load_fight(tx, &fight_id)
        });

        let fight = log_write_failure(result, &fight_id)?;
        info!(
            fight_id = %fight.id,
            root = %root_value,
            participants = fight.participants.len(),
            "Fight created"
        );
        Ok(fight)
    }

    /// Get a fight with all of its tags and participants.
    pub fn get_fight(&self, fight_id: &str) -> FightlogResult<Fight> {
        self.pool.with_conn(|conn| Ok(load_fight(conn, fight_id)))?
    }

    /// List active fights, newest first.
    pub fn list_fights(&self) -> FightlogResult<Vec<FightSummary>> {
        let rows = self.pool.with_conn(fights::list_active_fights)?;
        rows.into_iter().map(FightSummary::from_row).collect()
    }

    /// Hide a fight from listings. Tags and roster are kept.
    pub fn deactivate_fight(&self, fight_id: &str) -> FightlogResult<()> {
        self.pool.run_in_transaction(|tx| {
            fights::set_fight_active(tx, fight_id, false).map_err(|e| fight_lookup(e, fight_id))
        })?;
        info!(fight_id, "Fight deactivated");
        Ok(())
    }

    /// The fight's tags, optionally including deactivated ones.
    pub fn list_tags(&self, fight_id: &str, include_inactive: bool) -> FightlogResult<Vec<Tag>> {
        let rows = self.pool.with_conn(|conn| {
            if let Err(e) = fights::get_fight(conn, fight_id) {
                return Ok(Err(fight_lookup(e, fight_id)));
            }
            let rows = if include_inactive {
                tag_queries::list_tags(conn, fight_id)?
            } else {
                tag_queries::list_active_tags(conn, fight_id)?
            };
            Ok(Ok(rows))
        })??;
        Ok(rows.into_iter().map(Tag::from_row).collect())
    }

    /// Attach a new tag to a fight.
    pub fn add_tag(&self, fight_id: &str, tag_type: &str, value: &str) -> FightlogResult<Tag> {
        let rules = self.rules();
        let result = self.pool.run_in_transaction(|tx| {
            ensure_writable(tx, fight_id)?;
            let fight_tags = load_tags(tx, fight_id)?;
            let new_tag = rules
                .validate_add(fight_id, &fight_tags, tag_type, value)
                .map_err(|e| rejected(e, fight_id))?;

            let tag_id = Uuid::new_v4().to_string();
            tag_queries::insert_tag(
                tx,
                &tag_id,
                &new_tag.fight_id,
                new_tag.tag_type_id,
                &new_tag.value,
                new_tag.parent_tag_id.as_deref(),
            )?;
            get_tag(tx, fight_id, &tag_id)
        });

        let tag = log_write_failure(result, fight_id)?;
        info!(fight_id, tag_id = %tag.id, tag_type = %tag.tag_type, value = %tag.value, "Tag added");
        Ok(tag)
    }

    /// Change a tag's value. The root tag never changes.
    pub fn update_tag(&self, fight_id: &str, tag_id: &str, new_value: &str) -> FightlogResult<Tag> {
        let rules = self.rules();
        let result = self.pool.run_in_transaction(|tx| {
            let tag = get_writable_tag(tx, fight_id, tag_id)?;
            let fight_tags = load_tags(tx, fight_id)?;
            let value = rules
                .validate_update(&tag, &fight_tags, new_value)
                .map_err(|e| rejected(e, fight_id))?;

            tag_queries::update_tag_value(tx, &tag.id, &value)?;
            get_tag(tx, fight_id, &tag.id)
        });

        let tag = log_write_failure(result, fight_id)?;
        info!(fight_id, tag_id = %tag.id, value = %tag.value, "Tag updated");
        Ok(tag)
    }

    /// Deactivate a tag and every active tag below it.
    ///
    /// Returns the tags that changed state, the requested tag first.
    pub fn deactivate_tag(&self, fight_id: &str, tag_id: &str) -> FightlogResult<Vec<Tag>> {
        let result = self.pool.run_in_transaction(|tx| {
            let tag = get_writable_tag(tx, fight_id, tag_id)?;
            let fight_tags = load_tags(tx, fight_id)?;

            let mut changing = Vec::new();
            if tag.is_active {
                changing.push(tag.id.clone());
            }
            changing.extend(compute_cascade(&tag, &fight_tags).into_iter().map(|t| t.id.clone()));

            tag_queries::deactivate_tags(tx, &changing)?;
            changing
                .iter()
                .map(|id| get_tag(tx, fight_id, id))
                .collect::<FightlogResult<Vec<_>>>()
        });

        let changed = log_write_failure(result, fight_id)?;
        info!(fight_id, tag_id, changed = changed.len(), "Tag deactivated");
        Ok(changed)
    }

    /// Hard-delete a tag that nothing active depends on.
    pub fn delete_tag(&self, fight_id: &str, tag_id: &str) -> FightlogResult<()> {
        let result = self.pool.run_in_transaction(|tx| {
            let tag = get_writable_tag(tx, fight_id, tag_id)?;
            let fight_tags = load_tags(tx, fight_id)?;
            validate_delete(&tag, &fight_tags).map_err(|e| rejected(e, fight_id))?;
            tag_queries::delete_tag(tx, &tag.id)?;
            Ok(())
        });

        log_write_failure(result, fight_id)?;
        info!(fight_id, tag_id, "Tag deleted");
        Ok(())
    }
}

fn load_fight(conn: &Connection, fight_id: &str) -> FightlogResult<Fight> {
    let row = fights::get_fight(conn, fight_id).map_err(|e| fight_lookup(e, fight_id))?;
    let tags = load_tags(conn, fight_id)?;
    let participants = participations::list_participations(conn, fight_id)?
        .into_iter()
        .map(Participation::from_row)
        .collect::<FightlogResult<Vec<_>>>()?;
    Fight::from_row(row, tags, participants)
}

fn load_tags(conn: &Connection, fight_id: &str) -> FightlogResult<Vec<Tag>> {
    Ok(tag_queries::list_tags(conn, fight_id)?
        .into_iter()
        .map(Tag::from_row)
        .collect())
}

/// Tag lookup scoped to one fight. A tag on another fight is not found.
fn get_tag(conn: &Connection, fight_id: &str, tag_id: &str) -> FightlogResult<Tag> {
    tag_queries::get_tag_in_fight(conn, fight_id, tag_id)
        .map(Tag::from_row)
        .map_err(|e| match e {
            DbError::NotFound(_) => FightlogError::TagNotFound(tag_id.to_string()),
            e => e.into(),
        })
}

/// Tag lookup for a write: the fight must exist, own the tag, and be active,
/// checked in that order.
fn get_writable_tag(conn: &Connection, fight_id: &str, tag_id: &str) -> FightlogResult<Tag> {
    let fight = fights::get_fight(conn, fight_id).map_err(|e| fight_lookup(e, fight_id))?;
    let tag = get_tag(conn, fight_id, tag_id)?;
    if !fight.is_active {
        return Err(rejected(deactivated_fight(fight_id), fight_id));
    }
    Ok(tag)
}

fn ensure_writable(conn: &Connection, fight_id: &str) -> FightlogResult<()> {
    let fight = fights::get_fight(conn, fight_id).map_err(|e| fight_lookup(e, fight_id))?;
    if !fight.is_active {
        return Err(rejected(deactivated_fight(fight_id), fight_id));
    }
    Ok(())
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn deactivated_fight(fight_id: &str) -> FightlogError {
    FightlogError::validation(format!("Fight {} is deactivated", fight_id))
}

fn fight_lookup(e: DbError, fight_id: &str) -> FightlogError {
    match e {
        DbError::NotFound(_) => FightlogError::FightNotFound(fight_id.to_string()),
        e => e.into(),
    }
}

fn rejected(e: FightlogError, fight_id: &str) -> FightlogError {
    debug!(fight_id, error = %e, "Tag operation rejected");
    e
}

fn log_write_failure<T>(result: FightlogResult<T>, fight_id: &str) -> FightlogResult<T> {
    if let Err(FightlogError::Conflict(ref msg)) = result {
        warn!(fight_id, conflict = %msg, "Write lost a race and was rolled back");
    }
    result
}
