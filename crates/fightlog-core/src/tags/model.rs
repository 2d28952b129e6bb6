//! Tag domain models.

use crate::catalog::ROOT_TAG_TYPE;
use fightlog_db::queries::tags::TagRow;
use serde::{Deserialize, Serialize};

/// A tag attached to one fight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub fight_id: String,
    pub tag_type_id: i64,
    pub tag_type: String,
    pub value: String,
    pub parent_tag_id: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Tag {
    /// Create a Tag from a database row.
    pub fn from_row(row: TagRow) -> Self {
        Self {
            id: row.id,
            fight_id: row.fight_id,
            tag_type_id: row.tag_type_id,
            tag_type: row.tag_type,
            value: row.value,
            parent_tag_id: row.parent_tag_id,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }

    pub fn is_root(&self) -> bool {
        self.tag_type == ROOT_TAG_TYPE
    }
}

/// A validated tag waiting to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTag {
    pub fight_id: String,
    pub tag_type_id: i64,
    pub tag_type: String,
    pub value: String,
    pub parent_tag_id: Option<String>,
}
