//! Tag type catalog.
//!
//! Tag types are reference data seeded with the schema. The service takes a
//! catalog at construction time; it is never mutated afterwards.

use crate::error::{FightlogError, FightlogResult};
use fightlog_db::queries::tag_types as queries;
use fightlog_db::DbPool;
use serde::{Deserialize, Serialize};

/// Root classification: one-on-one or group format.
pub const ROOT_TAG_TYPE: &str = "supercategory";
/// Format-specific classification, child of the root tag.
pub const CATEGORY_TAG_TYPE: &str = "category";
pub const GENDER_TAG_TYPE: &str = "gender";
/// Unlimited, free-text annotation.
pub const FREEFORM_TAG_TYPE: &str = "custom";

/// A classification axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagType {
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
    pub is_freeform: bool,
}

impl TagType {
    pub fn is_root(&self) -> bool {
        self.name == ROOT_TAG_TYPE
    }

    /// Whether tags of this type hang off an active tag of the parent type.
    pub fn requires_parent(&self) -> bool {
        self.parent_id.is_some()
    }
}

/// Read-only lookup of tag types.
pub trait TagCatalog: Send + Sync {
    fn tag_type_by_name(&self, name: &str) -> Option<&TagType>;

    fn tag_type_by_id(&self, id: i64) -> Option<&TagType>;

    fn category_id_by_name(&self, name: &str) -> Option<i64> {
        self.tag_type_by_name(name).map(|t| t.id)
    }
}

/// In-memory catalog.
#[derive(Debug, Clone)]
pub struct StaticTagCatalog {
    types: Vec<TagType>,
}

impl StaticTagCatalog {
    /// Build a catalog, checking that the hierarchy is usable.
    pub fn new(types: Vec<TagType>) -> FightlogResult<Self> {
        let roots = types.iter().filter(|t| t.is_root()).count();
        if roots != 1 {
            return Err(FightlogError::Config(format!(
                "expected exactly one '{}' tag type, found {}",
                ROOT_TAG_TYPE, roots
            )));
        }
        for t in &types {
            if let Some(parent) = t.parent_id {
                if !types.iter().any(|p| p.id == parent) {
                    return Err(FightlogError::Config(format!(
                        "tag type '{}' references missing parent {}",
                        t.name, parent
                    )));
                }
                if parent == t.id {
                    return Err(FightlogError::Config(format!(
                        "tag type '{}' is its own parent",
                        t.name
                    )));
                }
            }
        }
        Ok(Self { types })
    }

    /// The catalog the migrations seed.
    pub fn seeded() -> Self {
        let tag_type = |id, name: &str, parent_id, is_freeform| TagType {
            id,
            name: name.to_string(),
            parent_id,
            is_freeform,
        };
        Self {
            types: vec![
                tag_type(1, ROOT_TAG_TYPE, None, false),
                tag_type(2, CATEGORY_TAG_TYPE, Some(1), false),
                tag_type(3, GENDER_TAG_TYPE, None, false),
                tag_type(4, FREEFORM_TAG_TYPE, None, true),
            ],
        }
    }

    pub fn types(&self) -> &[TagType] {
        &self.types
    }
}

impl TagCatalog for StaticTagCatalog {
    fn tag_type_by_name(&self, name: &str) -> Option<&TagType> {
        self.types.iter().find(|t| t.name == name)
    }

    fn tag_type_by_id(&self, id: i64) -> Option<&TagType> {
        self.types.iter().find(|t| t.id == id)
    }
}

/// Load the catalog once from the `tag_types` table.
pub fn load_tag_catalog(pool: &DbPool) -> FightlogResult<StaticTagCatalog> {
    let rows = pool.with_conn(queries::list_tag_types)?;
    let types = rows
        .into_iter()
        .map(|row| TagType {
            id: row.id,
            name: row.name,
            parent_id: row.parent_tag_type_id,
            is_freeform: row.is_freeform,
        })
        .collect();
    StaticTagCatalog::new(types)
}
