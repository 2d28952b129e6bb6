//! Tag rule engine.
//!
//! Pure checks over a fight's in-memory tags. Nothing here touches storage:
//! the fight service loads the tags, asks these functions, then writes.
//!
//! Lifecycle of a tag: active -> deactivated (one way), and active or
//! deactivated -> deleted, the latter only while no active descendant
//! points at it.

pub mod model;
pub mod values;

use crate::catalog::{TagCatalog, TagType, ROOT_TAG_TYPE};
use crate::error::{FightlogError, FightlogResult};
use model::{NewTag, Tag};
use std::collections::HashSet;

/// Validation rules bound to a tag catalog.
pub struct TagRules<'a> {
    catalog: &'a dyn TagCatalog,
}

impl<'a> TagRules<'a> {
    pub fn new(catalog: &'a dyn TagCatalog) -> Self {
        Self { catalog }
    }

    /// Check the root value supplied at fight creation.
    ///
    /// Returns the root tag type and the normalized value.
    pub fn validate_root_value(&self, value: &str) -> FightlogResult<(&'a TagType, String)> {
        let root = self
            .catalog
            .tag_type_by_name(ROOT_TAG_TYPE)
            .ok_or_else(|| FightlogError::Config(format!("no '{}' tag type", ROOT_TAG_TYPE)))?;
        let value = value.trim();
        self.check_value(root, None, value)?;
        Ok((root, value.to_string()))
    }

    /// Validate a new tag for a fight and resolve its parent link.
    pub fn validate_add(
        &self,
        fight_id: &str,
        fight_tags: &[Tag],
        tag_type_name: &str,
        value: &str,
    ) -> FightlogResult<NewTag> {
        let tag_type = self
            .catalog
            .tag_type_by_name(tag_type_name)
            .ok_or_else(|| FightlogError::UnknownTagType(tag_type_name.to_string()))?;

        if tag_type.is_root() {
            return Err(FightlogError::validation(format!(
                "The '{}' tag is set when the fight is created and cannot be added later",
                tag_type.name
            )));
        }

        let value = value.trim();
        let parent = self.active_parent(tag_type, fight_tags)?;
        self.check_value(tag_type, parent.map(|p| p.value.as_str()), value)?;

        if !tag_type.is_freeform
            && fight_tags
                .iter()
                .any(|t| t.is_active && t.tag_type_id == tag_type.id)
        {
            return Err(FightlogError::validation(format!(
                "Fight already has an active '{}' tag; deactivate it first",
                tag_type.name
            )));
        }

        Ok(NewTag {
            fight_id: fight_id.to_string(),
            tag_type_id: tag_type.id,
            tag_type: tag_type.name.clone(),
            value: value.to_string(),
            parent_tag_id: parent.map(|p| p.id.clone()),
        })
    }

    /// Validate a value change. Returns the normalized value.
    pub fn validate_update(
        &self,
        tag: &Tag,
        fight_tags: &[Tag],
        new_value: &str,
    ) -> FightlogResult<String> {
        if tag.is_root() {
            return Err(FightlogError::ImmutableTag {
                tag_type: tag.tag_type.clone(),
            });
        }
        if !tag.is_active {
            return Err(FightlogError::validation(format!(
                "Tag {} is deactivated and cannot be changed",
                tag.id
            )));
        }

        let tag_type = self
            .catalog
            .tag_type_by_id(tag.tag_type_id)
            .ok_or_else(|| FightlogError::UnknownTagType(tag.tag_type.clone()))?;

        let value = new_value.trim();
        let parent = self.active_parent(tag_type, fight_tags)?;
        self.check_value(tag_type, parent.map(|p| p.value.as_str()), value)?;
        Ok(value.to_string())
    }

    /// The active tag a child of `tag_type` must hang off, if it needs one.
    fn active_parent<'t>(
        &self,
        tag_type: &TagType,
        fight_tags: &'t [Tag],
    ) -> FightlogResult<Option<&'t Tag>> {
        let Some(parent_type_id) = tag_type.parent_id else {
            return Ok(None);
        };
        match fight_tags
            .iter()
            .find(|t| t.is_active && t.tag_type_id == parent_type_id)
        {
            Some(parent) => Ok(Some(parent)),
            None => Err(FightlogError::validation(format!(
                "A '{}' tag requires an active '{}' tag on the fight",
                tag_type.name,
                self.type_name(parent_type_id)
            ))),
        }
    }

    fn check_value(
        &self,
        tag_type: &TagType,
        parent_value: Option<&str>,
        value: &str,
    ) -> FightlogResult<()> {
        if value.is_empty() {
            return Err(FightlogError::validation("Tag value cannot be empty"));
        }

        if tag_type.is_freeform {
            if value.chars().count() > values::MAX_FREEFORM_LEN {
                return Err(FightlogError::validation(format!(
                    "'{}' tags are limited to {} characters",
                    tag_type.name,
                    values::MAX_FREEFORM_LEN
                )));
            }
            return Ok(());
        }

        let context = match (tag_type.parent_id, parent_value) {
            (Some(parent_id), Some(parent_value)) => {
                format!(" under {} '{}'", self.type_name(parent_id), parent_value)
            }
            _ => String::new(),
        };

        match values::allowed_values(&tag_type.name, parent_value) {
            Some(allowed) if allowed.contains(&value) => Ok(()),
            Some(allowed) => Err(FightlogError::validation(format!(
                "'{}' is not a valid {} value{}; allowed: {}",
                value,
                tag_type.name,
                context,
                allowed.join(", ")
            ))),
            None => Err(FightlogError::validation(format!(
                "'{}' tags are not allowed{}",
                tag_type.name, context
            ))),
        }
    }

    fn type_name(&self, id: i64) -> String {
        self.catalog
            .tag_type_by_id(id)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| id.to_string())
    }
}

/// Active tags whose parent chain includes `tag`.
///
/// Walks through deactivated intermediates but only returns active tags.
pub fn compute_cascade<'t>(tag: &Tag, fight_tags: &'t [Tag]) -> Vec<&'t Tag> {
    let mut cascade = Vec::new();
    let mut visited: HashSet<&str> = HashSet::new();
    visited.insert(tag.id.as_str());
    let mut frontier = vec![tag.id.as_str()];

    while let Some(current) = frontier.pop() {
        for child in fight_tags
            .iter()
            .filter(|t| t.parent_tag_id.as_deref() == Some(current))
        {
            if visited.insert(child.id.as_str()) {
                if child.is_active {
                    cascade.push(child);
                }
                frontier.push(child.id.as_str());
            }
        }
    }

    cascade
}

/// A tag can only be hard-deleted once nothing active depends on it.
pub fn validate_delete(tag: &Tag, fight_tags: &[Tag]) -> FightlogResult<()> {
    let blocking = compute_cascade(tag, fight_tags);
    if !blocking.is_empty() {
        return Err(FightlogError::validation(format!(
            "Tag {} has {} active child tag(s); deactivate or delete them first",
            tag.id,
            blocking.len()
        )));
    }
    Ok(())
}
