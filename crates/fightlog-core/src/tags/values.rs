//! Allowed tag values.
//!
//! Lookup is keyed by (tag type, parent tag value). Types without a parent
//! use `None`. Freeform tags have no entry; any non-empty value is accepted.

use crate::catalog::{CATEGORY_TAG_TYPE, GENDER_TAG_TYPE, ROOT_TAG_TYPE};

pub const DUEL: &str = "duel";
pub const GROUP: &str = "group";

/// Longest accepted freeform value, in characters.
pub const MAX_FREEFORM_LEN: usize = 200;

type Rule = (&'static str, Option<&'static str>, &'static [&'static str]);

const ALLOWED_VALUES: &[Rule] = &[
    (ROOT_TAG_TYPE, None, &[DUEL, GROUP]),
    (CATEGORY_TAG_TYPE, Some(DUEL), &["duel", "profight"]),
    (
        CATEGORY_TAG_TYPE,
        Some(GROUP),
        &["3s", "5s", "10s", "12s", "16s", "21s", "30s", "mass"],
    ),
    (GENDER_TAG_TYPE, None, &["male", "female", "mixed"]),
];

/// Allowed values for a tag type under a given parent value, if any exist.
pub fn allowed_values(tag_type: &str, parent_value: Option<&str>) -> Option<&'static [&'static str]> {
    ALLOWED_VALUES
        .iter()
        .find(|(t, p, _)| *t == tag_type && *p == parent_value)
        .map(|(_, _, values)| *values)
}

/// Fight format implied by the root tag value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootFormat {
    OneOnOne,
    Group,
}

impl RootFormat {
    pub fn from_root_value(value: &str) -> Option<Self> {
        match value {
            DUEL => Some(Self::OneOnOne),
            GROUP => Some(Self::Group),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_depends_on_root() {
        let duel = allowed_values(CATEGORY_TAG_TYPE, Some(DUEL)).unwrap();
        assert!(duel.contains(&"profight"));
        assert!(!duel.contains(&"5s"));

        let group = allowed_values(CATEGORY_TAG_TYPE, Some(GROUP)).unwrap();
        assert!(group.contains(&"5s"));
        assert!(!group.contains(&"profight"));

        assert!(allowed_values(CATEGORY_TAG_TYPE, None).is_none());
        assert!(allowed_values(CATEGORY_TAG_TYPE, Some("melee")).is_none());
    }

    #[test]
    fn test_every_root_value_has_a_format() {
        for value in allowed_values(ROOT_TAG_TYPE, None).unwrap() {
            assert!(RootFormat::from_root_value(value).is_some(), "{value}");
        }
    }
}
