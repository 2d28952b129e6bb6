//! Fightlog Core Library
//!
//! Fight aggregate and tag hierarchy rules: roster validation, tag value
//! and cardinality checks, cascading deactivation, and the service that
//! applies them atomically.

pub mod catalog;
pub mod error;
pub mod fight;
pub mod fighter;
pub mod roster;
pub mod tags;

pub use error::{ErrorKind, FightlogError, FightlogResult};
pub use fight::FightService;
