//! Request handling for the input source
//!
//! capture: raw fields -> RecordBuilder -> LimbRecord -> store.save
//! match:   selected id -> store.load -> LimbMatcher::switch

pub mod executor;

pub use executor::{CaptureOutcome, CommandExecutor};
