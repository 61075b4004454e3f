//! Limb records and the builder that captures them
//!
//! A record is built once from capture fields, handed to a store, and
//! dropped. The matcher later gets a fresh copy back from the store.

pub mod builder;
pub mod limb;

pub use builder::{CaptureFields, FieldSlot, RecordBuilder, FIELD_COUNT};
pub use limb::{limb_id_from_path, validate_limb_id, Chain, LimbRecord};
