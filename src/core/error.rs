use crate::core::types::{AlignmentHandle, Bound};
use thiserror::Error;

/// Failures reported by a scene backend
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    #[error("Attribute not found: {0}")]
    AttributeNotFound(String),

    #[error("Object is locked: {0}")]
    Locked(String),

    #[error("Unknown alignment handle: {0:?}")]
    UnknownHandle(AlignmentHandle),

    #[error("A node named '{0}' already exists")]
    NameCollision(String),

    #[error("Node '{node}' has no field '{field}'")]
    FieldNotFound { node: String, field: String },
}

#[derive(Error, Debug)]
pub enum MatchError {
    #[error("Missing piece(s) of info: {}", .fields.join(", "))]
    MissingField { fields: Vec<&'static str> },

    #[error("Expected {expected} capture fields, got {got}")]
    FieldCount { expected: usize, got: usize },

    #[error("Invalid limb id: '{0}'")]
    InvalidLimbId(String),

    #[error("No record stored for limb '{0}'")]
    RecordNotFound(String),

    #[error("No limb selected, run capture first")]
    NoLimbSelected,

    #[error("Could not align '{target_ref}' to '{source_ref}' (chain index {index}): {reason}")]
    AlignmentFailure {
        index: usize,
        source_ref: String,
        target_ref: String,
        reason: SceneError,
    },

    #[error("Blend attribute {attribute} has no declared {bound}")]
    MissingBound { attribute: String, bound: Bound },

    #[error("Blend attribute {attribute} has equal min and max ({value})")]
    DegenerateBlendRange { attribute: String, value: f64 },

    #[error("Stored record for '{limb_id}' is unreadable: {reason}")]
    CorruptRecord { limb_id: String, reason: String },

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, MatchError>;

/// Result type for scene backend calls
pub type SceneResult<T> = std::result::Result<T, SceneError>;
