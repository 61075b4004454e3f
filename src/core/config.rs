//! Tool configuration
//!
//! Loaded from an optional TOML file; every field has a default so an empty
//! file (or no file at all) yields a working setup.

use crate::core::error::{MatchError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which storage strategy persists limb records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// One record file per limb under `store_dir`
    #[default]
    File,
    /// One `{limb_id}{suffix}` record node per limb inside the scene
    Scene,
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "file" => Ok(StoreBackend::File),
            "scene" => Ok(StoreBackend::Scene),
            other => Err(format!("unknown store backend '{}' (expected file or scene)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Directory holding one record file per limb
    pub store_dir: PathBuf,

    /// Storage strategy chosen at composition time
    pub backend: StoreBackend,

    /// Naming suffix of scene-embedded record nodes
    pub record_node_suffix: String,

    /// File extension of file-backed records (without the dot)
    pub record_extension: String,

    /// How far the live blend value may sit from a bound and still count
    /// as that mode.
    ///
    /// 0.0 keeps exact equality. Rigs whose evaluation introduces float
    /// drift can raise it slightly (1e-6 is plenty for a 0..1 blend).
    pub blend_tolerance: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from("rigs_data"),
            backend: StoreBackend::File,
            record_node_suffix: "_DATA".to_string(),
            record_extension: "json".to_string(),
            blend_tolerance: 0.0,
        }
    }
}

impl MatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a config from a TOML file and validate it
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: MatchConfig = toml::from_str(&contents).map_err(|e| {
            MatchError::Config(format!("failed to parse {}: {}", path.display(), e))
        })?;
        config.validate().map_err(MatchError::Config)?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.record_node_suffix.is_empty() {
            return Err("record_node_suffix must not be empty".into());
        }

        if self.record_extension.is_empty() || self.record_extension.contains('.') {
            return Err(format!(
                "record_extension ({:?}) must be a bare extension such as \"json\"",
                self.record_extension
            ));
        }

        if !self.blend_tolerance.is_finite() || self.blend_tolerance < 0.0 {
            return Err(format!(
                "blend_tolerance ({}) must be finite and >= 0",
                self.blend_tolerance
            ));
        }

        Ok(())
    }
}
