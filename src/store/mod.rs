//! Limb record persistence
//!
//! Both strategies share [`StoredRecord`], the flat all-text layout of a
//! record. Bounds are written with `f64`'s shortest round-trip formatting
//! and parsed back on load, so either store hands the matcher the exact
//! numbers the builder read.

pub mod file;
pub mod scene;

use crate::core::error::{MatchError, Result};
use crate::core::types::{AttrRef, SceneRef, CHAIN_LEN};
use crate::record::limb::{Chain, LimbRecord};
use serde::{Deserialize, Serialize};

pub use file::FileRecordStore;
pub use scene::SceneRecordStore;

/// Durable keyed storage for limb records
pub trait LimbRecordStore {
    /// Write `record` under its limb id, replacing any previous entry
    fn save(&mut self, record: &LimbRecord) -> Result<()>;

    fn load(&self, limb_id: &str) -> Result<LimbRecord>;

    /// Every stored limb id, sorted
    fn list_ids(&self) -> Result<Vec<String>>;

    fn contains(&self, limb_id: &str) -> Result<bool> {
        Ok(self.list_ids()?.iter().any(|id| id == limb_id))
    }
}

/// Persisted layout of one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub blend_attr: String,
    pub fk_blend_value: String,
    pub ik_blend_value: String,
    pub ik_joint_01: String,
    pub ik_joint_02: String,
    pub ik_joint_03: String,
    pub ik_control_01: String,
    pub ik_control_02: String,
    pub ik_control_03: String,
    pub fk_joint_01: String,
    pub fk_joint_02: String,
    pub fk_joint_03: String,
    pub fk_control_01: String,
    pub fk_control_02: String,
    pub fk_control_03: String,
}

impl StoredRecord {
    /// Field names in persisted order
    pub const FIELD_NAMES: [&'static str; 15] = [
        "blend_attr",
        "fk_blend_value",
        "ik_blend_value",
        "ik_joint_01",
        "ik_joint_02",
        "ik_joint_03",
        "ik_control_01",
        "ik_control_02",
        "ik_control_03",
        "fk_joint_01",
        "fk_joint_02",
        "fk_joint_03",
        "fk_control_01",
        "fk_control_02",
        "fk_control_03",
    ];

    pub fn from_record(record: &LimbRecord) -> Self {
        let [ik_joint_01, ik_joint_02, ik_joint_03] = chain_text(&record.ik_joints);
        let [ik_control_01, ik_control_02, ik_control_03] = chain_text(&record.ik_controls);
        let [fk_joint_01, fk_joint_02, fk_joint_03] = chain_text(&record.fk_joints);
        let [fk_control_01, fk_control_02, fk_control_03] = chain_text(&record.fk_controls);

        Self {
            blend_attr: record.blend_attribute.to_string(),
            fk_blend_value: record.fk_blend_value.to_string(),
            ik_blend_value: record.ik_blend_value.to_string(),
            ik_joint_01,
            ik_joint_02,
            ik_joint_03,
            ik_control_01,
            ik_control_02,
            ik_control_03,
            fk_joint_01,
            fk_joint_02,
            fk_joint_03,
            fk_control_01,
            fk_control_02,
            fk_control_03,
        }
    }

    /// Values paired with their field names, in [`Self::FIELD_NAMES`] order
    pub fn fields(&self) -> [(&'static str, &str); 15] {
        let values = [
            &self.blend_attr,
            &self.fk_blend_value,
            &self.ik_blend_value,
            &self.ik_joint_01,
            &self.ik_joint_02,
            &self.ik_joint_03,
            &self.ik_control_01,
            &self.ik_control_02,
            &self.ik_control_03,
            &self.fk_joint_01,
            &self.fk_joint_02,
            &self.fk_joint_03,
            &self.fk_control_01,
            &self.fk_control_02,
            &self.fk_control_03,
        ];
        std::array::from_fn(|i| (Self::FIELD_NAMES[i], values[i].as_str()))
    }

    /// Rebuild from a field lookup, failing on the first missing field
    pub fn from_lookup<F>(mut lookup: F) -> Result<Self>
    where
        F: FnMut(&'static str) -> Result<String>,
    {
        Ok(Self {
            blend_attr: lookup("blend_attr")?,
            fk_blend_value: lookup("fk_blend_value")?,
            ik_blend_value: lookup("ik_blend_value")?,
            ik_joint_01: lookup("ik_joint_01")?,
            ik_joint_02: lookup("ik_joint_02")?,
            ik_joint_03: lookup("ik_joint_03")?,
            ik_control_01: lookup("ik_control_01")?,
            ik_control_02: lookup("ik_control_02")?,
            ik_control_03: lookup("ik_control_03")?,
            fk_joint_01: lookup("fk_joint_01")?,
            fk_joint_02: lookup("fk_joint_02")?,
            fk_joint_03: lookup("fk_joint_03")?,
            fk_control_01: lookup("fk_control_01")?,
            fk_control_02: lookup("fk_control_02")?,
            fk_control_03: lookup("fk_control_03")?,
        })
    }

    /// Parse the bounds and validate, keyed under `limb_id`
    pub fn into_record(self, limb_id: &str) -> Result<LimbRecord> {
        let record = LimbRecord {
            limb_id: limb_id.to_string(),
            blend_attribute: AttrRef(self.blend_attr),
            fk_blend_value: parse_bound(limb_id, "fk_blend_value", &self.fk_blend_value)?,
            ik_blend_value: parse_bound(limb_id, "ik_blend_value", &self.ik_blend_value)?,
            ik_joints: chain([self.ik_joint_01, self.ik_joint_02, self.ik_joint_03]),
            ik_controls: chain([self.ik_control_01, self.ik_control_02, self.ik_control_03]),
            fk_joints: chain([self.fk_joint_01, self.fk_joint_02, self.fk_joint_03]),
            fk_controls: chain([self.fk_control_01, self.fk_control_02, self.fk_control_03]),
        };
        record.validate().map_err(|e| match e {
            MatchError::CorruptRecord { .. } | MatchError::InvalidLimbId(_) => e,
            other => MatchError::CorruptRecord {
                limb_id: limb_id.to_string(),
                reason: other.to_string(),
            },
        })?;
        Ok(record)
    }
}

fn chain_text(chain: &Chain) -> [String; CHAIN_LEN] {
    chain.clone().map(|obj| obj.0)
}

fn chain(names: [String; CHAIN_LEN]) -> Chain {
    names.map(SceneRef)
}

fn parse_bound(limb_id: &str, field: &str, text: &str) -> Result<f64> {
    text.trim()
        .parse::<f64>()
        .map_err(|e| MatchError::CorruptRecord {
            limb_id: limb_id.to_string(),
            reason: format!("{} = {:?}: {}", field, text, e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::limb::tests::arm_record;

    #[test]
    fn test_stored_record_round_trips() {
        let record = arm_record();
        let stored = StoredRecord::from_record(&record);
        assert_eq!(stored.fk_blend_value, "0");
        assert_eq!(stored.ik_blend_value, "1");
        assert_eq!(stored.ik_control_03, "ikC3");
        assert_eq!(stored.into_record("armL").unwrap(), record);
    }

    #[test]
    fn test_fields_follow_field_names() {
        let stored = StoredRecord::from_record(&arm_record());
        let fields = stored.fields();
        for (i, (name, _)) in fields.iter().enumerate() {
            assert_eq!(*name, StoredRecord::FIELD_NAMES[i]);
        }
        assert_eq!(fields[0], ("blend_attr", "armL.fkIkBlend"));
        assert_eq!(fields[14], ("fk_control_03", "fkC3"));
    }

    #[test]
    fn test_bad_bound_is_corrupt() {
        let mut stored = StoredRecord::from_record(&arm_record());
        stored.ik_blend_value = "one".into();
        assert!(matches!(
            stored.into_record("armL"),
            Err(MatchError::CorruptRecord { .. })
        ));
    }

    #[test]
    fn test_empty_stored_field_is_corrupt() {
        let mut stored = StoredRecord::from_record(&arm_record());
        stored.fk_joint_02.clear();
        assert!(matches!(
            stored.into_record("armL"),
            Err(MatchError::CorruptRecord { .. })
        ));
    }

    #[test]
    fn test_fractional_bounds_exact() {
        let mut record = arm_record();
        record.fk_blend_value = -0.1;
        record.ik_blend_value = 10.0 / 3.0;
        let restored = StoredRecord::from_record(&record)
            .into_record("armL")
            .unwrap();
        assert_eq!(restored.fk_blend_value, -0.1);
        assert_eq!(restored.ik_blend_value, 10.0 / 3.0);
    }
}
