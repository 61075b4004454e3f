//! The limb record: one limb's IK/FK topology and blend control

use crate::core::error::{MatchError, Result};
use crate::core::types::{AttrRef, SceneRef, CHAIN_LEN};
use crate::record::builder::FieldSlot;
use serde::{Deserialize, Serialize};

/// A three-joint chain, ordered root to tip
pub type Chain = [SceneRef; CHAIN_LEN];

/// Canonical description of one limb
///
/// Index `i` of every chain refers to the same anatomical joint, so
/// `ik_joints[i]`, `ik_controls[i]`, `fk_joints[i]` and `fk_controls[i]`
/// always correspond.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimbRecord {
    pub limb_id: String,
    pub blend_attribute: AttrRef,
    /// Declared minimum of the blend attribute ("fully FK")
    pub fk_blend_value: f64,
    /// Declared maximum of the blend attribute ("fully IK")
    pub ik_blend_value: f64,
    pub ik_joints: Chain,
    pub ik_controls: Chain,
    pub fk_joints: Chain,
    pub fk_controls: Chain,
}

impl LimbRecord {
    /// Check every field is present and the blend range is usable
    pub fn validate(&self) -> Result<()> {
        validate_limb_id(&self.limb_id)?;

        let mut missing = Vec::new();
        if self.blend_attribute.is_empty() {
            missing.push(FieldSlot::BlendAttribute.name());
        }
        for (slots, chain) in [
            (FieldSlot::IK_JOINTS, &self.ik_joints),
            (FieldSlot::IK_CONTROLS, &self.ik_controls),
            (FieldSlot::FK_JOINTS, &self.fk_joints),
            (FieldSlot::FK_CONTROLS, &self.fk_controls),
        ] {
            for (slot, obj) in slots.iter().zip(chain) {
                if obj.is_empty() {
                    missing.push(slot.name());
                }
            }
        }
        if !missing.is_empty() {
            return Err(MatchError::MissingField { fields: missing });
        }

        if !self.fk_blend_value.is_finite() || !self.ik_blend_value.is_finite() {
            return Err(MatchError::CorruptRecord {
                limb_id: self.limb_id.clone(),
                reason: "blend bounds must be finite".into(),
            });
        }
        if self.fk_blend_value == self.ik_blend_value {
            return Err(MatchError::DegenerateBlendRange {
                attribute: self.blend_attribute.to_string(),
                value: self.fk_blend_value,
            });
        }

        Ok(())
    }
}

/// Derive a limb id from a scene path: the last `|`-separated segment
pub fn limb_id_from_path(path: &str) -> Result<String> {
    let id = path.rsplit('|').next().unwrap_or_default().trim();
    validate_limb_id(id)?;
    Ok(id.to_string())
}

/// A limb id doubles as a file stem and a node name, so it must be a
/// single plain segment.
pub fn validate_limb_id(id: &str) -> Result<()> {
    let bad = id.is_empty()
        || id == "."
        || id == ".."
        || id.contains(['/', '\\', '|'])
        || id.chars().any(char::is_control);
    if bad {
        return Err(MatchError::InvalidLimbId(id.to_string()));
    }
    Ok(())
}
