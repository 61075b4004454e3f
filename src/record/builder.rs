//! Record builder: fourteen raw capture fields plus a live bound query
//! become a validated [`LimbRecord`].

use crate::core::error::{MatchError, Result};
use crate::core::types::{AttrRef, Bound, SceneRef, CHAIN_LEN};
use crate::record::limb::{limb_id_from_path, Chain, LimbRecord};
use crate::scene::SceneBackend;

/// Number of raw fields supplied by a capture request
pub const FIELD_COUNT: usize = 14;

/// Position of each raw capture field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldSlot {
    RootControl,
    BlendAttribute,
    IkJoint01,
    IkJoint02,
    IkJoint03,
    IkControl01,
    IkControl02,
    IkControl03,
    FkJoint01,
    FkJoint02,
    FkJoint03,
    FkControl01,
    FkControl02,
    FkControl03,
}

impl FieldSlot {
    /// All slots in input order
    pub const ALL: [FieldSlot; FIELD_COUNT] = [
        FieldSlot::RootControl,
        FieldSlot::BlendAttribute,
        FieldSlot::IkJoint01,
        FieldSlot::IkJoint02,
        FieldSlot::IkJoint03,
        FieldSlot::IkControl01,
        FieldSlot::IkControl02,
        FieldSlot::IkControl03,
        FieldSlot::FkJoint01,
        FieldSlot::FkJoint02,
        FieldSlot::FkJoint03,
        FieldSlot::FkControl01,
        FieldSlot::FkControl02,
        FieldSlot::FkControl03,
    ];

    pub const IK_JOINTS: [FieldSlot; CHAIN_LEN] =
        [FieldSlot::IkJoint01, FieldSlot::IkJoint02, FieldSlot::IkJoint03];
    pub const IK_CONTROLS: [FieldSlot; CHAIN_LEN] =
        [FieldSlot::IkControl01, FieldSlot::IkControl02, FieldSlot::IkControl03];
    pub const FK_JOINTS: [FieldSlot; CHAIN_LEN] =
        [FieldSlot::FkJoint01, FieldSlot::FkJoint02, FieldSlot::FkJoint03];
    pub const FK_CONTROLS: [FieldSlot; CHAIN_LEN] =
        [FieldSlot::FkControl01, FieldSlot::FkControl02, FieldSlot::FkControl03];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            FieldSlot::RootControl => "root_control",
            FieldSlot::BlendAttribute => "blend_attribute",
            FieldSlot::IkJoint01 => "ik_joint_01",
            FieldSlot::IkJoint02 => "ik_joint_02",
            FieldSlot::IkJoint03 => "ik_joint_03",
            FieldSlot::IkControl01 => "ik_control_01",
            FieldSlot::IkControl02 => "ik_control_02",
            FieldSlot::IkControl03 => "ik_control_03",
            FieldSlot::FkJoint01 => "fk_joint_01",
            FieldSlot::FkJoint02 => "fk_joint_02",
            FieldSlot::FkJoint03 => "fk_joint_03",
            FieldSlot::FkControl01 => "fk_control_01",
            FieldSlot::FkControl02 => "fk_control_02",
            FieldSlot::FkControl03 => "fk_control_03",
        }
    }
}

/// The fourteen raw text values of a capture request, trimmed
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureFields {
    values: [String; FIELD_COUNT],
}

impl CaptureFields {
    pub fn new(values: [String; FIELD_COUNT]) -> Self {
        Self {
            values: values.map(|v| v.trim().to_string()),
        }
    }

    pub fn get(&self, slot: FieldSlot) -> &str {
        &self.values[slot.index()]
    }

    /// Slots whose value is empty, in input order
    pub fn missing(&self) -> Vec<FieldSlot> {
        FieldSlot::ALL
            .into_iter()
            .filter(|slot| self.get(*slot).is_empty())
            .collect()
    }

    fn chain(&self, slots: [FieldSlot; CHAIN_LEN]) -> Chain {
        slots.map(|slot| SceneRef::new(self.get(slot)))
    }
}

impl TryFrom<Vec<String>> for CaptureFields {
    type Error = MatchError;

    fn try_from(values: Vec<String>) -> Result<Self> {
        let got = values.len();
        let values: [String; FIELD_COUNT] = values.try_into().map_err(|_| MatchError::FieldCount {
            expected: FIELD_COUNT,
            got,
        })?;
        Ok(Self::new(values))
    }
}

/// Turns capture fields into limb records, reading blend bounds from the scene
pub struct RecordBuilder<'a, B: SceneBackend + ?Sized> {
    scene: &'a B,
}

impl<'a, B: SceneBackend + ?Sized> RecordBuilder<'a, B> {
    pub fn new(scene: &'a B) -> Self {
        Self { scene }
    }

    /// Validate the fields and assemble a record
    ///
    /// Empty fields are rejected before the scene is queried, so a failed
    /// capture never touches the backend.
    pub fn build(&self, fields: &CaptureFields) -> Result<LimbRecord> {
        let missing = fields.missing();
        if !missing.is_empty() {
            return Err(MatchError::MissingField {
                fields: missing.into_iter().map(FieldSlot::name).collect(),
            });
        }

        let root = fields.get(FieldSlot::RootControl);
        let limb_id = limb_id_from_path(root)?;
        let blend_attribute = AttrRef::join(root, fields.get(FieldSlot::BlendAttribute));

        let fk_blend_value = self.bound(&blend_attribute, Bound::Min)?;
        let ik_blend_value = self.bound(&blend_attribute, Bound::Max)?;

        let record = LimbRecord {
            limb_id,
            blend_attribute,
            fk_blend_value,
            ik_blend_value,
            ik_joints: fields.chain(FieldSlot::IK_JOINTS),
            ik_controls: fields.chain(FieldSlot::IK_CONTROLS),
            fk_joints: fields.chain(FieldSlot::FK_JOINTS),
            fk_controls: fields.chain(FieldSlot::FK_CONTROLS),
        };
        record.validate()?;

        tracing::debug!(
            limb_id = %record.limb_id,
            attribute = %record.blend_attribute,
            fk = record.fk_blend_value,
            ik = record.ik_blend_value,
            "built limb record"
        );
        Ok(record)
    }

    fn bound(&self, attribute: &AttrRef, bound: Bound) -> Result<f64> {
        self.scene
            .attribute_bound(attribute, bound)?
            .ok_or_else(|| MatchError::MissingBound {
                attribute: attribute.to_string(),
                bound,
            })
    }
}
