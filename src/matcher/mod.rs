//! IK/FK matching
//!
//! Reads the live blend value to find which mode a limb is in, snaps the
//! other chain's controls onto the active chain's joints, then flips the
//! blend attribute. The flip is always the last write so the limb never
//! shows a half-matched frame.
//!
//! ```text
//!   FkActive --(FKtoIK: ik_controls[i] <- fk_joints[i])--> IkActive
//!   IkActive --(IKtoFK: fk_controls[i] <- ik_joints[i])--> FkActive
//!   Blended  --(no-op)--> Blended
//! ```

pub mod mode;

use crate::core::error::{MatchError, Result, SceneError};
use crate::core::types::{AttrRef, Pose, SceneRef};
use crate::record::limb::{Chain, LimbRecord};
use crate::scene::{SceneBackend, TemporaryAlignment};

pub use mode::{KinematicMode, ModeDetector};

/// What a match request did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchOutcome {
    /// IK was active; FK controls now hold the pose and the limb is FK
    IkToFk,
    /// FK was active; IK controls now hold the pose and the limb is IK
    FkToIk,
    /// The blend value sat between the bounds, nothing was touched
    Skipped { current: f64 },
}

pub struct LimbMatcher<'s, B: SceneBackend + ?Sized> {
    scene: &'s mut B,
    detector: ModeDetector,
}

impl<'s, B: SceneBackend + ?Sized> LimbMatcher<'s, B> {
    pub fn new(scene: &'s mut B) -> Self {
        Self {
            scene,
            detector: ModeDetector::exact(),
        }
    }

    pub fn with_detector(scene: &'s mut B, detector: ModeDetector) -> Self {
        Self { scene, detector }
    }

    /// Current mode of the limb described by `record`
    pub fn mode(&self, record: &LimbRecord) -> Result<KinematicMode> {
        let current = self.scene.attribute_value(&record.blend_attribute)?;
        Ok(self.detector.detect(record, current))
    }

    /// Switch the limb to the other kinematic mode, keeping its pose
    pub fn switch(&mut self, record: &LimbRecord) -> Result<MatchOutcome> {
        match self.mode(record)? {
            KinematicMode::IkActive => {
                self.align_then_flip(
                    &record.ik_joints,
                    &record.fk_controls,
                    &record.blend_attribute,
                    record.fk_blend_value,
                )?;
                tracing::info!(limb_id = %record.limb_id, "matched IK to FK");
                Ok(MatchOutcome::IkToFk)
            }
            KinematicMode::FkActive => {
                self.align_then_flip(
                    &record.fk_joints,
                    &record.ik_controls,
                    &record.blend_attribute,
                    record.ik_blend_value,
                )?;
                tracing::info!(limb_id = %record.limb_id, "matched FK to IK");
                Ok(MatchOutcome::FkToIk)
            }
            KinematicMode::Blended { current } => {
                tracing::warn!(
                    limb_id = %record.limb_id,
                    current,
                    fk = record.fk_blend_value,
                    ik = record.ik_blend_value,
                    "blend value is between modes, leaving limb untouched"
                );
                Ok(MatchOutcome::Skipped { current })
            }
        }
    }

    /// Align the chain, then write the blend attribute
    ///
    /// A rejected blend write puts the aligned targets back.
    fn align_then_flip(
        &mut self,
        sources: &Chain,
        targets: &Chain,
        blend: &AttrRef,
        value: f64,
    ) -> Result<()> {
        let moved = self.align_chain(sources, targets)?;
        if let Err(e) = self.scene.set_attribute_value(blend, value) {
            self.roll_back(&moved);
            return Err(e.into());
        }
        Ok(())
    }

    /// Snap each target onto its source's world pose, one index at a time
    ///
    /// Returns the pre-alignment pose of every target. On failure every
    /// target already moved in this call is put back.
    fn align_chain<'r>(
        &mut self,
        sources: &'r Chain,
        targets: &'r Chain,
    ) -> Result<Vec<(&'r SceneRef, Pose)>> {
        let mut moved = Vec::with_capacity(targets.len());

        for (index, (source, target)) in sources.iter().zip(targets).enumerate() {
            if let Err(e) = self.align_one(index, source, target, &mut moved) {
                self.roll_back(&moved);
                return Err(e);
            }
        }
        Ok(moved)
    }

    fn align_one<'r>(
        &mut self,
        index: usize,
        source: &'r SceneRef,
        target: &'r SceneRef,
        moved: &mut Vec<(&'r SceneRef, Pose)>,
    ) -> Result<()> {
        let failure = |reason: SceneError| MatchError::AlignmentFailure {
            index,
            source_ref: source.to_string(),
            target_ref: target.to_string(),
            reason,
        };

        let before = self.scene.capture_pose(target).map_err(failure)?;
        let alignment =
            TemporaryAlignment::acquire(&mut *self.scene, source, target).map_err(failure)?;
        // Counted as moved before release so a failed dispose still restores it.
        moved.push((target, before));
        alignment.release().map_err(failure)?;

        tracing::debug!(index, %source, %target, "aligned control");
        Ok(())
    }

    fn roll_back(&mut self, moved: &[(&SceneRef, Pose)]) {
        for (target, pose) in moved.iter().rev() {
            if let Err(e) = self.scene.restore_pose(target, pose) {
                tracing::warn!(%target, error = %e, "failed to restore pose after aborted match");
            }
        }
    }
}
