//! Kinematic mode detection

use crate::record::limb::LimbRecord;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KinematicMode {
    /// Blend value sits on the FK bound
    FkActive,
    /// Blend value sits on the IK bound
    IkActive,
    /// Anywhere else; this tool does not resolve partial blends
    Blended { current: f64 },
}

/// Compares a live blend value against a record's bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeDetector {
    tolerance: f64,
}

impl ModeDetector {
    /// Exact equality against the stored bounds
    pub fn exact() -> Self {
        Self { tolerance: 0.0 }
    }

    /// Accept values within `tolerance` of a bound. Negative or NaN
    /// tolerances fall back to exact matching.
    pub fn with_tolerance(tolerance: f64) -> Self {
        let tolerance = if tolerance.is_finite() && tolerance > 0.0 {
            tolerance
        } else {
            0.0
        };
        Self { tolerance }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn detect(&self, record: &LimbRecord, current: f64) -> KinematicMode {
        // FK is checked first, so an overlapping tolerance window favors FK.
        if self.matches(current, record.fk_blend_value) {
            KinematicMode::FkActive
        } else if self.matches(current, record.ik_blend_value) {
            KinematicMode::IkActive
        } else {
            KinematicMode::Blended { current }
        }
    }

    fn matches(&self, current: f64, bound: f64) -> bool {
        if self.tolerance == 0.0 {
            current == bound
        } else {
            (current - bound).abs() <= self.tolerance
        }
    }
}

impl Default for ModeDetector {
    fn default() -> Self {
        Self::exact()
    }
}
