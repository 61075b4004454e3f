//! Command execution - runs capture and match requests against a scene

use crate::core::config::{MatchConfig, StoreBackend};
use crate::core::error::{MatchError, Result};
use crate::matcher::{LimbMatcher, MatchOutcome, ModeDetector};
use crate::record::builder::{CaptureFields, RecordBuilder};
use crate::record::limb::LimbRecord;
use crate::scene::SceneBackend;
use crate::store::{FileRecordStore, LimbRecordStore, SceneRecordStore};

/// Completion signal for a successful capture
///
/// The input source uses it to close its capture form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureOutcome {
    pub limb_id: String,
    /// An earlier record for the same limb was overwritten
    pub replaced: bool,
}

/// Executes input-source requests: one call is one complete unit of work
pub struct CommandExecutor<S: SceneBackend> {
    scene: S,
    config: MatchConfig,
}

impl<S: SceneBackend> CommandExecutor<S> {
    pub fn new(scene: S, config: MatchConfig) -> Result<Self> {
        config.validate().map_err(MatchError::Config)?;
        Ok(Self { scene, config })
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn into_scene(self) -> S {
        self.scene
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Build a record from the fourteen capture fields and persist it
    pub fn capture(&mut self, raw_fields: Vec<String>) -> Result<CaptureOutcome> {
        let fields = CaptureFields::try_from(raw_fields)?;
        let record = RecordBuilder::new(&self.scene).build(&fields)?;

        let replaced = self.with_store(|store| {
            let replaced = store.contains(&record.limb_id)?;
            store.save(&record)?;
            Ok(replaced)
        })?;

        Ok(CaptureOutcome {
            limb_id: record.limb_id,
            replaced,
        })
    }

    /// Limb ids available for selection
    pub fn list_limbs(&mut self) -> Result<Vec<String>> {
        self.with_store(|store| store.list_ids())
    }

    pub fn show(&mut self, limb_id: &str) -> Result<LimbRecord> {
        let limb_id = selected(limb_id)?;
        self.with_store(|store| store.load(limb_id))
    }

    /// Load the selected limb and switch it to the other kinematic mode
    pub fn match_limb(&mut self, limb_id: &str) -> Result<MatchOutcome> {
        let limb_id = selected(limb_id)?;
        let record = self.with_store(|store| store.load(limb_id))?;

        let detector = ModeDetector::with_tolerance(self.config.blend_tolerance);
        LimbMatcher::with_detector(&mut self.scene, detector).switch(&record)
    }

    /// Run `f` against the configured store strategy
    fn with_store<R>(
        &mut self,
        f: impl FnOnce(&mut dyn LimbRecordStore) -> Result<R>,
    ) -> Result<R> {
        match self.config.backend {
            StoreBackend::File => {
                let mut store = FileRecordStore::with_extension(
                    &self.config.store_dir,
                    self.config.record_extension.as_str(),
                );
                f(&mut store)
            }
            StoreBackend::Scene => {
                let mut store = SceneRecordStore::with_suffix(
                    &mut self.scene,
                    self.config.record_node_suffix.as_str(),
                );
                f(&mut store)
            }
        }
    }
}

fn selected(limb_id: &str) -> Result<&str> {
    let limb_id = limb_id.trim();
    if limb_id.is_empty() {
        return Err(MatchError::NoLimbSelected);
    }
    Ok(limb_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Pose;
    use crate::scene::InMemoryScene;

    fn scene_config() -> MatchConfig {
        MatchConfig {
            backend: StoreBackend::Scene,
            ..MatchConfig::default()
        }
    }

    fn fields(root: &str) -> Vec<String> {
        [
            root, "fkIkBlend", "ikJ1", "ikJ2", "ikJ3", "ikC1", "ikC2", "ikC3", "fkJ1", "fkJ2",
            "fkJ3", "fkC1", "fkC2", "fkC3",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn scene() -> InMemoryScene {
        let mut scene = InMemoryScene::new();
        scene.add_attribute("armL.fkIkBlend", 1.0, Some(0.0), Some(1.0));
        for name in [
            "ikJ1", "ikJ2", "ikJ3", "ikC1", "ikC2", "ikC3", "fkJ1", "fkJ2", "fkJ3", "fkC1",
            "fkC2", "fkC3",
        ] {
            scene.add_object(name, Pose::IDENTITY);
        }
        scene
    }

    #[test]
    fn test_capture_then_match() {
        let mut executor = CommandExecutor::new(scene(), scene_config()).unwrap();

        let outcome = executor.capture(fields("armL")).unwrap();
        assert_eq!(outcome.limb_id, "armL");
        assert!(!outcome.replaced);
        assert_eq!(executor.list_limbs().unwrap(), vec!["armL".to_string()]);

        assert_eq!(executor.match_limb("armL").unwrap(), MatchOutcome::IkToFk);
        assert_eq!(executor.match_limb("armL").unwrap(), MatchOutcome::FkToIk);
    }

    #[test]
    fn test_recapture_reports_replacement() {
        let mut executor = CommandExecutor::new(scene(), scene_config()).unwrap();
        executor.capture(fields("armL")).unwrap();
        assert!(executor.capture(fields("armL")).unwrap().replaced);
    }

    #[test]
    fn test_empty_selection_rejected() {
        let mut executor = CommandExecutor::new(scene(), scene_config()).unwrap();
        assert!(matches!(
            executor.match_limb("  "),
            Err(MatchError::NoLimbSelected)
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = MatchConfig {
            record_node_suffix: String::new(),
            ..scene_config()
        };
        assert!(matches!(
            CommandExecutor::new(scene(), config),
            Err(MatchError::Config(_))
        ));
    }

    #[test]
    fn test_file_backend_uses_store_dir() {
        let temp = tempfile::tempdir().unwrap();
        let config = MatchConfig {
            store_dir: temp.path().to_path_buf(),
            ..MatchConfig::default()
        };
        let mut executor = CommandExecutor::new(scene(), config).unwrap();
        executor.capture(fields("armL")).unwrap();
        assert!(temp.path().join("armL.json").is_file());
        assert_eq!(executor.show("armL").unwrap().limb_id, "armL");
    }

    #[test]
    fn test_unknown_blend_attribute_saves_nothing() {
        let mut executor = CommandExecutor::new(scene(), scene_config()).unwrap();
        assert!(matches!(
            executor.capture(fields("|rig|legR")),
            Err(MatchError::Scene(_))
        ));
        assert!(executor.list_limbs().unwrap().is_empty());
    }
}
