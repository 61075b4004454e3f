//! Capture-to-match workflow tests through the command executor
//!
//! Exercises the full path an input source drives: fourteen raw fields in,
//! a stored record, a later match by selected id.

use limb_match::command::CommandExecutor;
use limb_match::core::config::{MatchConfig, StoreBackend};
use limb_match::core::error::MatchError;
use limb_match::core::types::{AttrRef, Pose, SceneRef};
use limb_match::matcher::MatchOutcome;
use limb_match::record::FIELD_COUNT;
use limb_match::scene::{InMemoryScene, SceneBackend};
use std::path::Path;

const OBJECTS: [&str; 12] = [
    "ikJ1", "ikJ2", "ikJ3", "ikC1", "ikC2", "ikC3", "fkJ1", "fkJ2", "fkJ3", "fkC1", "fkC2", "fkC3",
];

fn arm_fields() -> Vec<String> {
    let mut fields = vec!["|rig|ctrl_grp|armL".to_string(), "fkIkBlend".to_string()];
    fields.extend(OBJECTS.iter().map(|s| s.to_string()));
    assert_eq!(fields.len(), FIELD_COUNT);
    fields
}

fn arm_scene(blend: f64) -> InMemoryScene {
    let mut scene = InMemoryScene::new();
    scene.add_attribute("|rig|ctrl_grp|armL.fkIkBlend", blend, Some(0.0), Some(1.0));
    for name in OBJECTS {
        scene.add_object(name, Pose::IDENTITY);
    }
    scene
}

fn file_config(dir: &Path) -> MatchConfig {
    MatchConfig {
        store_dir: dir.to_path_buf(),
        backend: StoreBackend::File,
        ..MatchConfig::default()
    }
}

fn scene_config() -> MatchConfig {
    MatchConfig {
        backend: StoreBackend::Scene,
        ..MatchConfig::default()
    }
}

#[test]
fn test_capture_stores_full_record() {
    let temp = tempfile::tempdir().unwrap();
    let mut executor = CommandExecutor::new(arm_scene(1.0), file_config(temp.path())).unwrap();

    let outcome = executor.capture(arm_fields()).unwrap();
    assert_eq!(outcome.limb_id, "armL");

    let record = executor.show("armL").unwrap();
    assert_eq!(record.blend_attribute, AttrRef::from("|rig|ctrl_grp|armL.fkIkBlend"));
    assert_eq!(record.fk_blend_value, 0.0);
    assert_eq!(record.ik_blend_value, 1.0);
    assert_eq!(record.ik_joints[0], SceneRef::from("ikJ1"));
    assert_eq!(record.ik_controls[2], SceneRef::from("ikC3"));
    assert_eq!(record.fk_joints[1], SceneRef::from("fkJ2"));
    assert_eq!(record.fk_controls[0], SceneRef::from("fkC1"));
}

#[test]
fn test_scenario_d_missing_ik_control() {
    let temp = tempfile::tempdir().unwrap();
    let mut executor = CommandExecutor::new(arm_scene(1.0), file_config(temp.path())).unwrap();
    let ids_before = executor.list_limbs().unwrap();

    let mut fields = arm_fields();
    fields[7] = String::new();

    match executor.capture(fields) {
        Err(MatchError::MissingField { fields }) => assert_eq!(fields, vec!["ik_control_03"]),
        other => panic!("expected MissingField, got {:?}", other),
    }
    assert_eq!(executor.list_limbs().unwrap(), ids_before);
}

#[test]
fn test_any_empty_field_blocks_capture() {
    for index in 0..FIELD_COUNT {
        let mut executor = CommandExecutor::new(arm_scene(1.0), scene_config()).unwrap();
        let mut fields = arm_fields();
        fields[index] = String::new();

        assert!(
            matches!(executor.capture(fields), Err(MatchError::MissingField { .. })),
            "field {} empty should fail",
            index
        );
        assert!(executor.list_limbs().unwrap().is_empty());
    }
}

#[test]
fn test_field_count_checked() {
    let mut executor = CommandExecutor::new(arm_scene(1.0), scene_config()).unwrap();
    let mut fields = arm_fields();
    fields.push("extra".into());
    assert!(matches!(
        executor.capture(fields),
        Err(MatchError::FieldCount { expected: 14, got: 15 })
    ));
}

#[test]
fn test_degenerate_blend_range_rejected() {
    let mut scene = arm_scene(1.0);
    scene.add_attribute("|rig|ctrl_grp|armL.fkIkBlend", 1.0, Some(1.0), Some(1.0));
    let mut executor = CommandExecutor::new(scene, scene_config()).unwrap();

    assert!(matches!(
        executor.capture(arm_fields()),
        Err(MatchError::DegenerateBlendRange { .. })
    ));
    assert!(executor.list_limbs().unwrap().is_empty());
}

#[test]
fn test_match_unknown_limb() {
    let temp = tempfile::tempdir().unwrap();
    let mut executor = CommandExecutor::new(arm_scene(1.0), file_config(temp.path())).unwrap();
    assert!(matches!(
        executor.match_limb("armL"),
        Err(MatchError::RecordNotFound(id)) if id == "armL"
    ));
}

#[test]
fn test_capture_then_match_both_backends() {
    let temp = tempfile::tempdir().unwrap();
    for config in [file_config(temp.path()), scene_config()] {
        let mut executor = CommandExecutor::new(arm_scene(1.0), config).unwrap();
        executor.capture(arm_fields()).unwrap();

        assert_eq!(executor.match_limb("armL").unwrap(), MatchOutcome::IkToFk);
        let blend = executor
            .scene()
            .attribute_value(&AttrRef::from("|rig|ctrl_grp|armL.fkIkBlend"))
            .unwrap();
        assert_eq!(blend, 0.0);
        assert_eq!(executor.scene().outstanding_alignments(), 0);
    }
}

#[test]
fn test_scene_store_travels_with_scene_file() {
    let temp = tempfile::tempdir().unwrap();
    let scene_path = temp.path().join("rig.json");

    let mut executor = CommandExecutor::new(arm_scene(0.0), scene_config()).unwrap();
    executor.capture(arm_fields()).unwrap();
    executor.into_scene().save(&scene_path).unwrap();

    let scene = InMemoryScene::load(&scene_path).unwrap();
    let mut executor = CommandExecutor::new(scene, scene_config()).unwrap();
    assert_eq!(executor.list_limbs().unwrap(), vec!["armL".to_string()]);
    assert_eq!(executor.match_limb("armL").unwrap(), MatchOutcome::FkToIk);
}

#[test]
fn test_config_file_selects_backend() {
    let temp = tempfile::tempdir().unwrap();
    let config_path = temp.path().join("limb_match.toml");
    std::fs::write(
        &config_path,
        "backend = \"scene\"\nrecord_node_suffix = \"_IKFK\"\n",
    )
    .unwrap();

    let config = MatchConfig::load(&config_path).unwrap();
    let mut executor = CommandExecutor::new(arm_scene(1.0), config).unwrap();
    executor.capture(arm_fields()).unwrap();

    assert!(executor.scene().find_record_node("armL_IKFK").unwrap().is_some());
}
