//! File-backed store: one JSON file per limb

use crate::core::error::{MatchError, Result};
use crate::record::limb::{validate_limb_id, LimbRecord};
use crate::store::{LimbRecordStore, StoredRecord};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FileRecordStore {
    dir: PathBuf,
    extension: String,
}

impl FileRecordStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_extension(dir, "json")
    }

    pub fn with_extension(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, limb_id: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", limb_id, self.extension))
    }
}

impl LimbRecordStore for FileRecordStore {
    fn save(&mut self, record: &LimbRecord) -> Result<()> {
        record.validate()?;
        fs::create_dir_all(&self.dir)?;

        let path = self.record_path(&record.limb_id);
        let json = serde_json::to_string_pretty(&StoredRecord::from_record(record))?;

        // Written beside the record and renamed over it, so the old file
        // stays whole until the new one is complete.
        let staged = path.with_extension(format!("{}.tmp", self.extension));
        if let Err(e) = fs::write(&staged, json).and_then(|()| fs::rename(&staged, &path)) {
            let _ = fs::remove_file(&staged);
            return Err(e.into());
        }

        tracing::info!(limb_id = %record.limb_id, path = %path.display(), "saved limb record");
        Ok(())
    }

    fn load(&self, limb_id: &str) -> Result<LimbRecord> {
        validate_limb_id(limb_id)?;
        let path = self.record_path(limb_id);
        if !path.is_file() {
            return Err(MatchError::RecordNotFound(limb_id.to_string()));
        }

        let contents = fs::read_to_string(&path)?;
        let stored: StoredRecord =
            serde_json::from_str(&contents).map_err(|e| MatchError::CorruptRecord {
                limb_id: limb_id.to_string(),
                reason: format!("{}: {}", path.display(), e),
            })?;
        stored.into_record(limb_id)
    }

    fn list_ids(&self) -> Result<Vec<String>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().map_or(true, |ext| ext != self.extension.as_str()) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::limb::tests::arm_record;

    #[test]
    fn test_save_creates_directory() {
        let temp = tempfile::tempdir().unwrap();
        let mut store = FileRecordStore::new(temp.path().join("rigs_data"));
        store.save(&arm_record()).unwrap();
        assert!(temp.path().join("rigs_data/armL.json").is_file());
    }

    #[test]
    fn test_missing_directory_lists_nothing() {
        let temp = tempfile::tempdir().unwrap();
        let store = FileRecordStore::new(temp.path().join("absent"));
        assert!(store.list_ids().unwrap().is_empty());
    }

    #[test]
    fn test_list_ignores_other_files() {
        let temp = tempfile::tempdir().unwrap();
        let mut store = FileRecordStore::new(temp.path());
        store.save(&arm_record()).unwrap();
        fs::write(temp.path().join("notes.txt"), "hello").unwrap();
        fs::create_dir(temp.path().join("nested.json")).unwrap();
        assert_eq!(store.list_ids().unwrap(), vec!["armL".to_string()]);
    }

    #[test]
    fn test_load_unknown_is_not_found() {
        let temp = tempfile::tempdir().unwrap();
        let store = FileRecordStore::new(temp.path());
        assert!(matches!(
            store.load("legR"),
            Err(MatchError::RecordNotFound(id)) if id == "legR"
        ));
    }

    #[test]
    fn test_malformed_file_is_corrupt() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("armL.json"), "{ not json").unwrap();
        let store = FileRecordStore::new(temp.path());
        assert!(matches!(
            store.load("armL"),
            Err(MatchError::CorruptRecord { .. })
        ));
    }

    #[test]
    fn test_failed_resave_keeps_previous_file() {
        let temp = tempfile::tempdir().unwrap();
        let mut store = FileRecordStore::new(temp.path());
        store.save(&arm_record()).unwrap();

        // A directory squatting on the staging path makes the write fail.
        fs::create_dir(temp.path().join("armL.json.tmp")).unwrap();
        let mut updated = arm_record();
        updated.ik_blend_value = 10.0;
        assert!(matches!(store.save(&updated), Err(MatchError::Io(_))));

        assert_eq!(store.load("armL").unwrap(), arm_record());
        assert_eq!(store.list_ids().unwrap(), vec!["armL".to_string()]);
    }

    #[test]
    fn test_resave_leaves_no_staging_file() {
        let temp = tempfile::tempdir().unwrap();
        let mut store = FileRecordStore::new(temp.path());
        store.save(&arm_record()).unwrap();
        store.save(&arm_record()).unwrap();

        let names: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("armL.json")]);
    }

    #[test]
    fn test_file_stores_bounds_as_text() {
        let temp = tempfile::tempdir().unwrap();
        let mut store = FileRecordStore::new(temp.path());
        store.save(&arm_record()).unwrap();
        let json = fs::read_to_string(temp.path().join("armL.json")).unwrap();
        assert!(json.contains("\"fk_blend_value\": \"0\""));
        assert!(json.contains("\"ik_control_01\": \"ikC1\""));
    }
}
