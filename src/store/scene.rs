//! Scene-embedded store: one `{limb_id}_DATA` record node per limb

use crate::core::error::{MatchError, Result, SceneError};
use crate::core::types::SceneRef;
use crate::record::limb::{validate_limb_id, LimbRecord};
use crate::scene::SceneBackend;
use crate::store::{LimbRecordStore, StoredRecord};

pub const DEFAULT_NODE_SUFFIX: &str = "_DATA";

/// Appended to a record node name while a save is being written
const STAGED_SUFFIX: &str = "_staged";
/// Appended to the live node name while a staged node is swapped in
const REPLACED_SUFFIX: &str = "_replaced";

/// Keeps records inside the scene they describe
pub struct SceneRecordStore<'s, B: SceneBackend + ?Sized> {
    scene: &'s mut B,
    suffix: String,
}

impl<'s, B: SceneBackend + ?Sized> SceneRecordStore<'s, B> {
    pub fn new(scene: &'s mut B) -> Self {
        Self::with_suffix(scene, DEFAULT_NODE_SUFFIX)
    }

    pub fn with_suffix(scene: &'s mut B, suffix: impl Into<String>) -> Self {
        Self {
            scene,
            suffix: suffix.into(),
        }
    }

    fn node_name(&self, limb_id: &str) -> String {
        format!("{}{}", limb_id, self.suffix)
    }

    fn write_fields(&mut self, node: &SceneRef, stored: &StoredRecord) -> Result<()> {
        for (field, value) in stored.fields() {
            self.scene.set_node_field(node, field, value)?;
        }
        Ok(())
    }

    /// Move the live node aside, rename `staged` into its place, then drop the old one
    fn swap_in(&mut self, staged: &SceneRef, name: &str) -> Result<()> {
        let replaced_name = format!("{}{}", name, REPLACED_SUFFIX);
        let previous = match self.scene.find_record_node(name)? {
            Some(live) => {
                if let Some(stale) = self.scene.find_record_node(&replaced_name)? {
                    self.scene.delete_record_node(&stale)?;
                }
                Some(self.scene.rename_record_node(&live, &replaced_name)?)
            }
            None => None,
        };

        if let Err(e) = self.scene.rename_record_node(staged, name) {
            if let Some(previous) = &previous {
                if let Err(restore) = self.scene.rename_record_node(previous, name) {
                    tracing::warn!(node = %previous, error = %restore, "failed to restore replaced record node");
                }
            }
            return Err(e.into());
        }

        if let Some(previous) = previous {
            if let Err(e) = self.scene.delete_record_node(&previous) {
                tracing::warn!(node = %previous, error = %e, "failed to delete replaced record node");
            }
        }
        Ok(())
    }

    fn discard(&mut self, node: &SceneRef) {
        if let Err(e) = self.scene.delete_record_node(node) {
            tracing::warn!(%node, error = %e, "failed to remove staged record node");
        }
    }
}

impl<B: SceneBackend + ?Sized> LimbRecordStore for SceneRecordStore<'_, B> {
    /// Writes into a staged node and only renames it over the live node once
    /// every field is set, so a failed save leaves the previous record intact.
    fn save(&mut self, record: &LimbRecord) -> Result<()> {
        record.validate()?;
        let name = self.node_name(&record.limb_id);
        let staged_name = format!("{}{}", name, STAGED_SUFFIX);

        if let Some(stale) = self.scene.find_record_node(&staged_name)? {
            self.scene.delete_record_node(&stale)?;
        }
        let staged = self.scene.create_named_record_node(&staged_name)?;

        let stored = StoredRecord::from_record(record);
        let written = self
            .write_fields(&staged, &stored)
            .and_then(|()| self.swap_in(&staged, &name));
        if let Err(e) = written {
            self.discard(&staged);
            return Err(e);
        }

        tracing::info!(limb_id = %record.limb_id, node = %name, "saved limb record");
        Ok(())
    }

    fn load(&self, limb_id: &str) -> Result<LimbRecord> {
        validate_limb_id(limb_id)?;
        let node = self
            .scene
            .find_record_node(&self.node_name(limb_id))?
            .ok_or_else(|| MatchError::RecordNotFound(limb_id.to_string()))?;

        let stored = StoredRecord::from_lookup(|field| {
            self.scene
                .get_node_field(&node, field)
                .map_err(|e| match e {
                    SceneError::FieldNotFound { .. } => MatchError::CorruptRecord {
                        limb_id: limb_id.to_string(),
                        reason: e.to_string(),
                    },
                    other => other.into(),
                })
        })?;
        stored.into_record(limb_id)
    }

    fn list_ids(&self) -> Result<Vec<String>> {
        let mut ids: Vec<String> = self
            .scene
            .record_node_names()?
            .into_iter()
            .filter_map(|name| name.strip_suffix(self.suffix.as_str()).map(str::to_string))
            .filter(|id| !id.is_empty())
            .collect();
        ids.sort();
        Ok(ids)
    }
}
