//! In-memory scene backend
//!
//! Holds just enough of a scene for the tool to run without a host: posed
//! objects, bounded scalar attributes and record nodes. It serializes to
//! JSON so the CLI can load a scene, act on it and write it back.

use crate::core::error::{SceneError, SceneResult};
use crate::core::types::{AlignmentHandle, AttrRef, Bound, Pose, SceneRef};
use crate::scene::SceneBackend;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub pose: Pose,
    #[serde(default)]
    pub locked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub value: f64,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryScene {
    #[serde(default)]
    objects: BTreeMap<String, SceneObject>,
    #[serde(default)]
    attributes: BTreeMap<String, Attribute>,
    #[serde(default)]
    record_nodes: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(skip)]
    alignments: BTreeMap<AlignmentHandle, SceneRef>,
    #[serde(skip)]
    next_handle: u64,
}

/// Scenes compare by content; the handle counter is bookkeeping.
impl PartialEq for InMemoryScene {
    fn eq(&self, other: &Self) -> bool {
        self.objects == other.objects
            && self.attributes == other.attributes
            && self.record_nodes == other.record_nodes
            && self.alignments == other.alignments
    }
}

impl InMemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> crate::core::error::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn save(&self, path: &Path) -> crate::core::error::Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn add_object(&mut self, name: &str, pose: Pose) {
        self.objects.insert(
            name.to_string(),
            SceneObject {
                pose,
                locked: false,
            },
        );
    }

    pub fn set_locked(&mut self, name: &str, locked: bool) -> SceneResult<()> {
        self.object_mut(name)?.locked = locked;
        Ok(())
    }

    pub fn add_attribute(&mut self, name: &str, value: f64, min: Option<f64>, max: Option<f64>) {
        self.attributes
            .insert(name.to_string(), Attribute { value, min, max });
    }

    pub fn object(&self, name: &str) -> Option<&SceneObject> {
        self.objects.get(name)
    }

    /// Number of temporary alignments created and not yet disposed
    pub fn outstanding_alignments(&self) -> usize {
        self.alignments.len()
    }

    fn object_mut(&mut self, name: &str) -> SceneResult<&mut SceneObject> {
        self.objects
            .get_mut(name)
            .ok_or_else(|| SceneError::ObjectNotFound(name.to_string()))
    }

    fn attribute(&self, attr: &AttrRef) -> SceneResult<&Attribute> {
        self.attributes
            .get(attr.as_str())
            .ok_or_else(|| SceneError::AttributeNotFound(attr.to_string()))
    }

    fn node(&self, node: &SceneRef) -> SceneResult<&BTreeMap<String, String>> {
        self.record_nodes
            .get(node.as_str())
            .ok_or_else(|| SceneError::ObjectNotFound(node.to_string()))
    }
}

impl SceneBackend for InMemoryScene {
    fn attribute_bound(&self, attr: &AttrRef, bound: Bound) -> SceneResult<Option<f64>> {
        let attribute = self.attribute(attr)?;
        Ok(match bound {
            Bound::Min => attribute.min,
            Bound::Max => attribute.max,
        })
    }

    fn attribute_value(&self, attr: &AttrRef) -> SceneResult<f64> {
        Ok(self.attribute(attr)?.value)
    }

    fn set_attribute_value(&mut self, attr: &AttrRef, value: f64) -> SceneResult<()> {
        let attribute = self
            .attributes
            .get_mut(attr.as_str())
            .ok_or_else(|| SceneError::AttributeNotFound(attr.to_string()))?;
        attribute.value = value;
        Ok(())
    }

    fn create_temporary_alignment(
        &mut self,
        source: &SceneRef,
        target: &SceneRef,
    ) -> SceneResult<AlignmentHandle> {
        let source_pose = self
            .objects
            .get(source.as_str())
            .ok_or_else(|| SceneError::ObjectNotFound(source.to_string()))?
            .pose;
        let target_obj = self.object_mut(target.as_str())?;
        if target_obj.locked {
            return Err(SceneError::Locked(target.to_string()));
        }

        target_obj.pose = source_pose;

        self.next_handle += 1;
        let handle = AlignmentHandle(self.next_handle);
        self.alignments.insert(handle, target.clone());
        Ok(handle)
    }

    fn dispose(&mut self, handle: AlignmentHandle) -> SceneResult<()> {
        self.alignments
            .remove(&handle)
            .map(|_| ())
            .ok_or(SceneError::UnknownHandle(handle))
    }

    fn capture_pose(&self, object: &SceneRef) -> SceneResult<Pose> {
        self.objects
            .get(object.as_str())
            .map(|obj| obj.pose)
            .ok_or_else(|| SceneError::ObjectNotFound(object.to_string()))
    }

    fn restore_pose(&mut self, object: &SceneRef, pose: &Pose) -> SceneResult<()> {
        self.object_mut(object.as_str())?.pose = *pose;
        Ok(())
    }

    fn create_named_record_node(&mut self, name: &str) -> SceneResult<SceneRef> {
        if self.record_nodes.contains_key(name) || self.objects.contains_key(name) {
            return Err(SceneError::NameCollision(name.to_string()));
        }
        self.record_nodes.insert(name.to_string(), BTreeMap::new());
        Ok(SceneRef::new(name))
    }

    fn find_record_node(&self, name: &str) -> SceneResult<Option<SceneRef>> {
        Ok(self
            .record_nodes
            .contains_key(name)
            .then(|| SceneRef::new(name)))
    }

    fn delete_record_node(&mut self, node: &SceneRef) -> SceneResult<()> {
        self.record_nodes
            .remove(node.as_str())
            .map(|_| ())
            .ok_or_else(|| SceneError::ObjectNotFound(node.to_string()))
    }

    fn rename_record_node(&mut self, node: &SceneRef, name: &str) -> SceneResult<SceneRef> {
        if self.record_nodes.contains_key(name) || self.objects.contains_key(name) {
            return Err(SceneError::NameCollision(name.to_string()));
        }
        let fields = self
            .record_nodes
            .remove(node.as_str())
            .ok_or_else(|| SceneError::ObjectNotFound(node.to_string()))?;
        self.record_nodes.insert(name.to_string(), fields);
        Ok(SceneRef::new(name))
    }

    fn record_node_names(&self) -> SceneResult<Vec<String>> {
        Ok(self.record_nodes.keys().cloned().collect())
    }

    fn set_node_field(&mut self, node: &SceneRef, field: &str, value: &str) -> SceneResult<()> {
        let fields = self
            .record_nodes
            .get_mut(node.as_str())
            .ok_or_else(|| SceneError::ObjectNotFound(node.to_string()))?;
        fields.insert(field.to_string(), value.to_string());
        Ok(())
    }

    fn get_node_field(&self, node: &SceneRef, field: &str) -> SceneResult<String> {
        self.node(node)?
            .get(field)
            .cloned()
            .ok_or_else(|| SceneError::FieldNotFound {
                node: node.to_string(),
                field: field.to_string(),
            })
    }
}
