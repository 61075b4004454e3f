//! Scene backend contract
//!
//! The host scene graph is the one shared mutable resource. The core reads
//! and writes attributes, borrows the host's evaluation engine through
//! temporary alignments, and (for the scene-embedded store) keeps record
//! nodes in it. Everything else about the host stays behind this trait.

pub mod memory;

use crate::core::error::SceneResult;
use crate::core::types::{AlignmentHandle, AttrRef, Bound, Pose, SceneRef};

pub use memory::InMemoryScene;

pub trait SceneBackend {
    /// Declared min or max of an attribute, `None` if the attribute has no such limit
    fn attribute_bound(&self, attr: &AttrRef, bound: Bound) -> SceneResult<Option<f64>>;

    fn attribute_value(&self, attr: &AttrRef) -> SceneResult<f64>;

    fn set_attribute_value(&mut self, attr: &AttrRef, value: f64) -> SceneResult<()>;

    /// Drive `target` onto the world pose of `source` until the handle is disposed
    fn create_temporary_alignment(
        &mut self,
        source: &SceneRef,
        target: &SceneRef,
    ) -> SceneResult<AlignmentHandle>;

    /// Remove a temporary alignment; the target keeps the pose it was given
    fn dispose(&mut self, handle: AlignmentHandle) -> SceneResult<()>;

    fn capture_pose(&self, object: &SceneRef) -> SceneResult<Pose>;

    fn restore_pose(&mut self, object: &SceneRef, pose: &Pose) -> SceneResult<()>;

    fn create_named_record_node(&mut self, name: &str) -> SceneResult<SceneRef>;

    fn find_record_node(&self, name: &str) -> SceneResult<Option<SceneRef>>;

    fn delete_record_node(&mut self, node: &SceneRef) -> SceneResult<()>;

    /// Give a record node a new name, failing if the name is taken
    fn rename_record_node(&mut self, node: &SceneRef, name: &str) -> SceneResult<SceneRef>;

    /// Names of every record node currently in the scene
    fn record_node_names(&self) -> SceneResult<Vec<String>>;

    fn set_node_field(&mut self, node: &SceneRef, field: &str, value: &str) -> SceneResult<()>;

    fn get_node_field(&self, node: &SceneRef, field: &str) -> SceneResult<String>;
}

/// A temporary alignment that is disposed exactly once
///
/// Call [`TemporaryAlignment::release`] to dispose and observe the result.
/// If the guard is dropped on an early return instead, `Drop` disposes it
/// and logs any failure.
pub struct TemporaryAlignment<'s, B: SceneBackend + ?Sized> {
    scene: &'s mut B,
    handle: Option<AlignmentHandle>,
}

impl<'s, B: SceneBackend + ?Sized> TemporaryAlignment<'s, B> {
    pub fn acquire(scene: &'s mut B, source: &SceneRef, target: &SceneRef) -> SceneResult<Self> {
        let handle = scene.create_temporary_alignment(source, target)?;
        Ok(Self {
            scene,
            handle: Some(handle),
        })
    }

    pub fn handle(&self) -> Option<AlignmentHandle> {
        self.handle
    }

    pub fn release(mut self) -> SceneResult<()> {
        match self.handle.take() {
            Some(handle) => self.scene.dispose(handle),
            None => Ok(()),
        }
    }
}

impl<B: SceneBackend + ?Sized> Drop for TemporaryAlignment<'_, B> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = self.scene.dispose(handle) {
                tracing::warn!(?handle, error = %e, "failed to dispose temporary alignment");
            }
        }
    }
}
