/// Camera - the blender's view of a host camera.
///
/// The host owns the real camera node and mirrors its world transform and
/// group tags here. The blender writes back the composited environment and
/// the list of volumes that produced it; the host copies that environment
/// into the camera's render state.

use glam::{Mat4, Vec3};
use rustc_hash::FxHashSet;
use slotmap::new_key_type;
use crate::environment::Environment;
use crate::volume::VolumeKey;

// ===== SLOT MAP KEY =====

new_key_type! {
    /// Stable handle for a camera tracked by the blender.
    ///
    /// Becomes invalid when the camera is removed; every volume association
    /// is dropped at the same time.
    pub struct CameraKey;
}

// ===== CAMERA =====

/// Volume currently contributing to a camera, with its blend strength.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraContribution {
    pub volume: VolumeKey,
    pub strength: f32,
}

/// Tracked camera: transform, group tags and applied environment.
#[derive(Debug, Clone)]
pub struct Camera {
    transform: Mat4,
    groups: FxHashSet<String>,
    environment: Environment,
    contributions: Vec<CameraContribution>,
}

impl Camera {
    /// Create a camera with the given world transform, in no group.
    pub fn new(transform: Mat4) -> Self {
        Self {
            transform,
            groups: FxHashSet::default(),
            environment: Environment::default(),
            contributions: Vec::new(),
        }
    }

    /// Create a camera at a world position (identity rotation).
    pub fn at_position(position: Vec3) -> Self {
        Self::new(Mat4::from_translation(position))
    }

    /// Builder-style group tagging.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.groups.insert(group.into());
        self
    }

    // ===== TRANSFORM =====

    /// World transform.
    pub fn transform(&self) -> &Mat4 {
        &self.transform
    }

    /// Set the world transform.
    pub fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
    }

    /// World position (translation of the transform).
    pub fn position(&self) -> Vec3 {
        self.transform.col(3).truncate()
    }

    /// Move the camera, keeping its rotation.
    pub fn set_position(&mut self, position: Vec3) {
        self.transform.w_axis = position.extend(1.0);
    }

    // ===== GROUPS =====

    /// Tag the camera with a group. Returns false if already tagged.
    pub fn add_to_group(&mut self, group: impl Into<String>) -> bool {
        self.groups.insert(group.into())
    }

    /// Remove a group tag. Returns false if the camera was not tagged.
    pub fn remove_from_group(&mut self, group: &str) -> bool {
        self.groups.remove(group)
    }

    /// Whether the camera carries the group tag.
    pub fn is_in_group(&self, group: &str) -> bool {
        self.groups.contains(group)
    }

    /// All group tags (unordered).
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(String::as_str)
    }

    // ===== APPLIED STATE =====

    /// Environment applied on the last blender tick.
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Volumes that contributed on the last tick, in composition order.
    pub fn contributions(&self) -> &[CameraContribution] {
        &self.contributions
    }

    /// Store the composited result (blender only).
    pub(crate) fn apply(&mut self, environment: Environment, contributions: Vec<CameraContribution>) {
        self.environment = environment;
        self.contributions = contributions;
    }

    /// Drop a volume from the contribution list (on detach).
    pub(crate) fn forget_volume(&mut self, volume: VolumeKey) {
        self.contributions.retain(|c| c.volume != volume);
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
