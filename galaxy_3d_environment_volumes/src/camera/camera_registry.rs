/// CameraRegistry - arena of tracked cameras plus the default viewport's
/// active camera.
///
/// Stands in for the host queries "nodes in group X" and "active camera of
/// the default viewport" used by camera discovery.

use slotmap::SlotMap;
use super::camera::{Camera, CameraKey};

/// Arena of cameras addressed by stable keys.
#[derive(Debug, Default)]
pub struct CameraRegistry {
    cameras: SlotMap<CameraKey, Camera>,
    /// Active camera of the default viewport, if any
    active_camera: Option<CameraKey>,
}

impl CameraRegistry {
    /// Create an empty registry with no active camera.
    pub fn new() -> Self {
        Self {
            cameras: SlotMap::with_key(),
            active_camera: None,
        }
    }

    /// Track a camera. The key stays valid until `remove`.
    pub fn insert(&mut self, camera: Camera) -> CameraKey {
        self.cameras.insert(camera)
    }

    /// Stop tracking a camera. Clears the active camera if it was this one.
    pub fn remove(&mut self, key: CameraKey) -> Option<Camera> {
        let camera = self.cameras.remove(key)?;
        if self.active_camera == Some(key) {
            self.active_camera = None;
        }
        Some(camera)
    }

    /// Whether the key refers to a tracked camera.
    pub fn contains(&self, key: CameraKey) -> bool {
        self.cameras.contains_key(key)
    }

    /// Get a camera by key.
    pub fn get(&self, key: CameraKey) -> Option<&Camera> {
        self.cameras.get(key)
    }

    /// Get a camera mutably by key.
    pub fn get_mut(&mut self, key: CameraKey) -> Option<&mut Camera> {
        self.cameras.get_mut(key)
    }

    /// Iterate over all cameras (key, camera).
    pub fn iter(&self) -> impl Iterator<Item = (CameraKey, &Camera)> {
        self.cameras.iter()
    }

    /// Iterate mutably over all cameras.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (CameraKey, &mut Camera)> {
        self.cameras.iter_mut()
    }

    /// Number of tracked cameras.
    pub fn len(&self) -> usize {
        self.cameras.len()
    }

    /// Whether no camera is tracked.
    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }

    /// Set the default viewport's active camera.
    ///
    /// Returns false (and changes nothing) if the key is not tracked.
    pub fn set_active(&mut self, key: Option<CameraKey>) -> bool {
        match key {
            Some(k) if !self.cameras.contains_key(k) => false,
            _ => {
                self.active_camera = key;
                true
            }
        }
    }

    /// Active camera of the default viewport.
    pub fn active(&self) -> Option<CameraKey> {
        self.active_camera
    }

    /// Cameras tagged with `group`, in arena order.
    pub fn in_group(&self, group: &str) -> Vec<CameraKey> {
        self.cameras
            .iter()
            .filter(|(_, camera)| camera.is_in_group(group))
            .map(|(key, _)| key)
            .collect()
    }

    /// Cameras a volume with this camera group affects.
    ///
    /// The tagged cameras when the group is non-empty, otherwise the
    /// default viewport's active camera, otherwise nothing.
    pub fn discover(&self, group: &str) -> Vec<CameraKey> {
        let tagged = self.in_group(group);
        if !tagged.is_empty() {
            return tagged;
        }
        self.active_camera.into_iter().collect()
    }
}

#[cfg(test)]
#[path = "camera_registry_tests.rs"]
mod tests;
