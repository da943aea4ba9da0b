/// EnvironmentVolume - a box region applying an environment to nearby cameras.
///
/// The region is a local-space box of half-extents `size` centered on the
/// volume origin (`inner_bounds`), surrounded by a margin of
/// `blend_distance` (`outer_bounds`) over which the weight ramps from 1 to 0.
/// Cameras are evaluated in the volume's local space, so the margin scales
/// with the volume transform.
///
/// Per-camera blend strengths live on the volume; the blender steps them
/// every tick and reads them back for composition.

use bitflags::bitflags;
use glam::{Mat4, Vec3};
use rustc_hash::FxHashMap;
use slotmap::new_key_type;
use std::sync::Arc;
use crate::camera::CameraKey;
use crate::environment::EnvironmentRef;
use crate::math::{is_equal_approx, is_vec3_equal_approx, AABB};

// ===== SLOT MAP KEY =====

new_key_type! {
    /// Stable handle for a volume attached to the blender.
    pub struct VolumeKey;
}

/// Camera group a volume affects unless configured otherwise
pub const DEFAULT_CAMERA_GROUP: &str = "EnvironmentVolumeCameras";

// ===== NOTIFICATIONS =====

bitflags! {
    /// Pending host notifications raised by property setters.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct VolumeNotifications: u32 {
        /// Inspector must re-read the property list
        const PROPERTY_LIST_CHANGED = 1 << 0;
        /// Editor gizmo geometry changed
        const GIZMOS_UPDATE         = 1 << 1;
    }
}

// ===== VOLUME =====

/// Spatial region with an environment and blend parameters.
#[derive(Debug, Clone)]
pub struct EnvironmentVolume {
    size: Vec3,
    environment: Option<EnvironmentRef>,
    blend_time: f32,
    blend_distance: f32,
    priority: i32,
    camera_group: String,
    transform: Mat4,
    inverse_transform: Mat4,
    inner_bounds: AABB,
    outer_bounds: AABB,
    camera_blend_strengths: FxHashMap<CameraKey, f32>,
    notifications: VolumeNotifications,
}

impl Default for EnvironmentVolume {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvironmentVolume {
    /// Create a volume of half-extents (1, 1, 1) at the origin, with no
    /// environment, instant blending and no blend margin.
    pub fn new() -> Self {
        let mut volume = Self {
            size: Vec3::ONE,
            environment: None,
            blend_time: 0.0,
            blend_distance: 0.0,
            priority: 0,
            camera_group: DEFAULT_CAMERA_GROUP.to_string(),
            transform: Mat4::IDENTITY,
            inverse_transform: Mat4::IDENTITY,
            inner_bounds: AABB::default(),
            outer_bounds: AABB::default(),
            camera_blend_strengths: FxHashMap::default(),
            notifications: VolumeNotifications::empty(),
        };
        volume.update_bounds();
        volume
    }

    // ===== PROPERTIES =====

    /// Half-extents of the inner box.
    pub fn size(&self) -> Vec3 {
        self.size
    }

    /// Set the half-extents. No-op if approximately unchanged; non-finite
    /// extents are rejected.
    ///
    /// Recomputes both bounds and raises `PROPERTY_LIST_CHANGED | GIZMOS_UPDATE`.
    pub fn set_size(&mut self, size: Vec3) -> bool {
        if !size.is_finite() {
            crate::plugin_warn!("galaxy3d::EnvironmentVolume",
                "Ignoring non-finite volume size {:?}", size);
            return false;
        }
        if is_vec3_equal_approx(size, self.size) {
            return false;
        }

        self.size = size;
        self.update_bounds();
        self.notifications |= VolumeNotifications::PROPERTY_LIST_CHANGED
            | VolumeNotifications::GIZMOS_UPDATE;
        true
    }

    /// Environment applied by this volume.
    pub fn environment(&self) -> Option<&EnvironmentRef> {
        self.environment.as_ref()
    }

    /// Swap the environment resource. No-op for the same reference.
    ///
    /// All camera associations are dropped under the old environment; the
    /// cameras that were associated are re-registered at strength 0 under
    /// the new one so it fades in. With `None`, no camera stays associated.
    pub fn set_environment(&mut self, environment: Option<EnvironmentRef>) -> bool {
        let same = match (&self.environment, &environment) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        if same {
            return false;
        }

        let cameras = self.clear_cameras();
        self.environment = environment;
        if self.environment.is_some() {
            for camera in cameras {
                self.register_camera(camera);
            }
        }
        true
    }

    /// Seconds needed to go from strength 0 to 1.
    pub fn blend_time(&self) -> f32 {
        self.blend_time
    }

    /// Set the blend time (clamped to >= 0). No-op if approximately unchanged.
    pub fn set_blend_time(&mut self, blend_time: f32) -> bool {
        let blend_time = blend_time.max(0.0);
        if is_equal_approx(blend_time, self.blend_time) {
            return false;
        }

        self.blend_time = blend_time;
        true
    }

    /// Margin around the inner box over which the weight ramps to 0.
    pub fn blend_distance(&self) -> f32 {
        self.blend_distance
    }

    /// Set the blend margin (clamped to >= 0). No-op if approximately unchanged.
    ///
    /// Recomputes the outer bounds and raises `GIZMOS_UPDATE`.
    pub fn set_blend_distance(&mut self, blend_distance: f32) -> bool {
        let blend_distance = blend_distance.max(0.0);
        if is_equal_approx(blend_distance, self.blend_distance) {
            return false;
        }

        self.blend_distance = blend_distance;
        self.update_bounds();
        self.notifications |= VolumeNotifications::GIZMOS_UPDATE;
        true
    }

    /// Priority used for ordering contributions (higher is composited last).
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Set the priority. No-op if unchanged.
    pub fn set_priority(&mut self, priority: i32) -> bool {
        if priority == self.priority {
            return false;
        }
        self.priority = priority;
        true
    }

    /// Group tag of the cameras this volume affects.
    pub fn camera_group(&self) -> &str {
        &self.camera_group
    }

    /// Change the camera group. Cameras outside the new group fade out.
    pub fn set_camera_group(&mut self, group: impl Into<String>) -> bool {
        let group = group.into();
        if group == self.camera_group {
            return false;
        }
        self.camera_group = group;
        true
    }

    // ===== TRANSFORM =====

    /// World transform of the volume.
    pub fn transform(&self) -> &Mat4 {
        &self.transform
    }

    /// Set the world transform. Degenerate (non-invertible) transforms are rejected.
    pub fn set_transform(&mut self, transform: Mat4) -> bool {
        if transform == self.transform {
            return false;
        }
        let inverse = transform.inverse();
        if !inverse.is_finite() {
            crate::plugin_warn!("galaxy3d::EnvironmentVolume",
                "Ignoring non-invertible volume transform");
            return false;
        }
        self.transform = transform;
        self.inverse_transform = inverse;
        true
    }

    /// Convenience: place the volume at a world position without rotation.
    pub fn set_position(&mut self, position: Vec3) -> bool {
        self.set_transform(Mat4::from_translation(position))
    }

    /// Convert a world-space point into the volume's local space.
    pub fn to_local(&self, world_point: Vec3) -> Vec3 {
        self.inverse_transform.transform_point3(world_point)
    }

    // ===== BOUNDS =====

    /// Full-weight box in local space.
    pub fn inner_bounds(&self) -> &AABB {
        &self.inner_bounds
    }

    /// Inner box grown by `blend_distance`, in local space.
    pub fn outer_bounds(&self) -> &AABB {
        &self.outer_bounds
    }

    /// World-space box enclosing the outer bounds.
    pub fn world_outer_bounds(&self) -> AABB {
        self.outer_bounds.transformed(&self.transform)
    }

    fn update_bounds(&mut self) {
        self.inner_bounds = AABB::from_center_half_extents(Vec3::ZERO, self.size);
        self.outer_bounds = self.inner_bounds.grow(self.blend_distance);
    }

    /// Instantaneous weight for a camera at `world_point`.
    ///
    /// 1 inside (or on) the inner box, `1 - d / blend_distance` in the
    /// margin where `d` is the distance to the closest point of the inner
    /// box, 0 beyond the margin.
    pub fn target_weight(&self, world_point: Vec3) -> f32 {
        let local = self.to_local(world_point);
        if self.inner_bounds.contains_point(local) {
            return 1.0;
        }
        if self.blend_distance <= 0.0 || !self.outer_bounds.contains_point(local) {
            return 0.0;
        }

        let closest = self.inner_bounds.closest_point(local);
        let distance = local.distance(closest);
        (1.0 - distance / self.blend_distance).clamp(0.0, 1.0)
    }

    // ===== CAMERA ASSOCIATIONS =====

    /// Current blend strength for a camera, if associated.
    pub fn camera_blend_strength(&self, camera: CameraKey) -> Option<f32> {
        self.camera_blend_strengths.get(&camera).copied()
    }

    /// All associated cameras with their strengths (unordered).
    pub fn camera_blend_strengths(&self) -> impl Iterator<Item = (CameraKey, f32)> + '_ {
        self.camera_blend_strengths.iter().map(|(k, s)| (*k, *s))
    }

    /// Number of associated cameras.
    pub fn camera_count(&self) -> usize {
        self.camera_blend_strengths.len()
    }

    /// Associate a camera at strength 0. Returns false if already associated.
    pub(crate) fn register_camera(&mut self, camera: CameraKey) -> bool {
        if self.camera_blend_strengths.contains_key(&camera) {
            return false;
        }
        self.camera_blend_strengths.insert(camera, 0.0);
        true
    }

    /// Drop one camera association, returning its last strength.
    pub(crate) fn deregister_camera(&mut self, camera: CameraKey) -> Option<f32> {
        self.camera_blend_strengths.remove(&camera)
    }

    /// Overwrite the strength of an associated camera.
    pub(crate) fn set_camera_blend_strength(&mut self, camera: CameraKey, strength: f32) {
        if let Some(s) = self.camera_blend_strengths.get_mut(&camera) {
            *s = strength.clamp(0.0, 1.0);
        }
    }

    /// Drop every camera association, returning the cameras that were associated.
    pub(crate) fn clear_cameras(&mut self) -> Vec<CameraKey> {
        self.camera_blend_strengths.drain().map(|(k, _)| k).collect()
    }

    // ===== NOTIFICATIONS =====

    /// Pending notifications, without clearing them.
    pub fn notifications(&self) -> VolumeNotifications {
        self.notifications
    }

    /// Drain pending notifications for forwarding to the host.
    pub fn take_notifications(&mut self) -> VolumeNotifications {
        std::mem::take(&mut self.notifications)
    }

    // ===== GIZMO =====

    /// Line segments for the editor gizmo, in local space.
    ///
    /// 12 edges of the inner box, followed by 12 edges of the outer box
    /// when the blend margin is non-zero.
    pub fn gizmo_segments(&self) -> Vec<(Vec3, Vec3)> {
        let mut segments = self.inner_bounds.edges().to_vec();
        if self.blend_distance > 0.0 {
            segments.extend_from_slice(&self.outer_bounds.edges());
        }
        segments
    }
}

#[cfg(test)]
#[path = "volume_tests.rs"]
mod tests;
