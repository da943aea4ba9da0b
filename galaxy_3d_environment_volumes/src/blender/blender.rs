/// EnvironmentBlender - per-camera blending of every attached volume.
///
/// Owns the attached volumes and the tracked cameras. Each `tick` discovers
/// the cameras of every volume, smooths their blend strengths over time,
/// then composites all active contributions into one environment per
/// camera.
///
/// The blender is an ordinary value; the plugin layer keeps the single
/// process-wide instance the host scripts see.

use std::fmt;
use slotmap::SlotMap;
use crate::camera::{Camera, CameraContribution, CameraKey, CameraRegistry};
use crate::environment::{CompositeMode, Compositor, Contribution, Environment};
use crate::error::Result;
use crate::volume::{EnvironmentVolume, VolumeKey};
use crate::{plugin_debug, plugin_err, plugin_trace};
use super::blend::step_strength;
use super::config::BlenderConfig;

const SOURCE: &str = "galaxy3d::EnvironmentBlender";

/// Volume plus the attach order used to break priority ties.
#[derive(Debug)]
struct AttachedVolume {
    volume: EnvironmentVolume,
    order: u64,
}

/// Aggregates environment blending for every camera across all volumes.
pub struct EnvironmentBlender {
    config: BlenderConfig,
    /// Strategy built from `config.composite_mode`
    compositor: Box<dyn Compositor>,
    volumes: SlotMap<VolumeKey, AttachedVolume>,
    cameras: CameraRegistry,
    /// Next attach order (monotonic, never reused)
    next_order: u64,
    /// Ticks processed since creation
    frame: u64,
}

impl fmt::Debug for EnvironmentBlender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvironmentBlender")
            .field("config", &self.config)
            .field("volumes", &self.volumes.len())
            .field("cameras", &self.cameras.len())
            .field("frame", &self.frame)
            .finish_non_exhaustive()
    }
}

impl Default for EnvironmentBlender {
    fn default() -> Self {
        Self::new(BlenderConfig::default())
    }
}

impl EnvironmentBlender {
    /// Create an empty blender.
    pub fn new(config: BlenderConfig) -> Self {
        let compositor = config.composite_mode.compositor();
        Self {
            config,
            compositor,
            volumes: SlotMap::with_key(),
            cameras: CameraRegistry::new(),
            next_order: 0,
            frame: 0,
        }
    }

    // ===== CONFIGURATION =====

    pub fn config(&self) -> &BlenderConfig {
        &self.config
    }

    /// Switch the composition strategy. Takes effect on the next tick.
    pub fn set_composite_mode(&mut self, mode: CompositeMode) {
        if mode == self.config.composite_mode {
            return;
        }
        self.config.composite_mode = mode;
        self.compositor = mode.compositor();
        plugin_debug!(SOURCE, "Composite mode set to {:?}", mode);
    }

    /// Replace the environment of cameras outside every volume.
    pub fn set_default_environment(&mut self, environment: Environment) {
        self.config.default_environment = environment;
    }

    // ===== VOLUMES =====

    /// Attach a volume (host: the volume entered the scene tree).
    ///
    /// Camera associations carried by the volume are dropped: their keys
    /// belong to whichever blender tracked them, and every association made
    /// here starts at strength 0.
    pub fn attach(&mut self, mut volume: EnvironmentVolume) -> VolumeKey {
        volume.clear_cameras();
        let order = self.next_order;
        self.next_order += 1;
        let key = self.volumes.insert(AttachedVolume { volume, order });
        plugin_debug!(SOURCE, "Volume {:?} attached (order {})", key, order);
        key
    }

    /// Detach a volume (host: the volume left the scene tree).
    ///
    /// Every camera association of the volume is dropped and the volume is
    /// removed from each camera's contribution list. The cameras' applied
    /// environments are recomposited on the next tick.
    ///
    /// # Errors
    ///
    /// `Error::InvalidHandle` if the key is not attached.
    pub fn detach(&mut self, key: VolumeKey) -> Result<EnvironmentVolume> {
        let mut attached = self.volumes.remove(key).ok_or_else(|| plugin_err!(
            SOURCE, InvalidHandle, "Volume {:?} is not attached", key))?;

        attached.volume.clear_cameras();
        for (_, camera) in self.cameras.iter_mut() {
            camera.forget_volume(key);
        }

        plugin_debug!(SOURCE, "Volume {:?} detached", key);
        Ok(attached.volume)
    }

    /// Get an attached volume.
    pub fn volume(&self, key: VolumeKey) -> Option<&EnvironmentVolume> {
        self.volumes.get(key).map(|a| &a.volume)
    }

    /// Get an attached volume mutably (property edits, transform updates).
    pub fn volume_mut(&mut self, key: VolumeKey) -> Option<&mut EnvironmentVolume> {
        self.volumes.get_mut(key).map(|a| &mut a.volume)
    }

    /// Keys of all attached volumes.
    pub fn volume_keys(&self) -> impl Iterator<Item = VolumeKey> + '_ {
        self.volumes.keys()
    }

    /// Iterate over attached volumes.
    pub fn volumes(&self) -> impl Iterator<Item = (VolumeKey, &EnvironmentVolume)> {
        self.volumes.iter().map(|(k, a)| (k, &a.volume))
    }

    pub fn volume_count(&self) -> usize {
        self.volumes.len()
    }

    // ===== CAMERAS =====

    /// Start tracking a camera.
    pub fn add_camera(&mut self, camera: Camera) -> CameraKey {
        let key = self.cameras.insert(camera);
        plugin_debug!(SOURCE, "Camera {:?} added", key);
        key
    }

    /// Stop tracking a camera.
    ///
    /// The camera is deregistered from every volume right away, and stops
    /// being the active camera if it was.
    ///
    /// # Errors
    ///
    /// `Error::InvalidHandle` if the camera is not tracked.
    pub fn remove_camera(&mut self, key: CameraKey) -> Result<Camera> {
        let camera = self.cameras.remove(key).ok_or_else(|| plugin_err!(
            SOURCE, InvalidHandle, "Camera {:?} is not tracked", key))?;

        for (_, attached) in self.volumes.iter_mut() {
            attached.volume.deregister_camera(key);
        }

        plugin_debug!(SOURCE, "Camera {:?} removed", key);
        Ok(camera)
    }

    pub fn camera(&self, key: CameraKey) -> Option<&Camera> {
        self.cameras.get(key)
    }

    /// Get a camera mutably (transform and group updates from the host).
    pub fn camera_mut(&mut self, key: CameraKey) -> Option<&mut Camera> {
        self.cameras.get_mut(key)
    }

    /// Iterate over tracked cameras.
    pub fn cameras(&self) -> impl Iterator<Item = (CameraKey, &Camera)> {
        self.cameras.iter()
    }

    pub fn camera_count(&self) -> usize {
        self.cameras.len()
    }

    /// Set (or clear) the default viewport's active camera.
    ///
    /// # Errors
    ///
    /// `Error::InvalidHandle` if the camera is not tracked.
    pub fn set_active_camera(&mut self, key: Option<CameraKey>) -> Result<()> {
        if !self.cameras.set_active(key) {
            return Err(plugin_err!(SOURCE, InvalidHandle,
                "Cannot activate untracked camera {:?}", key));
        }
        Ok(())
    }

    /// Active camera of the default viewport.
    pub fn active_camera(&self) -> Option<CameraKey> {
        self.cameras.active()
    }

    /// Cameras a volume currently affects.
    ///
    /// Cameras tagged with the volume's camera group; when none are, the
    /// active camera; when there is none either, an empty list.
    ///
    /// # Errors
    ///
    /// `Error::InvalidHandle` if the volume is not attached.
    pub fn find_cameras(&self, volume: VolumeKey) -> Result<Vec<CameraKey>> {
        let attached = self.volumes.get(volume).ok_or_else(|| plugin_err!(
            SOURCE, InvalidHandle, "Volume {:?} is not attached", volume))?;
        Ok(self.cameras.discover(attached.volume.camera_group()))
    }

    // ===== FRAME =====

    /// Advance blending by `delta` seconds and recomposite every camera.
    pub fn tick(&mut self, delta: f32) {
        let Self { config, compositor, volumes, cameras, frame, .. } = self;
        *frame += 1;

        for (volume_key, attached) in volumes.iter_mut() {
            let volume = &mut attached.volume;

            if volume.environment().is_none() {
                if volume.camera_count() > 0 {
                    volume.clear_cameras();
                }
                continue;
            }

            let discovered = cameras.discover(volume.camera_group());
            for &camera_key in &discovered {
                if volume.register_camera(camera_key) {
                    plugin_debug!(SOURCE, "Camera {:?} registered on volume {:?}",
                        camera_key, volume_key);
                }
            }

            let world_bounds = volume.world_outer_bounds();
            let blend_time = volume.blend_time();
            let associated: Vec<(CameraKey, f32)> = volume.camera_blend_strengths().collect();

            for (camera_key, current) in associated {
                let Some(camera) = cameras.get(camera_key) else {
                    volume.deregister_camera(camera_key);
                    continue;
                };

                let is_discovered = discovered.contains(&camera_key);
                let position = camera.position();
                let target = if is_discovered && world_bounds.contains_point(position) {
                    volume.target_weight(position)
                } else {
                    0.0
                };

                let strength = step_strength(current, target, delta, blend_time);
                if !is_discovered && strength <= 0.0 {
                    volume.deregister_camera(camera_key);
                    plugin_debug!(SOURCE, "Camera {:?} faded out of volume {:?}",
                        camera_key, volume_key);
                } else {
                    volume.set_camera_blend_strength(camera_key, strength);
                }
            }
        }

        for (camera_key, camera) in cameras.iter_mut() {
            let mut contributions: Vec<Contribution<'_>> = volumes
                .iter()
                .filter_map(|(volume_key, attached)| {
                    let environment = attached.volume.environment()?;
                    let weight = attached.volume.camera_blend_strength(camera_key)?;
                    (weight > 0.0).then(|| Contribution {
                        volume: volume_key,
                        priority: attached.volume.priority(),
                        order: attached.order,
                        weight,
                        environment: environment.as_ref(),
                    })
                })
                .collect();
            contributions.sort_by_key(|c| (c.priority, c.order));

            let environment = compositor.composite(&config.default_environment, &contributions);
            let applied = contributions
                .iter()
                .map(|c| CameraContribution { volume: c.volume, strength: c.weight })
                .collect();
            camera.apply(environment, applied);
        }

        plugin_trace!(SOURCE, "Frame {} blended ({} volumes, {} cameras)",
            frame, volumes.len(), cameras.len());
    }

    // ===== QUERIES =====

    /// Environment applied to a camera on the last tick.
    pub fn camera_environment(&self, camera: CameraKey) -> Option<&Environment> {
        self.cameras.get(camera).map(Camera::environment)
    }

    /// Volumes that affected a camera on the last tick, in composition order.
    pub fn camera_volumes(&self, camera: CameraKey) -> Option<Vec<VolumeKey>> {
        self.cameras
            .get(camera)
            .map(|c| c.contributions().iter().map(|c| c.volume).collect())
    }

    /// Current blend strength of a camera in a volume, if associated.
    pub fn blend_strength(&self, volume: VolumeKey, camera: CameraKey) -> Option<f32> {
        self.volume(volume)?.camera_blend_strength(camera)
    }

    /// Number of ticks processed.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Drop every volume and camera. Configuration is kept.
    pub fn clear(&mut self) {
        self.volumes.clear();
        self.cameras = CameraRegistry::new();
        plugin_debug!(SOURCE, "Blender cleared");
    }
}

#[cfg(test)]
#[path = "blender_tests.rs"]
mod tests;
