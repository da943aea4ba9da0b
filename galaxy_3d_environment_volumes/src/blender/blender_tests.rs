/// Tests for EnvironmentBlender
///
/// Cover volume/camera lifecycle through keys, camera discovery, strength
/// smoothing over ticks and composition of overlapping volumes.

use glam::Vec3;
use crate::camera::Camera;
use crate::environment::{CompositeMode, Environment, EnvironmentRef};
use crate::error::Error;
use crate::volume::{EnvironmentVolume, DEFAULT_CAMERA_GROUP};
use super::*;

const EPS: f32 = 1e-5;

// ============================================================================
// Helper Functions
// ============================================================================

fn fog_env(density: f32) -> EnvironmentRef {
    Environment { fog_density: density, ..Default::default() }.into_ref()
}

fn create_volume(size: f32, blend_distance: f32, blend_time: f32) -> EnvironmentVolume {
    let mut volume = EnvironmentVolume::new();
    volume.set_size(Vec3::splat(size));
    volume.set_blend_distance(blend_distance);
    volume.set_blend_time(blend_time);
    volume.set_environment(Some(fog_env(1.0)));
    volume
}

/// Blender with one volume and one active camera at `position`.
fn setup(volume: EnvironmentVolume, position: Vec3) -> (EnvironmentBlender, VolumeKey, CameraKey) {
    let mut blender = EnvironmentBlender::default();
    let volume_key = blender.attach(volume);
    let camera_key = blender.add_camera(Camera::at_position(position));
    blender.set_active_camera(Some(camera_key)).unwrap();
    (blender, volume_key, camera_key)
}

fn fog_of(blender: &EnvironmentBlender, camera: CameraKey) -> f32 {
    blender.camera_environment(camera).unwrap().fog_density
}

// ============================================================================
// Volume lifecycle
// ============================================================================

#[test]
fn test_new_blender_is_empty() {
    let blender = EnvironmentBlender::default();
    assert_eq!(blender.volume_count(), 0);
    assert_eq!(blender.camera_count(), 0);
    assert_eq!(blender.frame_count(), 0);
    assert!(blender.active_camera().is_none());
    assert_eq!(blender.config().composite_mode, CompositeMode::WeightedAverage);
}

#[test]
fn test_attach_and_lookup() {
    let mut blender = EnvironmentBlender::default();
    let key = blender.attach(create_volume(2.0, 0.0, 0.0));
    assert_eq!(blender.volume_count(), 1);
    assert_eq!(blender.volume(key).unwrap().size(), Vec3::splat(2.0));
    assert_eq!(blender.volume_keys().collect::<Vec<_>>(), vec![key]);

    blender.volume_mut(key).unwrap().set_priority(3);
    assert_eq!(blender.volume(key).unwrap().priority(), 3);
}

#[test]
fn test_detach_returns_volume_and_drops_associations() {
    let (mut blender, volume_key, camera_key) = setup(create_volume(1.0, 0.0, 0.0), Vec3::ZERO);
    blender.tick(0.016);
    assert_eq!(blender.camera_volumes(camera_key).unwrap(), vec![volume_key]);

    let volume = blender.detach(volume_key).unwrap();
    assert_eq!(volume.camera_count(), 0);
    assert!(blender.volume(volume_key).is_none());
    assert!(blender.camera_volumes(camera_key).unwrap().is_empty());

    blender.tick(0.016);
    assert!(fog_of(&blender, camera_key).abs() < EPS);
}

#[test]
fn test_attach_clone_starts_without_associations() {
    let (mut blender, volume_key, camera_key) = setup(create_volume(1.0, 0.0, 0.0), Vec3::ZERO);
    blender.tick(0.016);
    assert_eq!(blender.blend_strength(volume_key, camera_key), Some(1.0));

    let mut copy = blender.volume(volume_key).unwrap().clone();
    copy.set_blend_time(0.5);
    copy.set_position(Vec3::splat(100.0));
    let copy_key = blender.attach(copy);
    assert_eq!(blender.volume(copy_key).unwrap().camera_count(), 0);
    assert_eq!(blender.blend_strength(copy_key, camera_key), None);

    blender.tick(0.016);
    assert_eq!(blender.blend_strength(copy_key, camera_key), Some(0.0));
    assert_eq!(blender.camera_volumes(camera_key).unwrap(), vec![volume_key]);
    assert!((fog_of(&blender, camera_key) - 1.0).abs() < EPS);
}

#[test]
fn test_attach_to_other_blender_ignores_foreign_camera_keys() {
    let (mut blender, volume_key, camera_key) = setup(create_volume(1.0, 0.0, 0.5), Vec3::ZERO);
    blender.tick(1.0);
    assert_eq!(blender.blend_strength(volume_key, camera_key), Some(1.0));
    let copy = blender.volume(volume_key).unwrap().clone();

    let (mut other, copy_key, far_camera) = setup(copy, Vec3::splat(50.0));
    assert_eq!(other.blend_strength(copy_key, far_camera), None);

    other.tick(0.016);
    assert_eq!(other.blend_strength(copy_key, far_camera), Some(0.0));
    assert!(other.camera_volumes(far_camera).unwrap().is_empty());
    assert!(fog_of(&other, far_camera).abs() < EPS);
}

#[test]
fn test_detach_unknown_volume_fails() {
    let mut blender = EnvironmentBlender::default();
    let key = blender.attach(EnvironmentVolume::new());
    blender.detach(key).unwrap();
    assert!(matches!(blender.detach(key), Err(Error::InvalidHandle(_))));
}

// ============================================================================
// Camera lifecycle
// ============================================================================

#[test]
fn test_remove_camera_deregisters_everywhere() {
    let (mut blender, volume_key, camera_key) = setup(create_volume(1.0, 0.0, 0.0), Vec3::ZERO);
    blender.tick(0.016);
    assert_eq!(blender.blend_strength(volume_key, camera_key), Some(1.0));

    blender.remove_camera(camera_key).unwrap();
    assert_eq!(blender.volume(volume_key).unwrap().camera_count(), 0);
    assert!(blender.active_camera().is_none());
    assert!(blender.camera(camera_key).is_none());
    assert!(matches!(blender.remove_camera(camera_key), Err(Error::InvalidHandle(_))));
}

#[test]
fn test_set_active_camera_rejects_untracked() {
    let mut blender = EnvironmentBlender::default();
    let key = blender.add_camera(Camera::at_position(Vec3::ZERO));
    blender.remove_camera(key).unwrap();
    assert!(matches!(blender.set_active_camera(Some(key)), Err(Error::InvalidHandle(_))));
    assert!(blender.set_active_camera(None).is_ok());
}

// ============================================================================
// Discovery
// ============================================================================

#[test]
fn test_find_cameras_prefers_group() {
    let mut blender = EnvironmentBlender::default();
    let volume_key = blender.attach(create_volume(1.0, 0.0, 0.0));
    let active = blender.add_camera(Camera::at_position(Vec3::ZERO));
    blender.set_active_camera(Some(active)).unwrap();

    assert_eq!(blender.find_cameras(volume_key).unwrap(), vec![active]);

    let tagged = blender.add_camera(Camera::at_position(Vec3::ZERO).with_group(DEFAULT_CAMERA_GROUP));
    assert_eq!(blender.find_cameras(volume_key).unwrap(), vec![tagged]);
}

#[test]
fn test_find_cameras_without_any_camera_is_empty() {
    let mut blender = EnvironmentBlender::default();
    let volume_key = blender.attach(create_volume(1.0, 0.0, 0.0));
    blender.add_camera(Camera::at_position(Vec3::ZERO));
    assert!(blender.find_cameras(volume_key).unwrap().is_empty());

    blender.tick(0.016);
    assert_eq!(blender.volume(volume_key).unwrap().camera_count(), 0);
}

#[test]
fn test_find_cameras_unknown_volume_fails() {
    let mut blender = EnvironmentBlender::default();
    let key = blender.attach(EnvironmentVolume::new());
    blender.detach(key).unwrap();
    assert!(matches!(blender.find_cameras(key), Err(Error::InvalidHandle(_))));
}

#[test]
fn test_only_tagged_cameras_are_blended() {
    let mut blender = EnvironmentBlender::default();
    let volume_key = blender.attach(create_volume(1.0, 0.0, 0.0));
    let active = blender.add_camera(Camera::at_position(Vec3::ZERO));
    let tagged = blender.add_camera(Camera::at_position(Vec3::ZERO).with_group(DEFAULT_CAMERA_GROUP));
    blender.set_active_camera(Some(active)).unwrap();

    blender.tick(0.016);
    assert_eq!(blender.blend_strength(volume_key, tagged), Some(1.0));
    assert_eq!(blender.blend_strength(volume_key, active), None);
    assert!((fog_of(&blender, tagged) - 1.0).abs() < EPS);
    assert!(fog_of(&blender, active).abs() < EPS);
}

#[test]
fn test_volume_without_environment_has_no_cameras() {
    let mut volume = create_volume(1.0, 0.0, 0.0);
    volume.set_environment(None);
    let (mut blender, volume_key, camera_key) = setup(volume, Vec3::ZERO);

    blender.tick(0.016);
    assert_eq!(blender.volume(volume_key).unwrap().camera_count(), 0);
    assert!(blender.camera_volumes(camera_key).unwrap().is_empty());
}

// ============================================================================
// Weights and smoothing
// ============================================================================

#[test]
fn test_instant_blend_at_center_and_margin_edge() {
    let (mut blender, volume_key, camera_key) = setup(create_volume(1.0, 1.0, 0.0), Vec3::ZERO);
    blender.tick(0.016);
    assert_eq!(blender.blend_strength(volume_key, camera_key), Some(1.0));

    blender.camera_mut(camera_key).unwrap().set_position(Vec3::new(2.0, 0.0, 0.0));
    blender.tick(0.016);
    assert_eq!(blender.blend_strength(volume_key, camera_key), Some(0.0));
    assert!(blender.camera_volumes(camera_key).unwrap().is_empty());
}

#[test]
fn test_margin_weight_is_linear() {
    let (mut blender, volume_key, camera_key) =
        setup(create_volume(1.0, 1.0, 0.0), Vec3::new(0.0, 1.5, 0.0));
    blender.tick(0.016);
    let strength = blender.blend_strength(volume_key, camera_key).unwrap();
    assert!((strength - 0.5).abs() < EPS);
    // Half strength over a zero-fog base
    assert!((fog_of(&blender, camera_key) - 0.5).abs() < EPS);
}

#[test]
fn test_camera_far_outside_stays_registered_at_zero() {
    let (mut blender, volume_key, camera_key) =
        setup(create_volume(1.0, 1.0, 0.0), Vec3::splat(100.0));
    blender.tick(0.016);
    assert_eq!(blender.blend_strength(volume_key, camera_key), Some(0.0));
}

#[test]
fn test_blend_time_limits_rate() {
    let (mut blender, volume_key, camera_key) = setup(create_volume(1.0, 0.0, 2.0), Vec3::ZERO);

    blender.tick(0.5);
    assert!((blender.blend_strength(volume_key, camera_key).unwrap() - 0.25).abs() < EPS);
    blender.tick(0.5);
    assert!((blender.blend_strength(volume_key, camera_key).unwrap() - 0.5).abs() < EPS);
    blender.tick(10.0);
    assert_eq!(blender.blend_strength(volume_key, camera_key), Some(1.0));
}

#[test]
fn test_undiscovered_camera_fades_then_deregisters() {
    let mut blender = EnvironmentBlender::default();
    let volume_key = blender.attach(create_volume(1.0, 0.0, 1.0));
    let camera_key = blender.add_camera(Camera::at_position(Vec3::ZERO).with_group(DEFAULT_CAMERA_GROUP));

    blender.tick(1.0);
    assert_eq!(blender.blend_strength(volume_key, camera_key), Some(1.0));

    blender.camera_mut(camera_key).unwrap().remove_from_group(DEFAULT_CAMERA_GROUP);
    blender.tick(0.5);
    assert!((blender.blend_strength(volume_key, camera_key).unwrap() - 0.5).abs() < EPS);
    blender.tick(0.5);
    assert_eq!(blender.blend_strength(volume_key, camera_key), None);
}

#[test]
fn test_environment_swap_fades_new_environment_in() {
    let (mut blender, volume_key, camera_key) = setup(create_volume(1.0, 0.0, 1.0), Vec3::ZERO);
    blender.tick(1.0);
    assert_eq!(blender.blend_strength(volume_key, camera_key), Some(1.0));

    blender.volume_mut(volume_key).unwrap().set_environment(Some(fog_env(0.2)));
    assert_eq!(blender.blend_strength(volume_key, camera_key), Some(0.0));

    blender.tick(0.5);
    assert!((blender.blend_strength(volume_key, camera_key).unwrap() - 0.5).abs() < EPS);
    assert!((fog_of(&blender, camera_key) - 0.1).abs() < EPS);
}

#[test]
fn test_camera_group_change_fades_out_old_cameras() {
    let mut blender = EnvironmentBlender::default();
    let volume_key = blender.attach(create_volume(1.0, 0.0, 0.0));
    let camera_key = blender.add_camera(Camera::at_position(Vec3::ZERO).with_group(DEFAULT_CAMERA_GROUP));
    blender.tick(0.016);
    assert_eq!(blender.blend_strength(volume_key, camera_key), Some(1.0));

    blender.volume_mut(volume_key).unwrap().set_camera_group("Other");
    blender.tick(0.016);
    assert_eq!(blender.blend_strength(volume_key, camera_key), None);
}

#[test]
fn test_rotated_volume_uses_local_space() {
    use glam::{Mat4, Quat};
    let mut volume = create_volume(1.0, 0.0, 0.0);
    volume.set_size(Vec3::new(4.0, 0.5, 0.5));
    volume.set_transform(Mat4::from_quat(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2)));
    // Long axis now points along world Y
    let (mut blender, volume_key, camera_key) = setup(volume, Vec3::new(0.0, 3.0, 0.0));
    blender.tick(0.016);
    assert_eq!(blender.blend_strength(volume_key, camera_key), Some(1.0));

    blender.camera_mut(camera_key).unwrap().set_position(Vec3::new(3.0, 0.0, 0.0));
    blender.tick(0.016);
    assert_eq!(blender.blend_strength(volume_key, camera_key), Some(0.0));
}

// ============================================================================
// Composition
// ============================================================================

fn overlapping_pair(mode: CompositeMode) -> (EnvironmentBlender, VolumeKey, VolumeKey, CameraKey) {
    let mut blender = EnvironmentBlender::new(BlenderConfig::default().with_composite_mode(mode));
    let mut high = create_volume(1.0, 0.0, 0.0);
    high.set_environment(Some(fog_env(0.2)));
    high.set_priority(1);
    let mut low = create_volume(1.0, 0.0, 0.0);
    low.set_environment(Some(fog_env(0.8)));

    let high_key = blender.attach(high);
    let low_key = blender.attach(low);
    let camera_key = blender.add_camera(Camera::at_position(Vec3::ZERO));
    blender.set_active_camera(Some(camera_key)).unwrap();
    blender.tick(0.016);
    (blender, high_key, low_key, camera_key)
}

#[test]
fn test_weighted_average_of_overlapping_volumes() {
    let (blender, _, _, camera_key) = overlapping_pair(CompositeMode::WeightedAverage);
    assert!((fog_of(&blender, camera_key) - 0.5).abs() < EPS);
}

#[test]
fn test_priority_mode_highest_wins() {
    let (blender, high_key, low_key, camera_key) = overlapping_pair(CompositeMode::Priority);
    assert!((fog_of(&blender, camera_key) - 0.2).abs() < EPS);
    assert_eq!(blender.camera_volumes(camera_key).unwrap(), vec![low_key, high_key]);
}

#[test]
fn test_equal_priority_sorted_by_attach_order() {
    let mut blender = EnvironmentBlender::default();
    let first = blender.attach(create_volume(1.0, 0.0, 0.0));
    let second = blender.attach(create_volume(1.0, 0.0, 0.0));
    let camera_key = blender.add_camera(Camera::at_position(Vec3::ZERO));
    blender.set_active_camera(Some(camera_key)).unwrap();
    blender.tick(0.016);
    assert_eq!(blender.camera_volumes(camera_key).unwrap(), vec![first, second]);
}

#[test]
fn test_switch_composite_mode() {
    let (mut blender, _, _, camera_key) = overlapping_pair(CompositeMode::WeightedAverage);
    blender.set_composite_mode(CompositeMode::Priority);
    assert_eq!(blender.config().composite_mode, CompositeMode::Priority);
    blender.tick(0.016);
    assert!((fog_of(&blender, camera_key) - 0.2).abs() < EPS);
}

#[test]
fn test_default_environment_outside_volumes() {
    let base = Environment { fog_density: 0.3, ..Default::default() };
    let mut blender = EnvironmentBlender::new(BlenderConfig::default().with_default_environment(base));
    let camera_key = blender.add_camera(Camera::at_position(Vec3::ZERO));
    blender.tick(0.016);
    assert!((fog_of(&blender, camera_key) - 0.3).abs() < EPS);
}

// ============================================================================
// Frame bookkeeping
// ============================================================================

#[test]
fn test_frame_count_and_clear() {
    let (mut blender, _, _) = setup(create_volume(1.0, 0.0, 0.0), Vec3::ZERO);
    blender.tick(0.016);
    blender.tick(0.016);
    assert_eq!(blender.frame_count(), 2);

    blender.clear();
    assert_eq!(blender.volume_count(), 0);
    assert_eq!(blender.camera_count(), 0);
    assert!(blender.active_camera().is_none());
}
