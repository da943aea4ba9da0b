use glam::{Mat4, Vec3};
use super::*;

fn unit_box() -> AABB {
    AABB::from_center_half_extents(Vec3::ZERO, Vec3::ONE)
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_from_center_half_extents() {
    let aabb = AABB::from_center_half_extents(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.5, 1.0, 2.0));
    assert_eq!(aabb.min, Vec3::new(0.5, 1.0, 1.0));
    assert_eq!(aabb.max, Vec3::new(1.5, 3.0, 5.0));
    assert_eq!(aabb.center(), Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(aabb.half_extents(), Vec3::new(0.5, 1.0, 2.0));
}

#[test]
fn test_negative_half_extents_are_folded() {
    let aabb = AABB::from_center_half_extents(Vec3::ZERO, Vec3::new(-1.0, 2.0, -3.0));
    assert_eq!(aabb.min, Vec3::new(-1.0, -2.0, -3.0));
    assert_eq!(aabb.max, Vec3::new(1.0, 2.0, 3.0));
}

#[test]
fn test_size() {
    assert_eq!(unit_box().size(), Vec3::splat(2.0));
}

// ============================================================================
// grow
// ============================================================================

#[test]
fn test_grow_adds_margin_on_every_face() {
    let grown = unit_box().grow(0.5);
    assert_eq!(grown.min, Vec3::splat(-1.5));
    assert_eq!(grown.max, Vec3::splat(1.5));
    assert!(grown.contains(&unit_box()));
}

#[test]
fn test_grow_zero_is_identity() {
    assert_eq!(unit_box().grow(0.0), unit_box());
}

#[test]
fn test_grow_negative_never_inverts() {
    let shrunk = unit_box().grow(-5.0);
    assert_eq!(shrunk.min, Vec3::ZERO);
    assert_eq!(shrunk.max, Vec3::ZERO);
}

// ============================================================================
// Point queries
// ============================================================================

#[test]
fn test_contains_point_includes_faces() {
    let aabb = unit_box();
    assert!(aabb.contains_point(Vec3::ZERO));
    assert!(aabb.contains_point(Vec3::new(1.0, 0.0, 0.0)));
    assert!(aabb.contains_point(Vec3::new(1.0, -1.0, 1.0)));
    assert!(!aabb.contains_point(Vec3::new(1.01, 0.0, 0.0)));
}

#[test]
fn test_closest_point_inside_is_unchanged() {
    let aabb = unit_box();
    let p = Vec3::new(0.25, -0.5, 0.75);
    assert_eq!(aabb.closest_point(p), p);
}

#[test]
fn test_closest_point_outside_is_clamped_per_axis() {
    let aabb = unit_box();
    assert_eq!(aabb.closest_point(Vec3::new(3.0, 0.5, -7.0)), Vec3::new(1.0, 0.5, -1.0));
    assert_eq!(aabb.closest_point(Vec3::new(-2.0, -2.0, -2.0)), Vec3::splat(-1.0));
}

#[test]
fn test_distance_to_point() {
    let aabb = unit_box();
    assert_eq!(aabb.distance_to_point(Vec3::ZERO), 0.0);
    assert!((aabb.distance_to_point(Vec3::new(3.0, 0.0, 0.0)) - 2.0).abs() < 1e-6);
    // Corner region: distance to the (1,1,1) corner
    let d = aabb.distance_to_point(Vec3::new(2.0, 2.0, 1.0));
    assert!((d - 2.0_f32.sqrt()).abs() < 1e-6);
}

// ============================================================================
// Box queries
// ============================================================================

#[test]
fn test_contains_and_intersects() {
    let outer = unit_box().grow(1.0);
    let inner = unit_box();
    let far = AABB::from_center_half_extents(Vec3::splat(10.0), Vec3::ONE);
    assert!(outer.contains(&inner));
    assert!(!inner.contains(&outer));
    assert!(outer.intersects(&inner));
    assert!(!far.intersects(&inner));
}

#[test]
fn test_transformed_translation() {
    let moved = unit_box().transformed(&Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0)));
    assert_eq!(moved.min, Vec3::new(4.0, -1.0, -1.0));
    assert_eq!(moved.max, Vec3::new(6.0, 1.0, 1.0));
}

#[test]
fn test_transformed_rotation_encloses_box() {
    let rotated = unit_box().transformed(&Mat4::from_rotation_y(std::f32::consts::FRAC_PI_4));
    let expected = 2.0_f32.sqrt();
    assert!((rotated.max.x - expected).abs() < 1e-5);
    assert!((rotated.max.y - 1.0).abs() < 1e-5);
    assert!((rotated.min.z + expected).abs() < 1e-5);
}

// ============================================================================
// Corners and edges
// ============================================================================

#[test]
fn test_corners_bit_layout() {
    let corners = unit_box().corners();
    assert_eq!(corners[0], Vec3::splat(-1.0));
    assert_eq!(corners[1], Vec3::new(1.0, -1.0, -1.0));
    assert_eq!(corners[6], Vec3::new(-1.0, 1.0, 1.0));
    assert_eq!(corners[7], Vec3::ONE);
}

#[test]
fn test_edges_are_axis_aligned_and_full_length() {
    let aabb = AABB::from_center_half_extents(Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0));
    let edges = aabb.edges();
    assert_eq!(edges.len(), 12);
    for (a, b) in edges {
        let d = (b - a).abs();
        let non_zero = [d.x, d.y, d.z].iter().filter(|v| **v > 0.0).count();
        assert_eq!(non_zero, 1);
        let length = d.x + d.y + d.z;
        assert!(length == 2.0 || length == 4.0 || length == 6.0);
    }
}
