/// Axis-aligned bounding box.
///
/// Volumes keep their inner/outer bounds in local space; the blender
/// transforms camera positions into that space before querying. The
/// world-space variant (via `transformed`) is only used as a conservative
/// broad-phase rejection.

use glam::{Mat4, Vec3};

/// Axis-Aligned Bounding Box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner (x, y, z)
    pub min: Vec3,
    /// Maximum corner (x, y, z)
    pub max: Vec3,
}

impl AABB {
    /// Create a box from its two corners.
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create a box centered on `center` extending `|half_extents|` on each axis.
    ///
    /// Negative half-extents are folded to their absolute value so that
    /// `min <= max` always holds.
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let half = half_extents.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Center point of the box.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Full size of the box on each axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Half of the size on each axis.
    pub fn half_extents(&self) -> Vec3 {
        self.size() * 0.5
    }

    /// Return a copy grown by `amount` on every face.
    ///
    /// Negative amounts shrink the box; the result never inverts, it
    /// collapses onto the center instead.
    pub fn grow(&self, amount: f32) -> AABB {
        let grown_min = self.min - Vec3::splat(amount);
        let grown_max = self.max + Vec3::splat(amount);
        let center = self.center();
        AABB {
            min: grown_min.min(center),
            max: grown_max.max(center),
        }
    }

    /// Test if a point lies inside the box (faces included).
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Nearest point of the box to `point`.
    ///
    /// Points inside the box are returned unchanged; points outside are
    /// clamped per axis into `[min, max]`.
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min, self.max)
    }

    /// Euclidean distance from `point` to the box (0 inside).
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        point.distance(self.closest_point(point))
    }

    /// Test if this AABB fully contains another AABB.
    pub fn contains(&self, other: &AABB) -> bool {
        self.min.x <= other.min.x && self.max.x >= other.max.x
        && self.min.y <= other.min.y && self.max.y >= other.max.y
        && self.min.z <= other.min.z && self.max.z >= other.max.z
    }

    /// Test if this AABB intersects (overlaps or touches) another AABB.
    pub fn intersects(&self, other: &AABB) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x
        && self.min.y <= other.max.y && self.max.y >= other.min.y
        && self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Transform this box by a matrix, returning the enclosing box.
    ///
    /// Uses the Arvo method: projects each matrix axis onto the extents
    /// for a tight result without transforming all 8 corners.
    pub fn transformed(&self, matrix: &Mat4) -> AABB {
        let translation = matrix.col(3).truncate();
        let mut new_min = translation;
        let mut new_max = translation;

        for i in 0..3 {
            let axis = matrix.col(i).truncate();
            let a = axis * self.min[i];
            let b = axis * self.max[i];
            new_min += a.min(b);
            new_max += a.max(b);
        }

        AABB { min: new_min, max: new_max }
    }

    /// The 8 corners, indexed by bit layout: bit0 = X, bit1 = Y, bit2 = Z (0 = min, 1 = max).
    pub fn corners(&self) -> [Vec3; 8] {
        let mut corners = [Vec3::ZERO; 8];
        for (i, corner) in corners.iter_mut().enumerate() {
            *corner = Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
        }
        corners
    }

    /// The 12 edges as corner pairs (corners that differ in exactly one bit).
    pub fn edges(&self) -> [(Vec3, Vec3); 12] {
        let corners = self.corners();
        let mut edges = [(Vec3::ZERO, Vec3::ZERO); 12];
        let mut n = 0;
        for i in 0..8usize {
            for bit in [1usize, 2, 4] {
                let j = i | bit;
                if j != i {
                    edges[n] = (corners[i], corners[j]);
                    n += 1;
                }
            }
        }
        debug_assert_eq!(n, 12);
        edges
    }
}

impl Default for AABB {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::ZERO)
    }
}

#[cfg(test)]
#[path = "aabb_tests.rs"]
mod tests;
