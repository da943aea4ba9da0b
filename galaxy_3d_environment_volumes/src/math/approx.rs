/// Approximate float comparison used by property setters.
///
/// A write is ignored when the new value is within a relative tolerance of
/// the current one, so editors that round-trip values through text fields
/// do not trigger bounds recomputation or notifications.

use glam::Vec3;

/// Absolute floor of the comparison tolerance
pub const CMP_EPSILON: f32 = 0.00001;

/// Compare two floats with a tolerance relative to `a` (at least `CMP_EPSILON`).
pub fn is_equal_approx(a: f32, b: f32) -> bool {
    // Also covers infinities of the same sign
    if a == b {
        return true;
    }
    let tolerance = (CMP_EPSILON * a.abs()).max(CMP_EPSILON);
    (a - b).abs() < tolerance
}

/// Component-wise [`is_equal_approx`].
pub fn is_vec3_equal_approx(a: Vec3, b: Vec3) -> bool {
    is_equal_approx(a.x, b.x) && is_equal_approx(a.y, b.y) && is_equal_approx(a.z, b.z)
}

#[cfg(test)]
#[path = "approx_tests.rs"]
mod tests;
