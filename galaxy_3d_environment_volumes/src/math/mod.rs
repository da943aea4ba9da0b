//! Math helpers - bounding boxes and approximate comparisons.

mod aabb;
mod approx;

pub use aabb::AABB;
pub use approx::{is_equal_approx, is_vec3_equal_approx, CMP_EPSILON};
