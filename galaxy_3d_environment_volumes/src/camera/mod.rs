//! Camera module - tracked cameras and camera discovery.
//!
//! The blender never owns host cameras; it tracks lightweight mirrors
//! addressed by `CameraKey` and writes the blended environment back.

mod camera;
mod camera_registry;

pub use camera::{Camera, CameraKey, CameraContribution};
pub use camera_registry::CameraRegistry;
