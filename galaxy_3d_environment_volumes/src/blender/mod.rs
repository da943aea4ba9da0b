//! Blender module - the per-camera environment blender and its
//! configuration.

mod blend;
mod blender;
mod config;

pub use blend::step_strength;
pub use blender::EnvironmentBlender;
pub use config::BlenderConfig;
