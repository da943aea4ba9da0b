//! Plugin module - host entry points, singleton registration and the
//! class database.

mod class_db;
mod config;
mod plugin;

pub use class_db::{ClassDb, ClassInfo, RegisteredClass};
pub use config::PluginConfig;
pub use plugin::{InitializationLevel, Plugin, BLENDER_SINGLETON_NAME};
