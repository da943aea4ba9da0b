/// Plugin configuration.

use crate::blender::BlenderConfig;
use crate::log::LogSeverity;

/// Configuration consumed by [`Plugin::initialize_with_config`](super::Plugin::initialize_with_config).
#[derive(Debug, Clone, Default)]
pub struct PluginConfig {
    /// Configuration of the singleton blender created at scene level
    pub blender: BlenderConfig,
    /// Minimum severity printed by the console logger installed at core level
    pub log_level: LogSeverity,
}
