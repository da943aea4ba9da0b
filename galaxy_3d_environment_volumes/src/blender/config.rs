/// Blender configuration.

use crate::environment::{CompositeMode, Environment};

/// Configuration for an [`EnvironmentBlender`](super::EnvironmentBlender).
#[derive(Debug, Clone, Default)]
pub struct BlenderConfig {
    /// How overlapping volume contributions are merged
    pub composite_mode: CompositeMode,
    /// Environment of a camera outside every volume
    pub default_environment: Environment,
}

impl BlenderConfig {
    /// Builder-style composite mode selection.
    pub fn with_composite_mode(mut self, mode: CompositeMode) -> Self {
        self.composite_mode = mode;
        self
    }

    /// Builder-style base environment.
    pub fn with_default_environment(mut self, environment: Environment) -> Self {
        self.default_environment = environment;
        self
    }
}
