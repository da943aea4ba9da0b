/*!
# Galaxy 3D Environment Volumes

Spatial environment blending for the Galaxy 3D engine.

Box-shaped volumes carry an environment (background, ambient light, fog,
tonemapping, adjustments). A single blender tracks which cameras each
volume affects, smooths a per-camera blend strength over time and
composites every active contribution into one environment per camera.

## Architecture

- **EnvironmentVolume**: local-space box with a blend margin, an environment
  and blend parameters
- **EnvironmentBlender**: owns attached volumes and tracked cameras, steps
  blend strengths and composites per camera on every tick
- **Compositor**: strategy merging overlapping contributions (weighted
  average or priority layering)
- **Plugin**: host entry points, class registration and the process-wide
  blender singleton
*/

// Internal modules
mod error;
pub mod log;
mod math;
mod environment;
mod camera;
mod volume;
mod blender;
mod plugin;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Plugin entry points and singleton
    pub use crate::plugin::{InitializationLevel, Plugin, PluginConfig, BLENDER_SINGLETON_NAME};

    // Core types
    pub use crate::blender::EnvironmentBlender;
    pub use crate::volume::EnvironmentVolume;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Environment parameters and composition strategies
    pub mod environment {
        pub use crate::environment::*;
    }

    // Tracked cameras and discovery
    pub mod camera {
        pub use crate::camera::*;
    }

    // Volumes, notifications and reflection
    pub mod volume {
        pub use crate::volume::*;
    }

    // Blender and its configuration
    pub mod blender {
        pub use crate::blender::*;
    }

    // Class database
    pub mod plugin {
        pub use crate::plugin::{ClassDb, ClassInfo, RegisteredClass};
    }

    // Bounding boxes and approximate comparisons
    pub mod math {
        pub use crate::math::*;
    }
}

// Re-export math library at crate root
pub use glam;
