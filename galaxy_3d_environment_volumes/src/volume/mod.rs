//! Volume module - environment volumes, their host notifications and
//! their reflection surface.

mod volume;
mod property;

pub use volume::{EnvironmentVolume, VolumeKey, VolumeNotifications, DEFAULT_CAMERA_GROUP};
pub use property::{PropertyHint, PropertyInfo, Variant, VariantType};
