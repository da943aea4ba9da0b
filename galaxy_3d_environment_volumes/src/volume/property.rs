/// Reflection surface of EnvironmentVolume.
///
/// Describes the properties the host inspector and scripts see, and routes
/// dynamic get/set by name to the typed setters (so no-op guards and
/// notifications apply the same way).

use glam::Vec3;
use crate::environment::EnvironmentRef;
use crate::error::Result;
use crate::plugin_err;
use super::volume::EnvironmentVolume;

/// Dynamically typed property value.
#[derive(Debug, Clone)]
pub enum Variant {
    Nil,
    Int(i64),
    Float(f64),
    String(String),
    Vector3(Vec3),
    Environment(EnvironmentRef),
}

impl Variant {
    /// Type tag of the value.
    pub fn variant_type(&self) -> VariantType {
        match self {
            Variant::Nil => VariantType::Nil,
            Variant::Int(_) => VariantType::Int,
            Variant::Float(_) => VariantType::Float,
            Variant::String(_) => VariantType::String,
            Variant::Vector3(_) => VariantType::Vector3,
            Variant::Environment(_) => VariantType::Object,
        }
    }
}

/// Type tags of [`Variant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantType {
    Nil,
    Int,
    Float,
    String,
    Vector3,
    Object,
}

/// Editor hint attached to a property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyHint {
    None,
    /// Slider range; `or_greater` lets typed values exceed `max`
    Range { min: f64, max: f64, step: f64, or_greater: bool },
    /// Object property restricted to a resource class
    ResourceType(&'static str),
}

impl PropertyHint {
    /// Hint string in the host's `"min,max,step[,or_greater]"` / class-name format.
    pub fn hint_string(&self) -> String {
        match self {
            PropertyHint::None => String::new(),
            PropertyHint::Range { min, max, step, or_greater } => {
                let mut s = format!("{},{},{}", min, max, step);
                if *or_greater {
                    s.push_str(",or_greater");
                }
                s
            }
            PropertyHint::ResourceType(class) => class.to_string(),
        }
    }
}

/// One entry of a class property list.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyInfo {
    pub name: &'static str,
    pub variant_type: VariantType,
    pub hint: PropertyHint,
    /// Inspector group name, if grouped
    pub group: Option<&'static str>,
}

const BLEND_RANGE: PropertyHint = PropertyHint::Range {
    min: 0.0,
    max: 4.0,
    step: 0.1,
    or_greater: true,
};

impl EnvironmentVolume {
    /// Inspector group of the blend properties
    pub const BLEND_GROUP: &'static str = "Blend";

    /// Property prefix stripped by the inspector inside the blend group
    pub const BLEND_GROUP_PREFIX: &'static str = "blend_";

    /// Properties exposed to the host, in inspector order.
    pub fn property_list() -> Vec<PropertyInfo> {
        vec![
            PropertyInfo {
                name: "size",
                variant_type: VariantType::Vector3,
                hint: PropertyHint::None,
                group: None,
            },
            PropertyInfo {
                name: "environment",
                variant_type: VariantType::Object,
                hint: PropertyHint::ResourceType("Environment"),
                group: None,
            },
            PropertyInfo {
                name: "priority",
                variant_type: VariantType::Int,
                hint: PropertyHint::None,
                group: None,
            },
            PropertyInfo {
                name: "camera_group",
                variant_type: VariantType::String,
                hint: PropertyHint::None,
                group: None,
            },
            PropertyInfo {
                name: "blend_time",
                variant_type: VariantType::Float,
                hint: BLEND_RANGE,
                group: Some(Self::BLEND_GROUP),
            },
            PropertyInfo {
                name: "blend_distance",
                variant_type: VariantType::Float,
                hint: BLEND_RANGE,
                group: Some(Self::BLEND_GROUP),
            },
        ]
    }

    /// Read a property by name.
    pub fn get_property(&self, name: &str) -> Result<Variant> {
        Ok(match name {
            "size" => Variant::Vector3(self.size()),
            "environment" => match self.environment() {
                Some(env) => Variant::Environment(env.clone()),
                None => Variant::Nil,
            },
            "priority" => Variant::Int(self.priority() as i64),
            "camera_group" => Variant::String(self.camera_group().to_string()),
            "blend_time" => Variant::Float(self.blend_time() as f64),
            "blend_distance" => Variant::Float(self.blend_distance() as f64),
            _ => {
                return Err(plugin_err!("galaxy3d::EnvironmentVolume", InvalidProperty,
                    "Unknown property '{}'", name));
            }
        })
    }

    /// Write a property by name. Returns whether the value changed.
    ///
    /// Floats accept `Int` values; `environment` accepts `Nil` to clear.
    pub fn set_property(&mut self, name: &str, value: Variant) -> Result<bool> {
        match (name, value) {
            ("size", Variant::Vector3(v)) => Ok(self.set_size(v)),
            ("environment", Variant::Environment(env)) => Ok(self.set_environment(Some(env))),
            ("environment", Variant::Nil) => Ok(self.set_environment(None)),
            ("priority", Variant::Int(i)) => {
                let priority = i32::try_from(i).map_err(|_| plugin_err!(
                    "galaxy3d::EnvironmentVolume", InvalidProperty,
                    "Priority {} out of range", i))?;
                Ok(self.set_priority(priority))
            }
            ("camera_group", Variant::String(s)) => Ok(self.set_camera_group(s)),
            ("blend_time", Variant::Float(f)) => Ok(self.set_blend_time(f as f32)),
            ("blend_time", Variant::Int(i)) => Ok(self.set_blend_time(i as f32)),
            ("blend_distance", Variant::Float(f)) => Ok(self.set_blend_distance(f as f32)),
            ("blend_distance", Variant::Int(i)) => Ok(self.set_blend_distance(i as f32)),
            (name, value) => {
                let known = Self::property_list().iter().any(|p| p.name == name);
                if known {
                    Err(plugin_err!("galaxy3d::EnvironmentVolume", InvalidProperty,
                        "Property '{}' does not accept {:?}", name, value.variant_type()))
                } else {
                    Err(plugin_err!("galaxy3d::EnvironmentVolume", InvalidProperty,
                        "Unknown property '{}'", name))
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "property_tests.rs"]
mod tests;
