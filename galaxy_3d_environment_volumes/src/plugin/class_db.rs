/// ClassDb - classes the plugin exposes to the host.
///
/// Each registered class records its name, parent class and property list,
/// the way the host's class database sees them.

use rustc_hash::FxHashMap;
use crate::blender::EnvironmentBlender;
use crate::volume::{EnvironmentVolume, PropertyInfo};

/// A type the plugin registers with the host.
pub trait RegisteredClass {
    /// Class name seen by the host
    const CLASS_NAME: &'static str;
    /// Host base class
    const PARENT_CLASS: &'static str;

    /// Properties exposed to the inspector and scripts.
    fn class_properties() -> Vec<PropertyInfo>;
}

impl RegisteredClass for EnvironmentVolume {
    const CLASS_NAME: &'static str = "EnvironmentVolume";
    const PARENT_CLASS: &'static str = "Node3D";

    fn class_properties() -> Vec<PropertyInfo> {
        EnvironmentVolume::property_list()
    }
}

impl RegisteredClass for EnvironmentBlender {
    const CLASS_NAME: &'static str = "EnvironmentBlender";
    const PARENT_CLASS: &'static str = "Object";

    fn class_properties() -> Vec<PropertyInfo> {
        Vec::new()
    }
}

/// Registration record of one class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassInfo {
    pub name: &'static str,
    pub parent: &'static str,
    pub properties: Vec<PropertyInfo>,
}

/// Registry of the classes currently exposed to the host.
#[derive(Debug, Default)]
pub struct ClassDb {
    classes: FxHashMap<&'static str, ClassInfo>,
}

impl ClassDb {
    pub fn new() -> Self {
        Self {
            classes: FxHashMap::default(),
        }
    }

    /// Register a class. Returns false if a class of that name is already registered.
    pub fn register<C: RegisteredClass>(&mut self) -> bool {
        if self.classes.contains_key(C::CLASS_NAME) {
            return false;
        }
        self.classes.insert(C::CLASS_NAME, ClassInfo {
            name: C::CLASS_NAME,
            parent: C::PARENT_CLASS,
            properties: C::class_properties(),
        });
        true
    }

    /// Unregister a class by name. Returns false if it was not registered.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.classes.remove(name).is_some()
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn class_info(&self, name: &str) -> Option<&ClassInfo> {
        self.classes.get(name)
    }

    /// Registered class names, sorted.
    pub fn class_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.classes.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Drop every registration.
    pub fn clear(&mut self) {
        self.classes.clear();
    }
}

#[cfg(test)]
#[path = "class_db_tests.rs"]
mod tests;
