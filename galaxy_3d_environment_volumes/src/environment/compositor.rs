/// Composition strategies.
///
/// A Compositor merges every volume contribution affecting one camera into
/// the single environment applied to that camera. The blender sorts
/// contributions by (priority, attach order) before calling it, so
/// implementations may rely on that order.

use crate::volume::VolumeKey;
use super::environment::Environment;

/// One volume's share of a camera's environment.
#[derive(Debug, Clone, Copy)]
pub struct Contribution<'a> {
    /// Contributing volume
    pub volume: VolumeKey,
    /// Volume priority (higher wins in priority mode)
    pub priority: i32,
    /// Attach order, breaks priority ties
    pub order: u64,
    /// Current blend strength in (0, 1]
    pub weight: f32,
    /// Environment of the volume
    pub environment: &'a Environment,
}

/// Strategy for merging volume contributions over a base environment.
///
/// `base` is the environment a camera gets outside every volume.
pub trait Compositor: Send + Sync {
    /// Merge sorted contributions into the environment applied to a camera.
    fn composite(&self, base: &Environment, contributions: &[Contribution<'_>]) -> Environment;
}

/// Selects the composition strategy in `BlenderConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositeMode {
    /// Normalized weighted average of all contributions
    #[default]
    WeightedAverage,
    /// Layered override in ascending priority order
    Priority,
}

impl CompositeMode {
    /// Instantiate the compositor for this mode.
    pub fn compositor(self) -> Box<dyn Compositor> {
        match self {
            CompositeMode::WeightedAverage => Box::new(WeightedAverageCompositor::new()),
            CompositeMode::Priority => Box::new(PriorityCompositor::new()),
        }
    }
}

/// Weighted average compositor (default).
///
/// With total weight `W`:
/// - `W <= 1`: the base fills the remaining `1 - W` share
/// - `W > 1`: contributions are normalized by `W` and the base is ignored
///
/// Continuous in every weight, so fading volumes never pop.
pub struct WeightedAverageCompositor;

impl WeightedAverageCompositor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WeightedAverageCompositor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compositor for WeightedAverageCompositor {
    fn composite(&self, base: &Environment, contributions: &[Contribution<'_>]) -> Environment {
        let total: f32 = contributions.iter().map(|c| c.weight.max(0.0)).sum();
        if total <= 0.0 {
            return *base;
        }

        let sum = contributions.iter().fold(Environment::ZERO, |acc, c| {
            acc.combine(1.0, c.environment, c.weight.max(0.0))
        });

        if total <= 1.0 {
            base.combine(1.0 - total, &sum, 1.0)
        } else {
            sum.scaled(1.0 / total)
        }
    }
}

/// Priority compositor.
///
/// Starts from the base and lerps toward each contribution by its weight,
/// lowest priority first, so a fully blended high-priority volume
/// completely overrides everything below it.
pub struct PriorityCompositor;

impl PriorityCompositor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PriorityCompositor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compositor for PriorityCompositor {
    fn composite(&self, base: &Environment, contributions: &[Contribution<'_>]) -> Environment {
        contributions
            .iter()
            .fold(*base, |acc, c| acc.lerp(c.environment, c.weight))
    }
}

#[cfg(test)]
#[path = "compositor_tests.rs"]
mod tests;
