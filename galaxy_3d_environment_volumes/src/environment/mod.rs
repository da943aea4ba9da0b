//! Environment module - blendable environment parameters and the
//! strategies that composite several of them for one camera.

mod environment;
mod compositor;

pub use environment::{Environment, EnvironmentRef};
pub use compositor::{
    Compositor, CompositeMode, Contribution,
    WeightedAverageCompositor, PriorityCompositor,
};
