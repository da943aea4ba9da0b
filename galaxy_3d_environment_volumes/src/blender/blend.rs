/// Time smoothing of per-camera blend strengths.

/// Move `current` toward `target` by at most `delta / blend_time`.
///
/// Both strengths live in [0, 1]. A `blend_time` of 0 (or less) reaches the
/// target immediately; a negative `delta` never moves the strength.
pub fn step_strength(current: f32, target: f32, delta: f32, blend_time: f32) -> f32 {
    let target = target.clamp(0.0, 1.0);
    if blend_time <= 0.0 {
        return target;
    }

    let max_step = delta.max(0.0) / blend_time;
    let diff = target - current;
    let next = if diff.abs() <= max_step {
        target
    } else {
        current + max_step.copysign(diff)
    };
    next.clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "blend_tests.rs"]
mod tests;
