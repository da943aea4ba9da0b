/// Environment - the blendable rendering parameters a volume applies.
///
/// Only continuous parameters live here so that any two environments can
/// be interpolated. Disabling an effect is expressed through its
/// intensity (e.g. `fog_density = 0`).

use std::sync::Arc;
use glam::Vec3;

/// Shared, immutable environment resource as referenced by volumes.
///
/// Identity (not value) decides whether a volume's environment changed,
/// so two distinct `Arc`s with equal contents are different resources.
pub type EnvironmentRef = Arc<Environment>;

/// Rendering environment parameters (background, ambient, fog, tonemap, glow, adjustments).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Environment {
    // ===== BACKGROUND / SKY =====
    pub background_color: Vec3,
    pub background_energy: f32,

    // ===== AMBIENT LIGHT =====
    pub ambient_light_color: Vec3,
    pub ambient_light_energy: f32,

    // ===== FOG =====
    pub fog_light_color: Vec3,
    pub fog_light_energy: f32,
    /// Exponential fog density (0 = no fog)
    pub fog_density: f32,
    /// Height where height fog starts
    pub fog_height: f32,
    /// Height fog density (0 = no height fog)
    pub fog_height_density: f32,
    /// How much the sun tints the fog (0..1)
    pub fog_sun_scatter: f32,

    // ===== TONEMAP / GLOW =====
    pub tonemap_exposure: f32,
    pub glow_intensity: f32,

    // ===== ADJUSTMENTS =====
    pub adjustment_brightness: f32,
    pub adjustment_contrast: f32,
    pub adjustment_saturation: f32,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            background_color: Vec3::ZERO,
            background_energy: 1.0,
            ambient_light_color: Vec3::ZERO,
            ambient_light_energy: 1.0,
            fog_light_color: Vec3::new(0.518, 0.553, 0.608),
            fog_light_energy: 1.0,
            fog_density: 0.0,
            fog_height: 0.0,
            fog_height_density: 0.0,
            fog_sun_scatter: 0.0,
            tonemap_exposure: 1.0,
            glow_intensity: 0.8,
            adjustment_brightness: 1.0,
            adjustment_contrast: 1.0,
            adjustment_saturation: 1.0,
        }
    }
}

impl Environment {
    /// All parameters zero. Neutral element for weighted accumulation.
    pub const ZERO: Self = Self {
        background_color: Vec3::ZERO,
        background_energy: 0.0,
        ambient_light_color: Vec3::ZERO,
        ambient_light_energy: 0.0,
        fog_light_color: Vec3::ZERO,
        fog_light_energy: 0.0,
        fog_density: 0.0,
        fog_height: 0.0,
        fog_height_density: 0.0,
        fog_sun_scatter: 0.0,
        tonemap_exposure: 0.0,
        glow_intensity: 0.0,
        adjustment_brightness: 0.0,
        adjustment_contrast: 0.0,
        adjustment_saturation: 0.0,
    };

    /// Wrap into a shared reference for assignment to volumes.
    pub fn into_ref(self) -> EnvironmentRef {
        Arc::new(self)
    }

    /// Per-parameter `self * a + other * b`.
    pub fn combine(&self, a: f32, other: &Environment, b: f32) -> Environment {
        let s = |x: f32, y: f32| x * a + y * b;
        let v = |x: Vec3, y: Vec3| x * a + y * b;
        Environment {
            background_color: v(self.background_color, other.background_color),
            background_energy: s(self.background_energy, other.background_energy),
            ambient_light_color: v(self.ambient_light_color, other.ambient_light_color),
            ambient_light_energy: s(self.ambient_light_energy, other.ambient_light_energy),
            fog_light_color: v(self.fog_light_color, other.fog_light_color),
            fog_light_energy: s(self.fog_light_energy, other.fog_light_energy),
            fog_density: s(self.fog_density, other.fog_density),
            fog_height: s(self.fog_height, other.fog_height),
            fog_height_density: s(self.fog_height_density, other.fog_height_density),
            fog_sun_scatter: s(self.fog_sun_scatter, other.fog_sun_scatter),
            tonemap_exposure: s(self.tonemap_exposure, other.tonemap_exposure),
            glow_intensity: s(self.glow_intensity, other.glow_intensity),
            adjustment_brightness: s(self.adjustment_brightness, other.adjustment_brightness),
            adjustment_contrast: s(self.adjustment_contrast, other.adjustment_contrast),
            adjustment_saturation: s(self.adjustment_saturation, other.adjustment_saturation),
        }
    }

    /// Every parameter multiplied by `factor`.
    pub fn scaled(&self, factor: f32) -> Environment {
        Environment::ZERO.combine(0.0, self, factor)
    }

    /// Linear interpolation: `t = 0` gives `self`, `t = 1` gives `other`.
    ///
    /// `t` is clamped to [0, 1].
    pub fn lerp(&self, other: &Environment, t: f32) -> Environment {
        let t = t.clamp(0.0, 1.0);
        self.combine(1.0 - t, other, t)
    }

    /// Approximate equality on every parameter, for tests and change detection.
    pub fn abs_diff_eq(&self, other: &Environment, max_abs_diff: f32) -> bool {
        let d = self.combine(1.0, other, -1.0);
        let scalars = [
            d.background_energy, d.ambient_light_energy, d.fog_light_energy,
            d.fog_density, d.fog_height, d.fog_height_density, d.fog_sun_scatter,
            d.tonemap_exposure, d.glow_intensity,
            d.adjustment_brightness, d.adjustment_contrast, d.adjustment_saturation,
        ];
        let vectors = [d.background_color, d.ambient_light_color, d.fog_light_color];
        scalars.iter().all(|x| x.abs() <= max_abs_diff)
            && vectors.iter().all(|v| v.abs().max_element() <= max_abs_diff)
    }
}

#[cfg(test)]
#[path = "environment_tests.rs"]
mod tests;
