//! Material color tint.
//!
//! The [`Tint`] component stores a linear RGB color for an entity's material.
//! Rewards are tinted by hue so each one reads as a different color.

use bevy_ecs::prelude::Component;

#[derive(Component, Clone, Debug, Copy, PartialEq)]
pub struct Tint {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Tint {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build a tint from hue/saturation/lightness, all in `[0, 1]`.
    ///
    /// Hue wraps, so `1.25` is the same as `0.25`.
    pub fn from_hsl(h: f32, s: f32, l: f32) -> Self {
        let h = h.rem_euclid(1.0);
        if s <= 0.0 {
            return Self::new(l, l, l);
        }
        let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        Self {
            r: hue_to_channel(p, q, h + 1.0 / 3.0),
            g: hue_to_channel(p, q, h),
            b: hue_to_channel(p, q, h - 1.0 / 3.0),
        }
    }
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}

impl Default for Tint {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}
