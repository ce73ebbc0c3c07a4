//! Visibility and opacity components.
//!
//! A hidden entity keeps simulating; the flag only tells the presentation
//! layer not to draw it.

use bevy_ecs::prelude::Component;

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Visible(pub bool);

impl Default for Visible {
    fn default() -> Self {
        Visible(true)
    }
}

/// Material opacity in `[0, 1]`.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Opacity {
    pub value: f32,
    /// Whether the material blends at all. Mirrors the "transparent" material switch.
    pub transparent: bool,
}

impl Opacity {
    pub fn new(value: f32) -> Self {
        Self {
            value,
            transparent: true,
        }
    }

    pub fn opaque() -> Self {
        Self {
            value: 1.0,
            transparent: false,
        }
    }
}
