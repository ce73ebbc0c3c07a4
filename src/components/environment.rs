//! Scene environment settings attached to the environment entity.

use bevy_ecs::prelude::Component;

/// Linear distance fog.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Fog {
    /// Packed `0xRRGGBB` color.
    pub color: u32,
    pub near: f32,
    pub far: f32,
}

impl Fog {
    pub fn new(color: u32, near: f32, far: f32) -> Self {
        Self { color, near, far }
    }
}
