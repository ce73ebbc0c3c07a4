//! Shadow-casting directional light that follows the player.

use bevy_ecs::prelude::Resource;
use glam::Vec3;

#[derive(Resource, Clone, Copy, Debug)]
pub struct DirectionalLight {
    pub position: Vec3,
    pub target: Vec3,
    pub follow_offset: Vec3,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            position: Vec3::new(100.0, 50.0, 50.0),
            target: Vec3::ZERO,
            follow_offset: Vec3::new(100.0, 50.0, 50.0),
        }
    }
}

impl DirectionalLight {
    pub fn follow(&mut self, point: Vec3) {
        self.position = point + self.follow_offset;
        self.target = point;
    }

    /// Unit vector the light travels along.
    pub fn direction(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }
}
