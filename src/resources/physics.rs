//! World-wide settings of the headless physics step.

use bevy_ecs::prelude::Resource;
use glam::Vec3;

#[derive(Resource, Clone, Copy, Debug)]
pub struct PhysicsSettings {
    pub gravity: Vec3,
    /// Height of the ground plane.
    pub floor_y: f32,
    /// Invisible walls at `±arena_half_extent` on X and Z.
    pub arena_half_extent: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.8, 0.0),
            floor_y: -6.0,
            arena_half_extent: 49.5,
        }
    }
}

impl PhysicsSettings {
    pub fn from_config(config: &crate::resources::gameconfig::GameConfig) -> Self {
        Self {
            gravity: Vec3::new(0.0, config.gravity, 0.0),
            floor_y: config.floor,
            arena_half_extent: config.arena,
        }
    }
}
