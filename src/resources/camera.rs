//! Shared 3D camera resource.
//!
//! The camera trails the player at a fixed offset and always looks at it.
//! Updated by [`crate::systems::player::camera_follow_system`].

use bevy_ecs::prelude::Resource;
use glam::Vec3;

#[derive(Resource, Clone, Copy, Debug)]
pub struct Camera3D {
    pub position: Vec3,
    pub target: Vec3,
    /// Offset from the followed point.
    pub follow_offset: Vec3,
}

impl Default for Camera3D {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 6.0, 15.0),
            target: Vec3::ZERO,
            follow_offset: Vec3::new(0.0, 6.0, 15.0),
        }
    }
}

impl Camera3D {
    pub fn follow(&mut self, point: Vec3) {
        self.position = point + self.follow_offset;
        self.target = point;
    }
}
