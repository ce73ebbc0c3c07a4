//! World-space rotation component.
//!
//! The [`Orientation`] component holds the rotation of an entity as a
//! quaternion. Forward is the local +Z axis, which is what the indicator and
//! followers aim with.

use bevy_ecs::prelude::Component;
use glam::{Quat, Vec3};

#[derive(Component, Clone, Debug, Copy)]
pub struct Orientation {
    pub rot: Quat,
}

impl Default for Orientation {
    fn default() -> Self {
        Self {
            rot: Quat::IDENTITY,
        }
    }
}

impl Orientation {
    /// Rotation that turns the local +Z axis toward `target` as seen from `eye`.
    ///
    /// Leaves the current rotation untouched when both points coincide.
    pub fn look_at(&mut self, eye: Vec3, target: Vec3) {
        let dir = (target - eye).normalize_or_zero();
        if dir != Vec3::ZERO {
            self.rot = Quat::from_rotation_arc(Vec3::Z, dir);
        }
    }

    /// Local +Z axis in world space.
    pub fn forward(&self) -> Vec3 {
        self.rot * Vec3::Z
    }
}
