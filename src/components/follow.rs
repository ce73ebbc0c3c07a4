//! Attachment component for entities that track another entity.
//!
//! The [`Follow`] component makes an entity copy its target's
//! [`WorldPosition`](super::worldposition::WorldPosition) every frame, plus an
//! offset. The player shell and the guidance indicator ride on the player
//! this way.
//!
//! # Related
//!
//! - [`crate::systems::follow::follow_system`] – the system that applies it

use bevy_ecs::prelude::{Component, Entity};
use glam::Vec3;

#[derive(Debug, Clone, Component)]
pub struct Follow {
    /// Entity whose position is copied.
    pub target: Entity,
    /// World-space offset added to the target position.
    pub offset: Vec3,
    /// Also copy the target's orientation.
    pub copy_orientation: bool,
}

impl Follow {
    pub fn new(target: Entity) -> Self {
        Self {
            target,
            offset: Vec3::ZERO,
            copy_orientation: false,
        }
    }

    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_orientation(mut self) -> Self {
        self.copy_orientation = true;
        self
    }
}
