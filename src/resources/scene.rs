//! Handles to the long-lived scene entities.
//!
//! Written once by the setup system so per-frame systems can reach specific
//! objects without a marker query for each of them.

use bevy_ecs::prelude::*;

#[derive(Resource, Debug, Clone)]
pub struct SceneEntities {
    pub player: Entity,
    pub shell: Entity,
    pub deposit_target: Entity,
    pub indicator: Entity,
    pub iso_surface: Entity,
    pub environment: Entity,
    pub storm: Option<Entity>,
    /// Objective entities in visiting order.
    pub objectives: Vec<Entity>,
}

impl SceneEntities {
    pub fn objective(&self, index: usize) -> Option<Entity> {
        self.objectives.get(index).copied()
    }
}

/// Items the player carries, most recent last.
#[derive(Resource, Debug, Clone, Default)]
pub struct HeldItems(pub Vec<Entity>);
