//! Named one-shot systems.
//!
//! Lifecycle hooks (`"setup"`, `"enter_play"`, `"quit_game"`) are registered
//! here by [`crate::game`] and run by the game state observer when the
//! matching transition happens.

use bevy_ecs::prelude::Resource;
use bevy_ecs::system::SystemId;
use rustc_hash::FxHashMap;

#[derive(Resource, Default)]
pub struct SystemsStore {
    pub map: FxHashMap<String, SystemId>,
}

impl SystemsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, id: SystemId) {
        self.map.insert(name.into(), id);
    }

    pub fn get(&self, name: impl AsRef<str>) -> Option<SystemId> {
        self.map.get(name.as_ref()).copied()
    }
}
