//! High-level game state resources.
//!
//! [`GameState`] holds the current lifecycle state of the simulation and
//! [`NextGameState`] a transition requested by a system. The request is
//! picked up by [`check_pending_state`](crate::systems::gamestate::check_pending_state),
//! which triggers [`GameStateChangedEvent`](crate::events::gamestate::GameStateChangedEvent);
//! its observer applies the change and runs the matching hook from
//! [`SystemsStore`](super::systemsstore::SystemsStore).

use bevy_ecs::prelude::Resource;

/// Discrete lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameStates {
    #[default]
    None,
    /// Building the scene.
    Setup,
    Playing,
    /// The driver stops ticking once this is reached.
    Quitting,
}

/// Representation of a requested next state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NextGameStates {
    #[default]
    Unchanged,
    Pending(GameStates),
}

/// Authoritative current game state.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct GameState {
    current: GameStates,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn get(&self) -> GameStates {
        self.current
    }
    /// Update the current state immediately, without running hooks.
    pub fn set(&mut self, state: GameStates) {
        self.current = state;
    }
}

/// Intent to change to a new game state.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NextGameState {
    next: NextGameStates,
}

impl NextGameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> NextGameStates {
        self.next
    }

    /// Request a transition to `next`.
    pub fn set(&mut self, next: GameStates) {
        self.next = NextGameStates::Pending(next);
    }

    pub fn reset(&mut self) {
        self.next = NextGameStates::Unchanged;
    }
}
