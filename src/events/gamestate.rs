//! Game state transition event and observer.
//!
//! Systems request a change of [`GameStates`] through [`NextGameState`].
//! [`check_pending_state`](crate::systems::gamestate::check_pending_state)
//! then triggers a [`GameStateChangedEvent`], and the observer in this module
//! applies the transition to [`GameState`] and runs the hook registered for
//! the new state in [`SystemsStore`].
use crate::resources::gamestate::NextGameStates::{Pending, Unchanged};
use crate::resources::gamestate::{GameState, GameStates, NextGameState};
use crate::resources::systemsstore::SystemsStore;
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{debug, info, warn};

/// Signals that a pending game state transition should be applied.
#[derive(Event, Debug, Clone, Copy)]
pub struct GameStateChangedEvent {}

/// Observer that applies a pending game state transition.
///
/// If [`NextGameState`] is [`Pending`], the new value is copied into
/// [`GameState`], the request is cleared and the enter hook of the new state
/// is queued. Hooks are looked up in [`SystemsStore`] under `"setup"`,
/// `"enter_play"` and `"quit_game"`.
pub fn observe_gamestate_change_event(
    _trigger: On<GameStateChangedEvent>,
    mut commands: Commands,
    mut next_game_state: ResMut<NextGameState>,
    mut game_state: ResMut<GameState>,
    systems_store: Res<SystemsStore>,
) {
    match next_game_state.get() {
        Pending(new_state) => {
            let old_state = game_state.get();
            info!("Transitioning from {:?} to {:?}", old_state, new_state);
            game_state.set(new_state);
            next_game_state.reset();
            on_state_enter(new_state, &mut commands, &systems_store);
        }
        Unchanged => {
            debug!("No state change pending.");
        }
    }
}

fn on_state_enter(state: GameStates, commands: &mut Commands, systems_store: &SystemsStore) {
    let hook = match state {
        GameStates::None => return,
        GameStates::Setup => "setup",
        GameStates::Playing => "enter_play",
        GameStates::Quitting => "quit_game",
    };
    match systems_store.get(hook) {
        Some(id) => commands.run_system(id),
        None => warn!("No '{}' system registered for {:?}", hook, state),
    }
}
