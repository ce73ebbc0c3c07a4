//! Lifecycle systems and run conditions.
use crate::events::gamestate::GameStateChangedEvent;
use crate::resources::gameconfig::GameConfig;
use crate::resources::gamestate::{GameState, GameStates, NextGameState, NextGameStates};
use crate::resources::progress::GameProgress;
use crate::resources::worldtime::WorldTime;
use bevy_ecs::prelude::*;
use log::info;

/// Trigger [`GameStateChangedEvent`] when a transition is pending.
pub fn check_pending_state(mut commands: Commands, next_state: Res<NextGameState>) {
    if let NextGameStates::Pending(_) = next_state.get() {
        commands.trigger(GameStateChangedEvent {});
    }
}

pub fn state_is_playing(state: Res<GameState>) -> bool {
    matches!(state.get(), GameStates::Playing)
}

/// Request [`GameStates::Quitting`] once the game has been over for
/// `linger` seconds.
pub fn quit_after_game_over(
    time: Res<WorldTime>,
    config: Res<GameConfig>,
    progress: Res<GameProgress>,
    mut next_state: ResMut<NextGameState>,
    mut over_since: Local<Option<f32>>,
) {
    if !progress.is_game_over() {
        return;
    }
    let since = *over_since.get_or_insert(time.elapsed);
    if time.elapsed - since >= config.linger && next_state.get() == NextGameStates::Unchanged {
        info!("Game over for {:.1}s, quitting", time.elapsed - since);
        next_state.set(GameStates::Quitting);
    }
}
