//! Input systems.
//!
//! [`poll_gamepads`] asks the active
//! [`GamepadSource`](crate::resources::input::GamepadSource) for a reading of
//! every slot and writes the results into
//! [`InputState`](crate::resources::input::InputState).
use bevy_ecs::prelude::*;
use log::info;

use crate::components::markers::Player;
use crate::components::worldposition::WorldPosition;
use crate::resources::input::{FrameObservation, GamepadFeed, InputState};
use crate::resources::progress::GameProgress;
use crate::resources::scene::SceneEntities;
use crate::resources::worldtime::WorldTime;
use crate::systems::progress::destination_entity;

/// Poll the gamepad source and update the `InputState` resource.
pub fn poll_gamepads(
    time: Res<WorldTime>,
    mut feed: ResMut<GamepadFeed>,
    mut input: ResMut<InputState>,
    progress: Option<Res<GameProgress>>,
    scene: Option<Res<SceneEntities>>,
    players: Query<&WorldPosition, With<Player>>,
    positions: Query<&WorldPosition>,
) {
    let player = players.iter().next().map(|p| p.pos).unwrap_or_default();
    let destination = match (progress.as_deref(), scene.as_deref()) {
        (Some(progress), Some(scene)) => destination_entity(progress, scene)
            .and_then(|e| positions.get(e).ok())
            .map(|p| p.pos),
        _ => None,
    };
    let observation = FrameObservation {
        time: time.elapsed,
        player,
        destination,
    };

    for (slot, pad) in input.pads.iter_mut().enumerate() {
        let was_connected = pad.connected;
        let snapshot = feed.source.poll(slot, &observation);
        pad.apply(snapshot.as_ref());
        if pad.connected != was_connected {
            info!(
                "Gamepad {} {}",
                slot,
                if pad.connected { "connected" } else { "disconnected" }
            );
        }
    }
}
