//! Reward objects that appear after the game is over.
//!
//! A reward spawns tiny, grows to [`REWARD_SCALE`] and only then receives
//! its physics body (see
//! [`observe_tween_finished`](crate::events::tween::observe_tween_finished)).
//! From that point [`reward_attraction_system`] pushes it toward the player.

use bevy_ecs::prelude::*;
use glam::{Quat, Vec3};
use log::debug;

use crate::components::markers::{Player, Reward};
use crate::components::orientation::Orientation;
use crate::components::rigidbody::RigidBody;
use crate::components::scale::Scale;
use crate::components::tint::Tint;
use crate::components::tween::{DEFAULT_TWEEN_DURATION, TweenAction, TweenScale};
use crate::components::visibility::Visible;
use crate::components::worldposition::WorldPosition;
use crate::events::gameover::REWARD_POSITIONS;
use crate::resources::gameconfig::GameConfig;

pub const REWARD_SPAWN_SCALE: f32 = 0.001;
pub const REWARD_SCALE: f32 = 0.3;

/// Spawn reward `index` at `position`, starting its growth tween.
pub fn spawn_reward(commands: &mut Commands, index: usize, position: Vec3) -> Entity {
    let hue = index as f32 / REWARD_POSITIONS.len() as f32;
    let entity = commands
        .spawn((
            Reward {
                index,
                attracted: false,
            },
            WorldPosition::from_vec(position),
            Orientation::default(),
            Scale::uniform(REWARD_SPAWN_SCALE),
            Tint::from_hsl(hue, 1.0, 0.5),
            Visible(true),
            TweenScale::new(
                Vec3::splat(REWARD_SPAWN_SCALE),
                Vec3::splat(REWARD_SCALE),
                DEFAULT_TWEEN_DURATION,
            )
            .then(TweenAction::ActivateReward),
        ))
        .id();
    debug!("Reward {} spawned at {:?}", index, position);
    entity
}

/// Planar force pulling a reward at `from` toward `to`.
///
/// The direction is rotated by `deflection_degrees` about +Y, which makes
/// rewards circle the player instead of hitting it head on.
pub fn attraction_force(from: Vec3, to: Vec3, magnitude: f32, deflection_degrees: f32) -> Vec3 {
    let dir = (to - from).normalize_or_zero() * magnitude;
    let dir = Quat::from_rotation_y(deflection_degrees.to_radians()) * dir;
    Vec3::new(dir.x, 0.0, dir.z)
}

pub fn reward_attraction_system(
    config: Res<GameConfig>,
    players: Query<&WorldPosition, With<Player>>,
    mut rewards: Query<(&Reward, &WorldPosition, &mut RigidBody)>,
) {
    let Some(player) = players.iter().next().map(|p| p.pos) else {
        return;
    };
    for (reward, pos, mut body) in rewards.iter_mut() {
        if !reward.attracted {
            continue;
        }
        body.apply_central_force(attraction_force(
            pos.pos,
            player,
            config.reward_force,
            config.reward_deflection_degrees,
        ));
    }
}
