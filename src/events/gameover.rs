//! Game over event and the terminal effects it starts.
//!
//! [`GameOverEvent`] is triggered once, by
//! [`progress_completion_system`](crate::systems::progress::progress_completion_system),
//! when the deposit target's clip reaches its end. [`observe_game_over`]
//! then:
//!
//! - pushes the fog out to near 100 / far 110 over ten seconds
//! - shrinks the indicator away
//! - fades the storm out, after which it is hidden and stops simulating
//! - schedules one reward spawn per entry of [`REWARD_POSITIONS`]

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use glam::Vec3;
use log::info;

use crate::components::environment::Fog;
use crate::components::scale::Scale;
use crate::components::storm::random_range;
use crate::components::tween::{TweenAction, TweenFog, TweenOpacity};
use crate::components::visibility::Opacity;
use crate::resources::gameconfig::GameConfig;
use crate::resources::rng::GameRng;
use crate::resources::scene::SceneEntities;
use crate::resources::tasks::{ScheduledTasks, TaskKind};
use crate::systems::progress::INDICATOR_MIN_SCALE;
use crate::systems::tween::scale_to;

/// Where rewards appear, around the top of the deposit target.
pub const REWARD_POSITIONS: [[f32; 3]; 8] = [
    [-0.7, 1.3, 0.2],
    [-2.0, 0.8, -0.9],
    [-0.5, 1.2, -1.9],
    [0.0, -0.2, 1.5],
    [-0.13, -1.11, -1.25],
    [-0.5, -2.12, 1.33],
    [1.06, -1.47, -0.86],
    [-1.53, -2.29, -0.6],
];

pub const FOG_CLEAR: (f32, f32) = (100.0, 110.0);
pub const FOG_CLEAR_SECONDS: f32 = 10.0;
const INDICATOR_HIDE_SECONDS: f32 = 0.1;
const STORM_FADE_SECONDS: f32 = 0.5;

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct GameOverEvent {
    /// World elapsed seconds when the game ended.
    pub time: f32,
}

#[allow(clippy::too_many_arguments)]
pub fn observe_game_over(
    trigger: On<GameOverEvent>,
    mut commands: Commands,
    config: Res<GameConfig>,
    scene: Res<SceneEntities>,
    mut rng: ResMut<GameRng>,
    mut tasks: ResMut<ScheduledTasks>,
    fogs: Query<&Fog>,
    scales: Query<&Scale>,
    mut opacities: Query<&mut Opacity>,
) {
    let now = trigger.event().time;
    info!("Game over at {:.2}s", now);

    if let Ok(fog) = fogs.get(scene.environment) {
        commands.entity(scene.environment).insert(TweenFog::new(
            (fog.near, fog.far),
            FOG_CLEAR,
            FOG_CLEAR_SECONDS,
        ));
    }

    if let Ok(scale) = scales.get(scene.indicator) {
        commands.entity(scene.indicator).insert(scale_to(
            scale.scale,
            INDICATOR_MIN_SCALE,
            INDICATOR_HIDE_SECONDS,
        ));
    }

    if let Some(storm) = scene.storm {
        if let Ok(mut opacity) = opacities.get_mut(storm) {
            opacity.transparent = true;
            commands.entity(storm).insert(
                TweenOpacity::new(opacity.value, 0.0, STORM_FADE_SECONDS)
                    .then(TweenAction::DisableStorm),
            );
        }
    }

    if config.rewards_enabled {
        for (index, [x, y, z]) in REWARD_POSITIONS.iter().copied().enumerate() {
            let delay = random_range(&mut rng.0, config.reward_delay_min, config.reward_delay_max);
            tasks.schedule(
                now + delay,
                TaskKind::SpawnReward {
                    index,
                    position: Vec3::new(x, y, z),
                },
            );
        }
        info!("Scheduled {} rewards", REWARD_POSITIONS.len());
    }
}
