//! Systems driving [`GameProgress`] and applying its outcomes to the scene.
//!
//! - [`progress_input_system`] – trigger presses: spawn/consume items, tween
//!   objective scales, pop the indicator
//! - [`animation_drive_system`] – catch the deposit target's clip up with the
//!   progress value
//! - [`progress_completion_system`] – detect the end of the clip and trigger
//!   [`GameOverEvent`]

use bevy_ecs::prelude::*;
use glam::Vec3;
use log::{debug, info};

use crate::components::animation::AnimationClip;
use crate::components::markers::{DepositTarget, Item, Objective};
use crate::components::rigidbody::{Collider, CollisionFilter, RigidBody};
use crate::components::scale::Scale;
use crate::components::tween::TweenScale;
use crate::components::visibility::Visible;
use crate::components::worldposition::WorldPosition;
use crate::events::gameover::GameOverEvent;
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::InputState;
use crate::resources::progress::{Destination, GameProgress, IgnoreReason, TriggerOutcome};
use crate::resources::scene::{HeldItems, SceneEntities};
use crate::resources::worldtime::WorldTime;
use crate::systems::tween::scale_to;

pub const ITEM_RADIUS: f32 = 0.19;
pub const ITEM_MASS: f32 = 0.0001;
/// Group and mask shared by held items and the player shell.
pub const ITEM_COLLISION_GROUP: u32 = 8;
/// Scale the indicator pops from when a new destination is set.
pub const INDICATOR_MIN_SCALE: f32 = 0.0001;

const OBJECTIVE_SHRINK_SECONDS: f32 = 0.2;
const OBJECTIVE_RESTORE_SECONDS: f32 = 0.5;
const INDICATOR_POP_SECONDS: f32 = 0.5;

/// Entity the player is currently heading to.
pub fn destination_entity(progress: &GameProgress, scene: &SceneEntities) -> Option<Entity> {
    match progress.destination() {
        Destination::Objective(i) => scene.objective(i),
        Destination::DepositTarget => Some(scene.deposit_target),
    }
}

/// Physics body of a held item.
pub fn item_body() -> RigidBody {
    RigidBody::dynamic(Collider::Sphere { radius: ITEM_RADIUS }, ITEM_MASS)
        .with_damping(0.9, 0.9)
        .with_friction(0.0)
        .with_restitution(0.0)
        .with_filter(CollisionFilter::new(ITEM_COLLISION_GROUP, ITEM_COLLISION_GROUP))
}

fn pop_indicator(commands: &mut Commands, indicator: Entity) {
    commands.entity(indicator).insert(TweenScale::new(
        Vec3::splat(INDICATOR_MIN_SCALE),
        Vec3::ONE,
        INDICATOR_POP_SECONDS,
    ));
}

/// Feed the held trigger of the configured gamepad into [`GameProgress`].
///
/// Does nothing while no gamepad is connected in the configured slot.
#[allow(clippy::too_many_arguments)]
pub fn progress_input_system(
    mut commands: Commands,
    time: Res<WorldTime>,
    config: Res<GameConfig>,
    input: Res<InputState>,
    scene: Res<SceneEntities>,
    mut progress: ResMut<GameProgress>,
    mut held: ResMut<HeldItems>,
    positions: Query<&WorldPosition>,
    mut objectives: Query<(&Scale, &mut Visible), With<Objective>>,
) {
    let Some(pad) = input.gamepad(config.gamepad_slot) else {
        return;
    };
    if !pad.button(config.trigger_button).active {
        return;
    }
    let Ok(player) = positions.get(scene.player).map(|p| p.pos) else {
        return;
    };
    let Some(destination) = destination_entity(&progress, &scene)
        .and_then(|e| positions.get(e).ok())
        .map(|p| p.pos)
    else {
        return;
    };

    let outcome = progress.press_trigger(time.elapsed, player.distance(destination));
    match outcome {
        TriggerOutcome::Ignored(reason) => {
            if reason == IgnoreReason::NothingToDo {
                debug!("Trigger at the deposit target with empty hands");
            }
        }
        TriggerOutcome::Collected {
            objective,
            held: count,
            remaining_scale,
            depleted,
        } => {
            let item = commands
                .spawn((
                    Item,
                    WorldPosition::from_vec(player),
                    item_body(),
                    Visible(false),
                ))
                .id();
            held.0.push(item);
            debug!("Collected item {} from objective {}", count, objective);

            let Some(entity) = scene.objective(objective) else {
                return;
            };
            if let Ok((scale, mut visible)) = objectives.get_mut(entity) {
                commands.entity(entity).insert(scale_to(
                    scale.scale,
                    remaining_scale,
                    OBJECTIVE_SHRINK_SECONDS,
                ));
                if depleted {
                    visible.0 = false;
                }
            }
            if depleted {
                info!("Objective {} depleted, carrying {} items", objective, count);
                pop_indicator(&mut commands, scene.indicator);
            }
        }
        TriggerOutcome::Deposited {
            objective,
            held: count,
            progress: value,
        } => {
            if let Some(item) = held.0.pop() {
                commands.entity(item).try_despawn();
            }
            debug!(
                "Deposited item from objective {}: {} left, progress {:.3}",
                objective, count, value
            );
        }
        TriggerOutcome::Advanced { objective } => {
            if let Some(entity) = scene.objective(objective) {
                if let Ok((scale, mut visible)) = objectives.get_mut(entity) {
                    visible.0 = true;
                    commands.entity(entity).insert(scale_to(
                        scale.scale,
                        1.0,
                        OBJECTIVE_RESTORE_SECONDS,
                    ));
                }
            }
            pop_indicator(&mut commands, scene.indicator);
            info!("Now collecting from objective {}", objective);
        }
    }
}

/// Advance the deposit target's clip while it lags behind the progress value.
pub fn animation_drive_system(
    time: Res<WorldTime>,
    progress: Res<GameProgress>,
    mut clips: Query<&mut AnimationClip, With<DepositTarget>>,
) {
    for mut clip in clips.iter_mut() {
        let step = progress.animation_step(clip.time, time.delta);
        if step > 0.0 {
            clip.advance(step);
        }
    }
}

/// Trigger [`GameOverEvent`] the first time the clip reaches its end.
pub fn progress_completion_system(
    mut commands: Commands,
    time: Res<WorldTime>,
    mut progress: ResMut<GameProgress>,
    clips: Query<&AnimationClip, With<DepositTarget>>,
) {
    let Some(clip) = clips.iter().next() else {
        return;
    };
    if progress.check_completion(clip.time) {
        info!(
            "Deposit target finished growing at {:.2}s ({} items deposited)",
            time.elapsed,
            progress.deposited()
        );
        commands.trigger(GameOverEvent { time: time.elapsed });
    }
}
