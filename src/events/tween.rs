//! Tween completion events.
//!
//! A one-shot tween that carries a [`TweenAction`] triggers
//! [`TweenFinished`] when it reaches its end. [`observe_tween_finished`]
//! resolves the action. Nothing cancels a finished action.
//!
//! # Related
//!
//! - [`crate::components::tween`] – the tween components
//! - [`crate::systems::tween`] – the systems that emit these events

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{debug, info};

use crate::components::markers::Reward;
use crate::components::rigidbody::{Collider, RigidBody};
use crate::components::scale::Scale;
use crate::components::storm::StormField;
use crate::components::tween::TweenAction;
use crate::components::visibility::Visible;

/// Mass of a reward once it becomes a physics body.
pub const REWARD_MASS: f32 = 0.01;

/// Event emitted when a one-shot tween with a completion action finishes.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TweenFinished {
    /// The entity whose tween finished.
    pub entity: Entity,
    pub action: TweenAction,
}

pub fn observe_tween_finished(
    trigger: On<TweenFinished>,
    mut commands: Commands,
    mut storms: Query<(&mut StormField, &mut Visible)>,
    mut rewards: Query<(&mut Reward, &Scale)>,
) {
    let event = trigger.event();
    match event.action {
        TweenAction::DisableStorm => {
            if let Ok((mut storm, mut visible)) = storms.get_mut(event.entity) {
                storm.enabled = false;
                visible.0 = false;
                info!("Storm cleared");
            }
        }
        TweenAction::ActivateReward => {
            let Ok((mut reward, scale)) = rewards.get_mut(event.entity) else {
                return;
            };
            reward.attracted = true;
            let radius = scale.scale.max_element();
            commands.entity(event.entity).insert(
                RigidBody::dynamic(Collider::Sphere { radius }, REWARD_MASS)
                    .with_damping(0.5, 0.3),
            );
            debug!("Reward {} active with radius {:.2}", reward.index, radius);
        }
    }
}
