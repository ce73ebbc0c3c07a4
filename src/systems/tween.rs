//! Tween animation systems.
//!
//! These systems update entity properties over time based on tween components:
//! - [`tween_scale_system`] – animates [`Scale`]
//! - [`tween_opacity_system`] – animates [`Opacity`]
//! - [`tween_fog_system`] – animates the near/far planes of [`Fog`]
//!
//! Each system reads delta time from [`WorldTime`]. When a one-shot tween
//! that carries a [`TweenAction`](crate::components::tween::TweenAction)
//! reaches its end, a [`TweenFinished`] event is triggered exactly once.

use crate::components::environment::Fog;
use crate::components::scale::Scale;
use crate::components::tween::{TweenClock, TweenFog, TweenOpacity, TweenScale};
use crate::components::visibility::Opacity;
use crate::events::tween::TweenFinished;
use crate::resources::worldtime::WorldTime;
use bevy_ecs::prelude::*;
use glam::Vec3;

/// Quadratic ease-out of a normalized time value, clamped to [0.0, 1.0].
pub(crate) fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * (2.0 - t)
}

/// Linearly interpolate between two floats.
pub(crate) fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Map `v` from the range `[a, b]` onto `[c, d]` without clamping.
pub(crate) fn map_range(v: f32, a: f32, b: f32, c: f32, d: f32) -> f32 {
    if (b - a).abs() < f32::EPSILON {
        return c;
    }
    (v - a) / (b - a) * (d - c) + c
}

/// Advance tween time.
///
/// Returns `true` on the step where the tween stops.
pub(crate) fn advance(clock: &mut TweenClock, dt: f32) -> bool {
    clock.time += dt;
    if clock.time >= clock.duration {
        clock.playing = false;
        clock.time = clock.duration.max(0.0);
        return true;
    }
    false
}

/// Eased position of the clock in [0.0, 1.0].
fn eased(clock: &TweenClock) -> f32 {
    if clock.duration <= 0.0 {
        return 1.0;
    }
    ease_out(clock.time / clock.duration)
}

/// Step `clock` and emit [`TweenFinished`] if it just completed with an action.
fn step_clock(clock: &mut TweenClock, dt: f32, entity: Entity, commands: &mut Commands) -> f32 {
    if advance(clock, dt) {
        if let Some(action) = clock.on_complete.take() {
            commands.trigger(TweenFinished { entity, action });
        }
    }
    eased(clock)
}

/// Animate entity scales based on [`TweenScale`] components.
pub fn tween_scale_system(
    mut commands: Commands,
    world_time: Res<WorldTime>,
    mut query: Query<(Entity, &mut Scale, &mut TweenScale)>,
) {
    let dt = world_time.delta.max(0.0);
    for (entity, mut scale, mut tw) in query.iter_mut() {
        if !tw.clock.playing {
            continue;
        }
        let t = step_clock(&mut tw.clock, dt, entity, &mut commands);
        scale.scale = tw.from.lerp(tw.to, t);
    }
}

/// Animate entity opacity based on [`TweenOpacity`] components.
pub fn tween_opacity_system(
    mut commands: Commands,
    world_time: Res<WorldTime>,
    mut query: Query<(Entity, &mut Opacity, &mut TweenOpacity)>,
) {
    let dt = world_time.delta.max(0.0);
    for (entity, mut opacity, mut tw) in query.iter_mut() {
        if !tw.clock.playing {
            continue;
        }
        let t = step_clock(&mut tw.clock, dt, entity, &mut commands);
        opacity.value = lerp_f32(tw.from, tw.to, t);
    }
}

/// Animate fog planes based on [`TweenFog`] components.
pub fn tween_fog_system(
    mut commands: Commands,
    world_time: Res<WorldTime>,
    mut query: Query<(Entity, &mut Fog, &mut TweenFog)>,
) {
    let dt = world_time.delta.max(0.0);
    for (entity, mut fog, mut tw) in query.iter_mut() {
        if !tw.clock.playing {
            continue;
        }
        let t = step_clock(&mut tw.clock, dt, entity, &mut commands);
        fog.near = lerp_f32(tw.from.0, tw.to.0, t);
        fog.far = lerp_f32(tw.from.1, tw.to.1, t);
    }
}

/// A scale tween from `current` to `to`, in the default one-shot style.
pub fn scale_to(current: Vec3, to: f32, duration: f32) -> TweenScale {
    TweenScale::new(current, Vec3::splat(to), duration)
}
