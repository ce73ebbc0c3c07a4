//! Tween components for animated interpolation.
//!
//! This module provides components for smoothly animating entity properties
//! over time:
//! - [`TweenScale`] – animate [`Scale`](super::scale::Scale)
//! - [`TweenOpacity`] – animate [`Opacity`](super::visibility::Opacity)
//! - [`TweenFog`] – animate the near/far planes of [`Fog`](super::environment::Fog)
//!
//! Every tween plays once, easing out quadratically, and may carry a
//! [`TweenAction`] that is resolved when it reaches its end. See
//! [`crate::systems::tween`] for the update systems.

use bevy_ecs::prelude::Component;
use glam::Vec3;

/// Follow-up resolved when a one-shot tween completes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TweenAction {
    /// Hide the storm and stop simulating it.
    DisableStorm,
    /// Give a grown reward its physics body and start attracting it.
    ActivateReward,
}

/// Shared playback state of every tween kind.
#[derive(Clone, Debug)]
pub struct TweenClock {
    /// Duration in seconds.
    pub duration: f32,
    /// Whether the tween is currently playing.
    pub playing: bool,
    /// Current time within the tween.
    pub time: f32,
    /// Resolved once when the tween finishes.
    pub on_complete: Option<TweenAction>,
}

/// Duration used when a caller has no better value.
pub const DEFAULT_TWEEN_DURATION: f32 = 0.5;

impl TweenClock {
    pub fn new(duration: f32) -> Self {
        TweenClock {
            duration,
            playing: true,
            time: 0.0,
            on_complete: None,
        }
    }
}

macro_rules! tween_builders {
    ($ty:ty) => {
        impl $ty {
            pub fn then(mut self, action: TweenAction) -> Self {
                self.clock.on_complete = Some(action);
                self
            }
        }
    };
}

/// Animates an entity's [`Scale`](super::scale::Scale) between two values.
#[derive(Component, Clone, Debug)]
pub struct TweenScale {
    /// Starting scale.
    pub from: Vec3,
    /// Ending scale.
    pub to: Vec3,
    pub clock: TweenClock,
}

impl TweenScale {
    pub fn new(from: Vec3, to: Vec3, duration: f32) -> Self {
        TweenScale {
            from,
            to,
            clock: TweenClock::new(duration),
        }
    }
}
tween_builders!(TweenScale);

/// Animates an entity's [`Opacity`](super::visibility::Opacity).
#[derive(Component, Clone, Debug)]
pub struct TweenOpacity {
    pub from: f32,
    pub to: f32,
    pub clock: TweenClock,
}

impl TweenOpacity {
    pub fn new(from: f32, to: f32, duration: f32) -> Self {
        TweenOpacity {
            from,
            to,
            clock: TweenClock::new(duration),
        }
    }
}
tween_builders!(TweenOpacity);

/// Animates the near and far planes of an entity's [`Fog`](super::environment::Fog).
#[derive(Component, Clone, Debug)]
pub struct TweenFog {
    /// Starting `(near, far)`.
    pub from: (f32, f32),
    /// Ending `(near, far)`.
    pub to: (f32, f32),
    pub clock: TweenClock,
}

impl TweenFog {
    pub fn new(from: (f32, f32), to: (f32, f32), duration: f32) -> Self {
        TweenFog {
            from,
            to,
            clock: TweenClock::new(duration),
        }
    }
}
tween_builders!(TweenFog);
