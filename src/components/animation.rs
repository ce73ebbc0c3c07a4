//! Manually stepped animation clip.
//!
//! The deposit target carries one [`AnimationClip`]. Its playback position is
//! never scrubbed directly: [`crate::systems::progress::animation_drive_system`]
//! advances it in small steps while it lags behind the progress value.

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Component, Serialize, Deserialize)]
pub struct AnimationClip {
    pub name: String,
    /// Current playback position in seconds.
    pub time: f32,
    /// Terminal time of the clip.
    pub duration: f32,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            time: 0.0,
            duration,
        }
    }

    /// Step playback forward by `dt` seconds, holding at the terminal time.
    pub fn advance(&mut self, dt: f32) {
        self.time = (self.time + dt.max(0.0)).min(self.duration);
    }

    pub fn at_end(&self) -> bool {
        self.time >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_clamps_to_duration() {
        let mut clip = AnimationClip::new("grow", 3.32);
        clip.advance(1.0);
        assert!((clip.time - 1.0).abs() < 1e-6);
        clip.advance(10.0);
        assert_eq!(clip.time, 3.32);
        assert!(clip.at_end());
    }

    #[test]
    fn test_advance_ignores_negative_steps() {
        let mut clip = AnimationClip::new("grow", 2.0);
        clip.advance(0.5);
        clip.advance(-0.25);
        assert!((clip.time - 0.5).abs() < 1e-6);
    }
}
