//! Per-frame gamepad input.
//!
//! Gamepads are polled, never pushed: once per frame the
//! [`poll_gamepads`](crate::systems::input::poll_gamepads) system asks the
//! active [`GamepadSource`] for a [`GamepadSnapshot`] of every slot and
//! folds it into [`InputState`], which tracks pressed/released edges per
//! button.
//!
//! Three sources are provided:
//!
//! - [`NoGamepad`] – nothing is ever connected
//! - [`ScriptedGamepad`] – replays a JSON timeline of keyframes
//! - [`Autopilot`] – steers toward the current destination and holds the trigger
use bevy_ecs::prelude::*;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::path::Path;

/// Number of gamepad slots polled each frame.
pub const GAMEPAD_SLOTS: usize = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Boolean button state with edge detection.
pub struct BoolState {
    /// Whether the button is currently held this frame.
    pub active: bool,
    /// Whether the button went down this frame.
    pub just_pressed: bool,
    /// Whether the button went up this frame.
    pub just_released: bool,
}

impl BoolState {
    /// Feed the raw pressed value for a new frame.
    pub fn update(&mut self, pressed: bool) {
        self.just_pressed = pressed && !self.active;
        self.just_released = !pressed && self.active;
        self.active = pressed;
    }
}

/// State of one gamepad slot.
#[derive(Debug, Clone, Default)]
pub struct GamepadState {
    pub connected: bool,
    pub axes: SmallVec<[f32; 4]>,
    pub buttons: SmallVec<[BoolState; 16]>,
}

impl GamepadState {
    /// Axis value, `0.0` when the pad reports fewer axes.
    pub fn axis(&self, index: usize) -> f32 {
        self.axes.get(index).copied().unwrap_or(0.0)
    }

    /// Button state, released when the pad reports fewer buttons.
    pub fn button(&self, index: usize) -> BoolState {
        self.buttons.get(index).copied().unwrap_or_default()
    }

    /// Apply a fresh snapshot, or a disconnect when `None`.
    pub fn apply(&mut self, snapshot: Option<&GamepadSnapshot>) {
        match snapshot {
            Some(snapshot) => {
                self.connected = true;
                self.axes.clear();
                self.axes
                    .extend(snapshot.axes.iter().map(|a| a.clamp(-1.0, 1.0)));
                let count = snapshot.buttons.len().max(self.buttons.len());
                self.buttons.resize(count, BoolState::default());
                for (i, button) in self.buttons.iter_mut().enumerate() {
                    button.update(snapshot.buttons.get(i).copied().unwrap_or(false));
                }
            }
            None => {
                self.connected = false;
                self.axes.clear();
                for button in self.buttons.iter_mut() {
                    button.update(false);
                }
            }
        }
    }
}

/// Resource capturing the per-frame gamepad state of every slot.
#[derive(Resource, Debug, Clone)]
pub struct InputState {
    pub pads: SmallVec<[GamepadState; GAMEPAD_SLOTS]>,
}

impl Default for InputState {
    fn default() -> Self {
        InputState {
            pads: (0..GAMEPAD_SLOTS).map(|_| GamepadState::default()).collect(),
        }
    }
}

impl InputState {
    /// The gamepad in `slot`, if one is connected.
    pub fn gamepad(&self, slot: usize) -> Option<&GamepadState> {
        self.pads.get(slot).filter(|pad| pad.connected)
    }
}

/// Raw gamepad reading for one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GamepadSnapshot {
    #[serde(default)]
    pub axes: Vec<f32>,
    #[serde(default)]
    pub buttons: Vec<bool>,
}

impl GamepadSnapshot {
    pub fn neutral() -> Self {
        Self::default()
    }

    pub fn with_axes(mut self, x: f32, y: f32) -> Self {
        self.axes = vec![x, y];
        self
    }

    pub fn with_button(mut self, index: usize, pressed: bool) -> Self {
        if self.buttons.len() <= index {
            self.buttons.resize(index + 1, false);
        }
        self.buttons[index] = pressed;
        self
    }
}

/// What a source may look at when producing a reading.
#[derive(Debug, Clone, Copy)]
pub struct FrameObservation {
    /// World elapsed seconds.
    pub time: f32,
    pub player: Vec3,
    /// Position of the current destination, if any.
    pub destination: Option<Vec3>,
}

/// Something that can be polled for gamepad readings.
pub trait GamepadSource: Send + Sync {
    /// Reading for `slot` this frame, `None` when nothing is connected.
    fn poll(&mut self, slot: usize, observation: &FrameObservation) -> Option<GamepadSnapshot>;
}

/// A source with no gamepads connected.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGamepad;

impl GamepadSource for NoGamepad {
    fn poll(&mut self, _slot: usize, _observation: &FrameObservation) -> Option<GamepadSnapshot> {
        None
    }
}

/// One step of a scripted timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Time from which this reading applies.
    pub at: f32,
    #[serde(default)]
    pub slot: usize,
    #[serde(default)]
    pub axes: Vec<f32>,
    #[serde(default)]
    pub buttons: Vec<bool>,
    /// Unplugs the pad from this keyframe on.
    #[serde(default)]
    pub disconnected: bool,
}

/// Replays a fixed timeline of readings.
///
/// A slot reports the latest keyframe whose `at` is not after the current
/// time, and nothing before its first keyframe.
///
/// ```json
/// [
///   { "at": 0.0, "axes": [0.5, 0.0] },
///   { "at": 1.5, "axes": [0.0, 0.0], "buttons": [true] }
/// ]
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedGamepad {
    keyframes: Vec<Keyframe>,
}

impl ScriptedGamepad {
    pub fn new(mut keyframes: Vec<Keyframe>) -> Self {
        keyframes.sort_by(|a, b| a.at.total_cmp(&b.at));
        ScriptedGamepad { keyframes }
    }

    pub fn from_json(text: &str) -> Result<Self, String> {
        let keyframes: Vec<Keyframe> =
            serde_json::from_str(text).map_err(|e| format!("Invalid input script: {}", e))?;
        Ok(Self::new(keyframes))
    }

    pub fn load(path: &Path) -> Result<Self, String> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read input script {:?}: {}", path, e))?;
        Self::from_json(&text)
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }
}

impl GamepadSource for ScriptedGamepad {
    fn poll(&mut self, slot: usize, observation: &FrameObservation) -> Option<GamepadSnapshot> {
        let frame = self
            .keyframes
            .iter()
            .filter(|k| k.slot == slot && k.at <= observation.time)
            .last()?;
        if frame.disconnected {
            return None;
        }
        Some(GamepadSnapshot {
            axes: frame.axes.clone(),
            buttons: frame.buttons.clone(),
        })
    }
}

/// Drives slot `slot` toward the current destination.
///
/// Pushes the stick toward the destination until within `arrive_distance`
/// and holds the trigger while within `press_distance`.
#[derive(Debug, Clone)]
pub struct Autopilot {
    pub slot: usize,
    pub trigger_button: usize,
    pub arrive_distance: f32,
    pub press_distance: f32,
}

impl Autopilot {
    pub fn new(slot: usize, trigger_button: usize, pickup_range: f32) -> Self {
        Autopilot {
            slot,
            trigger_button,
            arrive_distance: pickup_range * 0.3,
            press_distance: pickup_range * 0.9,
        }
    }
}

impl GamepadSource for Autopilot {
    fn poll(&mut self, slot: usize, observation: &FrameObservation) -> Option<GamepadSnapshot> {
        if slot != self.slot {
            return None;
        }
        let Some(destination) = observation.destination else {
            return Some(GamepadSnapshot::neutral());
        };
        let offset = destination - observation.player;
        let flat = Vec3::new(offset.x, 0.0, offset.z);
        let distance = offset.length();
        let (x, y) = if flat.length() > self.arrive_distance {
            let dir = flat.normalize_or_zero();
            (dir.x, dir.z)
        } else {
            (0.0, 0.0)
        };
        Some(
            GamepadSnapshot::neutral()
                .with_axes(x, y)
                .with_button(self.trigger_button, distance < self.press_distance),
        )
    }
}

/// Resource holding the active gamepad source.
#[derive(Resource)]
pub struct GamepadFeed {
    pub source: Box<dyn GamepadSource>,
}

impl GamepadFeed {
    pub fn new(source: impl GamepadSource + 'static) -> Self {
        GamepadFeed {
            source: Box::new(source),
        }
    }
}

impl Default for GamepadFeed {
    fn default() -> Self {
        Self::new(NoGamepad)
    }
}
