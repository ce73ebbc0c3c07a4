//! Game configuration resource.
//!
//! Manages the tunable constants of the game, loaded from an INI file. The
//! prototype shipped in several variants that only differed in these numbers
//! and in which optional features were switched on, so all of them live here.
//! Every value is optional in the file; missing values keep their defaults.
//!
//! # Configuration File Format
//!
//! ```ini
//! [objectives]
//! count = 4
//! capacity = 20
//! ; optional per-objective override, takes precedence over count/capacity
//! capacities = 20, 20, 20, 20
//! pickup_range = 6.0
//!
//! [progress]
//! clip_duration = 3.32
//! playback_rate = 0.5
//! completion_tolerance = 0.1
//! debounce = 0.1
//!
//! [indicator]
//! near = 4.0
//! far = 32.0
//! min_opacity = 0.0
//! max_opacity = 0.5
//!
//! [player]
//! force_scale = 20.0
//! jump_impulse = 0.0
//!
//! [gamepad]
//! slot = 0
//! trigger_button = 0
//! jump_button = 1
//! deadzone = 0.1
//!
//! [rewards]
//! enabled = true
//! delay_min = 1.0
//! delay_max = 2.0
//!
//! [storm]
//! enabled = true
//! particles = 10000
//!
//! [physics]
//! gravity = -9.8
//! floor = -6.0
//! arena = 49.5
//!
//! [simulation]
//! fps = 60
//! max_frames = 36000
//! seed = 1
//! linger = 6.0
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::{info, warn};
use std::path::PathBuf;

const DEFAULT_OBJECTIVE_COUNT: usize = 4;
const DEFAULT_OBJECTIVE_CAPACITY: u32 = 20;
const DEFAULT_PICKUP_RANGE: f32 = 6.0;
const DEFAULT_OBJECTIVE_JITTER: f32 = 6.0;
const DEFAULT_CLIP_DURATION: f32 = 3.32;
const DEFAULT_PLAYBACK_RATE: f32 = 0.5;
const DEFAULT_COMPLETION_TOLERANCE: f32 = 0.1;
const DEFAULT_DEBOUNCE: f32 = 0.1;
const DEFAULT_INDICATOR_NEAR: f32 = 4.0;
const DEFAULT_INDICATOR_FAR: f32 = 32.0;
const DEFAULT_INDICATOR_MIN_OPACITY: f32 = 0.0;
const DEFAULT_INDICATOR_MAX_OPACITY: f32 = 0.5;
const DEFAULT_INDICATOR_HEIGHT: f32 = 2.0;
const DEFAULT_FORCE_SCALE: f32 = 20.0;
const DEFAULT_JUMP_IMPULSE: f32 = 0.0;
const DEFAULT_PLAYER_LINEAR_DAMPING: f32 = 0.9;
const DEFAULT_PLAYER_ANGULAR_DAMPING: f32 = 0.3;
const DEFAULT_GAMEPAD_SLOT: usize = 0;
const DEFAULT_TRIGGER_BUTTON: usize = 0;
const DEFAULT_JUMP_BUTTON: usize = 1;
const DEFAULT_DEADZONE: f32 = 0.1;
const DEFAULT_REWARDS_ENABLED: bool = true;
const DEFAULT_REWARD_DELAY_MIN: f32 = 1.0;
const DEFAULT_REWARD_DELAY_MAX: f32 = 2.0;
const DEFAULT_REWARD_FORCE: f32 = 0.15;
const DEFAULT_REWARD_DEFLECTION_DEGREES: f32 = 15.0;
const DEFAULT_STORM_ENABLED: bool = true;
const DEFAULT_STORM_PARTICLES: usize = 10_000;
const DEFAULT_GRAVITY: f32 = -9.8;
const DEFAULT_FLOOR: f32 = -6.0;
const DEFAULT_ARENA: f32 = 49.5;
const DEFAULT_FPS: u32 = 60;
const DEFAULT_MAX_FRAMES: u64 = 36_000;
const DEFAULT_SEED: u64 = 1;
const DEFAULT_LINGER: f32 = 6.0;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Game configuration resource.
#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    /// Capacity of each objective, in visiting order. Never empty.
    pub capacities: Vec<u32>,
    /// A trigger press only counts closer than this to the destination.
    pub pickup_range: f32,
    /// Random offset, in grid cells, applied to each objective placement.
    pub objective_jitter: f32,
    /// Length of the deposit target's animation clip in seconds.
    pub clip_duration: f32,
    /// Clip playback speed relative to real time while catching up.
    pub playback_rate: f32,
    /// How close to its end the clip must be to finish the game.
    pub completion_tolerance: f32,
    /// Minimum seconds between accepted trigger presses.
    pub debounce: f32,
    pub indicator_near: f32,
    pub indicator_far: f32,
    pub indicator_min_opacity: f32,
    pub indicator_max_opacity: f32,
    /// Height of the indicator above the player.
    pub indicator_height: f32,
    /// Force per unit of stick deflection.
    pub force_scale: f32,
    /// Upward impulse on the jump button. `0` disables jumping.
    pub jump_impulse: f32,
    pub player_linear_damping: f32,
    pub player_angular_damping: f32,
    pub gamepad_slot: usize,
    pub trigger_button: usize,
    pub jump_button: usize,
    pub deadzone: f32,
    pub rewards_enabled: bool,
    pub reward_delay_min: f32,
    pub reward_delay_max: f32,
    pub reward_force: f32,
    pub reward_deflection_degrees: f32,
    pub storm_enabled: bool,
    pub storm_particles: usize,
    pub gravity: f32,
    pub floor: f32,
    pub arena: f32,
    pub fps: u32,
    pub max_frames: u64,
    pub seed: u64,
    /// Seconds the simulation keeps running after game over before quitting.
    pub linger: f32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            capacities: vec![DEFAULT_OBJECTIVE_CAPACITY; DEFAULT_OBJECTIVE_COUNT],
            pickup_range: DEFAULT_PICKUP_RANGE,
            objective_jitter: DEFAULT_OBJECTIVE_JITTER,
            clip_duration: DEFAULT_CLIP_DURATION,
            playback_rate: DEFAULT_PLAYBACK_RATE,
            completion_tolerance: DEFAULT_COMPLETION_TOLERANCE,
            debounce: DEFAULT_DEBOUNCE,
            indicator_near: DEFAULT_INDICATOR_NEAR,
            indicator_far: DEFAULT_INDICATOR_FAR,
            indicator_min_opacity: DEFAULT_INDICATOR_MIN_OPACITY,
            indicator_max_opacity: DEFAULT_INDICATOR_MAX_OPACITY,
            indicator_height: DEFAULT_INDICATOR_HEIGHT,
            force_scale: DEFAULT_FORCE_SCALE,
            jump_impulse: DEFAULT_JUMP_IMPULSE,
            player_linear_damping: DEFAULT_PLAYER_LINEAR_DAMPING,
            player_angular_damping: DEFAULT_PLAYER_ANGULAR_DAMPING,
            gamepad_slot: DEFAULT_GAMEPAD_SLOT,
            trigger_button: DEFAULT_TRIGGER_BUTTON,
            jump_button: DEFAULT_JUMP_BUTTON,
            deadzone: DEFAULT_DEADZONE,
            rewards_enabled: DEFAULT_REWARDS_ENABLED,
            reward_delay_min: DEFAULT_REWARD_DELAY_MIN,
            reward_delay_max: DEFAULT_REWARD_DELAY_MAX,
            reward_force: DEFAULT_REWARD_FORCE,
            reward_deflection_degrees: DEFAULT_REWARD_DEFLECTION_DEGREES,
            storm_enabled: DEFAULT_STORM_ENABLED,
            storm_particles: DEFAULT_STORM_PARTICLES,
            gravity: DEFAULT_GRAVITY,
            floor: DEFAULT_FLOOR,
            arena: DEFAULT_ARENA,
            fps: DEFAULT_FPS,
            max_frames: DEFAULT_MAX_FRAMES,
            seed: DEFAULT_SEED,
            linger: DEFAULT_LINGER,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Number of objectives.
    pub fn objective_count(&self) -> usize {
        self.capacities.len()
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut ini = Ini::new();
        ini.load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply_ini(&ini);
        info!("Loaded config from {:?}", self.config_path);
        Ok(())
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut ini = Ini::new();
        ini.read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply_ini(&ini);
        Ok(())
    }

    fn apply_ini(&mut self, ini: &Ini) {
        let float = |section: &str, key: &str| -> Option<f32> {
            ini.getfloat(section, key).ok().flatten().map(|v| v as f32)
        };
        let uint = |section: &str, key: &str| -> Option<u64> {
            ini.getuint(section, key).ok().flatten()
        };
        let boolean =
            |section: &str, key: &str| -> Option<bool> { ini.getbool(section, key).ok().flatten() };

        // [objectives] section
        let count = uint("objectives", "count").map(|v| v as usize);
        let capacity = uint("objectives", "capacity").map(|v| v as u32);
        if count.is_some() || capacity.is_some() {
            let count = count.unwrap_or(self.capacities.len());
            let capacity = capacity.unwrap_or(DEFAULT_OBJECTIVE_CAPACITY);
            if count == 0 || capacity == 0 {
                warn!("Ignoring objectives count={} capacity={}: both must be positive", count, capacity);
            } else {
                self.capacities = vec![capacity; count];
            }
        }
        if let Some(list) = ini.get("objectives", "capacities") {
            match parse_capacities(&list) {
                Ok(capacities) => self.capacities = capacities,
                Err(e) => warn!("Ignoring objectives.capacities: {}", e),
            }
        }
        if let Some(v) = float("objectives", "pickup_range") {
            self.pickup_range = v;
        }
        if let Some(v) = float("objectives", "jitter") {
            self.objective_jitter = v;
        }

        // [progress] section
        if let Some(v) = float("progress", "clip_duration") {
            if v > 0.0 {
                self.clip_duration = v;
            } else {
                warn!("Ignoring progress.clip_duration={}: must be positive", v);
            }
        }
        if let Some(v) = float("progress", "playback_rate") {
            self.playback_rate = v;
        }
        if let Some(v) = float("progress", "completion_tolerance") {
            self.completion_tolerance = v;
        }
        if let Some(v) = float("progress", "debounce") {
            self.debounce = v;
        }

        // [indicator] section
        if let Some(v) = float("indicator", "near") {
            self.indicator_near = v;
        }
        if let Some(v) = float("indicator", "far") {
            self.indicator_far = v;
        }
        if let Some(v) = float("indicator", "min_opacity") {
            self.indicator_min_opacity = v;
        }
        if let Some(v) = float("indicator", "max_opacity") {
            self.indicator_max_opacity = v;
        }
        if let Some(v) = float("indicator", "height") {
            self.indicator_height = v;
        }

        // [player] section
        if let Some(v) = float("player", "force_scale") {
            self.force_scale = v;
        }
        if let Some(v) = float("player", "jump_impulse") {
            self.jump_impulse = v;
        }
        if let Some(v) = float("player", "linear_damping") {
            self.player_linear_damping = v;
        }
        if let Some(v) = float("player", "angular_damping") {
            self.player_angular_damping = v;
        }

        // [gamepad] section
        if let Some(v) = uint("gamepad", "slot") {
            self.gamepad_slot = v as usize;
        }
        if let Some(v) = uint("gamepad", "trigger_button") {
            self.trigger_button = v as usize;
        }
        if let Some(v) = uint("gamepad", "jump_button") {
            self.jump_button = v as usize;
        }
        if let Some(v) = float("gamepad", "deadzone") {
            self.deadzone = v.clamp(0.0, 0.99);
        }

        // [rewards] section
        if let Some(v) = boolean("rewards", "enabled") {
            self.rewards_enabled = v;
        }
        if let Some(v) = float("rewards", "delay_min") {
            self.reward_delay_min = v;
        }
        if let Some(v) = float("rewards", "delay_max") {
            self.reward_delay_max = v;
        }
        if self.reward_delay_max < self.reward_delay_min {
            std::mem::swap(&mut self.reward_delay_min, &mut self.reward_delay_max);
        }
        if let Some(v) = float("rewards", "force") {
            self.reward_force = v;
        }
        if let Some(v) = float("rewards", "deflection_degrees") {
            self.reward_deflection_degrees = v;
        }

        // [storm] section
        if let Some(v) = boolean("storm", "enabled") {
            self.storm_enabled = v;
        }
        if let Some(v) = uint("storm", "particles") {
            self.storm_particles = v as usize;
        }

        // [physics] section
        if let Some(v) = float("physics", "gravity") {
            self.gravity = v;
        }
        if let Some(v) = float("physics", "floor") {
            self.floor = v;
        }
        if let Some(v) = float("physics", "arena") {
            self.arena = v;
        }

        // [simulation] section
        if let Some(v) = uint("simulation", "fps") {
            if v > 0 {
                self.fps = v as u32;
            }
        }
        if let Some(v) = uint("simulation", "max_frames") {
            self.max_frames = v;
        }
        if let Some(v) = uint("simulation", "seed") {
            self.seed = v;
        }
        if let Some(v) = float("simulation", "linger") {
            self.linger = v;
        }

        info!(
            "Config: {} objectives {:?}, clip {}s, pickup range {}, debounce {}s, storm={}, rewards={}",
            self.capacities.len(),
            self.capacities,
            self.clip_duration,
            self.pickup_range,
            self.debounce,
            self.storm_enabled,
            self.rewards_enabled
        );
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut ini = Ini::new();
        let caps = self
            .capacities
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        ini.set("objectives", "capacities", Some(caps));
        ini.set("objectives", "pickup_range", Some(self.pickup_range.to_string()));
        ini.set("objectives", "jitter", Some(self.objective_jitter.to_string()));

        ini.set("progress", "clip_duration", Some(self.clip_duration.to_string()));
        ini.set("progress", "playback_rate", Some(self.playback_rate.to_string()));
        ini.set(
            "progress",
            "completion_tolerance",
            Some(self.completion_tolerance.to_string()),
        );
        ini.set("progress", "debounce", Some(self.debounce.to_string()));

        ini.set("indicator", "near", Some(self.indicator_near.to_string()));
        ini.set("indicator", "far", Some(self.indicator_far.to_string()));
        ini.set("indicator", "min_opacity", Some(self.indicator_min_opacity.to_string()));
        ini.set("indicator", "max_opacity", Some(self.indicator_max_opacity.to_string()));
        ini.set("indicator", "height", Some(self.indicator_height.to_string()));

        ini.set("player", "force_scale", Some(self.force_scale.to_string()));
        ini.set("player", "jump_impulse", Some(self.jump_impulse.to_string()));
        ini.set("player", "linear_damping", Some(self.player_linear_damping.to_string()));
        ini.set("player", "angular_damping", Some(self.player_angular_damping.to_string()));

        ini.set("gamepad", "slot", Some(self.gamepad_slot.to_string()));
        ini.set("gamepad", "trigger_button", Some(self.trigger_button.to_string()));
        ini.set("gamepad", "jump_button", Some(self.jump_button.to_string()));
        ini.set("gamepad", "deadzone", Some(self.deadzone.to_string()));

        ini.set("rewards", "enabled", Some(self.rewards_enabled.to_string()));
        ini.set("rewards", "delay_min", Some(self.reward_delay_min.to_string()));
        ini.set("rewards", "delay_max", Some(self.reward_delay_max.to_string()));
        ini.set("rewards", "force", Some(self.reward_force.to_string()));
        ini.set(
            "rewards",
            "deflection_degrees",
            Some(self.reward_deflection_degrees.to_string()),
        );

        ini.set("storm", "enabled", Some(self.storm_enabled.to_string()));
        ini.set("storm", "particles", Some(self.storm_particles.to_string()));

        ini.set("physics", "gravity", Some(self.gravity.to_string()));
        ini.set("physics", "floor", Some(self.floor.to_string()));
        ini.set("physics", "arena", Some(self.arena.to_string()));

        ini.set("simulation", "fps", Some(self.fps.to_string()));
        ini.set("simulation", "max_frames", Some(self.max_frames.to_string()));
        ini.set("simulation", "seed", Some(self.seed.to_string()));
        ini.set("simulation", "linger", Some(self.linger.to_string()));

        ini.write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Seconds per simulated frame.
    pub fn frame_delta(&self) -> f32 {
        1.0 / self.fps as f32
    }
}

/// Parse a comma separated list of positive capacities.
fn parse_capacities(list: &str) -> Result<Vec<u32>, String> {
    let capacities = list
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>()
                .map_err(|e| format!("'{}' is not a capacity: {}", s, e))
                .and_then(|c| {
                    if c == 0 {
                        Err("capacities must be positive".to_string())
                    } else {
                        Ok(c)
                    }
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    if capacities.is_empty() {
        return Err("at least one objective is required".to_string());
    }
    Ok(capacities)
}
