//! ECS resources made available to systems.
//!
//! This module groups the long-lived data injected into the ECS world and
//! accessed by systems during execution: progress, input, timing, scene
//! handles and configuration.
//!
//! Overview
//! - `camera` – 3D camera trailing the player
//! - `gameconfig` – tunable constants loaded from an INI file
//! - `gamestate` – authoritative and pending lifecycle state
//! - `input` – per-frame gamepad state and the sources that feed it
//! - `lighting` – directional light following the player
//! - `physics` – gravity, floor and arena bounds
//! - `progress` – the collect/deposit state machine
//! - `rng` – seeded random number generator
//! - `scene` – handles to long-lived scene entities and held items
//! - `systemsstore` – registry of lifecycle hooks by name
//! - `tasks` – deferred one-shot work
//! - `worldtime` – simulation time and delta
pub mod camera;
pub mod gameconfig;
pub mod gamestate;
pub mod input;
pub mod lighting;
pub mod physics;
pub mod progress;
pub mod rng;
pub mod scene;
pub mod systemsstore;
pub mod tasks;
pub mod worldtime;
