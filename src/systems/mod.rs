//! Game systems.
//!
//! This module groups all ECS systems that advance the simulation each frame.
//! [`crate::game::build_update_schedule`] wires them into one schedule.
//!
//! Submodules overview
//! - [`follow`] – copy target positions onto followers
//! - [`gamestate`] – pending state transitions and run conditions
//! - [`indicator`] – orient and fade the guidance arrow
//! - [`input`] – poll the gamepad source into [`crate::resources::input::InputState`]
//! - [`isosurface`] – rebuild the held-items blob
//! - [`physics`] – the headless rigid body step
//! - [`player`] – stick to force, jump, camera and light follow
//! - [`progress`] – trigger handling, clip catch-up, game over detection
//! - [`rewards`] – spawn and attract post-game rewards
//! - [`storm`] – drift the storm particles
//! - [`tasks`] – run due scheduled tasks
//! - [`time`] – update simulation time and delta
//! - [`tween`] – animate scale, opacity and fog over time

pub mod follow;
pub mod gamestate;
pub mod indicator;
pub mod input;
pub mod isosurface;
pub mod physics;
pub mod player;
pub mod progress;
pub mod rewards;
pub mod storm;
pub mod tasks;
pub mod time;
pub mod tween;
