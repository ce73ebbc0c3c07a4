//! ECS components for entities.
//!
//! This module groups all component types that can be attached to entities in
//! the game world. Components define data such as position, physics bodies,
//! animation playback, tweens and the role an entity plays in the scene.
//!
//! Submodules overview:
//! - [`animation`] – manually stepped animation clip on the deposit target
//! - [`environment`] – fog settings on the environment entity
//! - [`follow`] – copy another entity's position (and orientation) each frame
//! - [`isosurface`] – metaball influence field fed by held items
//! - [`markers`] – role tags: player, shell, item, objective, indicator, rewards
//! - [`orientation`] – world-space rotation
//! - [`rigidbody`] – physics body state for the headless physics step
//! - [`scale`] – 3D scale factor
//! - [`storm`] – drifting dust particle field
//! - [`tint`] – material color
//! - [`tween`] – animated interpolation of scale, opacity and fog
//! - [`visibility`] – visible flag and opacity
//! - [`worldposition`] – world-space position (pivot) for an entity

pub mod animation;
pub mod environment;
pub mod follow;
pub mod isosurface;
pub mod markers;
pub mod orientation;
pub mod rigidbody;
pub mod scale;
pub mod storm;
pub mod tint;
pub mod tween;
pub mod visibility;
pub mod worldposition;
