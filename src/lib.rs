//! Holotree library.
//!
//! A headless rendition of a small collect-and-deposit game: the player rolls
//! a ball between objectives, picks up items, and feeds them to a tree whose
//! growth animation tracks the progress. Exposes the ECS components,
//! resources, systems and events for integration tests and the binary.

pub mod components;
pub mod events;
pub mod game;
pub mod resources;
pub mod systems;
