//! Event types and observers.
//!
//! Events let systems hand work to observers without depending on each
//! other directly.
//!
//! Submodules:
//! - [`gameover`] – the end of the game and its terminal effects
//! - [`gamestate`] – lifecycle state transitions
//! - [`tween`] – completion of one-shot tweens that carry an action
pub mod gameover;
pub mod gamestate;
pub mod tween;
