//! Tag components identifying the role of scene entities.
//!
//! Systems filter on these instead of looking entities up by name.

use bevy_ecs::prelude::Component;

/// The dynamic body driven by the gamepad.
#[derive(Component, Clone, Copy, Debug)]
pub struct Player;

/// Kinematic shell that rides on the player and holds collected items.
#[derive(Component, Clone, Copy, Debug)]
pub struct PlayerShell;

/// A collected item currently held by the player.
#[derive(Component, Clone, Copy, Debug)]
pub struct Item;

/// A collection point, visited in `index` order.
#[derive(Component, Clone, Copy, Debug)]
pub struct Objective {
    pub index: usize,
}

/// The destination where held items are consumed (the tree).
#[derive(Component, Clone, Copy, Debug)]
pub struct DepositTarget;

/// Arrow that points the player at the active destination.
#[derive(Component, Clone, Copy, Debug)]
pub struct Indicator;

/// A reward object spawned after game over.
///
/// `attracted` becomes true once the reward has finished growing and has a
/// physics body; from then on it is pushed toward the player.
#[derive(Component, Clone, Copy, Debug)]
pub struct Reward {
    pub index: usize,
    pub attracted: bool,
}
