//! Feeds held items into the iso-surface carried by the player shell.
//!
//! Every frame the field is reset and one metaball is added per held item,
//! at the item's position expressed in the field's local cube.

use bevy_ecs::prelude::*;
use glam::{Quat, Vec3};

use crate::components::isosurface::IsoSurface;
use crate::components::markers::Item;
use crate::components::orientation::Orientation;
use crate::components::worldposition::WorldPosition;
use crate::resources::scene::HeldItems;

pub const BALL_STRENGTH: f32 = 0.5;
pub const BALL_SUBTRACT: f32 = 12.0;
const LOCAL_OFFSET: f32 = 1.1;
const LOCAL_SCALE: f32 = 0.45;

/// Item position in the field's normalised cube.
pub fn field_coordinates(item: Vec3, origin: Vec3, rotation: Quat, scale: f32) -> Vec3 {
    let local = rotation.inverse() * (item - origin) / scale;
    (local + Vec3::splat(LOCAL_OFFSET)) * LOCAL_SCALE
}

pub fn isosurface_system(
    held: Res<HeldItems>,
    items: Query<&WorldPosition, With<Item>>,
    mut surfaces: Query<(&mut IsoSurface, &WorldPosition, &Orientation), Without<Item>>,
) {
    for (mut surface, origin, orientation) in surfaces.iter_mut() {
        surface.reset();
        for item in held.0.iter().filter_map(|e| items.get(*e).ok()) {
            let center = field_coordinates(item.pos, origin.pos, orientation.rot, surface.scale);
            surface.add_ball(center, BALL_STRENGTH, BALL_SUBTRACT);
        }
    }
}
