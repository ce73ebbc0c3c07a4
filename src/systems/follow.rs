//! System for entities that ride on other entities.
//!
//! # Related
//!
//! - [`Follow`](crate::components::follow::Follow) – the attachment component

use bevy_ecs::prelude::*;

use crate::components::follow::Follow;
use crate::components::orientation::Orientation;
use crate::components::worldposition::WorldPosition;

/// Copies each target's position (plus offset) and, when asked, its
/// orientation onto the follower.
///
/// Targets that are themselves followers are not supported.
pub fn follow_system(
    mut followers: Query<(&Follow, &mut WorldPosition, Option<&mut Orientation>)>,
    targets: Query<(&WorldPosition, Option<&Orientation>), Without<Follow>>,
) {
    for (follow, mut pos, orientation) in followers.iter_mut() {
        let Ok((target_pos, target_rot)) = targets.get(follow.target) else {
            continue;
        };
        pos.pos = target_pos.pos + follow.offset;
        if follow.copy_orientation {
            if let (Some(mut rot), Some(target_rot)) = (orientation, target_rot) {
                *rot = *target_rot;
            }
        }
    }
}
