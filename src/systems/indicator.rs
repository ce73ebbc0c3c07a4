//! Guidance indicator.
//!
//! The indicator rides above the player (through
//! [`Follow`](crate::components::follow::Follow)), turns toward the current
//! destination and fades out as the player gets close to it.

use bevy_ecs::prelude::*;

use crate::components::markers::Indicator;
use crate::components::orientation::Orientation;
use crate::components::visibility::Opacity;
use crate::components::worldposition::WorldPosition;
use crate::resources::gameconfig::GameConfig;
use crate::resources::progress::GameProgress;
use crate::resources::scene::SceneEntities;
use crate::systems::progress::destination_entity;
use crate::systems::tween::map_range;

/// Opacity for a player `distance` units away from the destination.
pub fn indicator_opacity(distance: f32, config: &GameConfig) -> f32 {
    let lo = config.indicator_min_opacity.min(config.indicator_max_opacity);
    let hi = config.indicator_min_opacity.max(config.indicator_max_opacity);
    map_range(
        distance,
        config.indicator_near,
        config.indicator_far,
        config.indicator_min_opacity,
        config.indicator_max_opacity,
    )
    .clamp(lo, hi)
}

pub fn indicator_system(
    config: Res<GameConfig>,
    progress: Res<GameProgress>,
    scene: Res<SceneEntities>,
    positions: Query<&WorldPosition, Without<Indicator>>,
    mut indicators: Query<(&WorldPosition, &mut Orientation, &mut Opacity), With<Indicator>>,
) {
    let Ok(player) = positions.get(scene.player).map(|p| p.pos) else {
        return;
    };
    let Some(destination) = destination_entity(&progress, &scene)
        .and_then(|e| positions.get(e).ok())
        .map(|p| p.pos)
    else {
        return;
    };
    let opacity = indicator_opacity(player.distance(destination), &config);
    for (pos, mut orientation, mut alpha) in indicators.iter_mut() {
        orientation.look_at(pos.pos, destination);
        alpha.value = opacity;
    }
}
