//! Storm particle drift.

use bevy_ecs::prelude::*;

use crate::components::storm::StormField;
use crate::resources::rng::GameRng;

/// Step every enabled [`StormField`] once per frame.
pub fn storm_system(mut rng: ResMut<GameRng>, mut storms: Query<&mut StormField>) {
    for mut storm in storms.iter_mut() {
        if storm.enabled {
            storm.step(&mut rng.0);
        }
    }
}
