//! Seeded random number generator shared by gameplay systems.
//!
//! Everything random in a run (objective jitter, storm drift, reward delays)
//! draws from this single generator, so a seed reproduces a run exactly.

use bevy_ecs::prelude::Resource;
use fastrand::Rng;

#[derive(Resource, Debug, Clone)]
pub struct GameRng(pub Rng);

impl GameRng {
    pub fn seeded(seed: u64) -> Self {
        GameRng(Rng::with_seed(seed))
    }
}
