//! Drifting dust storm particle field.
//!
//! The [`StormField`] holds point positions inside an axis-aligned box
//! centered at the origin. While enabled, points drift along +X with a little
//! vertical and lateral jitter and wrap around when they leave the box.
//! See [`crate::systems::storm::storm_system`].

use bevy_ecs::prelude::Component;
use fastrand::Rng;
use glam::Vec3;

#[derive(Component, Clone, Debug)]
pub struct StormField {
    pub points: Vec<Vec3>,
    /// Half size of the box the points live in.
    pub half_extent: Vec3,
    /// Per-frame drift along +X, sampled in `(min, max)`.
    pub drift: (f32, f32),
    /// Per-frame jitter on Y and Z, sampled in `[-jitter, jitter]`.
    pub jitter: f32,
    pub enabled: bool,
}

impl StormField {
    /// Scatter `count` points uniformly inside the box.
    pub fn scatter(count: usize, half_extent: Vec3, rng: &mut Rng) -> Self {
        let points = (0..count)
            .map(|_| {
                Vec3::new(
                    random_range(rng, -half_extent.x, half_extent.x),
                    random_range(rng, -half_extent.y, half_extent.y),
                    random_range(rng, -half_extent.z, half_extent.z),
                )
            })
            .collect();
        Self {
            points,
            half_extent,
            drift: (0.4, 0.6),
            jitter: 0.1,
            enabled: true,
        }
    }

    /// Move every point one step and wrap the ones that left the box.
    pub fn step(&mut self, rng: &mut Rng) {
        let h = self.half_extent;
        let (dmin, dmax) = self.drift;
        let j = self.jitter;
        for p in self.points.iter_mut() {
            p.x += random_range(rng, dmin, dmax);
            p.y += random_range(rng, -j, j);
            p.z += random_range(rng, -j, j);
            if p.x > h.x {
                p.x = -h.x;
            }
            if p.y > h.y {
                p.y = -h.y;
            }
            if p.y < -h.y {
                p.y = h.y;
            }
            if p.z > h.z {
                p.z = -h.z;
            }
            if p.z < -h.z {
                p.z = h.z;
            }
        }
    }
}

/// Sample a random f32 in `[min, max]`.
#[inline]
pub(crate) fn random_range(rng: &mut Rng, min: f32, max: f32) -> f32 {
    let range = max - min;
    if range < f32::EPSILON {
        return min;
    }
    min + rng.f32() * range
}
