//! Iso-surface influence field.
//!
//! The [`IsoSurface`] component collects the metaballs that a marching-cubes
//! mesher would polygonise. The field lives in a normalised `[0, 1]^3` cube
//! in the owner's local space; it is rebuilt from scratch every frame.

use bevy_ecs::prelude::Component;
use glam::Vec3;

/// One influence source in the field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MetaBall {
    /// Center in normalised field coordinates.
    pub center: Vec3,
    pub strength: f32,
    pub subtract: f32,
}

#[derive(Component, Clone, Debug)]
pub struct IsoSurface {
    /// Grid resolution along each axis.
    pub resolution: u32,
    /// Uniform scale of the field cube relative to its owner.
    pub scale: f32,
    pub balls: Vec<MetaBall>,
}

impl IsoSurface {
    pub fn new(resolution: u32, scale: f32) -> Self {
        Self {
            resolution,
            scale,
            balls: Vec::new(),
        }
    }

    pub fn reset(&mut self) {
        self.balls.clear();
    }

    pub fn add_ball(&mut self, center: Vec3, strength: f32, subtract: f32) {
        self.balls.push(MetaBall {
            center,
            strength,
            subtract,
        });
    }

    /// Field value at `point` (normalised coordinates).
    ///
    /// Each ball contributes `strength / (d² + 1e-6) - subtract`, only where
    /// that contribution is positive.
    pub fn sample(&self, point: Vec3) -> f32 {
        self.balls
            .iter()
            .map(|b| {
                let d2 = b.center.distance_squared(point);
                let v = b.strength / (d2 + 1e-6) - b.subtract;
                v.max(0.0)
            })
            .sum()
    }
}
