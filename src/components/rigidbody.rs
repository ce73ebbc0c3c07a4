//! Rigid body component for the headless physics step.
//!
//! The [`RigidBody`] component stores the state the physics collaborator needs
//! for one body: velocity, accumulated force and impulse, mass, damping,
//! surface response, its collider shape and its collision filter. Forces are
//! accumulated by gameplay systems during the frame and cleared by
//! [`crate::systems::physics::physics_step`] after integration.
//!
//! # Example
//! ```ignore
//! let mut rb = RigidBody::dynamic(Collider::Sphere { radius: 1.0 }, 1.0)
//!     .with_damping(0.9, 0.3);
//! rb.apply_central_force(Vec3::new(20.0, 0.0, 0.0));
//! ```

use bevy_ecs::prelude::Component;
use glam::Vec3;

/// How the solver treats a body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyKind {
    /// Integrated from forces and gravity.
    Dynamic,
    /// Moved by gameplay code; pushes dynamic bodies but ignores forces.
    Kinematic,
}

/// Collision shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Collider {
    /// Solid sphere.
    Sphere { radius: f32 },
    /// Hollow sphere: interacting bodies are kept inside it.
    Shell { radius: f32 },
}

impl Collider {
    pub fn radius(&self) -> f32 {
        match *self {
            Collider::Sphere { radius } | Collider::Shell { radius } => radius,
        }
    }
}

/// Collision group/mask pair.
///
/// Two bodies interact only when each one's group is in the other's mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollisionFilter {
    pub group: u32,
    pub mask: u32,
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self {
            group: 1,
            mask: u32::MAX,
        }
    }
}

impl CollisionFilter {
    pub fn new(group: u32, mask: u32) -> Self {
        Self { group, mask }
    }

    pub fn interacts(&self, other: &CollisionFilter) -> bool {
        self.group & other.mask != 0 && other.group & self.mask != 0
    }
}

#[derive(Component, Clone, Debug)]
pub struct RigidBody {
    pub kind: BodyKind,
    pub collider: Collider,
    pub filter: CollisionFilter,
    /// Current linear velocity in world units per second.
    pub velocity: Vec3,
    /// Current angular velocity in radians per second.
    pub angular_velocity: Vec3,
    /// Force accumulated this frame. Cleared after each physics step.
    pub force: Vec3,
    /// Impulse accumulated this frame. Cleared after each physics step.
    pub impulse: Vec3,
    pub mass: f32,
    /// Fraction of linear velocity lost per second.
    pub linear_damping: f32,
    /// Fraction of angular velocity lost per second.
    pub angular_damping: f32,
    /// Coulomb coefficient against shell walls, multiplied with the shell's.
    pub friction: f32,
    pub restitution: f32,
}

impl RigidBody {
    pub fn dynamic(collider: Collider, mass: f32) -> Self {
        Self {
            kind: BodyKind::Dynamic,
            collider,
            filter: CollisionFilter::default(),
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            force: Vec3::ZERO,
            impulse: Vec3::ZERO,
            mass,
            linear_damping: 0.0,
            angular_damping: 0.0,
            friction: 0.5,
            restitution: 0.0,
        }
    }

    pub fn kinematic(collider: Collider) -> Self {
        Self {
            kind: BodyKind::Kinematic,
            mass: 0.0,
            ..Self::dynamic(collider, 0.0)
        }
    }

    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    pub fn with_filter(mut self, filter: CollisionFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn is_dynamic(&self) -> bool {
        self.kind == BodyKind::Dynamic
    }

    /// Add a force through the center of mass for this frame.
    pub fn apply_central_force(&mut self, force: Vec3) {
        self.force += force;
    }

    /// Add an instantaneous change of momentum.
    pub fn apply_central_impulse(&mut self, impulse: Vec3) {
        self.impulse += impulse;
    }

    pub fn clear_forces(&mut self) {
        self.force = Vec3::ZERO;
        self.impulse = Vec3::ZERO;
    }

    pub fn inverse_mass(&self) -> f32 {
        if self.is_dynamic() && self.mass > 0.0 {
            1.0 / self.mass
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_dynamic_defaults() {
        let rb = RigidBody::dynamic(Collider::Sphere { radius: 1.0 }, 2.0);
        assert!(rb.is_dynamic());
        assert_eq!(rb.velocity, Vec3::ZERO);
        assert!(approx_eq(rb.inverse_mass(), 0.5));
    }

    #[test]
    fn test_kinematic_has_no_inverse_mass() {
        let rb = RigidBody::kinematic(Collider::Shell { radius: 1.0 });
        assert_eq!(rb.kind, BodyKind::Kinematic);
        assert!(approx_eq(rb.inverse_mass(), 0.0));
    }

    #[test]
    fn test_forces_accumulate_and_clear() {
        let mut rb = RigidBody::dynamic(Collider::Sphere { radius: 1.0 }, 1.0);
        rb.apply_central_force(Vec3::new(1.0, 0.0, 0.0));
        rb.apply_central_force(Vec3::new(0.0, 0.0, 2.0));
        rb.apply_central_impulse(Vec3::Y);
        assert_eq!(rb.force, Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(rb.impulse, Vec3::Y);
        rb.clear_forces();
        assert_eq!(rb.force, Vec3::ZERO);
        assert_eq!(rb.impulse, Vec3::ZERO);
    }

    #[test]
    fn test_builder_chaining() {
        let rb = RigidBody::dynamic(Collider::Sphere { radius: 0.19 }, 0.0001)
            .with_damping(0.9, 0.9)
            .with_friction(0.0)
            .with_restitution(0.0)
            .with_filter(CollisionFilter::new(8, 8));
        assert!(approx_eq(rb.linear_damping, 0.9));
        assert!(approx_eq(rb.angular_damping, 0.9));
        assert!(approx_eq(rb.friction, 0.0));
        assert_eq!(rb.filter, CollisionFilter::new(8, 8));
    }

    #[test]
    fn test_filter_interaction_is_symmetric() {
        let items = CollisionFilter::new(8, 8);
        let world = CollisionFilter::default();
        assert!(items.interacts(&CollisionFilter::new(8, 8)));
        assert!(!items.interacts(&world));
        assert!(!world.interacts(&items));
    }

    #[test]
    fn test_collider_radius() {
        assert!(approx_eq(Collider::Sphere { radius: 0.3 }.radius(), 0.3));
        assert!(approx_eq(Collider::Shell { radius: 1.5 }.radius(), 1.5));
    }
}
