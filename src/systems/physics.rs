//! Headless physics step.
//!
//! A deliberately small solver covering what the scene needs: spheres
//! rolling on a flat floor inside four walls, pushing each other apart, and
//! small spheres rattling around inside a hollow shell.
//!
//! Order within one step:
//!
//! 1. integrate dynamic bodies (gravity, forces, impulses, damping)
//! 2. clamp against the floor and the arena walls
//! 3. separate overlapping dynamic spheres that interact
//! 4. keep interacting dynamic spheres inside kinematic shells, with
//!    Coulomb friction on the shell wall
//! 5. clear accumulated forces
//!
//! # Related
//!
//! - [`RigidBody`] – per-body state
//! - [`PhysicsSettings`] – gravity and arena bounds

use bevy_ecs::prelude::*;
use glam::{Quat, Vec3};

use crate::components::orientation::Orientation;
use crate::components::rigidbody::{BodyKind, Collider, CollisionFilter, RigidBody};
use crate::components::worldposition::WorldPosition;
use crate::resources::physics::PhysicsSettings;
use crate::resources::worldtime::WorldTime;

/// Scratch copy of one body, so pairs can be resolved without aliasing.
struct BodyState {
    entity: Entity,
    kind: BodyKind,
    collider: Collider,
    filter: CollisionFilter,
    pos: Vec3,
    vel: Vec3,
    inv_mass: f32,
    friction: f32,
    restitution: f32,
}

/// Apply the damping model `v *= (1 - d)^dt`.
pub(crate) fn damp(v: Vec3, damping: f32, dt: f32) -> Vec3 {
    v * (1.0 - damping.clamp(0.0, 1.0)).powf(dt)
}

/// Advance all rigid bodies by one frame.
pub fn physics_step(
    time: Res<WorldTime>,
    settings: Res<PhysicsSettings>,
    mut bodies: Query<(
        Entity,
        &mut RigidBody,
        &mut WorldPosition,
        Option<&mut Orientation>,
    )>,
) {
    let dt = time.delta;
    if dt <= 0.0 {
        return;
    }

    let mut states: Vec<BodyState> = Vec::new();
    for (entity, mut body, mut pos, orientation) in bodies.iter_mut() {
        if body.kind == BodyKind::Dynamic {
            integrate(&mut body, &mut pos.pos, dt, &settings);
            if let Some(mut orientation) = orientation {
                roll(&mut body, &mut orientation, pos.pos, dt, &settings);
            }
        }
        states.push(BodyState {
            entity,
            kind: body.kind,
            collider: body.collider,
            filter: body.filter,
            pos: pos.pos,
            vel: body.velocity,
            inv_mass: body.inverse_mass(),
            friction: body.friction,
            restitution: body.restitution,
        });
    }

    separate_spheres(&mut states);
    contain_in_shells(&mut states);

    for state in states {
        if let Ok((_, mut body, mut pos, _)) = bodies.get_mut(state.entity) {
            if state.kind == BodyKind::Dynamic {
                pos.pos = state.pos;
                body.velocity = state.vel;
            }
            body.clear_forces();
        }
    }
}

fn integrate(body: &mut RigidBody, pos: &mut Vec3, dt: f32, settings: &PhysicsSettings) {
    let inv_mass = body.inverse_mass();
    let accel = settings.gravity + body.force * inv_mass;
    body.velocity += accel * dt + body.impulse * inv_mass;
    body.velocity = damp(body.velocity, body.linear_damping, dt);
    body.angular_velocity = damp(body.angular_velocity, body.angular_damping, dt);
    *pos += body.velocity * dt;

    let radius = body.collider.radius();
    let floor = settings.floor_y + radius;
    if pos.y < floor {
        pos.y = floor;
        if body.velocity.y < 0.0 {
            body.velocity.y = -body.velocity.y * body.restitution;
        }
    }
    let limit = (settings.arena_half_extent - radius).max(0.0);
    if pos.x.abs() > limit {
        pos.x = pos.x.clamp(-limit, limit);
        body.velocity.x = -body.velocity.x * body.restitution;
    }
    if pos.z.abs() > limit {
        pos.z = pos.z.clamp(-limit, limit);
        body.velocity.z = -body.velocity.z * body.restitution;
    }
}

/// Spheres touching the floor roll without slipping.
fn roll(
    body: &mut RigidBody,
    orientation: &mut Orientation,
    pos: Vec3,
    dt: f32,
    settings: &PhysicsSettings,
) {
    let Collider::Sphere { radius } = body.collider else {
        return;
    };
    if radius <= 0.0 {
        return;
    }
    if pos.y <= settings.floor_y + radius + 1e-3 {
        let planar = Vec3::new(body.velocity.x, 0.0, body.velocity.z);
        body.angular_velocity = Vec3::Y.cross(planar) / radius;
    }
    let step = body.angular_velocity * dt;
    if step.length_squared() > 0.0 {
        orientation.rot = (Quat::from_scaled_axis(step) * orientation.rot).normalize();
    }
}

fn separate_spheres(states: &mut [BodyState]) {
    for i in 0..states.len() {
        for j in (i + 1)..states.len() {
            let (head, tail) = states.split_at_mut(j);
            let (a, b) = (&mut head[i], &mut tail[0]);
            if a.kind != BodyKind::Dynamic || b.kind != BodyKind::Dynamic {
                continue;
            }
            let (Collider::Sphere { radius: ra }, Collider::Sphere { radius: rb }) =
                (a.collider, b.collider)
            else {
                continue;
            };
            if !a.filter.interacts(&b.filter) {
                continue;
            }
            let delta = b.pos - a.pos;
            let dist = delta.length();
            let overlap = ra + rb - dist;
            if overlap <= 0.0 {
                continue;
            }
            let total = a.inv_mass + b.inv_mass;
            if total <= 0.0 {
                continue;
            }
            let normal = if dist > 1e-6 { delta / dist } else { Vec3::Y };
            a.pos -= normal * overlap * (a.inv_mass / total);
            b.pos += normal * overlap * (b.inv_mass / total);

            let approach = (b.vel - a.vel).dot(normal);
            if approach < 0.0 {
                let e = a.restitution.min(b.restitution);
                let j = -(1.0 + e) * approach / total;
                a.vel -= normal * j * a.inv_mass;
                b.vel += normal * j * b.inv_mass;
            }
        }
    }
}

fn contain_in_shells(states: &mut [BodyState]) {
    let shells: Vec<(Vec3, f32, CollisionFilter, f32)> = states
        .iter()
        .filter(|s| s.kind == BodyKind::Kinematic)
        .filter_map(|s| match s.collider {
            Collider::Shell { radius } => Some((s.pos, radius, s.filter, s.friction)),
            Collider::Sphere { .. } => None,
        })
        .collect();

    for (center, shell_radius, shell_filter, shell_friction) in shells {
        for s in states.iter_mut() {
            if s.kind != BodyKind::Dynamic || !s.filter.interacts(&shell_filter) {
                continue;
            }
            let Collider::Sphere { radius } = s.collider else {
                continue;
            };
            let limit = (shell_radius - radius).max(0.0);
            let offset = s.pos - center;
            let dist = offset.length();
            if dist <= limit {
                continue;
            }
            let normal = if dist > 1e-6 { offset / dist } else { Vec3::Y };
            s.pos = center + normal * limit;
            let outward = s.vel.dot(normal);
            if outward > 0.0 {
                let normal_dv = outward * (1.0 + s.restitution);
                s.vel -= normal * normal_dv;
                s.vel = apply_friction(s.vel, normal, normal_dv * s.friction * shell_friction);
            }
        }
    }
}

/// Remove up to `max_dv` of the velocity tangential to `normal`.
fn apply_friction(vel: Vec3, normal: Vec3, max_dv: f32) -> Vec3 {
    let tangent = vel - normal * vel.dot(normal);
    let speed = tangent.length();
    if speed <= 1e-6 || max_dv <= 0.0 {
        return vel;
    }
    let kept = (speed - max_dv).max(0.0) / speed;
    vel - tangent * (1.0 - kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn make_world(delta: f32) -> World {
        let mut world = World::new();
        world.insert_resource(WorldTime {
            delta,
            ..Default::default()
        });
        world.insert_resource(PhysicsSettings::default());
        world
    }

    fn step(world: &mut World) {
        let mut schedule = Schedule::default();
        schedule.add_systems(physics_step);
        schedule.run(world);
    }

    #[test]
    fn test_damp_matches_per_second_fraction() {
        let v = damp(Vec3::X * 10.0, 0.9, 1.0);
        assert!((v.x - 1.0).abs() < EPSILON);
        let v = damp(Vec3::X * 10.0, 0.0, 1.0);
        assert!((v.x - 10.0).abs() < EPSILON);
    }

    #[test]
    fn test_force_accelerates_and_is_cleared() {
        let mut world = make_world(0.1);
        let mut body = RigidBody::dynamic(Collider::Sphere { radius: 1.0 }, 2.0);
        body.apply_central_force(Vec3::X * 20.0);
        let e = world.spawn((body, WorldPosition::new(0.0, -5.0, 0.0))).id();
        step(&mut world);
        let body = world.get::<RigidBody>(e).unwrap();
        // 20 / 2 * 0.1 along X; gravity is cancelled by the floor.
        assert!((body.velocity.x - 1.0).abs() < EPSILON);
        assert_eq!(body.force, Vec3::ZERO);
        let pos = world.get::<WorldPosition>(e).unwrap();
        assert!((pos.pos.y - -5.0).abs() < EPSILON);
        assert!(pos.pos.x > 0.0);
    }

    #[test]
    fn test_impulse_applies_once() {
        let mut world = make_world(0.01);
        let mut body = RigidBody::dynamic(Collider::Sphere { radius: 1.0 }, 1.0);
        body.apply_central_impulse(Vec3::Y * 5.0);
        let e = world.spawn((body, WorldPosition::new(0.0, -5.0, 0.0))).id();
        step(&mut world);
        let vy = world.get::<RigidBody>(e).unwrap().velocity.y;
        assert!(vy > 4.8 && vy < 5.0, "vy = {}", vy);
        step(&mut world);
        let vy2 = world.get::<RigidBody>(e).unwrap().velocity.y;
        assert!(vy2 < vy);
    }

    #[test]
    fn test_walls_contain_bodies() {
        let mut world = make_world(0.1);
        let mut body = RigidBody::dynamic(Collider::Sphere { radius: 1.0 }, 1.0);
        body.velocity = Vec3::new(500.0, 0.0, -500.0);
        let e = world.spawn((body, WorldPosition::new(48.0, -5.0, -48.0))).id();
        step(&mut world);
        let pos = world.get::<WorldPosition>(e).unwrap().pos;
        assert!((pos.x - 48.5).abs() < EPSILON);
        assert!((pos.z - -48.5).abs() < EPSILON);
    }

    #[test]
    fn test_static_and_kinematic_bodies_do_not_move() {
        let mut world = make_world(0.1);
        let shell = world
            .spawn((
                RigidBody::kinematic(Collider::Shell { radius: 1.0 }),
                WorldPosition::new(0.0, 0.0, 0.0),
            ))
            .id();
        step(&mut world);
        assert_eq!(world.get::<WorldPosition>(shell).unwrap().pos, Vec3::ZERO);
    }

    #[test]
    fn test_overlapping_spheres_are_separated() {
        let mut world = make_world(0.01);
        let a = world
            .spawn((
                RigidBody::dynamic(Collider::Sphere { radius: 1.0 }, 1.0),
                WorldPosition::new(0.0, -5.0, 0.0),
            ))
            .id();
        let b = world
            .spawn((
                RigidBody::dynamic(Collider::Sphere { radius: 1.0 }, 1.0),
                WorldPosition::new(1.0, -5.0, 0.0),
            ))
            .id();
        step(&mut world);
        let pa = world.get::<WorldPosition>(a).unwrap().pos;
        let pb = world.get::<WorldPosition>(b).unwrap().pos;
        assert!(pa.distance(pb) >= 2.0 - EPSILON);
    }

    #[test]
    fn test_filtered_spheres_pass_through() {
        let mut world = make_world(0.01);
        let a = world
            .spawn((
                RigidBody::dynamic(Collider::Sphere { radius: 1.0 }, 1.0),
                WorldPosition::new(0.0, -5.0, 0.0),
            ))
            .id();
        let b = world
            .spawn((
                RigidBody::dynamic(Collider::Sphere { radius: 0.19 }, 0.0001)
                    .with_filter(CollisionFilter::new(8, 8)),
                WorldPosition::new(0.5, -5.0, 0.0),
            ))
            .id();
        step(&mut world);
        let pa = world.get::<WorldPosition>(a).unwrap().pos;
        let pb = world.get::<WorldPosition>(b).unwrap().pos;
        assert!(pa.distance(pb) < 1.0);
    }

    #[test]
    fn test_shell_keeps_items_inside() {
        let mut world = make_world(0.05);
        world.spawn((
            RigidBody::kinematic(Collider::Shell { radius: 1.0 })
                .with_filter(CollisionFilter::new(8, 8)),
            WorldPosition::new(0.0, 0.0, 0.0),
        ));
        let mut item = RigidBody::dynamic(Collider::Sphere { radius: 0.19 }, 0.0001)
            .with_filter(CollisionFilter::new(8, 8));
        item.velocity = Vec3::X * 50.0;
        let e = world.spawn((item, WorldPosition::new(0.0, 0.0, 0.0))).id();
        for _ in 0..20 {
            step(&mut world);
            let pos = world.get::<WorldPosition>(e).unwrap().pos;
            assert!(pos.length() <= 0.81 + EPSILON, "escaped to {:?}", pos);
        }
    }

    fn shell_contact_speed(item_friction: f32, shell_friction: f32) -> f32 {
        let mut world = make_world(0.05);
        world.insert_resource(PhysicsSettings {
            gravity: Vec3::ZERO,
            ..Default::default()
        });
        world.spawn((
            RigidBody::kinematic(Collider::Shell { radius: 1.0 })
                .with_filter(CollisionFilter::new(8, 8))
                .with_friction(shell_friction),
            WorldPosition::new(0.0, 0.0, 0.0),
        ));
        let mut item = RigidBody::dynamic(Collider::Sphere { radius: 0.19 }, 0.0001)
            .with_filter(CollisionFilter::new(8, 8))
            .with_friction(item_friction)
            .with_restitution(0.0);
        item.velocity = Vec3::new(5.0, 0.0, 3.0);
        let e = world.spawn((item, WorldPosition::new(0.8, 0.0, 0.0))).id();
        step(&mut world);
        world.get::<RigidBody>(e).unwrap().velocity.length()
    }

    #[test]
    fn test_frictionless_shell_keeps_sliding_speed() {
        let speed = shell_contact_speed(0.0, 0.0);
        assert!(speed > 2.0, "speed {}", speed);
    }

    #[test]
    fn test_rough_shell_stops_sliding() {
        let speed = shell_contact_speed(1.0, 1.0);
        assert!(speed < EPSILON, "speed {}", speed);
        let partial = shell_contact_speed(0.5, 0.5);
        assert!(partial > EPSILON && partial < shell_contact_speed(0.0, 0.0));
    }

    #[test]
    fn test_friction_only_removes_tangential_speed() {
        let normal = Vec3::X;
        let v = apply_friction(Vec3::new(0.0, 0.0, 3.0), normal, 1.0);
        assert!((v.z - 2.0).abs() < EPSILON);
        let v = apply_friction(Vec3::new(0.0, 0.0, 3.0), normal, 10.0);
        assert!(v.length() < EPSILON);
        let v = apply_friction(Vec3::new(-1.0, 0.0, 0.0), normal, 10.0);
        assert!((v.x - -1.0).abs() < EPSILON);
    }

    #[test]
    fn test_rolling_turns_orientation() {
        let mut world = make_world(0.1);
        let mut body = RigidBody::dynamic(Collider::Sphere { radius: 1.0 }, 1.0);
        body.velocity = Vec3::X * 2.0;
        let e = world
            .spawn((body, WorldPosition::new(0.0, -5.0, 0.0), Orientation::default()))
            .id();
        step(&mut world);
        let rot = world.get::<Orientation>(e).unwrap().rot;
        assert!(rot.angle_between(Quat::IDENTITY) > 0.01);
    }
}
