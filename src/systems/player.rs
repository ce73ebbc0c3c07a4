//! Player movement and the objects that trail the player.
//!
//! - [`player_controller`] turns the stick into a central force and the jump
//!   button into an upward impulse
//! - [`camera_follow_system`] and [`light_follow_system`] keep the camera
//!   and the shadow light at fixed offsets from the player

use bevy_ecs::prelude::*;
use glam::Vec3;

use crate::components::markers::Player;
use crate::components::rigidbody::RigidBody;
use crate::components::worldposition::WorldPosition;
use crate::resources::camera::Camera3D;
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::InputState;
use crate::resources::lighting::DirectionalLight;
use crate::resources::physics::PhysicsSettings;
use crate::systems::tween::map_range;

/// Height above the resting position still counted as standing on the floor.
const GROUND_TOLERANCE: f32 = 0.05;

/// Rescale a stick axis so that `[zone, 1]` maps to `[0, 1]`, keeping the sign.
///
/// Values inside the dead zone become `0`.
pub fn deadzone(v: f32, zone: f32) -> f32 {
    let magnitude = v.abs().max(zone);
    let sign = if v == 0.0 { 0.0 } else { v.signum() };
    sign * map_range(magnitude, zone, 1.0, 0.0, 1.0)
}

pub fn player_controller(
    config: Res<GameConfig>,
    settings: Res<PhysicsSettings>,
    input: Res<InputState>,
    mut players: Query<(&mut RigidBody, &WorldPosition), With<Player>>,
) {
    let Some(pad) = input.gamepad(config.gamepad_slot) else {
        return;
    };
    let ax = deadzone(pad.axis(0), config.deadzone);
    let ay = deadzone(pad.axis(1), config.deadzone);
    let jump = config.jump_impulse > 0.0 && pad.button(config.jump_button).just_pressed;

    for (mut body, pos) in players.iter_mut() {
        body.apply_central_force(Vec3::new(ax, 0.0, ay) * config.force_scale);
        let rest = settings.floor_y + body.collider.radius();
        if jump && pos.pos.y <= rest + GROUND_TOLERANCE {
            body.apply_central_impulse(Vec3::Y * config.jump_impulse);
        }
    }
}

pub fn camera_follow_system(
    mut camera: ResMut<Camera3D>,
    players: Query<&WorldPosition, With<Player>>,
) {
    if let Some(player) = players.iter().next() {
        camera.follow(player.pos);
    }
}

pub fn light_follow_system(
    mut light: ResMut<DirectionalLight>,
    players: Query<&WorldPosition, With<Player>>,
) {
    if let Some(player) = players.iter().next() {
        light.follow(player.pos);
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
    fn test_deadzone_inside_zone_is_zero() {
        assert!(approx_eq(deadzone(0.0, 0.1), 0.0));
        assert!(approx_eq(deadzone(0.05, 0.1), 0.0));
        assert!(approx_eq(deadzone(-0.09, 0.1), 0.0));
    }

    #[test]
    fn test_deadzone_rescales_outside_zone() {
        assert!(approx_eq(deadzone(1.0, 0.1), 1.0));
        assert!(approx_eq(deadzone(-1.0, 0.1), -1.0));
        assert!(approx_eq(deadzone(0.55, 0.1), 0.5));
        assert!(approx_eq(deadzone(-0.55, 0.1), -0.5));
    }
}
