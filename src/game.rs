//! Scene setup, schedule construction and the frame driver.
//!
//! The lifecycle follows [`GameStates`]: [`Game::new`] requests `Setup`,
//! whose hook ([`setup`]) builds the scene and requests `Playing`. Every
//! gameplay system runs only while playing. Once the game has been over for
//! the configured linger time the state moves to `Quitting` and the driver
//! stops.

use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use glam::Vec3;
use log::info;
use serde::Serialize;

use crate::components::animation::AnimationClip;
use crate::components::environment::Fog;
use crate::components::follow::Follow;
use crate::components::isosurface::IsoSurface;
use crate::components::markers::{DepositTarget, Indicator, Objective, Player, PlayerShell, Reward};
use crate::components::orientation::Orientation;
use crate::components::rigidbody::{Collider, CollisionFilter, RigidBody};
use crate::components::scale::Scale;
use crate::components::storm::{StormField, random_range};
use crate::components::tint::Tint;
use crate::components::visibility::{Opacity, Visible};
use crate::components::worldposition::WorldPosition;
use crate::events::gameover::observe_game_over;
use crate::events::gamestate::{GameStateChangedEvent, observe_gamestate_change_event};
use crate::events::tween::observe_tween_finished;
use crate::resources::camera::Camera3D;
use crate::resources::gameconfig::GameConfig;
use crate::resources::gamestate::{GameState, GameStates, NextGameState};
use crate::resources::input::{GamepadFeed, GamepadSource, InputState};
use crate::resources::lighting::DirectionalLight;
use crate::resources::physics::PhysicsSettings;
use crate::resources::progress::{GamePhase, GameProgress, ProgressRules};
use crate::resources::rng::GameRng;
use crate::resources::scene::{HeldItems, SceneEntities};
use crate::resources::systemsstore::SystemsStore;
use crate::resources::tasks::ScheduledTasks;
use crate::resources::worldtime::WorldTime;
use crate::systems::follow::follow_system;
use crate::systems::gamestate::{check_pending_state, quit_after_game_over, state_is_playing};
use crate::systems::indicator::indicator_system;
use crate::systems::input::poll_gamepads;
use crate::systems::isosurface::isosurface_system;
use crate::systems::physics::physics_step;
use crate::systems::player::{camera_follow_system, light_follow_system, player_controller};
use crate::systems::progress::{
    ITEM_COLLISION_GROUP, animation_drive_system, progress_completion_system,
    progress_input_system,
};
use crate::systems::rewards::reward_attraction_system;
use crate::systems::storm::storm_system;
use crate::systems::tasks::run_scheduled_tasks;
use crate::systems::time::update_world_time;
use crate::systems::tween::{tween_fog_system, tween_opacity_system, tween_scale_system};

/// Cells per side of the placement grid.
const GRID_SIZE: f32 = 64.0;
/// World units per grid cell.
const CELL_SIZE: f32 = 1.57;
const QUADRANT_CENTERS: [(f32, f32); 4] = [(16.0, 16.0), (48.0, 16.0), (16.0, 48.0), (48.0, 48.0)];

const PLAYER_RADIUS: f32 = 1.0;
const PLAYER_MASS: f32 = 1.0;
const PLAYER_START: Vec3 = Vec3::new(0.0, -3.0, 0.0);
const HIDDEN_OBJECTIVE_SCALE: f32 = 0.001;
const ISO_RESOLUTION: u32 = 16;
const ISO_SCALE: f32 = 1.3;
const FOG_COLOR: u32 = 0xedf5ff;
const FOG_NEAR: f32 = 30.0;
const FOG_FAR: f32 = 40.0;
const STORM_HALF_EXTENT: Vec3 = Vec3::new(50.0, 10.0, 50.0);

/// World coordinate of the center of grid cell `cell`.
pub fn cell_to_world(cell: f32) -> f32 {
    (cell - GRID_SIZE / 2.0) * CELL_SIZE + 0.5
}

/// Place `count` objectives around the quadrant centers, jittered by up to
/// `jitter` cells. Past four objectives the centers repeat.
pub fn objective_positions(count: usize, jitter: f32, y: f32, rng: &mut fastrand::Rng) -> Vec<Vec3> {
    (0..count)
        .map(|i| {
            let (cx, cz) = QUADRANT_CENTERS[i % QUADRANT_CENTERS.len()];
            let x = (cx + random_range(rng, -jitter, jitter)).floor();
            let z = (cz + random_range(rng, -jitter, jitter)).floor();
            Vec3::new(cell_to_world(x), y, cell_to_world(z))
        })
        .collect()
}

/// Build the scene and request [`GameStates::Playing`].
pub fn setup(
    mut commands: Commands,
    config: Res<GameConfig>,
    settings: Res<PhysicsSettings>,
    mut rng: ResMut<GameRng>,
    mut next_state: ResMut<NextGameState>,
) {
    let ground = settings.floor_y + 1.0;

    let environment = commands
        .spawn(Fog::new(FOG_COLOR, FOG_NEAR, FOG_FAR))
        .id();

    let deposit_target = commands
        .spawn((
            DepositTarget,
            WorldPosition::new(0.0, ground, 0.0),
            Scale::default(),
            Visible(true),
            AnimationClip::new("grow", config.clip_duration),
        ))
        .id();

    let player = commands
        .spawn((
            Player,
            WorldPosition::from_vec(PLAYER_START),
            Orientation::default(),
            RigidBody::dynamic(Collider::Sphere { radius: PLAYER_RADIUS }, PLAYER_MASS)
                .with_damping(config.player_linear_damping, config.player_angular_damping),
        ))
        .id();

    let shell = commands
        .spawn((
            PlayerShell,
            WorldPosition::from_vec(PLAYER_START),
            Orientation::default(),
            Tint::new(1.0, 1.0, 1.0),
            Visible(true),
            RigidBody::kinematic(Collider::Shell { radius: PLAYER_RADIUS })
                .with_filter(CollisionFilter::new(ITEM_COLLISION_GROUP, ITEM_COLLISION_GROUP))
                .with_friction(0.0),
            Follow::new(player).with_orientation(),
        ))
        .id();

    let iso_surface = commands
        .spawn((
            IsoSurface::new(ISO_RESOLUTION, ISO_SCALE),
            WorldPosition::from_vec(PLAYER_START),
            Orientation::default(),
            Follow::new(player).with_orientation(),
        ))
        .id();

    let indicator = commands
        .spawn((
            Indicator,
            WorldPosition::from_vec(PLAYER_START + Vec3::Y * config.indicator_height),
            Orientation::default(),
            Scale::default(),
            Opacity::new(config.indicator_max_opacity),
            Visible(true),
            Follow::new(player).with_offset(Vec3::Y * config.indicator_height),
        ))
        .id();

    let positions = objective_positions(
        config.objective_count(),
        config.objective_jitter,
        ground,
        &mut rng.0,
    );
    let objectives = positions
        .iter()
        .enumerate()
        .map(|(index, pos)| {
            let scale = if index == 0 { 1.0 } else { HIDDEN_OBJECTIVE_SCALE };
            commands
                .spawn((
                    Objective { index },
                    WorldPosition::from_vec(*pos),
                    Scale::uniform(scale),
                    Visible(true),
                ))
                .id()
        })
        .collect::<Vec<_>>();

    let storm = config.storm_enabled.then(|| {
        commands
            .spawn((
                StormField::scatter(config.storm_particles, STORM_HALF_EXTENT, &mut rng.0),
                Opacity::opaque(),
                Visible(true),
            ))
            .id()
    });

    commands.insert_resource(Camera3D::default());
    commands.insert_resource(DirectionalLight::default());
    commands.insert_resource(HeldItems::default());
    commands.insert_resource(SceneEntities {
        player,
        shell,
        deposit_target,
        indicator,
        iso_surface,
        environment,
        storm,
        objectives,
    });

    info!(
        "Scene ready: {} objectives at {:?}, storm {}",
        positions.len(),
        positions,
        if storm.is_some() { "on" } else { "off" }
    );
    next_state.set(GameStates::Playing);
}

pub fn enter_play(progress: Res<GameProgress>) {
    info!(
        "Playing: {} objectives holding {} items, clip {:.2}s",
        progress.objective_count(),
        progress.total_capacity(),
        progress.rules().clip_duration
    );
}

pub fn quit_game(time: Res<WorldTime>, progress: Res<GameProgress>) {
    info!(
        "Quitting after {:.2}s ({} frames), phase {:?}, progress {:.2}",
        time.elapsed,
        time.frame_count,
        progress.phase(),
        progress.progress()
    );
}

/// Per-frame schedule with every gameplay system in frame order.
pub fn build_update_schedule() -> Schedule {
    let mut update = Schedule::default();
    update.add_systems(
        (
            poll_gamepads,
            player_controller,
            progress_input_system,
            reward_attraction_system,
            physics_step,
            follow_system,
            (
                camera_follow_system,
                light_follow_system,
                indicator_system,
                isosurface_system,
            ),
            animation_drive_system,
            progress_completion_system,
            (tween_scale_system, tween_opacity_system, tween_fog_system),
            run_scheduled_tasks,
            storm_system,
            quit_after_game_over,
        )
            .chain()
            .run_if(state_is_playing),
    );
    update.add_systems(check_pending_state.after(quit_after_game_over));
    update
}

/// Summary of a run, written by the binary as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub frames: u64,
    pub elapsed: f32,
    pub phase: GamePhase,
    pub objective: usize,
    pub held: u32,
    pub deposited: u32,
    pub total_capacity: u32,
    pub progress: f32,
    pub clip_time: f32,
    pub game_over: bool,
    pub game_over_at: Option<f32>,
    pub rewards_spawned: usize,
    pub rewards_attracted: usize,
    pub player_position: [f32; 3],
    pub fog: (f32, f32),
    pub storm_enabled: bool,
}

/// Owns the world and schedule of one game and steps them frame by frame.
pub struct Game {
    world: World,
    schedule: Schedule,
    game_over_at: Option<f32>,
}

impl Game {
    /// Build the world, register hooks and observers, and run scene setup.
    pub fn new(config: GameConfig, source: impl GamepadSource + 'static) -> Self {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        world.insert_resource(GameRng::seeded(config.seed));
        world.insert_resource(PhysicsSettings::from_config(&config));
        world.insert_resource(GameProgress::new(ProgressRules::from_config(&config)));
        world.insert_resource(ScheduledTasks::new());
        world.insert_resource(InputState::default());
        world.insert_resource(GamepadFeed::new(source));
        world.insert_resource(GameState::new());
        world.insert_resource(NextGameState::new());
        world.insert_resource(config);

        world.spawn(Observer::new(observe_gamestate_change_event));
        world.spawn(Observer::new(observe_tween_finished));
        world.spawn(Observer::new(observe_game_over));

        let mut systems_store = SystemsStore::new();
        let setup_id = world.register_system(setup);
        systems_store.insert("setup", setup_id);
        let enter_play_id = world.register_system(enter_play);
        systems_store.insert("enter_play", enter_play_id);
        let quit_game_id = world.register_system(quit_game);
        systems_store.insert("quit_game", quit_game_id);
        world.insert_resource(systems_store);

        world.resource_mut::<NextGameState>().set(GameStates::Setup);
        world.trigger(GameStateChangedEvent {});
        world.flush();

        Game {
            world,
            schedule: build_update_schedule(),
            game_over_at: None,
        }
    }

    /// Advance one frame of `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        update_world_time(&mut self.world, dt);
        self.schedule.run(&mut self.world);
        self.world.clear_trackers();
        if self.game_over_at.is_none() && self.world.resource::<GameProgress>().is_game_over() {
            self.game_over_at = Some(self.world.resource::<WorldTime>().elapsed);
        }
    }

    /// Tick at the configured frame rate until quitting or `max_frames`.
    /// Returns the number of frames run.
    pub fn run(&mut self, max_frames: u64) -> u64 {
        let dt = self.world.resource::<GameConfig>().frame_delta();
        let mut frames = 0;
        while frames < max_frames && !self.is_quitting() {
            self.tick(dt);
            frames += 1;
        }
        frames
    }

    pub fn state(&self) -> GameStates {
        self.world.resource::<GameState>().get()
    }

    pub fn is_quitting(&self) -> bool {
        self.state() == GameStates::Quitting
    }

    pub fn progress(&self) -> &GameProgress {
        self.world.resource::<GameProgress>()
    }

    pub fn scene(&self) -> &SceneEntities {
        self.world.resource::<SceneEntities>()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn report(&mut self) -> RunReport {
        let (rewards_spawned, rewards_attracted) = {
            let mut rewards = self.world.query::<&Reward>();
            rewards
                .iter(&self.world)
                .fold((0, 0), |(n, a), r| (n + 1, a + usize::from(r.attracted)))
        };
        let scene = self.scene().clone();
        let clip_time = self
            .world
            .get::<AnimationClip>(scene.deposit_target)
            .map(|c| c.time)
            .unwrap_or_default();
        let player = self
            .world
            .get::<WorldPosition>(scene.player)
            .map(|p| p.pos)
            .unwrap_or_default();
        let fog = self
            .world
            .get::<Fog>(scene.environment)
            .map(|f| (f.near, f.far))
            .unwrap_or_default();
        let storm_enabled = scene
            .storm
            .and_then(|e| self.world.get::<StormField>(e))
            .is_some_and(|s| s.enabled);
        let time = *self.world.resource::<WorldTime>();
        let progress = self.progress();
        RunReport {
            frames: time.frame_count,
            elapsed: time.elapsed,
            phase: progress.phase(),
            objective: progress.objective(),
            held: progress.held(),
            deposited: progress.deposited(),
            total_capacity: progress.total_capacity(),
            progress: progress.progress(),
            clip_time,
            game_over: progress.is_game_over(),
            game_over_at: self.game_over_at,
            rewards_spawned,
            rewards_attracted,
            player_position: player.to_array(),
            fog,
            storm_enabled,
        }
    }
}
