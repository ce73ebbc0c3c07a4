//! Engine tick integration tests for tweens, scheduled tasks, following,
//! the indicator and game completion.

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use glam::{Quat, Vec3};

use holotree::components::animation::AnimationClip;
use holotree::components::follow::Follow;
use holotree::components::markers::{DepositTarget, Indicator, Reward};
use holotree::components::orientation::Orientation;
use holotree::components::rigidbody::{Collider, RigidBody};
use holotree::components::scale::Scale;
use holotree::components::storm::StormField;
use holotree::components::tween::{TweenAction, TweenOpacity};
use holotree::components::visibility::{Opacity, Visible};
use holotree::components::worldposition::WorldPosition;
use holotree::events::gameover::GameOverEvent;
use holotree::events::tween::observe_tween_finished;
use holotree::resources::gameconfig::GameConfig;
use holotree::resources::physics::PhysicsSettings;
use holotree::resources::progress::{GameProgress, ProgressRules};
use holotree::resources::rng::GameRng;
use holotree::resources::scene::SceneEntities;
use holotree::resources::tasks::{ScheduledTasks, TaskKind};
use holotree::resources::worldtime::WorldTime;
use holotree::systems::follow::follow_system;
use holotree::systems::indicator::indicator_system;
use holotree::systems::physics::physics_step;
use holotree::systems::progress::{animation_drive_system, progress_completion_system};
use holotree::systems::tasks::run_scheduled_tasks;
use holotree::systems::time::update_world_time;
use holotree::systems::tween::{tween_opacity_system, tween_scale_system};

const EPSILON: f32 = 1e-4;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn make_world() -> World {
    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    world.insert_resource(GameConfig::new());
    world.insert_resource(PhysicsSettings::default());
    world.insert_resource(ScheduledTasks::new());
    world.spawn(Observer::new(observe_tween_finished));
    world
}

fn run(world: &mut World, schedule: &mut Schedule, dt: f32) {
    update_world_time(world, dt);
    schedule.run(world);
    world.flush();
}

#[derive(Resource, Default)]
struct GameOverCount(u32);

fn count_game_over(_trigger: On<GameOverEvent>, mut count: ResMut<GameOverCount>) {
    count.0 += 1;
}

/// Scene resource whose entities are bare placeholders except for the ones
/// a test fills in.
fn placeholder_scene(world: &mut World, player: Entity, objective: Entity) -> SceneEntities {
    let mut spare = || world.spawn_empty().id();
    SceneEntities {
        player,
        shell: spare(),
        deposit_target: spare(),
        indicator: spare(),
        iso_surface: spare(),
        environment: spare(),
        storm: None,
        objectives: vec![objective],
    }
}

// =============================================================================
// Tweens and completion actions
// =============================================================================

#[test]
fn storm_fade_disables_storm_when_finished() {
    let mut world = make_world();
    let mut rng = GameRng::seeded(3);
    let storm = world
        .spawn((
            StormField::scatter(16, Vec3::splat(10.0), &mut rng.0),
            Opacity::opaque(),
            Visible(true),
            TweenOpacity::new(1.0, 0.0, 0.5).then(TweenAction::DisableStorm),
        ))
        .id();

    let mut schedule = Schedule::default();
    schedule.add_systems(tween_opacity_system);

    run(&mut world, &mut schedule, 0.3);
    let opacity = world.get::<Opacity>(storm).unwrap().value;
    assert!(opacity > 0.0 && opacity < 1.0);
    assert!(world.get::<StormField>(storm).unwrap().enabled);

    run(&mut world, &mut schedule, 0.3);
    assert!(approx_eq(world.get::<Opacity>(storm).unwrap().value, 0.0));
    assert!(!world.get::<StormField>(storm).unwrap().enabled);
    assert!(!world.get::<Visible>(storm).unwrap().0);
}

#[test]
fn scheduled_reward_spawns_grows_and_activates() {
    let mut world = make_world();
    world.resource_mut::<ScheduledTasks>().schedule(
        1.0,
        TaskKind::SpawnReward {
            index: 2,
            position: Vec3::new(5.0, -3.0, 5.0),
        },
    );

    let mut schedule = Schedule::default();
    // Same order as the game: tweens advance before due tasks run, so a freshly
    // spawned reward starts growing on the following frame.
    schedule.add_systems((tween_scale_system, run_scheduled_tasks).chain());

    run(&mut world, &mut schedule, 0.5);
    let mut rewards = world.query::<&Reward>();
    assert_eq!(rewards.iter(&world).count(), 0);

    // Due now: spawned tiny, no body yet.
    run(&mut world, &mut schedule, 0.5);
    let mut rewards = world.query::<(Entity, &Reward, &Scale)>();
    let (entity, reward, scale) = rewards.single(&world).unwrap();
    assert_eq!(reward.index, 2);
    assert!(!reward.attracted);
    assert!(scale.scale.x < 0.01);
    assert!(world.get::<RigidBody>(entity).is_none());
    assert!(world.resource::<ScheduledTasks>().is_empty());

    // Growth takes half a second; the body arrives with it.
    run(&mut world, &mut schedule, 0.3);
    run(&mut world, &mut schedule, 0.3);
    let reward = world.get::<Reward>(entity).unwrap();
    assert!(reward.attracted);
    assert!(approx_eq(world.get::<Scale>(entity).unwrap().scale.x, 0.3));
    let body = world.get::<RigidBody>(entity).unwrap();
    assert!(body.is_dynamic());
    assert!(approx_eq(body.collider.radius(), 0.3));
}

#[test]
fn cancelled_task_never_runs() {
    let mut world = make_world();
    let id = world.resource_mut::<ScheduledTasks>().schedule(
        0.1,
        TaskKind::SpawnReward {
            index: 0,
            position: Vec3::ZERO,
        },
    );
    assert!(world.resource_mut::<ScheduledTasks>().cancel(id));

    let mut schedule = Schedule::default();
    schedule.add_systems(run_scheduled_tasks);
    run(&mut world, &mut schedule, 1.0);

    let mut rewards = world.query::<&Reward>();
    assert_eq!(rewards.iter(&world).count(), 0);
}

// =============================================================================
// Following and physics
// =============================================================================

#[test]
fn followers_track_position_offset_and_orientation() {
    let mut world = make_world();
    let rot = Quat::from_rotation_y(1.0);
    let target = world
        .spawn((WorldPosition::new(1.0, 2.0, 3.0), Orientation { rot }))
        .id();
    let rider = world
        .spawn((
            WorldPosition::default(),
            Orientation::default(),
            Follow::new(target).with_orientation(),
        ))
        .id();
    let floater = world
        .spawn((
            WorldPosition::default(),
            Orientation::default(),
            Follow::new(target).with_offset(Vec3::Y * 2.0),
        ))
        .id();

    let mut schedule = Schedule::default();
    schedule.add_systems(follow_system);
    run(&mut world, &mut schedule, 0.016);

    assert_eq!(world.get::<WorldPosition>(rider).unwrap().pos, Vec3::new(1.0, 2.0, 3.0));
    assert!(world.get::<Orientation>(rider).unwrap().rot.abs_diff_eq(rot, EPSILON));
    assert_eq!(world.get::<WorldPosition>(floater).unwrap().pos, Vec3::new(1.0, 4.0, 3.0));
    assert_eq!(world.get::<Orientation>(floater).unwrap().rot, Quat::IDENTITY);
}

#[test]
fn falling_ball_comes_to_rest_and_carries_its_follower() {
    let mut world = make_world();
    let ball = world
        .spawn((
            WorldPosition::new(0.0, 5.0, 0.0),
            Orientation::default(),
            RigidBody::dynamic(Collider::Sphere { radius: 1.0 }, 1.0),
        ))
        .id();
    let shell = world
        .spawn((
            WorldPosition::default(),
            Orientation::default(),
            Follow::new(ball),
        ))
        .id();

    let mut schedule = Schedule::default();
    schedule.add_systems((physics_step, follow_system).chain());
    for _ in 0..300 {
        run(&mut world, &mut schedule, 1.0 / 60.0);
    }

    let pos = world.get::<WorldPosition>(ball).unwrap().pos;
    assert!(approx_eq(pos.y, -5.0), "ball y {}", pos.y);
    assert_eq!(world.get::<WorldPosition>(shell).unwrap().pos, pos);
}

// =============================================================================
// Indicator
// =============================================================================

#[test]
fn indicator_fades_with_distance_and_faces_destination() {
    let mut world = make_world();
    world.insert_resource(GameProgress::default());
    let player = world.spawn(WorldPosition::new(0.0, 0.0, 0.0)).id();
    let objective = world.spawn(WorldPosition::new(0.0, 0.0, 18.0)).id();
    let scene = placeholder_scene(&mut world, player, objective);
    world.insert_resource(scene);
    let indicator = world
        .spawn((
            Indicator,
            WorldPosition::new(0.0, 0.0, 0.0),
            Orientation { rot: Quat::from_rotation_y(2.0) },
            Opacity::new(0.5),
        ))
        .id();

    let mut schedule = Schedule::default();
    schedule.add_systems(indicator_system);
    run(&mut world, &mut schedule, 0.016);

    assert!(approx_eq(world.get::<Opacity>(indicator).unwrap().value, 0.25));
    let forward = world.get::<Orientation>(indicator).unwrap().forward();
    assert!(forward.abs_diff_eq(Vec3::Z, EPSILON));

    // Right on top of it: fully faded.
    world.get_mut::<WorldPosition>(player).unwrap().pos = Vec3::new(0.0, 0.0, 17.0);
    run(&mut world, &mut schedule, 0.016);
    assert!(approx_eq(world.get::<Opacity>(indicator).unwrap().value, 0.0));
}

// =============================================================================
// Completion
// =============================================================================

#[test]
fn clip_catches_up_and_game_over_fires_once() {
    let mut world = make_world();
    world.init_resource::<GameOverCount>();
    world.spawn(Observer::new(count_game_over));

    let mut progress = GameProgress::new(ProgressRules::uniform(1, 1));
    assert!(progress.press_trigger(0.0, 0.0).is_accepted());
    assert!(progress.press_trigger(1.0, 0.0).is_accepted());
    assert!(approx_eq(progress.progress(), 3.32));
    world.insert_resource(progress);

    let target = world
        .spawn((DepositTarget, AnimationClip::new("grow", 3.32)))
        .id();

    let mut schedule = Schedule::default();
    schedule.add_systems((animation_drive_system, progress_completion_system).chain());

    // Half speed playback: 3.32s of clip takes a little under 7s.
    for _ in 0..60 {
        run(&mut world, &mut schedule, 0.1);
    }
    assert_eq!(world.resource::<GameOverCount>().0, 0);
    assert!(!world.resource::<GameProgress>().is_game_over());

    for _ in 0..40 {
        run(&mut world, &mut schedule, 0.1);
    }
    assert_eq!(world.resource::<GameOverCount>().0, 1);
    assert!(world.resource::<GameProgress>().is_game_over());
    let clip = world.get::<AnimationClip>(target).unwrap();
    assert!(clip.time <= 3.32 + 0.05 + EPSILON);
}

#[test]
fn clip_stays_put_without_progress() {
    let mut world = make_world();
    world.insert_resource(GameProgress::default());
    let target = world
        .spawn((DepositTarget, AnimationClip::new("grow", 3.32)))
        .id();

    let mut schedule = Schedule::default();
    schedule.add_systems((animation_drive_system, progress_completion_system).chain());
    for _ in 0..30 {
        run(&mut world, &mut schedule, 0.1);
    }
    assert_eq!(world.get::<AnimationClip>(target).unwrap().time, 0.0);
    assert!(!world.resource::<GameProgress>().is_game_over());
}
