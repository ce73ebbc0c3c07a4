//! Runs deferred work from [`ScheduledTasks`].

use bevy_ecs::prelude::*;
use log::debug;

use crate::resources::tasks::{ScheduledTasks, TaskKind};
use crate::resources::worldtime::WorldTime;
use crate::systems::rewards::spawn_reward;

pub fn run_scheduled_tasks(
    mut commands: Commands,
    time: Res<WorldTime>,
    mut tasks: ResMut<ScheduledTasks>,
) {
    for task in tasks.drain_due(time.elapsed) {
        debug!("Running task {:?} due at {:.2}s", task.id, task.due);
        match task.kind {
            TaskKind::SpawnReward { index, position } => {
                spawn_reward(&mut commands, index, position);
            }
        }
    }
}
