//! Deferred one-shot work.
//!
//! [`ScheduledTasks`] is a queue of actions due at a future world time. The
//! [`run_scheduled_tasks`](crate::systems::tasks::run_scheduled_tasks) system
//! drains whatever is due each frame. Cancelling is idempotent: cancelling an
//! unknown, already cancelled or already fired task does nothing.

use bevy_ecs::prelude::*;
use glam::Vec3;
use rustc_hash::FxHashSet;

/// Handle returned by [`ScheduledTasks::schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

/// What a task does when it fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TaskKind {
    /// Spawn reward number `index` at `position` (world units).
    SpawnReward { index: usize, position: Vec3 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledTask {
    pub id: TaskId,
    /// World elapsed seconds at which the task fires.
    pub due: f32,
    pub kind: TaskKind,
}

#[derive(Resource, Debug, Default)]
pub struct ScheduledTasks {
    next_id: u64,
    pending: Vec<ScheduledTask>,
    cancelled: FxHashSet<TaskId>,
}

impl ScheduledTasks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `kind` to run at world time `due`.
    pub fn schedule(&mut self, due: f32, kind: TaskKind) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.pending.push(ScheduledTask { id, due, kind });
        id
    }

    /// Cancel a pending task. Returns whether anything was cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        if self.pending.iter().any(|t| t.id == id) {
            self.cancelled.insert(id)
        } else {
            false
        }
    }

    /// Remove and return every uncancelled task due at or before `now`,
    /// earliest first.
    pub fn drain_due(&mut self, now: f32) -> Vec<ScheduledTask> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|t| t.due <= now);
        self.pending = pending;
        due.retain(|t| !self.cancelled.remove(&t.id));
        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.id.cmp(&b.id)));
        due
    }

    /// Number of tasks still waiting, cancelled ones excluded.
    pub fn pending(&self) -> usize {
        self.pending
            .iter()
            .filter(|t| !self.cancelled.contains(&t.id))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.pending() == 0
    }
}
