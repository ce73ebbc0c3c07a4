//! Game progress state machine.
//!
//! [`GameProgress`] owns the scripted sequence of the game: the player visits
//! each objective in turn, picks up items from it until it is depleted, then
//! carries them to the deposit target where every deposited item grows the
//! target's animation a little further. When the animation reaches its end
//! the game is over.
//!
//! The struct knows nothing about entities. Every transition returns a
//! [`TriggerOutcome`] and the systems in `crate::systems::progress` turn that
//! outcome into scene changes (spawning items, tweening scales, ...). This
//! keeps the sequence testable without a world.
//!
//! # Related
//!
//! - [`crate::systems::progress::progress_input_system`] – feeds trigger presses
//! - [`crate::systems::progress::progress_completion_system`] – detects game over
//! - [`crate::systems::progress::animation_drive_system`] – catches the clip up

use bevy_ecs::prelude::*;
use serde::Serialize;

use crate::resources::gameconfig::GameConfig;

/// Smallest scale an objective shrinks to while still being drawn.
pub const MIN_OBJECTIVE_SCALE: f32 = 0.00001;

/// What the player is doing with the current objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    Collecting,
    Depositing,
}

/// Combined view of objective index and stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    Collecting(usize),
    Depositing(usize),
    /// Depositing the last objective with nothing left to deposit.
    Finished,
}

/// Where the player should be heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Destination {
    Objective(usize),
    DepositTarget,
}

/// Why a trigger press changed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    OutOfRange,
    Debounced,
    /// Depositing the last objective with empty hands.
    NothingToDo,
}

/// Result of a trigger press.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriggerOutcome {
    Ignored(IgnoreReason),
    /// One item was picked up from `objective`.
    Collected {
        objective: usize,
        held: u32,
        remaining_scale: f32,
        /// The objective ran out and the stage switched to depositing.
        depleted: bool,
    },
    /// One held item was consumed at the deposit target.
    Deposited {
        objective: usize,
        held: u32,
        progress: f32,
    },
    /// Moved on to collecting from `objective`.
    Advanced { objective: usize },
}

impl TriggerOutcome {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, TriggerOutcome::Ignored(_))
    }
}

/// Tunable numbers of the sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressRules {
    /// Item capacity of each objective, in visiting order.
    pub capacities: Vec<u32>,
    pub clip_duration: f32,
    pub pickup_range: f32,
    pub debounce: f32,
    pub completion_tolerance: f32,
    pub playback_rate: f32,
}

impl Default for ProgressRules {
    fn default() -> Self {
        Self::from_config(&GameConfig::new())
    }
}

impl ProgressRules {
    pub fn from_config(config: &GameConfig) -> Self {
        let capacities = if config.capacities.is_empty() {
            vec![1]
        } else {
            config.capacities.iter().map(|c| (*c).max(1)).collect()
        };
        ProgressRules {
            capacities,
            clip_duration: config.clip_duration,
            pickup_range: config.pickup_range,
            debounce: config.debounce,
            completion_tolerance: config.completion_tolerance,
            playback_rate: config.playback_rate,
        }
    }

    /// Rules with `count` objectives of equal `capacity`.
    pub fn uniform(count: usize, capacity: u32) -> Self {
        ProgressRules {
            capacities: vec![capacity.max(1); count.max(1)],
            ..Self::default()
        }
    }

    pub fn objective_count(&self) -> usize {
        self.capacities.len()
    }

    /// Sum of all capacities, saturating at `u32::MAX`.
    pub fn total_capacity(&self) -> u32 {
        self.capacities
            .iter()
            .fold(0u32, |total, c| total.saturating_add(*c))
    }

    /// Progress gained per deposited item.
    pub fn step(&self) -> f32 {
        self.clip_duration / self.total_capacity() as f32
    }
}

/// Scripted progress of one game.
#[derive(Resource, Debug, Clone)]
pub struct GameProgress {
    rules: ProgressRules,
    objective: usize,
    stage: Stage,
    held: u32,
    deposited: u32,
    progress: f32,
    game_over: bool,
    last_accepted: Option<f32>,
}

impl Default for GameProgress {
    fn default() -> Self {
        Self::new(ProgressRules::default())
    }
}

impl GameProgress {
    pub fn new(rules: ProgressRules) -> Self {
        GameProgress {
            rules,
            objective: 0,
            stage: Stage::Collecting,
            held: 0,
            deposited: 0,
            progress: 0.0,
            game_over: false,
            last_accepted: None,
        }
    }

    pub fn rules(&self) -> &ProgressRules {
        &self.rules
    }
    pub fn objective(&self) -> usize {
        self.objective
    }
    pub fn stage(&self) -> Stage {
        self.stage
    }
    /// Items currently carried by the player.
    pub fn held(&self) -> u32 {
        self.held
    }
    /// Items deposited over the whole game.
    pub fn deposited(&self) -> u32 {
        self.deposited
    }
    /// Target playback time of the deposit target's clip.
    pub fn progress(&self) -> f32 {
        self.progress
    }
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }
    pub fn total_capacity(&self) -> u32 {
        self.rules.total_capacity()
    }
    pub fn objective_count(&self) -> usize {
        self.rules.objective_count()
    }

    pub fn phase(&self) -> GamePhase {
        match self.stage {
            Stage::Collecting => GamePhase::Collecting(self.objective),
            Stage::Depositing if self.held == 0 && self.is_last_objective() => {
                GamePhase::Finished
            }
            Stage::Depositing => GamePhase::Depositing(self.objective),
        }
    }

    pub fn destination(&self) -> Destination {
        match self.stage {
            Stage::Collecting => Destination::Objective(self.objective),
            Stage::Depositing => Destination::DepositTarget,
        }
    }

    fn is_last_objective(&self) -> bool {
        self.objective + 1 >= self.rules.objective_count()
    }

    fn capacity(&self) -> u32 {
        self.rules.capacities[self.objective]
    }

    /// Handle one frame of a pressed trigger at time `now`, `distance`
    /// units away from the current destination.
    pub fn press_trigger(&mut self, now: f32, distance: f32) -> TriggerOutcome {
        if distance >= self.rules.pickup_range {
            return TriggerOutcome::Ignored(IgnoreReason::OutOfRange);
        }
        if let Some(last) = self.last_accepted {
            if now - last < self.rules.debounce {
                return TriggerOutcome::Ignored(IgnoreReason::Debounced);
            }
        }

        let outcome = match self.stage {
            Stage::Collecting => self.collect(),
            Stage::Depositing if self.held > 0 => self.deposit(),
            Stage::Depositing if !self.is_last_objective() => {
                self.objective += 1;
                self.stage = Stage::Collecting;
                TriggerOutcome::Advanced {
                    objective: self.objective,
                }
            }
            Stage::Depositing => TriggerOutcome::Ignored(IgnoreReason::NothingToDo),
        };
        // Moving on to the next objective does not restart the window.
        if matches!(
            outcome,
            TriggerOutcome::Collected { .. } | TriggerOutcome::Deposited { .. }
        ) {
            self.last_accepted = Some(now);
        }
        outcome
    }

    fn collect(&mut self) -> TriggerOutcome {
        let capacity = self.capacity();
        self.held += 1;
        let remaining_scale = (1.0 - self.held as f32 / capacity as f32).max(MIN_OBJECTIVE_SCALE);
        let depleted = self.held >= capacity;
        if depleted {
            self.stage = Stage::Depositing;
        }
        TriggerOutcome::Collected {
            objective: self.objective,
            held: self.held,
            remaining_scale,
            depleted,
        }
    }

    fn deposit(&mut self) -> TriggerOutcome {
        self.held -= 1;
        self.deposited += 1;
        let duration = self.rules.clip_duration;
        self.progress = if self.deposited >= self.rules.total_capacity() {
            duration
        } else {
            (self.progress + self.rules.step()).min(duration)
        };
        TriggerOutcome::Deposited {
            objective: self.objective,
            held: self.held,
            progress: self.progress,
        }
    }

    /// Returns `true` the first time the clip is found at its end.
    pub fn check_completion(&mut self, clip_time: f32) -> bool {
        if self.game_over {
            return false;
        }
        if (clip_time - self.rules.clip_duration).abs() < self.rules.completion_tolerance {
            self.game_over = true;
            return true;
        }
        false
    }

    /// How far to advance the clip this frame.
    pub fn animation_step(&self, clip_time: f32, delta: f32) -> f32 {
        if clip_time < self.progress {
            delta * self.rules.playback_rate
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;
    const SPACING: f32 = 0.25;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    /// Presses the trigger `n` times inside range, spaced well past the
    /// debounce window. Returns the time after the last press.
    fn press_n(p: &mut GameProgress, start: f32, n: u32) -> f32 {
        let mut t = start;
        for _ in 0..n {
            let outcome = p.press_trigger(t, 1.0);
            assert!(outcome.is_accepted(), "press at {} ignored: {:?}", t, outcome);
            t += SPACING;
        }
        t
    }

    // ==================== COLLECTING TESTS ====================

    #[test]
    fn test_initial_state() {
        let p = GameProgress::new(ProgressRules::uniform(4, 20));
        assert_eq!(p.objective(), 0);
        assert_eq!(p.stage(), Stage::Collecting);
        assert_eq!(p.held(), 0);
        assert_eq!(p.progress(), 0.0);
        assert!(!p.is_game_over());
        assert_eq!(p.phase(), GamePhase::Collecting(0));
        assert_eq!(p.destination(), Destination::Objective(0));
        assert_eq!(p.total_capacity(), 80);
    }

    #[test]
    fn test_collect_shrinks_objective() {
        let mut p = GameProgress::new(ProgressRules::uniform(4, 20));
        match p.press_trigger(0.0, 1.0) {
            TriggerOutcome::Collected {
                objective,
                held,
                remaining_scale,
                depleted,
            } => {
                assert_eq!(objective, 0);
                assert_eq!(held, 1);
                assert!(approx_eq(remaining_scale, 0.95));
                assert!(!depleted);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_last_pickup_depletes_with_min_scale() {
        let mut p = GameProgress::new(ProgressRules::uniform(1, 2));
        p.press_trigger(0.0, 1.0);
        match p.press_trigger(1.0, 1.0) {
            TriggerOutcome::Collected {
                remaining_scale,
                depleted,
                ..
            } => {
                assert!(approx_eq(remaining_scale, MIN_OBJECTIVE_SCALE));
                assert!(depleted);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(p.stage(), Stage::Depositing);
        assert_eq!(p.destination(), Destination::DepositTarget);
    }

    #[test]
    fn test_out_of_range_press_changes_nothing() {
        let mut p = GameProgress::new(ProgressRules::uniform(4, 20));
        assert_eq!(
            p.press_trigger(0.0, 6.0),
            TriggerOutcome::Ignored(IgnoreReason::OutOfRange)
        );
        assert_eq!(
            p.press_trigger(0.0, 50.0),
            TriggerOutcome::Ignored(IgnoreReason::OutOfRange)
        );
        assert_eq!(p.held(), 0);
        assert_eq!(p.phase(), GamePhase::Collecting(0));
        // An ignored press does not start a debounce window.
        assert!(p.press_trigger(0.01, 5.9).is_accepted());
    }

    // ==================== DEBOUNCE TESTS ====================

    #[test]
    fn test_presses_inside_window_are_ignored() {
        let mut p = GameProgress::new(ProgressRules::uniform(4, 20));
        assert!(p.press_trigger(1.0, 1.0).is_accepted());
        for t in [1.0, 1.016, 1.05, 1.09] {
            assert_eq!(
                p.press_trigger(t, 1.0),
                TriggerOutcome::Ignored(IgnoreReason::Debounced)
            );
        }
        assert_eq!(p.held(), 1);
        assert!(p.press_trigger(1.2, 1.0).is_accepted());
        assert_eq!(p.held(), 2);
    }

    #[test]
    fn test_held_trigger_repeats_once_per_window() {
        let mut p = GameProgress::new(ProgressRules::uniform(4, 20));
        // One second of frames at 50 fps with the trigger held.
        for frame in 0..50 {
            p.press_trigger(frame as f32 * 0.02, 1.0);
        }
        assert!(p.held() >= 9 && p.held() <= 10, "held {}", p.held());
    }

    #[test]
    fn test_advance_keeps_the_deposit_window() {
        let mut p = GameProgress::new(ProgressRules::uniform(2, 1));
        assert!(p.press_trigger(0.0, 1.0).is_accepted());
        assert!(p.press_trigger(0.25, 1.0).is_accepted());
        assert_eq!(
            p.press_trigger(0.5, 1.0),
            TriggerOutcome::Advanced { objective: 1 }
        );
        // Still measured from the deposit at 0.25, not from the advance.
        assert!(p.press_trigger(0.5, 1.0).is_accepted());
        assert_eq!(p.phase(), GamePhase::Depositing(1));
    }

    // ==================== DEPOSITING TESTS ====================

    #[test]
    fn test_deposit_advances_progress() {
        let mut p = GameProgress::new(ProgressRules::uniform(4, 20));
        let t = press_n(&mut p, 0.0, 20);
        match p.press_trigger(t, 1.0) {
            TriggerOutcome::Deposited {
                objective,
                held,
                progress,
            } => {
                assert_eq!(objective, 0);
                assert_eq!(held, 19);
                assert!(approx_eq(progress, 3.32 / 80.0));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_empty_hands_advance_to_next_objective() {
        let mut p = GameProgress::new(ProgressRules::uniform(2, 3));
        let t = press_n(&mut p, 0.0, 6);
        assert_eq!(p.phase(), GamePhase::Depositing(0));
        assert_eq!(p.held(), 0);
        assert_eq!(
            p.press_trigger(t, 1.0),
            TriggerOutcome::Advanced { objective: 1 }
        );
        assert_eq!(p.phase(), GamePhase::Collecting(1));
    }

    #[test]
    fn test_last_objective_with_empty_hands_is_finished() {
        let mut p = GameProgress::new(ProgressRules::uniform(1, 2));
        let t = press_n(&mut p, 0.0, 4);
        assert_eq!(p.phase(), GamePhase::Finished);
        assert_eq!(
            p.press_trigger(t, 1.0),
            TriggerOutcome::Ignored(IgnoreReason::NothingToDo)
        );
        assert_eq!(p.phase(), GamePhase::Finished);
    }

    #[test]
    fn test_uneven_capacities() {
        let rules = ProgressRules {
            capacities: vec![1, 3],
            ..ProgressRules::default()
        };
        let mut p = GameProgress::new(rules);
        let t = press_n(&mut p, 0.0, 3);
        assert_eq!(p.phase(), GamePhase::Collecting(1));
        press_n(&mut p, t, 6);
        assert_eq!(p.phase(), GamePhase::Finished);
        assert_eq!(p.deposited(), 4);
        assert_eq!(p.progress(), p.rules().clip_duration);
    }

    // ==================== FULL SEQUENCE TESTS ====================

    #[test]
    fn test_four_objectives_of_twenty() {
        let mut p = GameProgress::new(ProgressRules::uniform(4, 20));
        let mut t = 0.0;
        for i in 0..4 {
            assert_eq!(p.phase(), GamePhase::Collecting(i));
            t = press_n(&mut p, t, 20);
            assert_eq!(p.stage(), Stage::Depositing);
            assert_eq!(p.held(), 20);
            t = press_n(&mut p, t, 20);
            assert_eq!(p.held(), 0);
            if i < 3 {
                assert_eq!(p.phase(), GamePhase::Depositing(i));
                t = press_n(&mut p, t, 1);
                assert_eq!(p.phase(), GamePhase::Collecting(i + 1));
            }
        }
        assert_eq!(p.phase(), GamePhase::Finished);
        assert_eq!(p.progress(), 3.32);
        assert!(!p.is_game_over());
        assert!(p.check_completion(3.32));
        assert!(p.is_game_over());
    }

    #[test]
    fn test_invariants_hold_under_noisy_input() {
        let mut rng = fastrand::Rng::with_seed(7);
        let rules = ProgressRules::uniform(3, 5);
        let mut p = GameProgress::new(rules);
        let mut last_progress = 0.0;
        let mut last_objective = 0;
        let mut t = 0.0;
        for _ in 0..5000 {
            t += rng.f32() * 0.2;
            let distance = rng.f32() * 10.0;
            p.press_trigger(t, distance);
            assert!(p.progress() >= last_progress);
            assert!(p.progress() <= p.rules().clip_duration);
            assert!(p.objective() >= last_objective);
            assert!(p.objective() < p.objective_count());
            assert!(p.held() <= p.rules().capacities[p.objective()]);
            last_progress = p.progress();
            last_objective = p.objective();
        }
        assert_eq!(p.phase(), GamePhase::Finished);
    }

    // ==================== COMPLETION TESTS ====================

    #[test]
    fn test_completion_fires_once() {
        let mut p = GameProgress::new(ProgressRules::uniform(1, 1));
        assert!(!p.check_completion(0.0));
        assert!(!p.check_completion(3.2));
        assert!(p.check_completion(3.25));
        assert!(!p.check_completion(3.32));
        assert!(p.is_game_over());
    }

    #[test]
    fn test_animation_step_catches_up_at_half_rate() {
        let mut p = GameProgress::new(ProgressRules::uniform(1, 2));
        assert_eq!(p.animation_step(0.0, 0.016), 0.0);
        press_n(&mut p, 0.0, 3);
        assert!(approx_eq(p.progress(), 1.66));
        assert!(approx_eq(p.animation_step(0.0, 0.016), 0.008));
        assert!(approx_eq(p.animation_step(1.6, 0.1), 0.05));
        assert_eq!(p.animation_step(1.66, 0.1), 0.0);
    }

    #[test]
    fn test_huge_capacities_saturate() {
        let rules = ProgressRules {
            capacities: vec![4_000_000_000, 1_000_000_000],
            ..ProgressRules::default()
        };
        assert_eq!(rules.total_capacity(), u32::MAX);
        assert!(rules.step() > 0.0);
        let p = GameProgress::new(rules);
        assert_eq!(p.total_capacity(), u32::MAX);
    }

    #[test]
    fn test_rules_from_config() {
        let mut config = GameConfig::new();
        config.capacities = vec![2, 0, 5];
        config.pickup_range = 3.0;
        let rules = ProgressRules::from_config(&config);
        assert_eq!(rules.capacities, vec![2, 1, 5]);
        assert_eq!(rules.total_capacity(), 8);
        assert!(approx_eq(rules.pickup_range, 3.0));
    }
}
