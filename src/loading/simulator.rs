//! Loading simulator levels
//!
//! The page that owns every bar and spinner on a level, aggregates their
//! completions and tracks how frustrated the player is getting.

use rand_pcg::Pcg32;
use serde::Serialize;

use super::{ChaosSpinner, LoadingBar, LoadingEvent, LoadingTask, TaskId};
use crate::random::{RandomSource, seeded};
use crate::timer::Interval;

/// One level's lineup
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelConfig {
    pub bars: u32,
    pub spinners: u32,
    pub difficulty: f32,
    pub name: &'static str,
}

const fn level(bars: u32, spinners: u32, difficulty: f32, name: &'static str) -> LevelConfig {
    LevelConfig {
        bars,
        spinners,
        difficulty,
        name,
    }
}

pub const LEVEL_CONFIGS: [LevelConfig; 9] = [
    level(1, 0, 1.0, "Tutorial"),
    level(2, 0, 1.5, "Double Trouble"),
    level(1, 1, 2.0, "Spin to Win"),
    level(3, 0, 2.0, "Triple Threat"),
    level(2, 2, 2.5, "Chaos Mode"),
    level(0, 3, 3.0, "Spinner Hell"),
    level(4, 2, 3.0, "The Gauntlet"),
    level(3, 3, 3.5, "Maximum Suffering"),
    level(5, 5, 4.0, "BOSS LEVEL"),
];

/// Frustration scale ceiling
pub const MAX_FRUSTRATION: f32 = 100.0;
/// Frustration relieved by each completed task
pub const COMPLETION_RELIEF: f32 = 20.0;
/// Frustration gained per second of waiting
pub const FRUSTRATION_PER_SEC: f32 = 0.5;

/// Config for a 1-based level number; levels past the table reuse the last
pub fn level_config(level: u32) -> LevelConfig {
    let idx = (level.max(1) as usize - 1).min(LEVEL_CONFIGS.len() - 1);
    LEVEL_CONFIGS[idx]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatorEvent {
    ItemCompleted(TaskId),
    /// Every task on the level is done; fires once per level
    LevelComplete(u32),
}

pub struct LoadingSimulator<R = Pcg32> {
    level: u32,
    tasks: Vec<LoadingTask>,
    started: bool,
    level_complete: bool,
    bars_completed: u32,
    total_clicks: u32,
    elapsed_secs: u32,
    frustration: f32,
    next_id: TaskId,
    clock: Interval,
    rng: R,
}

impl LoadingSimulator<Pcg32> {
    pub fn new(seed: u64) -> Self {
        Self::with_rng(seeded(seed))
    }
}

impl<R: RandomSource> LoadingSimulator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            level: 1,
            tasks: Vec::new(),
            started: false,
            level_complete: false,
            bars_completed: 0,
            total_clicks: 0,
            elapsed_secs: 0,
            frustration: 0.0,
            next_id: 1,
            clock: Interval::new(1000.0),
            rng,
        }
    }

    // === Accessors ===

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn config(&self) -> LevelConfig {
        level_config(self.level)
    }

    pub fn tasks(&self) -> &[LoadingTask] {
        &self.tasks
    }

    pub fn task(&self, id: TaskId) -> Option<&LoadingTask> {
        self.tasks.iter().find(|t| t.id() == id)
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_level_complete(&self) -> bool {
        self.level_complete
    }

    /// True once the last configured level is done
    pub fn is_final_level(&self) -> bool {
        self.level as usize >= LEVEL_CONFIGS.len()
    }

    pub fn bars_completed(&self) -> u32 {
        self.bars_completed
    }

    pub fn total_clicks(&self) -> u32 {
        self.total_clicks
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub fn frustration(&self) -> f32 {
        self.frustration
    }

    // === Lifecycle ===

    /// Replace the current tasks with a fresh lineup for `level`
    pub fn start_level(&mut self, level: u32) {
        self.stop_tasks();
        self.level = level.max(1);
        let config = self.config();

        let mut tasks = Vec::with_capacity((config.bars + config.spinners) as usize);
        for _ in 0..config.bars {
            tasks.push(LoadingTask::Bar(LoadingBar::new(self.alloc_id(), config.difficulty)));
        }
        for _ in 0..config.spinners {
            tasks.push(LoadingTask::Spinner(ChaosSpinner::new(self.alloc_id(), config.difficulty)));
        }
        for task in &mut tasks {
            task.start();
        }

        self.tasks = tasks;
        self.level_complete = false;
        self.started = true;
        self.clock.start();
        log::info!(
            "Level {}: {} ({} bars, {} spinners)",
            self.level,
            config.name,
            config.bars,
            config.spinners
        );
    }

    pub fn next_level(&mut self) {
        self.start_level(self.level + 1);
    }

    /// Back to level 1, not started
    pub fn reset(&mut self) {
        self.stop_tasks();
        self.tasks.clear();
        self.level = 1;
        self.bars_completed = 0;
        self.total_clicks = 0;
        self.elapsed_secs = 0;
        self.frustration = 0.0;
        self.started = false;
        self.level_complete = false;
        self.clock.stop();
        log::info!("Loading simulator reset");
    }

    // === Input ===

    /// A click anywhere in the play area, optionally on a task
    pub fn click(&mut self, task: Option<TaskId>) -> Vec<SimulatorEvent> {
        self.total_clicks += 1;
        self.frustration = (self.frustration + 1.0).min(MAX_FRUSTRATION);

        let completed = task
            .and_then(|id| self.tasks.iter_mut().find(|t| t.id() == id))
            .and_then(|t| t.click());
        let mut events = Vec::new();
        if let Some(LoadingEvent::Completed(id)) = completed {
            self.on_task_complete(id, &mut events);
        }
        events
    }

    // === Time ===

    pub fn tick(&mut self, dt_ms: f64) -> Vec<SimulatorEvent> {
        let mut events = Vec::new();
        if !self.started || self.level_complete {
            return events;
        }

        let secs = self.clock.advance(dt_ms);
        self.elapsed_secs += secs;
        self.frustration = (self.frustration + FRUSTRATION_PER_SEC * secs as f32).min(MAX_FRUSTRATION);

        let mut completed = Vec::new();
        for task in &mut self.tasks {
            if let Some(LoadingEvent::Completed(id)) = task.tick(dt_ms, &mut self.rng) {
                completed.push(id);
            }
        }
        for id in completed {
            self.on_task_complete(id, &mut events);
        }
        events
    }

    // === Internals ===

    fn alloc_id(&mut self) -> TaskId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn stop_tasks(&mut self) {
        for task in &mut self.tasks {
            task.stop();
        }
    }

    fn on_task_complete(&mut self, id: TaskId, events: &mut Vec<SimulatorEvent>) {
        self.bars_completed += 1;
        self.frustration = (self.frustration - COMPLETION_RELIEF).max(0.0);
        events.push(SimulatorEvent::ItemCompleted(id));

        if !self.level_complete && !self.tasks.is_empty() && self.tasks.iter().all(|t| t.is_complete()) {
            self.level_complete = true;
            self.clock.stop();
            self.stop_tasks();
            events.push(SimulatorEvent::LevelComplete(self.level));
            log::info!("Level {} complete after {}s", self.level, self.elapsed_secs);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn force_complete(sim: &mut LoadingSimulator, id: TaskId) -> Vec<SimulatorEvent> {
        if let Some(LoadingTask::Bar(bar)) = sim.tasks.iter_mut().find(|t| t.id() == id) {
            bar.progress = 99.8;
            bar.stalled = false;
        }
        sim.click(Some(id))
    }

    #[test]
    fn test_level_lookup_clamps() {
        assert_eq!(level_config(1).name, "Tutorial");
        assert_eq!(level_config(0).name, "Tutorial");
        assert_eq!(level_config(9).name, "BOSS LEVEL");
        assert_eq!(level_config(42).name, "BOSS LEVEL");
    }

    #[test]
    fn test_start_level_builds_lineup() {
        let mut sim = LoadingSimulator::new(1);
        sim.start_level(3);
        let kinds: Vec<_> = sim
            .tasks()
            .iter()
            .map(|t| matches!(t, LoadingTask::Bar(_)))
            .collect();
        assert_eq!(kinds, vec![true, false]);
        assert_eq!(sim.tasks()[0].id(), 1);
        assert_eq!(sim.tasks()[1].id(), 2);

        // Ids keep increasing across levels
        sim.next_level();
        assert_eq!(sim.level(), 4);
        assert_eq!(sim.tasks().iter().map(|t| t.id()).collect::<Vec<_>>(), vec![3, 4, 5]);
    }

    #[test]
    fn test_level_completes_once_all_tasks_done() {
        let mut sim = LoadingSimulator::new(1);
        sim.start_level(2);
        let events = force_complete(&mut sim, 1);
        assert_eq!(events, vec![SimulatorEvent::ItemCompleted(1)]);
        assert!(!sim.is_level_complete());

        let events = force_complete(&mut sim, 2);
        assert_eq!(
            events,
            vec![SimulatorEvent::ItemCompleted(2), SimulatorEvent::LevelComplete(2)]
        );
        assert!(sim.is_level_complete());
        assert_eq!(sim.bars_completed(), 2);

        // Nothing else fires on a finished level
        assert!(sim.tick(10_000.0).is_empty());
        assert!(sim.click(Some(2)).is_empty());
    }

    #[test]
    fn test_frustration_tracking() {
        let mut sim = LoadingSimulator::new(1);
        sim.start_level(1);
        for _ in 0..10 {
            sim.click(None);
        }
        assert_eq!(sim.total_clicks(), 10);
        assert_eq!(sim.frustration(), 10.0);

        sim.tick(4000.0);
        assert_eq!(sim.elapsed_secs(), 4);
        assert_eq!(sim.frustration(), 12.0);

        force_complete(&mut sim, 1);
        assert_eq!(sim.frustration(), 0.0);
    }

    #[test]
    fn test_reset() {
        let mut sim = LoadingSimulator::new(1);
        sim.start_level(5);
        sim.click(None);
        sim.reset();
        assert_eq!(sim.level(), 1);
        assert!(!sim.is_started());
        assert!(sim.tasks().is_empty());
        assert_eq!(sim.total_clicks(), 0);
        assert!(sim.tick(5000.0).is_empty());
        assert_eq!(sim.elapsed_secs(), 0);
    }

    #[test]
    fn test_tutorial_plays_to_completion() {
        let mut sim = LoadingSimulator::new(2024);
        sim.start_level(1);
        let mut level_done = 0;
        for _ in 0..20_000 {
            for event in sim.tick(100.0) {
                if matches!(event, SimulatorEvent::LevelComplete(1)) {
                    level_done += 1;
                }
            }
            let stalled = matches!(sim.tasks().first(), Some(LoadingTask::Bar(bar)) if bar.stalled);
            if stalled {
                for event in sim.click(Some(1)) {
                    if matches!(event, SimulatorEvent::LevelComplete(1)) {
                        level_done += 1;
                    }
                }
            }
        }
        assert!(sim.is_level_complete());
        assert_eq!(level_done, 1);
    }
}
