//! Chaos loading
//!
//! Loading bars and spinners that fight the user, grouped into levels by
//! [`LoadingSimulator`].

pub mod bar;
pub mod simulator;
pub mod spinner;

pub use bar::LoadingBar;
pub use simulator::{LEVEL_CONFIGS, LevelConfig, LoadingSimulator, SimulatorEvent};
pub use spinner::ChaosSpinner;

use serde::Serialize;

use crate::random::RandomSource;

/// Loading task identity, unique within a simulator
pub type TaskId = u32;

/// Emitted by a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingEvent {
    /// Task reached 100%; fires exactly once per task
    Completed(TaskId),
}

/// A task on the loading level
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LoadingTask {
    Bar(LoadingBar),
    Spinner(ChaosSpinner),
}

impl LoadingTask {
    pub fn id(&self) -> TaskId {
        match self {
            LoadingTask::Bar(bar) => bar.id,
            LoadingTask::Spinner(spinner) => spinner.id,
        }
    }

    pub fn start(&mut self) {
        match self {
            LoadingTask::Bar(bar) => bar.start(),
            LoadingTask::Spinner(spinner) => spinner.start(),
        }
    }

    pub fn stop(&mut self) {
        match self {
            LoadingTask::Bar(bar) => bar.stop(),
            LoadingTask::Spinner(spinner) => spinner.stop(),
        }
    }

    pub fn is_complete(&self) -> bool {
        match self {
            LoadingTask::Bar(bar) => bar.is_complete(),
            LoadingTask::Spinner(spinner) => spinner.is_complete(),
        }
    }

    /// Percent done, capped at 100 for display
    pub fn progress(&self) -> f32 {
        match self {
            LoadingTask::Bar(bar) => bar.progress,
            LoadingTask::Spinner(spinner) => spinner.progress().min(100.0),
        }
    }

    pub fn tick<R: RandomSource>(&mut self, dt_ms: f64, rng: &mut R) -> Option<LoadingEvent> {
        match self {
            LoadingTask::Bar(bar) => bar.tick(dt_ms, rng),
            LoadingTask::Spinner(spinner) => spinner.tick(dt_ms, rng),
        }
    }

    pub fn click(&mut self) -> Option<LoadingEvent> {
        match self {
            LoadingTask::Bar(bar) => bar.click(),
            LoadingTask::Spinner(spinner) => spinner.click(),
        }
    }
}
