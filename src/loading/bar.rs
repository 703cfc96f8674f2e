//! Chaos loading bar
//!
//! Two independent clocks per bar: a 100ms progress tick and a 500ms chaos
//! roll that stalls, reverses, re-colours and glitches the bar.

use serde::Serialize;

use super::{LoadingEvent, TaskId};
use crate::consts::{BAR_TICK_MS, CHAOS_TICK_MS};
use crate::random::RandomSource;
use crate::timer::{Interval, Timeout};

pub const LOADING_MESSAGES: [&str; 20] = [
    "Loading...",
    "Please wait...",
    "Almost there...",
    "Reticulating splines...",
    "Convincing electrons to cooperate...",
    "Bribing the server hamsters...",
    "Defragmenting the mainframe...",
    "Downloading more RAM...",
    "Adjusting flux capacitor...",
    "Reversing the polarity...",
    "Consulting the oracle...",
    "Warming up the internet...",
    "Generating witty loading message...",
    "Loading loading bar...",
    "Preparing to prepare...",
    "Syncing syncs...",
    "Buffering buffer...",
    "Computing computations...",
    "Processing processes...",
    "Initializing initialization...",
];

pub const STALL_MESSAGES: [&str; 10] = [
    "Hmm, that's not good...",
    "The bar is shy today.",
    "Try clicking to encourage it!",
    "It needs motivation!",
    "Blow into your mic! (seriously)",
    "Shake the window!",
    "The progress is on strike.",
    "Have you tried turning it off and on?",
    "Error 418: I'm a teapot.",
    "Progress.exe has stopped responding.",
];

/// Progress at which stalls become likely
pub const NEAR_COMPLETE: f32 = 95.0;
/// Reversal only starts past this much progress
pub const REVERSE_MIN_PROGRESS: f32 = 20.0;
pub const GLITCH_MS: f64 = 500.0;

#[derive(Debug, Clone, Serialize)]
pub struct LoadingBar {
    pub id: TaskId,
    pub difficulty: f32,
    pub progress: f32,
    pub stalled: bool,
    pub speed: f32,
    /// Clicks collected toward unstalling
    pub clicks: u32,
    pub message: &'static str,
    pub stall_message: &'static str,
    /// Bar colour hue once the chaos roll has re-coloured it
    pub hue: Option<u16>,
    completed: bool,
    #[serde(skip)]
    reversing: Timeout,
    #[serde(skip)]
    glitch: Timeout,
    #[serde(skip)]
    progress_clock: Interval,
    #[serde(skip)]
    chaos_clock: Interval,
}

impl LoadingBar {
    pub fn new(id: TaskId, difficulty: f32) -> Self {
        Self {
            id,
            difficulty,
            progress: 0.0,
            stalled: false,
            speed: 1.0,
            clicks: 0,
            message: LOADING_MESSAGES[0],
            stall_message: "",
            hue: None,
            completed: false,
            reversing: Timeout::default(),
            glitch: Timeout::default(),
            progress_clock: Interval::new(BAR_TICK_MS),
            chaos_clock: Interval::new(CHAOS_TICK_MS),
        }
    }

    // === Lifecycle ===

    pub fn start(&mut self) {
        if !self.completed {
            self.progress_clock.start();
            self.chaos_clock.start();
        }
    }

    pub fn stop(&mut self) {
        self.progress_clock.stop();
        self.chaos_clock.stop();
        self.reversing.cancel();
        self.glitch.cancel();
    }

    pub fn is_running(&self) -> bool {
        self.progress_clock.is_running()
    }

    // === State ===

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn is_reversing(&self) -> bool {
        self.reversing.is_pending()
    }

    pub fn is_glitching(&self) -> bool {
        self.glitch.is_pending()
    }

    /// Clicks needed to unstall: 3 + floor(difficulty)
    pub fn clicks_to_unstall(&self) -> u32 {
        3 + self.difficulty.max(0.0).floor() as u32
    }

    // === Steps ===

    /// Advance both clocks by `dt_ms`
    pub fn tick<R: RandomSource>(&mut self, dt_ms: f64, rng: &mut R) -> Option<LoadingEvent> {
        self.reversing.advance(dt_ms);
        self.glitch.advance(dt_ms);

        for _ in 0..self.chaos_clock.advance(dt_ms) {
            self.chaos_step(rng);
        }
        let mut event = None;
        for _ in 0..self.progress_clock.advance(dt_ms) {
            if let Some(e) = self.progress_step(rng) {
                event = Some(e);
            }
        }
        event
    }

    /// One chaos roll
    pub fn chaos_step<R: RandomSource>(&mut self, rng: &mut R) {
        if self.progress >= 100.0 {
            return;
        }
        let d = self.difficulty;
        let roll = rng.unit();

        if self.progress >= NEAR_COMPLETE && roll < 0.3 * d {
            self.stall(rng);
            return;
        }
        if roll < 0.05 * d && !self.stalled {
            self.stall(rng);
        }
        if roll < 0.03 * d && !self.is_reversing() && self.progress > REVERSE_MIN_PROGRESS {
            let duration = 2000.0 + rng.unit() as f64 * 3000.0;
            self.reversing.arm(duration);
            log::debug!("Bar {} reversing for {:.0}ms", self.id, duration);
        }
        if roll < 0.02 {
            self.hue = Some((rng.unit() * 360.0) as u16);
        }
        if roll < 0.01 {
            self.glitch.arm(GLITCH_MS);
        }
        if roll < 0.05 {
            self.speed = 0.2 + rng.unit() * 2.0;
        }
    }

    /// One progress tick
    pub fn progress_step<R: RandomSource>(&mut self, rng: &mut R) -> Option<LoadingEvent> {
        if self.completed {
            return None;
        }
        if !self.stalled {
            let change = if self.is_reversing() {
                -0.5 * self.speed
            } else {
                (0.1 + rng.unit() * 0.5) * self.speed
            };
            self.progress = (self.progress + change).max(0.0).min(100.0);

            if rng.unit() < 0.05 {
                self.message = *rng.pick(&LOADING_MESSAGES);
            }
        }
        self.check_complete()
    }

    /// User clicked the bar
    pub fn click(&mut self) -> Option<LoadingEvent> {
        if self.completed {
            return None;
        }
        if self.stalled {
            self.clicks += 1;
            if self.clicks >= self.clicks_to_unstall() {
                self.stalled = false;
                self.clicks = 0;
                self.progress = (self.progress + 1.0).min(100.0);
                log::debug!("Bar {} unstalled", self.id);
            }
        } else {
            self.progress = (self.progress + 0.5).min(100.0);
        }
        self.check_complete()
    }

    fn stall<R: RandomSource>(&mut self, rng: &mut R) {
        self.stalled = true;
        self.stall_message = *rng.pick(&STALL_MESSAGES);
        log::debug!("Bar {} stalled at {:.1}%", self.id, self.progress);
    }

    /// Latch completion; fires exactly once
    fn check_complete(&mut self) -> Option<LoadingEvent> {
        if self.completed || self.progress < 100.0 {
            return None;
        }
        self.completed = true;
        self.stop();
        Some(LoadingEvent::Completed(self.id))
    }
}
