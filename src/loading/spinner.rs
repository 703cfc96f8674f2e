//! Chaos spinner
//!
//! Counts rotations toward a target that grows with difficulty. Spins can
//! flip direction, get stuck, and change speed; clicks add decaying power.

use serde::Serialize;

use super::{LoadingEvent, TaskId};
use crate::consts::{CHAOS_TICK_MS, SPINNER_TICK_MS};
use crate::random::RandomSource;
use crate::timer::Interval;

pub const SPINNER_MESSAGES: [&str; 10] = [
    "Spinning eternally...",
    "Calculating something important...",
    "Pretending to work...",
    "Generating random numbers...",
    "Contemplating existence...",
    "Buffering the buffer buffer...",
    "Waiting for the heat death of the universe...",
    "Spinning to win...",
    "Round and round we go...",
    "This is fine. Everything is fine.",
];

pub const CLICK_POWER_STEP: f32 = 0.1;
pub const CLICK_POWER_MAX: f32 = 0.5;
pub const CLICK_POWER_DECAY: f32 = 0.01;

#[derive(Debug, Clone, Serialize)]
pub struct ChaosSpinner {
    pub id: TaskId,
    pub difficulty: f32,
    pub rotations: f32,
    pub target_rotations: f32,
    pub speed: f32,
    /// +1 forward, -1 backward
    pub direction: f32,
    pub stuck: bool,
    pub click_power: f32,
    pub message: &'static str,
    completed: bool,
    #[serde(skip)]
    rotation_clock: Interval,
    #[serde(skip)]
    chaos_clock: Interval,
}

impl ChaosSpinner {
    pub fn new(id: TaskId, difficulty: f32) -> Self {
        Self {
            id,
            difficulty,
            rotations: 0.0,
            target_rotations: 10.0 + difficulty * 5.0,
            speed: 1.0,
            direction: 1.0,
            stuck: false,
            click_power: 0.0,
            message: SPINNER_MESSAGES[0],
            completed: false,
            rotation_clock: Interval::new(SPINNER_TICK_MS),
            chaos_clock: Interval::new(CHAOS_TICK_MS),
        }
    }

    pub fn start(&mut self) {
        if !self.completed {
            self.rotation_clock.start();
            self.chaos_clock.start();
        }
    }

    pub fn stop(&mut self) {
        self.rotation_clock.stop();
        self.chaos_clock.stop();
    }

    pub fn is_running(&self) -> bool {
        self.rotation_clock.is_running()
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Percent of target rotations done (not capped)
    pub fn progress(&self) -> f32 {
        self.rotations / self.target_rotations * 100.0
    }

    pub fn tick<R: RandomSource>(&mut self, dt_ms: f64, rng: &mut R) -> Option<LoadingEvent> {
        for _ in 0..self.chaos_clock.advance(dt_ms) {
            self.chaos_step(rng);
        }
        let mut event = None;
        for _ in 0..self.rotation_clock.advance(dt_ms) {
            if let Some(e) = self.rotation_step() {
                event = Some(e);
            }
        }
        event
    }

    pub fn chaos_step<R: RandomSource>(&mut self, rng: &mut R) {
        if self.rotations >= self.target_rotations {
            return;
        }
        let d = self.difficulty;
        let roll = rng.unit();

        if roll < 0.02 * d {
            self.direction = -self.direction;
        }
        if roll < 0.05 {
            self.speed = 0.1 + rng.unit() * 2.0;
        }
        if roll < 0.03 * d && !self.stuck {
            self.stuck = true;
            log::debug!("Spinner {} stuck at {:.1}", self.id, self.rotations);
        }
        if roll < 0.1 {
            self.message = *rng.pick(&SPINNER_MESSAGES);
        }
    }

    pub fn rotation_step(&mut self) -> Option<LoadingEvent> {
        if self.completed {
            return None;
        }
        if !self.stuck {
            let increment = 0.1 * self.speed * self.direction + self.click_power;
            self.click_power = (self.click_power - CLICK_POWER_DECAY).max(0.0);
            self.rotations = (self.rotations + increment).max(0.0);
        }
        self.check_complete()
    }

    /// Clicking unsticks the spinner and gives it a push
    pub fn click(&mut self) -> Option<LoadingEvent> {
        if self.completed {
            return None;
        }
        self.stuck = false;
        self.click_power = (self.click_power + CLICK_POWER_STEP).min(CLICK_POWER_MAX);
        None
    }

    fn check_complete(&mut self) -> Option<LoadingEvent> {
        if self.completed || self.rotations < self.target_rotations {
            return None;
        }
        self.completed = true;
        self.stop();
        Some(LoadingEvent::Completed(self.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{ScriptedRandom, seeded};

    #[test]
    fn test_target_scales_with_difficulty() {
        assert_eq!(ChaosSpinner::new(1, 1.0).target_rotations, 15.0);
        assert_eq!(ChaosSpinner::new(1, 4.0).target_rotations, 30.0);
    }

    #[test]
    fn test_rotation_step() {
        let mut s = ChaosSpinner::new(1, 1.0);
        s.rotation_step();
        assert!((s.rotations - 0.1).abs() < 1e-6);

        s.stuck = true;
        s.rotation_step();
        assert!((s.rotations - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_backwards_floors_at_zero() {
        let mut s = ChaosSpinner::new(1, 1.0);
        s.direction = -1.0;
        for _ in 0..10 {
            s.rotation_step();
        }
        assert_eq!(s.rotations, 0.0);
    }

    #[test]
    fn test_click_unsticks_and_decays() {
        let mut s = ChaosSpinner::new(1, 1.0);
        s.stuck = true;
        for _ in 0..10 {
            s.click();
        }
        assert!(!s.stuck);
        assert_eq!(s.click_power, CLICK_POWER_MAX);
        s.rotation_step();
        assert!((s.rotations - 0.6).abs() < 1e-6);
        assert!((s.click_power - 0.49).abs() < 1e-6);
    }

    #[test]
    fn test_chaos_roll_flips_and_sticks() {
        let mut s = ChaosSpinner::new(1, 2.0);
        // 0.01 < 0.04 flips, < 0.05 re-speeds, < 0.06 sticks, < 0.1 re-messages
        let mut rng = ScriptedRandom::new(vec![0.01, 0.5, 0.0]);
        s.chaos_step(&mut rng);
        assert_eq!(s.direction, -1.0);
        assert!((s.speed - 1.1).abs() < 1e-6);
        assert!(s.stuck);
        assert_eq!(s.message, SPINNER_MESSAGES[0]);
    }

    #[test]
    fn test_completes_once() {
        let mut s = ChaosSpinner::new(9, 1.0);
        s.start();
        let mut rng = seeded(4);
        let mut completions = 0;
        for _ in 0..50_000 {
            if s.tick(50.0, &mut rng).is_some() {
                completions += 1;
            }
            if s.stuck {
                s.click();
            }
        }
        assert!(s.is_complete());
        assert_eq!(completions, 1);
        assert!(s.progress() >= 100.0);
    }
}
