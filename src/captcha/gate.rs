//! Captcha hell gate
//!
//! A page of locked paragraphs. Each one is unlocked by surviving a captcha
//! session; repeated failures can re-lock the lot.

use rand_pcg::Pcg32;
use serde::Serialize;

use super::challenge::Answer;
use super::session::{CaptchaEvent, CaptchaSession};
use crate::consts::{
    CAPTCHA_DIFFICULTY_STEP, CAPTCHA_MAX_DIFFICULTY, RELOAD_CHANCE, RELOAD_WARNING_MS,
};
use crate::random::{RandomSource, seeded};
use crate::timer::{Interval, Timeout};

pub const DEFAULT_PARAGRAPHS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GateEvent {
    Unlocked(usize),
    Failed,
    /// Every paragraph locked again
    Relocked,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GateStats {
    pub solved: u32,
    pub failed: u32,
    pub elapsed_secs: u32,
}

pub struct CaptchaGate<R = Pcg32> {
    unlocked: Vec<bool>,
    stats: GateStats,
    difficulty: f32,
    /// Difficulty restored by `reset_all`
    base_difficulty: f32,
    /// Paragraph index and the session guarding it
    active: Option<(usize, CaptchaSession)>,
    reload_warning: Timeout,
    /// Failures recorded before the one that armed the warning
    failures_before_warning: u32,
    clock: Interval,
    rng: R,
}

impl CaptchaGate<Pcg32> {
    pub fn new(seed: u64) -> Self {
        Self::with_rng(DEFAULT_PARAGRAPHS, seeded(seed))
    }
}

impl<R: RandomSource> CaptchaGate<R> {
    pub fn with_rng(paragraphs: usize, rng: R) -> Self {
        Self {
            unlocked: vec![false; paragraphs],
            stats: GateStats::default(),
            difficulty: 1.0,
            base_difficulty: 1.0,
            active: None,
            reload_warning: Timeout::default(),
            failures_before_warning: 0,
            clock: Interval::new(1000.0),
            rng,
        }
    }

    // === Lifecycle ===

    /// Start the elapsed clock; captchas can only be opened while running
    pub fn start(&mut self) {
        self.clock.start();
    }

    /// Release every timer: the elapsed clock, the open captcha and the
    /// reload warning
    pub fn stop(&mut self) {
        self.clock.stop();
        self.dismiss();
        self.reload_warning.cancel();
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    // === Accessors ===

    pub fn paragraphs(&self) -> usize {
        self.unlocked.len()
    }

    pub fn is_unlocked(&self, idx: usize) -> bool {
        self.unlocked.get(idx).copied().unwrap_or(false)
    }

    pub fn unlocked_count(&self) -> usize {
        self.unlocked.iter().filter(|u| **u).count()
    }

    pub fn is_fully_unlocked(&self) -> bool {
        self.unlocked.iter().all(|u| *u)
    }

    pub fn stats(&self) -> GateStats {
        self.stats
    }

    pub fn difficulty(&self) -> f32 {
        self.difficulty
    }

    /// Set the starting difficulty (clamped to 1 - 3)
    pub fn set_difficulty(&mut self, difficulty: f32) {
        self.base_difficulty = difficulty.max(1.0).min(CAPTCHA_MAX_DIFFICULTY);
        self.difficulty = self.base_difficulty;
    }

    pub fn active(&self) -> Option<(usize, &CaptchaSession)> {
        self.active.as_ref().map(|(idx, s)| (*idx, s))
    }

    pub fn is_showing_reload_warning(&self) -> bool {
        self.reload_warning.is_pending()
    }

    /// Open a captcha for a locked paragraph
    ///
    /// Returns false when the gate is stopped, the paragraph is already
    /// unlocked or out of range, or another captcha is open.
    pub fn request_unlock(&mut self, idx: usize) -> bool {
        if !self.is_running()
            || idx >= self.unlocked.len()
            || self.unlocked[idx]
            || self.active.is_some()
        {
            return false;
        }
        let session = CaptchaSession::new(self.difficulty, &mut self.rng);
        self.active = Some((idx, session));
        true
    }

    /// Close the open captcha without an outcome
    pub fn dismiss(&mut self) {
        if let Some((idx, mut session)) = self.active.take() {
            session.close();
            log::debug!("Captcha for paragraph {} dismissed", idx);
        }
    }

    /// Refresh the open captcha's challenge
    pub fn refresh(&mut self) {
        if let Some((_, session)) = self.active.as_mut() {
            session.regenerate(&mut self.rng);
        }
    }

    pub fn submit(&mut self, answer: &Answer) -> Option<GateEvent> {
        let (_, session) = self.active.as_mut()?;
        let event = session.submit(answer, &mut self.rng)?;
        self.settle(event)
    }

    pub fn tick(&mut self, dt_ms: f64) -> Vec<GateEvent> {
        let mut events = Vec::new();
        if !self.is_running() {
            return events;
        }
        self.stats.elapsed_secs += self.clock.advance(dt_ms);

        let expired = match self.active.as_mut() {
            Some((_, session)) => session.tick(dt_ms),
            None => None,
        };
        if let Some(event) = expired.and_then(|e| self.settle(e)) {
            events.push(event);
        }

        if self.reload_warning.advance(dt_ms) && self.roll_relock() {
            events.push(GateEvent::Relocked);
        }
        events
    }

    /// Lock everything and clear stats
    pub fn reset_all(&mut self) {
        self.dismiss();
        self.unlocked.iter_mut().for_each(|u| *u = false);
        self.stats = GateStats::default();
        self.difficulty = self.base_difficulty;
        self.reload_warning.cancel();
        self.failures_before_warning = 0;
        if self.is_running() {
            self.clock.stop();
            self.clock.start();
        }
        log::info!("Captcha gate reset");
    }

    fn settle(&mut self, event: CaptchaEvent) -> Option<GateEvent> {
        let (idx, _) = self.active.take()?;
        match event {
            CaptchaEvent::Succeeded => {
                self.unlocked[idx] = true;
                self.stats.solved += 1;
                self.difficulty = (self.difficulty + CAPTCHA_DIFFICULTY_STEP).min(CAPTCHA_MAX_DIFFICULTY);
                log::info!(
                    "Paragraph {} unlocked ({}/{})",
                    idx,
                    self.unlocked_count(),
                    self.paragraphs()
                );
                Some(GateEvent::Unlocked(idx))
            }
            CaptchaEvent::Failed(reason) => {
                self.failures_before_warning = self.stats.failed;
                self.stats.failed += 1;
                self.reload_warning.arm(RELOAD_WARNING_MS);
                log::info!("Captcha failed ({:?}), {} failures so far", reason, self.stats.failed);
                Some(GateEvent::Failed)
            }
        }
    }

    fn roll_relock(&mut self) -> bool {
        if self.failures_before_warning <= 1 || self.rng.unit() >= RELOAD_CHANCE {
            return false;
        }
        self.unlocked.iter_mut().for_each(|u| *u = false);
        log::warn!("Too many failures; every paragraph locked again");
        true
    }
}
