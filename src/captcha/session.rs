//! Captcha dispatcher session
//!
//! One session per unlock attempt: picks a challenge, checks answers, runs
//! the countdown and reports success or failure exactly once.

use serde::Serialize;

use super::challenge::{Answer, CaptchaKind, Challenge, generate};
use crate::consts::{CAPTCHA_BASE_SECS, CAPTCHA_MAX_ATTEMPTS, CAPTCHA_SECS_PER_DIFFICULTY};
use crate::random::RandomSource;

/// Terminal outcome of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CaptchaEvent {
    Succeeded,
    Failed(FailReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailReason {
    OutOfAttempts,
    TimedOut,
}

/// Countdown length for a difficulty: 30s - 5s per level
pub fn countdown_secs(difficulty: f32) -> u32 {
    (CAPTCHA_BASE_SECS - CAPTCHA_SECS_PER_DIFFICULTY * difficulty).max(0.0).round() as u32
}

#[derive(Debug, Clone, Serialize)]
pub struct CaptchaSession {
    pub difficulty: f32,
    pub kind: CaptchaKind,
    pub challenge: Challenge,
    /// Wrong answers so far
    pub attempts: u32,
    /// Whole seconds left, derived from the elapsed time
    pub time_left: u32,
    outcome: Option<CaptchaEvent>,
    /// Time spent on the current challenge (uncapped)
    #[serde(skip)]
    elapsed_ms: f64,
    #[serde(skip)]
    counting: bool,
}

impl CaptchaSession {
    /// Open a session with a fresh challenge; the countdown starts immediately
    pub fn new<R: RandomSource>(difficulty: f32, rng: &mut R) -> Self {
        let kind = CaptchaKind::choose(difficulty, rng);
        let session = Self {
            difficulty,
            kind,
            challenge: generate(kind, difficulty, rng),
            attempts: 0,
            time_left: countdown_secs(difficulty),
            outcome: None,
            elapsed_ms: 0.0,
            counting: true,
        };
        log::debug!("Captcha opened: {:?} at difficulty {:.1}", session.kind, difficulty);
        session
    }

    pub fn outcome(&self) -> Option<CaptchaEvent> {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn is_counting(&self) -> bool {
        self.counting
    }

    /// Countdown length in milliseconds
    pub fn deadline_ms(&self) -> f64 {
        f64::from(countdown_secs(self.difficulty)) * 1000.0
    }

    pub fn attempts_left(&self) -> u32 {
        CAPTCHA_MAX_ATTEMPTS.saturating_sub(self.attempts)
    }

    /// Swap in a new challenge (also what the refresh button does)
    ///
    /// Attempts carry over; the countdown restarts.
    pub fn regenerate<R: RandomSource>(&mut self, rng: &mut R) {
        if self.is_finished() {
            return;
        }
        self.kind = CaptchaKind::choose(self.difficulty, rng);
        self.challenge = generate(self.kind, self.difficulty, rng);
        self.time_left = countdown_secs(self.difficulty);
        self.elapsed_ms = 0.0;
        log::debug!("Captcha regenerated: {:?}", self.kind);
    }

    /// Check an answer; wrong answers below the limit get a new challenge
    pub fn submit<R: RandomSource>(&mut self, answer: &Answer, rng: &mut R) -> Option<CaptchaEvent> {
        if self.is_finished() {
            return None;
        }
        if self.challenge.accepts(answer) {
            return self.finish(CaptchaEvent::Succeeded);
        }

        self.attempts += 1;
        if self.attempts >= CAPTCHA_MAX_ATTEMPTS {
            return self.finish(CaptchaEvent::Failed(FailReason::OutOfAttempts));
        }
        self.regenerate(rng);
        None
    }

    /// Advance the countdown
    pub fn tick(&mut self, dt_ms: f64) -> Option<CaptchaEvent> {
        if self.is_finished() || !self.counting || dt_ms <= 0.0 {
            return None;
        }
        self.elapsed_ms += dt_ms;
        let whole_secs = (self.elapsed_ms / 1000.0).floor() as u32;
        self.time_left = countdown_secs(self.difficulty).saturating_sub(whole_secs);
        if self.elapsed_ms >= self.deadline_ms() {
            self.time_left = 0;
            return self.finish(CaptchaEvent::Failed(FailReason::TimedOut));
        }
        None
    }

    /// Tear down without an outcome (overlay dismissed)
    pub fn close(&mut self) {
        self.counting = false;
    }

    fn finish(&mut self, event: CaptchaEvent) -> Option<CaptchaEvent> {
        self.outcome = Some(event);
        self.counting = false;
        log::debug!("Captcha finished: {:?} after {} wrong answers", event, self.attempts);
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{ScriptedRandom, seeded};

    fn wrong() -> Answer {
        // Wrong for every kind except the emotion grid, which wants cells
        Answer::text("definitely wrong")
    }

    #[test]
    fn test_countdown_by_difficulty() {
        assert_eq!(countdown_secs(1.0), 25);
        assert_eq!(countdown_secs(3.0), 15);
        assert_eq!(countdown_secs(1.2), 24);
        assert_eq!(countdown_secs(7.0), 0);
    }

    #[test]
    fn test_correct_answer_succeeds_once() {
        // 0.0 picks distorted text "Wq7Kp2"
        let mut rng = ScriptedRandom::constant(0.0);
        let mut session = CaptchaSession::new(1.0, &mut rng);
        assert_eq!(session.kind, CaptchaKind::DistortedText);
        assert_eq!(session.submit(&Answer::text("wq7kp2"), &mut rng), Some(CaptchaEvent::Succeeded));
        assert_eq!(session.submit(&Answer::text("wq7kp2"), &mut rng), None);
        assert_eq!(session.tick(60_000.0), None);
    }

    #[test]
    fn test_three_wrong_answers_fail_once() {
        let mut rng = seeded(77);
        let mut session = CaptchaSession::new(1.0, &mut rng);
        let mut events = Vec::new();
        for _ in 0..3 {
            if let Some(e) = session.submit(&wrong(), &mut rng) {
                events.push(e);
            }
        }
        assert_eq!(events, vec![CaptchaEvent::Failed(FailReason::OutOfAttempts)]);

        // No further challenge after the terminal outcome
        let before = session.challenge.clone();
        assert_eq!(session.submit(&wrong(), &mut rng), None);
        session.regenerate(&mut rng);
        assert_eq!(session.challenge, before);
        assert_eq!(session.attempts, 3);
    }

    #[test]
    fn test_wrong_answer_regenerates_and_restarts_countdown() {
        let mut rng = ScriptedRandom::constant(0.0);
        let mut session = CaptchaSession::new(1.0, &mut rng);
        session.tick(8_000.0);
        assert_eq!(session.time_left, 17);
        assert_eq!(session.submit(&wrong(), &mut rng), None);
        assert_eq!(session.attempts, 1);
        assert_eq!(session.attempts_left(), 2);
        assert_eq!(session.time_left, 25);
    }

    #[test]
    fn test_single_long_tick_past_deadline_fails() {
        let mut rng = ScriptedRandom::constant(0.0);
        let mut session = CaptchaSession::new(1.0, &mut rng);
        assert_eq!(session.tick(30_000.0), Some(CaptchaEvent::Failed(FailReason::TimedOut)));
        assert_eq!(session.time_left, 0);
        assert!(!session.is_counting());
    }

    #[test]
    fn test_closed_session_stops_counting() {
        let mut rng = ScriptedRandom::constant(0.0);
        let mut session = CaptchaSession::new(1.0, &mut rng);
        session.tick(3_000.0);
        session.close();
        assert_eq!(session.tick(60_000.0), None);
        assert_eq!(session.time_left, 22);
        assert_eq!(session.outcome(), None);
    }

    #[test]
    fn test_countdown_expiry_fails() {
        let mut rng = ScriptedRandom::constant(0.0);
        let mut session = CaptchaSession::new(3.0, &mut rng);
        let mut events = Vec::new();
        for _ in 0..200 {
            if let Some(e) = session.tick(100.0) {
                events.push(e);
            }
        }
        assert_eq!(events, vec![CaptchaEvent::Failed(FailReason::TimedOut)]);
        assert_eq!(session.time_left, 0);
    }
}
