//! Evasive target entity

use glam::Vec2;
use serde::Serialize;

use crate::consts::{SHAKE_MS, TAUNT_THRESHOLD};
use crate::random::RandomSource;
use crate::timer::Timeout;

/// Target identity, unique within an arena
pub type TargetId = u32;

/// Phrases a fleeing target may switch to
pub const TAUNTS: [&str; 10] = [
    "Too slow!",
    "Almost!",
    "Nope!",
    "Try again!",
    "Catch me!",
    "Missed!",
    "So close!",
    "Haha!",
    "Not today!",
    "Keep trying!",
];

pub const INITIAL_TAUNT: &str = "Click me!";
pub const CAUGHT_TAUNT: &str = "IMPOSSIBLE!";

/// Size class (determines footprint)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SizeClass {
    #[default]
    Normal,
    Small,
    Tiny,
}

impl SizeClass {
    /// Width x height in pixels
    pub fn footprint(&self) -> Vec2 {
        match self {
            SizeClass::Normal => Vec2::new(150.0, 56.0),
            SizeClass::Small => Vec2::new(100.0, 36.0),
            SizeClass::Tiny => Vec2::new(60.0, 24.0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SizeClass::Normal => "normal",
            SizeClass::Small => "small",
            SizeClass::Tiny => "tiny",
        }
    }
}

/// Non-terminal target phases
///
/// Caught and split are terminal: the arena removes the target instead of
/// representing them as a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TargetPhase {
    #[default]
    Idle,
    /// Just evaded; shaking until the shake timer runs out
    Fleeing,
}

/// A target on screen
#[derive(Debug, Clone, Serialize)]
pub struct EvasiveTarget {
    pub id: TargetId,
    /// Top-left corner, container-relative
    pub pos: Vec2,
    pub size: SizeClass,
    pub evasion_count: u32,
    pub taunt: &'static str,
    pub phase: TargetPhase,
    #[serde(skip)]
    shake: Timeout,
}

impl EvasiveTarget {
    pub fn new(id: TargetId, pos: Vec2, size: SizeClass) -> Self {
        Self {
            id,
            pos,
            size,
            evasion_count: 0,
            taunt: INITIAL_TAUNT,
            phase: TargetPhase::Idle,
            shake: Timeout::default(),
        }
    }

    pub fn footprint(&self) -> Vec2 {
        self.size.footprint()
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.footprint() / 2.0
    }

    /// Hit-test a container-relative point against the footprint
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.pos + self.footprint();
        point.x >= self.pos.x && point.x <= max.x && point.y >= self.pos.y && point.y <= max.y
    }

    /// Move to an evasion destination and start fleeing
    pub fn flee_to<R: RandomSource>(&mut self, pos: Vec2, rng: &mut R) {
        self.pos = pos;
        self.evasion_count += 1;
        if rng.unit() > TAUNT_THRESHOLD {
            self.taunt = *rng.pick(&TAUNTS);
        }
        self.phase = TargetPhase::Fleeing;
        self.shake.arm(SHAKE_MS);
    }

    /// Advance the shake timer; settles back to idle when it runs out
    pub fn update(&mut self, dt_ms: f64) {
        if self.shake.advance(dt_ms) {
            self.phase = TargetPhase::Idle;
        }
    }

    pub fn is_shaking(&self) -> bool {
        self.phase == TargetPhase::Fleeing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;

    #[test]
    fn test_center_uses_footprint() {
        let t = EvasiveTarget::new(1, Vec2::new(200.0, 200.0), SizeClass::Normal);
        assert_eq!(t.center(), Vec2::new(275.0, 228.0));
        let s = EvasiveTarget::new(2, Vec2::ZERO, SizeClass::Small);
        assert_eq!(s.center(), Vec2::new(50.0, 18.0));
    }

    #[test]
    fn test_contains() {
        let t = EvasiveTarget::new(1, Vec2::new(10.0, 10.0), SizeClass::Tiny);
        assert!(t.contains(Vec2::new(40.0, 20.0)));
        assert!(!t.contains(Vec2::new(71.0, 20.0)));
        assert!(!t.contains(Vec2::new(40.0, 5.0)));
    }

    #[test]
    fn test_flee_to_counts_and_shakes() {
        let mut t = EvasiveTarget::new(1, Vec2::ZERO, SizeClass::Normal);
        let mut rng = ScriptedRandom::constant(0.1);
        t.flee_to(Vec2::new(50.0, 60.0), &mut rng);
        assert_eq!(t.pos, Vec2::new(50.0, 60.0));
        assert_eq!(t.evasion_count, 1);
        assert_eq!(t.phase, TargetPhase::Fleeing);
        // Roll of 0.1 keeps the taunt
        assert_eq!(t.taunt, INITIAL_TAUNT);

        t.update(50.0);
        assert!(t.is_shaking());
        t.update(60.0);
        assert_eq!(t.phase, TargetPhase::Idle);
    }

    #[test]
    fn test_flee_to_changes_taunt_on_high_roll() {
        let mut t = EvasiveTarget::new(1, Vec2::ZERO, SizeClass::Normal);
        // 0.9 > 0.7 triggers a change, then 0.0 picks the first taunt
        let mut rng = ScriptedRandom::new(vec![0.9, 0.0]);
        t.flee_to(Vec2::ZERO, &mut rng);
        assert_eq!(t.taunt, TAUNTS[0]);
    }

    #[test]
    fn test_snapshot_omits_shake_timer() {
        let mut t = EvasiveTarget::new(4, Vec2::ZERO, SizeClass::Small);
        t.flee_to(Vec2::new(50.0, 60.0), &mut ScriptedRandom::constant(0.1));
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["id"], 4);
        assert_eq!(json["pos"], serde_json::json!([50.0, 60.0]));
        assert_eq!(json["size"], "Small");
        assert_eq!(json["phase"], "Fleeing");
        assert_eq!(json["taunt"], INITIAL_TAUNT);
        assert!(json.get("shake").is_none());
    }
}
