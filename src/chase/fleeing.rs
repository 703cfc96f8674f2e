//! The "worst UX" submit button that teleports away on hover
//!
//! Unlike [`super::evasion`], it ignores where the pointer is: every hover
//! throws it to a random spot, and each hover makes it jumpier.

use glam::Vec2;
use serde::Serialize;

use crate::random::RandomSource;

/// Button footprint used for bounds
pub const FLEEING_FOOTPRINT: Vec2 = Vec2::new(150.0, 50.0);
/// Flee speed gained per hover, and its ceiling
pub const FLEE_SPEED_STEP: f32 = 0.2;
pub const FLEE_SPEED_MAX: f32 = 3.0;

pub const FLEEING_TAUNTS: [&str; 8] = [
    "Too slow!",
    "Catch me!",
    "Nope!",
    "Try again!",
    "Almost!",
    "Haha!",
    "So close!",
    "Give up?",
];

#[derive(Debug, Clone, Serialize)]
pub struct FleeingButton {
    pub pos: Vec2,
    pub flee_speed: f32,
    /// Current label; starts as the caller's label
    pub label: String,
    pub clicks: u32,
}

impl FleeingButton {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            pos: Vec2::ZERO,
            flee_speed: 1.0,
            label: label.into(),
            clicks: 0,
        }
    }

    /// Pointer entered the button
    pub fn on_pointer_enter<R: RandomSource>(&mut self, container: Vec2, rng: &mut R) {
        let max = container - FLEEING_FOOTPRINT;
        // Speed scales the jump past the container, then the clamp pins it
        let x = rng.unit() * max.x * self.flee_speed;
        let y = rng.unit() * max.y * self.flee_speed;
        self.pos = Vec2::new(x.min(max.x).max(0.0), y.min(max.y).max(0.0));

        self.flee_speed = (self.flee_speed + FLEE_SPEED_STEP).min(FLEE_SPEED_MAX);

        if rng.unit() > 0.5 {
            self.label = rng.pick(&FLEEING_TAUNTS).to_string();
        }
    }

    /// Somebody actually clicked it
    pub fn click(&mut self) {
        self.clicks += 1;
        self.label = "HOW?!".to_string();
        log::info!("Fleeing button clicked ({} total)", self.clicks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;

    #[test]
    fn test_hover_stays_in_bounds_and_speeds_up() {
        let mut button = FleeingButton::new("Submit");
        let container = Vec2::new(600.0, 128.0);
        let mut rng = ScriptedRandom::constant(0.99);
        for _ in 0..20 {
            button.on_pointer_enter(container, &mut rng);
            assert!(button.pos.x >= 0.0 && button.pos.x <= 450.0);
            assert!(button.pos.y >= 0.0 && button.pos.y <= 78.0);
        }
        assert_eq!(button.flee_speed, FLEE_SPEED_MAX);
    }

    #[test]
    fn test_low_roll_keeps_label() {
        let mut button = FleeingButton::new("Submit");
        let mut rng = ScriptedRandom::constant(0.2);
        button.on_pointer_enter(Vec2::new(600.0, 128.0), &mut rng);
        assert_eq!(button.label, "Submit");
        assert!((button.flee_speed - 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_click_always_registers() {
        let mut button = FleeingButton::new("Submit");
        button.click();
        assert_eq!(button.label, "HOW?!");
        assert_eq!(button.clicks, 1);
    }
}
