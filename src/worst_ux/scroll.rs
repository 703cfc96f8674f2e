//! Scroll hijacker
//!
//! Every wheel notch is rescaled by a random speed, the direction may flip
//! without notice, and once in a while the page jumps back to the top.

use serde::Serialize;

use crate::random::RandomSource;
use crate::timer::Timeout;

/// Per-wheel-event chance of flipping the scroll direction
pub const REVERSE_CHANCE: f32 = 0.1;
/// Per-wheel-event chance of jumping back to the top
pub const JUMP_TO_TOP_CHANCE: f32 = 0.02;
/// Wheel delta multiplier range, sampled in [MIN, MAX)
pub const SPEED_MIN: f32 = 0.5;
pub const SPEED_MAX: f32 = 3.0;
/// Warning flash after a reversal or a jump
pub const WARNING_MS: f64 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScrollEvent {
    /// Direction flipped; see [`ScrollHijacker::is_reversed`]
    Reversed,
    JumpedToTop,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScrollHijacker {
    /// Current scroll offset, in [0, max_offset]
    offset: f32,
    max_offset: f32,
    reversed: bool,
    /// Multiplier applied to the last wheel event
    pub last_speed: f32,
    pub reversals: u32,
    #[serde(skip)]
    warning: Timeout,
}

impl ScrollHijacker {
    /// Hijack a container whose content overflows by `max_offset` pixels
    pub fn new(max_offset: f32) -> Self {
        Self {
            max_offset: max_offset.max(0.0),
            last_speed: 1.0,
            ..Self::default()
        }
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn max_offset(&self) -> f32 {
        self.max_offset
    }

    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    pub fn is_showing_warning(&self) -> bool {
        self.warning.is_pending()
    }

    /// Overlay text while the warning flashes
    pub fn warning_text(&self) -> &'static str {
        if self.reversed {
            "REVERSED"
        } else {
            "SCROLL HIJACKED!"
        }
    }

    /// Re-measure content and viewport heights; the offset stays in range
    pub fn set_extent(&mut self, content_height: f32, viewport_height: f32) {
        self.max_offset = (content_height - viewport_height).max(0.0);
        self.offset = self.offset.min(self.max_offset);
    }

    /// Consume one wheel event
    ///
    /// A reversal applies to the event that triggered it.
    pub fn wheel<R: RandomSource>(&mut self, delta_y: f32, rng: &mut R) -> Vec<ScrollEvent> {
        let mut events = Vec::new();

        if rng.unit() < REVERSE_CHANCE {
            self.reversed = !self.reversed;
            self.reversals += 1;
            self.warning.arm(WARNING_MS);
            log::debug!("Scroll reversed (now {})", if self.reversed { "upside down" } else { "normal" });
            events.push(ScrollEvent::Reversed);
        }

        self.last_speed = rng.range(SPEED_MIN, SPEED_MAX);
        let direction = if self.reversed { -1.0 } else { 1.0 };
        let next = self.offset + delta_y * direction * self.last_speed;
        self.offset = next.min(self.max_offset).max(0.0);

        if rng.unit() < JUMP_TO_TOP_CHANCE {
            self.offset = 0.0;
            self.warning.arm(WARNING_MS);
            log::debug!("Scroll jumped back to the top");
            events.push(ScrollEvent::JumpedToTop);
        }
        events
    }

    pub fn tick(&mut self, dt_ms: f64) {
        self.warning.advance(dt_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;
    use proptest::prelude::*;

    #[test]
    fn test_plain_scroll_is_rescaled() {
        let mut scroll = ScrollHijacker::new(1000.0);
        // No reversal, speed 0.5 + 0.2 * 2.5 = 1.0, no jump
        let mut rng = ScriptedRandom::new(vec![0.5, 0.2, 0.5]);
        assert!(scroll.wheel(100.0, &mut rng).is_empty());
        assert!((scroll.offset() - 100.0).abs() < 1e-4);
        assert!(!scroll.is_showing_warning());
    }

    #[test]
    fn test_reversal_applies_immediately() {
        let mut scroll = ScrollHijacker::new(1000.0);
        scroll.wheel(200.0, &mut ScriptedRandom::new(vec![0.5, 0.2, 0.5]));

        let events = scroll.wheel(100.0, &mut ScriptedRandom::new(vec![0.05, 0.2, 0.5]));
        assert_eq!(events, vec![ScrollEvent::Reversed]);
        assert!(scroll.is_reversed());
        assert!((scroll.offset() - 100.0).abs() < 1e-3);
        assert!(scroll.is_showing_warning());
        assert_eq!(scroll.warning_text(), "REVERSED");

        scroll.tick(WARNING_MS);
        assert!(!scroll.is_showing_warning());

        // Second flip restores the normal direction
        scroll.wheel(100.0, &mut ScriptedRandom::new(vec![0.05, 0.2, 0.5]));
        assert!(!scroll.is_reversed());
        assert_eq!(scroll.reversals, 2);
    }

    #[test]
    fn test_jump_to_top() {
        let mut scroll = ScrollHijacker::new(1000.0);
        scroll.wheel(300.0, &mut ScriptedRandom::new(vec![0.5, 0.2, 0.5]));
        let events = scroll.wheel(100.0, &mut ScriptedRandom::new(vec![0.5, 0.2, 0.01]));
        assert_eq!(events, vec![ScrollEvent::JumpedToTop]);
        assert_eq!(scroll.offset(), 0.0);
        assert!(scroll.is_showing_warning());
        assert_eq!(scroll.warning_text(), "SCROLL HIJACKED!");
    }

    #[test]
    fn test_shrinking_extent_pulls_offset_back() {
        let mut scroll = ScrollHijacker::new(1000.0);
        scroll.wheel(900.0, &mut ScriptedRandom::new(vec![0.5, 0.2, 0.5]));
        scroll.set_extent(700.0, 400.0);
        assert_eq!(scroll.max_offset(), 300.0);
        assert_eq!(scroll.offset(), 300.0);

        // Content shorter than the viewport cannot scroll at all
        scroll.set_extent(200.0, 400.0);
        assert_eq!(scroll.offset(), 0.0);
    }

    proptest! {
        #[test]
        fn prop_offset_stays_in_range(
            max in 0.0f32..5000.0,
            deltas in prop::collection::vec(-500.0f32..500.0, 1..40),
            seed in any::<u64>(),
        ) {
            let mut scroll = ScrollHijacker::new(max);
            let mut rng = crate::random::seeded(seed);
            for delta in deltas {
                scroll.wheel(delta, &mut rng);
                prop_assert!(scroll.offset() >= 0.0 && scroll.offset() <= max);
                prop_assert!(scroll.last_speed >= SPEED_MIN && scroll.last_speed <= SPEED_MAX);
            }
        }
    }
}
