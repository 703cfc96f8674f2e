//! Unhinged Widgets - novelty interactive toys as plain state machines
//!
//! Core modules:
//! - `chase`: Evasive targets that flee the pointer, split when cornered
//! - `loading`: Chaos loading bars, spinners and the level simulator
//! - `captcha`: Absurd captcha dispatcher and the paragraph gate
//! - `drain`: Battery drainer controls, vibration loop, hash-rate board
//! - `worst_ux`: Scroll hijacker and the modal hydra
//! - `platform`: Theme/vibration/battery ports (headless and browser)
//! - `random`/`timer`: Injectable randomness and explicit timer lifecycles

pub mod captcha;
pub mod chase;
pub mod drain;
pub mod loading;
pub mod platform;
pub mod random;
pub mod settings;
pub mod timer;
pub mod worst_ux;

pub use random::{RandomSource, ScriptedRandom};
pub use settings::{ChaseDifficulty, Settings};
pub use timer::{Interval, Timeout};

use glam::Vec2;

/// Widget tuning constants
pub mod consts {
    /// Maximum timer firings replayed per advance (prevents spiral of death)
    pub const MAX_CATCH_UP: u32 = 8;

    /// Extra distance a target flees beyond the evasion radius
    pub const ESCAPE_MARGIN: f32 = 50.0;
    /// Random extra flee distance, sampled in [0, ESCAPE_JITTER)
    pub const ESCAPE_JITTER: f32 = 100.0;
    /// Distance from a bound that counts as "against the wall"
    pub const CORNER_TOLERANCE: f32 = 10.0;
    /// A normal target must have evaded more than this many times to split
    pub const SPLIT_MIN_EVASIONS: u32 = 5;
    /// Horizontal offset of split children from the corner position
    pub const SPLIT_OFFSET: f32 = 50.0;
    /// Chance (as `roll > threshold`) that an evasion changes the taunt
    pub const TAUNT_THRESHOLD: f32 = 0.7;
    /// Shake duration after an evasion
    pub const SHAKE_MS: f64 = 100.0;
    /// Delay between a catch and the replacement target spawning
    pub const RESPAWN_DELAY_MS: f64 = 1000.0;
    /// Celebration overlay duration after a catch
    pub const CELEBRATION_MS: f64 = 1000.0;
    /// Initial target position
    pub const SPAWN_X: f32 = 200.0;
    pub const SPAWN_Y: f32 = 200.0;

    /// Loading bar progress tick
    pub const BAR_TICK_MS: f64 = 100.0;
    /// Chaos roll cadence for bars and spinners
    pub const CHAOS_TICK_MS: f64 = 500.0;
    /// Spinner rotation tick
    pub const SPINNER_TICK_MS: f64 = 50.0;

    /// Captcha attempts before hard failure
    pub const CAPTCHA_MAX_ATTEMPTS: u32 = 3;
    /// Base countdown, reduced by `CAPTCHA_SECS_PER_DIFFICULTY` per level
    pub const CAPTCHA_BASE_SECS: f32 = 30.0;
    pub const CAPTCHA_SECS_PER_DIFFICULTY: f32 = 5.0;
    /// Captcha difficulty ceiling
    pub const CAPTCHA_MAX_DIFFICULTY: f32 = 3.0;
    /// Difficulty gained per solved captcha
    pub const CAPTCHA_DIFFICULTY_STEP: f32 = 0.2;
    /// Reload warning shown after a failed captcha
    pub const RELOAD_WARNING_MS: f64 = 2000.0;
    /// Chance that the reload threat actually re-locks everything
    pub const RELOAD_CHANCE: f32 = 0.3;

    /// Vibration pulse pattern and repeat cadence
    pub const VIBRATION_PATTERN: [u32; 5] = [100, 50, 100, 50, 100];
    pub const VIBRATION_REPEAT_MS: f64 = 500.0;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Clamp a top-left position so a `footprint` fits inside `container`
///
/// When the container is smaller than the footprint the axis pins to 0
/// (never panics on inverted bounds).
#[inline]
pub fn clamp_into(pos: Vec2, footprint: Vec2, container: Vec2) -> Vec2 {
    let max = container - footprint;
    Vec2::new(pos.x.min(max.x).max(0.0), pos.y.min(max.y).max(0.0))
}

/// Largest valid top-left for a footprint (never negative)
#[inline]
pub fn max_origin(footprint: Vec2, container: Vec2) -> Vec2 {
    (container - footprint).max(Vec2::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_into_inside() {
        let p = clamp_into(Vec2::new(10.0, 20.0), Vec2::new(150.0, 56.0), Vec2::new(800.0, 600.0));
        assert_eq!(p, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_clamp_into_overflow() {
        let p = clamp_into(Vec2::new(-40.0, 900.0), Vec2::new(150.0, 56.0), Vec2::new(800.0, 600.0));
        assert_eq!(p, Vec2::new(0.0, 544.0));
    }

    #[test]
    fn test_clamp_into_tiny_container() {
        let p = clamp_into(Vec2::new(30.0, 30.0), Vec2::new(150.0, 56.0), Vec2::new(100.0, 40.0));
        assert_eq!(p, Vec2::ZERO);
        assert_eq!(max_origin(Vec2::new(150.0, 56.0), Vec2::new(100.0, 40.0)), Vec2::ZERO);
    }
}
