//! Platform abstraction layer
//!
//! Device and document capabilities the widgets touch, as injectable ports:
//! - Theme (document `dark` class)
//! - Vibration motor
//! - Battery status
//!
//! Every capability is best-effort. Missing support degrades to a silent
//! no-op, never an error.

#[cfg(target_arch = "wasm32")]
pub mod web;

use serde::{Deserialize, Serialize};

/// Switches the host between light and dark themes
pub trait ThemePort {
    fn set_dark(&mut self, dark: bool);
}

/// Drives the vibration motor
pub trait VibrationPort {
    /// Play a pattern of alternating on/off durations (ms)
    ///
    /// Returns false when the device can't vibrate.
    fn vibrate(&mut self, pattern_ms: &[u32]) -> bool;
}

/// Battery snapshot as reported by the device
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatteryReading {
    /// Charge level, 0 - 100
    pub level_percent: u8,
    pub charging: bool,
    /// Minutes until empty, when the device can estimate it
    pub minutes_to_empty: Option<u32>,
}

impl BatteryReading {
    /// Build from raw device values (`level` 0.0 - 1.0, discharge time in seconds)
    pub fn from_raw(level: f64, charging: bool, discharging_secs: f64) -> Self {
        let level_percent = (level * 100.0).round().max(0.0).min(100.0) as u8;
        let minutes_to_empty = if discharging_secs.is_finite() && discharging_secs >= 0.0 {
            Some((discharging_secs / 60.0).round() as u32)
        } else {
            None
        };
        Self {
            level_percent,
            charging,
            minutes_to_empty,
        }
    }
}

/// Reads the battery
pub trait BatteryPort {
    /// Latest reading, `None` when unsupported or not yet known
    fn reading(&self) -> Option<BatteryReading>;
}

/// No-op host for native runs and tests
///
/// Records what the widgets asked for so tests can assert on it.
#[derive(Debug, Clone, Default)]
pub struct Headless {
    /// Last theme pushed, if any
    pub dark: Option<bool>,
    /// Whether `vibrate` reports support
    pub can_vibrate: bool,
    /// Every pattern played (only recorded when `can_vibrate`)
    pub vibrations: Vec<Vec<u32>>,
    /// Reading returned by the battery port
    pub battery: Option<BatteryReading>,
}

impl ThemePort for Headless {
    fn set_dark(&mut self, dark: bool) {
        self.dark = Some(dark);
    }
}

impl VibrationPort for Headless {
    fn vibrate(&mut self, pattern_ms: &[u32]) -> bool {
        if self.can_vibrate {
            self.vibrations.push(pattern_ms.to_vec());
        }
        self.can_vibrate
    }
}

impl BatteryPort for Headless {
    fn reading(&self) -> Option<BatteryReading> {
        self.battery
    }
}
