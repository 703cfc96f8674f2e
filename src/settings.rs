//! Widget settings and preferences
//!
//! Persisted in LocalStorage; pages read their starting difficulty from here.

use serde::{Deserialize, Serialize};

use crate::consts::CAPTCHA_MAX_DIFFICULTY;
use crate::platform::ThemePort;

/// Cursor chase difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ChaseDifficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl ChaseDifficulty {
    pub const ALL: [ChaseDifficulty; 3] = [
        ChaseDifficulty::Easy,
        ChaseDifficulty::Normal,
        ChaseDifficulty::Hard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChaseDifficulty::Easy => "easy",
            ChaseDifficulty::Normal => "normal",
            ChaseDifficulty::Hard => "hard",
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            ChaseDifficulty::Easy => "Easy",
            ChaseDifficulty::Normal => "Normal",
            ChaseDifficulty::Hard => "Nightmare",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(ChaseDifficulty::Easy),
            "normal" => Some(ChaseDifficulty::Normal),
            "hard" | "nightmare" => Some(ChaseDifficulty::Hard),
            _ => None,
        }
    }

    /// Pointer distance (px) that makes a target flee
    pub fn evasion_radius(&self) -> f32 {
        match self {
            ChaseDifficulty::Easy => 60.0,
            ChaseDifficulty::Normal => 100.0,
            ChaseDifficulty::Hard => 150.0,
        }
    }
}

/// Widget preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Dark theme (pages start dark)
    pub dark_mode: bool,
    /// Cursor chase difficulty
    pub chase_difficulty: ChaseDifficulty,
    /// Starting captcha difficulty (1.0 - 3.0)
    pub captcha_difficulty: f32,
    /// Allow the battery drainer to use the vibration motor
    pub vibration: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dark_mode: true,
            chase_difficulty: ChaseDifficulty::Normal,
            captcha_difficulty: 1.0,
            vibration: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "unhinged_widgets_settings";

    /// Parse settings JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Clamp values a hand-edited store could break
    pub fn sanitize(&mut self) {
        self.captcha_difficulty = if self.captcha_difficulty.is_finite() {
            self.captcha_difficulty.max(1.0).min(CAPTCHA_MAX_DIFFICULTY)
        } else {
            1.0
        };
    }

    /// Flip the theme and push it to the host
    pub fn toggle_theme(&mut self, theme: &mut impl ThemePort) {
        self.dark_mode = !self.dark_mode;
        self.apply_theme(theme);
    }

    /// Push the current theme to the host
    pub fn apply_theme(&self, theme: &mut impl ThemePort) {
        theme.set_dark(self.dark_mode);
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring malformed settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
