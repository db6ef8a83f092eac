//! Settings persistence using TOML
//!
//! Stores settings in ~/.config/tetrs/settings.toml (or platform equivalent)

use crate::game::SPAWN_DELAY_FRAMES;
use crate::input::{DEFAULT_ARR_FRAMES, DEFAULT_DAS_FRAMES};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

/// Core settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Auto-repeat timing
    pub input: InputSettings,
    /// Spawn timing
    pub timing: TimingSettings,
    /// Piece source
    pub randomizer: RandomizerSettings,
}

/// Horizontal auto-repeat, in frames
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    /// Delayed Auto Shift
    pub das_frames: u32,
    /// Auto Repeat Rate
    pub arr_frames: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    /// Frames between a lock and the next spawn
    pub spawn_delay_frames: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomizerSettings {
    /// Fixed seed for reproducible games; a fresh one is drawn when absent
    pub seed: Option<u64>,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            das_frames: DEFAULT_DAS_FRAMES,
            arr_frames: DEFAULT_ARR_FRAMES,
        }
    }
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            spawn_delay_frames: SPAWN_DELAY_FRAMES,
        }
    }
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "tetrs", "tetrs").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the settings file path
    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.toml"))
    }

    /// Parse settings; missing sections and keys take their defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse settings")
    }

    /// Load settings from file, or fall back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            return Self::default();
        };

        match fs::read_to_string(&path) {
            Ok(contents) => Self::from_toml_str(&contents).unwrap_or_else(|e| {
                warn!(path = %path.display(), "{:#}", e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save settings to file
    pub fn save(&self) -> Result<()> {
        let dir = Self::config_dir().context("Could not determine config directory")?;
        let path = dir.join("settings.toml");

        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config dir {}", dir.display()))?;

        let contents = toml::to_string_pretty(self).context("Failed to serialize settings")?;

        fs::write(&path, contents)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;

        Ok(())
    }
}
