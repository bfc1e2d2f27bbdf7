//! Core domain types

use serde::{Deserialize, Serialize};

/// A named reference to an equalization settings file.
///
/// "Enabled" means its `Include:` line is not commented out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// File name as written after `Include:`, trimmed
    pub name: String,
    pub enabled: bool,
}

impl Profile {
    pub fn new(name: impl Into<String>, enabled: bool) -> Self {
        Self {
            name: name.into(),
            enabled,
        }
    }

    /// Case-insensitive name comparison, used for duplicate detection.
    pub fn file_name_matches(&self, other: &str) -> bool {
        self.name.to_lowercase() == other.to_lowercase()
    }
}

/// Master gain applied before any profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreampState {
    /// Gain in dB. Not range-checked here; the shell may clamp for display.
    pub gain: f64,
    pub enabled: bool,
}

impl Default for PreampState {
    fn default() -> Self {
        Self {
            gain: 0.0,
            enabled: false,
        }
    }
}
