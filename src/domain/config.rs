//! Store configuration
//!
//! Where the Equalizer APO config lives and how hard to try when another
//! process holds it locked.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Equalizer APO's stock install location.
pub const DEFAULT_CONFIG_FOLDER: &str = "C:/Program Files/EqualizerAPO/config";

/// Name of the control file inside the config folder.
pub const CONFIG_FILE_NAME: &str = "config.txt";

/// Environment variable overriding [`DEFAULT_CONFIG_FOLDER`].
pub const CONFIG_DIR_ENV: &str = "EQAPO_CONFIG_DIR";

fn default_max_attempts() -> u32 {
    5
}

fn default_delay_ms() -> u64 {
    20
}

fn default_config_folder() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FOLDER)
}

/// Bounded retry for opening the config for writing.
///
/// The audio engine re-reads config.txt whenever it changes, so a write can
/// briefly collide with its sharing lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total open attempts, including the first. 0 behaves like 1.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Pause between attempts
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl RetryPolicy {
    /// Retry without sleeping. Meant for tests.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            delay_ms: 0,
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_ms: default_delay_ms(),
        }
    }
}

/// Settings a [`ConfigStore`](crate::store::ConfigStore) is built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding config.txt and the profile files
    #[serde(default = "default_config_folder")]
    pub config_folder: PathBuf,
    #[serde(default)]
    pub retry: RetryPolicy,
}

impl StoreConfig {
    pub fn new(config_folder: impl Into<PathBuf>) -> Self {
        Self {
            config_folder: config_folder.into(),
            retry: RetryPolicy::default(),
        }
    }

    /// Default settings, with the folder taken from `EQAPO_CONFIG_DIR` when set.
    pub fn from_env() -> Self {
        match std::env::var_os(CONFIG_DIR_ENV) {
            Some(dir) if !dir.is_empty() => {
                log::info!("Using config folder from {CONFIG_DIR_ENV}: {dir:?}");
                Self::new(dir)
            }
            _ => Self::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_FOLDER)
    }
}
