//! Devdash configuration.
//!
//! Loaded from `$DEVDASH_CONFIG`, or `<config dir>/devdash/config.toml`.
//! Every key is optional; a missing file means defaults.

use crate::error::{DevdashError, Result};
use crate::git::commands::{ProcessRunner, DEFAULT_MAX_BUFFER, DEFAULT_TIMEOUT};
use crate::git::history::DEFAULT_MAX_COUNT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_ENV: &str = "DEVDASH_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Program used for every git invocation.
    pub git_binary: String,
    /// Number of most recent commits requested from `git log`.
    pub max_count: usize,
    /// Largest stdout accepted from a git process, in bytes.
    pub max_buffer_bytes: usize,
    /// Seconds before a git process is killed. 0 disables the timeout.
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            git_binary: "git".to_string(),
            max_count: DEFAULT_MAX_COUNT,
            max_buffer_bytes: DEFAULT_MAX_BUFFER,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl Config {
    /// Loads from `explicit`, else from [`Config::path`]. Only an explicitly
    /// named file is required to exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => match Self::path() {
                Some(path) if path.exists() => Self::load_from(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            DevdashError::ConfigError(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&contents)
            .map_err(|e| DevdashError::ConfigError(format!("{} ({})", e, path.display())))
    }

    pub fn from_toml(contents: &str) -> std::result::Result<Self, String> {
        let config: Self = toml::from_str(contents).map_err(|e| format!("invalid config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.max_count == 0 {
            return Err("max-count must be at least 1".to_string());
        }
        if self.max_buffer_bytes == 0 {
            return Err("max-buffer-bytes must be at least 1".to_string());
        }
        if self.git_binary.trim().is_empty() {
            return Err("git-binary is empty".to_string());
        }
        Ok(())
    }

    /// `$DEVDASH_CONFIG` if set, else `<config dir>/devdash/config.toml`.
    pub fn path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("devdash").join("config.toml"))
    }

    pub fn timeout(&self) -> Option<Duration> {
        match self.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn process_runner(&self) -> ProcessRunner {
        ProcessRunner::new(self.max_buffer_bytes, self.timeout())
    }
}
