//! TOML-based application configuration.
//!
//! Stores the session defaults (work/rest minutes, pomodoro count, and the
//! count-down display preference) at `~/.config/pomodori/config.toml`.
//! Values are addressed by dotted key (`timer.work_minutes`) for the CLI's
//! `config get`/`config set` commands.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, CoreError};
use crate::timer::SessionConfig;

/// Returns `~/.config/pomodori[-dev]/` based on POMODORI_ENV.
///
/// Set POMODORI_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, CoreError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("POMODORI_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("pomodori-dev")
    } else {
        base_dir.join("pomodori")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Timer defaults, overridable per run by CLI flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u64,
    #[serde(default = "default_rest_minutes")]
    pub rest_minutes: u64,
    #[serde(default = "default_pomodori")]
    pub pomodori: usize,
    /// Display the remaining time instead of the elapsed time.
    #[serde(default = "default_true")]
    pub count_down: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/pomodori/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
}

fn default_work_minutes() -> u64 {
    25
}
fn default_rest_minutes() -> u64 {
    5
}
fn default_pomodori() -> usize {
    1
}
fn default_true() -> bool {
    true
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
            rest_minutes: default_rest_minutes(),
            pomodori: default_pomodori(),
            count_down: true,
        }
    }
}

impl Config {
    pub fn path() -> Result<PathBuf, CoreError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the defaults first if no file exists.
    pub fn load() -> Result<Self, CoreError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, CoreError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg = toml::from_str(&content)
                    .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
                Ok(cfg)
            }
            // A missing file gets the defaults written; anything else
            // (permissions, a directory in the way) is a real failure.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    pub fn save(&self) -> Result<(), CoreError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), CoreError> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// The validated runtime settings these preferences describe.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            work_minutes: self.timer.work_minutes,
            rest_minutes: self.timer.rest_minutes,
            pomodori: self.timer.pomodori,
            count_down: self.timer.count_down,
        }
    }

    /// Read a value by dotted key, e.g. `timer.work_minutes`.
    pub fn get(&self, key: &str) -> Result<String, CoreError> {
        let root = serde_json::to_value(self)?;
        let value = Self::get_json_value_by_path(&root, key)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        Ok(match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// Write a value by dotted key, preserving the existing value's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut root = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut root, key, value)?;
        *self = serde_json::from_value(root)?;
        Ok(())
    }

    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value.parse::<u64>().map_err(|e| invalid(e.to_string()))?;
                        serde_json::Value::Number(n.into())
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }
}
