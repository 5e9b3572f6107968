//! Runtime configuration for hosts embedding the core.
//!
//! # Responsibility
//! - Resolve the notes folder once at startup.
//! - Carry notification cadence, texts and log level with sane defaults.
//!
//! # Invariants
//! - A validated config always has a non-zero notification interval.
//! - Missing JSON fields fall back to defaults, unknown fields are rejected.

use crate::logging::{default_log_level, normalize_level};
use crate::model::category::Category;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

const NOTES_DIR_ENV: &str = "SEISEN_NOTES_DIR";
const NOTIFY_INTERVAL_ENV: &str = "SEISEN_NOTIFY_INTERVAL_SECS";
const LOG_LEVEL_ENV: &str = "SEISEN_LOG_LEVEL";
const NOTES_FOLDER_NAME: &str = "Seisen";
const DEFAULT_NOTIFICATION_INTERVAL_SECS: u64 = 3600;

/// Placeholder shown before the first note is selected.
pub const LOADING_PLACEHOLDER: &str = "Chargement…";
/// Title of every periodic notification unless configured otherwise.
pub const DEFAULT_NOTIFICATION_TITLE: &str = "🧘 Message du Sensei";
/// Text shown when a category has no notes or cannot be read.
pub const DEFAULT_EMPTY_FALLBACK: &str = "Aucune note disponible";

/// Configuration load/validation errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Config file is not valid JSON for this schema.
    Parse(serde_json::Error),
    /// A field holds an unusable value.
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config json: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Host-facing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeisenConfig {
    /// Folder holding one `<category>.txt` file per category.
    pub notes_dir: PathBuf,
    /// Seconds between two periodic notifications.
    pub notification_interval_secs: u64,
    pub notification_title: String,
    /// Category loaded by `initialize`.
    pub default_category: Category,
    /// Display text used when no note can be selected.
    pub empty_fallback: String,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
}

impl Default for SeisenConfig {
    fn default() -> Self {
        Self {
            notes_dir: default_notes_dir(|key| std::env::var(key).ok()),
            notification_interval_secs: DEFAULT_NOTIFICATION_INTERVAL_SECS,
            notification_title: DEFAULT_NOTIFICATION_TITLE.to_string(),
            default_category: Category::DEFAULT,
            empty_fallback: DEFAULT_EMPTY_FALLBACK.to_string(),
            log_level: default_log_level().to_string(),
        }
    }
}

impl SeisenConfig {
    /// Loads a JSON config file and validates it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Parses and validates a JSON config document.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Builds a config from defaults overridden by `SEISEN_*` variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`SeisenConfig::from_env`] with an explicit variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self {
            notes_dir: default_notes_dir(&lookup),
            ..Self::default()
        };

        if let Some(raw) = non_empty(lookup(NOTIFY_INTERVAL_ENV)) {
            config.notification_interval_secs = raw.parse::<u64>().map_err(|err| {
                ConfigError::Invalid(format!("{NOTIFY_INTERVAL_ENV}=`{raw}` is not a number: {err}"))
            })?;
        }
        if let Some(level) = non_empty(lookup(LOG_LEVEL_ENV)) {
            config.log_level = level;
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks field-level constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.notification_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "notification_interval_secs must be greater than zero".to_string(),
            ));
        }
        if self.notes_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("notes_dir cannot be empty".to_string()));
        }
        if self.empty_fallback.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "empty_fallback cannot be blank".to_string(),
            ));
        }
        normalize_level(&self.log_level).map_err(ConfigError::Invalid)?;
        Ok(())
    }

    pub fn notification_interval(&self) -> Duration {
        Duration::from_secs(self.notification_interval_secs)
    }
}

/// Resolves the notes folder: explicit override, then the per-user
/// application data location, then the temp dir.
fn default_notes_dir(lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
    if let Some(dir) = non_empty(lookup(NOTES_DIR_ENV)) {
        return PathBuf::from(dir);
    }
    match non_empty(lookup("HOME")) {
        Some(home) if cfg!(target_os = "macos") => PathBuf::from(home)
            .join("Library/Mobile Documents/com~apple~CloudDocs")
            .join(NOTES_FOLDER_NAME),
        Some(home) => PathBuf::from(home).join(".local/share/seisen"),
        None => std::env::temp_dir().join("seisen"),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}
