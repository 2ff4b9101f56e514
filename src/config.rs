//! Runtime settings. Everything has a sensible default under the user's home
//! directory; environment variables override individual values so tests and
//! scripted runs can point the tool at a scratch database.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".student-records";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "students.sqlite";
/// Log folder name inside the application data directory.
const LOG_DIR_NAME: &str = "logs";
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

pub const DB_PATH_VAR: &str = "STUDENT_RECORDS_DB";
pub const LOG_DIR_VAR: &str = "STUDENT_RECORDS_LOG_DIR";
pub const LOG_LEVEL_VAR: &str = "STUDENT_RECORDS_LOG_LEVEL";
pub const BUSY_TIMEOUT_VAR: &str = "STUDENT_RECORDS_BUSY_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
    /// Upper bound on how long a statement waits for a locked database.
    pub busy_timeout: Duration,
}

impl AppConfig {
    /// Resolve the configuration from the home directory and the process
    /// environment.
    pub fn load() -> Result<Self> {
        let base_dirs =
            BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
        let data_dir = base_dirs.home_dir().join(DATA_DIR_NAME);
        Self::from_lookup(data_dir, |key| env::var(key).ok())
    }

    /// Build the configuration from an explicit data directory and a variable
    /// lookup. Split out from `load` so parsing can be tested without touching
    /// the real environment.
    pub fn from_lookup<F>(data_dir: PathBuf, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let db_path = non_empty(DB_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join(DB_FILE_NAME));
        let log_dir = non_empty(LOG_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join(LOG_DIR_NAME));
        let log_level = match non_empty(LOG_LEVEL_VAR) {
            Some(raw) => normalize_level(&raw)?.to_string(),
            None => default_log_level().to_string(),
        };
        let busy_timeout_ms = match non_empty(BUSY_TIMEOUT_VAR) {
            Some(raw) => raw.trim().parse::<u64>().with_context(|| {
                format!("{BUSY_TIMEOUT_VAR} must be a whole number of milliseconds, got `{raw}`")
            })?,
            None => DEFAULT_BUSY_TIMEOUT_MS,
        };

        Ok(Self {
            db_path,
            log_dir,
            log_level,
            busy_timeout: Duration::from_millis(busy_timeout_ms),
        })
    }
}

/// `debug` for debug builds, `info` otherwise.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn normalize_level(level: &str) -> Result<&'static str> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(anyhow!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error"
        )),
    }
}
