//! Queue configuration and TOML loading
//!
//! Configuration files carry a single `[queue]` table:
//!
//! ```toml
//! [queue]
//! lock_timeout_ms = 500
//! max_message_bytes = 4096
//! ```

use crate::queue::error::{QueueError, QueueResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default bound on how long a queue operation waits for the lock
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(30);

/// Construction parameters for a [`Queue`](crate::queue::Queue)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueConfig {
    /// Longest a single lock acquisition may wait
    pub lock_timeout: Duration,
    /// Largest payload accepted by enqueue, unbounded when `None`
    pub max_message_bytes: Option<usize>,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            max_message_bytes: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    queue: QueueSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct QueueSection {
    lock_timeout_ms: Option<u64>,
    max_message_bytes: Option<usize>,
}

fn config_error(message: impl Into<String>) -> QueueError {
    QueueError::Configuration {
        message: message.into(),
    }
}

impl QueueConfig {
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    pub fn with_max_message_bytes(mut self, max_bytes: usize) -> Self {
        self.max_message_bytes = Some(max_bytes);
        self
    }

    /// Check the values a queue cannot work with
    ///
    /// A zero lock timeout is valid and turns every acquisition into a
    /// single try-lock. A zero payload cap would reject every message.
    pub fn validate(&self) -> QueueResult<()> {
        if self.max_message_bytes == Some(0) {
            return Err(config_error("max_message_bytes must be greater than 0"));
        }
        Ok(())
    }

    /// Parse a configuration from TOML text, filling gaps with defaults
    pub fn from_toml_str(contents: &str) -> QueueResult<Self> {
        let file: ConfigFile = toml::from_str(contents)
            .map_err(|e| config_error(format!("failed to parse TOML: {}", e)))?;

        let mut config = Self::default();
        if let Some(ms) = file.queue.lock_timeout_ms {
            config.lock_timeout = Duration::from_millis(ms);
        }
        config.max_message_bytes = file.queue.max_message_bytes;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file that must exist
    pub fn load(path: &Path) -> QueueResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            config_error(format!(
                "failed to read configuration file {}: {}",
                path.display(),
                e
            ))
        })?;
        let config = Self::from_toml_str(&contents).map_err(|e| match e {
            QueueError::Configuration { message } => {
                config_error(format!("{}: {}", path.display(), message))
            }
            other => other,
        })?;
        log::debug!("Loaded queue configuration from {}", path.display());
        Ok(config)
    }

    /// Location of the per-user configuration file, if the platform has one
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("smq").join("smq.toml"))
    }

    /// Load the per-user configuration file, or defaults when there is none
    pub fn load_default() -> QueueResult<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}
