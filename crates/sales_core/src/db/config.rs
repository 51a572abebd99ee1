//! Connection settings for the SQLite backend.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Settings applied to every connection opened by `SqliteConnectionProvider`.
///
/// Deserializable so hosts can keep it in whatever config file they use;
/// omitted fields fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqliteConfig {
    /// Database file path.
    pub path: PathBuf,
    /// Create the file on open when it does not exist yet.
    #[serde(default = "default_create_if_missing")]
    pub create_if_missing: bool,
    /// How long a statement waits on a locked database before failing.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// Enforce `REFERENCES` constraints on this connection.
    #[serde(default = "default_foreign_keys")]
    pub foreign_keys: bool,
}

impl SqliteConfig {
    /// Creates settings for `path` with default timeout and foreign keys on.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            create_if_missing: true,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            foreign_keys: true,
        }
    }

    pub fn with_busy_timeout_ms(mut self, busy_timeout_ms: u64) -> Self {
        self.busy_timeout_ms = busy_timeout_ms;
        self
    }

    pub fn with_foreign_keys(mut self, enabled: bool) -> Self {
        self.foreign_keys = enabled;
        self
    }

    pub fn with_create_if_missing(mut self, enabled: bool) -> Self {
        self.create_if_missing = enabled;
        self
    }
}

fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

fn default_foreign_keys() -> bool {
    true
}

fn default_create_if_missing() -> bool {
    true
}
