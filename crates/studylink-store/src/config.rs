//! Store configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Settings for opening a [`SqliteStore`](crate::SqliteStore)
///
/// # Examples
///
/// ```
/// use studylink_store::StoreConfig;
///
/// let config = StoreConfig::default();
/// assert_eq!(config.busy_timeout_ms, 5000);
/// assert!(config.wal);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Database file path (`:memory:` for a private in-memory database)
    #[serde(default = "default_path")]
    pub path: PathBuf,

    /// How long a connection waits for the write lock before failing
    /// Default: 5000 ms
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    /// Use write-ahead logging for file databases
    /// Default: true
    #[serde(default = "default_wal")]
    pub wal: bool,
}

fn default_path() -> PathBuf {
    PathBuf::from("studylink.db")
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

fn default_wal() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
            wal: default_wal(),
        }
    }
}

impl StoreConfig {
    /// Configuration for a private in-memory database
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::from(":memory:"),
            wal: false,
            ..Self::default()
        }
    }

    /// Configuration for a database file at `path`
    pub fn at<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Get the busy timeout as Duration
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    /// Whether the path names an in-memory database
    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str() == ":memory:"
    }
}
