#![forbid(unsafe_code)]

mod cache;
mod config;
mod dependencies;
mod error;
mod events;
mod projects;
mod resources;
mod schedules;
mod snapshot;
mod support;
mod tasks;
mod types;

pub use config::StoreConfig;
pub use error::{ErrorKind, StoreError};
pub use snapshot::ScheduleSnapshot;
pub use types::*;

use cache::SnapshotCache;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;
use support::*;

/// SQLite-backed schedule engine: schedules, WBS tasks, precedence edges and resource
/// assignments of every project.
///
/// Each mutating call runs in one transaction; every invariant is checked inside it
/// before the first write, so a rejected call leaves no trace.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    storage_dir: Option<PathBuf>,
    config: StoreConfig,
    cache: SnapshotCache,
}

impl SqliteStore {
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::open_with(storage_dir, StoreConfig::default())
    }

    pub fn open_with(storage_dir: impl AsRef<Path>, config: StoreConfig) -> Result<Self, StoreError> {
        let storage_dir = storage_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&storage_dir)?;

        let db_path = storage_dir.join(&config.db_file_name);
        let conn = Connection::open(&db_path)?;
        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        tracing::debug!(path = %db_path.display(), "opening schedule store");

        Self::init(conn, Some(storage_dir), config)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::open_in_memory_with(StoreConfig::default())
    }

    pub fn open_in_memory_with(config: StoreConfig) -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn, None, config)
    }

    fn init(
        conn: Connection,
        storage_dir: Option<PathBuf>,
        config: StoreConfig,
    ) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        install_schema(&conn)?;
        let cache = SnapshotCache::new(config.cache_enabled);
        Ok(Self {
            conn,
            storage_dir,
            config,
            cache,
        })
    }

    pub fn storage_dir(&self) -> Option<&Path> {
        self.storage_dir.as_deref()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Number of schedules currently held in the read cache.
    pub fn cached_schedules(&self) -> usize {
        self.cache.len()
    }
}

fn log_rejected(operation: &'static str, err: &StoreError) {
    tracing::warn!(operation, code = err.code(), error = %err, "mutation rejected");
}

fn to_sqlite_i64(value: usize) -> Result<i64, StoreError> {
    i64::try_from(value).map_err(|_| StoreError::InvalidInput("numeric overflow"))
}
