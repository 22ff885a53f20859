#![forbid(unsafe_code)]

use serde::Deserialize;

/// Settings a host application can embed in its own configuration.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// File created inside the storage directory.
    pub db_file_name: String,
    pub busy_timeout_ms: u64,
    /// Serve `list_*` reads from per-schedule snapshots between mutations.
    pub cache_enabled: bool,
    /// Name given to the schedule created lazily for a project.
    pub default_schedule_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_file_name: "wbs_schedule.db".to_string(),
            busy_timeout_ms: 5_000,
            cache_enabled: true,
            default_schedule_name: "Main Schedule".to_string(),
        }
    }
}

impl StoreConfig {
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    pub fn with_default_schedule_name(mut self, name: impl Into<String>) -> Self {
        self.default_schedule_name = name.into();
        self
    }
}
