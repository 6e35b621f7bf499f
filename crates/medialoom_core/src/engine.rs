//! Configured storage engine instances.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A configured, persisted instantiation of a storage engine type.
///
/// `data` is the engine-specific configuration object. Its shape is owned by
/// the engine type; the core only reads and writes it as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct EngineInstance {
    /// Primary key
    id: i32,
    /// Engine type tag, e.g. `local_files`
    engine_type: String,
    /// Unique display name
    display_name: String,
    /// Whether the engine takes part in ingest
    enabled: bool,
    /// Creation time
    created_on: DateTime<Utc>,
    /// Last modification time
    modified_on: DateTime<Utc>,
    /// Engine-specific configuration
    data: serde_json::Value,
}

impl EngineInstance {
    /// Create an enabled instance.
    pub fn new(
        id: i32,
        engine_type: impl Into<String>,
        display_name: impl Into<String>,
        data: serde_json::Value,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            engine_type: engine_type.into(),
            display_name: display_name.into(),
            enabled: true,
            created_on: now,
            modified_on: now,
            data,
        }
    }

    /// Rebuild an instance from stored columns.
    pub fn from_parts(
        id: i32,
        engine_type: String,
        display_name: String,
        enabled: bool,
        created_on: DateTime<Utc>,
        modified_on: DateTime<Utc>,
        data: serde_json::Value,
    ) -> Self {
        Self {
            id,
            engine_type,
            display_name,
            enabled,
            created_on,
            modified_on,
            data,
        }
    }

    /// Copy of this instance with a different enabled flag.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Read a string setting from `data`.
    pub fn data_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(serde_json::Value::as_str)
    }
}
