//! Database configuration.
//!
//! A [`DatabaseConfig`] names the database file, how it may be opened and the
//! schema to ensure on open. It can be built in code or read from JSON.

use rusqlite::OpenFlags;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sqlite::Schema;

/// Path that selects a private in-memory database.
pub const MEMORY_PATH: &str = ":memory:";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessMode {
    ReadOnly,
    ReadWrite,
    /// Read-write, creating the file if it does not exist.
    #[default]
    Create,
}

impl AccessMode {
    pub(crate) fn open_flags(self) -> OpenFlags {
        let base = OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        match self {
            AccessMode::ReadOnly => base | OpenFlags::SQLITE_OPEN_READ_ONLY,
            AccessMode::ReadWrite => base | OpenFlags::SQLITE_OPEN_READ_WRITE,
            AccessMode::Create => {
                base | OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE
            }
        }
    }
}

/// SQLite database configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file, or [`MEMORY_PATH`]
    pub db_path: String,
    #[serde(default)]
    pub access_mode: AccessMode,
    /// Tables and indexes created on open if missing
    #[serde(default)]
    pub schema: Schema,
}

impl DatabaseConfig {
    pub fn new(db_path: impl Into<String>, schema: Schema) -> Self {
        Self {
            db_path: db_path.into(),
            access_mode: AccessMode::default(),
            schema,
        }
    }

    pub fn in_memory(schema: Schema) -> Self {
        Self::new(MEMORY_PATH, schema)
    }

    pub fn with_access_mode(mut self, access_mode: AccessMode) -> Self {
        self.access_mode = access_mode;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.db_path == MEMORY_PATH
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.db_path.trim().is_empty() {
            return Err(Error::Config("db_path must not be empty".to_string()));
        }
        if self.access_mode == AccessMode::ReadOnly && !self.schema.tables.is_empty() {
            return Err(Error::Config(
                "a read-only database cannot apply a schema".to_string(),
            ));
        }
        // Renders and discards the DDL to surface definition errors early.
        self.schema.to_sql().map(|_| ())
    }
}
