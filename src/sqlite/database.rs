use rusqlite::Connection;
use std::path::Path;
use tracing::debug;

use super::schema::Schema;
use super::statement::Statement;
use super::transaction::Transaction;
use crate::config::{AccessMode, DatabaseConfig, MEMORY_PATH};
use crate::error::{Error, Result};

/// An open SQLite connection.
///
/// The connection is owned for the whole lifetime of the value and closed when
/// it is dropped. Statements and transactions borrow the database, so they
/// cannot outlive it.
pub struct Database {
    connection: Connection,
    path: String,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").field("path", &self.path).finish()
    }
}

impl Database {
    /// Opens (creating if needed) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_mode(path, AccessMode::Create)
    }

    pub fn open_with_mode(path: impl AsRef<Path>, mode: AccessMode) -> Result<Self> {
        let path = path.as_ref();
        let path_text = path.to_string_lossy().into_owned();
        let connection = Connection::open_with_flags(path, mode.open_flags())
            .map_err(|e| Error::open(&path_text, e))?;
        debug!(path = %path_text, ?mode, "database opened");
        Ok(Self {
            connection,
            path: path_text,
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let connection =
            Connection::open_in_memory().map_err(|e| Error::open(MEMORY_PATH, e))?;
        debug!("in-memory database opened");
        Ok(Self {
            connection,
            path: MEMORY_PATH.to_string(),
        })
    }

    /// Opens the configured database and creates any missing schema objects.
    pub fn with_config(config: &DatabaseConfig) -> Result<Self> {
        config.validate()?;
        let database = if config.is_in_memory() {
            Self::open_in_memory()?
        } else {
            Self::open_with_mode(&config.db_path, config.access_mode)?
        };
        database.initialize_schema(&config.schema)?;
        Ok(database)
    }

    fn initialize_schema(&self, schema: &Schema) -> Result<()> {
        let statements = schema.to_sql()?;
        if statements.is_empty() {
            return Ok(());
        }
        let mut transaction = self.begin_transaction()?;
        for sql in &statements {
            transaction.execute(sql)?;
        }
        transaction.commit()?;
        debug!(path = %self.path, tables = schema.tables.len(), "schema initialized");
        Ok(())
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Runs one or more `;`-separated statements without parameters,
    /// discarding any rows they produce.
    pub fn execute(&self, sql: &str) -> Result<()> {
        debug!(sql, "executing");
        self.connection
            .execute_batch(sql)
            .map_err(|e| Error::query(sql, e))
    }

    pub fn prepare_statement(&self, sql: &str) -> Result<Statement<'_>> {
        let statement = self
            .connection
            .prepare(sql)
            .map_err(|e| Error::prepare(sql, e))?;
        debug!(sql, "statement prepared");
        Ok(Statement::new(statement, sql))
    }

    /// Issues `BEGIN` and returns a guard that rolls back unless committed.
    pub fn begin_transaction(&self) -> Result<Transaction<'_>> {
        Transaction::begin(self)
    }

    pub fn last_insert_rowid(&self) -> i64 {
        self.connection.last_insert_rowid()
    }

    /// Rows changed by the most recent INSERT, UPDATE or DELETE.
    pub fn changes(&self) -> u64 {
        self.connection.changes() as u64
    }

    /// False while a transaction is open on the connection.
    pub fn is_autocommit(&self) -> bool {
        self.connection.is_autocommit()
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        debug!(path = %self.path, "closing database");
    }
}
