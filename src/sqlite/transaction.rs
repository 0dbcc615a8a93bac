use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::database::Database;
use super::row::RowSet;
use super::statement::Statement;
use crate::error::{Error, Result};

/// Lifecycle of a [`Transaction`]. `Active` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionState {
    Active,
    Committed,
    Aborted,
}

/// A scoped unit of work on a [`Database`].
///
/// The transaction begins when it is created. It ends with an explicit
/// [`commit`](Self::commit) or [`abort`](Self::abort); a transaction dropped
/// while still active is rolled back. A failed statement rolls the whole
/// transaction back before the error is returned.
pub struct Transaction<'db> {
    database: &'db Database,
    state: TransactionState,
}

impl std::fmt::Debug for Transaction<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transaction")
            .field("database", &self.database.path())
            .field("state", &self.state)
            .finish()
    }
}

impl<'db> Transaction<'db> {
    pub(crate) fn begin(database: &'db Database) -> Result<Self> {
        database.execute("BEGIN TRANSACTION;")?;
        debug!(path = %database.path(), "transaction started");
        Ok(Self {
            database,
            state: TransactionState::Active,
        })
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    pub fn execute(&mut self, sql: &str) -> Result<()> {
        self.ensure_active()?;
        self.database
            .execute(sql)
            .map_err(|err| self.abort_after_failure(err))?;
        self.track_engine_end(sql);
        Ok(())
    }

    pub fn execute_statement(&mut self, statement: &mut Statement<'_>) -> Result<RowSet> {
        self.ensure_active()?;
        let rows = statement
            .execute()
            .map_err(|err| self.abort_after_failure(err))?;
        self.track_engine_end(statement.sql());
        Ok(rows)
    }

    pub fn commit(mut self) -> Result<()> {
        self.ensure_active()?;
        // A failed COMMIT leaves the state Active so that drop rolls back.
        self.database.execute("COMMIT;")?;
        self.state = TransactionState::Committed;
        debug!(path = %self.database.path(), "transaction committed");
        Ok(())
    }

    pub fn abort(mut self) -> Result<()> {
        self.ensure_active()?;
        self.rollback()?;
        debug!(path = %self.database.path(), "transaction aborted");
        Ok(())
    }

    /// A COMMIT, END or ROLLBACK issued through `execute` ends the engine
    /// transaction; this guard must not finalize whatever begins next.
    fn track_engine_end(&mut self, sql: &str) {
        if !self.database.is_autocommit() {
            return;
        }
        self.state = if sql.to_ascii_uppercase().contains("ROLLBACK") {
            TransactionState::Aborted
        } else {
            TransactionState::Committed
        };
        warn!(path = %self.database.path(), state = ?self.state, "transaction ended by a statement");
    }

    fn ensure_active(&self) -> Result<()> {
        match self.state {
            TransactionState::Active => Ok(()),
            state => Err(Error::TransactionFinished { state }),
        }
    }

    fn rollback(&mut self) -> Result<()> {
        self.state = TransactionState::Aborted;
        // The engine ends the transaction by itself after some failures.
        if self.database.is_autocommit() {
            return Ok(());
        }
        self.database.execute("ROLLBACK;")
    }

    fn abort_after_failure(&mut self, err: Error) -> Error {
        warn!(path = %self.database.path(), error = %err, "statement failed, rolling back transaction");
        if let Err(rollback_err) = self.rollback() {
            warn!(error = %rollback_err, "rollback after failed statement did not complete");
        }
        err
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if self.state != TransactionState::Active {
            return;
        }
        warn!(path = %self.database.path(), "transaction dropped while active, rolling back");
        if let Err(err) = self.rollback() {
            warn!(error = %err, "implicit rollback failed");
        }
    }
}
