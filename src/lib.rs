//! SQLite integration and utilities for the Runar ecosystem.
//!
//! # Intention
//!
//! - Provide a small owned API over an embedded SQLite engine: open a
//!   database, prepare and bind statements, read fully materialized row sets
//!   and group work into transactions.
//! - Encapsulate SQLite-specific logic, types, and error handling.
//!
//! # Architectural Boundaries
//!
//! - Only SQLite/database code belongs here.
//! - Query planning, SQL parsing and storage stay inside the engine.
//! - No business logic or unrelated utilities.
//!
//! # Example
//!
//! ```
//! use rust_sqlite::Database;
//!
//! # fn main() -> rust_sqlite::Result<()> {
//! let db = Database::open_in_memory()?;
//! db.execute("CREATE TABLE t(id INTEGER PRIMARY KEY, value TEXT);")?;
//!
//! let mut tx = db.begin_transaction()?;
//! tx.execute("INSERT INTO t(value) VALUES ('heh');")?;
//! tx.commit()?;
//!
//! let mut select = db.prepare_statement("SELECT * FROM t WHERE id = @id")?;
//! select.bind_named("@id", 1)?;
//! let rows = select.execute()?;
//! assert_eq!(rows.get(0).unwrap().get_string(1)?, "heh");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod sqlite;

pub use config::{AccessMode, DatabaseConfig};
pub use error::{Error, Result};
pub use sqlite::{Database, Params, Row, RowSet, Statement, Transaction, TransactionState, Value};
