//! SQLite access layer.
//!
//! [`Database`] owns the connection and hands out [`Statement`]s and
//! [`Transaction`]s that borrow it. Executing a statement materializes its
//! result into a [`RowSet`] of owned [`Row`]s.

mod database;
mod row;
mod schema;
mod statement;
mod transaction;
mod value;

pub use database::Database;
pub use row::{Row, RowSet};
pub use schema::{
    ColumnConstraint, ColumnDefinition, DataType, DefaultValue, ForeignKey, ForeignKeyAction,
    IndexDefinition, Schema, TableDefinition,
};
pub use statement::Statement;
pub use transaction::{Transaction, TransactionState};
pub use value::{Params, Value};
