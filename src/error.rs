//! Error types for the SQLite layer.
//!
//! Engine failures are wrapped where they are detected and carry the SQLite
//! extended result code, the engine message and, where there is one, the SQL
//! text that triggered them.

use thiserror::Error;

use crate::sqlite::TransactionState;

/// Status code reported for failures that did not come from the engine.
pub const NON_ENGINE_CODE: i32 = -1;

#[derive(Error, Debug)]
pub enum Error {
    /// The database file could not be opened.
    #[error("Database {path} cannot be opened (code {code}): {message}")]
    Open {
        path: String,
        code: i32,
        message: String,
    },

    /// The engine refused to compile a statement.
    #[error("Statement {query} cannot be prepared, error code is {code}: {message}")]
    Prepare {
        query: String,
        code: i32,
        message: String,
    },

    /// Direct execution or stepping of a statement failed.
    #[error("Could not execute query {query} (code {code}): {message}")]
    Query {
        query: String,
        code: i32,
        message: String,
    },

    #[error("Cannot bind parameter {index}: {message}")]
    Bind { index: usize, message: String },

    #[error("index {index} is out of range {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("column {index} holds {from} which cannot be read as {to}")]
    Conversion {
        index: usize,
        from: &'static str,
        to: &'static str,
    },

    #[error("transaction is already {state:?}")]
    TransactionFinished { state: TransactionState },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Splits a rusqlite error into the extended result code and a message.
pub(crate) fn engine_failure(err: &rusqlite::Error) -> (i32, String) {
    match err {
        rusqlite::Error::SqliteFailure(failure, Some(message)) => {
            (failure.extended_code, message.clone())
        }
        rusqlite::Error::SqliteFailure(failure, None) => {
            (failure.extended_code, failure.to_string())
        }
        rusqlite::Error::SqlInputError { error, msg, .. } => (error.extended_code, msg.clone()),
        other => (NON_ENGINE_CODE, other.to_string()),
    }
}

impl Error {
    pub(crate) fn open(path: &str, err: rusqlite::Error) -> Self {
        let (code, message) = engine_failure(&err);
        Error::Open {
            path: path.to_string(),
            code,
            message,
        }
    }

    pub(crate) fn prepare(query: &str, err: rusqlite::Error) -> Self {
        let (code, message) = engine_failure(&err);
        Error::Prepare {
            query: query.to_string(),
            code,
            message,
        }
    }

    pub(crate) fn query(query: &str, err: rusqlite::Error) -> Self {
        let (code, message) = engine_failure(&err);
        Error::Query {
            query: query.to_string(),
            code,
            message,
        }
    }

    pub(crate) fn bind(index: usize, err: rusqlite::Error) -> Self {
        let (_, message) = engine_failure(&err);
        Error::Bind { index, message }
    }

    /// SQLite extended result code, if the error came from the engine.
    pub fn engine_code(&self) -> Option<i32> {
        match self {
            Error::Open { code, .. } | Error::Prepare { code, .. } | Error::Query { code, .. }
                if *code != NON_ENGINE_CODE =>
            {
                Some(*code)
            }
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}
