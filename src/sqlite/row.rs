//! Materialized query results.
//!
//! A [`RowSet`] is filled once by [`Statement::execute`](super::Statement::execute)
//! and is read-only afterwards. Rows hold owned values and have no tie to the
//! connection that produced them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::value::Value;
use crate::error::{Error, Result};

/// One result record: column values in select-list order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn column_count(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Result<&Value> {
        self.values.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.values.len(),
        })
    }

    pub fn is_null(&self, index: usize) -> Result<bool> {
        Ok(self.get(index)?.is_null())
    }

    /// Reads the column as an integer, parsing text columns when needed.
    pub fn get_int(&self, index: usize) -> Result<i64> {
        let value = self.get(index)?;
        let conversion = || Error::Conversion {
            index,
            from: value.type_name(),
            to: "INTEGER",
        };
        match value {
            Value::Integer(i) => Ok(*i),
            Value::Real(r) => Ok(*r as i64),
            Value::Text(s) => s.trim().parse().map_err(|_| conversion()),
            Value::Null | Value::Blob(_) => Err(conversion()),
        }
    }

    pub fn get_real(&self, index: usize) -> Result<f64> {
        let value = self.get(index)?;
        let conversion = || Error::Conversion {
            index,
            from: value.type_name(),
            to: "REAL",
        };
        match value {
            Value::Integer(i) => Ok(*i as f64),
            Value::Real(r) => Ok(*r),
            Value::Text(s) => s.trim().parse().map_err(|_| conversion()),
            Value::Null | Value::Blob(_) => Err(conversion()),
        }
    }

    /// Reads the column as text. NULL reads as the empty string.
    pub fn get_string(&self, index: usize) -> Result<String> {
        Ok(self.get(index)?.to_string())
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("|")?;
        for value in &self.values {
            write!(f, "{value}|")?;
        }
        Ok(())
    }
}

/// The rows produced by one statement execution, in engine order.
#[derive(Debug, Clone, PartialEq)]
pub struct RowSet {
    columns: Arc<[String]>,
    rows: Vec<Row>,
}

impl RowSet {
    pub(crate) fn new(columns: Vec<String>) -> Self {
        Self {
            columns: columns.into(),
            rows: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// Copies every row out of the set.
    pub fn snapshot(&self) -> impl Iterator<Item = Row> + '_ {
        self.rows.iter().cloned()
    }
}

impl fmt::Display for RowSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

impl IntoIterator for RowSet {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a RowSet {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
