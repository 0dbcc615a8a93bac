use tracing::debug;

use super::row::{Row, RowSet};
use super::value::{Params, Value};
use crate::error::{Error, Result};

/// A compiled, parameterized query borrowed from a [`Database`](super::Database).
///
/// Bound values stay attached to the statement across executions until they
/// are rebound or cleared, so a statement can be bound once and run many
/// times.
pub struct Statement<'db> {
    inner: rusqlite::Statement<'db>,
    sql: String,
}

impl std::fmt::Debug for Statement<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Statement").field("sql", &self.sql).finish()
    }
}

impl<'db> Statement<'db> {
    pub(crate) fn new(inner: rusqlite::Statement<'db>, sql: &str) -> Self {
        Self {
            inner,
            sql: sql.to_string(),
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn parameter_count(&self) -> usize {
        self.inner.parameter_count()
    }

    /// Binds `value` to the 1-based parameter `position`, replacing any value
    /// bound there before.
    pub fn bind(&mut self, position: usize, value: impl Into<Value>) -> Result<()> {
        if position == 0 {
            return Err(Error::Bind {
                index: 0,
                message: "parameter positions start at 1".to_string(),
            });
        }
        let count = self.parameter_count();
        if position > count {
            return Err(Error::Bind {
                index: position,
                message: format!("statement has {count} parameters"),
            });
        }
        let value = value.into();
        self.inner
            .raw_bind_parameter(position, &value)
            .map_err(|e| Error::bind(position, e))
    }

    /// Returns the position of a named placeholder such as `@name`, or 0 if the
    /// statement has no parameter with that name.
    pub fn resolve_parameter_index(&self, name: &str) -> usize {
        match self.inner.parameter_index(name) {
            Ok(Some(index)) => index,
            Ok(None) => 0,
            Err(err) => {
                debug!(name, error = %err, "parameter name rejected by engine");
                0
            }
        }
    }

    pub fn bind_named(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        match self.resolve_parameter_index(name) {
            0 => Err(Error::Bind {
                index: 0,
                message: format!("statement has no parameter named {name}"),
            }),
            position => self.bind(position, value),
        }
    }

    pub fn bind_params(&mut self, params: &Params) -> Result<()> {
        for (name, value) in &params.values {
            self.bind_named(name, value.clone())?;
        }
        Ok(())
    }

    /// Resets every parameter to NULL.
    pub fn clear_bindings(&mut self) {
        self.inner.clear_bindings();
    }

    /// Steps the statement to completion and materializes every row.
    ///
    /// The statement is reset once the rows are read. Bindings survive the
    /// reset, so it can be executed again right away.
    pub fn execute(&mut self) -> Result<RowSet> {
        let columns: Vec<String> = self
            .inner
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();
        let column_count = columns.len();
        let mut set = RowSet::new(columns);

        let mut rows = self.inner.raw_query();
        while let Some(row) = rows.next().map_err(|e| Error::query(&self.sql, e))? {
            let mut values = Vec::with_capacity(column_count);
            for index in 0..column_count {
                let value = row.get_ref(index).map_err(|e| Error::query(&self.sql, e))?;
                values.push(Value::from(value));
            }
            set.push(Row::new(values));
        }

        debug!(sql = %self.sql, rows = set.len(), "statement executed");
        Ok(set)
    }
}
