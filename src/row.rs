use std::ops::Index;

use crate::error::{Error, Result};
use crate::table::Schema;
use crate::value::Value;

/// Stable identity of a row inside its table.
///
/// Ids come from a per-table counter and are never reused, so deleting a row
/// leaves the identity of every other row untouched.
pub type RowId = u64;

/// A fixed-width sequence of values, aligned with the columns of its table.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    /// Builds a row after checking it against `schema`.
    ///
    /// # Errors
    /// Returns [Error::IncompatibleRow] if the width or a kind does not match,
    /// and [Error::MaxLengthExceeded] if a value is wider than its column.
    pub fn new(schema: &Schema, values: Vec<Value>) -> Result<Self> {
        if values.len() != schema.width() {
            return Err(Error::IncompatibleRow(format!(
                "expected {} values, got {}",
                schema.width(),
                values.len()
            )));
        }
        for (column, value) in schema.columns().iter().zip(&values) {
            column.check(value)?;
        }
        Ok(Self { values })
    }

    /// Builds a row without checks; used for projections whose values were
    /// already checked against the source table.
    pub(crate) fn new_unchecked(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Index<usize> for Row {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        &self.values[index]
    }
}

/// A row bound to the schema of the table that owns it.
///
/// Expressions are evaluated against a view so that column references are
/// resolved lazily, by name, on the evaluating row.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    schema: &'a Schema,
    values: &'a [Value],
}

impl<'a> RowView<'a> {
    pub fn new(schema: &'a Schema, values: &'a [Value]) -> Self {
        Self { schema, values }
    }

    /// Returns a copy of the value stored under column `name`.
    ///
    /// # Errors
    /// Returns [Error::UnknownColumn] if the schema has no such column.
    pub fn get(&self, name: &str) -> Result<Value> {
        self.schema
            .position(name)
            .and_then(|idx| self.values.get(idx))
            .copied()
            .ok_or_else(|| Error::UnknownColumn(name.to_string()))
    }

    pub fn values(&self) -> &'a [Value] {
        self.values
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }
}
