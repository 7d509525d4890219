use std::collections::{BTreeMap, HashMap};
use std::fmt;

use bitvec::prelude::*;
use tracing::trace;

use crate::column::Column;
use crate::error::{Error, Result};
use crate::expression::Expression;
use crate::row::{Row, RowId, RowView};
use crate::value::Value;

/// The ordered column list of a table, with a name to position index.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    columns: Vec<Column>,
    positions: HashMap<String, usize>,
}

impl Schema {
    /// Builds a schema from column declarations.
    ///
    /// # Errors
    /// Returns [Error::InvalidSchema] if the list is empty, a name repeats or
    /// a column declaration is inconsistent (see [Column::validate]).
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        if columns.is_empty() {
            return Err(Error::InvalidSchema("a table needs at least one column".into()));
        }

        let mut positions = HashMap::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            column.validate()?;
            if positions.insert(column.name.clone(), i).is_some() {
                return Err(Error::InvalidSchema(format!(
                    "column {} is declared twice",
                    column.name
                )));
            }
        }

        Ok(Self { columns, positions })
    }

    /// Schema of a projection: names may repeat, lookups resolve to the first
    /// occurrence.
    fn projection(columns: Vec<Column>) -> Self {
        let mut positions = HashMap::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            positions.entry(column.name.clone()).or_insert(i);
        }
        Self { columns, positions }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of columns, which is also the width of every row.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.position(name).map(|idx| &self.columns[idx])
    }

    fn require(&self, name: &str) -> Result<usize> {
        self.position(name)
            .ok_or_else(|| Error::UnknownColumn(name.to_string()))
    }
}

/// A named (or anonymous) collection of rows sharing one schema.
///
/// Rows are stored by [RowId] in insertion order. Key and unique columns keep
/// an ordered index from value to row, and autoincrement columns a counter.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    schema: Schema,
    rows: BTreeMap<RowId, Row>,
    next_row_id: RowId,
    /// Column position to index, for key and unique columns.
    indexes: HashMap<usize, BTreeMap<Value, RowId>>,
    /// Column position to next generated value, for autoincrement columns.
    counters: HashMap<usize, i64>,
}

impl Table {
    /// Creates an empty table. An empty `name` makes it anonymous.
    pub fn new(name: String, schema: Schema) -> Self {
        let indexes = schema
            .columns()
            .iter()
            .enumerate()
            .filter(|(_, column)| column.is_indexed())
            .map(|(i, _)| (i, BTreeMap::new()))
            .collect();
        let counters = schema
            .columns()
            .iter()
            .enumerate()
            .filter(|(_, column)| column.is_autoincrement())
            .map(|(i, _)| (i, 0))
            .collect();

        Self {
            name,
            schema,
            rows: BTreeMap::new(),
            next_row_id: 0,
            indexes,
            counters,
        }
    }

    /// Creates an unnamed table, as produced by `select`.
    pub fn anonymous(schema: Schema) -> Self {
        Self::new(String::new(), schema)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_anonymous(&self) -> bool {
        self.name.is_empty()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn columns(&self) -> &[Column] {
        self.schema.columns()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, id: RowId) -> Option<&Row> {
        self.rows.get(&id)
    }

    /// Iterates the rows in storage order.
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.values()
    }

    /// Iterates the rows with their ids, in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (RowId, &Row)> {
        self.rows.iter().map(|(id, row)| (*id, row))
    }

    /// Binds `row` to this table's schema for expression evaluation.
    pub fn view<'a>(&'a self, row: &'a Row) -> RowView<'a> {
        RowView::new(&self.schema, row.values())
    }

    // --- Insert ---

    /// Appends a fully specified row.
    ///
    /// # Errors
    /// - [Error::IncompatibleRow] if the width or a kind does not match.
    /// - [Error::MaxLengthExceeded] if a value is wider than its column.
    /// - [Error::DuplicateKey] if a key or unique column already holds the value.
    ///
    /// # Example
    /// ```
    /// # use memdb::{Column, DataType, Schema, Table, Value};
    /// let schema = Schema::new(vec![Column::new("id".into(), DataType::Int32)]).unwrap();
    /// let mut table = Table::new("t".into(), schema);
    /// table.insert(vec![Value::Int32(1)]).unwrap();
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn insert(&mut self, values: Vec<Value>) -> Result<RowId> {
        self.insert_slots(values.into_iter().map(Some).collect())
    }

    /// Appends a row given position by position; `None` slots take the
    /// generated value of an autoincrement column or the column default.
    pub fn insert_slots(&mut self, slots: Vec<Option<Value>>) -> Result<RowId> {
        if slots.len() != self.schema.width() {
            return Err(Error::IncompatibleRow(format!(
                "expected {} values, got {}",
                self.schema.width(),
                slots.len()
            )));
        }
        let values = self.fill(slots)?;
        self.push(values)
    }

    /// Appends a row given as `column = value` pairs. Columns left out take
    /// the generated value of an autoincrement column or the column default.
    ///
    /// # Errors
    /// Returns [Error::UnknownColumn] for a name outside the schema and
    /// [Error::IncompatibleRow] for a column named twice, besides the errors
    /// of [Table::insert].
    pub fn insert_named(&mut self, values: Vec<(String, Value)>) -> Result<RowId> {
        let mut slots = vec![None; self.schema.width()];
        for (name, value) in values {
            let idx = self.schema.require(&name)?;
            if slots[idx].replace(value).is_some() {
                return Err(Error::IncompatibleRow(format!(
                    "column {name} is given twice"
                )));
            }
        }
        let values = self.fill(slots)?;
        self.push(values)
    }

    fn fill(&self, slots: Vec<Option<Value>>) -> Result<Vec<Value>> {
        slots
            .into_iter()
            .zip(self.schema.columns())
            .enumerate()
            .map(|(idx, (slot, column))| match slot {
                Some(value) => Ok(value),
                None => match self.counters.get(&idx) {
                    Some(next) => i32::try_from(*next).map(Value::Int32).map_err(|_| {
                        Error::IncompatibleRow(format!(
                            "autoincrement column {} is exhausted",
                            column.name
                        ))
                    }),
                    None => Ok(column.default_value()),
                },
            })
            .collect()
    }

    fn push(&mut self, values: Vec<Value>) -> Result<RowId> {
        let row = Row::new(&self.schema, values)?;

        for (idx, index) in &self.indexes {
            if index.contains_key(&row[*idx]) {
                return Err(self.duplicate(*idx, &row[*idx]));
            }
        }

        let id = self.next_row_id;
        self.next_row_id += 1;
        for (idx, index) in self.indexes.iter_mut() {
            index.insert(row[*idx], id);
        }
        for (idx, next) in self.counters.iter_mut() {
            raise_counter(next, &row[*idx]);
        }
        self.rows.insert(id, row);
        Ok(id)
    }

    // --- Queries ---

    /// Evaluates `predicate` on every row, in storage order.
    fn scan(&self, predicate: &Expression) -> Result<BitVec> {
        let mut mask = bitvec![0; self.rows.len()];
        for (i, row) in self.rows.values().enumerate() {
            if predicate.matches(&self.view(row))? {
                mask.set(i, true);
            }
        }
        trace!(
            table = %self.name,
            rows = self.rows.len(),
            matched = mask.count_ones(),
            "scan"
        );
        Ok(mask)
    }

    fn matching(&self, predicate: &Expression) -> Result<Vec<(RowId, &Row)>> {
        let mask = self.scan(predicate)?;
        Ok(self
            .iter()
            .zip(mask.iter().by_vals())
            .filter_map(|(entry, hit)| hit.then_some(entry))
            .collect())
    }

    /// Copies the named columns of every row satisfying `predicate` into a new
    /// anonymous table. Names may repeat; the source is left untouched.
    ///
    /// # Errors
    /// Returns [Error::UnknownColumn] for a name outside the schema and any
    /// error raised while evaluating `predicate`, including
    /// [Error::NonBooleanPredicate].
    pub fn select<S: AsRef<str>>(&self, columns: &[S], predicate: &Expression) -> Result<Table> {
        let positions = columns
            .iter()
            .map(|name| self.schema.require(name.as_ref()))
            .collect::<Result<Vec<usize>>>()?;

        let projected = positions
            .iter()
            .map(|idx| {
                let source = &self.schema.columns()[*idx];
                let column = Column::new(source.name.clone(), source.data_type);
                match source.width {
                    Some(width) => column.with_width(width),
                    None => column,
                }
            })
            .collect();
        let mut result = Table::anonymous(Schema::projection(projected));

        for (_, row) in self.matching(predicate)? {
            let values = positions.iter().map(|idx| row[*idx]).collect();
            let id = result.next_row_id;
            result.next_row_id += 1;
            result.rows.insert(id, Row::new_unchecked(values));
        }

        Ok(result)
    }

    /// Same as [Table::select] over every column.
    pub fn select_all(&self, predicate: &Expression) -> Result<Table> {
        let names: Vec<&str> = self.columns().iter().map(|c| c.name.as_str()).collect();
        self.select(&names, predicate)
    }

    // --- Mutations ---

    /// Applies `assignments` to every row satisfying `predicate` and returns
    /// the number of rows changed.
    ///
    /// For each row the assignments run in order on a working copy, so a
    /// later assignment sees what an earlier one wrote. Every row is computed
    /// and checked before anything is written: on error the table is
    /// unchanged.
    ///
    /// # Errors
    /// - [Error::UnknownColumn] if a target column does not exist.
    /// - [Error::IncompatibleRow] if an expression yields the wrong kind.
    /// - [Error::DuplicateKey] if a key or unique column would hold a value twice.
    /// - Any error raised while evaluating `predicate` or an assignment.
    pub fn update(&mut self, assignments: &[(String, Expression)], predicate: &Expression) -> Result<usize> {
        let targets = assignments
            .iter()
            .map(|(name, expr)| Ok((self.schema.require(name)?, expr)))
            .collect::<Result<Vec<(usize, &Expression)>>>()?;

        let mut changes = Vec::new();
        for (id, row) in self.matching(predicate)? {
            let mut working = row.values().to_vec();
            for (idx, expr) in &targets {
                let value = expr.evaluate(&RowView::new(&self.schema, &working))?;
                self.schema.columns()[*idx].check(&value)?;
                working[*idx] = value;
            }
            changes.push((id, working));
        }

        let indexes = self.reindex(&targets, &changes)?;

        let count = changes.len();
        self.indexes.extend(indexes);
        for (id, values) in changes {
            for (idx, next) in self.counters.iter_mut() {
                raise_counter(next, &values[*idx]);
            }
            self.rows.insert(id, Row::new_unchecked(values));
        }
        trace!(table = %self.name, count, "update");
        Ok(count)
    }

    /// Rebuilds the indexes of assigned key/unique columns as they will be
    /// after `changes`, failing on the first collision.
    fn reindex(
        &self,
        targets: &[(usize, &Expression)],
        changes: &[(RowId, Vec<Value>)],
    ) -> Result<Vec<(usize, BTreeMap<Value, RowId>)>> {
        let mut rebuilt = Vec::new();

        for (idx, index) in &self.indexes {
            if !targets.iter().any(|(target, _)| target == idx) {
                continue;
            }
            let mut index = index.clone();
            for (id, _) in changes {
                if let Some(old) = self.rows.get(id) {
                    index.remove(&old[*idx]);
                }
            }
            for (id, values) in changes {
                if index.insert(values[*idx], *id).is_some() {
                    return Err(self.duplicate(*idx, &values[*idx]));
                }
            }
            rebuilt.push((*idx, index));
        }

        Ok(rebuilt)
    }

    /// Removes every row satisfying `predicate` and returns how many were
    /// removed. Surviving rows keep their ids.
    pub fn delete(&mut self, predicate: &Expression) -> Result<usize> {
        let doomed: Vec<RowId> = self
            .matching(predicate)?
            .into_iter()
            .map(|(id, _)| id)
            .collect();

        for id in &doomed {
            if let Some(row) = self.rows.remove(id) {
                for (idx, index) in self.indexes.iter_mut() {
                    index.remove(&row[*idx]);
                }
            }
        }
        trace!(table = %self.name, count = doomed.len(), "delete");
        Ok(doomed.len())
    }

    fn duplicate(&self, idx: usize, value: &Value) -> Error {
        Error::DuplicateKey {
            column: self.schema.columns()[idx].name.clone(),
            value: value.to_string(),
        }
    }
}

fn raise_counter(next: &mut i64, value: &Value) {
    if let Value::Int32(i) = value {
        *next = (*next).max(i64::from(*i) + 1);
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<String> = self.columns().iter().map(|c| c.name.clone()).collect();
        let cells: Vec<Vec<String>> = self
            .rows()
            .map(|row| row.values().iter().map(|v| v.to_string()).collect())
            .collect();

        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let border: String = widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+");
        let border = format!("+{border}+");

        let line = |f: &mut fmt::Formatter<'_>, values: &[String]| -> fmt::Result {
            f.write_str("|")?;
            for (value, width) in values.iter().zip(&widths) {
                let pad = width - value.chars().count();
                write!(f, " {value}{} |", " ".repeat(pad))?;
            }
            writeln!(f)
        };

        writeln!(f, "{border}")?;
        line(f, &headers)?;
        writeln!(f, "{border}")?;
        for row in &cells {
            line(f, row)?;
        }
        write!(f, "{border}")
    }
}
