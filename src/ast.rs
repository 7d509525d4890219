use crate::column::Column;
use crate::expression::Expression;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    CreateTable(CreateTable),
    Insert(Insert),
    Select(Select),
    Update(Update),
    Delete(Delete),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
    pub name: String,
    pub columns: Vec<Column>,
}

/// Row given to `insert`.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertValues {
    /// One slot per column; an empty slot takes the column default.
    Positional(Vec<Option<Value>>),
    /// `column = value` pairs; columns left out take their default.
    Named(Vec<(String, Value)>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: String,
    pub values: InsertValues,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// `*`
    All,
    Columns(Vec<String>),
}

/// Where a `select` reads its rows from.
#[derive(Debug, Clone, PartialEq)]
pub enum TableSource {
    Named(String),
    /// `from ( select ... )`
    Subquery(Box<Select>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub projection: Projection,
    pub source: TableSource,
    pub predicate: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub table: String,
    /// Applied in declaration order.
    pub assignments: Vec<(String, Expression)>,
    pub predicate: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub table: String,
    pub predicate: Expression,
}
