//! Error types shared by every layer of the engine.

use thiserror::Error;

use crate::data_type::DataType;

pub type Result<T> = std::result::Result<T, Error>;

/// Every failure the engine can report.
///
/// Errors are request-scoped: a failing statement is aborted as a whole and
/// the database stays usable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Value errors
    #[error("operator {op} does not accept different types: {left} and {right}")]
    TypeMismatch {
        op: &'static str,
        left: DataType,
        right: DataType,
    },

    #[error("type {kind} is incompatible with operator {op}")]
    UnsupportedOperator { op: &'static str, kind: DataType },

    #[error("division by zero")]
    DivideByZero,

    #[error("operator {op} needs operands of the same size: {left} vs {right} bytes")]
    SizeMismatch {
        op: &'static str,
        left: usize,
        right: usize,
    },

    #[error("data of length {len} exceeds the maximum length of {max}")]
    MaxLengthExceeded { len: usize, max: usize },

    // Evaluation errors
    #[error("requested column {0} does not exist")]
    UnknownColumn(String),

    #[error("condition evaluated to {0} instead of Bool")]
    NonBooleanPredicate(DataType),

    // Parse errors
    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("unbalanced parentheses")]
    UnbalancedParentheses,

    #[error("empty expression")]
    EmptyExpression,

    #[error("expected an operand, found {0}")]
    InvalidName(String),

    #[error("syntax error: {0}")]
    Syntax(String),

    // Row and table errors
    #[error("row is incompatible with the table: {0}")]
    IncompatibleRow(String),

    #[error("invalid column declaration: {0}")]
    InvalidSchema(String),

    #[error("duplicate value {value} for key column {column}")]
    DuplicateKey { column: String, value: String },

    // Registry errors
    #[error("table {0} already exists")]
    TableAlreadyExists(String),

    #[error("table {0} does not exist")]
    TableNotFound(String),
}
