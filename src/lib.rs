pub mod ast;
pub mod column;
pub mod data_type;
pub mod database;
pub mod error;
pub mod expr_parser;
pub mod expression;
pub mod literal;
pub mod parser;
pub mod row;
pub mod table;
pub mod tokenizer;
pub mod value;

pub use column::{Attributes, Column};
pub use data_type::DataType;
pub use database::Database;
pub use error::{Error, Result};
pub use expression::{BinaryOp, Expr, Expression, UnaryOp};
pub use row::{Row, RowId, RowView};
pub use table::{Schema, Table};
pub use value::{MAX_DATA_LEN, Value};
