//! Expression trees and their evaluation against a row.

use std::fmt;

use crate::error::{Error, Result};
use crate::expr_parser;
use crate::row::RowView;
use crate::value::Value;

/// Operators taking a single operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-`
    Negate,
    /// `!`
    Not,
    /// `~`
    BitNot,
}

impl UnaryOp {
    /// Unary operators bind tighter than any binary operator.
    pub const PRIORITY: u32 = 9;

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "-" => Some(Self::Negate),
            "!" => Some(Self::Not),
            "~" => Some(Self::BitNot),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Negate => "-",
            Self::Not => "!",
            Self::BitNot => "~",
        }
    }

    pub fn apply(self, operand: &Value) -> Result<Value> {
        match self {
            Self::Negate => operand.try_neg(),
            Self::Not => operand.logical_not(),
            Self::BitNot => operand.bit_not(),
        }
    }
}

/// Operators taking two operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    And,
    Or,
    BitAnd,
    BitOr,
    BitXor,
    Eq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
}

impl BinaryOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let op = match symbol {
            "+" => Self::Add,
            "-" => Self::Sub,
            "*" => Self::Mul,
            "/" => Self::Div,
            "%" => Self::Rem,
            "&&" => Self::And,
            "||" => Self::Or,
            "&" => Self::BitAnd,
            "|" => Self::BitOr,
            "^" => Self::BitXor,
            "==" => Self::Eq,
            "!=" => Self::NotEq,
            "<" => Self::Less,
            "<=" => Self::LessEq,
            ">" => Self::Greater,
            ">=" => Self::GreaterEq,
            _ => return None,
        };
        Some(op)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::And => "&&",
            Self::Or => "||",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Less => "<",
            Self::LessEq => "<=",
            Self::Greater => ">",
            Self::GreaterEq => ">=",
        }
    }

    /// Binding strength; the lowest priority operator of a window becomes
    /// the root of its tree.
    pub fn priority(self) -> u32 {
        match self {
            Self::Or => 0,
            Self::And => 1,
            Self::BitOr => 2,
            Self::BitXor => 3,
            Self::BitAnd => 4,
            Self::Eq | Self::NotEq => 5,
            Self::Less | Self::LessEq | Self::Greater | Self::GreaterEq => 6,
            Self::Add | Self::Sub => 7,
            Self::Mul | Self::Div | Self::Rem => 8,
        }
    }

    pub fn apply(self, left: &Value, right: &Value) -> Result<Value> {
        match self {
            Self::Add => left.try_add(right),
            Self::Sub => left.try_sub(right),
            Self::Mul => left.try_mul(right),
            Self::Div => left.try_div(right),
            Self::Rem => left.try_rem(right),
            Self::And => left.logical_and(right),
            Self::Or => left.logical_or(right),
            Self::BitAnd => left.bit_and(right),
            Self::BitOr => left.bit_or(right),
            Self::BitXor => left.bit_xor(right),
            Self::Eq => left.equals(right),
            Self::NotEq => left.not_equals(right),
            Self::Less => left.less_than(right),
            Self::LessEq => left.less_equal(right),
            Self::Greater => left.greater_than(right),
            Self::GreaterEq => left.greater_equal(right),
        }
    }
}

/// A node of an expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Reference to a column, resolved on the evaluating row.
    Column(String),
    Literal(Value),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Self::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Evaluates the tree against `row`.
    ///
    /// Both children of a binary node are always evaluated, left first; there
    /// is no short-circuit.
    pub fn evaluate(&self, row: &RowView<'_>) -> Result<Value> {
        match self {
            Self::Column(name) => row.get(name),
            Self::Literal(value) => Ok(*value),
            Self::Unary { op, operand } => op.apply(&operand.evaluate(row)?),
            Self::Binary { op, left, right } => {
                let left = left.evaluate(row)?;
                let right = right.evaluate(row)?;
                op.apply(&left, &right)
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Column(name) => f.write_str(name),
            Self::Literal(text @ Value::Text(_)) => write!(f, "{:?}", text.to_string()),
            Self::Literal(value) => write!(f, "{value}"),
            Self::Unary { op, operand } => write!(f, "{}({operand})", op.symbol()),
            Self::Binary { op, left, right } => write!(f, "({left} {} {right})", op.symbol()),
        }
    }
}

/// A possibly empty expression, as attached to a statement.
///
/// An empty expression (no `WHERE` clause) evaluates to `true` for every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expression {
    root: Option<Expr>,
}

impl Expression {
    pub fn new(root: Expr) -> Self {
        Self { root: Some(root) }
    }

    /// The expression that holds for every row.
    pub fn always() -> Self {
        Self::default()
    }

    /// Parses an infix expression.
    ///
    /// # Example
    /// ```
    /// # use memdb::Expression;
    /// let expr = Expression::parse("2 + 3 * 4").unwrap();
    /// assert_eq!(expr.to_string(), "(2 + (3 * 4))");
    /// ```
    pub fn parse(source: &str) -> Result<Self> {
        expr_parser::parse(source).map(Self::new)
    }

    pub fn root(&self) -> Option<&Expr> {
        self.root.as_ref()
    }

    pub fn evaluate(&self, row: &RowView<'_>) -> Result<Value> {
        match &self.root {
            Some(root) => root.evaluate(row),
            None => Ok(Value::Bool(true)),
        }
    }

    /// Evaluates the expression as a row predicate.
    ///
    /// # Errors
    /// Returns [Error::NonBooleanPredicate] if the result is not a [Value::Bool].
    pub fn matches(&self, row: &RowView<'_>) -> Result<bool> {
        match self.evaluate(row)? {
            Value::Bool(b) => Ok(b),
            other => Err(Error::NonBooleanPredicate(other.data_type())),
        }
    }
}

impl From<Expr> for Expression {
    fn from(root: Expr) -> Self {
        Self::new(root)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.root {
            Some(root) => write!(f, "{root}"),
            None => f.write_str("true"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;
    use crate::data_type::DataType;
    use crate::row::Row;
    use crate::table::Schema;

    fn fixture() -> (Schema, Row) {
        let schema = Schema::new(vec![
            Column::new("a".into(), DataType::Int32),
            Column::new("b".into(), DataType::Int32),
            Column::new("flag".into(), DataType::Bool),
        ])
        .unwrap();
        let row = Row::new(&schema, vec![Value::Int32(6), Value::Int32(4), Value::Bool(true)]).unwrap();
        (schema, row)
    }

    fn eval(source: &str) -> Result<Value> {
        let (schema, row) = fixture();
        Expression::parse(source)?.evaluate(&RowView::new(&schema, row.values()))
    }

    #[test]
    fn test_column_and_literal_leaves() {
        let (schema, row) = fixture();
        let view = RowView::new(&schema, row.values());
        assert_eq!(Expr::Column("b".into()).evaluate(&view), Ok(Value::Int32(4)));
        assert_eq!(
            Expr::Literal(Value::Bool(false)).evaluate(&view),
            Ok(Value::Bool(false))
        );
    }

    #[test]
    fn test_hand_built_tree() {
        let (schema, row) = fixture();
        let view = RowView::new(&schema, row.values());
        // (a - b) * 10
        let tree = Expr::binary(
            BinaryOp::Mul,
            Expr::binary(
                BinaryOp::Sub,
                Expr::Column("a".into()),
                Expr::Column("b".into()),
            ),
            Expr::Literal(Value::Int32(10)),
        );
        assert_eq!(tree.evaluate(&view), Ok(Value::Int32(20)));
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("2+3*4"), Ok(Value::Int32(14)));
        assert_eq!(eval("(2+3)*4"), Ok(Value::Int32(20)));
        assert_eq!(eval("-a+b"), Ok(Value::Int32(-2)));
        assert_eq!(eval("a - b - 1"), Ok(Value::Int32(1)));
        assert_eq!(eval("a > b && flag"), Ok(Value::Bool(true)));
    }

    #[test]
    fn test_unary_operators() {
        assert_eq!(eval("!flag"), Ok(Value::Bool(false)));
        assert_eq!(eval("~a"), Ok(Value::Int32(!6)));
        assert_eq!(eval("-(a+b)"), Ok(Value::Int32(-10)));
    }

    #[test]
    fn test_no_short_circuit() {
        // the right operand is evaluated, and fails, even though the left is false
        assert_eq!(eval("false && a / 0 == 1"), Err(Error::DivideByZero));
    }

    #[test]
    fn test_unknown_column() {
        assert_eq!(eval("nope + 1"), Err(Error::UnknownColumn("nope".into())));
    }

    #[test]
    fn test_empty_expression_is_true() {
        let (schema, row) = fixture();
        let view = RowView::new(&schema, row.values());
        assert_eq!(Expression::always().evaluate(&view), Ok(Value::Bool(true)));
        assert_eq!(Expression::always().matches(&view), Ok(true));
    }

    #[test]
    fn test_non_boolean_predicate() {
        let (schema, row) = fixture();
        let view = RowView::new(&schema, row.values());
        let expr = Expression::parse("a + 1").unwrap();
        assert_eq!(
            expr.matches(&view),
            Err(Error::NonBooleanPredicate(DataType::Int32))
        );
    }

    #[test]
    fn test_display_round_trips_through_parser() {
        let expr = Expression::parse("-a + b * (2 - a) >= 3 || !flag").unwrap();
        let reparsed = Expression::parse(&expr.to_string()).unwrap();
        assert_eq!(expr, reparsed);
    }
}
