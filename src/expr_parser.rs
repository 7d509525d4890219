//! Precedence climbing over a window of tokens.
//!
//! Each operator occurrence gets its base priority plus 10 per enclosing
//! parenthesis. The occurrence with the lowest priority is the root of the
//! window; the tokens on either side are parsed recursively. Among binary
//! operators of equal priority the rightmost one is taken, so `a - b - c`
//! reads as `(a - b) - c`. Unary operators sit in operand position (window
//! start, after `(` or after another operator) and bind tighter than any
//! binary operator at the same depth.

use crate::error::{Error, Result};
use crate::expression::{BinaryOp, Expr, UnaryOp};
use crate::literal::{self, Atom};
use crate::tokenizer::{Token, Tokenizer};
use crate::value::Value;

const DEPTH_OFFSET: i32 = 10;

/// Role of an operator occurrence inside a window.
#[derive(Debug, Clone, Copy)]
enum Role {
    Unary(UnaryOp),
    Binary(BinaryOp),
}

impl Role {
    fn priority(self) -> i32 {
        match self {
            Role::Unary(_) => UnaryOp::PRIORITY as i32,
            Role::Binary(op) => op.priority() as i32,
        }
    }
}

/// Tokenizes and parses `source` into an expression tree.
pub fn parse(source: &str) -> Result<Expr> {
    let tokens = Tokenizer::new(source).tokenize()?;
    parse_tokens(&tokens)
}

/// Parses an already tokenized expression. A trailing [Token::Eof] is ignored.
///
/// # Errors
/// - [Error::UnbalancedParentheses] if parentheses do not pair up.
/// - [Error::EmptyExpression] for an empty window, including `()`.
/// - [Error::InvalidName] when an operator stands where an operand is required.
/// - [Error::InvalidToken] for tokens outside the expression grammar or
///   operands that are not separated by an operator.
pub fn parse_tokens(tokens: &[Token]) -> Result<Expr> {
    let tokens = match tokens.split_last() {
        Some((Token::Eof, rest)) => rest,
        _ => tokens,
    };
    check_parentheses(tokens)?;
    build(tokens)
}

fn check_parentheses(tokens: &[Token]) -> Result<()> {
    let mut depth = 0usize;

    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::LeftParen => {
                if matches!(tokens.get(i + 1), Some(Token::RightParen)) {
                    return Err(Error::EmptyExpression);
                }
                depth += 1;
            }
            Token::RightParen => {
                depth = depth
                    .checked_sub(1)
                    .ok_or(Error::UnbalancedParentheses)?;
            }
            Token::Word(_) | Token::Text(_) | Token::Op(_) => {}
            other => return Err(Error::InvalidToken(other.to_string())),
        }
    }

    if depth != 0 {
        return Err(Error::UnbalancedParentheses);
    }
    Ok(())
}

fn build(window: &[Token]) -> Result<Expr> {
    match find_root(window)? {
        None => leaf(window),
        Some((index, Role::Unary(op))) => {
            // only opening parentheses may precede a unary root
            if !window[..index].iter().all(|t| *t == Token::LeftParen) {
                return Err(Error::InvalidToken(op.symbol().to_string()));
            }
            let operand = &window[index + 1..];
            if matches!(op, UnaryOp::Negate) {
                if let Some(value) = negative_int(operand)? {
                    return Ok(Expr::Literal(value));
                }
            }
            Ok(Expr::unary(op, build(operand)?))
        }
        Some((index, Role::Binary(op))) => {
            let left = build(&window[..index])?;
            let right = build(&window[index + 1..])?;
            Ok(Expr::binary(op, left, right))
        }
    }
}

/// Scans the window once and returns the weakest-binding operator occurrence.
///
/// Ties between binary operators go to the rightmost occurrence, not the
/// leftmost, so chains of one priority build left-associative trees. Ties
/// between unary operators keep the leftmost, and a unary operator never
/// displaces a binary one of equal priority.
fn find_root(window: &[Token]) -> Result<Option<(usize, Role)>> {
    let mut depth: i32 = 0;
    let mut expect_operand = true;
    let mut root: Option<(usize, Role, i32)> = None;

    for (i, token) in window.iter().enumerate() {
        let symbol = match token {
            Token::LeftParen => {
                depth += 1;
                expect_operand = true;
                continue;
            }
            Token::RightParen => {
                depth -= 1;
                expect_operand = false;
                continue;
            }
            Token::Op(symbol) => *symbol,
            _ => {
                expect_operand = false;
                continue;
            }
        };

        let role = classify_operator(symbol, expect_operand)?;
        expect_operand = true;

        let priority = role.priority() + DEPTH_OFFSET * depth;
        let replace = match root {
            None => true,
            Some((_, _, best)) if priority < best => true,
            Some((_, _, best)) => priority == best && matches!(role, Role::Binary(_)),
        };
        if replace {
            root = Some((i, role, priority));
        }
    }

    Ok(root.map(|(i, role, _)| (i, role)))
}

/// Folds `-` over a bare integer word so `-2147483648` stays in range.
fn negative_int(operand: &[Token]) -> Result<Option<Value>> {
    let end = operand
        .iter()
        .rposition(|t| *t != Token::RightParen)
        .map_or(0, |i| i + 1);
    match &operand[..end] {
        [Token::Word(digits)] if digits.bytes().all(|b| b.is_ascii_digit()) => {
            literal::parse_int(digits, true).map(|i| Some(Value::Int32(i)))
        }
        _ => Ok(None),
    }
}

fn classify_operator(symbol: &'static str, expect_operand: bool) -> Result<Role> {
    if expect_operand {
        return UnaryOp::from_symbol(symbol)
            .map(Role::Unary)
            .ok_or_else(|| Error::InvalidName(symbol.to_string()));
    }
    BinaryOp::from_symbol(symbol)
        .map(Role::Binary)
        .or_else(|| UnaryOp::from_symbol(symbol).map(Role::Unary))
        .ok_or_else(|| Error::InvalidToken(symbol.to_string()))
}

/// A window without operators: exactly one operand, parentheses aside.
fn leaf(window: &[Token]) -> Result<Expr> {
    let mut operands = window
        .iter()
        .filter(|t| !matches!(t, Token::LeftParen | Token::RightParen));

    match (operands.next(), operands.next()) {
        (None, _) => Err(Error::EmptyExpression),
        (Some(token), None) => operand(token),
        (Some(_), Some(extra)) => Err(Error::InvalidToken(extra.to_string())),
    }
}

fn operand(token: &Token) -> Result<Expr> {
    match token {
        Token::Word(word) => Ok(match literal::classify(word)? {
            Atom::Literal(value) => Expr::Literal(value),
            Atom::Column(name) => Expr::Column(name),
        }),
        Token::Text(text) => Value::text_bytes(text).map(Expr::Literal),
        Token::Op(symbol) => Err(Error::InvalidName(symbol.to_string())),
        other => Err(Error::InvalidToken(other.to_string())),
    }
}
