use crate::ast::*;
use crate::column::{Attributes, Column};
use crate::data_type::DataType;
use crate::error::{Error, Result};
use crate::expr_parser;
use crate::expression::Expression;
use crate::literal::{self, Atom};
use crate::tokenizer::{Token, Tokenizer};
use crate::value::Value;

/// Tokenizes and parses a single statement.
pub fn parse(sql: &str) -> Result<Statement> {
    let tokens = Tokenizer::new(sql).tokenize()?;
    Parser::new(tokens).parse()
}

/// Recursive-descent parser for statements.
///
/// Expressions are not parsed here: the tokens of a `where` clause or of a
/// `set` assignment are cut out as a window and handed to [expr_parser].
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    /// `tokens` must end with [Token::Eof], as produced by [Tokenizer::tokenize].
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last() != Some(&Token::Eof) {
            tokens.push(Token::Eof);
        }
        Self {
            tokens,
            position: 0,
        }
    }

    pub fn parse(&mut self) -> Result<Statement> {
        let keyword = match self.current_token() {
            Token::Word(word) => word.to_ascii_lowercase(),
            _ => String::new(),
        };
        let statement = match keyword.as_str() {
            "create" => Statement::CreateTable(self.parse_create_table()?),
            "insert" => Statement::Insert(self.parse_insert()?),
            "select" => Statement::Select(self.parse_select()?),
            "update" => Statement::Update(self.parse_update()?),
            "delete" => Statement::Delete(self.parse_delete()?),
            _ => {
                return Err(Error::Syntax(format!(
                    "unexpected token {}",
                    self.current_token()
                )));
            }
        };

        // the semicolon is optional
        if matches!(self.current_token(), Token::Semicolon) {
            self.advance();
        }

        // Check we are at the end of the statement
        if !self.is_at_end() {
            return Err(Error::Syntax(format!(
                "unexpected token after statement: {}",
                self.current_token()
            )));
        }

        Ok(statement)
    }

    // --- Helpers ---

    fn current_token(&self) -> &Token {
        &self.tokens[self.position]
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        matches!(self.current_token(), Token::Eof)
    }

    fn unexpected(&self, expected: &str) -> Error {
        Error::Syntax(format!("expected {expected}, found {}", self.current_token()))
    }

    fn consume(&mut self, expected: Token) -> Result<()> {
        if *self.current_token() == expected {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(&expected.to_string()))
        }
    }

    fn consume_keyword(&mut self, keyword: &str) -> Result<()> {
        if self.current_token().is_keyword(keyword) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(keyword))
        }
    }

    /// Consumes `keyword` if it is the current token.
    fn accept_keyword(&mut self, keyword: &str) -> bool {
        let found = self.current_token().is_keyword(keyword);
        if found {
            self.advance();
        }
        found
    }

    fn accept(&mut self, token: Token) -> bool {
        let found = *self.current_token() == token;
        if found {
            self.advance();
        }
        found
    }

    /// A table name: a plain identifier.
    fn consume_table_name(&mut self) -> Result<String> {
        match self.current_token() {
            Token::Word(word) if literal::column_name(word).is_ok_and(|n| n == word.as_str()) => {
                let name = word.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("table name")),
        }
    }

    /// A column name; of a dotted name only the last segment is kept.
    fn consume_column_name(&mut self) -> Result<String> {
        match self.current_token() {
            Token::Word(word) => {
                let name = literal::column_name(word)
                    .map_err(|_| self.unexpected("column name"))?
                    .to_string();
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("column name")),
        }
    }

    /// A literal value, with an optional `-` before integers.
    fn parse_literal(&mut self) -> Result<Value> {
        match self.current_token().clone() {
            Token::Op("-") => {
                self.advance();
                match self.current_token().clone() {
                    Token::Word(digits) => {
                        self.advance();
                        literal::parse_int(&digits, true).map(Value::Int32)
                    }
                    _ => Err(self.unexpected("integer")),
                }
            }
            Token::Word(word) => match literal::classify(&word)? {
                Atom::Literal(value) => {
                    self.advance();
                    Ok(value)
                }
                Atom::Column(_) => Err(self.unexpected("literal")),
            },
            Token::Text(text) => {
                self.advance();
                Value::text_bytes(&text)
            }
            _ => Err(self.unexpected("literal")),
        }
    }

    /// Cuts out the tokens of an expression and parses them.
    ///
    /// The window ends at the end of the statement, at a `)` closing an
    /// enclosing parenthesis, or at depth 0 on a `,` (if `stop_at_comma`) or
    /// on one of `stop_words`.
    fn parse_expression(&mut self, stop_words: &[&str], stop_at_comma: bool) -> Result<Expression> {
        let start = self.position;
        let mut depth = 0usize;

        loop {
            match self.current_token() {
                Token::Eof | Token::Semicolon => break,
                Token::RightParen if depth == 0 => break,
                Token::Comma if depth == 0 && stop_at_comma => break,
                token if depth == 0 && stop_words.iter().any(|w| token.is_keyword(w)) => break,
                Token::LeftParen => depth += 1,
                Token::RightParen => depth -= 1,
                _ => {}
            }
            self.advance();
        }

        expr_parser::parse_tokens(&self.tokens[start..self.position]).map(Expression::new)
    }

    /// `[ where <expression> ]`
    fn parse_where(&mut self) -> Result<Expression> {
        if self.accept_keyword("where") {
            self.parse_expression(&[], false)
        } else {
            Ok(Expression::always())
        }
    }

    // --- Statements ---

    fn parse_create_table(&mut self) -> Result<CreateTable> {
        self.consume_keyword("create")?;
        self.consume_keyword("table")?;
        let name = self.consume_table_name()?;
        self.consume(Token::LeftParen)?;
        let mut columns = vec![];
        loop {
            columns.push(self.parse_column_def()?);
            match self.current_token() {
                Token::RightParen => {
                    self.advance();
                    break;
                }
                Token::Comma => {
                    self.advance();
                    continue;
                }
                _ => return Err(self.unexpected("',' or ')'")),
            }
        }
        Ok(CreateTable { name, columns })
    }

    /// `[ { attr, ... } ] name : type [ = literal ]`
    fn parse_column_def(&mut self) -> Result<Column> {
        let mut attributes = Attributes::NONE;
        if self.accept(Token::LeftBrace) {
            loop {
                let flag = match self.current_token() {
                    Token::Word(word) => Attributes::from_keyword(&word.to_ascii_lowercase()),
                    _ => None,
                };
                attributes |= flag.ok_or_else(|| self.unexpected("key, unique or autoincrement"))?;
                self.advance();
                if !self.accept(Token::Comma) {
                    break;
                }
            }
            self.consume(Token::RightBrace)?;
        }

        let name = self.consume_column_name()?;
        self.consume(Token::Colon)?;
        let data_type = self.consume_data_type()?;

        let mut column = Column::new(name, data_type).with_attributes(attributes);
        if self.accept(Token::LeftBracket) {
            let width = match self.current_token() {
                Token::Word(digits) => digits.parse::<usize>().ok(),
                _ => None,
            }
            .ok_or_else(|| self.unexpected("column width"))?;
            self.advance();
            self.consume(Token::RightBracket)?;
            column = column.with_width(width);
        }
        if self.accept(Token::Assign) {
            column = column.with_default(self.parse_literal()?);
        }

        column.validate()?;
        Ok(column)
    }

    fn consume_data_type(&mut self) -> Result<DataType> {
        let data_type = match self.current_token() {
            Token::Word(word) => match word.to_ascii_lowercase().as_str() {
                "int32" => Some(DataType::Int32),
                "bool" => Some(DataType::Bool),
                "string" => Some(DataType::Text),
                "bytes" => Some(DataType::Bytes),
                _ => None,
            },
            _ => None,
        }
        .ok_or_else(|| self.unexpected("int32, bool, string or bytes"))?;
        self.advance();
        Ok(data_type)
    }

    /// `insert ( ... ) to <table>`
    fn parse_insert(&mut self) -> Result<Insert> {
        self.consume_keyword("insert")?;
        self.consume(Token::LeftParen)?;

        let named = matches!(self.current_token(), Token::Word(_))
            && self.tokens.get(self.position + 1) == Some(&Token::Assign);
        let values = if named {
            InsertValues::Named(self.parse_named_values()?)
        } else {
            InsertValues::Positional(self.parse_positional_values()?)
        };

        self.consume_keyword("to")?;
        let table = self.consume_table_name()?;
        Ok(Insert { table, values })
    }

    fn parse_positional_values(&mut self) -> Result<Vec<Option<Value>>> {
        let mut slots = vec![];
        loop {
            let slot = match self.current_token() {
                Token::Comma | Token::RightParen => None,
                _ => Some(self.parse_literal()?),
            };
            slots.push(slot);
            if self.accept(Token::RightParen) {
                return Ok(slots);
            }
            self.consume(Token::Comma)?;
        }
    }

    fn parse_named_values(&mut self) -> Result<Vec<(String, Value)>> {
        let mut values = vec![];
        loop {
            let name = self.consume_column_name()?;
            self.consume(Token::Assign)?;
            values.push((name, self.parse_literal()?));
            if self.accept(Token::RightParen) {
                return Ok(values);
            }
            self.consume(Token::Comma)?;
        }
    }

    /// `select <cols> | * from <table> | ( <select> ) [ where <expression> ]`
    fn parse_select(&mut self) -> Result<Select> {
        self.consume_keyword("select")?;

        let projection = if self.accept(Token::Op("*")) {
            Projection::All
        } else {
            let mut columns = vec![self.consume_column_name()?];
            while self.accept(Token::Comma) {
                columns.push(self.consume_column_name()?);
            }
            Projection::Columns(columns)
        };

        self.consume_keyword("from")?;
        let source = if self.accept(Token::LeftParen) {
            let inner = self.parse_select()?;
            self.consume(Token::RightParen)?;
            TableSource::Subquery(Box::new(inner))
        } else {
            TableSource::Named(self.consume_table_name()?)
        };

        let predicate = self.parse_where()?;
        Ok(Select {
            projection,
            source,
            predicate,
        })
    }

    /// `update <table> set <col> = <expression>, ... [ where <expression> ]`
    fn parse_update(&mut self) -> Result<Update> {
        self.consume_keyword("update")?;
        let table = self.consume_table_name()?;
        self.consume_keyword("set")?;

        let mut assignments = vec![];
        loop {
            let column = self.consume_column_name()?;
            self.consume(Token::Assign)?;
            let expr = self.parse_expression(&["where"], true)?;
            assignments.push((column, expr));
            if !self.accept(Token::Comma) {
                break;
            }
        }

        let predicate = self.parse_where()?;
        Ok(Update {
            table,
            assignments,
            predicate,
        })
    }

    /// `delete <table> [ where <expression> ]`
    fn parse_delete(&mut self) -> Result<Delete> {
        self.consume_keyword("delete")?;
        let table = self.consume_table_name()?;
        let predicate = self.parse_where()?;
        Ok(Delete { table, predicate })
    }
}
