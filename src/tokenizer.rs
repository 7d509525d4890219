use std::fmt;

use crate::error::{Error, Result};
use crate::literal;

/// Represents the smallest meaningful units of statements and expressions.
///
/// Keywords are not distinguished from names here: the statement parser
/// recognizes them by comparing [Token::Word]s case-insensitively, so a column
/// may still be called `value` or `key` inside an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A run of letters, digits, `_` and `.`: a keyword, a (possibly dotted)
    /// name, an integer, a boolean or a `0x` byte string.
    Word(String),
    /// A quoted text literal, with its escape sequences already resolved.
    /// `\xHH` escapes may leave bytes that are not UTF-8.
    Text(Vec<u8>),
    /// One of `+ - * / % == != >= > <= < && || ^ ~ & | !`.
    Op(&'static str),

    // --- Symbols ---
    /// Left parenthesis `(`
    LeftParen,
    /// Right parenthesis `)`
    RightParen,
    /// Comma `,`
    Comma,
    /// Colon `:`
    Colon,
    /// Single `=`, as in `set a = 1` or `name: int32 = 0`
    Assign,
    /// Left brace `{`
    LeftBrace,
    /// Right brace `}`
    RightBrace,
    /// Left bracket `[`
    LeftBracket,
    /// Right bracket `]`
    RightBracket,
    /// Semicolon `;`
    Semicolon,

    // --- Special ---
    /// Represents the end of the input.
    Eof,
}

impl Token {
    /// Returns true if the token is the word `keyword`, ignoring case.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self, Token::Word(word) if word.eq_ignore_ascii_case(keyword))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Word(word) => f.write_str(word),
            Token::Text(text) => write!(f, "{:?}", String::from_utf8_lossy(text)),
            Token::Op(symbol) => f.write_str(symbol),
            Token::LeftParen => f.write_str("("),
            Token::RightParen => f.write_str(")"),
            Token::Comma => f.write_str(","),
            Token::Colon => f.write_str(":"),
            Token::Assign => f.write_str("="),
            Token::LeftBrace => f.write_str("{"),
            Token::RightBrace => f.write_str("}"),
            Token::LeftBracket => f.write_str("["),
            Token::RightBracket => f.write_str("]"),
            Token::Semicolon => f.write_str(";"),
            Token::Eof => f.write_str("end of input"),
        }
    }
}

/// A lexical scanner that converts raw text into a sequence of [Token]s.
pub struct Tokenizer {
    /// The input string stored as a vector of characters for easy iteration.
    input: Vec<char>,
    /// The current position in the character vector.
    position: usize,
}

impl Tokenizer {
    /// Creates a new Tokenizer for the given input string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Processes the entire input and returns a vector of tokens ending with
    /// [Token::Eof].
    ///
    /// # Errors
    /// Returns [Error::InvalidToken] for a character outside the grammar, an
    /// unterminated quote or a malformed escape sequence.
    ///
    /// # Example
    /// ```
    /// # use memdb::tokenizer::{Tokenizer, Token};
    /// let tokens = Tokenizer::new("a >= 10").tokenize().unwrap();
    /// assert_eq!(tokens[1], Token::Op(">="));
    /// ```
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();

        while !self.is_at_end() {
            self.skip_whitespace();

            if self.is_at_end() {
                break;
            }

            let token = self.next_token()?;
            tokens.push(token);
        }

        tokens.push(Token::Eof);
        Ok(tokens)
    }

    /// Identifies the next token based on the character at the current position.
    fn next_token(&mut self) -> Result<Token> {
        let ch = self.current_char();

        let symbol = match ch {
            '(' => Some(Token::LeftParen),
            ')' => Some(Token::RightParen),
            ',' => Some(Token::Comma),
            ':' => Some(Token::Colon),
            '{' => Some(Token::LeftBrace),
            '}' => Some(Token::RightBrace),
            '[' => Some(Token::LeftBracket),
            ']' => Some(Token::RightBracket),
            ';' => Some(Token::Semicolon),
            _ => None,
        };
        if let Some(token) = symbol {
            self.advance();
            return Ok(token);
        }

        match ch {
            '"' | '\'' => self.read_text(ch),
            c if c.is_alphanumeric() || c == '_' => Ok(self.read_word()),
            _ => self.read_operator(),
        }
    }

    // --- Navigation Helpers ---

    /// Returns the character at the current position.
    fn current_char(&self) -> char {
        self.input[self.position]
    }

    /// Returns the character after the current one, if any.
    fn peek_char(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    /// Moves the cursor forward by one character.
    fn advance(&mut self) {
        self.position += 1;
    }

    /// Checks if the cursor has reached the end of the input.
    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Consumes any whitespace characters (spaces, tabs, newlines).
    fn skip_whitespace(&mut self) {
        while !self.is_at_end() && self.current_char().is_whitespace() {
            self.advance();
        }
    }

    // --- Extraction Logic ---

    /// Reads a run of alphanumeric characters, underscores and dots.
    fn read_word(&mut self) -> Token {
        let mut word = String::new();

        while !self.is_at_end()
            && (self.current_char().is_alphanumeric()
                || self.current_char() == '_'
                || self.current_char() == '.')
        {
            word.push(self.current_char());
            self.advance();
        }

        Token::Word(word)
    }

    /// Reads an operator symbol, preferring the two-character form.
    fn read_operator(&mut self) -> Result<Token> {
        let ch = self.current_char();
        let next = self.peek_char();

        let (symbol, width) = match (ch, next) {
            ('=', Some('=')) => ("==", 2),
            ('!', Some('=')) => ("!=", 2),
            ('>', Some('=')) => (">=", 2),
            ('<', Some('=')) => ("<=", 2),
            ('&', Some('&')) => ("&&", 2),
            ('|', Some('|')) => ("||", 2),
            ('=', _) => {
                self.advance();
                return Ok(Token::Assign);
            }
            ('+', _) => ("+", 1),
            ('-', _) => ("-", 1),
            ('*', _) => ("*", 1),
            ('/', _) => ("/", 1),
            ('%', _) => ("%", 1),
            ('>', _) => (">", 1),
            ('<', _) => ("<", 1),
            ('&', _) => ("&", 1),
            ('|', _) => ("|", 1),
            ('^', _) => ("^", 1),
            ('~', _) => ("~", 1),
            ('!', _) => ("!", 1),
            (other, _) => return Err(Error::InvalidToken(other.to_string())),
        };

        self.position += width;
        Ok(Token::Op(symbol))
    }

    /// Reads a text literal enclosed in `quote` and resolves its escapes.
    fn read_text(&mut self, quote: char) -> Result<Token> {
        self.advance(); // Skip the opening quote

        let mut raw = String::new();
        while !self.is_at_end() && self.current_char() != quote {
            if self.current_char() == '\\' {
                raw.push('\\');
                self.advance();
                if self.is_at_end() {
                    break;
                }
            }
            raw.push(self.current_char());
            self.advance();
        }

        if self.is_at_end() {
            return Err(Error::InvalidToken(format!("{quote}{raw}")));
        }

        // Skip the closing quote
        self.advance();

        literal::unescape(&raw).map(Token::Text)
    }
}
