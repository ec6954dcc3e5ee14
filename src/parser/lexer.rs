//! Lexer (tokenizer) for MiniLang source code
//!
//! Converts raw source text into a lazy [`Token`] stream consumed by the parser.
//! The lexer is an [`Iterator`] over `Result<Token, LexError>`: it yields tokens
//! one at a time, finishes with exactly one [`TokenKind::EndOfInput`], and stops
//! for good after the first error. Re-running a fresh [`Lexer`] over the same
//! text always produces the same sequence.

use super::ast::SourceLocation;
use rustc_hash::FxHashMap;
use std::fmt;
use thiserror::Error;
use tracing::trace;

/// All token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals
    Identifier,
    Number,
    String,

    // Keywords
    True,
    False,
    Function,
    If,
    Then,
    Else,
    While,
    Do,
    Return,
    Print,
    Input,
    And,
    Or,
    Not,

    // Operators
    Plus,         // +
    Minus,        // -
    Star,         // *
    Slash,        // /
    Assign,       // =
    EqualEqual,   // ==
    NotEqual,     // !=
    Less,         // <
    LessEqual,    // <=
    Greater,      // >
    GreaterEqual, // >=

    // Punctuation
    LeftParen,  // (
    RightParen, // )
    LeftBrace,  // {
    RightBrace, // }
    Comma,      // ,
    Semicolon,  // ;

    EndOfInput,
}

impl TokenKind {
    /// Whether a declaration or statement keyword starts here.
    ///
    /// The parser stops skipping tokens at these during error recovery.
    pub fn starts_statement(self) -> bool {
        matches!(
            self,
            TokenKind::Function | TokenKind::If | TokenKind::While | TokenKind::Print
        )
    }
}

/// A single lexical unit with its source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text of the token; string literals exclude their quotes
    pub lexeme: String,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, location: SourceLocation) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            location,
        }
    }
}

/// Debug listing format: `Kind 'lexeme' (line:column)`
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} '{}' ({}:{})",
            self.kind, self.lexeme, self.location.line, self.location.column
        )
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[Lex] line {}, col {}: {message}", .location.line, .location.column)]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

fn keyword_table() -> FxHashMap<&'static str, TokenKind> {
    let mut keywords = FxHashMap::default();
    keywords.insert("true", TokenKind::True);
    keywords.insert("false", TokenKind::False);
    keywords.insert("function", TokenKind::Function);
    keywords.insert("if", TokenKind::If);
    keywords.insert("then", TokenKind::Then);
    keywords.insert("else", TokenKind::Else);
    keywords.insert("while", TokenKind::While);
    keywords.insert("do", TokenKind::Do);
    keywords.insert("return", TokenKind::Return);
    keywords.insert("print", TokenKind::Print);
    keywords.insert("input", TokenKind::Input);
    keywords.insert("and", TokenKind::And);
    keywords.insert("or", TokenKind::Or);
    keywords.insert("not", TokenKind::Not);
    keywords
}

/// Lexer for MiniLang source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    keywords: FxHashMap<&'static str, TokenKind>,
    finished: bool,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            keywords: keyword_table(),
            finished: false,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(self) -> Result<Vec<Token>, LexError> {
        let tokens: Vec<Token> = self.collect::<Result<_, _>>()?;
        trace!(count = tokens.len(), "tokenized source");
        Ok(tokens)
    }

    /// Scan the next token, producing `EndOfInput` once the source is exhausted
    fn scan_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace_and_comments();

        let loc = self.current_location();
        let Some(ch) = self.advance() else {
            return Ok(Token::new(TokenKind::EndOfInput, "", loc));
        };

        let single =
            |kind: TokenKind| -> Result<Token, LexError> { Ok(Token::new(kind, ch.to_string(), loc)) };

        match ch {
            '(' => single(TokenKind::LeftParen),
            ')' => single(TokenKind::RightParen),
            '{' => single(TokenKind::LeftBrace),
            '}' => single(TokenKind::RightBrace),
            ',' => single(TokenKind::Comma),
            ';' => single(TokenKind::Semicolon),
            '+' => single(TokenKind::Plus),
            '-' => single(TokenKind::Minus),
            '*' => single(TokenKind::Star),
            '/' => single(TokenKind::Slash),

            '=' => Ok(self.one_or_two(TokenKind::Assign, TokenKind::EqualEqual, loc)),
            '<' => Ok(self.one_or_two(TokenKind::Less, TokenKind::LessEqual, loc)),
            '>' => Ok(self.one_or_two(TokenKind::Greater, TokenKind::GreaterEqual, loc)),
            '!' => {
                if self.match_char('=') {
                    Ok(Token::new(TokenKind::NotEqual, "!=", loc))
                } else {
                    Err(LexError {
                        message: "Unexpected '!'. Did you mean '!='?".to_string(),
                        location: loc,
                    })
                }
            }

            '"' => self.string_literal(loc),

            c if c.is_ascii_digit() => Ok(self.number_literal(ch, loc)),

            c if c.is_alphabetic() || c == '_' => Ok(self.identifier_or_keyword(ch, loc)),

            _ => Err(LexError {
                message: format!("Unexpected character '{}'", ch),
                location: loc,
            }),
        }
    }

    /// `X` or `X=`, for the comparison and assignment operators
    fn one_or_two(&mut self, single: TokenKind, with_eq: TokenKind, loc: SourceLocation) -> Token {
        let first = self.input[self.position - 1];
        if self.match_char('=') {
            Token::new(with_eq, format!("{}=", first), loc)
        } else {
            Token::new(single, first.to_string(), loc)
        }
    }

    /// Parse string literal; the opening quote is already consumed
    fn string_literal(&mut self, loc: SourceLocation) -> Result<Token, LexError> {
        let mut string = String::new();

        while let Some(ch) = self.advance() {
            if ch == '"' {
                return Ok(Token::new(TokenKind::String, string, loc));
            }
            string.push(ch);
        }

        Err(LexError {
            message: "Unterminated string".to_string(),
            location: loc,
        })
    }

    /// Parse numeric literal (digits only; range is checked by the parser)
    fn number_literal(&mut self, first_digit: char, loc: SourceLocation) -> Token {
        let mut digits = String::new();
        digits.push(first_digit);

        while let Some(ch) = self.peek() {
            if !ch.is_ascii_digit() {
                break;
            }
            digits.push(ch);
            self.advance();
        }

        Token::new(TokenKind::Number, digits, loc)
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&mut self, first_char: char, loc: SourceLocation) -> Token {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if !(ch.is_alphanumeric() || ch == '_') {
                break;
            }
            ident.push(ch);
            self.advance();
        }

        let kind = self
            .keywords
            .get(ident.as_str())
            .copied()
            .unwrap_or(TokenKind::Identifier);
        Token::new(kind, ident, loc)
    }

    /// Skip whitespace and `//` comments
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') | Some('\n') => {
                    self.advance();
                }
                Some('/') if self.peek_ahead(1) == Some('/') => {
                    while let Some(ch) = self.peek() {
                        if ch == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = *self.input.get(self.position)?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    /// Get current source location
    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

impl Iterator for Lexer {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let result = self.scan_token();
        match &result {
            Ok(token) if token.kind == TokenKind::EndOfInput => self.finished = true,
            Ok(_) => {}
            Err(_) => self.finished = true,
        }
        Some(result)
    }
}

impl std::iter::FusedIterator for Lexer {}
