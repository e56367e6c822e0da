//! Lexer (tokenizer) for C source code
//!
//! Converts raw source text into a lazy [`Token`] stream consumed by the
//! declaration extractor. The lexer only needs to be precise about the things
//! that affect brace and paren depth: comments, string literals and character
//! literals are consumed whole so that a `{` or `;` inside them never reaches
//! the extractor as punctuation.
//!
//! Preprocessor directives are skipped up to the end of the (possibly
//! continued) line and produce no tokens. A block comment opened on a
//! directive line is skipped whole, even when it runs past that line.

use super::ast::SourceLocation;
use std::fmt;
use thiserror::Error;

/// C keywords recognized by the lexer (C89 through C11)
const KEYWORDS: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "register",
    "restrict", "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef",
    "union", "unsigned", "void", "volatile", "while", "_Alignas", "_Alignof", "_Atomic",
    "_Bool", "_Complex", "_Generic", "_Imaginary", "_Noreturn", "_Static_assert",
    "_Thread_local",
];

/// Multi-character punctuators, longest first so the first match wins
const PUNCTUATORS: &[&str] = &[
    "...", "<<=", ">>=", "->", "++", "--", "<<", ">>", "<=", ">=", "==", "!=", "&&", "||",
    "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "##",
];

/// Encoding prefixes that may be glued to a string or character literal
const LITERAL_PREFIXES: &[&str] = &["L", "u", "U", "u8"];

/// Single-character punctuators of the C source character set
const SINGLE_PUNCTUATORS: &str = "[](){}.&*+-~!/%<>^|?:;=,#";

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Broad classification of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    Keyword,
    Punctuation,
    Literal,
    Comment,
}

/// A single lexeme with its position in the source text.
///
/// `offset` is the byte offset of the first character; `location` is the
/// same position as a 1-based line and column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub offset: usize,
    pub location: SourceLocation,
}

impl Token {
    pub fn is_punct(&self, punct: &str) -> bool {
        self.kind == TokenKind::Punctuation && self.text == punct
    }

    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == keyword
    }

    pub fn is_identifier(&self) -> bool {
        self.kind == TokenKind::Identifier
    }

    pub fn is_comment(&self) -> bool {
        self.kind == TokenKind::Comment
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Identifier => write!(f, "identifier '{}'", self.text),
            TokenKind::Keyword => write!(f, "'{}'", self.text),
            TokenKind::Punctuation => write!(f, "'{}'", self.text),
            TokenKind::Literal => write!(f, "literal {}", self.text),
            TokenKind::Comment => write!(f, "comment"),
        }
    }
}

/// Lexer error type. Every variant is fatal to the current run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("unterminated string literal starting at {location}")]
    UnterminatedString {
        offset: usize,
        location: SourceLocation,
    },

    #[error("unterminated character literal starting at {location}")]
    UnterminatedChar {
        offset: usize,
        location: SourceLocation,
    },

    #[error("unterminated block comment starting at {location}")]
    UnterminatedComment {
        offset: usize,
        location: SourceLocation,
    },

    #[error("unexpected character {ch:?} at {location}")]
    UnexpectedCharacter {
        ch: char,
        offset: usize,
        location: SourceLocation,
    },
}

impl ScanError {
    /// Byte offset of the construct that was left open.
    pub fn offset(&self) -> usize {
        match self {
            ScanError::UnterminatedString { offset, .. }
            | ScanError::UnterminatedChar { offset, .. }
            | ScanError::UnterminatedComment { offset, .. }
            | ScanError::UnexpectedCharacter { offset, .. } => *offset,
        }
    }

    pub fn location(&self) -> SourceLocation {
        match self {
            ScanError::UnterminatedString { location, .. }
            | ScanError::UnterminatedChar { location, .. }
            | ScanError::UnterminatedComment { location, .. }
            | ScanError::UnexpectedCharacter { location, .. } => *location,
        }
    }
}

/// Start scanning `source`. The returned lexer yields tokens lazily and
/// stops after the first error. Calling `scan` again restarts from the top.
pub fn scan(source: &str) -> Lexer<'_> {
    Lexer::new(source)
}

/// Tokenize the entire input, stopping at the first error.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ScanError> {
    scan(source).collect()
}

/// Lexer for C source code
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    line: usize,
    column: usize,
    at_line_start: bool,
    finished: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source string.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: input.strip_prefix(BYTE_ORDER_MARK).map_or(0, |_| BYTE_ORDER_MARK.len_utf8()),
            line: 1,
            column: 1,
            at_line_start: true,
            finished: false,
        }
    }

    /// Get next token, or `None` at end of input
    fn next_token(&mut self) -> Result<Option<Token>, ScanError> {
        loop {
            self.skip_whitespace();
            if self.at_line_start && self.peek() == Some('#') {
                self.skip_preprocessor_directive()?;
                continue;
            }
            break;
        }

        let Some(ch) = self.peek() else {
            return Ok(None);
        };
        let start = self.position;
        let loc = self.current_location();
        self.at_line_start = false;

        let kind = match ch {
            '/' if self.peek_ahead(1) == Some('/') => {
                self.skip_line_comment();
                TokenKind::Comment
            }
            '/' if self.peek_ahead(1) == Some('*') => {
                self.skip_block_comment(start, loc)?;
                TokenKind::Comment
            }
            '"' | '\'' => {
                self.quoted_literal(start, loc)?;
                TokenKind::Literal
            }
            '0'..='9' => {
                self.number_literal();
                TokenKind::Literal
            }
            '.' if self.peek_ahead(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.number_literal();
                TokenKind::Literal
            }
            c if is_ident_start(c) => self.identifier_or_keyword()?,
            c if SINGLE_PUNCTUATORS.contains(c) => {
                self.punctuation();
                TokenKind::Punctuation
            }
            c => {
                return Err(ScanError::UnexpectedCharacter {
                    ch: c,
                    offset: start,
                    location: loc,
                })
            }
        };

        Ok(Some(Token {
            kind,
            text: self.input[start..self.position].to_string(),
            offset: start,
            location: loc,
        }))
    }

    /// Consume a string or character literal, escapes included.
    /// A raw newline or end of input before the closing quote is an error
    /// reported at the opening quote.
    fn quoted_literal(&mut self, offset: usize, location: SourceLocation) -> Result<(), ScanError> {
        let Some(quote) = self.advance() else {
            return Ok(());
        };
        let unterminated = || {
            if quote == '"' {
                ScanError::UnterminatedString { offset, location }
            } else {
                ScanError::UnterminatedChar { offset, location }
            }
        };

        loop {
            match self.advance() {
                None | Some('\n') => return Err(unterminated()),
                Some('\\') => {
                    // Escaped character (or escaped newline) never closes the literal
                    if self.advance().is_none() {
                        return Err(unterminated());
                    }
                }
                Some(c) if c == quote => return Ok(()),
                Some(_) => {}
            }
        }
    }

    /// Consume a numeric literal: digits, suffixes, hex digits, exponents.
    fn number_literal(&mut self) {
        let mut prev = '\0';
        while let Some(ch) = self.peek() {
            let exponent_sign = matches!(ch, '+' | '-') && matches!(prev, 'e' | 'E' | 'p' | 'P');
            if ch.is_ascii_alphanumeric() || ch == '_' || ch == '.' || exponent_sign {
                prev = ch;
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Parse identifier or keyword. An encoding prefix immediately followed
    /// by a quote becomes part of the literal.
    fn identifier_or_keyword(&mut self) -> Result<TokenKind, ScanError> {
        let start = self.position;
        while let Some(ch) = self.peek() {
            if is_ident_continue(ch) {
                self.advance();
            } else {
                break;
            }
        }

        let input = self.input;
        let ident = &input[start..self.position];
        if LITERAL_PREFIXES.contains(&ident) && matches!(self.peek(), Some('"' | '\'')) {
            let quote_offset = self.position;
            let quote_loc = self.current_location();
            self.quoted_literal(quote_offset, quote_loc)?;
            return Ok(TokenKind::Literal);
        }

        if KEYWORDS.contains(&ident) {
            Ok(TokenKind::Keyword)
        } else {
            Ok(TokenKind::Identifier)
        }
    }

    /// Consume the longest punctuator at the current position.
    fn punctuation(&mut self) {
        let rest = &self.input[self.position..];
        if let Some(punct) = PUNCTUATORS.iter().find(|p| rest.starts_with(**p)) {
            for _ in 0..punct.len() {
                self.advance();
            }
        } else {
            self.advance();
        }
    }

    /// Skip whitespace and backslash-newline line splices
    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else if !self.skip_line_splice() {
                break;
            }
        }
    }

    /// Step over `\` + newline (LF or CRLF). Returns false when the current
    /// position is not a line splice.
    fn skip_line_splice(&mut self) -> bool {
        let len = match (self.peek(), self.peek_ahead(1), self.peek_ahead(2)) {
            (Some('\\'), Some('\n'), _) => 2,
            (Some('\\'), Some('\r'), Some('\n')) => 3,
            _ => return false,
        };
        for _ in 0..len {
            self.advance();
        }
        true
    }

    /// Skip single-line comment (// ...), leaving the newline in place.
    /// A backslash at the end of the line continues the comment.
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            if !self.skip_line_splice() {
                self.advance();
            }
        }
    }

    /// Skip multi-line comment (/* ... */). Comments do not nest.
    fn skip_block_comment(&mut self, offset: usize, location: SourceLocation) -> Result<(), ScanError> {
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance();
                self.advance();
                return Ok(());
            }
            self.advance();
        }

        Err(ScanError::UnterminatedComment { offset, location })
    }

    /// Skip preprocessor directive (#include, #define, ...), following
    /// backslash continuations onto the next line. Comments and literals
    /// inside the directive are stepped over whole, so a `/*` that closes
    /// on a later line does not end the directive early.
    fn skip_preprocessor_directive(&mut self) -> Result<(), ScanError> {
        while let Some(ch) = self.peek() {
            match ch {
                '\n' => {
                    self.advance();
                    break;
                }
                '/' if self.peek_ahead(1) == Some('*') => {
                    let offset = self.position;
                    let location = self.current_location();
                    self.skip_block_comment(offset, location)?;
                }
                '/' if self.peek_ahead(1) == Some('/') => self.skip_line_comment(),
                '"' | '\'' => self.skip_directive_literal(),
                _ => {
                    if !self.skip_line_splice() {
                        self.advance();
                    }
                }
            }
        }
        Ok(())
    }

    /// Step over a quoted literal inside a directive. Text such as
    /// `#error don't` is not a literal, so a quote left open at the end of
    /// the line is not an error here.
    fn skip_directive_literal(&mut self) {
        let Some(quote) = self.advance() else {
            return;
        };
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                return;
            }
            self.advance();
            if ch == '\\' {
                self.advance();
            } else if ch == quote {
                return;
            }
        }
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input[self.position..].chars().nth(n)
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += ch.len_utf8();

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
            self.at_line_start = true;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_token() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

impl std::iter::FusedIterator for Lexer<'_> {}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || ch == '$'
}

fn is_ident_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '$'
}
