// Copyright 2025-2026 Neil Henderson
//
//! The `lexer` module performs lexical analysis of B source code.
//!
//! This is a pull lexer: the compiler requests one token at a time with [Lexer::next_token], and
//! gets one token of lookahead by capturing the [ParsePoint] beforehand and rewinding on a
//! mismatch. Block comments may span lines, so the lexer cursors over the whole source rather
//! than line by line.

mod source_location;
mod tokens;


use crate::compiler_driver::Driver;
use crate::compiler_driver::diagnostics::Diagnostic;

pub use source_location::SourceLocation;
pub use tokens::{Token, TokenType, keyword_from_identifier};

/// A resumable cursor into the source byte stream.
///
/// Rewinding the lexer to a previously captured parse point replays the token stream from that
/// point; no tokens may be buffered across a rewind.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ParsePoint {
    offset: usize,
    line_start: usize,
    line_number: usize,
}

/// The punctuation table. Entries are tried in order, so a token must come before any of its
/// prefixes (`--` before `-=` before `-`).
const PUNCTS: &[(&str, TokenType)] = &[
    ("?", TokenType::Ternary),
    ("{", TokenType::OpenBrace),
    ("}", TokenType::CloseBrace),
    ("(", TokenType::OpenParen),
    (")", TokenType::CloseParen),
    ("[", TokenType::OpenSqBracket),
    ("]", TokenType::CloseSqBracket),
    (";", TokenType::Semicolon),
    (":", TokenType::Colon),
    (",", TokenType::Comma),
    ("--", TokenType::Decrement),
    ("-=", TokenType::SubtractionAssignment),
    ("-", TokenType::Minus),
    ("++", TokenType::Increment),
    ("+=", TokenType::AdditionAssignment),
    ("+", TokenType::Plus),
    ("*=", TokenType::MultiplyAssignment),
    ("*", TokenType::Multiply),
    ("%=", TokenType::RemainderAssignment),
    ("%", TokenType::Remainder),
    ("/=", TokenType::DivideAssignment),
    ("/", TokenType::Divide),
    ("|=", TokenType::BitwiseOrAssignment),
    ("|", TokenType::BitwiseOr),
    ("&=", TokenType::BitwiseAndAssignment),
    ("&", TokenType::BitwiseAnd),
    ("==", TokenType::EqualTo),
    ("=", TokenType::Assignment),
    ("!=", TokenType::NotEqualTo),
    ("!", TokenType::LogicalNot),
    ("<<=", TokenType::LeftShiftAssignment),
    ("<<", TokenType::LeftShift),
    ("<=", TokenType::LessThanOrEqualTo),
    ("<", TokenType::LessThan),
    (">>=", TokenType::RightShiftAssignment),
    (">>", TokenType::RightShift),
    (">=", TokenType::GreaterThanOrEqualTo),
    (">", TokenType::GreaterThan),
];

/// The blang lexer.
pub struct Lexer<'a> {
    src: &'a [u8],
    parse_point: ParsePoint,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer over the given source text.
    pub fn new(source: &'a str) -> Self {
        Self { src: source.as_bytes(), parse_point: ParsePoint { offset: 0, line_start: 0, line_number: 1 } }
    }

    /// Captures the current parse point.
    pub fn parse_point(&self) -> ParsePoint {
        self.parse_point
    }

    /// Rewinds the lexer to a previously captured parse point.
    pub fn rewind(&mut self, parse_point: ParsePoint) {
        self.parse_point = parse_point;
    }

    /// The source location of the byte the cursor is currently pointing at.
    pub fn location(&self) -> SourceLocation {
        SourceLocation {
            line: self.parse_point.line_number,
            column: self.parse_point.offset - self.parse_point.line_start + 1,
        }
    }

    fn is_eof(&self) -> bool {
        self.parse_point.offset >= self.src.len()
    }

    fn peek_char(&self) -> Option<u8> {
        self.src.get(self.parse_point.offset).copied()
    }

    fn skip_char(&mut self) {
        let Some(ch) = self.peek_char() else {
            return;
        };
        self.parse_point.offset += 1;
        if ch == b'\n' {
            self.parse_point.line_start = self.parse_point.offset;
            self.parse_point.line_number += 1;
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(|ch| ch.is_ascii_whitespace()) {
            self.skip_char();
        }
    }

    /// Consumes the given prefix if the cursor points at it, or leaves the cursor untouched.
    fn skip_prefix(&mut self, prefix: &str) -> bool {
        let saved = self.parse_point;
        for expected in prefix.bytes() {
            if self.peek_char() != Some(expected) {
                self.parse_point = saved;
                return false;
            }
            self.skip_char();
        }
        true
    }

    /// Skips ahead until just past the given prefix, or to the end of the source.
    fn skip_until(&mut self, prefix: &str) {
        while !self.is_eof() && !self.skip_prefix(prefix) {
            self.skip_char();
        }
    }

    /// Advances past the next token in the source and returns it.
    ///
    /// At the end of the source this returns an [TokenType::Eof] token (repeatedly, if asked
    /// again). A hard lexical error records a diagnostic on the driver and returns `Err`.
    pub fn next_token(&mut self, driver: &mut Driver) -> Result<Token, ()> {
        loop {
            self.skip_whitespace();
            if self.skip_prefix("//") {
                self.skip_until("\n");
                continue;
            }
            if self.skip_prefix("/*") {
                // Block comments do not nest.
                self.skip_until("*/");
                continue;
            }
            break;
        }

        let location = self.location();

        let Some(ch) = self.peek_char() else {
            return Ok(Token { token_type: TokenType::Eof, location });
        };

        for (text, token_type) in PUNCTS {
            if self.skip_prefix(text) {
                return Ok(Token { token_type: token_type.clone(), location });
            }
        }

        if is_identifier_start(ch) {
            let mut name = String::new();
            while let Some(ch) = self.peek_char() {
                if !is_identifier(ch) {
                    break;
                }
                name.push(ch as char);
                self.skip_char();
            }
            let token_type = keyword_from_identifier(&name).unwrap_or(TokenType::Identifier(name));
            return Ok(Token { token_type, location });
        }

        if self.skip_prefix("0x") {
            let mut value: u64 = 0;
            while let Some(digit) = self.peek_char().and_then(|ch| (ch as char).to_digit(16)) {
                value = value.wrapping_mul(16).wrapping_add(digit as u64);
                self.skip_char();
            }
            return Ok(Token { token_type: TokenType::IntLiteral(value), location });
        }

        if self.skip_prefix("0") {
            let mut value: u64 = 0;
            while let Some(ch) = self.peek_char() {
                if !(b'0'..=b'7').contains(&ch) {
                    break;
                }
                value = value.wrapping_mul(8).wrapping_add((ch - b'0') as u64);
                self.skip_char();
            }
            return Ok(Token { token_type: TokenType::IntLiteral(value), location });
        }

        if ch.is_ascii_digit() {
            let mut value: u64 = 0;
            while let Some(ch) = self.peek_char() {
                if !ch.is_ascii_digit() {
                    break;
                }
                value = value.wrapping_mul(10).wrapping_add((ch - b'0') as u64);
                self.skip_char();
            }
            return Ok(Token { token_type: TokenType::IntLiteral(value), location });
        }

        if ch == b'"' {
            self.skip_char();
            let bytes = self.lex_quoted_bytes(driver, b'"', location)?;
            if self.is_eof() {
                driver.add_diagnostic(Diagnostic::error_at_location("Unfinished string literal".to_string(), location));
                return Err(());
            }
            self.skip_char(); // Closing quote

            // The bytes were copied verbatim out of a UTF-8 source (escapes decode to ASCII), so
            // they still form a valid string.
            let value = String::from_utf8(bytes).expect("string literal bytes come from UTF-8 source");
            return Ok(Token { token_type: TokenType::StringLiteral(value), location });
        }

        if ch == b'\'' {
            self.skip_char();
            let bytes = self.lex_quoted_bytes(driver, b'\'', location)?;
            if self.is_eof() {
                driver.add_diagnostic(Diagnostic::error_at_location(
                    "Unfinished character literal".to_string(),
                    location,
                ));
                return Err(());
            }
            self.skip_char(); // Closing quote

            if bytes.is_empty() {
                driver.add_diagnostic(Diagnostic::error_at_location("Empty character literal".to_string(), location));
                return Err(());
            }
            if bytes.len() > 2 {
                driver.add_diagnostic(Diagnostic::error_at_location(
                    "Character literal contains more than two characters".to_string(),
                    location,
                ));
                return Err(());
            }

            // A character literal packs its 1 or 2 bytes big-endian into a word.
            let mut value: u64 = 0;
            for byte in &bytes {
                value = value * 0x100 + *byte as u64;
            }
            return Ok(Token { token_type: TokenType::CharLiteral(value), location });
        }

        driver.add_diagnostic(Diagnostic::error_at_location(
            format!("Unknown token starts with `{}`", ch as char),
            location,
        ));
        Err(())
    }

    /// Lexes the body of a string or character literal up to (not including) the closing
    /// delimiter, decoding escape sequences. The caller deals with an unterminated literal.
    fn lex_quoted_bytes(&mut self, driver: &mut Driver, delim: u8, location: SourceLocation) -> Result<Vec<u8>, ()> {
        let mut bytes = Vec::new();
        while let Some(ch) = self.peek_char() {
            if ch == b'\\' {
                self.skip_char();
                let Some(escaped) = self.peek_char() else {
                    driver.add_diagnostic(Diagnostic::error_at_location(
                        "Unfinished escape sequence".to_string(),
                        location,
                    ));
                    return Err(());
                };
                let decoded = match escaped {
                    b'0' => 0,
                    b'n' => b'\n',
                    b't' => b'\t',
                    b'\\' => b'\\',
                    _ if escaped == delim => delim,
                    _ => {
                        driver.add_diagnostic(Diagnostic::error_at_location(
                            format!("Unknown escape sequence starting with `{}`", escaped as char),
                            location,
                        ));
                        return Err(());
                    }
                };
                bytes.push(decoded);
                self.skip_char();
            } else if ch == delim {
                break;
            } else {
                bytes.push(ch);
                self.skip_char();
            }
        }
        Ok(bytes)
    }
}

fn is_identifier_start(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_'
}

fn is_identifier(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || ch == b'_'
}
