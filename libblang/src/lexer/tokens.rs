// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The tokens module defines the tokens that the lexer produces.

use crate::lexer::SourceLocation;

use std::fmt;

/// A token produced by lexical analysis.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Token {
    pub token_type: TokenType,
    pub location: SourceLocation,
}

impl Token {
    /// Creates a token with a default (zeroed) source location. Intended for tests which compare
    /// token types only.
    pub fn without_location(token_type: TokenType) -> Self {
        Token { token_type, location: SourceLocation::default() }
    }

    /// Does the token have the given type?
    pub fn has_type(&self, token_type: &TokenType) -> bool {
        self.token_type == *token_type
    }
}

/// Types of tokens produced by lexical analysis.
///
/// B keywords are distinct token types rather than identifiers, since the language reserves them
/// outright.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum TokenType {
    // End of the source stream
    Eof,

    // Value tokens
    Identifier(String),
    IntLiteral(u64),
    CharLiteral(u64),
    StringLiteral(String),

    // Punctuation
    OpenBrace,
    CloseBrace,
    OpenParen,
    CloseParen,
    OpenSqBracket,
    CloseSqBracket,
    LogicalNot,
    Multiply, // Or dereference
    Divide,
    Remainder,
    BitwiseAnd, // Or address-of
    Plus,
    Increment,
    Minus,
    Decrement,
    LessThan,
    LessThanOrEqualTo,
    GreaterThan,
    GreaterThanOrEqualTo,
    BitwiseOr,
    Assignment,
    EqualTo,
    NotEqualTo,
    LeftShift,
    LeftShiftAssignment,
    RightShift,
    RightShiftAssignment,
    RemainderAssignment,
    BitwiseOrAssignment,
    BitwiseAndAssignment,
    AdditionAssignment,
    SubtractionAssignment,
    MultiplyAssignment,
    DivideAssignment,
    Ternary, // Aka conditional
    Colon,
    Semicolon,
    Comma,

    // Keywords
    Auto,
    Extrn,
    Case,
    If,
    Else,
    While,
    Switch,
    Goto,
    Return,
    Asm,
}

/// The B keyword table. Identifiers are matched against this after lexing.
const KEYWORDS: &[(&str, TokenType)] = &[
    ("auto", TokenType::Auto),
    ("extrn", TokenType::Extrn),
    ("case", TokenType::Case),
    ("if", TokenType::If),
    ("else", TokenType::Else),
    ("while", TokenType::While),
    ("switch", TokenType::Switch),
    ("goto", TokenType::Goto),
    ("return", TokenType::Return),
    ("__asm__", TokenType::Asm),
];

/// Looks up the keyword token type for the given identifier, or None if it is an ordinary name.
pub fn keyword_from_identifier(name: &str) -> Option<TokenType> {
    KEYWORDS.iter().find(|(keyword, _)| *keyword == name).map(|(_, token_type)| token_type.clone())
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenType::Eof => "end of file",
            TokenType::Identifier(_) => "identifier",
            TokenType::IntLiteral(_) => "integer literal",
            TokenType::CharLiteral(_) => "character literal",
            TokenType::StringLiteral(_) => "string literal",
            TokenType::OpenBrace => "`{`",
            TokenType::CloseBrace => "`}`",
            TokenType::OpenParen => "`(`",
            TokenType::CloseParen => "`)`",
            TokenType::OpenSqBracket => "`[`",
            TokenType::CloseSqBracket => "`]`",
            TokenType::LogicalNot => "`!`",
            TokenType::Multiply => "`*`",
            TokenType::Divide => "`/`",
            TokenType::Remainder => "`%`",
            TokenType::BitwiseAnd => "`&`",
            TokenType::Plus => "`+`",
            TokenType::Increment => "`++`",
            TokenType::Minus => "`-`",
            TokenType::Decrement => "`--`",
            TokenType::LessThan => "`<`",
            TokenType::LessThanOrEqualTo => "`<=`",
            TokenType::GreaterThan => "`>`",
            TokenType::GreaterThanOrEqualTo => "`>=`",
            TokenType::BitwiseOr => "`|`",
            TokenType::Assignment => "`=`",
            TokenType::EqualTo => "`==`",
            TokenType::NotEqualTo => "`!=`",
            TokenType::LeftShift => "`<<`",
            TokenType::LeftShiftAssignment => "`<<=`",
            TokenType::RightShift => "`>>`",
            TokenType::RightShiftAssignment => "`>>=`",
            TokenType::RemainderAssignment => "`%=`",
            TokenType::BitwiseOrAssignment => "`|=`",
            TokenType::BitwiseAndAssignment => "`&=`",
            TokenType::AdditionAssignment => "`+=`",
            TokenType::SubtractionAssignment => "`-=`",
            TokenType::MultiplyAssignment => "`*=`",
            TokenType::DivideAssignment => "`/=`",
            TokenType::Ternary => "`?`",
            TokenType::Colon => "`:`",
            TokenType::Semicolon => "`;`",
            TokenType::Comma => "`,`",
            TokenType::Auto => "keyword `auto`",
            TokenType::Extrn => "keyword `extrn`",
            TokenType::Case => "keyword `case`",
            TokenType::If => "keyword `if`",
            TokenType::Else => "keyword `else`",
            TokenType::While => "keyword `while`",
            TokenType::Switch => "keyword `switch`",
            TokenType::Goto => "keyword `goto`",
            TokenType::Return => "keyword `return`",
            TokenType::Asm => "keyword `__asm__`",
        };
        write!(f, "{text}")
    }
}
