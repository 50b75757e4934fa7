// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The `utils` module provides the token helpers shared by the expression, statement and
//! program compilers.

use crate::compiler_driver::Driver;
use crate::compiler_driver::diagnostics::Diagnostic;
use crate::lexer::{Lexer, Token, TokenType};

use super::{CompileError, CompileResult};

/// Reads the next token, converting a lexical failure (already diagnosed by the lexer) into a
/// compile error.
pub fn get_token(lexer: &mut Lexer, driver: &mut Driver) -> CompileResult<Token> {
    lexer.next_token(driver).map_err(|()| CompileError)
}

/// Checks that the token has the expected type.
pub fn expect_token(driver: &mut Driver, token: &Token, expected: &TokenType) -> CompileResult<()> {
    if token.token_type != *expected {
        driver.add_diagnostic(Diagnostic::error_at_location(
            format!("Expected {expected}, but got {}", token.token_type),
            token.location,
        ));
        return Err(CompileError);
    }
    Ok(())
}

/// Reads the next token and checks that it has the expected type.
pub fn get_and_expect_token(lexer: &mut Lexer, driver: &mut Driver, expected: &TokenType) -> CompileResult<Token> {
    let token = get_token(lexer, driver)?;
    expect_token(driver, &token, expected)?;
    Ok(token)
}

/// Checks that the token is an identifier and returns its name.
pub fn expect_identifier(driver: &mut Driver, token: &Token) -> CompileResult<String> {
    match &token.token_type {
        TokenType::Identifier(name) => Ok(name.clone()),
        other => {
            driver.add_diagnostic(Diagnostic::error_at_location(
                format!("Expected identifier, but got {other}"),
                token.location,
            ));
            Err(CompileError)
        }
    }
}
