// Copyright 2025-2026 Neil Henderson

use crate::compiler_driver::Driver;
use crate::lexer::{Lexer, Token, TokenType};

/// Lexes the whole source, asserting there are no lexical errors, and returns the tokens up to
/// (not including) the end-of-file token.
pub fn lex_all(source: &str) -> Vec<Token> {
    let mut driver = Driver::for_testing();
    let mut lexer = Lexer::new(source);

    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token(&mut driver).expect("Unexpected lexical error");
        if token.token_type == TokenType::Eof {
            break;
        }
        tokens.push(token);
    }

    assert!(!driver.has_error_diagnostics());
    tokens
}

pub fn compare_token_types(actual: &[Token], expected: &[Token]) {
    assert_eq!(actual.len(), expected.len());
    for (act, exp) in actual.iter().zip(expected.iter()) {
        assert_eq!(act.token_type, exp.token_type);
    }
}

/// Lexes a source that is expected to fail with a lexical error and returns the driver so the
/// test can inspect the diagnostics.
pub fn lex_expecting_error(source: &str) -> Driver {
    let mut driver = Driver::for_testing();
    let mut lexer = Lexer::new(source);

    loop {
        match lexer.next_token(&mut driver) {
            Ok(token) if token.token_type == TokenType::Eof => panic!("Expected a lexical error"),
            Ok(_) => continue,
            Err(()) => break,
        }
    }

    assert!(driver.has_error_diagnostics());
    driver
}
