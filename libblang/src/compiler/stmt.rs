// Copyright 2025-2026 Neil Henderson
//
//! The `stmt` module compiles statements.
//!
//! Statements drive scope entry/exit and the lifetime of expression temporaries: a block or an
//! expression statement captures the live-slot count on entry and releases back to it when it
//! completes, so sibling statements reuse the same slots.

use crate::compiler_driver::Driver;
use crate::compiler_driver::diagnostics::Diagnostic;
use crate::ir::{Arg, Op};
use crate::lexer::{Lexer, SourceLocation, TokenType};

use super::scopes::Storage;
use super::{expr, utils};
use super::{CompileError, CompileResult, Compiler, Goto, GotoLabel};

/// Compiles one statement.
pub(super) fn compile_statement(lexer: &mut Lexer, compiler: &mut Compiler, driver: &mut Driver) -> CompileResult<()> {
    let saved = lexer.parse_point();
    let token = utils::get_token(lexer, driver)?;
    let location = token.location;

    match token.token_type {
        TokenType::OpenBrace => {
            compiler.push_scope();
            let mark = compiler.auto_vars.mark();
            compile_block(lexer, compiler, driver)?;
            compiler.auto_vars.release_to(mark);
            compiler.pop_scope();
            Ok(())
        }

        TokenType::Extrn => compile_extrn_declaration(lexer, compiler, driver),
        TokenType::Auto => compile_auto_declaration(lexer, compiler, driver),

        TokenType::If => compile_if_statement(lexer, compiler, driver, location),
        TokenType::While => compile_while_statement(lexer, compiler, driver, location),
        TokenType::Return => compile_return_statement(lexer, compiler, driver, location),
        TokenType::Goto => compile_goto_statement(lexer, compiler, driver, location),

        TokenType::Identifier(name) => {
            // A name directly followed by `:` defines a label; anything else restarts the
            // statement as an expression statement.
            let next = utils::get_token(lexer, driver)?;
            if next.token_type == TokenType::Colon {
                return compile_label(compiler, driver, name, location);
            }
            lexer.rewind(saved);
            compile_expression_statement(lexer, compiler, driver)
        }

        _ => {
            lexer.rewind(saved);
            compile_expression_statement(lexer, compiler, driver)
        }
    }
}

/// Compiles the statements of a block up to and including the closing `}`.
fn compile_block(lexer: &mut Lexer, compiler: &mut Compiler, driver: &mut Driver) -> CompileResult<()> {
    loop {
        let saved = lexer.parse_point();
        let token = utils::get_token(lexer, driver)?;
        if token.token_type == TokenType::CloseBrace {
            return Ok(());
        }
        lexer.rewind(saved);
        compile_statement(lexer, compiler, driver)?;
    }
}

/// Compiles `extrn name, ... ;` (the keyword is already consumed).
///
/// Each name is bound in the current scope and recorded once in the program-wide extern list.
fn compile_extrn_declaration(lexer: &mut Lexer, compiler: &mut Compiler, driver: &mut Driver) -> CompileResult<()> {
    let mut token = utils::get_token(lexer, driver)?;
    while token.token_type != TokenType::Semicolon {
        let name = utils::expect_identifier(driver, &token)?;
        compiler.add_extrn(&name);
        let storage = Storage::External { name: name.clone() };
        compiler.declare_var(driver, &name, token.location, storage)?;

        token = utils::get_token(lexer, driver)?;
        if token.token_type != TokenType::Semicolon && token.token_type != TokenType::Comma {
            driver.add_diagnostic(Diagnostic::error_at_location("Expected `;` or `,`".to_string(), token.location));
            return Err(CompileError);
        }
        if token.token_type == TokenType::Comma {
            token = utils::get_token(lexer, driver)?;
        }
    }
    Ok(())
}

/// Compiles `auto name [size], ... ;` (the keyword is already consumed).
fn compile_auto_declaration(lexer: &mut Lexer, compiler: &mut Compiler, driver: &mut Driver) -> CompileResult<()> {
    let mut token = utils::get_token(lexer, driver)?;
    while token.token_type != TokenType::Semicolon {
        let name = utils::expect_identifier(driver, &token)?;
        let name_location = token.location;
        let index = compiler.allocate_auto_var();
        compiler.declare_var(driver, &name, name_location, Storage::Auto { index })?;

        token = utils::get_token(lexer, driver)?;
        if let TokenType::IntLiteral(size) | TokenType::CharLiteral(size) = token.token_type {
            // `auto v N;` carves out N extra slots, `index+1 ..= index+N`, and initialises `v`
            // with the address of the last one.
            if size == 0 {
                driver.add_diagnostic(Diagnostic::error_at_location(
                    "Automatic vector of size 0 is not supported".to_string(),
                    token.location,
                ));
                return Err(CompileError);
            }
            let size = size as usize;
            for _ in 0..size {
                compiler.allocate_auto_var();
            }
            compiler.push_opcode(Op::AutoAssign { index, arg: Arg::RefAutoVar(index + size) }, token.location);

            token = utils::get_token(lexer, driver)?;
        }

        if token.token_type != TokenType::Semicolon && token.token_type != TokenType::Comma {
            driver.add_diagnostic(Diagnostic::error_at_location("Expected `;` or `,`".to_string(), token.location));
            return Err(CompileError);
        }
        if token.token_type == TokenType::Comma {
            token = utils::get_token(lexer, driver)?;
        }
    }
    Ok(())
}

/// Compiles `if (cond) stmt [else stmt]` as a two-label diamond.
fn compile_if_statement(
    lexer: &mut Lexer,
    compiler: &mut Compiler,
    driver: &mut Driver,
    location: SourceLocation,
) -> CompileResult<()> {
    utils::get_and_expect_token(lexer, driver, &TokenType::OpenParen)?;

    // Temporaries used to evaluate the condition die after the test.
    let mark = compiler.auto_vars.mark();
    let condition = expr::compile_expression(lexer, compiler, driver)?;
    compiler.auto_vars.release_to(mark);

    utils::get_and_expect_token(lexer, driver, &TokenType::CloseParen)?;

    let else_label = compiler.allocate_label();
    compiler.push_opcode(Op::JmpIfNotLabel { label: else_label, arg: condition.arg }, location);

    compile_statement(lexer, compiler, driver)?;

    let saved = lexer.parse_point();
    let token = utils::get_token(lexer, driver)?;
    if token.token_type == TokenType::Else {
        let out_label = compiler.allocate_label();
        compiler.push_opcode(Op::JmpLabel { label: out_label }, location);
        compiler.push_opcode(Op::Label { label: else_label }, location);
        compile_statement(lexer, compiler, driver)?;
        compiler.push_opcode(Op::Label { label: out_label }, location);
    } else {
        lexer.rewind(saved);
        compiler.push_opcode(Op::Label { label: else_label }, location);
    }

    Ok(())
}

/// Compiles `while (cond) stmt`. There is no `break` or `continue` in B.
fn compile_while_statement(
    lexer: &mut Lexer,
    compiler: &mut Compiler,
    driver: &mut Driver,
    location: SourceLocation,
) -> CompileResult<()> {
    let cond_label = compiler.allocate_label();
    compiler.push_opcode(Op::Label { label: cond_label }, location);

    utils::get_and_expect_token(lexer, driver, &TokenType::OpenParen)?;

    let mark = compiler.auto_vars.mark();
    let condition = expr::compile_expression(lexer, compiler, driver)?;
    compiler.auto_vars.release_to(mark);

    utils::get_and_expect_token(lexer, driver, &TokenType::CloseParen)?;

    let out_label = compiler.allocate_label();
    compiler.push_opcode(Op::JmpIfNotLabel { label: out_label, arg: condition.arg }, location);

    compile_statement(lexer, compiler, driver)?;

    compiler.push_opcode(Op::JmpLabel { label: cond_label }, location);
    compiler.push_opcode(Op::Label { label: out_label }, location);

    Ok(())
}

/// Compiles `return ;` or `return ( expr ) ;`.
fn compile_return_statement(
    lexer: &mut Lexer,
    compiler: &mut Compiler,
    driver: &mut Driver,
    location: SourceLocation,
) -> CompileResult<()> {
    let token = utils::get_token(lexer, driver)?;
    match token.token_type {
        TokenType::Semicolon => {
            compiler.push_opcode(Op::Return { arg: None }, location);
            Ok(())
        }

        TokenType::OpenParen => {
            let value = expr::compile_expression(lexer, compiler, driver)?;
            utils::get_and_expect_token(lexer, driver, &TokenType::CloseParen)?;
            utils::get_and_expect_token(lexer, driver, &TokenType::Semicolon)?;
            compiler.push_opcode(Op::Return { arg: Some(value.arg) }, location);
            Ok(())
        }

        _ => {
            driver.add_diagnostic(Diagnostic::error_at_location("Expected `;` or `(`".to_string(), token.location));
            Err(CompileError)
        }
    }
}

/// Compiles `goto name ;`.
///
/// Emits a placeholder opcode and records its address; the program compiler patches it into a
/// jump once every label of the function is known.
fn compile_goto_statement(
    lexer: &mut Lexer,
    compiler: &mut Compiler,
    driver: &mut Driver,
    location: SourceLocation,
) -> CompileResult<()> {
    let token = utils::get_token(lexer, driver)?;
    let name = utils::expect_identifier(driver, &token)?;

    let addr = compiler.func_body.len();
    compiler.func_gotos.push(Goto { name, location: token.location, addr });

    utils::get_and_expect_token(lexer, driver, &TokenType::Semicolon)?;
    compiler.push_opcode(Op::Bogus, location);
    Ok(())
}

/// Compiles a `name:` label definition (both tokens already consumed).
fn compile_label(
    compiler: &mut Compiler,
    driver: &mut Driver,
    name: String,
    location: SourceLocation,
) -> CompileResult<()> {
    let label = compiler.allocate_label();
    compiler.push_opcode(Op::Label { label }, location);

    if let Some(existing) = compiler.func_goto_labels.iter().find(|defined| defined.name == name) {
        let mut diag = Diagnostic::error_at_location(format!("Duplicate label `{name}`"), location);
        diag.add_note("The first definition is located here".to_string(), Some(existing.location));
        driver.add_diagnostic(diag);
        return compiler.bump_error_count(driver);
    }

    compiler.func_goto_labels.push(GotoLabel { name, location, label });
    Ok(())
}

/// Compiles `expr ;`, releasing the expression's temporaries afterwards.
fn compile_expression_statement(lexer: &mut Lexer, compiler: &mut Compiler, driver: &mut Driver) -> CompileResult<()> {
    let mark = compiler.auto_vars.mark();
    expr::compile_expression(lexer, compiler, driver)?;
    compiler.auto_vars.release_to(mark);

    utils::get_and_expect_token(lexer, driver, &TokenType::Semicolon)?;
    Ok(())
}
