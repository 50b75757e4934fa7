// Copyright 2025-2026 Neil Henderson
//
//! The `program` module compiles the top level of a translation unit: function definitions and
//! global variable definitions.

use crate::compiler_driver::Driver;
use crate::compiler_driver::diagnostics::Diagnostic;
use crate::ir::{Func, Global, ImmediateValue, Op};
use crate::lexer::{Lexer, SourceLocation, TokenType};

use super::scopes::Storage;
use super::{CompileError, CompileResult, Compiler, stmt, utils};

/// Compiles a whole translation unit.
pub(super) fn compile_program(lexer: &mut Lexer, compiler: &mut Compiler, driver: &mut Driver) -> CompileResult<()> {
    compiler.push_scope(); // File scope

    loop {
        let token = utils::get_token(lexer, driver)?;
        if token.token_type == TokenType::Eof {
            break;
        }

        let name = utils::expect_identifier(driver, &token)?;
        let name_location = token.location;

        // `name (` starts a function definition; anything else is a global definition.
        let saved = lexer.parse_point();
        let token = utils::get_token(lexer, driver)?;
        if token.token_type == TokenType::OpenParen {
            compile_function_definition(lexer, compiler, driver, name, name_location)?;
        } else {
            lexer.rewind(saved);
            compile_global_definition(lexer, compiler, driver, name, name_location)?;
        }
    }

    compiler.pop_scope();
    Ok(())
}

/// Compiles a function definition; the name and the opening paren are already consumed.
fn compile_function_definition(
    lexer: &mut Lexer,
    compiler: &mut Compiler,
    driver: &mut Driver,
    name: String,
    name_location: SourceLocation,
) -> CompileResult<()> {
    // Declared into the file scope before its body compiles, so that it can call itself.
    compiler.declare_var(driver, &name, name_location, Storage::External { name: name.clone() })?;

    compiler.push_scope();

    // Parameters are auto variables; the allocator hands them indices 1..=n in order.
    let mut params_count = 0;
    let saved = lexer.parse_point();
    let token = utils::get_token(lexer, driver)?;
    if token.token_type != TokenType::CloseParen {
        lexer.rewind(saved);
        loop {
            let token = utils::get_token(lexer, driver)?;
            let param_name = utils::expect_identifier(driver, &token)?;
            let index = compiler.allocate_auto_var();
            compiler.declare_var(driver, &param_name, token.location, Storage::Auto { index })?;
            params_count += 1;

            let token = utils::get_token(lexer, driver)?;
            match token.token_type {
                TokenType::CloseParen => break,
                TokenType::Comma => continue,
                _ => {
                    driver.add_diagnostic(Diagnostic::error_at_location(
                        "Expected `)` or `,`".to_string(),
                        token.location,
                    ));
                    return Err(CompileError);
                }
            }
        }
    }

    stmt::compile_statement(lexer, compiler, driver)?;

    compiler.pop_scope();

    patch_gotos(compiler, driver)?;

    let func = Func {
        name,
        name_location,
        body: std::mem::take(&mut compiler.func_body),
        params_count,
        auto_vars_count: compiler.auto_vars.max(),
    };
    compiler.funcs.push(func);

    // Stack slots and label ids are function-local; reset for the next definition.
    compiler.func_goto_labels.clear();
    compiler.func_gotos.clear();
    compiler.auto_vars.reset();
    compiler.label_count = 0;

    Ok(())
}

/// Overwrites each recorded `goto` placeholder with a jump to its label, now that every label of
/// the function is known.
fn patch_gotos(compiler: &mut Compiler, driver: &mut Driver) -> CompileResult<()> {
    let gotos = std::mem::take(&mut compiler.func_gotos);

    for used in &gotos {
        let label = compiler
            .func_goto_labels
            .iter()
            .find(|defined| defined.name == used.name)
            .map(|defined| defined.label);

        match label {
            Some(label) => {
                compiler.func_body[used.addr].opcode = Op::JmpLabel { label };
            }
            None => {
                driver.add_diagnostic(Diagnostic::error_at_location(
                    format!("Label `{}` is used but not defined", used.name),
                    used.location,
                ));
                compiler.bump_error_count(driver)?;
            }
        }
    }

    Ok(())
}

/// Compiles a global variable definition; the name is already consumed.
fn compile_global_definition(
    lexer: &mut Lexer,
    compiler: &mut Compiler,
    driver: &mut Driver,
    name: String,
    name_location: SourceLocation,
) -> CompileResult<()> {
    compiler.declare_var(driver, &name, name_location, Storage::External { name: name.clone() })?;

    let mut global = Global { name, values: Vec::new(), is_vector: false, minimum_size: 0 };

    let mut token = utils::get_token(lexer, driver)?;
    if token.token_type == TokenType::OpenSqBracket {
        global.is_vector = true;
        token = utils::get_token(lexer, driver)?;
        match token.token_type {
            TokenType::IntLiteral(size) => {
                global.minimum_size = size as usize;
                utils::get_and_expect_token(lexer, driver, &TokenType::CloseSqBracket)?;
            }
            TokenType::CloseSqBracket => {}
            _ => {
                driver.add_diagnostic(Diagnostic::error_at_location(
                    "Expected integer or `]`".to_string(),
                    token.location,
                ));
                return Err(CompileError);
            }
        }
        token = utils::get_token(lexer, driver)?;
    }

    while token.token_type != TokenType::Semicolon {
        let value = match token.token_type {
            TokenType::IntLiteral(value) | TokenType::CharLiteral(value) => ImmediateValue::Literal(value),
            TokenType::StringLiteral(ref value) => ImmediateValue::DataOffset(compiler.add_string(value)),
            TokenType::Identifier(ref value) => ImmediateValue::Name(value.clone()),
            _ => {
                driver.add_diagnostic(Diagnostic::error_at_location(
                    "Expected integer, string, or identifier".to_string(),
                    token.location,
                ));
                return Err(CompileError);
            }
        };
        global.values.push(value);

        token = utils::get_token(lexer, driver)?;
        if token.token_type == TokenType::Comma {
            token = utils::get_token(lexer, driver)?;
        }
    }

    // A bare scalar is implicitly zero-initialised.
    if !global.is_vector && global.values.is_empty() {
        global.values.push(ImmediateValue::Literal(0));
    }

    compiler.globals.push(global);
    Ok(())
}
