// Copyright 2025-2026 Neil Henderson
//
//! The `expr` module compiles expressions.
//!
//! Expressions are parsed by precedence climbing over the binary-operator ladder, with the
//! assignment class (right-associative) above the loosest binop level and a single trailing
//! ternary per assignment expression. Each production emits its opcodes as it parses and
//! returns the operand holding its value plus whether that operand is an lvalue.

use crate::ICE;
use crate::compiler_driver::Driver;
use crate::compiler_driver::diagnostics::Diagnostic;
use crate::ir::{Arg, Binop, Op};
use crate::lexer::{Lexer, SourceLocation, TokenType};

use super::scopes::Storage;
use super::utils;
use super::{CompileError, CompileResult, Compiler};

/// B values are word-sized; subscripts scale by this.
const WORD_SIZE: u64 = 8;

/// How many binary-operator precedence levels there are; see [binop_precedence].
const PRECEDENCE_LEVELS: usize = 7;

/// The value of a compiled (sub)expression: the operand that holds it, and whether that operand
/// designates a storage location (and so may be assigned to, incremented, or have its address
/// taken).
#[derive(Debug, Clone)]
pub struct ExprValue {
    pub arg: Arg,
    pub is_lvalue: bool,
}

impl ExprValue {
    fn rvalue(arg: Arg) -> Self {
        Self { arg, is_lvalue: false }
    }

    fn lvalue(arg: Arg) -> Self {
        Self { arg, is_lvalue: true }
    }
}

/// The precedence level of a binary operator. Level 0 binds loosest, level 6 tightest.
fn binop_precedence(binop: Binop) -> usize {
    match binop {
        Binop::BitOr => 0,
        Binop::BitAnd => 1,
        Binop::BitShl | Binop::BitShr => 2,
        Binop::Equal | Binop::NotEqual => 3,
        Binop::Less | Binop::Greater | Binop::GreaterEqual | Binop::LessEqual => 4,
        Binop::Plus | Binop::Minus => 5,
        Binop::Mult | Binop::Mod | Binop::Div => 6,
    }
}

fn binop_from_token(token_type: &TokenType) -> Option<Binop> {
    match token_type {
        TokenType::Plus => Some(Binop::Plus),
        TokenType::Minus => Some(Binop::Minus),
        TokenType::Multiply => Some(Binop::Mult),
        TokenType::Divide => Some(Binop::Div),
        TokenType::Remainder => Some(Binop::Mod),
        TokenType::LessThan => Some(Binop::Less),
        TokenType::GreaterThan => Some(Binop::Greater),
        TokenType::GreaterThanOrEqualTo => Some(Binop::GreaterEqual),
        TokenType::LessThanOrEqualTo => Some(Binop::LessEqual),
        TokenType::BitwiseOr => Some(Binop::BitOr),
        TokenType::BitwiseAnd => Some(Binop::BitAnd),
        TokenType::LeftShift => Some(Binop::BitShl),
        TokenType::RightShift => Some(Binop::BitShr),
        TokenType::EqualTo => Some(Binop::Equal),
        TokenType::NotEqualTo => Some(Binop::NotEqual),
        _ => None,
    }
}

/// Maps an assignment-class token to its compound operator: `Some(None)` for plain `=`,
/// `Some(Some(op))` for `op=`, and `None` when the token is not an assignment at all.
fn binop_from_assign_token(token_type: &TokenType) -> Option<Option<Binop>> {
    match token_type {
        TokenType::Assignment => Some(None),
        TokenType::LeftShiftAssignment => Some(Some(Binop::BitShl)),
        TokenType::RightShiftAssignment => Some(Some(Binop::BitShr)),
        TokenType::RemainderAssignment => Some(Some(Binop::Mod)),
        TokenType::BitwiseOrAssignment => Some(Some(Binop::BitOr)),
        TokenType::BitwiseAndAssignment => Some(Some(Binop::BitAnd)),
        TokenType::AdditionAssignment => Some(Some(Binop::Plus)),
        TokenType::SubtractionAssignment => Some(Some(Binop::Minus)),
        TokenType::MultiplyAssignment => Some(Some(Binop::Mult)),
        TokenType::DivideAssignment => Some(Some(Binop::Div)),
        _ => None,
    }
}

/// Compiles one expression, emitting its opcodes into the current function body.
pub(super) fn compile_expression(
    lexer: &mut Lexer,
    compiler: &mut Compiler,
    driver: &mut Driver,
) -> CompileResult<ExprValue> {
    compile_assign_expression(lexer, compiler, driver)
}

/// Compiles the assignment level of the ladder, including the single optional trailing ternary.
fn compile_assign_expression(
    lexer: &mut Lexer,
    compiler: &mut Compiler,
    driver: &mut Driver,
) -> CompileResult<ExprValue> {
    let mut value = compile_binop_expression(lexer, compiler, driver, 0)?;

    loop {
        let saved = lexer.parse_point();
        let token = utils::get_token(lexer, driver)?;
        let Some(compound) = binop_from_assign_token(&token.token_type) else {
            lexer.rewind(saved);
            break;
        };
        let op_location = token.location;

        // Assignment is right-associative: `a = b = 1` is `a = (b = 1)`.
        let rhs = compile_assign_expression(lexer, compiler, driver)?;

        if !value.is_lvalue {
            driver
                .add_diagnostic(Diagnostic::error_at_location("Cannot assign to an rvalue".to_string(), op_location));
            compiler.bump_error_count(driver)?;
            value = ExprValue::rvalue(Arg::Bogus);
            continue;
        }

        match compound {
            Some(binop) => emit_binop_assignment(compiler, &value.arg, rhs.arg, binop, op_location),
            None => emit_plain_assignment(compiler, &value.arg, rhs.arg, op_location),
        }
        value.is_lvalue = false;
    }

    let saved = lexer.parse_point();
    let token = utils::get_token(lexer, driver)?;
    if token.token_type == TokenType::Ternary {
        value = compile_ternary_tail(lexer, compiler, driver, value.arg, token.location)?;
    } else {
        lexer.rewind(saved);
    }

    Ok(value)
}

/// Compiles `? expr : expr` after an already-compiled condition.
fn compile_ternary_tail(
    lexer: &mut Lexer,
    compiler: &mut Compiler,
    driver: &mut Driver,
    condition: Arg,
    location: SourceLocation,
) -> CompileResult<ExprValue> {
    let result = compiler.allocate_auto_var();

    let else_label = compiler.allocate_label();
    compiler.push_opcode(Op::JmpIfNotLabel { label: else_label, arg: condition }, location);

    let if_true = compile_expression(lexer, compiler, driver)?;
    compiler.push_opcode(Op::AutoAssign { index: result, arg: if_true.arg }, location);

    let out_label = compiler.allocate_label();
    compiler.push_opcode(Op::JmpLabel { label: out_label }, location);

    utils::get_and_expect_token(lexer, driver, &TokenType::Colon)?;
    compiler.push_opcode(Op::Label { label: else_label }, location);

    let if_false = compile_expression(lexer, compiler, driver)?;
    compiler.push_opcode(Op::AutoAssign { index: result, arg: if_false.arg }, location);
    compiler.push_opcode(Op::Label { label: out_label }, location);

    Ok(ExprValue::rvalue(Arg::AutoVar(result)))
}

/// Compiles one binary-operator precedence level. Binops are all left-associative.
fn compile_binop_expression(
    lexer: &mut Lexer,
    compiler: &mut Compiler,
    driver: &mut Driver,
    precedence: usize,
) -> CompileResult<ExprValue> {
    if precedence >= PRECEDENCE_LEVELS {
        let value = compile_primary_expression(lexer, compiler, driver)?;
        return compile_postfix_operators(lexer, compiler, driver, value);
    }

    let mut value = compile_binop_expression(lexer, compiler, driver, precedence + 1)?;

    loop {
        let saved = lexer.parse_point();
        let token = utils::get_token(lexer, driver)?;
        let Some(binop) = binop_from_token(&token.token_type) else {
            lexer.rewind(saved);
            break;
        };
        if binop_precedence(binop) != precedence {
            lexer.rewind(saved);
            break;
        }

        let rhs = compile_binop_expression(lexer, compiler, driver, precedence + 1)?;

        let index = compiler.allocate_auto_var();
        compiler.push_opcode(Op::Binop { binop, index, lhs: value.arg, rhs: rhs.arg }, token.location);
        value = ExprValue::rvalue(Arg::AutoVar(index));
    }

    Ok(value)
}

fn compile_primary_expression(
    lexer: &mut Lexer,
    compiler: &mut Compiler,
    driver: &mut Driver,
) -> CompileResult<ExprValue> {
    let token = utils::get_token(lexer, driver)?;
    let location = token.location;

    match token.token_type {
        TokenType::OpenParen => {
            // Parentheses pass the inner value through untouched, lvalue-ness included.
            let value = compile_expression(lexer, compiler, driver)?;
            utils::get_and_expect_token(lexer, driver, &TokenType::CloseParen)?;
            Ok(value)
        }

        TokenType::LogicalNot => {
            let operand = compile_primary_expression(lexer, compiler, driver)?;
            let result = compiler.allocate_auto_var();
            compiler.push_opcode(Op::UnaryNot { result, arg: operand.arg }, location);
            Ok(ExprValue::rvalue(Arg::AutoVar(result)))
        }

        TokenType::Minus => {
            let operand = compile_primary_expression(lexer, compiler, driver)?;
            let result = compiler.allocate_auto_var();
            compiler.push_opcode(Op::Negate { result, arg: operand.arg }, location);
            Ok(ExprValue::rvalue(Arg::AutoVar(result)))
        }

        TokenType::Multiply => {
            // `*x`: move the address into a slot so the result is an assignable deref operand.
            let operand = compile_primary_expression(lexer, compiler, driver)?;
            let index = compiler.allocate_auto_var();
            compiler.push_opcode(Op::AutoAssign { index, arg: operand.arg }, location);
            Ok(ExprValue::lvalue(Arg::Deref(index)))
        }

        TokenType::BitwiseAnd => {
            let operand = compile_primary_expression(lexer, compiler, driver)?;
            if !operand.is_lvalue {
                driver.add_diagnostic(Diagnostic::error_at_location(
                    "Cannot take the address of an rvalue".to_string(),
                    location,
                ));
                compiler.bump_error_count(driver)?;
                return Ok(ExprValue::rvalue(Arg::Bogus));
            }
            let arg = match operand.arg {
                // `&*x` is just `x`.
                Arg::Deref(index) => Arg::AutoVar(index),
                Arg::External(name) => Arg::RefExternal(name),
                Arg::AutoVar(index) => Arg::RefAutoVar(index),
                Arg::Bogus => Arg::Bogus,
                other => ICE!("Cannot take the address of operand {other}"),
            };
            Ok(ExprValue::rvalue(arg))
        }

        TokenType::Increment => compile_prefix_increment(lexer, compiler, driver, Binop::Plus, location),
        TokenType::Decrement => compile_prefix_increment(lexer, compiler, driver, Binop::Minus, location),

        TokenType::IntLiteral(value) | TokenType::CharLiteral(value) => Ok(ExprValue::rvalue(Arg::Literal(value))),

        TokenType::Identifier(name) => {
            let Some(var) = compiler.find_var(&name) else {
                driver.add_diagnostic(Diagnostic::error_at_location(
                    format!("Could not find name `{name}`"),
                    location,
                ));
                compiler.bump_error_count(driver)?;
                // Poisoned, but still formally an lvalue so that an assignment to the unknown
                // name does not pile a second error on top.
                return Ok(ExprValue::lvalue(Arg::Bogus));
            };
            let arg = match &var.storage {
                Storage::Auto { index } => Arg::AutoVar(*index),
                Storage::External { name } => Arg::External(name.clone()),
            };
            Ok(ExprValue::lvalue(arg))
        }

        TokenType::StringLiteral(value) => {
            let offset = compiler.add_string(&value);
            Ok(ExprValue::rvalue(Arg::DataOffset(offset)))
        }

        other => {
            driver.add_diagnostic(Diagnostic::error_at_location(
                format!("Expected start of a primary expression but got {other}"),
                location,
            ));
            Err(CompileError)
        }
    }
}

/// Compiles prefix `++x` / `--x`: update in place, result is the updated lvalue's operand.
fn compile_prefix_increment(
    lexer: &mut Lexer,
    compiler: &mut Compiler,
    driver: &mut Driver,
    binop: Binop,
    location: SourceLocation,
) -> CompileResult<ExprValue> {
    let operand = compile_primary_expression(lexer, compiler, driver)?;
    if !operand.is_lvalue {
        report_increment_of_rvalue(compiler, driver, binop, location)?;
        return Ok(ExprValue::rvalue(Arg::Bogus));
    }

    emit_binop_assignment(compiler, &operand.arg, Arg::Literal(1), binop, location);
    Ok(ExprValue::rvalue(operand.arg))
}

/// Compiles the chain of postfix operators after a primary expression: calls, subscripts, and
/// postfix `++` / `--`.
fn compile_postfix_operators(
    lexer: &mut Lexer,
    compiler: &mut Compiler,
    driver: &mut Driver,
    mut value: ExprValue,
) -> CompileResult<ExprValue> {
    loop {
        let saved = lexer.parse_point();
        let token = utils::get_token(lexer, driver)?;

        match token.token_type {
            TokenType::OpenParen => {
                let result = compile_function_call(lexer, compiler, driver, value.arg, token.location)?;
                value = ExprValue::rvalue(result);
            }

            TokenType::OpenSqBracket => {
                let offset = compile_expression(lexer, compiler, driver)?;
                utils::get_and_expect_token(lexer, driver, &TokenType::CloseSqBracket)?;

                // `base[i]` is `*(base + i*8)`: scale the subscript by the word size, add the
                // base, and leave an assignable deref of the sum.
                let index = compiler.allocate_auto_var();
                compiler.push_opcode(
                    Op::Binop { binop: Binop::Mult, index, lhs: offset.arg, rhs: Arg::Literal(WORD_SIZE) },
                    token.location,
                );
                compiler.push_opcode(
                    Op::Binop { binop: Binop::Plus, index, lhs: value.arg, rhs: Arg::AutoVar(index) },
                    token.location,
                );
                value = ExprValue::lvalue(Arg::Deref(index));
            }

            TokenType::Increment => {
                value = compile_postfix_increment(compiler, driver, value, Binop::Plus, token.location)?;
            }

            TokenType::Decrement => {
                value = compile_postfix_increment(compiler, driver, value, Binop::Minus, token.location)?;
            }

            _ => {
                lexer.rewind(saved);
                break;
            }
        }
    }

    Ok(value)
}

/// Compiles postfix `x++` / `x--`: copy the old value out, update in place, result is the copy.
fn compile_postfix_increment(
    compiler: &mut Compiler,
    driver: &mut Driver,
    value: ExprValue,
    binop: Binop,
    location: SourceLocation,
) -> CompileResult<ExprValue> {
    if !value.is_lvalue {
        report_increment_of_rvalue(compiler, driver, binop, location)?;
        return Ok(ExprValue::rvalue(Arg::Bogus));
    }

    let pre = compiler.allocate_auto_var();
    compiler.push_opcode(Op::AutoAssign { index: pre, arg: value.arg.clone() }, location);
    emit_binop_assignment(compiler, &value.arg, Arg::Literal(1), binop, location);
    Ok(ExprValue::rvalue(Arg::AutoVar(pre)))
}

fn report_increment_of_rvalue(
    compiler: &mut Compiler,
    driver: &mut Driver,
    binop: Binop,
    location: SourceLocation,
) -> CompileResult<()> {
    let verb = if binop == Binop::Plus { "increment" } else { "decrement" };
    driver.add_diagnostic(Diagnostic::error_at_location(format!("Cannot {verb} an rvalue"), location));
    compiler.bump_error_count(driver)
}

/// Compiles a call's argument list (the opening paren is already consumed) and emits the call.
/// Arguments are evaluated left to right and fully materialised before the call opcode.
fn compile_function_call(
    lexer: &mut Lexer,
    compiler: &mut Compiler,
    driver: &mut Driver,
    fun: Arg,
    location: SourceLocation,
) -> CompileResult<Arg> {
    let mut args = Vec::new();

    let saved = lexer.parse_point();
    let token = utils::get_token(lexer, driver)?;
    if token.token_type != TokenType::CloseParen {
        lexer.rewind(saved);
        loop {
            let arg = compile_expression(lexer, compiler, driver)?;
            args.push(arg.arg);

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

    let result = compiler.allocate_auto_var();
    compiler.push_opcode(Op::Funcall { result, fun, args }, location);
    Ok(Arg::AutoVar(result))
}

/// Emits `lhs = lhs binop rhs` for an lvalue-capable destination operand.
///
/// A slot destination takes the result directly; a deref or external destination computes into a
/// fresh slot first and then stores it back. A [Arg::Bogus] destination swallows the operation,
/// since the error was already reported.
pub(super) fn emit_binop_assignment(
    compiler: &mut Compiler,
    lhs: &Arg,
    rhs: Arg,
    binop: Binop,
    location: SourceLocation,
) {
    match lhs {
        Arg::AutoVar(index) => {
            compiler.push_opcode(Op::Binop { binop, index: *index, lhs: lhs.clone(), rhs }, location);
        }
        Arg::Deref(index) => {
            let tmp = compiler.allocate_auto_var();
            compiler.push_opcode(Op::Binop { binop, index: tmp, lhs: lhs.clone(), rhs }, location);
            compiler.push_opcode(Op::Store { index: *index, arg: Arg::AutoVar(tmp) }, location);
        }
        Arg::External(name) => {
            let name = name.clone();
            let tmp = compiler.allocate_auto_var();
            compiler.push_opcode(Op::Binop { binop, index: tmp, lhs: lhs.clone(), rhs }, location);
            compiler.push_opcode(Op::ExternalAssign { name, arg: Arg::AutoVar(tmp) }, location);
        }
        Arg::Bogus => {}
        other => ICE!("Invalid lvalue operand {other} in compound assignment"),
    }
}

/// Emits a plain `lhs = rhs` for an lvalue-capable destination operand.
fn emit_plain_assignment(compiler: &mut Compiler, lhs: &Arg, rhs: Arg, location: SourceLocation) {
    match lhs {
        Arg::AutoVar(index) => compiler.push_opcode(Op::AutoAssign { index: *index, arg: rhs }, location),
        Arg::Deref(index) => compiler.push_opcode(Op::Store { index: *index, arg: rhs }, location),
        Arg::External(name) => {
            compiler.push_opcode(Op::ExternalAssign { name: name.clone(), arg: rhs }, location);
        }
        Arg::Bogus => {}
        other => ICE!("Invalid lvalue operand {other} in assignment"),
    }
}
