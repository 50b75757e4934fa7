// Copyright 2025-2026 Neil Henderson

use crate::compiler::tests::utils;
use crate::ir::{Arg, Binop, Op};

#[test]
fn multiplication_binds_tighter_than_addition() {
    let program = utils::compile_ok("f() { auto x; x = 1 + 2 * 3; }");

    let expected = vec![
        Op::Binop { binop: Binop::Mult, index: 2, lhs: Arg::Literal(2), rhs: Arg::Literal(3) },
        Op::Binop { binop: Binop::Plus, index: 3, lhs: Arg::Literal(1), rhs: Arg::AutoVar(2) },
        Op::AutoAssign { index: 1, arg: Arg::AutoVar(3) },
    ];
    assert_eq!(utils::func_ops(&program, "f"), expected);
}

#[test]
fn bitwise_and_binds_tighter_than_bitwise_or() {
    let program = utils::compile_ok("f() { auto x; x = 1 | 2 & 3; }");

    let expected = vec![
        Op::Binop { binop: Binop::BitAnd, index: 2, lhs: Arg::Literal(2), rhs: Arg::Literal(3) },
        Op::Binop { binop: Binop::BitOr, index: 3, lhs: Arg::Literal(1), rhs: Arg::AutoVar(2) },
        Op::AutoAssign { index: 1, arg: Arg::AutoVar(3) },
    ];
    assert_eq!(utils::func_ops(&program, "f"), expected);
}

#[test]
fn subtraction_is_left_associative() {
    let program = utils::compile_ok("f(a, b, c) { a - b - c; }");

    let expected = vec![
        Op::Binop { binop: Binop::Minus, index: 4, lhs: Arg::AutoVar(1), rhs: Arg::AutoVar(2) },
        Op::Binop { binop: Binop::Minus, index: 5, lhs: Arg::AutoVar(4), rhs: Arg::AutoVar(3) },
    ];
    assert_eq!(utils::func_ops(&program, "f"), expected);
}

#[test]
fn assignment_is_right_associative() {
    let program = utils::compile_ok("f() { auto a, b; a = b = 1; }");

    let expected = vec![
        Op::AutoAssign { index: 2, arg: Arg::Literal(1) },
        Op::AutoAssign { index: 1, arg: Arg::AutoVar(2) },
    ];
    assert_eq!(utils::func_ops(&program, "f"), expected);
}

// `v[i]` lowers to `*(v + i*8)`.
#[test]
fn subscript_scales_by_the_word_size() {
    let program = utils::compile_ok("f(v, i) { v[i]; }");

    let expected = vec![
        Op::Binop { binop: Binop::Mult, index: 3, lhs: Arg::AutoVar(2), rhs: Arg::Literal(8) },
        Op::Binop { binop: Binop::Plus, index: 3, lhs: Arg::AutoVar(1), rhs: Arg::AutoVar(3) },
    ];
    assert_eq!(utils::func_ops(&program, "f"), expected);
}

#[test]
fn subscript_is_assignable() {
    let program = utils::compile_ok("f(v) { v[2] = 9; }");

    let expected = vec![
        Op::Binop { binop: Binop::Mult, index: 2, lhs: Arg::Literal(2), rhs: Arg::Literal(8) },
        Op::Binop { binop: Binop::Plus, index: 2, lhs: Arg::AutoVar(1), rhs: Arg::AutoVar(2) },
        Op::Store { index: 2, arg: Arg::Literal(9) },
    ];
    assert_eq!(utils::func_ops(&program, "f"), expected);
}

#[test]
fn ternary_emits_a_diamond_with_a_result_slot() {
    let program = utils::compile_ok("f(c) { auto r; r = c ? 1 : 2; }");

    let expected = vec![
        Op::JmpIfNotLabel { label: 0, arg: Arg::AutoVar(1) },
        Op::AutoAssign { index: 3, arg: Arg::Literal(1) },
        Op::JmpLabel { label: 1 },
        Op::Label { label: 0 },
        Op::AutoAssign { index: 3, arg: Arg::Literal(2) },
        Op::Label { label: 1 },
        Op::AutoAssign { index: 2, arg: Arg::AutoVar(3) },
    ];
    assert_eq!(utils::func_ops(&program, "f"), expected);
}

#[test]
fn prefix_increment_updates_in_place() {
    let program = utils::compile_ok("f(x) { ++x; --x; }");

    let expected = vec![
        Op::Binop { binop: Binop::Plus, index: 1, lhs: Arg::AutoVar(1), rhs: Arg::Literal(1) },
        Op::Binop { binop: Binop::Minus, index: 1, lhs: Arg::AutoVar(1), rhs: Arg::Literal(1) },
    ];
    assert_eq!(utils::func_ops(&program, "f"), expected);
}

// Postfix increment copies the old value out first and yields the copy.
#[test]
fn postfix_increment_yields_the_old_value() {
    let program = utils::compile_ok("f(x) { auto old; old = x++; }");

    let expected = vec![
        Op::AutoAssign { index: 3, arg: Arg::AutoVar(1) },
        Op::Binop { binop: Binop::Plus, index: 1, lhs: Arg::AutoVar(1), rhs: Arg::Literal(1) },
        Op::AutoAssign { index: 2, arg: Arg::AutoVar(3) },
    ];
    assert_eq!(utils::func_ops(&program, "f"), expected);
}

#[test]
fn dereference_produces_an_assignable_operand() {
    let program = utils::compile_ok("f(p) { *p = 5; *p += 2; }");

    let expected = vec![
        // *p = 5
        Op::AutoAssign { index: 2, arg: Arg::AutoVar(1) },
        Op::Store { index: 2, arg: Arg::Literal(5) },
        // *p += 2: compute into a fresh slot, then store back
        Op::AutoAssign { index: 2, arg: Arg::AutoVar(1) },
        Op::Binop { binop: Binop::Plus, index: 3, lhs: Arg::Deref(2), rhs: Arg::Literal(2) },
        Op::Store { index: 2, arg: Arg::AutoVar(3) },
    ];
    assert_eq!(utils::func_ops(&program, "f"), expected);
}

#[test]
fn address_of_forms() {
    let program = utils::compile_ok("g; f(x) { auto p; p = &x; p = &g; p = &*p; }");

    let expected = vec![
        Op::AutoAssign { index: 2, arg: Arg::RefAutoVar(1) },
        Op::AutoAssign { index: 2, arg: Arg::RefExternal("g".to_string()) },
        // `&*p` collapses back to the value of `p`'s address slot
        Op::AutoAssign { index: 3, arg: Arg::AutoVar(2) },
        Op::AutoAssign { index: 2, arg: Arg::AutoVar(3) },
    ];
    assert_eq!(utils::func_ops(&program, "f"), expected);
}

#[test]
fn unary_not_and_negate() {
    let program = utils::compile_ok("f(x) { !x; -x; }");

    let expected = vec![
        Op::UnaryNot { result: 2, arg: Arg::AutoVar(1) },
        Op::Negate { result: 2, arg: Arg::AutoVar(1) },
    ];
    assert_eq!(utils::func_ops(&program, "f"), expected);
}

#[test]
fn compound_assignment_to_an_external() {
    let program = utils::compile_ok("g; f() { g = 5; g += 1; }");

    let expected = vec![
        Op::ExternalAssign { name: "g".to_string(), arg: Arg::Literal(5) },
        Op::Binop { binop: Binop::Plus, index: 1, lhs: Arg::External("g".to_string()), rhs: Arg::Literal(1) },
        Op::ExternalAssign { name: "g".to_string(), arg: Arg::AutoVar(1) },
    ];
    assert_eq!(utils::func_ops(&program, "f"), expected);
}

#[test]
fn call_arguments_are_evaluated_left_to_right() {
    let program = utils::compile_ok("f(a, b) { extrn sum; sum(a + 1, b, 3); }");

    let expected = vec![
        Op::Binop { binop: Binop::Plus, index: 3, lhs: Arg::AutoVar(1), rhs: Arg::Literal(1) },
        Op::Funcall {
            result: 4,
            fun: Arg::External("sum".to_string()),
            args: vec![Arg::AutoVar(3), Arg::AutoVar(2), Arg::Literal(3)],
        },
    ];
    assert_eq!(utils::func_ops(&program, "f"), expected);
}

#[test]
fn calls_chain_and_nest() {
    let program = utils::compile_ok("f() { extrn g; g(g(1)); }");

    let expected = vec![
        Op::Funcall { result: 1, fun: Arg::External("g".to_string()), args: vec![Arg::Literal(1)] },
        Op::Funcall { result: 2, fun: Arg::External("g".to_string()), args: vec![Arg::AutoVar(1)] },
    ];
    assert_eq!(utils::func_ops(&program, "f"), expected);
}

#[test]
fn parentheses_preserve_lvalueness() {
    let program = utils::compile_ok("f(x) { (x) = 7; }");

    let expected = vec![Op::AutoAssign { index: 1, arg: Arg::Literal(7) }];
    assert_eq!(utils::func_ops(&program, "f"), expected);
}

#[test]
fn string_literal_lands_in_the_data_segment() {
    let program = utils::compile_ok("f() { extrn puts; puts(\"hi\"); }");

    assert_eq!(program.data, vec![0x68, 0x69, 0x00]);

    let expected = vec![Op::Funcall {
        result: 1,
        fun: Arg::External("puts".to_string()),
        args: vec![Arg::DataOffset(0)],
    }];
    assert_eq!(utils::func_ops(&program, "f"), expected);
}

#[test]
fn assignment_to_rvalue_is_reported_and_poisoned() {
    let (program, error_count) = utils::compile_with_errors("f() { 5 = 1; }");
    assert_eq!(error_count, 1);

    // The poisoned assignment emits nothing.
    assert!(utils::func_ops(&program, "f").is_empty());
}

#[test]
fn address_of_rvalue_is_reported() {
    let (_, error_count) = utils::compile_with_errors("f() { &5; }");
    assert_eq!(error_count, 1);
}

#[test]
fn increment_of_rvalue_is_reported() {
    let (_, error_count) = utils::compile_with_errors("f() { ++5; }");
    assert_eq!(error_count, 1);
}

#[test]
fn unknown_name_is_reported_and_poisoned() {
    let (program, error_count) = utils::compile_with_errors("f() { nowhere = 1; }");
    assert_eq!(error_count, 1);
    assert!(utils::func_ops(&program, "f").is_empty());
}
