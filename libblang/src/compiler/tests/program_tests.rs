// Copyright 2025-2026 Neil Henderson

use crate::compiler::tests::utils;
use crate::ir::{Arg, ImmediateValue, Op};

#[test]
fn minimal_function() {
    let program = utils::compile_ok("main() { return (0); }");

    assert_eq!(program.funcs.len(), 1);
    let main = utils::func(&program, "main");
    assert_eq!(main.params_count, 0);
    assert_eq!(main.auto_vars_count, 0);
    assert_eq!(utils::func_ops(&program, "main"), vec![Op::Return { arg: Some(Arg::Literal(0)) }]);
}

#[test]
fn auto_assign_and_return() {
    let program = utils::compile_ok("f() { auto x; x = 42; return (x); }");

    let func = utils::func(&program, "f");
    assert_eq!(func.auto_vars_count, 1);

    let expected = vec![
        Op::AutoAssign { index: 1, arg: Arg::Literal(42) },
        Op::Return { arg: Some(Arg::AutoVar(1)) },
    ];
    assert_eq!(utils::func_ops(&program, "f"), expected);
}

#[test]
fn parameters_get_the_first_slots() {
    let program = utils::compile_ok("f(a, b, c) { return (b); }");

    let func = utils::func(&program, "f");
    assert_eq!(func.params_count, 3);
    assert_eq!(func.auto_vars_count, 3);
    assert_eq!(utils::func_ops(&program, "f"), vec![Op::Return { arg: Some(Arg::AutoVar(2)) }]);
}

// Label ids and slot indices reset at the function boundary.
#[test]
fn per_function_state_resets() {
    let program = utils::compile_ok("f() { auto x; start: x = 1; goto start; } g() { out: goto out; }");

    let f_ops = utils::func_ops(&program, "f");
    assert_eq!(
        f_ops,
        vec![
            Op::Label { label: 0 },
            Op::AutoAssign { index: 1, arg: Arg::Literal(1) },
            Op::JmpLabel { label: 0 },
        ]
    );

    // `g` starts over at label 0 and slot count 0.
    let g_ops = utils::func_ops(&program, "g");
    assert_eq!(g_ops, vec![Op::Label { label: 0 }, Op::JmpLabel { label: 0 }]);
    assert_eq!(utils::func(&program, "g").auto_vars_count, 0);
}

#[test]
fn functions_may_call_themselves_and_each_other() {
    let program = utils::compile_ok(
        "fact(n) { if (n < 2) return (1); return (n * fact(n - 1)); }\
         main() { return (fact(5)); }",
    );

    assert_eq!(program.funcs.len(), 2);

    // The recursive call resolves to the function's own external symbol.
    let fact_ops = utils::func_ops(&program, "fact");
    assert!(fact_ops.iter().any(|op| matches!(
        op,
        Op::Funcall { fun: Arg::External(name), .. } if name == "fact"
    )));
}

#[test]
fn scalar_global_defaults_to_zero() {
    let program = utils::compile_ok("counter;");

    assert_eq!(program.globals.len(), 1);
    let global = &program.globals[0];
    assert_eq!(global.name, "counter");
    assert!(!global.is_vector);
    assert_eq!(global.values, vec![ImmediateValue::Literal(0)]);
}

#[test]
fn scalar_global_with_initialisers() {
    let program = utils::compile_ok("x 1, 'A', other;");

    let global = &program.globals[0];
    assert!(!global.is_vector);
    assert_eq!(
        global.values,
        vec![
            ImmediateValue::Literal(1),
            ImmediateValue::Literal(65),
            ImmediateValue::Name("other".to_string()),
        ]
    );
}

#[test]
fn vector_global_with_a_minimum_size() {
    let program = utils::compile_ok("v [5] 1, 2;");

    let global = &program.globals[0];
    assert!(global.is_vector);
    assert_eq!(global.minimum_size, 5);
    assert_eq!(global.values, vec![ImmediateValue::Literal(1), ImmediateValue::Literal(2)]);
}

// An empty vector stays empty; only bare scalars gain the implicit zero.
#[test]
fn empty_vector_global_has_no_values() {
    let program = utils::compile_ok("v [];");

    let global = &program.globals[0];
    assert!(global.is_vector);
    assert_eq!(global.minimum_size, 0);
    assert!(global.values.is_empty());
}

#[test]
fn string_global_initialiser_fills_the_data_segment() {
    let program = utils::compile_ok("msg \"hi\";");

    assert_eq!(program.data, vec![0x68, 0x69, 0x00]);
    assert_eq!(program.globals[0].values, vec![ImmediateValue::DataOffset(0)]);
}

#[test]
fn globals_are_visible_to_later_functions() {
    let program = utils::compile_ok("counter; bump() { counter = counter + 1; }");

    let expected = vec![
        Op::Binop {
            binop: crate::ir::Binop::Plus,
            index: 1,
            lhs: Arg::External("counter".to_string()),
            rhs: Arg::Literal(1),
        },
        Op::ExternalAssign { name: "counter".to_string(), arg: Arg::AutoVar(1) },
    ];
    assert_eq!(utils::func_ops(&program, "bump"), expected);
}

#[test]
fn redefined_top_level_name_is_reported_but_both_compile() {
    let (program, error_count) = utils::compile_with_errors("f() { return (1); } f() { return (2); }");
    assert_eq!(error_count, 1);
    assert_eq!(program.funcs.len(), 2);
}

// Recoverable errors accumulate; the compiler halts at the hundredth.
#[test]
fn error_count_is_capped_at_one_hundred() {
    let mut source = String::from("f() {");
    for i in 0..150 {
        source.push_str(&format!(" missing{i};"));
    }
    source.push_str(" }");

    let mut driver = crate::compiler_driver::Driver::for_testing();
    assert!(crate::compiler::compile(&source, &mut driver).is_err());

    // 100 unknown-name errors plus the too-many-errors diagnostic itself.
    assert_eq!(driver.error_count(), 101);
    assert!(driver.diagnostics().last().unwrap().message().contains("TOO MANY ERRORS"));
}

#[test]
fn ninety_nine_errors_still_produce_a_program() {
    let mut source = String::from("f() {");
    for i in 0..99 {
        source.push_str(&format!(" missing{i};"));
    }
    source.push_str(" }");

    let (program, error_count) = utils::compile_with_errors(&source);
    assert_eq!(error_count, 99);
    assert_eq!(program.funcs.len(), 1);
}

#[test]
fn call_argument_counts_match_the_source() {
    let program = utils::compile_ok("f() { extrn g; g(); g(1); g(1, 2, 3); }");

    let arg_counts: Vec<usize> = utils::func_ops(&program, "f")
        .iter()
        .map(|op| match op {
            Op::Funcall { args, .. } => args.len(),
            other => panic!("Unexpected op {other:?}"),
        })
        .collect();

    assert_eq!(arg_counts, vec![0, 1, 3]);
}

// Every jump in a function body has exactly one matching label in the same body.
#[test]
fn jumps_always_have_a_matching_label() {
    let source = "f(a) { while (a) { if (a > 1) a = a - 1; else a = 0; } return (a ? 1 : 2); }";
    let program = utils::compile_ok(source);

    let ops = utils::func_ops(&program, "f");
    for op in &ops {
        let target = match op {
            Op::JmpLabel { label } | Op::JmpIfNotLabel { label, .. } => *label,
            _ => continue,
        };
        let matching =
            ops.iter().filter(|op| matches!(op, Op::Label { label } if *label == target)).count();
        assert_eq!(matching, 1, "jump target {target} should have exactly one label");
    }
}
