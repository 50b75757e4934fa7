// Copyright 2025-2026 Neil Henderson

use crate::compiler;
use crate::compiler_driver::Driver;
use crate::ir::{Func, Op, Program};

/// Compiles the source with a test driver, asserting that it parsed cleanly with no diagnostics.
pub fn compile_ok(source: &str) -> Program {
    let mut driver = Driver::for_testing();
    let program = compiler::compile(source, &mut driver).expect("Compilation unwound with a fatal error");

    if driver.has_error_diagnostics() {
        driver.print_diagnostics();
    }
    assert_eq!(driver.error_count(), 0);

    program
}

/// Compiles a source expected to produce recoverable diagnostics only. A program value is still
/// produced; returns it together with the error count.
pub fn compile_with_errors(source: &str) -> (Program, usize) {
    let mut driver = Driver::for_testing();
    let program = compiler::compile(source, &mut driver).expect("Compilation unwound with a fatal error");

    assert!(driver.has_error_diagnostics());
    let count = driver.error_count();
    (program, count)
}

/// Compiles a source expected to unwind with a fatal (structural) error; returns the driver so
/// the test can inspect the diagnostics.
pub fn compile_fatal(source: &str) -> Driver {
    let mut driver = Driver::for_testing();
    assert!(compiler::compile(source, &mut driver).is_err());
    driver
}

/// The named compiled function.
pub fn func<'a>(program: &'a Program, name: &str) -> &'a Func {
    program.funcs.iter().find(|func| func.name == name).unwrap_or_else(|| panic!("No function `{name}`"))
}

/// The opcodes of the named function, locations stripped for comparison.
pub fn func_ops(program: &Program, name: &str) -> Vec<Op> {
    func(program, name).body.iter().map(|op| op.opcode.clone()).collect()
}
