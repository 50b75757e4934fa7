// Copyright 2025-2026 Neil Henderson

//! Integration tests that compile source files which are expected to fail with diagnostics.

use libblang::compiler_driver::Driver;
use libblang::compiler_driver::options::DriverOptions;
use libblang::core::TempFile;

// Include the generated test case functions.
include!(concat!(env!("OUT_DIR"), "/generated_invalid_program_tests.rs"));

/// Compiles a source file which is expected to fail, and checks the number of diagnostics when
/// the test case has an entry in `expected_results.json`.
fn compile_invalid_program(source_filename: &str, expected_error_count: Option<u64>) {
    let ir_file = TempFile::try_create_with_extension("blang", "ir").expect("Did not create temp .ir file");

    let options = DriverOptions { output_file: Some(ir_file.path_to_string()), ..Default::default() };
    let mut driver = Driver::new(source_filename, options);
    let driver_result = driver.run();

    assert!(driver_result.is_err(), "Expected {source_filename} to fail");
    assert!(driver.has_error_diagnostics());

    if let Some(expected) = expected_error_count {
        assert_eq!(driver.error_count() as u64, expected, "Unexpected diagnostic count for {source_filename}");
    }

    // No report is written for a program that failed to compile.
    assert!(!std::fs::exists(ir_file.path()).unwrap_or(false));
}
