// Copyright 2025-2026 Neil Henderson

//! Integration tests that compile source files which are expected to be valid programs.

use libblang::compiler_driver::Driver;
use libblang::compiler_driver::options::DriverOptions;
use libblang::core::TempFile;

// Include the generated test case functions.
include!(concat!(env!("OUT_DIR"), "/generated_valid_program_tests.rs"));

/// Compiles a source file which is expected to compile cleanly, and checks the produced IR
/// report against the golden `.ir` file when one exists for the test case.
fn compile_valid_program(source_filename: &str, golden_ir_filename: Option<&str>) {
    let ir_file = TempFile::try_create_with_extension("blang", "ir").expect("Did not create temp .ir file");

    let options = DriverOptions { output_file: Some(ir_file.path_to_string()), ..Default::default() };
    let mut driver = Driver::new(source_filename, options);
    let driver_result = driver.run();

    if driver.has_error_diagnostics() {
        driver.print_diagnostics();
        panic!("Expected no diagnostics for {source_filename}");
    }

    assert!(driver_result.is_ok());

    // The report must have been written; the Drop impl of TempFile cleans it up afterwards.
    let report = std::fs::read_to_string(ir_file.path()).expect("Did not read the IR report");
    assert!(report.starts_with("-- Functions --"));

    if let Some(golden_ir_filename) = golden_ir_filename {
        let expected = std::fs::read_to_string(golden_ir_filename).expect("Did not read the golden IR file");
        assert_eq!(report, expected, "IR report does not match {golden_ir_filename}");
    }
}
