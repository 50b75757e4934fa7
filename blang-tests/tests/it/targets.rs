// Copyright 2025-2026 Neil Henderson

//! Integration tests for target selection. Only the IR target is realised; the machine targets
//! are recognised and rejected at the codegen stage.

use libblang::codegen::Target;
use libblang::compiler_driver::options::DriverOptions;
use libblang::compiler_driver::{Driver, DriverError};
use libblang::core::TempFile;

fn test_case_path(name: &str) -> String {
    format!("{}/tests/valid/{name}", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn machine_target_fails_at_codegen() {
    let ir_file = TempFile::try_create_with_extension("blang", "ir").expect("Did not create temp .ir file");

    let options = DriverOptions {
        output_file: Some(ir_file.path_to_string()),
        target: Target::GasAArch64Linux,
    };
    let mut driver = Driver::new(&test_case_path("return42.b"), options);

    assert_eq!(driver.run(), Err(DriverError::CodegenFailed));
    assert_eq!(driver.error_count(), 1);
    assert!(!std::fs::exists(ir_file.path()).unwrap_or(false));
}

#[test]
fn every_advertised_target_has_a_distinct_name() {
    let mut names: Vec<&str> = Target::ALL.iter().map(|target| target.name()).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), Target::ALL.len());
}
