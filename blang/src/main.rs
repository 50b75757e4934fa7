// Copyright 2025-2026 Neil Henderson

//! main entry point for the compiler driver executable.

use std::process::ExitCode;

use libblang::compiler_driver::Driver;
use libblang::compiler_driver::args::{self, ParsedCommandLine};

fn main() -> ExitCode {
    // Parse the command-line arguments into the compiler driver's options.
    let (source_file, driver_options) = match args::Parser::parse_command_line_args() {
        ParsedCommandLine::Compile(source_file, options) => (source_file, options),
        ParsedCommandLine::Exit => return ExitCode::SUCCESS,
        ParsedCommandLine::Error => return ExitCode::FAILURE,
    };

    // Run the compiler driver's pipeline for the source file.
    let mut driver = Driver::new(&source_file, driver_options);
    let driver_result = driver.run();

    // Any error diagnostics are printed whether or not the pipeline completed.
    driver.print_diagnostics();

    match driver_result {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
