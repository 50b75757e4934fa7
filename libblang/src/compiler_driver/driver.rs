// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The `driver` module defines `Driver`, which is the blang compiler driver type.

use std::io::Write;
use std::path::Path;

use crate::codegen;
use crate::compiler;

use super::DriverError;
use super::diagnostics::{Diagnostic, printer::Printer};
use super::options::DriverOptions;

/// The blang compiler driver.
pub struct Driver {
    /// The path to the source `.b` file.
    pub source_filename: String,

    /// The path the IR report is written to.
    pub output_filename: String,

    // Options that control the driver.
    options: DriverOptions,

    // Diagnostics emitted by the compiler. The compiler only has errors; there are no warnings.
    errors: Vec<Diagnostic>,
}

impl Driver {
    /// Creates a new compiler driver configured to compile the given source file.
    pub fn new(source_filename: &str, options: DriverOptions) -> Self {
        let output_filename = match &options.output_file {
            Some(path) => path.clone(),
            None => Path::new(source_filename).with_extension("ir").to_string_lossy().to_string(),
        };

        Self { source_filename: source_filename.to_string(), output_filename, options, errors: Vec::new() }
    }

    /// Creates a new compiler driver for unit tests, with default options and no source filename.
    pub fn for_testing() -> Self {
        Self {
            source_filename: String::new(),
            output_filename: String::new(),
            options: DriverOptions::default(),
            errors: Vec::new(),
        }
    }

    /// Runs the compiler pipeline: read the source, compile it, generate the target output, and
    /// write the output file.
    ///
    /// Diagnostics are recorded on the driver itself and not returned in the `Result<>` type;
    /// print them with [Driver::print_diagnostics].
    pub fn run(&mut self) -> Result<(), DriverError> {
        let source = match std::fs::read_to_string(&self.source_filename) {
            Ok(source) => source,
            Err(err) => {
                eprintln!("Cannot open '{}': {err}", self.source_filename);
                return Err(DriverError::ReadSourceFailed);
            }
        };

        // A fatal (structural) compile error unwinds here; recoverable errors only record
        // diagnostics and are caught just below.
        let program = compiler::compile(&source, self).map_err(|_| DriverError::CompilerFailed)?;

        if self.has_error_diagnostics() {
            return Err(DriverError::CompilerFailed);
        }

        let output = codegen::generate_program(self, &program).map_err(|()| DriverError::CodegenFailed)?;

        if let Err(err) = std::fs::write(&self.output_filename, output) {
            eprintln!("Cannot write '{}': {err}", self.output_filename);
            return Err(DriverError::WriteOutputFailed);
        }

        Ok(())
    }

    /// The compiler driver's options.
    pub fn options(&self) -> &DriverOptions {
        &self.options
    }

    /// Adds an error diagnostic.
    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.errors.push(diagnostic);
    }

    /// Are there any error diagnostics?
    pub fn has_error_diagnostics(&self) -> bool {
        !self.errors.is_empty()
    }

    /// The number of error diagnostics.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// The error diagnostics recorded so far, in emission order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.errors
    }

    /// Prints all diagnostics to `stderr`.
    pub fn print_diagnostics(&self) {
        self.print_diagnostics_to_buffer(std::io::stderr());
    }

    /// Prints all diagnostics to the given `buffer`.
    ///
    /// You probably want `print_diagnostics` instead of this function, unless you deliberately
    /// want to print diagnostics into a buffer.
    pub fn print_diagnostics_to_buffer(&self, buffer: impl Write) {
        if self.errors.is_empty() {
            return;
        }

        let mut printer = Printer::new(buffer, &self.source_filename);
        printer.print_diagnostics(&self.errors);
    }
}
