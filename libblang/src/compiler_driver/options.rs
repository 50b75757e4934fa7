// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The `options` module defines the compiler driver's options.

use crate::codegen::Target;

/// Options that control the compiler driver's behavior.
#[derive(Debug, Default)]
pub struct DriverOptions {
    /// The file to write the IR report to. Defaults to the input path with its extension
    /// replaced by `.ir`.
    pub output_file: Option<String>,

    /// The compilation target.
    pub target: Target,
}
