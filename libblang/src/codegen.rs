// Copyright 2025-2026 Neil Henderson
//
//! The `codegen` module fronts the back-ends advertised by the compiler.
//!
//! Only the textual IR back-end is realised today. The machine targets are recognised on the
//! command line so that a program can be rejected early with a clear message rather than an
//! unknown-flag error.


use std::fmt;

use crate::compiler_driver::Driver;
use crate::compiler_driver::diagnostics::Diagnostic;
use crate::ir;

/// A compilation target.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum Target {
    #[default]
    Ir,
    FasmX86_64Linux,
    FasmX86_64Windows,
    GasAArch64Linux,
    Uxn,
    Mos6502,
}

impl Target {
    /// Every recognised target, in the order `-t list` prints them.
    pub const ALL: [Target; 6] = [
        Target::Ir,
        Target::FasmX86_64Linux,
        Target::FasmX86_64Windows,
        Target::GasAArch64Linux,
        Target::Uxn,
        Target::Mos6502,
    ];

    /// The target name as written on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Target::Ir => "ir",
            Target::FasmX86_64Linux => "fasm-x86_64-linux",
            Target::FasmX86_64Windows => "fasm-x86_64-windows",
            Target::GasAArch64Linux => "gas-aarch64-linux",
            Target::Uxn => "uxn",
            Target::Mos6502 => "6502",
        }
    }

    /// Looks up a target by its command-line name.
    pub fn from_name(name: &str) -> Option<Target> {
        Target::ALL.into_iter().find(|target| target.name() == name)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Generates the output text for the program's target.
///
/// An unimplemented target records a diagnostic on the driver and returns `Err`.
pub fn generate_program(driver: &mut Driver, program: &ir::Program) -> Result<String, ()> {
    match program.target {
        Target::Ir => Ok(ir::printer::print_program(program)),

        target => {
            driver.add_diagnostic(Diagnostic::error(format!(
                "Code generation for target `{target}` is not implemented yet"
            )));
            Err(())
        }
    }
}
