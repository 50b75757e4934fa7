// Copyright 2025-2026 Neil Henderson
//
//! The `compiler` module parses B source code and emits IR in a single pass.
//!
//! There is no AST: the expression and statement compilers append opcodes to the current
//! function body as they parse. Lookahead is done by capturing the lexer's parse point and
//! rewinding on a mismatch, and every speculative read happens before the production emits
//! anything, so no opcode ever has to be retracted.

mod scopes;
mod temps;
mod utils;

mod expr;
mod program;
mod stmt;

#[cfg(test)]
mod tests;

use crate::codegen::Target;
use crate::compiler_driver::Driver;
use crate::compiler_driver::diagnostics::Diagnostic;
use crate::ir::{Func, Global, Op, OpWithLocation, Program};
use crate::lexer::{Lexer, SourceLocation};

pub use scopes::{ScopeStack, Storage, Var};
pub use temps::AutoVarAllocator;

/// A fatal, structural compile error: parsing cannot continue. The diagnostics describing what
/// went wrong live on the driver; this type only unwinds the parse.
///
/// Recoverable errors (unknown names, misused lvalues, redefinitions) are *not* represented by
/// this type; they record a diagnostic and poison the offending operand with [crate::ir::Arg::Bogus]
/// so that one run can report many errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CompileError;

pub type CompileResult<T> = Result<T, CompileError>;

/// Compilation stops unconditionally once this many errors have accumulated.
const MAX_ERROR_COUNT: usize = 100;

/// Compiles a whole source text into a [Program] for the driver's selected target.
///
/// Returns `Ok` even when recoverable errors were reported; check the driver's diagnostics
/// before using the program for anything but diagnosis.
pub fn compile(source: &str, driver: &mut Driver) -> CompileResult<Program> {
    let mut lexer = Lexer::new(source);
    let mut compiler = Compiler::new(driver.options().target);

    program::compile_program(&mut lexer, &mut compiler, driver)?;

    Ok(compiler.into_program())
}

/// A label definition in the current function, recorded for `goto` patching.
#[derive(Debug)]
struct GotoLabel {
    name: String,
    location: SourceLocation,
    label: usize,
}

/// A `goto` awaiting patching. `addr` indexes the placeholder opcode in the function body.
#[derive(Debug)]
struct Goto {
    name: String,
    location: SourceLocation,
    addr: usize,
}

/// The compiler state threaded through the expression, statement and program compilers.
///
/// The `func_*` fields and both allocators are per-function and are reset when a function
/// definition is finalised; everything else is program-wide.
pub struct Compiler {
    scopes: ScopeStack,
    auto_vars: AutoVarAllocator,
    label_count: usize,

    func_body: Vec<OpWithLocation>,
    func_goto_labels: Vec<GotoLabel>,
    func_gotos: Vec<Goto>,

    funcs: Vec<Func>,
    globals: Vec<Global>,
    extrns: Vec<String>,
    data: Vec<u8>,

    target: Target,
}

impl Compiler {
    /// Creates a compiler for the given target.
    pub fn new(target: Target) -> Self {
        Self {
            scopes: ScopeStack::new(),
            auto_vars: AutoVarAllocator::new(),
            label_count: 0,
            func_body: Vec::new(),
            func_goto_labels: Vec::new(),
            func_gotos: Vec::new(),
            funcs: Vec::new(),
            globals: Vec::new(),
            extrns: Vec::new(),
            data: Vec::new(),
            target,
        }
    }

    /// Consumes the compiler and returns the compiled program.
    pub fn into_program(self) -> Program {
        Program { funcs: self.funcs, globals: self.globals, extrns: self.extrns, data: self.data, target: self.target }
    }

    fn push_scope(&mut self) {
        self.scopes.push_scope();
    }

    fn pop_scope(&mut self) {
        self.scopes.pop_scope();
    }

    /// Looks a name up through the scope stack, innermost frame first.
    fn find_var(&self, name: &str) -> Option<&Var> {
        self.scopes.find_deep(name)
    }

    /// Declares a name in the innermost scope. A clash with an existing declaration *in that
    /// frame* reports a redefinition (shadowing an outer frame is fine).
    fn declare_var(
        &mut self,
        driver: &mut Driver,
        name: &str,
        location: SourceLocation,
        storage: Storage,
    ) -> CompileResult<()> {
        match self.scopes.declare(name, location, storage) {
            Ok(()) => Ok(()),
            Err(first_declared_at) => {
                let mut diag =
                    Diagnostic::error_at_location(format!("Redefinition of variable `{name}`"), location);
                diag.add_note("The first declaration is located here".to_string(), Some(first_declared_at));
                driver.add_diagnostic(diag);
                self.bump_error_count(driver)
            }
        }
    }

    /// Allocates a fresh function-local stack slot.
    fn allocate_auto_var(&mut self) -> usize {
        self.auto_vars.allocate()
    }

    /// Allocates a fresh function-local label id.
    fn allocate_label(&mut self) -> usize {
        let label = self.label_count;
        self.label_count += 1;
        label
    }

    /// Appends an opcode to the current function body.
    fn push_opcode(&mut self, opcode: Op, location: SourceLocation) {
        self.func_body.push(OpWithLocation { opcode, location });
    }

    /// Appends a NUL-terminated string to the data segment and returns its byte offset.
    fn add_string(&mut self, value: &str) -> usize {
        let offset = self.data.len();
        self.data.extend_from_slice(value.as_bytes());
        self.data.push(0);
        offset
    }

    /// Records an `extrn` symbol, once.
    fn add_extrn(&mut self, name: &str) {
        if !self.extrns.iter().any(|existing| existing == name) {
            self.extrns.push(name.to_string());
        }
    }

    /// Called after each recoverable error. Stops the compilation once the error count reaches
    /// [MAX_ERROR_COUNT].
    fn bump_error_count(&mut self, driver: &mut Driver) -> CompileResult<()> {
        if driver.error_count() >= MAX_ERROR_COUNT {
            driver.add_diagnostic(Diagnostic::error("TOO MANY ERRORS! Fix your program!".to_string()));
            return Err(CompileError);
        }
        Ok(())
    }
}
