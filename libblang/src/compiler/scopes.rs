// Copyright 2025 Neil Henderson, Blue Tarp Media.
//
//! The `scopes` module defines the stack of name-binding frames used during compilation.

use crate::lexer::SourceLocation;

/// Where a variable's value lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Storage {
    /// A function-local stack slot, addressed by a dense 1-based index.
    Auto { index: usize },

    /// A global or function, addressed by its external symbol name.
    External { name: String },
}

/// A name binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Var {
    pub name: String,

    /// Where the name was declared, for redefinition notes.
    pub location: SourceLocation,

    pub storage: Storage,
}

/// An ordered stack of per-scope binding frames.
///
/// Lookup walks from the innermost frame outwards and the first match wins, which gives lexical
/// shadowing.
#[derive(Debug, Default)]
pub struct ScopeStack {
    scopes: Vec<Vec<Var>>,
}

impl ScopeStack {
    /// Creates an empty scope stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters a new, innermost scope.
    pub fn push_scope(&mut self) {
        self.scopes.push(Vec::new());
    }

    /// Leaves the innermost scope, dropping its bindings.
    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// Finds a binding within a single frame.
    pub fn find_near<'a>(scope: &'a [Var], name: &str) -> Option<&'a Var> {
        scope.iter().find(|var| var.name == name)
    }

    /// Finds a binding anywhere in the stack, innermost frame first.
    pub fn find_deep(&self, name: &str) -> Option<&Var> {
        self.scopes.iter().rev().find_map(|scope| Self::find_near(scope, name))
    }

    /// Declares a binding in the innermost frame.
    ///
    /// Fails with the location of the existing declaration if the name is already bound in that
    /// frame. A binding in an outer frame does not conflict; the new one shadows it.
    pub fn declare(&mut self, name: &str, location: SourceLocation, storage: Storage) -> Result<(), SourceLocation> {
        let scope = self.scopes.last_mut().expect("A scope must be entered before declaring into it");

        if let Some(existing) = Self::find_near(scope, name) {
            return Err(existing.location);
        }

        scope.push(Var { name: name.to_string(), location, storage });
        Ok(())
    }
}
