// Copyright 2025-2026 Neil Henderson
//
//! The `diagnostics` module defines the errors emitted by the compiler driver.

pub mod printer;

use crate::lexer::SourceLocation;

/// A diagnostic emitted by the compiler.
#[derive(Debug)]
pub struct Diagnostic {
    message: String,
    location: Option<SourceLocation>,
    notes: Vec<Note>,
}

/// A note attached to a diagnostic, pointing at an earlier related position (e.g. the first
/// declaration of a redefined name).
#[derive(Debug, Clone)]
pub struct Note {
    pub note: String,
    pub location: Option<SourceLocation>,
}

impl Diagnostic {
    /// Creates an error diagnostic with the given error message and no source code location.
    pub fn error(message: String) -> Self {
        Self { message, location: None, notes: Vec::new() }
    }

    /// Creates an error diagnostic with the given error message and source code location.
    pub fn error_at_location(message: String, location: SourceLocation) -> Self {
        Self { message, location: Some(location), notes: Vec::new() }
    }

    /// Adds a note to the diagnostic.
    pub fn add_note(&mut self, note: String, location: Option<SourceLocation>) {
        self.notes.push(Note { note, location });
    }

    /// The diagnostic message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The source code location of the diagnostic, if it has one.
    pub fn location(&self) -> Option<SourceLocation> {
        self.location
    }
}
