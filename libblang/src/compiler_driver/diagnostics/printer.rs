// Copyright 2025-2026 Neil Henderson
//
//! The `printer` module defines functionality for printing diagnostics.
//!
//! Diagnostics print one per line as `path:line:column: ERROR: message`, optionally followed by
//! `path:line:column: NOTE: ...` lines referring to earlier related positions.

use std::io::Write;

use super::Diagnostic;

/// Prints diagnostics.
#[derive(Debug)]
pub struct Printer<'a, W: Write> {
    buffer: W,
    source_filename: &'a str,
}

impl<'a, W: Write> Printer<'a, W> {
    /// Creates a new diagnostic printer that writes to the given `buffer`.
    ///
    /// `buffer` must implement `std::io::Write`.
    pub fn new(buffer: W, source_filename: &'a str) -> Self {
        Self { buffer, source_filename }
    }

    /// Prints all the diagnostics, in the order the compiler emitted them.
    pub fn print_diagnostics(&mut self, errors: &[Diagnostic]) {
        for error in errors {
            self.print(error);
        }

        if !errors.is_empty() {
            let errors_label = if errors.len() == 1 { "error" } else { "errors" };
            _ = writeln!(self.buffer, "{} {} generated", errors.len(), errors_label);
        }

        _ = self.buffer.flush();
    }

    /// Prints a diagnostic and its notes.
    fn print(&mut self, diagnostic: &Diagnostic) {
        match diagnostic.location {
            Some(loc) => {
                _ = writeln!(
                    self.buffer,
                    "{}:{}:{}: ERROR: {}",
                    self.source_filename, loc.line, loc.column, diagnostic.message
                );
            }
            None => {
                _ = writeln!(self.buffer, "ERROR: {}", diagnostic.message);
            }
        }

        for note in &diagnostic.notes {
            match note.location {
                Some(loc) => {
                    _ = writeln!(
                        self.buffer,
                        "{}:{}:{}: NOTE: {}",
                        self.source_filename, loc.line, loc.column, note.note
                    );
                }
                None => {
                    _ = writeln!(self.buffer, "NOTE: {}", note.note);
                }
            }
        }
    }
}
