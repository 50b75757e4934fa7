// Copyright 2025-2026 Neil Henderson

//! Integration tests that compile B source files and verify the diagnostics and the produced IR
//! report.

mod invalid_programs;
mod targets;
mod valid_programs;
