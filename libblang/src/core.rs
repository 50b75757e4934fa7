// Copyright 2025-2026 Neil Henderson
//
//! The `core` module defines utility types shared across the compiler.

mod internal_error;
mod temp_file;

pub use temp_file::TempFile;
