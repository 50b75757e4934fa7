// Copyright 2025-2026 Neil Henderson

mod expr_tests;
mod program_tests;

mod utils;
