//! Pre-commit guard: blocks commits touching protected paths and rejects (or
//! strips) newly added debug-output statements.
pub mod builders;
pub mod core;
pub mod utils;
