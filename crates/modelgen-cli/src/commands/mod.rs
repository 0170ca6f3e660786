//! Command implementations for the generator CLI.
//!
//! Each command resolves its inputs, runs the operation, and prints its
//! result in the requested output format.

pub mod completions;
pub mod generate;
