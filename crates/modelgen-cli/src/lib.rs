//! Octane model generator CLI library.
//!
//! Exposes the command implementations and output formatters so they can
//! be tested without spawning the binary.

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::unused_async)]

pub mod commands;
pub mod formatters;

pub use commands::generate::{GenerateArgs, GenerationSummary};
