//! Octane REST client.
//!
//! Implements [`modelgen_core::traits::MetadataClient`] on top of `reqwest`,
//! using the cookie based session of the Octane API key sign-in.

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod client;
mod page;

pub use client::{DEFAULT_PAGE_SIZE, OctaneClient};
pub use page::Page;
