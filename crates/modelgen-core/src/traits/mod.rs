//! Collaborator traits of the model generator.
//!
//! The generator depends on three collaborators, each behind a trait so
//! tests can replace them:
//!
//! - [`MetadataClient`]: talks to the Octane REST API
//! - [`TemplateRenderer`]: renders named templates
//! - [`OutputSink`]: stores generated files

mod client;
mod render;
mod sink;

pub use client::MetadataClient;
pub use render::TemplateRenderer;
pub use sink::OutputSink;
