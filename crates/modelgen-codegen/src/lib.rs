//! Metadata-to-type-model compiler for Octane.
//!
//! Turns entity, field, list and phase metadata into typed Java sources
//! using Handlebars templates. The crate is organized leaf-first:
//!
//! - [`naming`]: identifier normalization
//! - [`catalog`]: entity type index and generation exclusions
//! - [`references`]: reference field resolution
//! - [`lists`] and [`phases`]: enumeration builders
//! - [`combinator`]: required-field constructor overloads
//! - [`model`] and [`types`]: rendering contexts
//! - [`generator`]: the end-to-end pipeline

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod catalog;
pub mod combinator;
pub mod generator;
pub mod lists;
pub mod model;
pub mod naming;
pub mod phases;
pub mod references;
pub mod sink;
pub mod template_engine;
pub mod types;

pub use catalog::{EntityCatalog, is_excluded};
pub use combinator::{RequiredFieldCombination, RequiredFieldValue, RequiredFields};
pub use generator::{GenerationReport, ModelGenerator, OutputLayout};
pub use lists::{ListCatalog, ListEnum, ListItem};
pub use phases::{PhaseCatalog, PhaseEntry, PhaseGroup};
pub use references::{ReferenceResolution, ReferenceResolver, TypeExpression};
pub use sink::{FileSystemSink, MemorySink};
pub use template_engine::TemplateEngine;
