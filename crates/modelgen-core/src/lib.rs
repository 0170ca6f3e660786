//! Core types, traits, and errors for Octane model generation.
//!
//! This crate provides the foundational types and abstractions shared by the
//! HTTP client, the code generator and the command-line front end.
//!
//! # Architecture
//!
//! The core consists of:
//! - Metadata descriptors as returned by the Octane metadata API
//! - The query filter language used against entity collections
//! - Error hierarchy with contextual information
//! - Collaborator traits (`MetadataClient`, `TemplateRenderer`, `OutputSink`)
//! - Generator configuration

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod config;
mod error;
mod metadata;
mod query;
mod record;
mod types;

pub mod cli;
pub mod traits;

pub use config::{
    ApiMode, ConfigFile, Credentials, GeneratorConfig, GeneratorConfigBuilder, parse_ignored_list_ids,
};
pub use error::{Error, Result};
pub use metadata::{
    EntityTypeDescriptor, Feature, FieldDescriptor, FieldType, FieldTypeData, ListNode,
    PhaseRecord, ReferenceTarget,
};
pub use query::{Query, QueryRequest, QueryValue};
pub use record::EntityRecord;
pub use types::{ActivityLevel, EntityName};

/// Entity type name of list nodes.
pub const LIST_NODE: &str = "list_node";

/// Entity type name of the work item root, only visible in technical preview.
pub const WORK_ITEM_ROOT: &str = "work_item_root";
