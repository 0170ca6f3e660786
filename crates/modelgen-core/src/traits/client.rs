//! Metadata client trait.

use crate::config::Credentials;
use crate::{
    ApiMode, EntityRecord, EntityTypeDescriptor, FieldDescriptor, QueryRequest, Result,
};
use async_trait::async_trait;

/// Access to the Octane metadata and entity APIs of one workspace.
///
/// A client holds at most one session. Callers authenticate, issue
/// requests, and sign out; a client may be authenticated again afterwards
/// in a different [`ApiMode`].
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use modelgen_core::traits::MetadataClient;
/// use modelgen_core::{
///     ApiMode, EntityRecord, EntityTypeDescriptor, FieldDescriptor, QueryRequest, Result,
/// };
/// use modelgen_core::Credentials;
///
/// struct Offline;
///
/// #[async_trait]
/// impl MetadataClient for Offline {
///     async fn authenticate(&mut self, _: &Credentials, _: ApiMode) -> Result<()> {
///         Ok(())
///     }
///     async fn sign_out(&mut self) -> Result<()> {
///         Ok(())
///     }
///     async fn entity_types(&self) -> Result<Vec<EntityTypeDescriptor>> {
///         Ok(vec![EntityTypeDescriptor::new("defect")])
///     }
///     async fn entity_type(&self, name: &str) -> Result<EntityTypeDescriptor> {
///         Ok(EntityTypeDescriptor::new(name))
///     }
///     async fn fields(&self, _: &str) -> Result<Vec<FieldDescriptor>> {
///         Ok(Vec::new())
///     }
///     async fn query(&self, _: &str, _: &QueryRequest) -> Result<Vec<EntityRecord>> {
///         Ok(Vec::new())
///     }
/// }
/// ```
#[async_trait]
pub trait MetadataClient: Send + Sync {
    /// Opens a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the server is unreachable or rejects the
    /// credentials.
    async fn authenticate(&mut self, credentials: &Credentials, mode: ApiMode) -> Result<()>;

    /// Closes the current session.
    ///
    /// # Errors
    ///
    /// Returns an error if the sign-out request fails.
    async fn sign_out(&mut self) -> Result<()>;

    /// Lists every entity type of the workspace.
    ///
    /// # Errors
    ///
    /// Returns an error on network or decoding failures.
    async fn entity_types(&self) -> Result<Vec<EntityTypeDescriptor>>;

    /// Fetches one entity type by name.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ResourceNotFound`] if the type does not exist
    /// in the current API mode.
    async fn entity_type(&self, name: &str) -> Result<EntityTypeDescriptor>;

    /// Lists the field descriptors of an entity type.
    ///
    /// # Errors
    ///
    /// Returns an error on network or decoding failures.
    async fn fields(&self, entity: &str) -> Result<Vec<FieldDescriptor>>;

    /// Fetches all records of `collection` matching `request`.
    ///
    /// # Errors
    ///
    /// Returns an error on network or decoding failures.
    async fn query(&self, collection: &str, request: &QueryRequest) -> Result<Vec<EntityRecord>>;
}
