//! Error types for Octane model generation.
//!
//! Errors fall into the classes the generator distinguishes: network and
//! authentication failures, metadata consistency failures, configuration
//! problems, and local rendering or output failures.
//!
//! # Examples
//!
//! ```
//! use modelgen_core::{Error, Result};
//!
//! fn require_server(url: &str) -> Result<()> {
//!     if url.is_empty() {
//!         return Err(Error::ConfigError {
//!             message: "Server URL cannot be empty".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//!
//! let err = require_server("").unwrap_err();
//! assert!(err.is_config_error());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Octane model generation.
///
/// All errors in the system use this type, providing consistent error handling
/// across all crates in the workspace.
#[derive(Error, Debug)]
pub enum Error {
    /// The Octane server could not be reached.
    ///
    /// Raised for transport level failures: DNS, TLS, refused connections
    /// and broken responses.
    #[error("Octane server connection failed: {server}")]
    ConnectionFailed {
        /// Server URL that failed to connect
        server: String,
        /// Underlying error cause
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Sign-in was rejected by the server.
    #[error("Authentication against {server} failed with status {status}: {message}")]
    AuthenticationFailed {
        /// Server URL
        server: String,
        /// HTTP status returned by the sign-in endpoint
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// The REST API answered with a non-success status.
    #[error("Request to {endpoint} failed with status {status}: {message}")]
    ApiError {
        /// Endpoint path that was requested
        endpoint: String,
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// Resource not found error.
    ///
    /// Occurs when a requested entity type or record does not exist.
    #[error("Resource not found: {resource}")]
    ResourceNotFound {
        /// Identifier of the missing resource
        resource: String,
    },

    /// Configuration error.
    ///
    /// Raised when configuration is invalid, missing required fields,
    /// or contains contradictory settings.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// Serialization/deserialization error.
    ///
    /// Raised when JSON or TOML conversion fails.
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Description of the serialization failure
        message: String,
        /// Underlying serde error
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Invalid argument error.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Validation error for configuration values and domain types.
    #[error("Validation error in {field}: {reason}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Detailed reason for the validation failure
        reason: String,
    },

    /// Server metadata is internally inconsistent.
    ///
    /// Raised when a field cannot be turned into a type, for example a
    /// reference without targets or a required field without candidates.
    #[error("Inconsistent metadata for {entity}.{field}: {reason}")]
    InvalidMetadata {
        /// Owning entity type
        entity: String,
        /// Offending field
        field: String,
        /// What is wrong with it
        reason: String,
    },

    /// A list node reference points at a logical name without a list root.
    #[error("Field {entity}.{field} references unknown list '{logical_name}'")]
    UnknownList {
        /// Owning entity type
        entity: String,
        /// Offending field
        field: String,
        /// Logical name that has no generated list
        logical_name: String,
    },

    /// Template registration or rendering failed.
    #[error("Template '{template}' failed: {message}")]
    TemplateError {
        /// Template name
        template: String,
        /// Description of the failure
        message: String,
    },

    /// Writing generated output failed.
    #[error("I/O error on {}: {source}", path.display())]
    IoError {
        /// Path being written or read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Returns `true` if this is a network or authentication error.
    ///
    /// # Examples
    ///
    /// ```
    /// use modelgen_core::Error;
    ///
    /// let err = Error::AuthenticationFailed {
    ///     server: "https://octane.example.com".to_string(),
    ///     status: 401,
    ///     message: "bad credentials".to_string(),
    /// };
    /// assert!(err.is_connection_error());
    /// ```
    #[must_use]
    pub const fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed { .. } | Self::AuthenticationFailed { .. } | Self::ApiError { .. }
        )
    }

    /// Returns `true` if this is a resource not found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::ResourceNotFound { .. })
    }

    /// Returns `true` if this is a configuration error.
    ///
    /// Validation errors and invalid arguments count as configuration errors.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigError { .. } | Self::ValidationError { .. } | Self::InvalidArgument(_)
        )
    }

    /// Returns `true` if the server metadata could not be compiled into types.
    ///
    /// # Examples
    ///
    /// ```
    /// use modelgen_core::Error;
    ///
    /// let err = Error::UnknownList {
    ///     entity: "defect".to_string(),
    ///     field: "severity".to_string(),
    ///     logical_name: "list_node.severity".to_string(),
    /// };
    /// assert!(err.is_metadata_error());
    /// ```
    #[must_use]
    pub const fn is_metadata_error(&self) -> bool {
        matches!(self, Self::InvalidMetadata { .. } | Self::UnknownList { .. })
    }

    /// Returns `true` if this is a template error.
    #[must_use]
    pub const fn is_template_error(&self) -> bool {
        matches!(self, Self::TemplateError { .. })
    }

    /// Returns `true` if this is an I/O error.
    #[must_use]
    pub const fn is_io_error(&self) -> bool {
        matches!(self, Self::IoError { .. })
    }
}

/// Result type alias for generator operations.
pub type Result<T> = std::result::Result<T, Error>;
