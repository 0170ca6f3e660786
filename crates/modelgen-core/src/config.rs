//! Configuration types for Octane model generation.
//!
//! Configuration is layered: an optional TOML file provides defaults, and
//! explicit values (environment variables and command-line flags, applied by
//! the CLI) override them. [`GeneratorConfigBuilder::build`] validates the
//! merged result.
//!
//! # Examples
//!
//! ```
//! use modelgen_core::{ApiMode, GeneratorConfig};
//!
//! let config = GeneratorConfig::builder()
//!     .server("https://octane.example.com")
//!     .shared_space(1001)
//!     .workspace(1002)
//!     .client_id("generator")
//!     .client_secret("s3cret")
//!     .ignored_list_ids("1500, 1600")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.api_mode, ApiMode::Default);
//! assert!(config.ignored_list_ids.contains("1600"));
//! assert_eq!(config.package_path().to_str(), Some("com/hpe/adm/nga/sdk"));
//! ```

use crate::{Error, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root package of the generated sources.
pub const DEFAULT_PACKAGE: &str = "com.hpe.adm.nga.sdk";

/// Default HTTP request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// API mode requested at sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ApiMode {
    /// Public API only
    #[default]
    Default,
    /// Technical preview API, exposes types such as `work_item_root`
    TechnicalPreview,
}

impl ApiMode {
    /// Maps the `--tech-preview` flag to a mode.
    #[must_use]
    pub const fn from_tech_preview(enabled: bool) -> Self {
        if enabled {
            Self::TechnicalPreview
        } else {
            Self::Default
        }
    }

    /// Returns `true` for technical preview.
    #[must_use]
    pub const fn is_technical_preview(self) -> bool {
        matches!(self, Self::TechnicalPreview)
    }
}

impl fmt::Display for ApiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("default"),
            Self::TechnicalPreview => f.write_str("technical-preview"),
        }
    }
}

/// API key credentials.
///
/// The secret is redacted from `Debug` output.
pub struct Credentials {
    /// API client id
    pub client_id: String,
    /// API client secret
    pub client_secret: SecretString,
}

impl Credentials {
    /// Creates credentials.
    #[must_use]
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: SecretString::from(client_secret.into()),
        }
    }

    /// Returns the secret in clear text, for the sign-in request body only.
    #[must_use]
    pub fn secret(&self) -> &str {
        self.client_secret.expose_secret()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// Validated generator configuration.
#[derive(Debug)]
pub struct GeneratorConfig {
    /// Server base URL including protocol and port
    pub server: String,
    /// Shared space id
    pub shared_space: u64,
    /// Workspace id
    pub workspace: u64,
    /// API key credentials
    pub credentials: Credentials,
    /// Accept invalid TLS certificates
    pub trust_all_certs: bool,
    /// API mode of the main session
    pub api_mode: ApiMode,
    /// List root ids excluded from list generation
    pub ignored_list_ids: BTreeSet<String>,
    /// Directory below which the package tree is written
    pub output_dir: PathBuf,
    /// Java package of the generated sources
    pub package: String,
    /// Timeout for each HTTP request
    pub request_timeout: Duration,
}

impl GeneratorConfig {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> GeneratorConfigBuilder {
        GeneratorConfigBuilder::default()
    }

    /// Returns the package as a relative directory path.
    #[must_use]
    pub fn package_path(&self) -> PathBuf {
        self.package.split('.').collect()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] naming the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        if !(self.server.starts_with("http://") || self.server.starts_with("https://")) {
            return Err(invalid("server", "must start with http:// or https://"));
        }
        if self.shared_space == 0 {
            return Err(invalid("shared_space", "must be a positive id"));
        }
        if self.workspace == 0 {
            return Err(invalid("workspace", "must be a positive id"));
        }
        if self.credentials.client_id.trim().is_empty() {
            return Err(invalid("client_id", "cannot be empty"));
        }
        if self.credentials.secret().is_empty() {
            return Err(invalid("client_secret", "cannot be empty"));
        }
        if !is_valid_package(&self.package) {
            return Err(invalid(
                "package",
                &format!("'{}' is not a valid Java package name", self.package),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(invalid("request_timeout", "must be greater than zero"));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> Error {
    Error::ValidationError {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

fn is_valid_package(package: &str) -> bool {
    !package.is_empty()
        && package.split('.').all(|segment| {
            let mut chars = segment.chars();
            chars
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

/// Splits a comma separated list of list root ids.
///
/// # Examples
///
/// ```
/// use modelgen_core::parse_ignored_list_ids;
///
/// let ids = parse_ignored_list_ids(" 1001,,1002 ");
/// assert_eq!(ids.len(), 2);
/// ```
#[must_use]
pub fn parse_ignored_list_ids(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// Settings read from a TOML configuration file.
///
/// Every key is optional; missing keys fall back to command-line values or
/// defaults.
///
/// ```toml
/// server = "https://octane.example.com"
/// shared_space = 1001
/// workspace = 1002
/// client_id = "generator"
/// ignored_list_ids = ["1500"]
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Server base URL
    pub server: Option<String>,
    /// Shared space id
    pub shared_space: Option<u64>,
    /// Workspace id
    pub workspace: Option<u64>,
    /// API client id
    pub client_id: Option<String>,
    /// API client secret
    pub client_secret: Option<String>,
    /// Accept invalid TLS certificates
    pub trust_all_certs: Option<bool>,
    /// Use the technical preview API for the main session
    pub tech_preview: Option<bool>,
    /// Ignored list root ids
    #[serde(default)]
    pub ignored_list_ids: Vec<String>,
    /// Output directory
    pub output_dir: Option<PathBuf>,
    /// Java package
    pub package: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

impl ConfigFile {
    /// Default location: `<config dir>/octane-modelgen/config.toml`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("octane-modelgen").join("config.toml"))
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] for malformed TOML or unknown keys.
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::ConfigError {
            message: format!("invalid configuration file: {e}"),
        })
    }

    /// Loads configuration from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IoError`] if the file cannot be read, or
    /// [`Error::ConfigError`] if it cannot be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loaded configuration file {}", path.display());
        Self::parse(&text)
    }
}

/// Builder for [`GeneratorConfig`].
#[derive(Debug, Default)]
pub struct GeneratorConfigBuilder {
    server: Option<String>,
    shared_space: Option<u64>,
    workspace: Option<u64>,
    client_id: Option<String>,
    client_secret: Option<SecretString>,
    trust_all_certs: Option<bool>,
    api_mode: Option<ApiMode>,
    ignored_list_ids: BTreeSet<String>,
    output_dir: Option<PathBuf>,
    package: Option<String>,
    request_timeout: Option<Duration>,
}

impl GeneratorConfigBuilder {
    /// Applies values from a configuration file.
    ///
    /// File values only fill settings that are still unset, so call this
    /// after applying explicit values.
    #[must_use]
    pub fn with_file_defaults(mut self, file: ConfigFile) -> Self {
        self.server = self.server.or(file.server);
        self.shared_space = self.shared_space.or(file.shared_space);
        self.workspace = self.workspace.or(file.workspace);
        self.client_id = self.client_id.or(file.client_id);
        self.client_secret = self
            .client_secret
            .or_else(|| file.client_secret.map(SecretString::from));
        self.trust_all_certs = self.trust_all_certs.or(file.trust_all_certs);
        self.api_mode = self
            .api_mode
            .or_else(|| file.tech_preview.map(ApiMode::from_tech_preview));
        if self.ignored_list_ids.is_empty() {
            self.ignored_list_ids = file.ignored_list_ids.into_iter().collect();
        }
        self.output_dir = self.output_dir.or(file.output_dir);
        self.package = self.package.or(file.package);
        self.request_timeout = self
            .request_timeout
            .or_else(|| file.timeout_secs.map(Duration::from_secs));
        self
    }

    /// Sets the server URL. A trailing slash is removed.
    #[must_use]
    pub fn server(mut self, server: impl Into<String>) -> Self {
        let server: String = server.into();
        self.server = Some(server.trim_end_matches('/').to_string());
        self
    }

    /// Sets the shared space id.
    #[must_use]
    pub const fn shared_space(mut self, id: u64) -> Self {
        self.shared_space = Some(id);
        self
    }

    /// Sets the workspace id.
    #[must_use]
    pub const fn workspace(mut self, id: u64) -> Self {
        self.workspace = Some(id);
        self
    }

    /// Sets the API client id.
    #[must_use]
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Sets the API client secret.
    #[must_use]
    pub fn client_secret(mut self, secret: impl Into<String>) -> Self {
        self.client_secret = Some(SecretString::from(secret.into()));
        self
    }

    /// Accepts invalid TLS certificates when `true`.
    #[must_use]
    pub const fn trust_all_certs(mut self, trust: bool) -> Self {
        self.trust_all_certs = Some(trust);
        self
    }

    /// Sets the API mode of the main session.
    #[must_use]
    pub const fn api_mode(mut self, mode: ApiMode) -> Self {
        self.api_mode = Some(mode);
        self
    }

    /// Sets the ignored list root ids from a comma separated string.
    #[must_use]
    pub fn ignored_list_ids(mut self, raw: &str) -> Self {
        self.ignored_list_ids = parse_ignored_list_ids(raw);
        self
    }

    /// Sets the output directory.
    #[must_use]
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Sets the Java package.
    #[must_use]
    pub fn package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    /// Sets the HTTP request timeout.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if a mandatory setting is missing, or
    /// [`Error::ValidationError`] if a value is invalid.
    pub fn build(self) -> Result<GeneratorConfig> {
        let config = GeneratorConfig {
            server: self.server.ok_or_else(|| missing("server"))?,
            shared_space: self.shared_space.ok_or_else(|| missing("shared_space"))?,
            workspace: self.workspace.ok_or_else(|| missing("workspace"))?,
            credentials: Credentials {
                client_id: self.client_id.ok_or_else(|| missing("client_id"))?,
                client_secret: self.client_secret.ok_or_else(|| missing("client_secret"))?,
            },
            trust_all_certs: self.trust_all_certs.unwrap_or(false),
            api_mode: self.api_mode.unwrap_or_default(),
            ignored_list_ids: self.ignored_list_ids,
            output_dir: self.output_dir.unwrap_or_else(|| PathBuf::from("generated")),
            package: self.package.unwrap_or_else(|| DEFAULT_PACKAGE.to_string()),
            request_timeout: self.request_timeout.unwrap_or(DEFAULT_TIMEOUT),
        };
        config.validate()?;
        Ok(config)
    }
}

fn missing(setting: &str) -> Error {
    Error::ConfigError {
        message: format!("missing required setting '{setting}'"),
    }
}
