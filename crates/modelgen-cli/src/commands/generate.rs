//! Generate command implementation.
//!
//! Resolves the generator configuration from flags, environment and the
//! optional configuration file, then runs the pipeline against the server
//! and writes the Java sources below the output directory.

use crate::formatters::format_summary;
use anyhow::{Context, Result};
use clap::Args;
use modelgen_client::OctaneClient;
use modelgen_codegen::{FileSystemSink, GenerationReport, ModelGenerator};
use modelgen_core::cli::{ExitCode, OutputFormat};
use modelgen_core::{ApiMode, ConfigFile, GeneratorConfig, GeneratorConfigBuilder};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info};

/// Arguments of the `generate` command.
///
/// Every setting can also come from an `OCTANE_*` environment variable or
/// the configuration file. Flags win over environment, environment wins over
/// the file.
#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// Configuration file (default: <config dir>/octane-modelgen/config.toml)
    #[arg(long, env = "OCTANE_MODELGEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Server URL including protocol and port
    #[arg(long, env = "OCTANE_SERVER")]
    pub server: Option<String>,

    /// Shared space id
    #[arg(long, env = "OCTANE_SHARED_SPACE")]
    pub shared_space: Option<u64>,

    /// Workspace id
    #[arg(long, env = "OCTANE_WORKSPACE")]
    pub workspace: Option<u64>,

    /// API client id
    #[arg(long, env = "OCTANE_CLIENT_ID")]
    pub client_id: Option<String>,

    /// API client secret
    #[arg(long, env = "OCTANE_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Accept invalid TLS certificates
    #[arg(long, env = "OCTANE_TRUST_ALL_CERTS")]
    pub trust_all_certs: bool,

    /// Use the technical preview API for the main session
    #[arg(long, env = "OCTANE_TECH_PREVIEW")]
    pub tech_preview: bool,

    /// Comma separated list root ids to leave out
    #[arg(long, env = "OCTANE_IGNORED_LIST_IDS")]
    pub ignored_list_ids: Option<String>,

    /// Directory below which the package tree is written
    #[arg(short, long, env = "OCTANE_OUTPUT_DIR")]
    pub output: Option<PathBuf>,

    /// Java package of the generated sources
    #[arg(long, env = "OCTANE_PACKAGE")]
    pub package: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long, env = "OCTANE_TIMEOUT")]
    pub timeout: Option<u64>,
}

/// Result of a generation run as printed by the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationSummary {
    /// Output root
    pub output_dir: PathBuf,
    /// Java package
    pub package: String,
    /// List enumerations written
    pub lists: usize,
    /// Phase enumerations written
    pub phase_groups: usize,
    /// Entity types that received models
    pub entities: usize,
    /// Entity types excluded from generation
    pub skipped: Vec<String>,
    /// Files written
    pub files: usize,
}

impl GenerationSummary {
    /// Summarizes `report` for the run described by `config`.
    #[must_use]
    pub fn new(config: &GeneratorConfig, report: &GenerationReport) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            package: config.package.clone(),
            lists: report.lists,
            phase_groups: report.phase_groups,
            entities: report.entities.len(),
            skipped: report.skipped.clone(),
            files: report.files.len(),
        }
    }
}

/// Runs the generate command.
///
/// Generator errors are logged and mapped to an exit code. Only failures
/// of the CLI itself, such as printing the summary, are returned as errors.
pub async fn run(args: GenerateArgs, output_format: OutputFormat) -> Result<ExitCode> {
    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return Ok(ExitCode::for_error(&e));
        }
    };

    info!(
        "Generating package {} from {} (shared space {}, workspace {})",
        config.package, config.server, config.shared_space, config.workspace
    );

    let report = match generate(&config).await {
        Ok(report) => report,
        Err(e) => {
            error!("Generation failed: {e}");
            return Ok(ExitCode::for_error(&e));
        }
    };

    let summary = GenerationSummary::new(&config, &report);
    let output = format_summary(&summary, output_format)
        .context("failed to format generation summary")?;
    println!("{output}");

    Ok(ExitCode::SUCCESS)
}

async fn generate(config: &GeneratorConfig) -> modelgen_core::Result<GenerationReport> {
    let mut client = OctaneClient::new(config)?;
    let generator = ModelGenerator::new(config)?;
    let mut sink = FileSystemSink::new(&config.output_dir);
    generator
        .generate(&mut client, &config.credentials, &mut sink)
        .await
}

/// Builds the generator configuration from `args` and the configuration file.
///
/// # Errors
///
/// Returns an error if the configuration file cannot be read or a mandatory
/// setting is missing or invalid.
pub fn build_config(args: &GenerateArgs) -> modelgen_core::Result<GeneratorConfig> {
    let file = load_config_file(args.config.as_deref())?;
    apply_args(GeneratorConfig::builder(), args)
        .with_file_defaults(file)
        .build()
}

fn apply_args(mut builder: GeneratorConfigBuilder, args: &GenerateArgs) -> GeneratorConfigBuilder {
    if let Some(server) = &args.server {
        builder = builder.server(server);
    }
    if let Some(id) = args.shared_space {
        builder = builder.shared_space(id);
    }
    if let Some(id) = args.workspace {
        builder = builder.workspace(id);
    }
    if let Some(client_id) = &args.client_id {
        builder = builder.client_id(client_id);
    }
    if let Some(secret) = &args.client_secret {
        builder = builder.client_secret(secret);
    }
    // Unset boolean flags defer to the configuration file.
    if args.trust_all_certs {
        builder = builder.trust_all_certs(true);
    }
    if args.tech_preview {
        builder = builder.api_mode(ApiMode::TechnicalPreview);
    }
    if let Some(ids) = &args.ignored_list_ids {
        builder = builder.ignored_list_ids(ids);
    }
    if let Some(output) = &args.output {
        builder = builder.output_dir(output);
    }
    if let Some(package) = &args.package {
        builder = builder.package(package);
    }
    if let Some(seconds) = args.timeout {
        builder = builder.request_timeout(Duration::from_secs(seconds));
    }
    builder
}

/// Loads the explicit configuration file, or the default one if it exists.
fn load_config_file(explicit: Option<&Path>) -> modelgen_core::Result<ConfigFile> {
    if let Some(path) = explicit {
        return ConfigFile::load(path);
    }
    match ConfigFile::default_path().filter(|path| path.is_file()) {
        Some(path) => ConfigFile::load(&path),
        None => Ok(ConfigFile::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, text: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        fs::write(&path, text).unwrap();
        path
    }

    fn complete_args() -> GenerateArgs {
        GenerateArgs {
            server: Some("https://octane.example.com".to_string()),
            shared_space: Some(1001),
            workspace: Some(1002),
            client_id: Some("client".to_string()),
            client_secret: Some("secret".to_string()),
            ..GenerateArgs::default()
        }
    }

    #[test]
    fn test_build_config_from_flags() {
        let dir = TempDir::new().unwrap();
        let args = GenerateArgs {
            config: Some(write_config(&dir, "")),
            ignored_list_ids: Some("1500, 1600".to_string()),
            tech_preview: true,
            package: Some("com.acme.octane".to_string()),
            ..complete_args()
        };

        let config = build_config(&args).unwrap();
        assert_eq!(config.server, "https://octane.example.com");
        assert_eq!(config.api_mode, ApiMode::TechnicalPreview);
        assert_eq!(config.ignored_list_ids.len(), 2);
        assert_eq!(config.package, "com.acme.octane");
    }

    #[test]
    fn test_flags_override_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
server = "https://file.example.com"
shared_space = 7
workspace = 8
client_id = "file-client"
client_secret = "file-secret"
trust_all_certs = true
package = "com.file"
"#,
        );
        let args = GenerateArgs {
            config: Some(path),
            workspace: Some(42),
            ..GenerateArgs::default()
        };

        let config = build_config(&args).unwrap();
        assert_eq!(config.server, "https://file.example.com");
        assert_eq!(config.shared_space, 7);
        assert_eq!(config.workspace, 42);
        assert_eq!(config.credentials.client_id, "file-client");
        assert!(config.trust_all_certs);
        assert_eq!(config.package, "com.file");
    }

    #[test]
    fn test_missing_setting_is_invalid_input() {
        let dir = TempDir::new().unwrap();
        let args = GenerateArgs {
            config: Some(write_config(&dir, "")),
            client_secret: None,
            ..complete_args()
        };

        let err = build_config(&args).unwrap_err();
        assert!(err.is_config_error());
        assert_eq!(ExitCode::for_error(&err), ExitCode::INVALID_INPUT);
    }

    #[test]
    fn test_missing_explicit_config_file_fails() {
        let dir = TempDir::new().unwrap();
        let args = GenerateArgs {
            config: Some(dir.path().join("absent.toml")),
            ..complete_args()
        };

        let err = build_config(&args).unwrap_err();
        assert!(err.is_io_error());
    }

    #[test]
    fn test_summary_from_report() {
        let dir = TempDir::new().unwrap();
        let args = GenerateArgs {
            config: Some(write_config(&dir, "")),
            output: Some(PathBuf::from("out")),
            ..complete_args()
        };
        let config = build_config(&args).unwrap();
        let report = GenerationReport {
            lists: 3,
            phase_groups: 2,
            entities: vec!["defect".to_string(), "story".to_string()],
            skipped: vec!["audit".to_string()],
            files: vec![PathBuf::from("a.java"); 9],
        };

        let summary = GenerationSummary::new(&config, &report);
        assert_eq!(summary.output_dir, PathBuf::from("out"));
        assert_eq!(summary.entities, 2);
        assert_eq!(summary.files, 9);
        assert_eq!(summary.skipped, ["audit"]);
    }

    #[tokio::test]
    async fn test_run_reports_config_errors_as_exit_code() {
        let dir = TempDir::new().unwrap();
        let args = GenerateArgs {
            config: Some(write_config(&dir, "server = \"ftp://octane\"")),
            server: None,
            ..complete_args()
        };

        let code = run(args, OutputFormat::Json).await.unwrap();
        assert_eq!(code, ExitCode::INVALID_INPUT);
    }
}
