//! Octane model generator CLI.
//!
//! Signs in to an Octane workspace, reads its metadata and writes a typed
//! Java model: entity models and interfaces, entity lists, list
//! enumerations and workflow phases.
//!
//! # Examples
//!
//! ```bash
//! # Credentials from the environment, everything else from flags
//! export OCTANE_CLIENT_ID=generator OCTANE_CLIENT_SECRET=...
//! octane-modelgen generate --server https://octane.example.com \
//!     --shared-space 1001 --workspace 1002 --output generated
//!
//! # Settings from a configuration file
//! octane-modelgen generate --config octane.toml --format json
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use modelgen_cli::GenerateArgs;
use modelgen_cli::commands;
use modelgen_core::cli::{ExitCode, OutputFormat};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Octane model generator - compile workspace metadata into a typed Java SDK model.
#[derive(Parser, Debug)]
#[command(name = "octane-modelgen")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (json, text, pretty)
    #[arg(long = "format", global = true, default_value = "pretty")]
    format: String,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the Java model of a workspace.
    ///
    /// Writes `model/`, `entities/` and `enums/` below the package
    /// directory of the output root. Existing files are overwritten.
    Generate(GenerateArgs),

    /// Generate shell completions.
    Completions {
        /// Target shell for completion generation
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let output_format = cli
        .format
        .parse::<OutputFormat>()
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    let exit_code = execute_command(cli.command, output_format).await?;

    std::process::exit(exit_code.as_i32());
}

/// Installs the stderr subscriber.
///
/// `--verbose` forces debug level, otherwise `RUST_LOG` applies with `info`
/// as fallback.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn execute_command(command: Commands, output_format: OutputFormat) -> Result<ExitCode> {
    match command {
        Commands::Generate(args) => commands::generate::run(args, output_format).await,
        Commands::Completions { shell } => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            commands::completions::run(shell, &mut cmd).await
        }
    }
}
