//! Shell completion generation command.

use anyhow::Result;
use clap::Command;
use clap_complete::{Shell, generate};
use modelgen_core::cli::ExitCode;
use std::io;
use tracing::debug;

/// Writes the completion script for `shell` to stdout.
pub fn generate_completions(shell: Shell, cmd: &mut Command) {
    let name = cmd.get_name().to_string();
    generate(shell, cmd, name, &mut io::stdout());
}

/// Runs the completions command.
///
/// # Examples
///
/// ```no_run
/// use clap::Command;
/// use clap_complete::Shell;
/// use modelgen_cli::commands::completions;
///
/// # #[tokio::main]
/// # async fn main() {
/// let mut cmd = Command::new("octane-modelgen");
/// assert!(completions::run(Shell::Bash, &mut cmd).await.is_ok());
/// # }
/// ```
pub async fn run(shell: Shell, cmd: &mut Command) -> Result<ExitCode> {
    debug!("Generating {shell} completions");
    generate_completions(shell, cmd);
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_completions_for_each_shell() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell] {
            let mut cmd = Command::new("octane-modelgen").subcommand(Command::new("generate"));
            generate_completions(shell, &mut cmd);
        }
    }

    #[tokio::test]
    async fn test_run_returns_success() {
        let mut cmd = Command::new("octane-modelgen");
        let code = run(Shell::Bash, &mut cmd).await.unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
    }
}
