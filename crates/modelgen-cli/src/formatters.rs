//! Output formatters for the generation summary.
//!
//! JSON is meant for machines, text for scripts and logs, pretty for
//! terminals.

use crate::commands::generate::GenerationSummary;
use anyhow::Result;
use colored::Colorize;
use modelgen_core::cli::OutputFormat;
use std::fmt::Write;

/// Formats `summary` in the requested format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Examples
///
/// ```
/// use modelgen_cli::GenerationSummary;
/// use modelgen_cli::formatters::format_summary;
/// use modelgen_core::cli::OutputFormat;
/// use std::path::PathBuf;
///
/// let summary = GenerationSummary {
///     output_dir: PathBuf::from("generated"),
///     package: "com.acme.octane".to_string(),
///     lists: 12,
///     phase_groups: 4,
///     entities: 80,
///     skipped: vec!["audit".to_string()],
///     files: 172,
/// };
///
/// let output = format_summary(&summary, OutputFormat::Json)?;
/// assert!(output.contains("\"lists\": 12"));
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn format_summary(summary: &GenerationSummary, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(summary)?),
        OutputFormat::Text => Ok(text(summary)),
        OutputFormat::Pretty => Ok(pretty(summary)),
    }
}

fn text(summary: &GenerationSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "output_dir: {}", summary.output_dir.display());
    let _ = writeln!(out, "package: {}", summary.package);
    let _ = writeln!(out, "lists: {}", summary.lists);
    let _ = writeln!(out, "phase_groups: {}", summary.phase_groups);
    let _ = writeln!(out, "entities: {}", summary.entities);
    let _ = writeln!(out, "skipped: {}", summary.skipped.join(","));
    let _ = write!(out, "files: {}", summary.files);
    out
}

fn pretty(summary: &GenerationSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} {}",
        "Generated".green().bold(),
        summary.package.cyan(),
        format!("into {}", summary.output_dir.display()).dimmed()
    );
    let _ = writeln!(out, "  {:<14}{}", "Entity types", summary.entities.to_string().cyan());
    let _ = writeln!(out, "  {:<14}{}", "Lists", summary.lists.to_string().cyan());
    let _ = writeln!(out, "  {:<14}{}", "Phase groups", summary.phase_groups.to_string().cyan());
    let _ = write!(out, "  {:<14}{}", "Files", summary.files.to_string().cyan());
    if !summary.skipped.is_empty() {
        let _ = write!(
            out,
            "\n  {:<14}{}",
            "Skipped",
            summary.skipped.join(", ").yellow()
        );
    }
    out
}
