//! Foundry artifact projection: pull the compiler AST subtree out of each
//! build artifact and write it out unchanged.
//!
//! Artifacts without an `ast` key (interfaces, libraries compiled without
//! AST output) are skipped silently; unreadable or malformed artifacts are
//! reported and skipped. Nothing here is fatal past the directory checks.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use colored::Colorize;
use serde_json::Value;

use crate::corpus::json_files;

/// Top-level key Foundry stores the compiler AST under.
pub const AST_KEY: &str = "ast";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProjectionSummary {
    pub processed: usize,
    pub skipped: usize,
}

/// Project the `ast` value of every artifact under `artifacts_dir` into
/// `output_dir`, one pretty-printed file per artifact, same file name.
pub fn project_artifacts(artifacts_dir: &Path, output_dir: &Path) -> Result<ProjectionSummary> {
    if !artifacts_dir.exists() {
        bail!(
            "artifacts directory '{}' does not exist",
            artifacts_dir.display()
        );
    }
    if !artifacts_dir.is_dir() {
        bail!("'{}' is not a directory", artifacts_dir.display());
    }

    std::fs::create_dir_all(output_dir).with_context(|| {
        format!("failed to create output directory '{}'", output_dir.display())
    })?;

    let files = json_files(artifacts_dir, true)?;
    if files.is_empty() {
        eprintln!(
            "{} no JSON files found in '{}'",
            "warning:".yellow().bold(),
            artifacts_dir.display()
        );
        return Ok(ProjectionSummary::default());
    }
    println!(
        "Found {} JSON files in '{}'",
        files.len(),
        artifacts_dir.display()
    );

    let mut summary = ProjectionSummary::default();
    for path in files {
        match project_file(&path, output_dir) {
            Ok(Some(out_path)) => {
                summary.processed += 1;
                println!(
                    "Processed: {} -> {}",
                    path.file_name().unwrap_or_default().to_string_lossy(),
                    out_path.display()
                );
            }
            Ok(None) => summary.skipped += 1,
            Err(error) => {
                eprintln!(
                    "{} skipping {}: {error:#}",
                    "warning:".yellow().bold(),
                    path.display()
                );
                summary.skipped += 1;
            }
        }
    }
    Ok(summary)
}

/// Returns the output path on success, `None` when the artifact has no
/// `ast` key. The artifact is fully decoded before anything is written, so
/// a failed file leaves no partial output.
fn project_file(path: &Path, output_dir: &Path) -> Result<Option<PathBuf>> {
    let source = std::fs::read_to_string(path).context("failed to read")?;
    let mut deserializer = serde_json::Deserializer::from_str(&source);
    let value: Value =
        serde_path_to_error::deserialize(&mut deserializer).context("failed to parse")?;

    let Some(ast) = value.get(AST_KEY) else {
        return Ok(None);
    };

    let file_name = path.file_name().context("artifact path has no file name")?;
    let out_path = output_dir.join(file_name);
    let rendered = serde_json::to_string_pretty(ast).context("failed to render AST value")?;
    std::fs::write(&out_path, rendered)
        .with_context(|| format!("failed to write '{}'", out_path.display()))?;
    Ok(Some(out_path))
}

// ------------------------------- Tests ------------------------------------ //
