//! Directory scanning: enumerate a corpus of AST JSON files, decode and
//! extract each one, fold the per-file accumulators together.
//!
//! Files are independent, so extraction runs in parallel; per-file results
//! merge in enumeration order so discovery order does not depend on
//! scheduling. A file that fails to read or decode is reported and skipped,
//! never fatal to the batch.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use colored::Colorize;
use rayon::prelude::*;
use serde_json::Value;

use crate::relation::TypeRelation;
use crate::scan::Scanner;

#[derive(Debug, Default)]
pub struct CorpusScan {
    pub relation: TypeRelation,
    pub files_scanned: usize,
    pub files_skipped: usize,
}

/// Scan every `*.json` file directly under `dir`. A missing or
/// non-directory path is fatal; per-file failures are skips.
pub fn scan_directory(scanner: &Scanner, dir: &Path) -> Result<CorpusScan> {
    if !dir.exists() {
        bail!("directory '{}' not found", dir.display());
    }
    if !dir.is_dir() {
        bail!("'{}' is not a directory", dir.display());
    }

    let files = json_files(dir, false)?;
    eprintln!("Scanning {} JSON files in {}", files.len(), dir.display());

    let per_file: Vec<(PathBuf, Result<TypeRelation>)> = files
        .into_par_iter()
        .map(|path| {
            let outcome = scan_file(scanner, &path);
            (path, outcome)
        })
        .collect();

    let mut scan = CorpusScan::default();
    for (path, outcome) in per_file {
        match outcome {
            Ok(relation) => {
                scan.relation.merge(relation);
                scan.files_scanned += 1;
            }
            Err(error) => {
                eprintln!(
                    "{} skipping {}: {error:#}",
                    "warning:".yellow().bold(),
                    path.display()
                );
                scan.files_skipped += 1;
            }
        }
    }
    scan.relation.backfill();
    Ok(scan)
}

fn scan_file(scanner: &Scanner, path: &Path) -> Result<TypeRelation> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    let mut deserializer = serde_json::Deserializer::from_str(&source);
    let value: Value = serde_path_to_error::deserialize(&mut deserializer)
        .with_context(|| format!("failed to parse '{}'", path.display()))?;

    let mut relation = TypeRelation::new();
    for node in scanner.extract_nodes(&value) {
        relation.observe(scanner, node)?;
    }
    Ok(relation)
}

/// `dir/*.json`, or `dir/**/*.json` when `recursive`, in sorted order.
pub fn json_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let pattern = if recursive {
        format!("{}/**/*.json", dir.display())
    } else {
        format!("{}/*.json", dir.display())
    };
    let mut paths = Vec::new();
    for entry in
        glob::glob(&pattern).with_context(|| format!("invalid glob pattern '{pattern}'"))?
    {
        paths.push(entry?);
    }
    paths.sort();
    Ok(paths)
}

// ------------------------------- Tests ------------------------------------ //
