//! Command-line surface: inspect / stats / from-foundry.
use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use crate::corpus::{self, CorpusScan};
use crate::fields::FieldSet;
use crate::foundry;
use crate::report;
use crate::scan::{DEFAULT_DISCRIMINATOR, Scanner};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// survey compiler AST JSON dumps: per-type child relations, instance
/// counts, and Foundry artifact extraction
#[derive(Parser, Debug)]
#[command(name = "ast-census")]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// map each node type to the child types observed inside it, fewest first
    Inspect(InspectArgs),
    /// count node instances per type, most frequent first
    Stats(StatsArgs),
    /// extract the `ast` subtree from Foundry build artifacts
    FromFoundry(FromFoundryArgs),
}

#[derive(Args, Debug, Clone)]
struct CorpusSettings {
    /// directory of AST JSON files
    #[arg(default_value = "fixtures/ast")]
    directory: PathBuf,

    /// discriminator key that marks an object as an AST node
    #[arg(long, default_value = DEFAULT_DISCRIMINATOR)]
    node_type_key: String,

    /// JSON file holding an array of extra container field names,
    /// layered on top of the built-in solc set
    #[arg(long)]
    fields: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct InspectArgs {
    #[command(flatten)]
    corpus: CorpusSettings,
}

#[derive(Args, Debug)]
struct StatsArgs {
    #[command(flatten)]
    corpus: CorpusSettings,
}

#[derive(Args, Debug)]
struct FromFoundryArgs {
    /// Foundry `out/` directory holding build artifacts
    artifacts_dir: PathBuf,

    /// directory the extracted ASTs are written to (created if absent)
    output_dir: PathBuf,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl CorpusSettings {
    fn scanner(&self) -> Result<Scanner> {
        let mut fields = FieldSet::solc();
        if let Some(path) = &self.fields {
            fields.extend(FieldSet::load(path)?);
        }
        Ok(Scanner::new(&self.node_type_key, fields))
    }

    fn scan(&self) -> Result<CorpusScan> {
        let scanner = self.scanner()?;
        let scan = corpus::scan_directory(&scanner, &self.directory)?;
        if scan.relation.is_empty() {
            bail!("no AST nodes found in '{}'", self.directory.display());
        }
        Ok(scan)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Inspect(target) => {
                let scan = target.corpus.scan()?;
                print!("{}", report::relation_report(&scan.relation));
                report_skips(&scan);
            }
            Command::Stats(target) => {
                let scan = target.corpus.scan()?;
                print!("{}", report::frequency_report(&scan.relation));
                report_skips(&scan);
            }
            Command::FromFoundry(target) => {
                let summary =
                    foundry::project_artifacts(&target.artifacts_dir, &target.output_dir)?;
                println!(
                    "\nSummary: {} files processed, {} files skipped",
                    summary.processed, summary.skipped
                );
            }
        }
        Ok(())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn report_skips(scan: &CorpusScan) {
    if scan.files_skipped > 0 {
        eprintln!(
            "{} {} of {} files skipped",
            "warning:".yellow().bold(),
            scan.files_skipped,
            scan.files_scanned + scan.files_skipped
        );
    }
}

// ------------------------------- Tests ------------------------------------ //
