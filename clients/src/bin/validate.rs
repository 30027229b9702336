//! `cellgate-validate` — Checks cell-population names against their gating definitions.
//!
//! Loads ontology snapshot tables (labels, synonyms, curated overrides,
//! and the membrane-marker levels table), validates each input row, and
//! writes a per-row report.
//!
//! **Usage:**
//! ```
//! cellgate-validate input.tsv \
//!     --cell-labels cl-labels.tsv --marker-labels pro-labels.tsv \
//!     --levels cl-levels.tsv [--format json] [--output report.tsv]
//! ```
//!
//! Exits non-zero if any row fails validation.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use cellgate_conformance::gating::ValueScale;
use cellgate_conformance::{batch, Validator};
use cellgate_ontology::{HierarchyBuilder, LabelTable, MatchTier, TableBuilder};

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// One TSV line per input row.
    Tsv,
    /// The full report as JSON.
    Json,
}

/// Validate cell-population names against their gating definitions.
#[derive(Parser)]
#[command(
    name = "cellgate-validate",
    about = "Check gating definitions for consistency with ontology marker profiles"
)]
struct Args {
    /// Input TSV with `Cell Population Name` and `Gating Definition` columns.
    input: PathBuf,

    /// Cell Ontology labels table (`ID<TAB>Label`).
    #[arg(long)]
    cell_labels: PathBuf,

    /// Cell Ontology synonyms table (`ID<TAB>Label`).
    #[arg(long)]
    cell_synonyms: Option<PathBuf>,

    /// Curated cell-name override list (`Ontology ID`/`Label`/`Synonyms`).
    #[arg(long)]
    cell_special: Option<PathBuf>,

    /// Protein Ontology labels table (`ID<TAB>Label`).
    #[arg(long)]
    marker_labels: PathBuf,

    /// Protein Ontology short-labels table (`ID<TAB>Label`).
    #[arg(long)]
    marker_shorts: Option<PathBuf>,

    /// Protein Ontology synonyms table (`ID<TAB>Label`).
    #[arg(long)]
    marker_synonyms: Option<PathBuf>,

    /// Curated special-gates override list (`Ontology ID`/`Label`/`Synonyms`).
    #[arg(long)]
    marker_special: Option<PathBuf>,

    /// Membrane-marker levels table (subclass edges plus restriction columns).
    #[arg(long)]
    levels: PathBuf,

    /// Value-scale table replacing the built-in suffix vocabulary.
    #[arg(long)]
    scale: Option<PathBuf>,

    /// Report destination (default: stdout).
    #[arg(long)]
    output: Option<PathBuf>,

    /// Report format.
    #[arg(long, value_enum, default_value_t = Format::Tsv)]
    format: Format,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let cells = cell_table(&args)?;
    let markers = marker_table(&args)?;

    let mut hierarchy = HierarchyBuilder::new();
    hierarchy
        .add_tsv(&args.levels)
        .context("loading levels table")?;
    let index = hierarchy.build();

    let scale = match &args.scale {
        Some(path) => ValueScale::from_tsv(path).context("loading value scale")?,
        None => ValueScale::builtin(),
    };

    let rows = batch::read_rows_from_path(&args.input).context("reading input batch")?;
    let validator = Validator::new(&cells, &markers, &index, scale);
    let report = validator.validate_rows(&rows);

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            File::create(path)
                .with_context(|| format!("creating {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    match args.format {
        Format::Tsv => batch::write_tsv(&report, &mut out).context("writing TSV report")?,
        Format::Json => {
            serde_json::to_writer_pretty(&mut out, &report).context("writing JSON report")?;
            writeln!(out)?;
        }
    }

    let failures = report.failure_count();
    eprintln!(
        "Validated {} row(s): {} passed, {} failed.",
        report.rows.len(),
        report.rows.len() - failures,
        failures
    );
    if failures > 0 {
        process::exit(1);
    }
    Ok(())
}

/// Builds the cell-name table: overrides first, then labels, then synonyms.
fn cell_table(args: &Args) -> Result<LabelTable> {
    let mut builder = TableBuilder::new();
    if let Some(path) = &args.cell_special {
        builder
            .add_special_tsv(path)
            .context("loading cell override list")?;
    }
    builder
        .add_tsv(MatchTier::Label, &args.cell_labels)
        .context("loading cell labels")?;
    if let Some(path) = &args.cell_synonyms {
        builder
            .add_tsv(MatchTier::Synonym, path)
            .context("loading cell synonyms")?;
    }
    Ok(builder.build())
}

/// Builds the marker table: overrides, short labels, labels, synonyms.
fn marker_table(args: &Args) -> Result<LabelTable> {
    let mut builder = TableBuilder::new();
    if let Some(path) = &args.marker_special {
        builder
            .add_special_tsv(path)
            .context("loading special-gates list")?;
    }
    if let Some(path) = &args.marker_shorts {
        builder
            .add_tsv(MatchTier::Short, path)
            .context("loading marker short labels")?;
    }
    builder
        .add_tsv(MatchTier::Label, &args.marker_labels)
        .context("loading marker labels")?;
    if let Some(path) = &args.marker_synonyms {
        builder
            .add_tsv(MatchTier::Synonym, path)
            .context("loading marker synonyms")?;
    }
    Ok(builder.build())
}
