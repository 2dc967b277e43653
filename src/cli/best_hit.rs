//! Best-hit command - pick the lowest E-value hit of one tabular search result
//! and look up its sequence.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::cli::OutputFormat;
use crate::core::record::SequenceRecord;
use crate::hits::{select_best_hit, SequenceIndex};
use crate::parsing::fasta::{to_fasta_string, write_fasta_file, DEFAULT_LINE_WIDTH};
use crate::parsing::tblout::{parse_tblout_file, TblFlavor};

/// Arguments for the best-hit command
#[derive(Args)]
pub struct BestHitArgs {
    /// Tabular hit list (`--tblout`)
    #[arg(required = true)]
    pub table: PathBuf,

    /// FASTA holding the hit sequences (optionally gzip/bgzip compressed)
    #[arg(required = true)]
    pub sequences: PathBuf,

    /// Write the best hit here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Program that wrote the table
    #[arg(long, value_enum, default_value = "nhmmer")]
    pub flavor: TblFlavor,

    /// Residues per line (0 = no wrapping)
    #[arg(long, default_value_t = DEFAULT_LINE_WIDTH)]
    pub line_width: usize,
}

/// Execute the best-hit command
///
/// # Errors
///
/// Returns an error if an input cannot be read or no best hit is found.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: BestHitArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let hits = parse_tblout_file(&args.table, args.flavor.layout())
        .with_context(|| format!("Failed to read {}", args.table.display()))?;
    if verbose {
        eprintln!("Table: {} hits", hits.len());
    }

    let index = SequenceIndex::from_fasta_path(&args.sequences)
        .with_context(|| format!("Failed to load {}", args.sequences.display()))?;
    if verbose {
        eprintln!("Sequences: {} records", index.len());
    }

    let record = select_best_hit(&hits, &index)?;

    match &args.output {
        Some(path) => {
            write_fasta_file(path, std::slice::from_ref(&record), args.line_width)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            print_summary(&record, Some(path), format)?;
        }
        None => match format {
            OutputFormat::Text => {
                print!("{}", to_fasta_string(std::slice::from_ref(&record), args.line_width));
            }
            OutputFormat::Json | OutputFormat::Tsv => print_summary(&record, None, format)?,
        },
    }

    Ok(())
}

fn print_summary(
    record: &SequenceRecord,
    output: Option<&PathBuf>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            println!("Best hit: {}", record.header);
            println!("   Length: {}", record.len());
            if let Some(path) = output {
                println!("   Written to: {}", path.display());
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": record.id(),
                "header": record.header,
                "length": record.len(),
                "sequence": record.sequence,
                "output": output.map(|p| p.display().to_string()),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("id\theader\tlength");
            println!("{}\t{}\t{}", record.id(), record.header, record.len());
        }
    }
    Ok(())
}
