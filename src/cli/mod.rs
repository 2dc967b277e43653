//! Command-line interface for ortho-pipeline.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **fetch**: Download fish ortholog CDS files from Ensembl
//! - **align**: Align every gene file with MAFFT and trim it with Gblocks
//! - **search**: Build HMM profiles and search an assembly for the best hit per gene
//! - **best-hit**: Pick the best hit of a single `--tblout` table
//! - **concat**: Combine best-hit folders of several assemblies
//! - **merge**: Merge Ensembl orthologs with the combined homologs
//! - **tree**: Run a codon-partitioned IQ-TREE analysis per gene
//!
//! ## Usage
//!
//! ```text
//! # Download fish orthologs of every gene in a list
//! ortho-pipeline fetch gene_ids.txt -o Downloads
//!
//! # Align and trim the downloaded orthologs
//! ortho-pipeline align Downloads
//!
//! # Find homologs of each trimmed gene in a transcriptome assembly
//! ortho-pipeline search Downloads/trimmed SD_trinity.Trinity.cdhit.fasta
//!
//! # Combine the hits of three assemblies, then merge with the Ensembl files
//! ortho-pipeline concat DF_hits HF_hits SD_hits -o combined_homologs
//! ortho-pipeline merge Downloads combined_homologs -o combined_ortho_homologs
//!
//! # Re-align, then build the trees
//! ortho-pipeline align combined_ortho_homologs
//! ortho-pipeline tree combined_ortho_homologs/trimmed
//!
//! # JSON report for scripting
//! ortho-pipeline --format json merge Downloads combined_homologs
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::types::StageOutcome;
use crate::pipeline::StageReport;

pub mod align;
pub mod best_hit;
pub mod concat;
pub mod fetch;
pub mod merge;
pub mod search;
pub mod tree;

#[derive(Parser)]
#[command(name = "ortho-pipeline")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Align, trim, search and build trees for ortholog gene sets")]
#[command(
    long_about = "ortho-pipeline drives the per-gene steps of a comparative-genomics workflow.\n\nIt:\n- Downloads fish ortholog coding sequences from Ensembl\n- Aligns them with MAFFT and trims the alignment with Gblocks, protecting FASTA headers from truncation\n- Searches transcriptome assemblies with nhmmer and keeps the best hit per gene\n- Combines and merges homolog sources\n- Builds codon-partitioned maximum-likelihood trees with IQ-TREE"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download fish orthologs from Ensembl
    Fetch(fetch::FetchArgs),

    /// Align with MAFFT and trim with Gblocks
    Align(align::AlignArgs),

    /// Build HMM profiles and search an assembly
    Search(search::SearchArgs),

    /// Select the best hit of one tabular search result
    BestHit(best_hit::BestHitArgs),

    /// Concatenate best-hit folders of several assemblies
    Concat(concat::ConcatArgs),

    /// Merge Ensembl orthologs with combined homologs
    Merge(merge::MergeArgs),

    /// Build per-gene phylogenetic trees with IQ-TREE
    Tree(tree::TreeArgs),
}

/// Location of the external tools
#[derive(clap::Args)]
pub struct ToolArgs {
    /// Directory searched for tool executables before PATH
    #[arg(long, value_name = "DIR")]
    pub bin_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Print a stage report and fail if any file failed
///
/// # Errors
///
/// Returns an error if JSON serialization fails or the report contains failures.
pub fn finish(report: &StageReport, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => print_text_report(report),
        OutputFormat::Json => print_json_report(report)?,
        OutputFormat::Tsv => print_tsv_report(report),
    }

    let failed = report.count(StageOutcome::Failed);
    if failed > 0 {
        anyhow::bail!(
            "{failed} of {} files failed in stage '{}'",
            report.files.len(),
            report.stage
        );
    }
    Ok(())
}

fn print_text_report(report: &StageReport) {
    println!(
        "{}: {} files ({} ok, {} skipped, {} failed)",
        report.stage,
        report.files.len(),
        report.count(StageOutcome::Success),
        report.count(StageOutcome::Skipped),
        report.count(StageOutcome::Failed),
    );

    let width = report.files.iter().map(|f| f.file.len()).max().unwrap_or(0);
    for file in &report.files {
        println!(
            "   {:<8} {:<width$}  {}",
            file.outcome.to_string(),
            file.file,
            file.message
        );
    }
}

fn print_json_report(report: &StageReport) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "stage": report.stage,
        "summary": {
            "total": report.files.len(),
            "success": report.count(StageOutcome::Success),
            "skipped": report.count(StageOutcome::Skipped),
            "failed": report.count(StageOutcome::Failed),
        },
        "files": report.files,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_report(report: &StageReport) {
    println!("stage\tfile\toutcome\tmessage");
    for file in &report.files {
        println!(
            "{}\t{}\t{}\t{}",
            report.stage, file.file, file.outcome, file.message
        );
    }
}
