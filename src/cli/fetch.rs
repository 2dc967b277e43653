//! Fetch command - download fish ortholog CDS files from Ensembl.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::cli::{finish, OutputFormat};
use crate::ensembl::orthologs::dedupe_gene_ids;
use crate::ensembl::{EnsemblClient, DEFAULT_SERVER};
use crate::parsing::fasta::DEFAULT_LINE_WIDTH;
use crate::pipeline::fetch::{self, FetchConfig};

/// Arguments for the fetch command
#[derive(Args)]
pub struct FetchArgs {
    /// File with one human Ensembl gene ID per line, or a single gene ID
    #[arg(required = true)]
    pub input: String,

    /// Directory receiving `<GENE>_<ID>_fishes.{fasta,csv}`
    #[arg(short, long, default_value = "Downloads")]
    pub output_dir: PathBuf,

    /// Where the de-duplicated gene list is saved when INPUT is a file
    #[arg(long, default_value = "unique_gene_list.txt")]
    pub unique_list: PathBuf,

    /// Ensembl REST server
    #[arg(long, default_value = DEFAULT_SERVER)]
    pub server: String,

    /// Keep orthologs split at this taxonomy level (repeatable; defaults to the fish-containing levels)
    #[arg(long = "taxonomy-level", value_name = "LEVEL")]
    pub taxonomy_levels: Vec<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 60)]
    pub timeout: u64,

    /// Residues per line (0 = no wrapping)
    #[arg(long, default_value_t = DEFAULT_LINE_WIDTH)]
    pub line_width: usize,
}

/// Execute the fetch command
///
/// # Errors
///
/// Returns an error if the gene list cannot be read, the HTTP client cannot be
/// created, or any gene fails.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: FetchArgs, format: OutputFormat) -> anyhow::Result<()> {
    let input = Path::new(&args.input);
    let gene_ids = if input.is_file() {
        let genes = read_unique_genes(input, &args.unique_list)?;
        info!(
            "{} unique genes in {}, list saved to {}",
            genes.len(),
            input.display(),
            args.unique_list.display()
        );
        genes
    } else {
        info!("Processing single gene ID {}", args.input);
        vec![args.input.clone()]
    };

    let mut config = FetchConfig {
        line_width: args.line_width,
        ..FetchConfig::default()
    };
    if !args.taxonomy_levels.is_empty() {
        config.taxonomy_levels = args.taxonomy_levels.clone();
    }

    let client = EnsemblClient::new(&args.server, Duration::from_secs(args.timeout))?;
    let report = fetch::run(&client, &gene_ids, &args.output_dir, &config)?;
    finish(&report, format)
}

/// Read the gene list, drop duplicates and save the result to `unique_list`
fn read_unique_genes(input: &Path, unique_list: &Path) -> anyhow::Result<Vec<String>> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("Failed to read gene list {}", input.display()))?;
    let genes = dedupe_gene_ids(text.lines());

    let contents: String = genes.iter().map(|g| format!("{g}\n")).collect();
    fs::write(unique_list, contents)
        .with_context(|| format!("Failed to write {}", unique_list.display()))?;
    Ok(genes)
}
