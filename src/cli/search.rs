//! Search command - HMM profile search of one assembly for every trimmed gene.

use std::path::PathBuf;

use clap::Args;

use crate::cli::{finish, OutputFormat, ToolArgs};
use crate::parsing::fasta::DEFAULT_LINE_WIDTH;
use crate::pipeline::search::{self, SearchConfig};
use crate::tools::hmmer::DEFAULT_EVALUE;
use crate::tools::ProcessRunner;

/// Arguments for the search command
#[derive(Args)]
pub struct SearchArgs {
    /// Directory with the trimmed alignments
    #[arg(required = true)]
    pub trimmed_dir: PathBuf,

    /// Assembly to search (FASTA, optionally gzip/bgzip compressed)
    #[arg(required = true)]
    pub assembly: PathBuf,

    /// Directory receiving `hmm_profiles/` and `<assembly>_hits/`
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// nhmmer reporting E-value threshold
    #[arg(short = 'E', long, default_value_t = DEFAULT_EVALUE)]
    pub evalue: f64,

    /// Residues per line in written FASTA files (0 = no wrapping)
    #[arg(long, default_value_t = DEFAULT_LINE_WIDTH)]
    pub line_width: usize,

    #[command(flatten)]
    pub tools: ToolArgs,
}

/// Execute the search command
///
/// # Errors
///
/// Returns an error if the assembly cannot be loaded or any gene fails.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: SearchArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = SearchConfig {
        evalue: args.evalue,
        line_width: args.line_width,
        ..SearchConfig::default()
    };

    if verbose {
        eprintln!(
            "Searching {} with E-value threshold {:e}",
            args.assembly.display(),
            config.evalue
        );
    }

    let runner = ProcessRunner::with_bin_dir(args.tools.bin_dir);
    let report = search::run(
        &runner,
        &args.trimmed_dir,
        &args.assembly,
        &args.output_dir,
        &config,
    )?;
    finish(&report, format)
}
