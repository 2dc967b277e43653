//! Concat command - combine best-hit folders of several assemblies.

use std::path::PathBuf;

use clap::Args;

use crate::cli::{finish, OutputFormat};
use crate::parsing::fasta::DEFAULT_LINE_WIDTH;
use crate::pipeline::concat;

/// Arguments for the concat command
#[derive(Args)]
pub struct ConcatArgs {
    /// Best-hit folders; the first one decides which files are combined and the
    /// first `_`-word of each folder name tags its headers
    #[arg(required = true, num_args = 1..)]
    pub folders: Vec<PathBuf>,

    /// Directory receiving one combined file per gene
    #[arg(short, long, default_value = "combined_homologs")]
    pub output_dir: PathBuf,

    /// Residues per line (0 = no wrapping)
    #[arg(long, default_value_t = DEFAULT_LINE_WIDTH)]
    pub line_width: usize,
}

/// Execute the concat command
///
/// # Errors
///
/// Returns an error if a folder is missing or any file fails.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: ConcatArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    if let Some(reference) = args.folders.first().filter(|_| verbose) {
        eprintln!("Reference folder: {}", reference.display());
    }
    let report = concat::run(&args.folders, &args.output_dir, args.line_width)?;
    finish(&report, format)
}
