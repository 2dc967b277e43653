//! Merge command - append combined homologs to their Ensembl ortholog files.

use std::path::PathBuf;

use clap::Args;

use crate::cli::{finish, OutputFormat};
use crate::pipeline::merge;

/// Arguments for the merge command
#[derive(Args)]
pub struct MergeArgs {
    /// Directory with Ensembl files named `<GENE>_<ID>_<tag>.fasta`
    #[arg(required = true)]
    pub ensembl_dir: PathBuf,

    /// Directory with combined homolog files named `<GENE>_<ID>.fasta`
    #[arg(required = true)]
    pub homologs_dir: PathBuf,

    /// Directory receiving the merged files
    #[arg(short, long, default_value = "combined_ortho_homologs")]
    pub output_dir: PathBuf,
}

/// Execute the merge command
///
/// # Errors
///
/// Returns an error if the Ensembl directory is missing or any merge fails.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: MergeArgs, format: OutputFormat) -> anyhow::Result<()> {
    let report = merge::run(&args.ensembl_dir, &args.homologs_dir, &args.output_dir)?;
    finish(&report, format)
}
