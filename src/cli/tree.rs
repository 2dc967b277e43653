//! Tree command - codon-partitioned IQ-TREE run per gene.

use std::path::PathBuf;

use clap::Args;

use crate::cli::{finish, OutputFormat, ToolArgs};
use crate::pipeline::tree::{self, TreeConfig};
use crate::tools::iqtree::IqTreeParams;
use crate::tools::ProcessRunner;

/// Arguments for the tree command
#[derive(Args)]
pub struct TreeArgs {
    /// Directory with trimmed alignments
    #[arg(required = true)]
    pub input_dir: PathBuf,

    /// Directory receiving one folder per gene
    #[arg(short, long, default_value = "Tree_and_analyses")]
    pub output_dir: PathBuf,

    /// IQ-TREE executable name
    #[arg(long, default_value = "iqtree")]
    pub iqtree: String,

    /// Substitution model (`-m`)
    #[arg(long, default_value = "MFP+MERGE")]
    pub model: String,

    /// Threads (`-nt`)
    #[arg(long, default_value = "AUTO")]
    pub threads: String,

    /// Ultrafast bootstrap replicates (`-bb`)
    #[arg(long, default_value_t = 1000)]
    pub bootstrap: u32,

    #[command(flatten)]
    pub tools: ToolArgs,
}

/// Execute the tree command
///
/// # Errors
///
/// Returns an error if the input directory is missing or any tree fails.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: TreeArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = TreeConfig {
        iqtree: IqTreeParams {
            program: args.iqtree,
            model: args.model,
            threads: args.threads,
            bootstrap: args.bootstrap,
        },
    };

    if verbose {
        eprintln!(
            "IQ-TREE: {} -m {} -nt {} -bb {}",
            config.iqtree.program,
            config.iqtree.model,
            config.iqtree.threads,
            config.iqtree.bootstrap
        );
    }

    let runner = ProcessRunner::with_bin_dir(args.tools.bin_dir);
    let report = tree::run(&runner, &args.input_dir, &args.output_dir, &config)?;
    finish(&report, format)
}
