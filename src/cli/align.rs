//! Align command - MAFFT alignment followed by header-safe Gblocks trimming.

use std::path::PathBuf;

use clap::Args;

use crate::cli::{finish, OutputFormat, ToolArgs};
use crate::core::types::{MoleculeType, RestoreMode};
use crate::parsing::fasta::DEFAULT_LINE_WIDTH;
use crate::pipeline::align_trim::{self, AlignConfig};
use crate::tools::gblocks::AllowedGaps;
use crate::tools::ProcessRunner;

/// Arguments for the align command
#[derive(Args)]
pub struct AlignArgs {
    /// Directory with one unaligned `.fasta` file per gene
    #[arg(required = true)]
    pub input_dir: PathBuf,

    /// Directory receiving `aligned/` and `trimmed/` (defaults to the input directory)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Sequence type passed to Gblocks
    #[arg(long, value_enum, default_value = "codons")]
    pub molecule: MoleculeType,

    /// Gap positions allowed in a Gblocks block
    #[arg(long, value_enum, default_value = "half")]
    pub allowed_gaps: AllowedGaps,

    /// Fail a file when a trimmed header cannot be mapped back to its original
    #[arg(long)]
    pub strict: bool,

    /// Residues per line in written FASTA files (0 = no wrapping)
    #[arg(long, default_value_t = DEFAULT_LINE_WIDTH)]
    pub line_width: usize,

    #[command(flatten)]
    pub tools: ToolArgs,
}

/// Execute the align command
///
/// # Errors
///
/// Returns an error if the stage cannot start or any file fails.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: AlignArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = AlignConfig {
        molecule: args.molecule,
        allowed_gaps: args.allowed_gaps,
        restore_mode: if args.strict {
            RestoreMode::Strict
        } else {
            RestoreMode::Permissive
        },
        line_width: args.line_width,
    };

    if verbose {
        eprintln!(
            "Gblocks: {} sequences, allowed gaps {:?}, {:?} header restore",
            config.molecule, config.allowed_gaps, config.restore_mode
        );
    }

    let runner = ProcessRunner::with_bin_dir(args.tools.bin_dir);
    let output_dir = args.output_dir.as_ref().unwrap_or(&args.input_dir);
    let report = align_trim::run(&runner, &args.input_dir, output_dir, &config)?;
    finish(&report, format)
}
