//! Align with MAFFT, then trim with Gblocks behind safe headers.
//!
//! Trimming one alignment:
//!
//! 1. Read the aligned FASTA and replace every header with `Seq_<n>`
//! 2. Write the renamed alignment to a temporary file next to the aligned file
//! 3. Run Gblocks with block sizes scaled to the number of sequences
//! 4. Read `<temp>.gb`, restore the original headers and write
//!    `trimmed/<gene>_aln_tr.fasta`; move the HTML report alongside it
//!
//! The temporary input and every Gblocks by-product are removed however the step
//! ends.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::core::types::{MoleculeType, RestoreMode, StageOutcome};
use crate::parsing::fasta::{
    read_fasta_file, write_fasta, write_fasta_file, DEFAULT_LINE_WIDTH,
};
use crate::pipeline::naming::{
    aligned_name, is_align_input, trimmed_base, trimmed_name, ALIGN_EXTENSIONS,
};
use crate::pipeline::{
    display_name, ensure_dir, list_inputs, StageError, StageReport, StepError,
};
use crate::renaming::{forward, restore, RenameError};
use crate::tools::gblocks::{self, AllowedGaps, GblocksParams, RESULT_SUFFIX};
use crate::tools::mafft;
use crate::tools::runner::{append_suffix, ToolRunner};

/// Settings for the align stage
#[derive(Debug, Clone)]
pub struct AlignConfig {
    pub molecule: MoleculeType,
    pub allowed_gaps: AllowedGaps,
    pub restore_mode: RestoreMode,
    /// Residues per line in written FASTA files
    pub line_width: usize,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            molecule: MoleculeType::Codons,
            allowed_gaps: AllowedGaps::Half,
            restore_mode: RestoreMode::Permissive,
            line_width: DEFAULT_LINE_WIDTH,
        }
    }
}

/// Files written for one trimmed alignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrimmedFiles {
    pub alignment: PathBuf,
    pub report: Option<PathBuf>,
    pub sequences: usize,
}

/// Align and trim every eligible `.fasta` file in `input_dir`.
///
/// Outputs go to `<output_dir>/aligned` and `<output_dir>/trimmed`.
///
/// # Errors
///
/// Returns a `StageError` if `input_dir` cannot be listed or the output
/// directories cannot be created. Per-file failures are recorded in the report.
pub fn run(
    runner: &dyn ToolRunner,
    input_dir: &Path,
    output_dir: &Path,
    config: &AlignConfig,
) -> Result<StageReport, StageError> {
    let aligned_dir = output_dir.join("aligned");
    let trimmed_dir = output_dir.join("trimmed");
    ensure_dir(&aligned_dir)?;
    ensure_dir(&trimmed_dir)?;

    let inputs: Vec<PathBuf> = list_inputs(input_dir, ALIGN_EXTENSIONS)?
        .into_iter()
        .filter(|p| is_align_input(p))
        .collect();

    let mut report = StageReport::new("align");
    if inputs.is_empty() {
        warn!("No .fasta files found in {}", input_dir.display());
        return Ok(report);
    }

    info!("Found {} FASTA files. Processing...", inputs.len());

    for input in &inputs {
        let name = display_name(input);
        info!("Processing: {name}");

        let aligned = aligned_dir.join(aligned_name(&name));
        if let Err(e) = mafft::align(runner, input, &aligned) {
            warn!("Alignment failed for {name}: {e}");
            report.push(name, StageOutcome::Failed, format!("align: {e}"));
            continue;
        }

        match trim_safely(runner, &aligned, &trimmed_dir, config) {
            Ok(trimmed) => {
                info!(
                    "Trimmed {name} ({} sequences) -> {}",
                    trimmed.sequences,
                    trimmed.alignment.display()
                );
                report.push(
                    name,
                    StageOutcome::Success,
                    format!("{} sequences", trimmed.sequences),
                );
            }
            Err(StepError::Rename(RenameError::EmptyInput)) => {
                warn!("{name}: aligned file contains 0 sequences");
                report.push(name, StageOutcome::Failed, "aligned file contains 0 sequences");
            }
            Err(e) => {
                warn!("Trimming failed for {name}: {e}");
                report.push(name, StageOutcome::Failed, format!("trim: {e}"));
            }
        }
    }

    Ok(report)
}

/// Trim one alignment with Gblocks, shielding its headers behind safe IDs.
///
/// # Errors
///
/// Returns `StepError::Rename` for an alignment without sequences (Gblocks is not
/// run), `StepError::Tool` if Gblocks writes nothing, or I/O and parse errors.
pub fn trim_safely(
    runner: &dyn ToolRunner,
    aligned: &Path,
    trimmed_dir: &Path,
    config: &AlignConfig,
) -> Result<TrimmedFiles, StepError> {
    let (safe, table) = forward(read_fasta_file(aligned)?)?;
    let sequences = table.len();
    info!("Gblocks input: {} ({sequences} sequences)", display_name(aligned));

    let work_dir = aligned.parent().unwrap_or_else(|| Path::new("."));
    let mut safe_file = tempfile::Builder::new()
        .prefix(".gblocks-")
        .suffix(".safe")
        .tempfile_in(work_dir)?;
    {
        let mut writer = BufWriter::new(safe_file.as_file_mut());
        write_fasta(&mut writer, &safe, config.line_width)?;
        writer.flush()?;
    }

    let gb_output = append_suffix(safe_file.path(), RESULT_SUFFIX);
    let _cleanup = RemoveOnDrop(vec![
        append_suffix(&gb_output, ".htm"),
        append_suffix(safe_file.path(), ".htm"),
        gb_output,
    ]);

    let params = GblocksParams::for_sequence_count(sequences, config.molecule)
        .with_allowed_gaps(config.allowed_gaps);
    let output = gblocks::trim(runner, safe_file.path(), &params)?;

    let restored = restore(read_fasta_file(&output.alignment)?, &table, config.restore_mode)?;

    let base = trimmed_base(&display_name(aligned));
    let alignment = trimmed_dir.join(trimmed_name(&base, "fasta"));
    write_fasta_file(&alignment, &restored, config.line_width)?;

    let report = match output.report {
        Some(html) => {
            let dest = trimmed_dir.join(trimmed_name(&base, "html"));
            move_file(&html, &dest)?;
            Some(dest)
        }
        None => None,
    };

    Ok(TrimmedFiles {
        alignment,
        report,
        sequences,
    })
}

/// Rename, falling back to copy when source and destination are on different
/// file systems
fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    if fs::rename(from, to).is_err() {
        fs::copy(from, to)?;
        fs::remove_file(from)?;
    }
    Ok(())
}

/// Best-effort removal of tool by-products
struct RemoveOnDrop(Vec<PathBuf>);

impl Drop for RemoveOnDrop {
    fn drop(&mut self) {
        for path in &self.0 {
            if path.exists() {
                let _ = fs::remove_file(path);
            }
        }
    }
}
