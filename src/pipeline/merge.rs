//! Merging Ensembl ortholog files with the combined homolog files.
//!
//! The Ensembl directory drives the run. For `ABHD11_ENSG00000106077_fishes.fasta`
//! the homolog file `ABHD11_ENSG00000106077.fasta` is looked up and both are
//! written, unchanged, into `<output>/ABHD11_ENSG00000106077.fasta`.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tracing::{info, warn};

use crate::core::types::StageOutcome;
use crate::pipeline::naming::{gene_identifier, FASTA_EXTENSIONS};
use crate::pipeline::{display_name, ensure_dir, list_inputs, StageError, StageReport};

/// Merge every Ensembl file that has a homolog counterpart.
///
/// Files without a counterpart are reported as skipped.
///
/// # Errors
///
/// Returns a `StageError` if the Ensembl directory is missing or the output
/// directory cannot be created.
pub fn run(
    ensembl_dir: &Path,
    homologs_dir: &Path,
    output_dir: &Path,
) -> Result<StageReport, StageError> {
    let files = list_inputs(ensembl_dir, FASTA_EXTENSIONS)?;
    ensure_dir(output_dir)?;

    let mut report = StageReport::new("merge");
    if files.is_empty() {
        warn!("No FASTA files found in {}", ensembl_dir.display());
        return Ok(report);
    }
    info!("Found {} Ensembl files", files.len());

    for file in &files {
        let name = display_name(file);
        let target = format!("{}.fasta", gene_identifier(&name));
        let homolog = homologs_dir.join(&target);

        if !homolog.is_file() {
            warn!("Missing homolog file for {name} (looked for {target})");
            report.push(name, StageOutcome::Skipped, format!("missing homolog file {target}"));
            continue;
        }

        match merge_files(file, &homolog, &output_dir.join(&target)) {
            Ok(()) => report.push(name, StageOutcome::Success, target),
            Err(e) => {
                warn!("Failed to merge {target}: {e}");
                report.push(name, StageOutcome::Failed, e.to_string());
            }
        }
    }

    info!(
        "Merged: {}, missing: {}",
        report.count(StageOutcome::Success),
        report.count(StageOutcome::Skipped)
    );
    Ok(report)
}

/// Write `first` then `second` into `output`, each followed by a newline if it
/// does not already end with one
///
/// # Errors
///
/// Returns an I/O error if either input cannot be read or the output cannot be written.
pub fn merge_files(first: &Path, second: &Path, output: &Path) -> io::Result<()> {
    let mut writer = io::BufWriter::new(fs::File::create(output)?);
    for part in [first, second] {
        let text = fs::read_to_string(part)?;
        writer.write_all(text.as_bytes())?;
        if !text.ends_with('\n') {
            writer.write_all(b"\n")?;
        }
    }
    writer.flush()
}
