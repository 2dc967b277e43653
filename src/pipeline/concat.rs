//! Concatenation of per-assembly best-hit folders into one file per gene.
//!
//! The first folder is the reference: its file list decides which genes are
//! combined. Every header is reduced to its first token and tagged with the
//! first `_`-word of the folder it came from, so hits from different
//! assemblies stay distinguishable (`TRINITY_DN1_c0_g1_i1_SD`).

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::core::record::SequenceRecord;
use crate::core::types::StageOutcome;
use crate::parsing::fasta::{read_fasta_file, write_fasta_file};
use crate::pipeline::naming::{concat_output_name, folder_suffix, CONCAT_EXTENSIONS};
use crate::pipeline::{display_name, ensure_dir, list_inputs, StageError, StageReport};

/// Combine same-named files across `folders` into `output_dir`.
///
/// # Errors
///
/// Returns `StageError::NoInputs` for an empty folder list,
/// `StageError::MissingInput` if any folder does not exist, or directory errors.
pub fn run(
    folders: &[PathBuf],
    output_dir: &Path,
    line_width: usize,
) -> Result<StageReport, StageError> {
    let Some(reference) = folders.first() else {
        return Err(StageError::NoInputs);
    };
    if let Some(missing) = folders.iter().find(|f| !f.is_dir()) {
        return Err(StageError::MissingInput(missing.clone()));
    }

    ensure_dir(output_dir)?;
    let files = list_inputs(reference, CONCAT_EXTENSIONS)?;
    info!(
        "Found {} files in reference folder: {}",
        files.len(),
        display_name(reference)
    );

    let suffixes: Vec<String> = folders.iter().map(|f| folder_suffix(f)).collect();
    let mut report = StageReport::new("concat");

    for file in &files {
        let name = display_name(file);
        let output = output_dir.join(concat_output_name(&name));

        let mut combined = Vec::new();
        let mut found = 0;
        let mut errors = Vec::new();
        for (folder, suffix) in folders.iter().zip(&suffixes) {
            let source = folder.join(&name);
            if !source.is_file() {
                warn!("File {name} missing in {}", display_name(folder));
                continue;
            }
            match read_fasta_file(&source) {
                Ok(records) => {
                    found += 1;
                    combined.extend(records.into_iter().map(|r| tag_record(r, suffix)));
                }
                Err(e) => {
                    warn!("Error reading {}: {e}", source.display());
                    errors.push(format!("{}: {e}", display_name(folder)));
                }
            }
        }

        if let Err(e) = write_fasta_file(&output, &combined, line_width) {
            warn!("Failed to write {}: {e}", output.display());
            report.push(name, StageOutcome::Failed, e.to_string());
            continue;
        }

        let summary = format!(
            "{} sequences from {found}/{} folders",
            combined.len(),
            folders.len()
        );
        if errors.is_empty() {
            report.push(name, StageOutcome::Success, summary);
        } else {
            report.push(
                name,
                StageOutcome::Failed,
                format!("{summary}; {}", errors.join("; ")),
            );
        }
    }

    info!("Processed {} gene sets", report.files.len());
    Ok(report)
}

/// `>ID anything` -> `>ID_<suffix>`
fn tag_record(record: SequenceRecord, suffix: &str) -> SequenceRecord {
    let header = format!("{}_{suffix}", record.id());
    record.with_header(header)
}
