//! Per-gene phylogeny with a codon-partitioned IQ-TREE run.
//!
//! Each alignment gets its own folder `<output>/<GENE>_<ID>/` holding a copy of
//! the alignment, the partition file `<GENE>_<ID>.nex` and all IQ-TREE output.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::core::record::SequenceRecord;
use crate::core::types::StageOutcome;
use crate::parsing::fasta::read_fasta_file;
use crate::pipeline::naming::{gene_identifier, FASTA_EXTENSIONS};
use crate::pipeline::{display_name, ensure_dir, list_inputs, StageError, StageReport, StepError};
use crate::tools::iqtree::{self, IqTreeParams};
use crate::tools::runner::ToolRunner;

#[derive(Debug, Clone, Default)]
pub struct TreeConfig {
    pub iqtree: IqTreeParams,
}

/// Alignment length as the length of the first record, gaps included
#[must_use]
pub fn alignment_length(records: &[SequenceRecord]) -> usize {
    records.first().map_or(0, SequenceRecord::len)
}

/// Partition file with one DNA partition per codon position
///
/// ```
/// use ortho_pipeline::pipeline::tree::partition_file_contents;
///
/// assert!(partition_file_contents(300).starts_with("DNA, pos1 = 1-300\\3\n"));
/// ```
#[must_use]
pub fn partition_file_contents(length: usize) -> String {
    (1..=3)
        .map(|pos| format!("DNA, pos{pos} = {pos}-{length}\\3\n"))
        .collect()
}

/// Build a tree for every alignment in `input_dir`.
///
/// # Errors
///
/// Returns a `StageError` if `input_dir` is missing or `output_dir` cannot be created.
pub fn run(
    runner: &dyn ToolRunner,
    input_dir: &Path,
    output_dir: &Path,
    config: &TreeConfig,
) -> Result<StageReport, StageError> {
    let files = list_inputs(input_dir, FASTA_EXTENSIONS)?;
    ensure_dir(output_dir)?;

    let mut report = StageReport::new("tree");
    if files.is_empty() {
        warn!("No fasta files found in {}", input_dir.display());
        return Ok(report);
    }
    info!("Found {} alignments", files.len());

    for file in &files {
        let name = display_name(file);
        match build_tree(runner, file, output_dir, config) {
            Ok(Some(length)) => {
                report.push(name, StageOutcome::Success, format!("{length} bp"));
            }
            Ok(None) => {
                info!("{name} seems empty, skipping");
                report.push(name, StageOutcome::Skipped, "empty alignment");
            }
            Err(e) => {
                warn!("IQ-TREE failed for {name}: {e}");
                report.push(name, StageOutcome::Failed, e.to_string());
            }
        }
    }

    Ok(report)
}

/// Set up the gene folder and run IQ-TREE; `None` for an empty alignment
fn build_tree(
    runner: &dyn ToolRunner,
    alignment: &Path,
    output_dir: &Path,
    config: &TreeConfig,
) -> Result<Option<usize>, StepError> {
    let name = display_name(alignment);
    let gene = gene_identifier(&name);
    let gene_dir = output_dir.join(&gene);
    fs::create_dir_all(&gene_dir)?;

    let copy = gene_dir.join(&name);
    fs::copy(alignment, &copy)?;

    let length = alignment_length(&read_fasta_file(&copy)?);
    if length == 0 {
        return Ok(None);
    }

    let partition = format!("{gene}.nex");
    fs::write(gene_dir.join(&partition), partition_file_contents(length))?;

    info!("Running IQ-TREE for {gene} ({length} bp)");
    iqtree::infer_tree(runner, &gene_dir, &name, &partition, &gene, &config.iqtree)?;
    Ok(Some(length))
}
