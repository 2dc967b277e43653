//! Profile search of an assembly for each trimmed alignment.
//!
//! The assembly is loaded into a [`SequenceIndex`] once; every gene then goes
//! through `hmmbuild`, `nhmmer` and best-hit extraction:
//!
//! ```text
//! <output>/hmm_profiles/<gene>.hmm
//! <output>/<assembly>_hits/<gene>_hits.tbl
//! <output>/<assembly>_hits/<gene>_best_hit.fasta
//! ```

use std::path::Path;

use tracing::{info, warn};

use crate::core::record::SequenceRecord;
use crate::core::types::StageOutcome;
use crate::hits::{select_best_hit, NotFound, SequenceIndex};
use crate::parsing::fasta::{write_fasta_file, DEFAULT_LINE_WIDTH};
use crate::parsing::tblout::{parse_tblout_file, TblLayout};
use crate::pipeline::naming::{file_stem, FASTA_EXTENSIONS};
use crate::pipeline::{
    display_name, ensure_dir, list_inputs, StageError, StageReport, StepError,
};
use crate::tools::hmmer::{self, DEFAULT_EVALUE};
use crate::tools::runner::ToolRunner;

/// Settings for the search stage
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// `nhmmer -E` reporting threshold
    pub evalue: f64,
    pub layout: TblLayout,
    pub line_width: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            evalue: DEFAULT_EVALUE,
            layout: TblLayout::NHMMER,
            line_width: DEFAULT_LINE_WIDTH,
        }
    }
}

/// `<assembly stem>_hits`
#[must_use]
pub fn hits_dir_name(assembly: &Path) -> String {
    format!("{}_hits", file_stem(&display_name(assembly)))
}

/// Search `assembly` with a profile built from every alignment in `trimmed_dir`.
///
/// # Errors
///
/// Returns a `StageError` if the assembly is missing or unreadable, the input
/// directory cannot be listed, or output directories cannot be created.
pub fn run(
    runner: &dyn ToolRunner,
    trimmed_dir: &Path,
    assembly: &Path,
    output_dir: &Path,
    config: &SearchConfig,
) -> Result<StageReport, StageError> {
    if !assembly.is_file() {
        return Err(StageError::MissingInput(assembly.to_path_buf()));
    }

    let hmm_dir = output_dir.join("hmm_profiles");
    let results_dir = output_dir.join(hits_dir_name(assembly));
    ensure_dir(&hmm_dir)?;
    ensure_dir(&results_dir)?;

    let mut report = StageReport::new("search");
    let inputs = list_inputs(trimmed_dir, FASTA_EXTENSIONS)?;
    if inputs.is_empty() {
        warn!("No fasta files found in {}", trimmed_dir.display());
        return Ok(report);
    }

    info!("Loading assembly sequences from {}", display_name(assembly));
    let index = SequenceIndex::from_fasta_path(assembly).map_err(|source| {
        StageError::LoadSource {
            path: assembly.to_path_buf(),
            source,
        }
    })?;
    info!("Loaded {} sequences", index.len());
    info!("Processing {} alignments", inputs.len());

    for input in &inputs {
        let name = display_name(input);
        let gene = file_stem(&name);
        info!("Gene: {gene}");

        let hmm = hmm_dir.join(format!("{gene}.hmm"));
        if let Err(e) = hmmer::build_profile(runner, input, &hmm) {
            warn!("HMM build failed for {gene}: {e}");
            report.push(name, StageOutcome::Failed, format!("hmmbuild: {e}"));
            continue;
        }

        let table = results_dir.join(format!("{gene}_hits.tbl"));
        if let Err(e) = hmmer::search(runner, &hmm, assembly, &table, config.evalue) {
            warn!("Search failed for {gene}: {e}");
            report.push(name, StageOutcome::Failed, format!("nhmmer: {e}"));
            continue;
        }

        let best_hit = results_dir.join(format!("{gene}_best_hit.fasta"));
        match extract_best_hit(&table, &index, config.layout, &best_hit, config.line_width) {
            Ok(record) => {
                info!("Found hit: {}", record.header);
                report.push(name, StageOutcome::Success, record.header);
            }
            Err(StepError::NotFound(NotFound::NoSignificantHits)) => {
                info!("No significant hits for {gene}");
                report.push(name, StageOutcome::Skipped, NotFound::NoSignificantHits.to_string());
            }
            Err(e) => {
                warn!("Best hit extraction failed for {gene}: {e}");
                report.push(name, StageOutcome::Failed, e.to_string());
            }
        }
    }

    Ok(report)
}

/// Select the best hit of a `--tblout` table and write it as a one-record FASTA.
///
/// Nothing is written when there is no hit.
///
/// # Errors
///
/// Returns `StepError::NotFound` when no usable hit exists, or I/O and parse errors.
pub fn extract_best_hit(
    table: &Path,
    index: &SequenceIndex,
    layout: TblLayout,
    output: &Path,
    line_width: usize,
) -> Result<SequenceRecord, StepError> {
    let hits = parse_tblout_file(table, layout)?;
    let record = select_best_hit(&hits, index)?;
    write_fasta_file(output, std::slice::from_ref(&record), line_width)?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::*;
    use crate::parsing::fasta::read_fasta_file;
    use crate::tools::runner::testing::{ok, FakeRunner};
    use crate::tools::{ToolError, ToolInvocation, ToolOutput};

    const ASSEMBLY: &str = ">TRINITY_DN1_c0_g1_i1 len=12\nATGGCCAAA\nTAA\n>TRINITY_DN2_c0_g1_i1\nATGTTT\n";

    fn row(target: &str, evalue: &str) -> String {
        format!("{target} - q - 1 100 1 100 1 100 500 + {evalue} 99.0 0.1 -\n")
    }

    /// nhmmer finds DN2 and DN1 for ABHD11 and nothing for NOHIT
    fn fake_hmmer(inv: &ToolInvocation) -> Result<ToolOutput, ToolError> {
        match inv.program.as_str() {
            "hmmbuild" => ok(),
            "nhmmer" => {
                let table = PathBuf::from(&inv.args[1]);
                let name = table.file_name().unwrap().to_string_lossy().into_owned();
                let content = if name.starts_with("ABHD11") {
                    format!(
                        "# header\n{}{}",
                        row("TRINITY_DN2_c0_g1_i1", "1.0e-05"),
                        row("TRINITY_DN1_c0_g1_i1", "2.5e-40")
                    )
                } else {
                    "# no hits\n".to_string()
                };
                fs::write(table, content).unwrap();
                ok()
            }
            other => panic!("unexpected tool {other}"),
        }
    }

    #[test]
    fn test_hits_dir_name() {
        assert_eq!(
            hits_dir_name(Path::new("/data/SD_trinity.Trinity.cdhit.fasta")),
            "SD_trinity.Trinity.cdhit_hits"
        );
    }

    #[test]
    fn test_run_batch() {
        let dir = tempfile::tempdir().unwrap();
        let trimmed = dir.path().join("trimmed");
        fs::create_dir(&trimmed).unwrap();
        fs::write(trimmed.join("ABHD11_ENSG1_aln_tr.fasta"), ">a\nATG\n").unwrap();
        fs::write(trimmed.join("NOHIT_ENSG2_aln_tr.fa"), ">a\nATG\n").unwrap();
        let assembly = dir.path().join("SD_trinity.fasta");
        fs::write(&assembly, ASSEMBLY).unwrap();

        let runner = FakeRunner::new(fake_hmmer);
        let report = run(&runner, &trimmed, &assembly, dir.path(), &SearchConfig::default()).unwrap();

        assert_eq!(report.files.len(), 2);
        assert_eq!(report.files[0].outcome, StageOutcome::Success);
        assert_eq!(report.files[1].outcome, StageOutcome::Skipped);
        assert_eq!(report.files[1].message, "no significant hits");

        let best = read_fasta_file(
            &dir.path()
                .join("SD_trinity_hits/ABHD11_ENSG1_aln_tr_best_hit.fasta"),
        )
        .unwrap();
        assert_eq!(best.len(), 1);
        assert_eq!(best[0].header, "TRINITY_DN1_c0_g1_i1 [Best Hit E=2.5e-40]");
        assert_eq!(best[0].sequence, "ATGGCCAAATAA");
        assert!(!dir
            .path()
            .join("SD_trinity_hits/NOHIT_ENSG2_aln_tr_best_hit.fasta")
            .exists());

        assert_eq!(
            runner.programs(),
            vec!["hmmbuild", "nhmmer", "hmmbuild", "nhmmer"]
        );
    }

    #[test]
    fn test_run_missing_assembly() {
        let dir = tempfile::tempdir().unwrap();
        let runner = FakeRunner::new(fake_hmmer);
        let result = run(
            &runner,
            dir.path(),
            &dir.path().join("missing.fasta"),
            dir.path(),
            &SearchConfig::default(),
        );
        assert!(matches!(result, Err(StageError::MissingInput(_))));
    }

    #[test]
    fn test_extract_best_hit_missing_from_source() {
        let dir = tempfile::tempdir().unwrap();
        let table = dir.path().join("x.tbl");
        fs::write(&table, row("ghost", "1e-50")).unwrap();

        let index = SequenceIndex::from_records(vec![SequenceRecord::new("real", "ATG")]);
        let out = dir.path().join("x_best_hit.fasta");
        let result = extract_best_hit(&table, &index, TblLayout::NHMMER, &out, 60);

        match result {
            Err(StepError::NotFound(e)) => {
                assert_eq!(e.reason(), "hit not present in sequence source");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(!out.exists());
    }
}
