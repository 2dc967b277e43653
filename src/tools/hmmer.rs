use std::path::Path;

use crate::tools::runner::{StdoutTarget, ToolError, ToolInvocation, ToolRunner};

pub const HMMBUILD: &str = "hmmbuild";
pub const NHMMER: &str = "nhmmer";

/// Default reporting threshold for `nhmmer -E`
pub const DEFAULT_EVALUE: f64 = 1e-5;

/// `hmmbuild --dna <hmm> <alignment>`
#[must_use]
pub fn build_invocation(alignment: &Path, hmm: &Path) -> ToolInvocation {
    ToolInvocation::new(HMMBUILD)
        .arg("--dna")
        .arg(hmm)
        .arg(alignment)
}

/// `nhmmer --tblout <table> -E <evalue> <hmm> <target>`
#[must_use]
pub fn search_invocation(hmm: &Path, target: &Path, table: &Path, evalue: f64) -> ToolInvocation {
    ToolInvocation::new(NHMMER)
        .arg("--tblout")
        .arg(table)
        .arg("-E")
        .arg(format!("{evalue:e}"))
        .arg(hmm)
        .arg(target)
        // Per-hit alignments go to stdout and can be very large
        .stdout(StdoutTarget::Discard)
}

/// Build a nucleotide profile HMM from an alignment
///
/// # Errors
///
/// Returns a `ToolError` if hmmbuild cannot be run or exits unsuccessfully.
pub fn build_profile(runner: &dyn ToolRunner, alignment: &Path, hmm: &Path) -> Result<(), ToolError> {
    runner.run(&build_invocation(alignment, hmm))?.check(HMMBUILD)?;
    Ok(())
}

/// Search `target` with a profile, writing a `--tblout` table
///
/// # Errors
///
/// Returns a `ToolError` if nhmmer cannot be run or exits unsuccessfully.
pub fn search(
    runner: &dyn ToolRunner,
    hmm: &Path,
    target: &Path,
    table: &Path,
    evalue: f64,
) -> Result<(), ToolError> {
    runner
        .run(&search_invocation(hmm, target, table, evalue))?
        .check(NHMMER)?;
    Ok(())
}
