//! Batch stages of the ortholog workflow.
//!
//! Each stage walks the FASTA files of one directory ([`fetch`] walks a gene ID
//! list instead), processes them one at a time and records a [`FileReport`] per
//! file. A failing file never stops the batch;
//! only problems with the stage setup (missing input directory, unreadable
//! assembly, output directories that cannot be created) are returned as
//! [`StageError`].
//!
//! | Stage | Reads | Writes |
//! |-------|-------|--------|
//! | [`align_trim`] | `*.fasta` | `aligned/*_aligned.fasta`, `trimmed/*_aln_tr.{fasta,html}` |
//! | [`concat`] | best-hit folders | `<gene>_<id>.fasta` with folder-suffixed headers |
//! | [`fetch`] | gene ID list + Ensembl REST | `<gene>_<id>_fishes.{fasta,csv}` |
//! | [`merge`] | Ensembl + combined homologs | `<gene>_<id>.fasta` |
//! | [`search`] | trimmed alignments + assembly | `hmm_profiles/*.hmm`, `<assembly>_hits/*` |
//! | [`tree`] | trimmed merged alignments | `<gene>_<id>/` with partition file and IQ-TREE output |

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::core::types::StageOutcome;
use crate::ensembl::FetchError;
use crate::hits::NotFound;
use crate::parsing::ParseError;
use crate::renaming::RenameError;
use crate::tools::ToolError;

pub mod align_trim;
pub mod concat;
pub mod fetch;
pub mod merge;
pub mod naming;
pub mod search;
pub mod tree;

/// Problems that prevent a stage from starting
#[derive(Error, Debug)]
pub enum StageError {
    #[error("No input folders provided")]
    NoInputs,

    #[error("Input path does not exist: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("Cannot read directory {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load sequences from {}: {source}", .path.display())]
    LoadSource {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

/// Why a single file could not be processed
#[derive(Error, Debug)]
pub enum StepError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Rename(#[from] RenameError),

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error(transparent)]
    NotFound(#[from] NotFound),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Outcome for one input file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub file: String,
    pub outcome: StageOutcome,
    pub message: String,
}

/// Per-file outcomes of one stage run, in processing order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub stage: String,
    pub files: Vec<FileReport>,
}

impl StageReport {
    pub fn new(stage: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            files: Vec::new(),
        }
    }

    pub fn push(&mut self, file: impl Into<String>, outcome: StageOutcome, message: impl Into<String>) {
        self.files.push(FileReport {
            file: file.into(),
            outcome,
            message: message.into(),
        });
    }

    #[must_use]
    pub fn count(&self, outcome: StageOutcome) -> usize {
        self.files.iter().filter(|f| f.outcome == outcome).count()
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.count(StageOutcome::Failed) > 0
    }
}

/// Files directly inside `dir` whose extension is one of `extensions`
/// (case-insensitive), sorted by name.
///
/// # Errors
///
/// Returns `StageError::MissingInput` if `dir` does not exist or
/// `StageError::ReadDir` if it cannot be listed.
pub fn list_inputs(dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>, StageError> {
    if !dir.is_dir() {
        return Err(StageError::MissingInput(dir.to_path_buf()));
    }

    let read_dir_error = |source| StageError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_dir_error)? {
        let path = entry.map_err(read_dir_error)?.path();
        if path.is_file() && naming::has_extension(&path, extensions) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Create `dir` and its parents if missing
///
/// # Errors
///
/// Returns `StageError::CreateDir` on failure.
pub fn ensure_dir(dir: &Path) -> Result<(), StageError> {
    std::fs::create_dir_all(dir).map_err(|source| StageError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// File name of `path` for reports and log messages
pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts() {
        let mut report = StageReport::new("align");
        report.push("a.fasta", StageOutcome::Success, "ok");
        report.push("b.fasta", StageOutcome::Failed, "mafft not found");
        report.push("c.fasta", StageOutcome::Skipped, "empty");

        assert_eq!(report.count(StageOutcome::Success), 1);
        assert_eq!(report.count(StageOutcome::Skipped), 1);
        assert!(report.has_failures());
    }

    #[test]
    fn test_list_inputs_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.fasta", "a.FA", "notes.txt", "c.fas"] {
            std::fs::write(dir.path().join(name), ">x\nA\n").unwrap();
        }
        std::fs::create_dir(dir.path().join("sub.fasta")).unwrap();

        let files = list_inputs(dir.path(), &["fasta", "fa"]).unwrap();
        let names: Vec<_> = files.iter().map(|p| display_name(p)).collect();
        assert_eq!(names, vec!["a.FA", "b.fasta"]);
    }

    #[test]
    fn test_list_inputs_missing_dir() {
        let result = list_inputs(Path::new("/nonexistent/input"), &["fasta"]);
        assert!(matches!(result, Err(StageError::MissingInput(_))));
    }
}
