//! Gblocks alignment trimming.
//!
//! Gblocks writes its results next to its input, named by appending the `-e`
//! suffix: `<input>.gb` for the trimmed alignment and `<input>.gb.htm` for the
//! HTML report (some builds write `<input>.htm` instead). It exits non-zero even
//! on success, so the presence of the alignment file is the only reliable signal.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::types::MoleculeType;
use crate::tools::runner::{append_suffix, ToolError, ToolInvocation, ToolRunner};

pub const PROGRAM: &str = "Gblocks";

/// Extension passed with `-e`
pub const RESULT_SUFFIX: &str = ".gb";

/// Fraction of sequences required for a conserved position (`-b1`)
pub const CONSERVED_FRACTION: f64 = 0.51;

/// Fraction of sequences required for a flank position (`-b2`)
pub const FLANK_FRACTION: f64 = 0.85;

/// Gap positions Gblocks may keep in a block (`-b5`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum AllowedGaps {
    None,
    #[default]
    Half,
    All,
}

impl AllowedGaps {
    #[must_use]
    pub fn code(self) -> char {
        match self {
            Self::None => 'n',
            Self::Half => 'h',
            Self::All => 'a',
        }
    }
}

/// Block parameters for one Gblocks run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GblocksParams {
    pub molecule: MoleculeType,
    /// Minimum sequences for a conserved position
    pub b1: usize,
    /// Minimum sequences for a flank position
    pub b2: usize,
    /// Maximum contiguous non-conserved positions
    pub b3: usize,
    /// Minimum block length
    pub b4: usize,
    pub b5: AllowedGaps,
}

impl GblocksParams {
    /// Parameters scaled to an alignment of `sequence_count` sequences.
    ///
    /// `b1` and `b2` are rounded half-to-even and `b2` is raised to `b1` when needed,
    /// since Gblocks rejects `b2 < b1`.
    #[must_use]
    pub fn for_sequence_count(sequence_count: usize, molecule: MoleculeType) -> Self {
        let b1 = scaled(CONSERVED_FRACTION, sequence_count);
        let b2 = scaled(FLANK_FRACTION, sequence_count).max(b1);

        Self {
            molecule,
            b1,
            b2,
            b3: 5,
            b4: 10,
            b5: AllowedGaps::Half,
        }
    }

    #[must_use]
    pub fn with_allowed_gaps(mut self, b5: AllowedGaps) -> Self {
        self.b5 = b5;
        self
    }
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)] // Sequence counts are small and the product is non-negative
fn scaled(fraction: f64, count: usize) -> usize {
    (fraction * count as f64).round_ties_even() as usize
}

/// Files produced by a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GblocksOutput {
    pub alignment: PathBuf,
    pub report: Option<PathBuf>,
}

#[must_use]
pub fn invocation(input: &Path, params: &GblocksParams) -> ToolInvocation {
    ToolInvocation::new(PROGRAM)
        .arg(input)
        .arg(format!("-t={}", params.molecule.gblocks_code()))
        .arg(format!("-b1={}", params.b1))
        .arg(format!("-b2={}", params.b2))
        .arg(format!("-b3={}", params.b3))
        .arg(format!("-b4={}", params.b4))
        .arg(format!("-b5={}", params.b5.code()))
        .arg(format!("-e={RESULT_SUFFIX}"))
}

/// Trim the alignment at `input`, which must already carry Gblocks-safe headers.
///
/// # Errors
///
/// Returns `ToolError::MissingOutput` (with Gblocks' stdout) if no trimmed
/// alignment was written, or any error from starting the process.
pub fn trim(
    runner: &dyn ToolRunner,
    input: &Path,
    params: &GblocksParams,
) -> Result<GblocksOutput, ToolError> {
    let output = runner.run(&invocation(input, params))?;

    let alignment = append_suffix(input, RESULT_SUFFIX);
    if !alignment.exists() {
        return Err(ToolError::MissingOutput {
            program: PROGRAM.to_string(),
            path: alignment,
            stdout: output.stdout,
        });
    }

    let report = [
        append_suffix(&alignment, ".htm"),
        append_suffix(input, ".htm"),
    ]
    .into_iter()
    .find(|p| p.exists());

    Ok(GblocksOutput { alignment, report })
}
