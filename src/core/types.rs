use serde::{Deserialize, Serialize};

/// Sequence type passed to Gblocks with `-t`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum MoleculeType {
    /// Nucleotide sequences trimmed codon-aware
    #[default]
    Codons,
    /// Nucleotide sequences
    Dna,
    /// Amino-acid sequences
    Protein,
}

impl MoleculeType {
    /// Single-letter code understood by Gblocks
    #[must_use]
    pub fn gblocks_code(self) -> char {
        match self {
            Self::Codons => 'c',
            Self::Dna => 'd',
            Self::Protein => 'p',
        }
    }
}

impl std::fmt::Display for MoleculeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Codons => write!(f, "codons"),
            Self::Dna => write!(f, "DNA"),
            Self::Protein => write!(f, "protein"),
        }
    }
}

/// How header restoration treats identifiers missing from the rename table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestoreMode {
    /// Log and keep the header as written by the tool
    #[default]
    Permissive,
    /// Fail on the first unresolved identifier
    Strict,
}

/// Result of processing one file in a batch stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageOutcome {
    Success,
    /// Nothing to do, or an expected empty result (e.g. no hits)
    Skipped,
    Failed,
}

impl std::fmt::Display for StageOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "ok"),
            Self::Skipped => write!(f, "skipped"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gblocks_codes() {
        assert_eq!(MoleculeType::Codons.gblocks_code(), 'c');
        assert_eq!(MoleculeType::Dna.gblocks_code(), 'd');
        assert_eq!(MoleculeType::Protein.gblocks_code(), 'p');
    }

    #[test]
    fn test_default_restore_mode_is_permissive() {
        assert_eq!(RestoreMode::default(), RestoreMode::Permissive);
    }
}
