use serde::{Deserialize, Serialize};

/// A single FASTA record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceRecord {
    /// Header text without the leading `>`
    pub header: String,

    /// Residues with line breaks and formatting whitespace removed
    pub sequence: String,
}

impl SequenceRecord {
    pub fn new(header: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            sequence: sequence.into(),
        }
    }

    /// First whitespace-delimited token of the header, used as a lookup key.
    ///
    /// Returns the empty string for a blank header.
    #[must_use]
    pub fn id(&self) -> &str {
        first_token(&self.header)
    }

    /// Number of residues, gap characters included
    #[must_use]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    #[must_use]
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }
}

/// First whitespace-delimited token of `text`, or `""` if there is none
#[must_use]
pub fn first_token(text: &str) -> &str {
    text.split_whitespace().next().unwrap_or("")
}
