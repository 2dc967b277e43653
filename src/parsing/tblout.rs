//! Parser for HMMER `--tblout` tables.
//!
//! Fields are separated by runs of whitespace and comment lines start with `#`.
//! Only two fields matter: the target name and one E-value column, whose position
//! depends on the program that wrote the table:
//!
//! | Program   | Target | E-value | Minimum fields read |
//! |-----------|--------|---------|---------------------|
//! | nhmmer    | 0      | 12      | 13                  |
//! | hmmsearch | 0      | 4       | 5                   |
//!
//! A row only needs enough fields to reach its E-value column; trailing
//! columns such as the free-text description are never read. Rows that are too short or whose E-value does not parse are skipped so that a
//! single corrupt line never invalidates the rest of the table.

use std::path::Path;

use tracing::debug;

use crate::core::hit::HitRecord;
use crate::parsing::ParseError;

/// Column positions of the fields read from a table row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TblLayout {
    pub target_column: usize,
    pub score_column: usize,
    /// Rows with fewer fields are skipped
    pub min_fields: usize,
}

impl TblLayout {
    /// `nhmmer --tblout`: E-value in column 12
    pub const NHMMER: Self = Self {
        target_column: 0,
        score_column: 12,
        min_fields: 13,
    };

    /// `hmmsearch --tblout`: full-sequence E-value in column 4
    pub const HMMSEARCH: Self = Self {
        target_column: 0,
        score_column: 4,
        min_fields: 5,
    };
}

impl Default for TblLayout {
    fn default() -> Self {
        Self::NHMMER
    }
}

/// Program that produced a `--tblout` table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TblFlavor {
    #[default]
    Nhmmer,
    Hmmsearch,
}

impl TblFlavor {
    #[must_use]
    pub fn layout(self) -> TblLayout {
        match self {
            Self::Nhmmer => TblLayout::NHMMER,
            Self::Hmmsearch => TblLayout::HMMSEARCH,
        }
    }
}

/// Read a `--tblout` file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read. Malformed rows are not errors.
pub fn parse_tblout_file(path: &Path, layout: TblLayout) -> Result<Vec<HitRecord>, ParseError> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_tblout_text(&content, layout))
}

/// Parse every valid row of a `--tblout` table, in file order
#[must_use]
pub fn parse_tblout_text(text: &str, layout: TblLayout) -> Vec<HitRecord> {
    let mut hits = Vec::new();
    let mut skipped = 0usize;

    for line in text.lines() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match parse_row(trimmed, layout) {
            Some(hit) => hits.push(hit),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!("Skipped {skipped} malformed table rows");
    }

    hits
}

/// Parse a single data row. Returns `None` for short rows and unusable scores.
#[must_use]
pub fn parse_row(line: &str, layout: TblLayout) -> Option<HitRecord> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < layout.min_fields {
        return None;
    }

    let target = fields.get(layout.target_column)?;
    let score: f64 = fields.get(layout.score_column)?.parse().ok()?;

    // NaN never compares lower than anything; treat it like a non-number
    if score.is_nan() {
        return None;
    }

    Some(HitRecord::new(*target, score))
}
