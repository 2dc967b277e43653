//! Readers and writers for the text formats exchanged between pipeline stages.
//!
//! - **FASTA**: alignments, trimmed alignments, assemblies and best-hit output
//! - **HMMER `--tblout`**: whitespace-delimited search results with `#` comments
//!
//! ## Example
//!
//! ```rust
//! use ortho_pipeline::parsing::fasta::parse_fasta_text;
//! use ortho_pipeline::parsing::tblout::{parse_tblout_text, TblLayout};
//!
//! let records = parse_fasta_text(">seq1 some description\nACGT\nAC\n").unwrap();
//! assert_eq!(records[0].sequence, "ACGTAC");
//!
//! let hits = parse_tblout_text("# comment\n", TblLayout::NHMMER);
//! assert!(hits.is_empty());
//! ```

use thiserror::Error;

pub mod fasta;
pub mod tblout;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid FASTA format: {0}")]
    InvalidFormat(String),
}
