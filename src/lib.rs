//! # ortho-pipeline
//!
//! A library and command-line tool for the per-gene steps of a comparative-genomics
//! workflow: downloading fish orthologs from Ensembl, aligning and trimming them,
//! finding homologs in transcriptome assemblies and building phylogenetic trees.
//!
//! Two pieces of logic carry most of the weight:
//!
//! - **Header renaming**: alignment trimmers such as Gblocks truncate or mangle long
//!   FASTA headers. [`renaming::forward`] swaps every header for a short safe ID
//!   (`Seq_1`, `Seq_2`, ...) and returns the table needed by [`renaming::restore`]
//!   to put the original headers back after the tool has run.
//! - **Best-hit selection**: [`hits::select_best_hit`] picks the lowest E-value row
//!   of a `--tblout` table and looks the target up in a sequence index built from
//!   the searched assembly.
//!
//! ## Features
//!
//! - **Header-safe trimming**: Gblocks only ever sees `Seq_N` headers
//! - **Deterministic best hits**: the first row wins exact ties
//! - **Compressed assemblies**: gzip and bgzip FASTA are read transparently
//! - **Batch stages**: one report entry per file, a bad file never stops a batch
//! - **Testable tool calls**: external programs run behind the [`tools::ToolRunner`] trait
//!
//! ## Example
//!
//! ```rust
//! use ortho_pipeline::core::types::RestoreMode;
//! use ortho_pipeline::renaming::{forward, restore};
//! use ortho_pipeline::SequenceRecord;
//!
//! let records = vec![
//!     SequenceRecord::new("ENSDART00000012345 zebrafish abhd11", "ATG---AAA"),
//!     SequenceRecord::new("ENST00000222800 human ABHD11", "ATGCCCAAA"),
//! ];
//!
//! let (safe, table) = forward(records.clone()).unwrap();
//! assert_eq!(safe[0].header, "Seq_1");
//!
//! // ... run a tool on `safe` ...
//!
//! let restored = restore(safe, &table, RestoreMode::Strict).unwrap();
//! assert_eq!(restored, records);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Sequence records, hits and shared enums
//! - [`parsing`]: FASTA reader/writer and `--tblout` parser
//! - [`renaming`]: Safe-ID header renaming and restoration
//! - [`hits`]: Sequence index and best-hit selection
//! - [`ensembl`]: Ensembl REST client and ortholog filtering
//! - [`tools`]: External tool invocations (MAFFT, Gblocks, HMMER, IQ-TREE)
//! - [`pipeline`]: Batch stages built on the modules above
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod ensembl;
pub mod hits;
pub mod parsing;
pub mod pipeline;
pub mod renaming;
pub mod tools;

// Re-export commonly used types for convenience
pub use crate::core::hit::HitRecord;
pub use crate::core::record::SequenceRecord;
pub use crate::core::types::*;
pub use hits::{select_best_hit, NotFound, SequenceIndex};
pub use renaming::{forward, restore, RenameError, RenameTable};
