//! Safe header renaming for tools that cannot parse arbitrary FASTA headers.
//!
//! Gblocks truncates or rejects headers containing spaces, pipes and long
//! identifiers. Before trimming, every header is replaced with a short synthetic
//! ID (`Seq_1`, `Seq_2`, ...) and the originals are kept in a [`RenameTable`].
//! Once the tool has written its output, [`restore`] puts the originals back.
//!
//! The table is an explicit value: [`forward`] returns it, [`restore`] takes it.
//! One table covers exactly one file.
//!
//! ## Example
//!
//! ```rust
//! use ortho_pipeline::core::record::SequenceRecord;
//! use ortho_pipeline::core::types::RestoreMode;
//! use ortho_pipeline::renaming::{forward, restore};
//!
//! let records = vec![
//!     SequenceRecord::new("ENST0001 | ENSP0001 | danio_rerio", "ATGAAA"),
//!     SequenceRecord::new("ENST0002 | ENSP0002 | oryzias_latipes", "ATGAAG"),
//! ];
//!
//! let (safe, table) = forward(records.clone()).unwrap();
//! assert_eq!(safe[0].header, "Seq_1");
//!
//! let restored = restore(safe, &table, RestoreMode::Permissive).unwrap();
//! assert_eq!(restored, records);
//! ```

pub mod renamer;
pub mod table;

pub use renamer::{forward, restore, RenameError};
pub use table::{RenameTable, SAFE_ID_PREFIX};
