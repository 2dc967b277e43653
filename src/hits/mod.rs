//! Best-hit extraction from HMMER search results.
//!
//! - [`SequenceIndex`]: identifier → sequence body, built once per assembly
//! - [`select_best_hit`]: lowest E-value row of a table, resolved against the index
//! - [`NotFound`]: the two expected ways a search produces nothing
//!
//! ## Selection
//!
//! The scan keeps a running minimum starting at `+inf` and only replaces it on a
//! strictly lower score, so the first row wins among exact ties. Rows that fail to
//! parse never reach the scan (see [`crate::parsing::tblout`]).
//!
//! ## Example
//!
//! ```rust
//! use ortho_pipeline::core::hit::HitRecord;
//! use ortho_pipeline::core::record::SequenceRecord;
//! use ortho_pipeline::hits::{select_best_hit, SequenceIndex};
//!
//! let index = SequenceIndex::from_records(vec![
//!     SequenceRecord::new("X len=4", "ACGT"),
//!     SequenceRecord::new("Y", "TTTT"),
//! ]);
//! let hits = vec![HitRecord::new("X", 0.0), HitRecord::new("Y", 5.0)];
//!
//! let best = select_best_hit(&hits, &index).unwrap();
//! assert_eq!(best.sequence, "ACGT");
//! assert_eq!(best.header, "X [Best Hit E=0.0]");
//! ```

pub mod index;
pub mod selector;

pub use index::SequenceIndex;
pub use selector::{find_best_hit, format_evalue, select_best_hit, NotFound};
