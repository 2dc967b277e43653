//! Core data types shared by every pipeline stage.
//!
//! - [`record::SequenceRecord`]: a FASTA header paired with its sequence body
//! - [`hit::HitRecord`]: one scored row of a tabular search result
//! - [`types::MoleculeType`], [`types::RestoreMode`], [`types::StageOutcome`]: small classification types
//!
//! ## Header Keys
//!
//! Headers are free-form. Wherever a header is used as a lookup key (the sequence
//! index, the rename table on restore, homolog concatenation), only the first
//! whitespace-delimited token is significant:
//!
//! | Header | Key |
//! |--------|-----|
//! | `ENST0001 \| ENSP0001 \| danio_rerio` | `ENST0001` |
//! | `Seq_3 120 bp` | `Seq_3` |
//! | `TRINITY_DN10_c0_g1_i1 len=812` | `TRINITY_DN10_c0_g1_i1` |

pub mod hit;
pub mod record;
pub mod types;
