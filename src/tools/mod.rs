//! Invocation of the external binaries the pipeline depends on.
//!
//! | Tool | Stage | Success criterion |
//! |------|-------|-------------------|
//! | `mafft` | align | exit status 0 |
//! | `Gblocks` | trim | `<input>.gb` exists (its exit status is unreliable) |
//! | `hmmbuild` | search | exit status 0 |
//! | `nhmmer` | search | exit status 0 |
//! | `iqtree` | tree | exit status 0 |
//!
//! Every call goes through the [`ToolRunner`] trait so stages can be exercised
//! without the binaries installed. [`ProcessRunner`] is the real implementation.

pub mod gblocks;
pub mod hmmer;
pub mod iqtree;
pub mod mafft;
pub mod runner;

pub use runner::{ProcessRunner, StdoutTarget, ToolError, ToolInvocation, ToolOutput, ToolRunner};
