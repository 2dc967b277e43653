//! Ortholog download from the Ensembl REST API.
//!
//! For each human gene ID four endpoints are used:
//!
//! | Endpoint | Yields |
//! |----------|--------|
//! | `/lookup/id/{gene}` | gene symbol (`display_name`) |
//! | `/homology/id/human/{gene}?type=orthologues;format=condensed` | orthologs with their taxonomy level |
//! | `/overlap/translation/{protein}` | parent transcript of each ortholog protein |
//! | `/sequence/id/{transcript}?type=cds` | coding sequence |
//!
//! Requests go through the [`EnsemblApi`] trait so the fetch stage can be
//! exercised without network access. [`EnsemblClient`] is the HTTP implementation.
//! Each request is attempted once.

pub mod client;
pub mod orthologs;

pub use client::{EnsemblApi, EnsemblClient, FetchError, DEFAULT_SERVER};
pub use orthologs::{Homology, OrthologRecord, FISH_TAXONOMY_LEVELS};
