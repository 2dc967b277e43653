use std::collections::HashSet;
use std::io::Write;

use serde::{Deserialize, Serialize};

/// Taxonomy levels of ortholog splits that include fishes but no tetrapod-only clade
pub const FISH_TAXONOMY_LEVELS: [&str; 5] = [
    "Vertebrata",
    "Gnathostomata",
    "Euteleostomi",
    "Sarcopterygii",
    "Actinopterygii",
];

/// One entry of a condensed Ensembl homology response
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Homology {
    /// Target gene ID
    pub id: Option<String>,
    pub species: Option<String>,
    pub protein_id: Option<String>,
    #[serde(rename = "type")]
    pub homology_type: Option<String>,
    pub taxonomy_level: Option<String>,
}

/// One downloaded ortholog; also a row of the per-gene metadata CSV, in column order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrthologRecord {
    pub source_gene_name: String,
    pub source_gene: String,
    pub species: Option<String>,
    pub taxonomy_level: String,
    pub target_gene_id: Option<String>,
    pub target_protein_id: String,
    pub homology_type: Option<String>,
    pub transcript_id: String,
}

/// Trimmed, non-empty gene IDs with duplicates removed, first occurrence kept
pub fn dedupe_gene_ids<'a>(lines: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    lines
        .into_iter()
        .map(str::trim)
        .filter(|id| !id.is_empty() && seen.insert(*id))
        .map(str::to_string)
        .collect()
}

/// Homologies whose taxonomy level is one of `levels`, in response order
pub fn filter_by_taxonomy<S: AsRef<str>>(homologies: Vec<Homology>, levels: &[S]) -> Vec<Homology> {
    homologies
        .into_iter()
        .filter(|h| {
            h.taxonomy_level
                .as_deref()
                .is_some_and(|level| levels.iter().any(|l| l.as_ref() == level))
        })
        .collect()
}

impl OrthologRecord {
    /// `transcript | protein | species | symbol | gene | taxonomy level`
    #[must_use]
    pub fn fasta_header(&self) -> String {
        format!(
            "{} | {} | {} | {} | {} | {}",
            self.transcript_id,
            self.target_protein_id,
            self.species.as_deref().unwrap_or_default(),
            self.source_gene_name,
            self.source_gene,
            self.taxonomy_level
        )
    }
}

/// Write the metadata table with a header row
///
/// # Errors
///
/// Returns a `csv::Error` if a row cannot be written.
pub fn write_metadata_csv<W: Write>(writer: W, records: &[OrthologRecord]) -> Result<(), csv::Error> {
    let mut csv = csv::Writer::from_writer(writer);
    for record in records {
        csv.serialize(record)?;
    }
    csv.flush()?;
    Ok(())
}
