//! Download of fish ortholog coding sequences from Ensembl.
//!
//! For each human gene the stage writes `<SYMBOL>_<ID>_fishes.fasta` with one
//! CDS per ortholog and `<SYMBOL>_<ID>_fishes.csv` with the ortholog metadata.
//! These are the inputs of the align stage.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::core::record::SequenceRecord;
use crate::core::types::StageOutcome;
use crate::ensembl::orthologs::{filter_by_taxonomy, write_metadata_csv};
use crate::ensembl::{EnsemblApi, Homology, OrthologRecord, FISH_TAXONOMY_LEVELS};
use crate::parsing::fasta::{write_fasta_file, DEFAULT_LINE_WIDTH};
use crate::pipeline::naming::fetched_stem;
use crate::pipeline::{ensure_dir, StageError, StageReport, StepError};

#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Orthologs are kept only when split at one of these levels
    pub taxonomy_levels: Vec<String>,
    pub line_width: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            taxonomy_levels: FISH_TAXONOMY_LEVELS.iter().map(|l| (*l).to_string()).collect(),
            line_width: DEFAULT_LINE_WIDTH,
        }
    }
}

/// What happened to one gene
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneFetch {
    Written { fasta: String, sequences: usize },
    NoOrthologs,
    NoSequences,
}

/// Download the orthologs of every gene in `gene_ids`.
///
/// # Errors
///
/// Returns `StageError::CreateDir` if the output directory cannot be created.
pub fn run(
    api: &dyn EnsemblApi,
    gene_ids: &[String],
    output_dir: &Path,
    config: &FetchConfig,
) -> Result<StageReport, StageError> {
    ensure_dir(output_dir)?;

    let mut report = StageReport::new("fetch");
    if gene_ids.is_empty() {
        warn!("No gene IDs to fetch");
        return Ok(report);
    }
    info!(
        "Fetching orthologs of {} genes at taxonomy levels {}",
        gene_ids.len(),
        config.taxonomy_levels.join(", ")
    );

    for (i, gene) in gene_ids.iter().enumerate() {
        info!("[{}/{}] Processing {gene}", i + 1, gene_ids.len());

        match fetch_gene(api, gene, output_dir, config) {
            Ok(GeneFetch::Written { fasta, sequences }) => {
                report.push(gene, StageOutcome::Success, format!("{fasta} ({sequences} sequences)"));
            }
            Ok(GeneFetch::NoOrthologs) => {
                report.push(gene, StageOutcome::Skipped, "no matching orthologs");
            }
            Ok(GeneFetch::NoSequences) => {
                report.push(gene, StageOutcome::Skipped, "no CDS sequences retrieved");
            }
            Err(e) => {
                warn!("Failed to fetch {gene}: {e}");
                report.push(gene, StageOutcome::Failed, e.to_string());
            }
        }
    }

    info!(
        "Written: {}, skipped: {}, failed: {}",
        report.count(StageOutcome::Success),
        report.count(StageOutcome::Skipped),
        report.count(StageOutcome::Failed)
    );
    Ok(report)
}

/// Download one gene's orthologs and write its FASTA and CSV files.
///
/// A failed symbol lookup falls back to the gene ID. Orthologs whose transcript
/// or CDS cannot be retrieved are left out.
///
/// # Errors
///
/// Returns a `StepError` if the ortholog query fails or an output file cannot be written.
pub fn fetch_gene(
    api: &dyn EnsemblApi,
    gene: &str,
    output_dir: &Path,
    config: &FetchConfig,
) -> Result<GeneFetch, StepError> {
    let symbol = resolve_symbol(api, gene);
    debug!("{gene} identified as {symbol}");

    let orthologs = filter_by_taxonomy(api.orthologues(gene)?, &config.taxonomy_levels);
    if orthologs.is_empty() {
        info!("No matching orthologs for {symbol}");
        return Ok(GeneFetch::NoOrthologs);
    }
    info!("Found {} matching orthologs for {symbol}", orthologs.len());

    let mut records = Vec::new();
    let mut sequences = Vec::new();
    for homology in orthologs {
        if let Some((record, cds)) = fetch_cds(api, gene, &symbol, homology) {
            sequences.push(SequenceRecord::new(record.fasta_header(), cds));
            records.push(record);
        }
    }
    if records.is_empty() {
        info!("No CDS sequences retrieved for {symbol}");
        return Ok(GeneFetch::NoSequences);
    }

    let stem = fetched_stem(&symbol, gene);
    let fasta = format!("{stem}.fasta");
    write_fasta_file(&output_dir.join(&fasta), &sequences, config.line_width)?;

    let csv_file = File::create(output_dir.join(format!("{stem}.csv")))?;
    write_metadata_csv(BufWriter::new(csv_file), &records)?;

    Ok(GeneFetch::Written {
        fasta,
        sequences: records.len(),
    })
}

fn resolve_symbol(api: &dyn EnsemblApi, gene: &str) -> String {
    match api.gene_symbol(gene) {
        Ok(Some(symbol)) if !symbol.is_empty() => symbol,
        Ok(_) => gene.to_string(),
        Err(e) => {
            warn!("Symbol lookup for {gene} failed, using the ID: {e}");
            gene.to_string()
        }
    }
}

/// Transcript and CDS of one ortholog; `None` when either is unavailable
fn fetch_cds(
    api: &dyn EnsemblApi,
    gene: &str,
    symbol: &str,
    homology: Homology,
) -> Option<(OrthologRecord, String)> {
    let protein_id = homology.protein_id.filter(|p| !p.is_empty())?;

    let transcript_id = match api.parent_transcript(&protein_id) {
        Ok(Some(tid)) if !tid.is_empty() => tid,
        Ok(_) => {
            debug!("No parent transcript for {protein_id}");
            return None;
        }
        Err(e) => {
            warn!("Transcript lookup for {protein_id} failed: {e}");
            return None;
        }
    };

    let cds = match api.cds_sequence(&transcript_id) {
        Ok(Some(seq)) if !seq.is_empty() => seq,
        Ok(_) => {
            debug!("No CDS for {transcript_id}");
            return None;
        }
        Err(e) => {
            warn!("CDS download for {transcript_id} failed: {e}");
            return None;
        }
    };

    let record = OrthologRecord {
        source_gene_name: symbol.to_string(),
        source_gene: gene.to_string(),
        species: homology.species,
        taxonomy_level: homology.taxonomy_level.unwrap_or_default(),
        target_gene_id: homology.id,
        target_protein_id: protein_id,
        homology_type: homology.homology_type,
        transcript_id,
    };
    Some((record, cds))
}
