//! File-name conventions shared by the stages.
//!
//! Gene files are named `<GENE>_<ENSEMBL_ID>[_<tag>...].<ext>`, e.g.
//! `ABHD11_ENSG00000106077_fishes.fasta`. The first two `_`-separated parts of
//! the stem identify the gene across every stage.

use std::ffi::OsStr;
use std::path::Path;

/// Extensions picked up by the align stage
pub const ALIGN_EXTENSIONS: &[&str] = &["fasta"];

/// Extensions picked up by the search, merge and tree stages
pub const FASTA_EXTENSIONS: &[&str] = &["fasta", "fa"];

/// Extensions picked up by homolog concatenation
pub const CONCAT_EXTENSIONS: &[&str] = &["fasta", "fa", "fas"];

const FETCHED_TAG: &str = "_fishes";
const ALIGNED_TAG: &str = "_aligned";
const TRIMMED_TAG: &str = "_aln_tr";

/// Case-insensitive extension check
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

/// File name without its last extension (`a.b.fasta` -> `a.b`)
pub fn file_stem(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .map_or_else(|| file_name.to_string(), |s| s.to_string_lossy().into_owned())
}

/// `<GENE>_<ID>` from a gene file name
///
/// ```
/// use ortho_pipeline::pipeline::naming::gene_identifier;
///
/// assert_eq!(gene_identifier("ABHD11_ENSG00000106077_fishes.fasta"), "ABHD11_ENSG00000106077");
/// assert_eq!(gene_identifier("ABHD11.fasta"), "ABHD11");
/// ```
pub fn gene_identifier(file_name: &str) -> String {
    first_two_parts(&file_stem(file_name))
}

/// Stem of the files written for one downloaded gene (`<SYMBOL>_<ID>_fishes`)
pub fn fetched_stem(symbol: &str, gene_id: &str) -> String {
    format!("{symbol}_{gene_id}{FETCHED_TAG}")
}

/// Output name for a concatenated homolog file; spaces in the stem count as `_`
pub fn concat_output_name(file_name: &str) -> String {
    let normalized = file_stem(file_name).replace(' ', "_");
    format!("{}.fasta", first_two_parts(&normalized))
}

fn first_two_parts(stem: &str) -> String {
    let mut parts = stem.split('_');
    match (parts.next(), parts.next()) {
        (Some(gene), Some(id)) => format!("{gene}_{id}"),
        (Some(gene), None) => gene.to_string(),
        _ => String::new(),
    }
}

/// First `_`-separated word of a folder's name (`./human_homologs/` -> `human`)
pub fn folder_suffix(folder: &Path) -> String {
    let name = folder
        .components()
        .next_back()
        .map_or_else(String::new, |c| c.as_os_str().to_string_lossy().into_owned());
    name.split('_').next().unwrap_or_default().to_string()
}

/// Whether a file in the input directory should be aligned: `.fasta` files that
/// are not already the output of an earlier run
pub fn is_align_input(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(OsStr::to_string_lossy)
        .unwrap_or_default();
    has_extension(path, ALIGN_EXTENSIONS)
        && !name.contains(ALIGNED_TAG)
        && !name.contains(TRIMMED_TAG)
}

/// `<stem>_aligned.fasta`
pub fn aligned_name(input_file: &str) -> String {
    format!("{}{ALIGNED_TAG}.fasta", file_stem(input_file))
}

/// Stem of an aligned file with a trailing `_aligned` removed
pub fn trimmed_base(aligned_file: &str) -> String {
    let stem = file_stem(aligned_file);
    stem.strip_suffix(ALIGNED_TAG).unwrap_or(&stem).to_string()
}

/// `<base>_aln_tr.<ext>`
pub fn trimmed_name(base: &str, ext: &str) -> String {
    format!("{base}{TRIMMED_TAG}.{ext}")
}
