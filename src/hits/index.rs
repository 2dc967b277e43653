use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::core::record::SequenceRecord;
use crate::parsing::fasta::open_fasta;
use crate::parsing::ParseError;

/// In-memory lookup from sequence identifier to sequence body.
///
/// Keys are the first whitespace-delimited token of each header. When two records
/// share a key the later one wins and the earlier is shadowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceIndex {
    sequences: HashMap<String, String>,
}

impl SequenceIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from an in-memory collection
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = SequenceRecord>) -> Self {
        let mut index = Self::new();
        let mut shadowed = 0usize;

        for record in records {
            if index.insert_record(record) {
                shadowed += 1;
            }
        }

        if shadowed > 0 {
            debug!("{shadowed} records shadowed by later duplicates");
        }
        index
    }

    /// Stream a (possibly gzip/bgzip compressed) FASTA file into an index.
    ///
    /// Assemblies can be large, so records are read one at a time with the same
    /// reader as every other FASTA input rather than materialized first.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Io` if the file cannot be read or
    /// `ParseError::InvalidFormat` if it has sequence data before the first header.
    pub fn from_fasta_path(path: &Path) -> Result<Self, ParseError> {
        let mut index = Self::new();
        let mut shadowed = 0usize;

        for record in open_fasta(path)? {
            if index.insert_record(record?) {
                shadowed += 1;
            }
        }

        if shadowed > 0 {
            debug!("{shadowed} records shadowed by later duplicates");
        }
        Ok(index)
    }

    fn insert_record(&mut self, record: SequenceRecord) -> bool {
        let key = record.id().to_string();
        self.insert(key, record.sequence)
    }

    /// Insert a sequence, returning `true` if it replaced an earlier one
    pub fn insert(&mut self, id: impl Into<String>, sequence: impl Into<String>) -> bool {
        self.sequences.insert(id.into(), sequence.into()).is_some()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&str> {
        self.sequences.get(id).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.sequences.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::fasta::parse_fasta_text;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_keys_are_first_header_token() {
        let index = SequenceIndex::from_records(vec![SequenceRecord::new(
            "TRINITY_DN1_c0_g1_i1 len=812 path=[0:0-811]",
            "ACGT",
        )]);
        assert_eq!(index.get("TRINITY_DN1_c0_g1_i1"), Some("ACGT"));
        assert!(!index.contains("len=812"));
    }

    #[test]
    fn test_later_duplicate_shadows_earlier() {
        let index = SequenceIndex::from_records(vec![
            SequenceRecord::new("a first", "AAAA"),
            SequenceRecord::new("a second", "CCCC"),
        ]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("a"), Some("CCCC"));
    }

    #[test]
    fn test_from_fasta_path() {
        let mut temp = NamedTempFile::with_suffix(".fasta").unwrap();
        temp.write_all(b">c1 len=8\nACGT\nACGT\n>c2\nGG\n").unwrap();
        temp.flush().unwrap();

        let index = SequenceIndex::from_fasta_path(temp.path()).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("c1"), Some("ACGTACGT"));
        assert_eq!(index.get("c2"), Some("GG"));
    }

    #[test]
    fn test_path_and_records_agree() {
        let text = "\n>c1 len=8\nACGT ACGT\n\n>c2\nGG\n";
        let mut temp = NamedTempFile::with_suffix(".fasta").unwrap();
        temp.write_all(text.as_bytes()).unwrap();
        temp.flush().unwrap();

        let from_path = SequenceIndex::from_fasta_path(temp.path()).unwrap();
        let from_records = SequenceIndex::from_records(parse_fasta_text(text).unwrap());

        assert_eq!(from_path, from_records);
        assert_eq!(from_path.len(), 2);
        assert_eq!(from_path.get("c1"), Some("ACGTACGT"));
    }

    #[test]
    fn test_from_gzipped_path() {
        let mut temp = NamedTempFile::with_suffix(".fa.gz").unwrap();
        {
            let mut encoder = GzEncoder::new(&mut temp, Compression::default());
            encoder.write_all(b">c1\nAC\nGT\n").unwrap();
            encoder.finish().unwrap();
        }

        let index = SequenceIndex::from_fasta_path(temp.path()).unwrap();
        assert_eq!(index.get("c1"), Some("ACGT"));
    }

    #[test]
    fn test_from_path_rejects_data_before_header() {
        let mut temp = NamedTempFile::with_suffix(".fasta").unwrap();
        temp.write_all(b"ACGT\n>c1\nGG\n").unwrap();
        temp.flush().unwrap();

        let result = SequenceIndex::from_fasta_path(temp.path());
        assert!(matches!(result, Err(ParseError::InvalidFormat(_))));
    }

    #[test]
    fn test_from_missing_path() {
        let result = SequenceIndex::from_fasta_path(Path::new("/nonexistent/assembly.fa"));
        assert!(matches!(result, Err(ParseError::Io(_))));
    }
}
