//! Line-oriented FASTA reader and writer.
//!
//! Headers are lines whose trimmed text starts with `>`. Every other non-blank line
//! belongs to the body of the preceding record; line breaks and any whitespace
//! inside body lines (Gblocks writes residues in blocks of ten) are dropped.
//!
//! Reading never fails on an empty input: an empty collection is a valid result,
//! and callers that need at least one record check for it themselves.
//!
//! Supported extensions for the compressed-aware file reader:
//! - `.fa`, `.fasta`, `.fas` and friends (uncompressed)
//! - `*.gz` (gzip compressed)
//! - `*.bgz` (bgzip compressed)

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Lines, Write};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::core::record::SequenceRecord;
use crate::parsing::ParseError;

/// Residues per body line when writing
pub const DEFAULT_LINE_WIDTH: usize = 60;

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
pub fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Open a FASTA file for record-by-record reading, decompressing gzip/bgzip input.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be opened.
pub fn open_fasta(path: &Path) -> Result<FastaRecords<Box<dyn BufRead>>, ParseError> {
    let file = File::open(path)?;
    let reader: Box<dyn BufRead> = if is_gzipped(path) {
        Box::new(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };
    Ok(FastaRecords::new(reader))
}

/// Read every record of a FASTA file.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or
/// `ParseError::InvalidFormat` if sequence data appears before the first header.
pub fn read_fasta_file(path: &Path) -> Result<Vec<SequenceRecord>, ParseError> {
    open_fasta(path)?.collect()
}

/// Parse FASTA records from in-memory text
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if sequence data appears before the first header.
pub fn parse_fasta_text(text: &str) -> Result<Vec<SequenceRecord>, ParseError> {
    read_fasta(text.as_bytes())
}

/// Read FASTA records from any buffered reader
///
/// # Errors
///
/// Returns `ParseError::Io` on read failure, or `ParseError::InvalidFormat` if
/// sequence data appears before the first header.
pub fn read_fasta<R: BufRead>(reader: R) -> Result<Vec<SequenceRecord>, ParseError> {
    FastaRecords::new(reader).collect()
}

/// Streaming FASTA reader yielding one record at a time.
///
/// Large assemblies are indexed through this without holding the whole
/// collection in memory twice.
pub struct FastaRecords<R> {
    lines: Lines<R>,
    line_number: usize,
    current: Option<SequenceRecord>,
}

impl<R: BufRead> FastaRecords<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
            current: None,
        }
    }
}

impl<R: BufRead> Iterator for FastaRecords<R> {
    type Item = Result<SequenceRecord, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some(line) = self.lines.next() else {
                return self.current.take().map(Ok);
            };
            self.line_number += 1;

            let line = match line {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            if let Some(header) = trimmed.strip_prefix('>') {
                let next = SequenceRecord::new(header, String::new());
                if let Some(done) = self.current.replace(next) {
                    return Some(Ok(done));
                }
                continue;
            }

            match self.current.as_mut() {
                Some(record) => record
                    .sequence
                    .extend(trimmed.chars().filter(|c| !c.is_whitespace())),
                None => {
                    // Line numbers in errors are 1-based for user friendliness
                    return Some(Err(ParseError::InvalidFormat(format!(
                        "Line {} has sequence data before the first header",
                        self.line_number
                    ))));
                }
            }
        }
    }
}

/// Write records to `path`, replacing any existing file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be created or written.
pub fn write_fasta_file(
    path: &Path,
    records: &[SequenceRecord],
    line_width: usize,
) -> Result<(), ParseError> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_fasta(&mut writer, records, line_width)?;
    writer.flush()?;
    Ok(())
}

/// Write records as FASTA, wrapping bodies at `line_width` residues (0 = no wrapping)
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_fasta<W: Write>(
    writer: &mut W,
    records: &[SequenceRecord],
    line_width: usize,
) -> std::io::Result<()> {
    for record in records {
        writeln!(writer, ">{}", record.header)?;
        for line in body_lines(&record.sequence, line_width) {
            writeln!(writer, "{line}")?;
        }
    }
    Ok(())
}

/// Render records to a FASTA string
#[must_use]
pub fn to_fasta_string(records: &[SequenceRecord], line_width: usize) -> String {
    let mut out = String::new();
    for record in records {
        out.push('>');
        out.push_str(&record.header);
        out.push('\n');
        for line in body_lines(&record.sequence, line_width) {
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

/// Split a sequence into output lines of at most `line_width` characters
fn body_lines(sequence: &str, line_width: usize) -> Vec<&str> {
    if sequence.is_empty() {
        return Vec::new();
    }
    if line_width == 0 {
        return vec![sequence];
    }

    let mut lines = Vec::new();
    let mut rest = sequence;
    while !rest.is_empty() {
        let split = rest
            .char_indices()
            .nth(line_width)
            .map_or(rest.len(), |(i, _)| i);
        let (line, tail) = rest.split_at(split);
        lines.push(line);
        rest = tail;
    }
    lines
}
