use thiserror::Error;
use tracing::warn;

use crate::core::record::{first_token, SequenceRecord};
use crate::core::types::RestoreMode;
use crate::renaming::table::RenameTable;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenameError {
    #[error("Input contains 0 sequences")]
    EmptyInput,

    #[error("No original header recorded for '{0}'")]
    MissingTableEntry(String),
}

/// Replace every header with a synthetic `Seq_<n>` ID.
///
/// Records keep their order and sequence bodies. The returned table holds one
/// entry per record.
///
/// # Errors
///
/// Returns `RenameError::EmptyInput` if `records` is empty; nothing downstream
/// should run on a zero-sequence file.
pub fn forward(
    records: Vec<SequenceRecord>,
) -> Result<(Vec<SequenceRecord>, RenameTable), RenameError> {
    if records.is_empty() {
        return Err(RenameError::EmptyInput);
    }

    let mut table = RenameTable::new();
    let renamed = records
        .into_iter()
        .map(|record| {
            let SequenceRecord { header, sequence } = record;
            let id = table.push(header);
            SequenceRecord::new(id, sequence)
        })
        .collect();

    Ok((renamed, table))
}

/// Put the original headers back on records written by a downstream tool.
///
/// The first whitespace-delimited token of each header is looked up in `table`;
/// tools may append annotations after the ID. Headers without a table entry are
/// kept as they are in permissive mode, so no record is ever dropped.
///
/// # Errors
///
/// Returns `RenameError::MissingTableEntry` for the first unresolved header, in
/// strict mode only.
pub fn restore(
    records: Vec<SequenceRecord>,
    table: &RenameTable,
    mode: RestoreMode,
) -> Result<Vec<SequenceRecord>, RenameError> {
    let mut restored = Vec::with_capacity(records.len());

    for record in records {
        match table.original(first_token(&record.header)) {
            Some(original) => {
                let original = original.to_string();
                restored.push(record.with_header(original));
            }
            None => match mode {
                RestoreMode::Strict => {
                    return Err(RenameError::MissingTableEntry(record.header));
                }
                RestoreMode::Permissive => {
                    warn!(
                        "No original header for '{}', keeping it unchanged",
                        record.header
                    );
                    restored.push(record);
                }
            },
        }
    }

    Ok(restored)
}
