use std::collections::HashMap;

/// Prefix of every synthetic header
pub const SAFE_ID_PREFIX: &str = "Seq_";

/// Synthetic ID for the `ordinal`-th record (1-based)
#[must_use]
pub fn safe_id(ordinal: usize) -> String {
    format!("{SAFE_ID_PREFIX}{ordinal}")
}

/// Bijection between synthetic IDs (`Seq_1..Seq_N`) and original headers
/// for a single file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameTable {
    /// `(safe_id, original_header)` in encounter order
    entries: Vec<(String, String)>,

    /// `safe_id` -> position in `entries`
    lookup: HashMap<String, usize>,
}

impl RenameTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the next original header and return its synthetic ID
    pub fn push(&mut self, original: impl Into<String>) -> String {
        let id = safe_id(self.entries.len() + 1);
        self.lookup.insert(id.clone(), self.entries.len());
        self.entries.push((id.clone(), original.into()));
        id
    }

    /// Original header for a synthetic ID
    #[must_use]
    pub fn original(&self, safe_id: &str) -> Option<&str> {
        self.lookup
            .get(safe_id)
            .map(|&i| self.entries[i].1.as_str())
    }

    #[must_use]
    pub fn contains(&self, safe_id: &str) -> bool {
        self.lookup.contains_key(safe_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(safe_id, original_header)` pairs in encounter order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(s, o)| (s.as_str(), o.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_assigns_ordinals() {
        let mut table = RenameTable::new();
        assert_eq!(table.push("alpha"), "Seq_1");
        assert_eq!(table.push("beta"), "Seq_2");
        assert_eq!(table.push("alpha"), "Seq_3");
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_lookup() {
        let mut table = RenameTable::new();
        table.push("ENST0001 | danio_rerio");

        assert_eq!(table.original("Seq_1"), Some("ENST0001 | danio_rerio"));
        assert_eq!(table.original("Seq_2"), None);
        assert_eq!(table.original("Seq_01"), None);
        assert!(table.contains("Seq_1"));
    }

    #[test]
    fn test_iter_in_encounter_order() {
        let mut table = RenameTable::new();
        table.push("b");
        table.push("a");

        let pairs: Vec<_> = table.iter().collect();
        assert_eq!(pairs, vec![("Seq_1", "b"), ("Seq_2", "a")]);
    }
}
