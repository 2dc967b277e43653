use serde::{Deserialize, Serialize};

/// One scored row of a tabular search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitRecord {
    /// Target sequence name (first column of `--tblout`)
    pub target: String,

    /// Significance score, lower is better (E-value)
    pub score: f64,
}

impl HitRecord {
    pub fn new(target: impl Into<String>, score: f64) -> Self {
        Self {
            target: target.into(),
            score,
        }
    }
}
