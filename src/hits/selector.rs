use thiserror::Error;

use crate::core::hit::HitRecord;
use crate::core::record::SequenceRecord;
use crate::hits::index::SequenceIndex;

/// Why no best-hit record could be produced.
///
/// Both cases are ordinary outcomes in a batch over many genes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NotFound {
    #[error("no significant hits")]
    NoSignificantHits,

    #[error("hit not present in sequence source: {id} (E={score})")]
    MissingFromSource { id: String, score: f64 },
}

impl NotFound {
    /// Short reason without hit details
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::NoSignificantHits => "no significant hits",
            Self::MissingFromSource { .. } => "hit not present in sequence source",
        }
    }
}

/// Row with the strictly lowest score; the first one wins among ties
#[must_use]
pub fn find_best_hit(hits: &[HitRecord]) -> Option<&HitRecord> {
    let mut best: Option<&HitRecord> = None;
    let mut best_score = f64::INFINITY;

    for hit in hits {
        if hit.score < best_score {
            best_score = hit.score;
            best = Some(hit);
        }
    }

    best
}

/// Pick the lowest-scoring hit and copy its full sequence out of `index`.
///
/// The returned header is `<id> [Best Hit E=<score>]`.
///
/// # Errors
///
/// Returns `NotFound::NoSignificantHits` if no row beats `+inf`, or
/// `NotFound::MissingFromSource` if the winning target is not in `index`.
pub fn select_best_hit(
    hits: &[HitRecord],
    index: &SequenceIndex,
) -> Result<SequenceRecord, NotFound> {
    let best = find_best_hit(hits).ok_or(NotFound::NoSignificantHits)?;

    let sequence = index
        .get(&best.target)
        .ok_or_else(|| NotFound::MissingFromSource {
            id: best.target.clone(),
            score: best.score,
        })?;

    let header = format!("{} [Best Hit E={}]", best.target, format_evalue(best.score));
    Ok(SequenceRecord::new(header, sequence))
}

/// Format an E-value compactly: `0.0`, `1e-10`, `3.5e-07`, `0.25`, `12.0`.
///
/// Exponents carry an explicit sign and at least two digits (`1e+16`), the
/// same text earlier runs of the workflow wrote into headers.
#[must_use]
pub fn format_evalue(score: f64) -> String {
    if score == 0.0 {
        return "0.0".to_string();
    }
    if !score.is_finite() {
        return format!("{score}");
    }

    let magnitude = score.abs();
    if !(1e-4..1e16).contains(&magnitude) {
        return scientific(score);
    }

    let plain = format!("{score}");
    if plain.contains('.') {
        plain
    } else {
        format!("{plain}.0")
    }
}

fn scientific(score: f64) -> String {
    let text = format!("{score:e}");
    let Some((mantissa, exponent)) = text.split_once('e') else {
        return text;
    };
    match exponent.parse::<i32>() {
        Ok(exp) => {
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exp.unsigned_abs())
        }
        Err(_) => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> SequenceIndex {
        let mut index = SequenceIndex::new();
        index.insert("A", "AAAA");
        index.insert("B", "CCCC");
        index.insert("C", "GGGG");
        index.insert("X", "ACGT");
        index.insert("Y", "TTTT");
        index
    }

    #[test]
    fn test_first_minimum_wins_on_tie() {
        let hits = vec![
            HitRecord::new("A", 1e-3),
            HitRecord::new("B", 1e-10),
            HitRecord::new("C", 1e-10),
        ];
        let best = select_best_hit(&hits, &index()).unwrap();
        assert_eq!(best.id(), "B");
        assert_eq!(best.sequence, "CCCC");
        assert_eq!(best.header, "B [Best Hit E=1e-10]");
    }

    #[test]
    fn test_zero_score_wins() {
        let hits = vec![HitRecord::new("X", 0.0), HitRecord::new("Y", 5.0)];
        let best = select_best_hit(&hits, &index()).unwrap();

        assert_eq!(best.sequence, "ACGT");
        assert!(best.header.contains('X'));
        assert!(best.header.contains("0.0"));
    }

    #[test]
    fn test_later_lower_score_wins() {
        let hits = vec![HitRecord::new("Y", 5.0), HitRecord::new("X", 0.5)];
        assert_eq!(find_best_hit(&hits).unwrap().target, "X");
    }

    #[test]
    fn test_no_rows() {
        let err = select_best_hit(&[], &index()).unwrap_err();
        assert_eq!(err, NotFound::NoSignificantHits);
        assert_eq!(err.reason(), "no significant hits");
    }

    #[test]
    fn test_infinite_scores_are_not_hits() {
        let hits = vec![HitRecord::new("A", f64::INFINITY)];
        assert_eq!(
            select_best_hit(&hits, &index()),
            Err(NotFound::NoSignificantHits)
        );
    }

    #[test]
    fn test_winner_missing_from_index() {
        let hits = vec![HitRecord::new("ghost", 1e-30), HitRecord::new("A", 1e-5)];
        let err = select_best_hit(&hits, &index()).unwrap_err();

        assert_eq!(err.reason(), "hit not present in sequence source");
        assert_eq!(
            err,
            NotFound::MissingFromSource {
                id: "ghost".to_string(),
                score: 1e-30
            }
        );
    }

    #[test]
    fn test_all_comment_table() {
        use crate::parsing::tblout::{parse_tblout_text, TblLayout};

        let hits = parse_tblout_text("# nothing\n#\n", TblLayout::NHMMER);
        assert_eq!(
            select_best_hit(&hits, &index()),
            Err(NotFound::NoSignificantHits)
        );
    }

    #[test]
    fn test_all_malformed_table() {
        use crate::parsing::tblout::{parse_tblout_text, TblLayout};

        let table = "A - q - 1 2 3 4 5 6 7 + n/a 1 0\nB too short\n";
        let hits = parse_tblout_text(table, TblLayout::NHMMER);
        assert_eq!(
            select_best_hit(&hits, &index()),
            Err(NotFound::NoSignificantHits)
        );
    }

    #[test]
    fn test_format_evalue() {
        assert_eq!(format_evalue(0.0), "0.0");
        assert_eq!(format_evalue(1e-10), "1e-10");
        assert_eq!(format_evalue(3.2e-120), "3.2e-120");
        assert_eq!(format_evalue(0.25), "0.25");
        assert_eq!(format_evalue(5.0), "5.0");
        assert_eq!(format_evalue(1e-3), "0.001");
        assert_eq!(format_evalue(1.5e-8), "1.5e-08");
        assert_eq!(format_evalue(3.2e-5), "3.2e-05");
        assert_eq!(format_evalue(2.5e-40), "2.5e-40");
        assert_eq!(format_evalue(1e16), "1e+16");
        assert_eq!(format_evalue(9.99e15), "9990000000000000.0");
    }
}
