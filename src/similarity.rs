use rayon::prelude::*;

use crate::record::{PlayerRecord, Stat};
use crate::selection::SelectionState;

/// Length of the similarity (and top-by-market) display list.
pub const SIMILAR_LIST_LEN: usize = 10;

/// Cosine of the angle between two vectors; 0 when either has zero norm.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (av, bv) in a.iter().zip(b) {
        dot += av * bv;
        norm_a += av * av;
        norm_b += bv * bv;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a.sqrt() * norm_b.sqrt())
    }
}

/// Per-90 stats the reference player actually carries. The feature set is
/// fixed by the reference's data availability, not intersected per candidate.
fn feature_set(reference: &PlayerRecord) -> Vec<Stat> {
    Stat::ALL
        .into_iter()
        .filter(|s| s.is_per90() && reference.stat(*s).is_some())
        .collect()
}

fn feature_vector(record: &PlayerRecord, features: &[Stat]) -> Vec<f64> {
    features
        .iter()
        .map(|&s| record.stat(s).unwrap_or(0.0))
        .collect()
}

/// The ten candidates most similar to `reference` by cosine similarity over
/// its per-90 profile, re-sorted descending by market value for display.
/// Already-selected players are excluded from the pool.
pub fn similar_players<'a>(
    reference: &PlayerRecord,
    pool: &[&'a PlayerRecord],
    selection: &SelectionState,
) -> Vec<(&'a PlayerRecord, f64)> {
    let features = feature_set(reference);
    let ref_vec = feature_vector(reference, &features);

    let mut scored: Vec<(&PlayerRecord, f64)> = pool
        .par_iter()
        .filter(|r| !selection.is_selected(&r.key))
        .map(|&r| {
            let sim = cosine_similarity(&ref_vec, &feature_vector(r, &features));
            (r, sim)
        })
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(SIMILAR_LIST_LEN);
    // Two-stage sort: most-similar ten first, then ordered by price.
    scored.sort_by(|a, b| {
        let ma = a.0.market_value_eur.unwrap_or(0.0);
        let mb = b.0.market_value_eur.unwrap_or(0.0);
        mb.total_cmp(&ma)
    });
    scored
}

/// Fallback list when nothing is selected: the subset's ten most valuable
/// players.
pub fn top_by_market_value<'a>(pool: &[&'a PlayerRecord]) -> Vec<&'a PlayerRecord> {
    let mut out: Vec<&PlayerRecord> = pool.to_vec();
    out.sort_by(|a, b| {
        let ma = a.market_value_eur.unwrap_or(0.0);
        let mb = b.market_value_eur.unwrap_or(0.0);
        mb.total_cmp(&ma)
    });
    out.truncate(SIMILAR_LIST_LEN);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_self_is_one() {
        let v = [0.4, 1.2, 0.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn cosine_zero_norm_is_zero() {
        let zero = [0.0, 0.0, 0.0];
        assert_eq!(cosine_similarity(&zero, &zero), 0.0);
        assert_eq!(cosine_similarity(&zero, &[1.0, 2.0, 3.0]), 0.0);
    }

    #[test]
    fn cosine_orthogonal_is_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }
}
