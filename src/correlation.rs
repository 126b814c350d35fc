use rayon::prelude::*;

use crate::record::{PlayerRecord, Stat};

/// Stats never correlated against market value: the participation counters
/// are sample-size artifacts, not per-match statistics.
pub const CORRELATION_EXCLUDED: [Stat; 3] = [Stat::Mp, Stat::Starts, Stat::Min];

/// How many entries each end of the ranked display list carries.
pub const RANKED_PER_SIDE: usize = 5;

#[derive(Debug, Clone, Copy)]
pub struct CorrelationEntry {
    pub stat: Stat,
    pub r: f64,
}

/// Sample Pearson correlation: covariance over (n-1) divided by the sample
/// standard deviations. Degenerate inputs (fewer than two points, or a
/// constant series) yield 0 rather than an error.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return 0.0;
    }
    let xs = &xs[..n];
    let ys = &ys[..n];
    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;
    let denom = (n - 1) as f64;
    let var_x = xs.iter().map(|x| (x - mean_x).powi(2)).sum::<f64>() / denom;
    let var_y = ys.iter().map(|y| (y - mean_y).powi(2)).sum::<f64>() / denom;
    let std_x = var_x.sqrt();
    let std_y = var_y.sqrt();
    if std_x == 0.0 || std_y == 0.0 || !std_x.is_finite() || !std_y.is_finite() {
        return 0.0;
    }
    let cov = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum::<f64>()
        / denom;
    (cov / (std_x * std_y)).clamp(-1.0, 1.0)
}

/// Correlation of every candidate stat against market value over `subset`.
///
/// Pairwise-complete: a record missing either the stat or its market value
/// is dropped from that one correlation. Candidates with no usable pairs
/// report r = 0.
pub fn market_value_correlations(subset: &[&PlayerRecord]) -> Vec<CorrelationEntry> {
    Stat::ALL
        .into_par_iter()
        .filter(|s| !CORRELATION_EXCLUDED.contains(s))
        .map(|stat| {
            let mut xs = Vec::with_capacity(subset.len());
            let mut ys = Vec::with_capacity(subset.len());
            for record in subset {
                if let (Some(market), Some(value)) = (record.market_value_eur, record.stat(stat)) {
                    xs.push(market);
                    ys.push(value);
                }
            }
            CorrelationEntry {
                stat,
                r: pearson(&xs, &ys),
            }
        })
        .collect()
}

/// Display ordering: the five most positively correlated stats descending,
/// then the five most negative reversed so the most negative sits last.
/// The two ends can only overlap when fewer than ten candidates exist.
pub fn ranked_for_display(entries: &[CorrelationEntry]) -> Vec<CorrelationEntry> {
    let mut top: Vec<CorrelationEntry> = entries.to_vec();
    top.sort_by(|a, b| b.r.total_cmp(&a.r));
    top.truncate(RANKED_PER_SIDE);

    let mut bottom: Vec<CorrelationEntry> = entries.to_vec();
    bottom.sort_by(|a, b| a.r.total_cmp(&b.r));
    bottom.truncate(RANKED_PER_SIDE);
    bottom.reverse();

    top.extend(bottom);
    top
}

/// Full pipeline used by the correlation panel and the export.
pub fn market_correlation_ranking(subset: &[&PlayerRecord]) -> Vec<CorrelationEntry> {
    ranked_for_display(&market_value_correlations(subset))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pearson_is_symmetric_and_bounded() {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = [2.0, 1.0, 4.0, 3.0, 5.0];
        let r = pearson(&xs, &ys);
        assert_eq!(r, pearson(&ys, &xs));
        assert!((-1.0..=1.0).contains(&r));
    }

    #[test]
    fn pearson_perfect_and_inverse() {
        let xs = [1.0, 2.0, 3.0];
        assert!((pearson(&xs, &[2.0, 4.0, 6.0]) - 1.0).abs() < 1e-12);
        assert!((pearson(&xs, &[3.0, 2.0, 1.0]) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_constant_series_is_zero() {
        assert_eq!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(pearson(&[], &[]), 0.0);
        assert_eq!(pearson(&[1.0], &[2.0]), 0.0);
    }

    #[test]
    fn ranked_display_puts_most_negative_last() {
        let entries: Vec<CorrelationEntry> = [
            (Stat::Gls, 0.9),
            (Stat::Ast, 0.7),
            (Stat::Xg, 0.5),
            (Stat::Xag, 0.3),
            (Stat::Sh, 0.1),
            (Stat::SoT, -0.1),
            (Stat::CrdY, -0.3),
            (Stat::CrdR, -0.5),
            (Stat::Err, -0.7),
            (Stat::Dis, -0.9),
            (Stat::Fls, 0.0),
        ]
        .into_iter()
        .map(|(stat, r)| CorrelationEntry { stat, r })
        .collect();

        let ranked = ranked_for_display(&entries);
        assert_eq!(ranked.len(), 10);
        assert_eq!(ranked[0].stat, Stat::Gls);
        assert_eq!(ranked[4].stat, Stat::Sh);
        assert_eq!(ranked[5].stat, Stat::SoT);
        assert_eq!(ranked[9].stat, Stat::Dis);
    }
}
