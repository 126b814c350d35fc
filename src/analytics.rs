use std::collections::HashMap;

use crate::record::{PlayerRecord, Stat};

/// Comparison stat set for outfield players, in display order.
pub const OUTFIELD_COMPARISON: [Stat; 17] = [
    Stat::Mp,
    Stat::Min,
    Stat::Gls,
    Stat::SoT,
    Stat::Ast,
    Stat::Xg,
    Stat::Xag,
    Stat::CrdY,
    Stat::CrdR,
    Stat::TklW,
    Stat::Int,
    Stat::Clr,
    Stat::Err,
    Stat::Touches,
    Stat::Dis,
    Stat::Fls,
    Stat::Recov,
];

/// Comparison stat set for goalkeepers.
pub const KEEPER_COMPARISON: [Stat; 17] = [
    Stat::Mp,
    Stat::Min,
    Stat::Gls,
    Stat::Ast,
    Stat::Xg,
    Stat::Xag,
    Stat::CrdY,
    Stat::CrdR,
    Stat::Cs,
    Stat::Saves,
    Stat::Ga,
    Stat::Pka,
    Stat::Pksv,
    Stat::Err,
    Stat::Touches,
    Stat::Dis,
    Stat::Fls,
];

pub const OUTFIELD_RADAR: [Stat; 8] = [
    Stat::Xg,
    Stat::Xag,
    Stat::PrgC,
    Stat::PrgP,
    Stat::PrgR,
    Stat::TklW,
    Stat::Int,
    Stat::Recov,
];

pub const KEEPER_RADAR: [Stat; 8] = [
    Stat::Pksv,
    Stat::Cs,
    Stat::SavePct,
    Stat::Xag,
    Stat::Touches,
    Stat::PrgP,
    Stat::Ga,
    Stat::Err,
];

/// Comparing goalkeepers and outfield players on one stat set makes no
/// sense, so both panels switch sets on the GK role token.
pub fn comparison_stats(player: &PlayerRecord) -> &'static [Stat] {
    if player.has_position(crate::record::Position::Gk) {
        &KEEPER_COMPARISON
    } else {
        &OUTFIELD_COMPARISON
    }
}

pub fn radar_stats(player: &PlayerRecord) -> &'static [Stat] {
    if player.has_position(crate::record::Position::Gk) {
        &KEEPER_RADAR
    } else {
        &OUTFIELD_RADAR
    }
}

/// Season total for one stat. Participation counters come through as-is;
/// per-90 rates are scaled by minutes played and rounded up, counts being
/// whole events. Missing inputs yield 0.
pub fn raw_stat(player: &PlayerRecord, stat: Stat) -> f64 {
    if !stat.is_per90() {
        return player.stat(stat).unwrap_or(0.0);
    }
    match (player.stat(stat), player.stat(Stat::Min)) {
        (Some(rate), Some(min)) => (rate * (min / 90.0)).ceil(),
        _ => 0.0,
    }
}

/// Season totals for a stat list, in the list's order.
pub fn raw_stats(player: &PlayerRecord, stats: &[Stat]) -> Vec<(Stat, f64)> {
    stats.iter().map(|&s| (s, raw_stat(player, s))).collect()
}

/// Per-stat mean and `[min, max]` extent of raw values across a subset.
#[derive(Debug, Clone, Default)]
pub struct GroupStats {
    pub means: HashMap<Stat, f64>,
    pub domains: HashMap<Stat, (f64, f64)>,
}

impl GroupStats {
    pub fn mean(&self, stat: Stat) -> f64 {
        self.means.get(&stat).copied().unwrap_or(0.0)
    }

    pub fn domain(&self, stat: Stat) -> (f64, f64) {
        self.domains.get(&stat).copied().unwrap_or((0.0, 0.0))
    }
}

/// Cohort raw value: participation counters as-is, rates scaled by minutes.
/// Unlike a player's own displayed totals, cohort values are not rounded.
fn group_raw_value(record: &PlayerRecord, stat: Stat) -> Option<f64> {
    if !stat.is_per90() {
        return record.stat(stat);
    }
    let rate = record.stat(stat)?;
    let min = record.stat(Stat::Min)?;
    Some(rate * (min / 90.0))
}

/// Mean and extent per stat over `subset`, skipping records with missing
/// inputs. A stat with zero valid values gets mean 0 and domain `[0, 0]`.
pub fn group_stats(subset: &[&PlayerRecord], stats: &[Stat]) -> GroupStats {
    let mut out = GroupStats::default();
    for &stat in stats {
        let values: Vec<f64> = subset
            .iter()
            .filter_map(|r| group_raw_value(r, stat))
            .collect();
        if values.is_empty() {
            out.means.insert(stat, 0.0);
            out.domains.insert(stat, (0.0, 0.0));
            continue;
        }
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        out.means.insert(stat, mean);
        out.domains.insert(stat, (lo, hi));
    }
    out
}

/// Subset records sharing at least one role token with `player` (the cohort
/// percentiles are computed against). Includes `player` itself when present.
pub fn positional_cohort<'a>(
    subset: &[&'a PlayerRecord],
    player: &PlayerRecord,
) -> Vec<&'a PlayerRecord> {
    subset
        .iter()
        .copied()
        .filter(|r| r.shares_position(player))
        .collect()
}

/// Percentile rank of the player's value for `stat` within `cohort`, in
/// `[0, 100]`. Ties count fully: the numerator is the number of cohort
/// values less than or equal to the player's. Missing value or empty cohort
/// yields exactly 0.
pub fn percentile(player: &PlayerRecord, stat: Stat, cohort: &[&PlayerRecord]) -> f64 {
    let Some(value) = player.stat(stat) else {
        return 0.0;
    };
    let mut values: Vec<f64> = cohort.iter().filter_map(|r| r.stat(stat)).collect();
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(f64::total_cmp);
    let rank = values.partition_point(|v| *v <= value);
    rank as f64 / values.len() as f64 * 100.0
}

/// Percentiles for a whole stat list against the player's positional cohort.
pub fn percentiles(
    player: &PlayerRecord,
    stats: &[Stat],
    cohort: &[&PlayerRecord],
) -> Vec<(Stat, f64)> {
    stats
        .iter()
        .map(|&s| (s, percentile(player, s, cohort)))
        .collect()
}

/// Normalization domain for a paired (group, player) comparison: the nominal
/// subset extent stretched to cover both values, widened by one unit per
/// side when it would otherwise be a point (lower bound clamped at zero).
pub fn comparison_domain(
    nominal: (f64, f64),
    group_value: f64,
    player_value: f64,
) -> (f64, f64) {
    let mut lo = nominal.0.min(group_value).min(player_value);
    let mut hi = nominal.1.max(group_value).max(player_value);
    if hi - lo == 0.0 {
        lo = (lo - 1.0).max(0.0);
        hi += 1.0;
    }
    (lo, hi)
}

/// Map `value` into `[0, 1]` over `domain`. Callers widen the domain first,
/// so the width is never zero.
pub fn normalize(value: f64, domain: (f64, f64)) -> f64 {
    (value - domain.0) / (domain.1 - domain.0)
}

/// Market-value five-number summary for one league of the filtered subset.
#[derive(Debug, Clone)]
pub struct LeagueBoxplot {
    pub league: String,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Per-league market-value boxplot stats, leagues in first-seen order.
/// Records without a market value are skipped; leagues with none are dropped.
pub fn league_boxplots(subset: &[&PlayerRecord]) -> Vec<LeagueBoxplot> {
    let mut grouped: Vec<(String, Vec<f64>)> = Vec::new();
    for record in subset {
        let Some(value) = record.market_value_eur else {
            continue;
        };
        match grouped.iter_mut().find(|(league, _)| league == &record.comp) {
            Some((_, values)) => values.push(value),
            None => grouped.push((record.comp.clone(), vec![value])),
        }
    }
    grouped
        .into_iter()
        .map(|(league, mut values)| {
            values.sort_by(f64::total_cmp);
            LeagueBoxplot {
                league,
                min: values[0],
                q1: quantile_sorted(&values, 0.25),
                median: quantile_sorted(&values, 0.5),
                q3: quantile_sorted(&values, 0.75),
                max: values[values.len() - 1],
            }
        })
        .collect()
}

/// Linearly interpolated quantile over ascending `values` (non-empty).
fn quantile_sorted(values: &[f64], p: f64) -> f64 {
    let n = values.len();
    if n == 1 {
        return values[0];
    }
    let h = (n - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    values[lo] + (values[hi] - values[lo]) * (h - lo as f64)
}
