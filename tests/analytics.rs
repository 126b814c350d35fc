use std::collections::HashMap;

use scout_terminal::analytics::{
    self, comparison_stats, radar_stats, KEEPER_COMPARISON, OUTFIELD_COMPARISON,
};
use scout_terminal::record::{parse_positions, PlayerKey, PlayerRecord, Stat};

fn player(name: &str, pos: &str, stats: &[(Stat, f64)]) -> PlayerRecord {
    PlayerRecord {
        key: PlayerKey::new(name, "Club"),
        comp: "eng Premier League".to_string(),
        positions: parse_positions(pos),
        x: 0.0,
        y: 0.0,
        market_value_eur: Some(1.0e6),
        stats: stats.iter().copied().collect::<HashMap<_, _>>(),
    }
}

#[test]
fn raw_stats_reconstruct_season_totals() {
    let p = player(
        "Alpha",
        "FW",
        &[
            (Stat::Mp, 12.0),
            (Stat::Min, 900.0),
            (Stat::Gls, 0.3),
            (Stat::Ast, 0.21),
        ],
    );
    let totals: HashMap<Stat, f64> = analytics::raw_stats(
        &p,
        &[Stat::Mp, Stat::Min, Stat::Gls, Stat::Ast, Stat::Touches],
    )
    .into_iter()
    .collect();

    // MP and Min pass through unscaled; rates become ceil(rate * Min/90).
    assert_eq!(totals[&Stat::Mp], 12.0);
    assert_eq!(totals[&Stat::Min], 900.0);
    assert_eq!(totals[&Stat::Gls], 3.0);
    assert_eq!(totals[&Stat::Ast], 3.0);
    assert_eq!(totals[&Stat::Touches], 0.0);
}

#[test]
fn group_stats_mean_and_extent() {
    let a = player("A", "FW", &[(Stat::Min, 900.0), (Stat::Gls, 0.3)]);
    let b = player("B", "FW", &[(Stat::Min, 1800.0), (Stat::Gls, 0.6)]);
    let missing = player("C", "FW", &[(Stat::Min, 900.0)]);
    let subset = [&a, &b, &missing];

    let group = analytics::group_stats(&subset, &[Stat::Gls]);
    // Cohort totals are rate * Min/90 without rounding: 3.0 and 12.0.
    assert!((group.mean(Stat::Gls) - 7.5).abs() < 1e-9);
    assert_eq!(group.domain(Stat::Gls), (3.0, 12.0));
}

#[test]
fn group_stats_empty_subset_degrades_to_zero() {
    let group = analytics::group_stats(&[], &[Stat::Gls, Stat::Min]);
    assert_eq!(group.mean(Stat::Gls), 0.0);
    assert_eq!(group.domain(Stat::Gls), (0.0, 0.0));
    assert_eq!(group.domain(Stat::Min), (0.0, 0.0));
}

#[test]
fn positional_cohort_shares_at_least_one_token() {
    let fw = player("A", "FW", &[]);
    let dual = player("B", "MF, FW", &[]);
    let df = player("C", "DF", &[]);
    let gk = player("D", "GK", &[]);
    let subset = [&fw, &dual, &df, &gk];

    let cohort = analytics::positional_cohort(&subset, &fw);
    let names: Vec<&str> = cohort.iter().map(|r| r.key.player.as_str()).collect();
    assert_eq!(names, vec!["A", "B"]);
}

#[test]
fn percentile_is_monotone_and_bounded() {
    let players: Vec<PlayerRecord> = (0..10)
        .map(|i| {
            player(
                &format!("P{i}"),
                "MF",
                &[(Stat::Xg, i as f64 / 10.0)],
            )
        })
        .collect();
    let cohort: Vec<&PlayerRecord> = players.iter().collect();

    let mut last = -1.0;
    for p in &players {
        let pct = analytics::percentile(p, Stat::Xg, &cohort);
        assert!((0.0..=100.0).contains(&pct));
        // Higher value never ranks below a lower one.
        assert!(pct >= last);
        last = pct;
    }
    // The maximum lands exactly at 100.
    assert_eq!(last, 100.0);
}

#[test]
fn percentile_missing_value_or_empty_cohort_is_zero() {
    let p = player("A", "MF", &[]);
    let q = player("B", "MF", &[(Stat::Xg, 0.4)]);
    assert_eq!(analytics::percentile(&p, Stat::Xg, &[&q]), 0.0);
    assert_eq!(analytics::percentile(&q, Stat::Xg, &[]), 0.0);
}

#[test]
fn normalization_widens_degenerate_domains() {
    // group == player == every subset value: no division error, both in [0,1].
    let domain = analytics::comparison_domain((5.0, 5.0), 5.0, 5.0);
    let group = analytics::normalize(5.0, domain);
    let player = analytics::normalize(5.0, domain);
    assert!(group.is_finite() && player.is_finite());
    assert!((0.0..=1.0).contains(&group));
    assert!((0.0..=1.0).contains(&player));
}

#[test]
fn normalization_covers_outlying_player_values() {
    // A player value outside the nominal subset extent must still map inside.
    let domain = analytics::comparison_domain((0.0, 10.0), 4.0, 25.0);
    assert_eq!(domain, (0.0, 25.0));
    assert_eq!(analytics::normalize(25.0, domain), 1.0);
}

#[test]
fn stat_sets_switch_on_goalkeeper_token() {
    let gk = player("A", "GK", &[]);
    let fw = player("B", "FW", &[]);
    assert_eq!(comparison_stats(&gk), &KEEPER_COMPARISON);
    assert_eq!(comparison_stats(&fw), &OUTFIELD_COMPARISON);
    assert!(radar_stats(&gk).contains(&Stat::Saves) || radar_stats(&gk).contains(&Stat::SavePct));
    assert!(radar_stats(&fw).contains(&Stat::Xg));
}

#[test]
fn league_boxplots_group_by_league() {
    let mut records = Vec::new();
    for (i, v) in [1.0, 2.0, 3.0, 4.0].iter().enumerate() {
        let mut p = player(&format!("P{i}"), "MF", &[]);
        p.market_value_eur = Some(*v);
        records.push(p);
    }
    let mut other = player("Q", "MF", &[]);
    other.comp = "it Serie A".to_string();
    other.market_value_eur = Some(9.0);
    records.push(other);

    let subset: Vec<&PlayerRecord> = records.iter().collect();
    let plots = analytics::league_boxplots(&subset);
    assert_eq!(plots.len(), 2);
    let premier = &plots[0];
    assert_eq!(premier.league, "eng Premier League");
    assert_eq!(premier.min, 1.0);
    assert_eq!(premier.median, 2.5);
    assert_eq!(premier.max, 4.0);
    let serie_a = &plots[1];
    assert_eq!(serie_a.median, 9.0);
}
