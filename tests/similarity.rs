use std::collections::HashMap;

use scout_terminal::record::{parse_positions, PlayerKey, PlayerRecord, Stat};
use scout_terminal::selection::SelectionState;
use scout_terminal::similarity::{self, SIMILAR_LIST_LEN};

fn player(name: &str, market: f64, stats: &[(Stat, f64)]) -> PlayerRecord {
    PlayerRecord {
        key: PlayerKey::new(name, "Club"),
        comp: "eng Premier League".to_string(),
        positions: parse_positions("FW"),
        x: 0.0,
        y: 0.0,
        market_value_eur: Some(market),
        stats: stats.iter().copied().collect::<HashMap<_, _>>(),
    }
}

#[test]
fn identical_profile_ranks_as_most_similar() {
    let reference = player("Ref", 10.0e6, &[(Stat::Gls, 0.5), (Stat::Ast, 0.2)]);
    let twin = player("Twin", 1.0e6, &[(Stat::Gls, 0.5), (Stat::Ast, 0.2)]);
    let other = player("Other", 2.0e6, &[(Stat::Gls, 0.1), (Stat::Ast, 0.9)]);
    let pool = [&twin, &other];

    let out = similarity::similar_players(&reference, &pool, &SelectionState::new());
    let twin_entry = out.iter().find(|(r, _)| r.key.player == "Twin").unwrap();
    assert!((twin_entry.1 - 1.0).abs() < 1e-12);
    let other_entry = out.iter().find(|(r, _)| r.key.player == "Other").unwrap();
    assert!(other_entry.1 < twin_entry.1);
}

#[test]
fn zero_profile_reference_scores_zero_everywhere() {
    let reference = player("Ref", 10.0e6, &[(Stat::Gls, 0.0), (Stat::Ast, 0.0)]);
    let candidate = player("Cand", 1.0e6, &[(Stat::Gls, 0.4), (Stat::Ast, 0.1)]);
    let pool = [&candidate];
    let out = similarity::similar_players(&reference, &pool, &SelectionState::new());
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].1, 0.0);
}

#[test]
fn feature_set_follows_reference_availability() {
    // Reference has no Ast; candidates' Ast values must not matter.
    let reference = player("Ref", 10.0e6, &[(Stat::Gls, 0.5)]);
    let a = player("A", 1.0e6, &[(Stat::Gls, 0.5), (Stat::Ast, 9.9)]);
    let b = player("B", 1.0e6, &[(Stat::Gls, 0.5)]);
    let pool = [&a, &b];
    let out = similarity::similar_players(&reference, &pool, &SelectionState::new());
    assert!((out[0].1 - 1.0).abs() < 1e-12);
    assert!((out[1].1 - 1.0).abs() < 1e-12);
}

#[test]
fn selected_players_are_excluded_from_candidates() {
    let reference = player("Ref", 10.0e6, &[(Stat::Gls, 0.5)]);
    let a = player("A", 1.0e6, &[(Stat::Gls, 0.5)]);
    let b = player("B", 1.0e6, &[(Stat::Gls, 0.5)]);
    let pool = [&reference, &a, &b];

    let mut selection = SelectionState::new();
    selection.select(reference.key.clone());
    selection.select(a.key.clone());

    let out = similarity::similar_players(&reference, &pool, &selection);
    let names: Vec<&str> = out.iter().map(|(r, _)| r.key.player.as_str()).collect();
    assert_eq!(names, vec!["B"]);
}

#[test]
fn top_ten_is_resorted_by_market_value() {
    let reference = player("Ref", 50.0e6, &[(Stat::Gls, 1.0), (Stat::Ast, 1.0)]);
    let mut records = Vec::new();
    for i in 0..15 {
        // Higher i = closer to the reference profile but cheaper.
        let skew = 1.0 + (15.0 - i as f64) / 10.0;
        records.push(player(
            &format!("P{i:02}"),
            (20.0 - i as f64) * 1.0e6,
            &[(Stat::Gls, 1.0), (Stat::Ast, skew)],
        ));
    }
    let pool: Vec<&PlayerRecord> = records.iter().collect();
    let out = similarity::similar_players(&reference, &pool, &SelectionState::new());

    assert_eq!(out.len(), SIMILAR_LIST_LEN);
    // The five least similar candidates (P00..P04) never make the cut.
    assert!(out.iter().all(|(r, _)| r.key.player.as_str() >= "P05"));
    // Display order is market value descending, not similarity descending.
    for pair in out.windows(2) {
        assert!(pair[0].0.market_value_eur >= pair[1].0.market_value_eur);
    }
    assert_eq!(out[0].0.key.player, "P05");
}

#[test]
fn fallback_list_is_top_ten_by_market_value() {
    let records: Vec<PlayerRecord> = (0..15)
        .map(|i| player(&format!("P{i:02}"), i as f64 * 1.0e6, &[]))
        .collect();
    let pool: Vec<&PlayerRecord> = records.iter().collect();
    let out = similarity::top_by_market_value(&pool);
    assert_eq!(out.len(), SIMILAR_LIST_LEN);
    assert_eq!(out[0].key.player, "P14");
    assert_eq!(out.last().unwrap().key.player, "P05");
}
