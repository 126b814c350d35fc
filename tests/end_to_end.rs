use std::collections::HashMap;

use scout_terminal::record::{
    parse_positions, PlayerKey, PlayerRecord, RecordStore, Stat,
};
use scout_terminal::state::{AppState, SimilarPanel};

fn player(name: &str, comp: &str, pos: &str, min: f64, market: f64) -> PlayerRecord {
    PlayerRecord {
        key: PlayerKey::new(name, "Club"),
        comp: comp.to_string(),
        positions: parse_positions(pos),
        x: 0.0,
        y: 0.0,
        market_value_eur: Some(market),
        stats: HashMap::from([(Stat::Min, min), (Stat::Gls, 0.3)]),
    }
}

/// Five players across two leagues, mixed minutes.
fn session() -> AppState {
    AppState::new(RecordStore::new(vec![
        player("Alpha", "League A", "FW", 900.0, 40.0e6),
        player("Beta", "League A", "MF", 300.0, 10.0e6),
        player("Gamma", "League A", "DF", 1200.0, 25.0e6),
        player("Delta", "League B", "GK", 2500.0, 5.0e6),
        player("Epsilon", "League B", "MF", 1500.0, 60.0e6),
    ]))
}

fn filtered_names(state: &AppState) -> Vec<String> {
    state
        .filtered_records()
        .iter()
        .map(|r| r.key.player.clone())
        .collect()
}

#[test]
fn filter_then_select_scenario() {
    let mut state = session();
    assert_eq!(state.filtered.len(), 5);

    // League A only.
    state.toggle_league("League A");
    assert_eq!(filtered_names(&state), vec!["Alpha", "Beta", "Gamma"]);

    // Minutes >= 500 narrows within league A.
    state.toggle_minutes_filter();
    assert_eq!(filtered_names(&state), vec!["Alpha", "Gamma"]);

    // Select one player.
    state.select_player(PlayerKey::new("Alpha", "Club"));
    assert_eq!(state.selection.len(), 1);
    assert_eq!(
        state.current_player().unwrap().key.player,
        "Alpha".to_string()
    );

    // Three more distinct selections keep the cap at 3, oldest evicted.
    state.select_player(PlayerKey::new("Gamma", "Club"));
    state.select_player(PlayerKey::new("Delta", "Club"));
    state.select_player(PlayerKey::new("Epsilon", "Club"));
    assert_eq!(state.selection.len(), 3);
    assert!(!state.selection.is_selected(&PlayerKey::new("Alpha", "Club")));
    assert_eq!(
        state.current_player().unwrap().key.player,
        "Epsilon".to_string()
    );
}

#[test]
fn minutes_toggle_clears_selection() {
    let mut state = session();
    state.select_player(PlayerKey::new("Beta", "Club"));
    assert_eq!(state.selection.len(), 1);

    state.toggle_minutes_filter();
    assert!(state.selection.is_empty());
    assert!(state.current_player().is_none());

    // Other criteria changes keep the selection.
    state.select_player(PlayerKey::new("Alpha", "Club"));
    state.toggle_league("League A");
    state.nudge_market_max(false);
    assert_eq!(state.selection.len(), 1);
}

#[test]
fn league_toggle_roundtrips() {
    let mut state = session();
    state.toggle_league("League B");
    assert_eq!(filtered_names(&state), vec!["Delta", "Epsilon"]);
    state.toggle_league("League B");
    assert_eq!(state.filtered.len(), 5);
}

#[test]
fn market_nudges_preserve_range_order() {
    let mut state = session();
    for _ in 0..100 {
        state.nudge_market_min(true);
    }
    assert!(state.criteria.market_min <= state.criteria.market_max);
    // Min walked all the way up to max; only the most expensive player stays.
    assert_eq!(filtered_names(&state), vec!["Epsilon"]);

    for _ in 0..100 {
        state.nudge_market_min(false);
    }
    assert_eq!(state.filtered.len(), 5);
}

#[test]
fn search_needs_two_characters_and_is_case_insensitive() {
    let mut state = session();
    state.start_search();
    state.push_search_char('a');
    assert!(state.search_matches().is_empty());
    state.push_search_char('L');
    let names: Vec<&str> = state
        .search_matches()
        .iter()
        .map(|r| r.key.player.as_str())
        .collect();
    // "al" hits Alpha only; matching ignores case.
    assert_eq!(names, vec!["Alpha"]);

    // Search only sees the filtered subset.
    state.cancel_search();
    state.toggle_league("League B");
    state.start_search();
    state.push_search_char('a');
    state.push_search_char('l');
    assert!(state.search_matches().is_empty());
}

#[test]
fn accept_search_selects_and_switches_to_player_screen() {
    let mut state = session();
    state.start_search();
    state.push_search_char('e');
    state.push_search_char('p');
    state.accept_search();
    assert!(!state.search_active);
    assert_eq!(
        state.current_player().unwrap().key.player,
        "Epsilon".to_string()
    );
}

#[test]
fn similar_panel_falls_back_without_selection() {
    let state = session();
    match state.similar_panel() {
        SimilarPanel::MostValuable(list) => {
            assert_eq!(list[0].key.player, "Epsilon");
            assert_eq!(list.len(), 5);
        }
        SimilarPanel::SimilarTo { .. } => panic!("expected the market-value fallback"),
    }
}

#[test]
fn similar_panel_uses_current_player() {
    let mut state = session();
    state.select_player(PlayerKey::new("Alpha", "Club"));
    match state.similar_panel() {
        SimilarPanel::SimilarTo { reference, entries } => {
            assert_eq!(reference.key.player, "Alpha");
            // The selected player is excluded from his own candidate list.
            assert!(entries.iter().all(|(r, _)| r.key.player != "Alpha"));
        }
        SimilarPanel::MostValuable(_) => panic!("expected a similarity list"),
    }
}

#[test]
fn empty_subset_keeps_every_view_alive() {
    let mut state = session();
    state.set_market_range(1.0, 2.0);
    assert!(state.filtered.is_empty());
    assert!(state.filtered_records().is_empty());
    match state.similar_panel() {
        SimilarPanel::MostValuable(list) => assert!(list.is_empty()),
        SimilarPanel::SimilarTo { .. } => panic!("no selection, expected fallback"),
    }
    assert!(state.search_matches().is_empty());
}
