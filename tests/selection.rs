use scout_terminal::record::PlayerKey;
use scout_terminal::selection::{SelectionState, MAX_SELECTED};

fn key(name: &str) -> PlayerKey {
    PlayerKey::new(name, "Club")
}

#[test]
fn select_sets_current_and_assigns_slots() {
    let mut sel = SelectionState::new();
    assert!(sel.select(key("A")).is_none());
    assert!(sel.select(key("B")).is_none());
    assert_eq!(sel.current(), Some(&key("B")));
    assert_eq!(sel.color_slot(&key("A")), Some(0));
    assert_eq!(sel.color_slot(&key("B")), Some(1));
}

#[test]
fn fourth_selection_evicts_the_oldest() {
    let mut sel = SelectionState::new();
    sel.select(key("A"));
    sel.select(key("B"));
    sel.select(key("C"));
    let evicted = sel.select(key("D"));
    assert_eq!(evicted, Some(key("A")));
    assert_eq!(sel.len(), MAX_SELECTED);
    assert_eq!(sel.selected(), &[key("B"), key("C"), key("D")]);
    // The just-inserted player is never the one evicted.
    assert_eq!(sel.current(), Some(&key("D")));
}

#[test]
fn reselect_does_not_refresh_queue_position() {
    let mut sel = SelectionState::new();
    sel.select(key("A"));
    sel.select(key("B"));
    sel.select(key("C"));
    // Re-clicking A makes it current but keeps it oldest.
    sel.select(key("A"));
    assert_eq!(sel.current(), Some(&key("A")));
    assert_eq!(sel.selected(), &[key("A"), key("B"), key("C")]);

    let evicted = sel.select(key("D"));
    assert_eq!(evicted, Some(key("A")));
    // Current pointed at the evicted member, so it moves to the first remaining.
    assert_eq!(sel.current(), Some(&key("B")));
}

#[test]
fn deselect_reassigns_current() {
    let mut sel = SelectionState::new();
    sel.select(key("A"));
    sel.select(key("B"));
    sel.set_current(&key("A"));

    assert!(sel.deselect(&key("A")));
    assert_eq!(sel.current(), Some(&key("B")));

    assert!(sel.deselect(&key("B")));
    assert!(sel.current().is_none());
    assert!(sel.is_empty());

    assert!(!sel.deselect(&key("B")));
}

#[test]
fn deselect_non_current_keeps_current() {
    let mut sel = SelectionState::new();
    sel.select(key("A"));
    sel.select(key("B"));
    assert!(sel.deselect(&key("A")));
    assert_eq!(sel.current(), Some(&key("B")));
}

#[test]
fn set_current_requires_membership() {
    let mut sel = SelectionState::new();
    sel.select(key("A"));
    assert!(!sel.set_current(&key("Z")));
    assert_eq!(sel.current(), Some(&key("A")));
}

#[test]
fn cycle_current_wraps_in_insertion_order() {
    let mut sel = SelectionState::new();
    sel.select(key("A"));
    sel.select(key("B"));
    sel.select(key("C"));
    assert_eq!(sel.current(), Some(&key("C")));
    sel.cycle_current();
    assert_eq!(sel.current(), Some(&key("A")));
    sel.cycle_current();
    assert_eq!(sel.current(), Some(&key("B")));
}

#[test]
fn clear_empties_everything() {
    let mut sel = SelectionState::new();
    sel.select(key("A"));
    sel.select(key("B"));
    sel.clear();
    assert!(sel.is_empty());
    assert!(sel.current().is_none());
}
