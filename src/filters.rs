use std::collections::HashSet;

use crate::record::{PlayerRecord, Position, RecordStore, Stat};
use crate::selection::SelectionState;

/// Minutes-played threshold applied when the minutes filter is enabled.
pub const MIN_MINUTES: f64 = 500.0;

/// Brush rectangle in chart (embedding) coordinate space.
///
/// Corners are normalized on construction so `x0 <= x1` and `y0 <= y1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushRect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl BrushRect {
    pub fn new(ax: f64, ay: f64, bx: f64, by: f64) -> Self {
        Self {
            x0: ax.min(bx),
            y0: ay.min(by),
            x1: ax.max(bx),
            y1: ay.max(by),
        }
    }

    /// Inclusive point-in-rectangle test.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            x0: self.x0 + dx,
            y0: self.y0 + dy,
            x1: self.x1 + dx,
            y1: self.y1 + dy,
        }
    }

    /// Grow (or shrink) around the center; width/height never collapse below zero.
    pub fn resized(&self, dw: f64, dh: f64) -> Self {
        let half_w = ((self.x1 - self.x0) / 2.0 + dw / 2.0).max(0.0);
        let half_h = ((self.y1 - self.y0) / 2.0 + dh / 2.0).max(0.0);
        let cx = (self.x0 + self.x1) / 2.0;
        let cy = (self.y0 + self.y1) / 2.0;
        Self::new(cx - half_w, cy - half_h, cx + half_w, cy + half_h)
    }
}

/// Session-scoped filter criteria. Empty league/position sets match everything.
#[derive(Debug, Clone)]
pub struct FilterCriteria {
    pub minutes_filter: bool,
    pub leagues: HashSet<String>,
    pub positions: HashSet<Position>,
    pub market_min: f64,
    pub market_max: f64,
    /// Visual-emphasis brush; never narrows the analytics subset.
    pub brush: Option<BrushRect>,
}

impl FilterCriteria {
    /// Defaults for a freshly loaded store: nothing toggled, market range at
    /// the full extent of the data.
    pub fn for_store(store: &RecordStore) -> Self {
        let (market_min, market_max) = store.market_extent();
        Self {
            minutes_filter: false,
            leagues: HashSet::new(),
            positions: HashSet::new(),
            market_min,
            market_max,
            brush: None,
        }
    }

    /// Conjunction of all active predicates, applied in a fixed order:
    /// minutes threshold, league set, position tokens, market range.
    pub fn matches(&self, record: &PlayerRecord) -> bool {
        if self.minutes_filter
            && !record.stat(Stat::Min).is_some_and(|m| m >= MIN_MINUTES)
        {
            return false;
        }
        if !self.leagues.is_empty() && !self.leagues.contains(&record.comp) {
            return false;
        }
        if !self.positions.is_empty()
            && !record.positions.iter().any(|p| self.positions.contains(p))
        {
            return false;
        }
        match record.market_value_eur {
            Some(v) => v >= self.market_min && v <= self.market_max,
            None => false,
        }
    }
}

/// Indices of the store records satisfying every active predicate.
pub fn filtered_indices(store: &RecordStore, criteria: &FilterCriteria) -> Vec<usize> {
    store
        .iter()
        .enumerate()
        .filter(|(_, r)| criteria.matches(r))
        .map(|(idx, _)| idx)
        .collect()
}

/// Display weight for a record: inside the brush (or no brush at all), or
/// selected. Selected players stay emphasized regardless of the brush.
pub fn is_emphasized(
    record: &PlayerRecord,
    brush: Option<&BrushRect>,
    selection: &SelectionState,
) -> bool {
    if selection.is_selected(&record.key) {
        return true;
    }
    match brush {
        Some(rect) => rect.contains(record.x, record.y),
        None => true,
    }
}
