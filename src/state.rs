use std::collections::VecDeque;

use crate::filters::{self, BrushRect, FilterCriteria};
use crate::record::{PlayerKey, PlayerRecord, Position, RecordStore, ALL_POSITIONS};
use crate::selection::SelectionState;
use crate::similarity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Explore,
    Player,
    Correlation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExploreFocus {
    Leagues,
    Positions,
    Players,
    Scatter,
    Similar,
}

/// What the similarity panel shows: with a resolvable current player, his
/// ten nearest per-90 profiles; otherwise the subset's most valuable ten.
pub enum SimilarPanel<'a> {
    MostValuable(Vec<&'a PlayerRecord>),
    SimilarTo {
        reference: &'a PlayerRecord,
        entries: Vec<(&'a PlayerRecord, f64)>,
    },
}

/// Status of the last analysis export, kept around briefly for the footer.
#[derive(Debug, Clone, Default)]
pub struct ExportState {
    pub done: bool,
    pub path: Option<String>,
    pub message: String,
    pub last_updated: Option<std::time::Instant>,
}

impl ExportState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_if_done_for(&mut self, now: std::time::Instant, keep_secs: u64) {
        if !self.done {
            return;
        }
        let Some(last) = self.last_updated else {
            return;
        };
        if now.duration_since(last).as_secs() >= keep_secs {
            *self = Self::new();
        }
    }
}

/// The one session object: immutable store, mutable criteria and selection,
/// and every derived value the panels read. All mutation goes through the
/// handler methods below, each of which recomputes the filtered subset
/// synchronously before returning.
#[derive(Debug)]
pub struct AppState {
    pub store: RecordStore,
    pub criteria: FilterCriteria,
    /// Indices into the store satisfying every active filter; recomputed
    /// after each criteria mutation, never patched incrementally.
    pub filtered: Vec<usize>,
    pub selection: SelectionState,
    pub leagues: Vec<String>,
    pub screen: Screen,
    pub focus: ExploreFocus,
    pub league_cursor: usize,
    pub position_cursor: usize,
    pub player_cursor: usize,
    pub similar_cursor: usize,
    pub search_active: bool,
    pub search_query: String,
    pub search_cursor: usize,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    pub export: ExportState,
}

impl AppState {
    pub fn new(store: RecordStore) -> Self {
        let criteria = FilterCriteria::for_store(&store);
        let filtered = filters::filtered_indices(&store, &criteria);
        let leagues = store.leagues();
        Self {
            store,
            criteria,
            filtered,
            selection: SelectionState::new(),
            leagues,
            screen: Screen::Explore,
            focus: ExploreFocus::Players,
            league_cursor: 0,
            position_cursor: 0,
            player_cursor: 0,
            similar_cursor: 0,
            search_active: false,
            search_query: String::new(),
            search_cursor: 0,
            logs: VecDeque::with_capacity(200),
            help_overlay: false,
            export: ExportState::new(),
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn maybe_clear_export(&mut self, now: std::time::Instant) {
        self.export.clear_if_done_for(now, 8);
    }

    // ---- derived views -------------------------------------------------

    pub fn filtered_records(&self) -> Vec<&PlayerRecord> {
        self.filtered
            .iter()
            .filter_map(|&idx| self.store.get(idx))
            .collect()
    }

    /// Record the current-player key points at; a stale key (e.g. after a
    /// dataset re-scope) resolves to `None` and panels fall back to the
    /// aggregate display.
    pub fn current_player(&self) -> Option<&PlayerRecord> {
        self.selection
            .current()
            .and_then(|key| self.store.find(key))
    }

    /// Selected records in insertion order, skipping unresolvable keys.
    pub fn selected_records(&self) -> Vec<&PlayerRecord> {
        self.selection
            .selected()
            .iter()
            .filter_map(|key| self.store.find(key))
            .collect()
    }

    pub fn is_emphasized(&self, record: &PlayerRecord) -> bool {
        filters::is_emphasized(record, self.criteria.brush.as_ref(), &self.selection)
    }

    /// Search suggestions: case-insensitive substring match on the player
    /// name within the filtered subset, from two typed characters, first ten.
    pub fn search_matches(&self) -> Vec<&PlayerRecord> {
        let typed = self.search_query.trim().to_lowercase();
        if typed.len() < 2 {
            return Vec::new();
        }
        self.filtered_records()
            .into_iter()
            .filter(|r| r.key.player.to_lowercase().contains(&typed))
            .take(10)
            .collect()
    }

    pub fn similar_panel(&self) -> SimilarPanel<'_> {
        let pool = self.filtered_records();
        if !self.selection.is_empty()
            && let Some(reference) = self.current_player()
        {
            let entries = similarity::similar_players(reference, &pool, &self.selection);
            return SimilarPanel::SimilarTo { reference, entries };
        }
        SimilarPanel::MostValuable(similarity::top_by_market_value(&pool))
    }

    // ---- filter mutations ----------------------------------------------

    pub fn recompute_filtered(&mut self) {
        self.filtered = filters::filtered_indices(&self.store, &self.criteria);
        self.clamp_cursors();
    }

    /// The minutes toggle re-scopes which players are loaded, so the whole
    /// selection is dropped with it; other filters keep the selection.
    pub fn toggle_minutes_filter(&mut self) {
        self.criteria.minutes_filter = !self.criteria.minutes_filter;
        self.selection.clear();
        self.recompute_filtered();
        self.push_log(format!(
            "[INFO] Minutes filter {} (selection cleared)",
            if self.criteria.minutes_filter { "on" } else { "off" }
        ));
    }

    pub fn toggle_league(&mut self, league: &str) {
        if !self.criteria.leagues.remove(league) {
            self.criteria.leagues.insert(league.to_string());
        }
        self.recompute_filtered();
        self.push_log(format!(
            "[INFO] Leagues: {}",
            if self.criteria.leagues.is_empty() {
                "all".to_string()
            } else {
                self.criteria.leagues.len().to_string()
            }
        ));
    }

    pub fn toggle_league_at_cursor(&mut self) {
        if let Some(league) = self.leagues.get(self.league_cursor).cloned() {
            self.toggle_league(&league);
        }
    }

    pub fn toggle_position(&mut self, pos: Position) {
        if !self.criteria.positions.remove(&pos) {
            self.criteria.positions.insert(pos);
        }
        self.recompute_filtered();
        self.push_log(format!(
            "[INFO] Position filter {} {}",
            pos.label(),
            if self.criteria.positions.contains(&pos) { "on" } else { "off" }
        ));
    }

    pub fn toggle_position_at_cursor(&mut self) {
        self.toggle_position(ALL_POSITIONS[self.position_cursor % ALL_POSITIONS.len()]);
    }

    pub fn set_market_range(&mut self, min: f64, max: f64) {
        self.criteria.market_min = min.min(max);
        self.criteria.market_max = min.max(max);
        self.recompute_filtered();
    }

    /// One keypress worth of market-range movement.
    pub fn market_step(&self) -> f64 {
        let (lo, hi) = self.store.market_extent();
        ((hi - lo) / 50.0).max(1.0)
    }

    pub fn nudge_market_min(&mut self, up: bool) {
        let step = self.market_step();
        let (lo, _) = self.store.market_extent();
        let next = if up {
            (self.criteria.market_min + step).min(self.criteria.market_max)
        } else {
            (self.criteria.market_min - step).max(lo)
        };
        self.set_market_range(next, self.criteria.market_max);
    }

    pub fn nudge_market_max(&mut self, up: bool) {
        let step = self.market_step();
        let (_, hi) = self.store.market_extent();
        let next = if up {
            (self.criteria.market_max + step).min(hi)
        } else {
            (self.criteria.market_max - step).max(self.criteria.market_min)
        };
        self.set_market_range(self.criteria.market_min, next);
    }

    // ---- brush ---------------------------------------------------------

    fn brush_step(&self) -> (f64, f64) {
        let ((x0, x1), (y0, y1)) = self.store.embedding_extent();
        (((x1 - x0) / 40.0).max(0.05), ((y1 - y0) / 40.0).max(0.05))
    }

    /// Create a brush over the middle of the embedding if none exists.
    pub fn ensure_brush(&mut self) {
        if self.criteria.brush.is_some() {
            return;
        }
        let ((x0, x1), (y0, y1)) = self.store.embedding_extent();
        let (cx, cy) = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);
        let (hw, hh) = ((x1 - x0) / 4.0, (y1 - y0) / 4.0);
        self.criteria.brush = Some(BrushRect::new(cx - hw, cy - hh, cx + hw, cy + hh));
        self.push_log("[INFO] Brush on");
    }

    pub fn move_brush(&mut self, dx: i32, dy: i32) {
        let (sx, sy) = self.brush_step();
        if let Some(rect) = self.criteria.brush {
            self.criteria.brush = Some(rect.translated(dx as f64 * sx, dy as f64 * sy));
        }
    }

    pub fn resize_brush(&mut self, dw: i32, dh: i32) {
        let (sx, sy) = self.brush_step();
        if let Some(rect) = self.criteria.brush {
            self.criteria.brush = Some(rect.resized(dw as f64 * sx, dh as f64 * sy));
        }
    }

    pub fn clear_brush(&mut self) {
        if self.criteria.brush.take().is_some() {
            self.push_log("[INFO] Brush cleared");
        }
    }

    // ---- selection -----------------------------------------------------

    pub fn select_player(&mut self, key: PlayerKey) {
        let label = key.to_string();
        if let Some(evicted) = self.selection.select(key) {
            self.push_log(format!("[INFO] Selected {label}, dropped {evicted}"));
        } else {
            self.push_log(format!("[INFO] Selected {label}"));
        }
    }

    pub fn deselect_player(&mut self, key: &PlayerKey) {
        if self.selection.deselect(key) {
            self.push_log(format!("[INFO] Deselected {key}"));
        }
    }

    /// Select the player under the cursor, or deselect when already selected.
    pub fn toggle_select_at_cursor(&mut self) {
        let Some(key) = self
            .filtered
            .get(self.player_cursor)
            .and_then(|&idx| self.store.get(idx))
            .map(|r| r.key.clone())
        else {
            return;
        };
        if self.selection.is_selected(&key) {
            self.deselect_player(&key);
        } else {
            self.select_player(key);
        }
    }

    pub fn deselect_current(&mut self) {
        if let Some(key) = self.selection.current().cloned() {
            self.deselect_player(&key);
        }
    }

    // ---- search --------------------------------------------------------

    pub fn start_search(&mut self) {
        self.search_active = true;
        self.search_query.clear();
        self.search_cursor = 0;
    }

    pub fn cancel_search(&mut self) {
        self.search_active = false;
        self.search_query.clear();
        self.search_cursor = 0;
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search_query.push(c);
        self.search_cursor = 0;
    }

    pub fn pop_search_char(&mut self) {
        self.search_query.pop();
        self.search_cursor = 0;
    }

    /// Select the highlighted suggestion and close the overlay.
    pub fn accept_search(&mut self) {
        let key = self
            .search_matches()
            .get(self.search_cursor)
            .map(|r| r.key.clone());
        if let Some(key) = key {
            self.select_player(key);
            self.screen = Screen::Player;
        }
        self.cancel_search();
    }

    // ---- cursor bookkeeping --------------------------------------------

    pub fn clamp_cursors(&mut self) {
        clamp(&mut self.league_cursor, self.leagues.len());
        clamp(&mut self.position_cursor, ALL_POSITIONS.len());
        clamp(&mut self.player_cursor, self.filtered.len());
    }

    pub fn focused_list_len(&self) -> usize {
        match self.focus {
            ExploreFocus::Leagues => self.leagues.len(),
            ExploreFocus::Positions => ALL_POSITIONS.len(),
            ExploreFocus::Players => self.filtered.len(),
            ExploreFocus::Scatter => 0,
            ExploreFocus::Similar => match self.similar_panel() {
                SimilarPanel::MostValuable(list) => list.len(),
                SimilarPanel::SimilarTo { entries, .. } => entries.len(),
            },
        }
    }

    pub fn focused_cursor_mut(&mut self) -> Option<&mut usize> {
        match self.focus {
            ExploreFocus::Leagues => Some(&mut self.league_cursor),
            ExploreFocus::Positions => Some(&mut self.position_cursor),
            ExploreFocus::Players => Some(&mut self.player_cursor),
            ExploreFocus::Scatter => None,
            ExploreFocus::Similar => Some(&mut self.similar_cursor),
        }
    }

    pub fn move_focus_cursor(&mut self, down: bool) {
        let total = self.focused_list_len();
        let Some(cursor) = self.focused_cursor_mut() else {
            return;
        };
        if total == 0 {
            *cursor = 0;
            return;
        }
        if down {
            *cursor = (*cursor + 1) % total;
        } else if *cursor == 0 {
            *cursor = total - 1;
        } else {
            *cursor -= 1;
        }
    }

    pub fn cycle_focus(&mut self, forward: bool) {
        const ORDER: [ExploreFocus; 5] = [
            ExploreFocus::Leagues,
            ExploreFocus::Positions,
            ExploreFocus::Players,
            ExploreFocus::Scatter,
            ExploreFocus::Similar,
        ];
        let idx = ORDER.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (idx + 1) % ORDER.len()
        } else {
            (idx + ORDER.len() - 1) % ORDER.len()
        };
        self.focus = ORDER[next];
    }
}

fn clamp(cursor: &mut usize, total: usize) {
    if total == 0 {
        *cursor = 0;
    } else if *cursor >= total {
        *cursor = total - 1;
    }
}
