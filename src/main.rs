use std::env;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::canvas::{Canvas, Points, Rectangle};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use scout_terminal::analytics::{self, comparison_stats, radar_stats};
use scout_terminal::correlation;
use scout_terminal::dataset;
use scout_terminal::export;
use scout_terminal::filters::MIN_MINUTES;
use scout_terminal::record::{PlayerRecord, ALL_POSITIONS};
use scout_terminal::sample_data;
use scout_terminal::state::{AppState, ExploreFocus, Screen, SimilarPanel};

/// Colors assigned to selection slots by insertion order.
const SLOT_COLORS: [Color; 3] = [Color::Yellow, Color::Green, Color::Magenta];

struct App {
    state: AppState,
    should_quit: bool,
}

impl App {
    fn new(state: AppState) -> Self {
        Self {
            state,
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.search_active {
            self.on_search_key(key);
            return;
        }
        if self.state.help_overlay {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                self.state.help_overlay = false;
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = true,
            KeyCode::Char('1') => self.state.screen = Screen::Explore,
            KeyCode::Char('2') => self.state.screen = Screen::Player,
            KeyCode::Char('3') => self.state.screen = Screen::Correlation,
            KeyCode::Char('/') => self.state.start_search(),
            KeyCode::Char('m') => self.state.toggle_minutes_filter(),
            KeyCode::Char('e') => run_export(&mut self.state),
            _ => match self.state.screen {
                Screen::Explore => self.on_explore_key(key),
                Screen::Player => self.on_player_key(key),
                Screen::Correlation => {}
            },
        }
    }

    fn on_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.state.cancel_search(),
            KeyCode::Enter => self.state.accept_search(),
            KeyCode::Backspace => self.state.pop_search_char(),
            KeyCode::Down => {
                let total = self.state.search_matches().len();
                if total > 0 {
                    self.state.search_cursor = (self.state.search_cursor + 1) % total;
                }
            }
            KeyCode::Up => {
                let total = self.state.search_matches().len();
                if total > 0 {
                    self.state.search_cursor =
                        (self.state.search_cursor + total - 1) % total;
                }
            }
            KeyCode::Char(c) => self.state.push_search_char(c),
            _ => {}
        }
    }

    fn on_explore_key(&mut self, key: KeyEvent) {
        if self.state.focus == ExploreFocus::Scatter {
            match key.code {
                KeyCode::Char('h') | KeyCode::Left => self.state.move_brush(-1, 0),
                KeyCode::Char('l') | KeyCode::Right => self.state.move_brush(1, 0),
                KeyCode::Char('j') | KeyCode::Down => self.state.move_brush(0, -1),
                KeyCode::Char('k') | KeyCode::Up => self.state.move_brush(0, 1),
                KeyCode::Char('H') => self.state.resize_brush(-1, 0),
                KeyCode::Char('L') => self.state.resize_brush(1, 0),
                KeyCode::Char('J') => self.state.resize_brush(0, -1),
                KeyCode::Char('K') => self.state.resize_brush(0, 1),
                KeyCode::Char('b') | KeyCode::Enter => self.state.ensure_brush(),
                KeyCode::Char('c') => self.state.clear_brush(),
                KeyCode::Tab => self.state.cycle_focus(true),
                KeyCode::BackTab => self.state.cycle_focus(false),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Tab => self.state.cycle_focus(true),
            KeyCode::BackTab => self.state.cycle_focus(false),
            KeyCode::Char('j') | KeyCode::Down => self.state.move_focus_cursor(true),
            KeyCode::Char('k') | KeyCode::Up => self.state.move_focus_cursor(false),
            KeyCode::Char('[') => self.state.nudge_market_min(false),
            KeyCode::Char(']') => self.state.nudge_market_min(true),
            KeyCode::Char('{') => self.state.nudge_market_max(false),
            KeyCode::Char('}') => self.state.nudge_market_max(true),
            KeyCode::Enter | KeyCode::Char(' ') => match self.state.focus {
                ExploreFocus::Leagues => self.state.toggle_league_at_cursor(),
                ExploreFocus::Positions => self.state.toggle_position_at_cursor(),
                ExploreFocus::Players => self.state.toggle_select_at_cursor(),
                ExploreFocus::Similar => select_similar_at_cursor(&mut self.state),
                ExploreFocus::Scatter => {}
            },
            _ => {}
        }
    }

    fn on_player_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab => self.state.selection.cycle_current(),
            KeyCode::Char('x') => self.state.deselect_current(),
            _ => {}
        }
    }
}

fn select_similar_at_cursor(state: &mut AppState) {
    let key = match state.similar_panel() {
        SimilarPanel::MostValuable(list) => {
            list.get(state.similar_cursor).map(|r| r.key.clone())
        }
        SimilarPanel::SimilarTo { entries, .. } => {
            entries.get(state.similar_cursor).map(|(r, _)| r.key.clone())
        }
    };
    if let Some(key) = key {
        state.select_player(key);
    }
}

fn run_export(state: &mut AppState) {
    let dir = env::var("SCOUT_EXPORT_DIR").unwrap_or_else(|_| ".".to_string());
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let xlsx = PathBuf::from(&dir).join(format!("scout_analysis_{stamp}.xlsx"));
    let json = PathBuf::from(&dir).join(format!("scout_analysis_{stamp}.json"));

    let result = export::export_workbook(state, &xlsx)
        .and_then(|report| export::export_snapshot_json(state, &json).map(|()| report));
    match result {
        Ok(report) => {
            state.export.done = true;
            state.export.path = Some(report.path.display().to_string());
            state.export.message = format!("Exported {} players", report.players);
            state.export.last_updated = Some(Instant::now());
            state.push_log(format!("[INFO] Export written to {}", report.path.display()));
        }
        Err(err) => {
            state.export.done = true;
            state.export.message = "Export failed".to_string();
            state.export.last_updated = Some(Instant::now());
            state.push_log(format!("[WARN] Export failed: {err:#}"));
        }
    }
}

fn load_store() -> Result<(scout_terminal::record::RecordStore, String)> {
    let path = env::args()
        .nth(1)
        .or_else(|| env::var("SCOUT_DATA_PATH").ok());
    match path {
        Some(path) => {
            let store = dataset::load_records(std::path::Path::new(&path))?;
            Ok((store, format!("[INFO] Loaded {path}")))
        }
        None => {
            let size = sample_data::sample_size_from_env();
            let store = sample_data::generate(size);
            Ok((
                store,
                format!("[INFO] No dataset configured, generated {size} sample players"),
            ))
        }
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let (store, load_note) = load_store()?;
    let mut state = AppState::new(store);
    state.push_log(load_note);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(state);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        app.state.maybe_clear_export(Instant::now());

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header =
        Paragraph::new(header_text(&app.state)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Explore => render_explore(frame, chunks[1], &app.state),
        Screen::Player => render_player(frame, chunks[1], &app.state),
        Screen::Correlation => render_correlation(frame, chunks[1], &app.state),
    }

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(&app.state));
    frame.render_widget(footer, chunks[3]);

    if app.state.search_active {
        render_search_overlay(frame, frame.size(), &app.state);
    }
    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let screen = match state.screen {
        Screen::Explore => "EXPLORE",
        Screen::Player => "PLAYER",
        Screen::Correlation => "CORRELATION",
    };
    let mut filters = Vec::new();
    if state.criteria.minutes_filter {
        filters.push(format!("min {MIN_MINUTES:.0}'"));
    }
    if !state.criteria.leagues.is_empty() {
        filters.push(format!("{} leagues", state.criteria.leagues.len()));
    }
    if !state.criteria.positions.is_empty() {
        filters.push(format!("{} positions", state.criteria.positions.len()));
    }
    if state.criteria.brush.is_some() {
        filters.push("brush".to_string());
    }
    let filters = if filters.is_empty() {
        "no filters".to_string()
    } else {
        filters.join(", ")
    };
    let line1 = format!(
        "  .-.  SCOUT TERMINAL | {screen} | {}/{} players | {filters}",
        state.filtered.len(),
        state.store.len()
    );
    let line2 = format!(
        " (o,o) market {} - {}",
        fmt_eur(state.criteria.market_min),
        fmt_eur(state.criteria.market_max)
    );
    let export = if state.export.message.is_empty() {
        String::new()
    } else {
        format!("  [{}]", state.export.message)
    };
    let line3 = format!("  \"-\"{export}");
    format!("{line1}\n{line2}\n{line3}")
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::Explore => {
            if state.focus == ExploreFocus::Scatter {
                "1/2/3 Screens | Tab Focus | h/j/k/l Move Brush | H/J/K/L Resize | b Brush | c Clear | m Minutes | / Search | e Export | ? Help | q Quit"
                    .to_string()
            } else {
                "1/2/3 Screens | Tab Focus | j/k Move | Enter Toggle/Select | [ ] { } Market | m Minutes | / Search | e Export | ? Help | q Quit"
                    .to_string()
            }
        }
        Screen::Player => {
            "1/2/3 Screens | Tab Cycle Current | x Deselect | / Search | e Export | ? Help | q Quit"
                .to_string()
        }
        Screen::Correlation => {
            "1/2/3 Screens | m Minutes | / Search | e Export | ? Help | q Quit".to_string()
        }
    }
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(2)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

// ---- explore screen ----------------------------------------------------

fn render_explore(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(30),
            Constraint::Min(40),
            Constraint::Length(36),
        ])
        .split(area);

    render_filter_column(frame, columns[0], state);
    render_scatter(frame, columns[1], state);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(14)])
        .split(columns[2]);
    render_player_list(frame, right[0], state);
    render_similar(frame, right[1], state);
}

fn focus_block(title: &str, focused: bool) -> Block<'static> {
    let block = Block::default().title(title.to_string()).borders(Borders::ALL);
    if focused {
        block.border_style(Style::default().fg(Color::Cyan))
    } else {
        block
    }
}

fn render_filter_column(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(state.leagues.len() as u16 + 2),
            Constraint::Length(ALL_POSITIONS.len() as u16 + 2),
            Constraint::Min(4),
        ])
        .split(area);

    let minutes = Paragraph::new(format!(
        "[{}] only players with {MIN_MINUTES:.0}+ minutes",
        if state.criteria.minutes_filter { "x" } else { " " }
    ))
    .block(Block::default().title("Minutes (m)").borders(Borders::ALL));
    frame.render_widget(minutes, rows[0]);

    let mut league_lines = Vec::new();
    for (i, league) in state.leagues.iter().enumerate() {
        let cursor = state.focus == ExploreFocus::Leagues && i == state.league_cursor;
        let marker = if state.criteria.leagues.contains(league) { "x" } else { " " };
        league_lines.push(format!(
            "{}[{marker}] {league}",
            if cursor { "> " } else { "  " }
        ));
    }
    let leagues = Paragraph::new(league_lines.join("\n")).block(focus_block(
        "Leagues",
        state.focus == ExploreFocus::Leagues,
    ));
    frame.render_widget(leagues, rows[1]);

    let mut position_lines = Vec::new();
    for (i, pos) in ALL_POSITIONS.iter().enumerate() {
        let cursor = state.focus == ExploreFocus::Positions && i == state.position_cursor;
        let marker = if state.criteria.positions.contains(pos) { "x" } else { " " };
        position_lines.push(format!(
            "{}[{marker}] {}",
            if cursor { "> " } else { "  " },
            pos.label()
        ));
    }
    let positions = Paragraph::new(position_lines.join("\n")).block(focus_block(
        "Positions",
        state.focus == ExploreFocus::Positions,
    ));
    frame.render_widget(positions, rows[2]);

    let subset = state.filtered_records();
    let mut market_lines = vec![format!(
        "{} - {}",
        fmt_eur(state.criteria.market_min),
        fmt_eur(state.criteria.market_max)
    )];
    for plot in analytics::league_boxplots(&subset) {
        market_lines.push(format!(
            "{:<14.14} {} {} {}",
            plot.league,
            fmt_eur_short(plot.q1),
            fmt_eur_short(plot.median),
            fmt_eur_short(plot.q3)
        ));
    }
    let market = Paragraph::new(market_lines.join("\n")).block(
        Block::default()
            .title("Market value ([ ] { })")
            .borders(Borders::ALL),
    );
    frame.render_widget(market, rows[3]);
}

fn render_scatter(frame: &mut Frame, area: Rect, state: &AppState) {
    let ((x0, x1), (y0, y1)) = state.store.embedding_extent();
    let margin_x = ((x1 - x0) * 0.05).max(0.5);
    let margin_y = ((y1 - y0) * 0.05).max(0.5);

    let mut dim: Vec<(f64, f64)> = Vec::new();
    let mut lit: Vec<(f64, f64)> = Vec::new();
    let mut picked: Vec<(f64, f64)> = Vec::new();
    for record in state.filtered_records() {
        if state.selection.is_selected(&record.key) {
            picked.push((record.x, record.y));
        } else if state.is_emphasized(record) {
            lit.push((record.x, record.y));
        } else {
            dim.push((record.x, record.y));
        }
    }
    let brush = state.criteria.brush;

    let canvas = Canvas::default()
        .block(focus_block("Scatter", state.focus == ExploreFocus::Scatter))
        .x_bounds([x0 - margin_x, x1 + margin_x])
        .y_bounds([y0 - margin_y, y1 + margin_y])
        .paint(|ctx| {
            ctx.draw(&Points {
                coords: &dim,
                color: Color::DarkGray,
            });
            ctx.draw(&Points {
                coords: &lit,
                color: Color::Cyan,
            });
            ctx.draw(&Points {
                coords: &picked,
                color: Color::Yellow,
            });
            if let Some(rect) = brush {
                ctx.draw(&Rectangle {
                    x: rect.x0,
                    y: rect.y0,
                    width: rect.x1 - rect.x0,
                    height: rect.y1 - rect.y0,
                    color: Color::White,
                });
            }
        });
    frame.render_widget(canvas, area);
}

fn render_player_list(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = focus_block("Players", state.focus == ExploreFocus::Players);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let records = state.filtered_records();
    if records.is_empty() {
        let empty = Paragraph::new("No players match the filters")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let visible = inner.height as usize;
    let (start, end) = visible_range(state.player_cursor, records.len(), visible);
    let mut lines = Vec::new();
    for idx in start..end {
        let record = records[idx];
        let cursor = idx == state.player_cursor && state.focus == ExploreFocus::Players;
        let slot = state
            .selection
            .color_slot(&record.key)
            .map(|s| format!("{}", s + 1))
            .unwrap_or_else(|| " ".to_string());
        let line = format!(
            "{}{slot} {:<16.16} {:<3.3} {:>8}",
            if cursor { "> " } else { "  " },
            record.key.player,
            record.positions_label(),
            record
                .market_value_eur
                .map(fmt_eur_short)
                .unwrap_or_else(|| "-".to_string())
        );
        let style = match state.selection.color_slot(&record.key) {
            Some(s) => Style::default().fg(SLOT_COLORS[s % SLOT_COLORS.len()]),
            None if cursor => Style::default().add_modifier(Modifier::BOLD),
            None => Style::default(),
        };
        lines.push(Line::styled(line, style));
    }
    frame.render_widget(Paragraph::new(Text::from(lines)), inner);
}

fn render_similar(frame: &mut Frame, area: Rect, state: &AppState) {
    let panel = state.similar_panel();
    let title = match &panel {
        SimilarPanel::MostValuable(_) => "Top 10 by market value".to_string(),
        SimilarPanel::SimilarTo { reference, .. } => {
            format!("Similar to {}", reference.key.player)
        }
    };
    let block = focus_block(&title, state.focus == ExploreFocus::Similar);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = Vec::new();
    match &panel {
        SimilarPanel::MostValuable(list) => {
            for (i, record) in list.iter().enumerate() {
                let cursor = state.focus == ExploreFocus::Similar && i == state.similar_cursor;
                lines.push(format!(
                    "{}{:<16.16} {:>8}",
                    if cursor { "> " } else { "  " },
                    record.key.player,
                    record
                        .market_value_eur
                        .map(fmt_eur_short)
                        .unwrap_or_else(|| "-".to_string())
                ));
            }
        }
        SimilarPanel::SimilarTo { reference, entries } => {
            if entries.is_empty() {
                lines.push(format!(
                    "No player from the current subset is similar to {}",
                    reference.key.player
                ));
            }
            for (i, (record, sim)) in entries.iter().enumerate() {
                let cursor = state.focus == ExploreFocus::Similar && i == state.similar_cursor;
                lines.push(format!(
                    "{}{:<14.14} {:>7} {:>5.2}",
                    if cursor { "> " } else { "  " },
                    record.key.player,
                    record
                        .market_value_eur
                        .map(fmt_eur_short)
                        .unwrap_or_else(|| "-".to_string()),
                    sim
                ));
            }
        }
    }
    frame.render_widget(Paragraph::new(lines.join("\n")), inner);
}

// ---- player screen -----------------------------------------------------

fn render_player(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    render_selection_row(frame, rows[0], state);

    let Some(player) = state.current_player() else {
        let empty = Paragraph::new(
            "No player selected. Pick one from the Players list or with / search.",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, rows[1]);
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(42), Constraint::Percentage(58)])
        .split(rows[1]);

    render_percentiles(frame, columns[0], state, player);
    render_comparison(frame, columns[1], state, player);
}

fn render_selection_row(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut spans = Vec::new();
    for (i, record) in state.selected_records().into_iter().enumerate() {
        let current = state.selection.current() == Some(&record.key);
        let style = if current {
            Style::default()
                .fg(SLOT_COLORS[i % SLOT_COLORS.len()])
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(SLOT_COLORS[i % SLOT_COLORS.len()])
        };
        spans.push(Span::styled(
            format!(" [{}] {} ", i + 1, record.key),
            style,
        ));
    }
    if spans.is_empty() {
        spans.push(Span::styled(
            " No selection ",
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_percentiles(frame: &mut Frame, area: Rect, state: &AppState, player: &PlayerRecord) {
    let block = Block::default()
        .title("Percentiles vs same-role players")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let subset = state.filtered_records();
    let cohort = analytics::positional_cohort(&subset, player);
    let stats = radar_stats(player);

    let mut lines = vec![
        format!("{} ({})", player.key.player, player.positions_label()),
        format!("{} ({})", player.key.squad, player.comp),
        player
            .market_value_eur
            .map(fmt_eur)
            .unwrap_or_else(|| "market value unknown".to_string()),
        String::new(),
    ];
    for (stat, pct) in analytics::percentiles(player, stats, &cohort) {
        lines.push(format!(
            "{:<14.14} {} {:>3.0}",
            stat.label(),
            text_bar(pct / 100.0, 20),
            pct
        ));
    }
    lines.push(String::new());
    lines.push(format!("cohort size: {}", cohort.len()));
    frame.render_widget(Paragraph::new(lines.join("\n")), inner);
}

fn render_comparison(frame: &mut Frame, area: Rect, state: &AppState, player: &PlayerRecord) {
    let block = Block::default()
        .title("Season totals vs subset average")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let subset = state.filtered_records();
    let stats = comparison_stats(player);
    let group = analytics::group_stats(&subset, stats);
    let totals = analytics::raw_stats(player, stats);

    let mut lines = vec![format!(
        "{:>7} {:>12} {:<16} {:<12}",
        "avg", "", "", player.key.player
    )];
    for (stat, player_value) in totals {
        let group_value = group.mean(stat);
        let domain = analytics::comparison_domain(group.domain(stat), group_value, player_value);
        let ng = analytics::normalize(group_value, domain);
        let np = analytics::normalize(player_value, domain);
        lines.push(format!(
            "{:>7.1} {:>12} {:<16.16} {:<12} {:.0}",
            group_value,
            text_bar_reversed(ng, 12),
            stat.label(),
            text_bar(np, 12),
            player_value
        ));
    }
    if subset.is_empty() {
        lines.push("(empty subset: averages degrade to zero)".to_string());
    }
    frame.render_widget(Paragraph::new(lines.join("\n")), inner);
}

// ---- correlation screen ------------------------------------------------

fn render_correlation(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title("Correlation with market value (top 5 / bottom 5)")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let subset = state.filtered_records();
    if subset.is_empty() {
        let empty = Paragraph::new("No players match the filters")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let ranked = correlation::market_correlation_ranking(&subset);
    let mut lines = Vec::new();
    for entry in ranked {
        let width = (entry.r.abs() * 20.0).round() as usize;
        let bar: String = std::iter::repeat('█').take(width).collect();
        let (color, sign) = if entry.r >= 0.0 {
            (Color::Cyan, '+')
        } else {
            (Color::Red, '-')
        };
        lines.push(Line::from(vec![
            Span::raw(format!("{:<16.16} {sign}{:<6.3} ", entry.stat.label(), entry.r.abs())),
            Span::styled(bar, Style::default().fg(color)),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::raw(format!("computed over {} players", subset.len())));
    frame.render_widget(Paragraph::new(Text::from(lines)), inner);
}

// ---- overlays ----------------------------------------------------------

fn render_search_overlay(frame: &mut Frame, area: Rect, state: &AppState) {
    let popup_area = centered_rect(50, 60, area);
    frame.render_widget(Clear, popup_area);

    let mut lines = vec![format!("> {}_", state.search_query), String::new()];
    let matches = state.search_matches();
    if state.search_query.trim().len() < 2 {
        lines.push("type at least 2 characters".to_string());
    } else if matches.is_empty() {
        lines.push("no matching player in the current subset".to_string());
    }
    for (i, record) in matches.iter().enumerate() {
        lines.push(format!(
            "{}{:<18.18} {:<3.3} {} {}",
            if i == state.search_cursor { "> " } else { "  " },
            record.key.player,
            record.positions_label(),
            record.key.squad,
            record
                .market_value_eur
                .map(fmt_eur_short)
                .unwrap_or_else(|| "-".to_string())
        ));
    }

    let search = Paragraph::new(lines.join("\n"))
        .block(Block::default().title("Search player").borders(Borders::ALL));
    frame.render_widget(search, popup_area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Scout Terminal - Help",
        "",
        "Global:",
        "  1/2/3        Explore / Player / Correlation",
        "  m            Toggle 500+ minutes filter (clears selection)",
        "  /            Search player",
        "  e            Export xlsx + json",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Explore:",
        "  Tab          Cycle focus (leagues, positions, players, scatter, similar)",
        "  j/k or ↑/↓   Move cursor",
        "  Enter/Space  Toggle filter / select player (max 3, oldest evicted)",
        "  [ ] / { }    Market range min / max",
        "  b, c         Brush on / clear (scatter focus: h/j/k/l move, H/J/K/L resize)",
        "",
        "Player:",
        "  Tab          Cycle current player",
        "  x            Deselect current",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

// ---- small helpers -----------------------------------------------------

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn text_bar(fraction: f64, width: usize) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * width as f64).round() as usize;
    let mut bar = String::with_capacity(width);
    for i in 0..width {
        bar.push(if i < filled { '█' } else { '·' });
    }
    bar
}

/// Right-aligned variant for the mirrored group bar.
fn text_bar_reversed(fraction: f64, width: usize) -> String {
    text_bar(fraction, width).chars().rev().collect()
}

fn fmt_eur(value: f64) -> String {
    format!("€{:.1}M", value / 1.0e6)
}

fn fmt_eur_short(value: f64) -> String {
    format!("{:.1}M", value / 1.0e6)
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
