use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};
use serde::Serialize;

use crate::analytics::{self, GroupStats};
use crate::correlation;
use crate::record::{PlayerRecord, Stat};
use crate::state::{AppState, SimilarPanel};

pub struct ExportReport {
    pub path: PathBuf,
    pub players: usize,
    pub correlations: usize,
    pub similar: usize,
}

/// Row-matrix for the Players sheet: identity, market value, then season
/// totals for every stat column.
fn players_rows(subset: &[&PlayerRecord]) -> Vec<Vec<String>> {
    let mut header = vec![
        "Player".to_string(),
        "Squad".to_string(),
        "League".to_string(),
        "Pos".to_string(),
        "Market Value".to_string(),
    ];
    header.extend(Stat::ALL.iter().map(|s| s.label().to_string()));
    let mut rows = vec![header];

    for record in subset {
        let mut row = vec![
            record.key.player.clone(),
            record.key.squad.clone(),
            record.comp.clone(),
            record.positions_label(),
            record
                .market_value_eur
                .map(|v| format!("{v:.0}"))
                .unwrap_or_default(),
        ];
        row.extend(
            Stat::ALL
                .iter()
                .map(|&s| format!("{:.0}", analytics::raw_stat(record, s))),
        );
        rows.push(row);
    }
    rows
}

fn group_rows(group: &GroupStats) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "Stat".to_string(),
        "Mean".to_string(),
        "Min".to_string(),
        "Max".to_string(),
    ]];
    for stat in Stat::ALL {
        let (lo, hi) = group.domain(stat);
        rows.push(vec![
            stat.label().to_string(),
            format!("{:.2}", group.mean(stat)),
            format!("{lo:.2}"),
            format!("{hi:.2}"),
        ]);
    }
    rows
}

fn correlation_rows(entries: &[correlation::CorrelationEntry]) -> Vec<Vec<String>> {
    let mut rows = vec![vec!["Stat".to_string(), "r".to_string()]];
    for entry in entries {
        rows.push(vec![entry.stat.label().to_string(), format!("{:.3}", entry.r)]);
    }
    rows
}

fn similar_rows(panel: &SimilarPanel<'_>) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "Player".to_string(),
        "Squad".to_string(),
        "Pos".to_string(),
        "Market Value".to_string(),
        "Similarity".to_string(),
    ]];
    let push = |rows: &mut Vec<Vec<String>>, r: &PlayerRecord, sim: Option<f64>| {
        rows.push(vec![
            r.key.player.clone(),
            r.key.squad.clone(),
            r.positions_label(),
            r.market_value_eur
                .map(|v| format!("{v:.0}"))
                .unwrap_or_default(),
            sim.map(|s| format!("{s:.4}")).unwrap_or_default(),
        ]);
    };
    match panel {
        SimilarPanel::MostValuable(list) => {
            for record in list {
                push(&mut rows, record, None);
            }
        }
        SimilarPanel::SimilarTo { entries, .. } => {
            for (record, sim) in entries {
                push(&mut rows, record, Some(*sim));
            }
        }
    }
    rows
}

/// Write the current subset and its derived analytics as an xlsx workbook.
pub fn export_workbook(state: &AppState, path: &Path) -> Result<ExportReport> {
    let subset = state.filtered_records();
    let group = analytics::group_stats(&subset, &Stat::ALL);
    let ranked = correlation::market_correlation_ranking(&subset);
    let panel = state.similar_panel();

    let players = players_rows(&subset);
    let similar = similar_rows(&panel);

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Players")?;
        write_rows(sheet, &players)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("GroupStats")?;
        write_rows(sheet, &group_rows(&group))?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Correlation")?;
        write_rows(sheet, &correlation_rows(&ranked))?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Similar")?;
        write_rows(sheet, &similar)?;
    }
    workbook
        .save(path)
        .with_context(|| format!("save workbook {}", path.display()))?;

    Ok(ExportReport {
        path: path.to_path_buf(),
        players: players.len().saturating_sub(1),
        correlations: ranked.len(),
        similar: similar.len().saturating_sub(1),
    })
}

#[derive(Debug, Serialize)]
struct SnapshotFilters {
    minutes_filter: bool,
    leagues: Vec<String>,
    positions: Vec<String>,
    market_min: f64,
    market_max: f64,
}

#[derive(Debug, Serialize)]
struct SnapshotPlayer {
    player: String,
    squad: String,
    league: String,
    positions: String,
    market_value_eur: Option<f64>,
}

#[derive(Debug, Serialize)]
struct SnapshotCorrelation {
    stat: String,
    r: f64,
}

#[derive(Debug, Serialize)]
struct Snapshot {
    generated_at: String,
    filters: SnapshotFilters,
    players: Vec<SnapshotPlayer>,
    correlation: Vec<SnapshotCorrelation>,
}

/// Machine-readable snapshot of the current subset for downstream renderers.
pub fn export_snapshot_json(state: &AppState, path: &Path) -> Result<()> {
    let subset = state.filtered_records();
    let ranked = correlation::market_correlation_ranking(&subset);

    let mut leagues: Vec<String> = state.criteria.leagues.iter().cloned().collect();
    leagues.sort();
    let mut positions: Vec<String> = state
        .criteria
        .positions
        .iter()
        .map(|p| p.label().to_string())
        .collect();
    positions.sort();

    let snapshot = Snapshot {
        generated_at: chrono::Utc::now().to_rfc3339(),
        filters: SnapshotFilters {
            minutes_filter: state.criteria.minutes_filter,
            leagues,
            positions,
            market_min: state.criteria.market_min,
            market_max: state.criteria.market_max,
        },
        players: subset
            .iter()
            .map(|r| SnapshotPlayer {
                player: r.key.player.clone(),
                squad: r.key.squad.clone(),
                league: r.comp.clone(),
                positions: r.positions_label(),
                market_value_eur: r.market_value_eur,
            })
            .collect(),
        correlation: ranked
            .iter()
            .map(|e| SnapshotCorrelation {
                stat: e.stat.label().to_string(),
                r: e.r,
            })
            .collect(),
    };

    let json = serde_json::to_string_pretty(&snapshot).context("serialize snapshot")?;
    std::fs::write(path, json).with_context(|| format!("write snapshot {}", path.display()))?;
    Ok(())
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
