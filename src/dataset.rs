use std::path::Path;

use anyhow::{Context, Result};
use csv::StringRecord;

use crate::record::{parse_positions, PlayerKey, PlayerRecord, RecordStore, Stat};

/// Load the player dataset from `path`.
///
/// The file is the per-90 export described by the ingestion contract:
/// identity columns (`Player`, `Squad`, `Comp`, `Pos`), raw participation
/// counters, `_per90` rate columns, the embedding coordinates `x`/`y` and
/// `market_value_in_eur`. Missing or non-numeric cells become absent stats;
/// rows without a player name or squad are skipped outright.
pub fn load_records(path: &Path) -> Result<RecordStore> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("open dataset {}", path.display()))?;
    let headers = reader
        .headers()
        .context("read dataset header row")?
        .clone();

    let column = |name: &str| headers.iter().position(|h| h == name);
    let player_col = column("Player").context("dataset has no Player column")?;
    let squad_col = column("Squad").context("dataset has no Squad column")?;
    let comp_col = column("Comp");
    let pos_col = column("Pos");
    let x_col = column("x");
    let y_col = column("y");
    let market_col = column("market_value_in_eur");
    let stat_cols: Vec<(Stat, Option<usize>)> = Stat::ALL
        .into_iter()
        .map(|s| (s, column(s.column())))
        .collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.context("read dataset row")?;
        let player = cell(&row, Some(player_col));
        let squad = cell(&row, Some(squad_col));
        if player.is_empty() || squad.is_empty() {
            continue;
        }

        let mut stats = std::collections::HashMap::new();
        for (stat, col) in &stat_cols {
            if let Some(value) = numeric_cell(&row, *col) {
                stats.insert(*stat, value);
            }
        }

        records.push(PlayerRecord {
            key: PlayerKey::new(player, squad),
            comp: cell(&row, comp_col),
            positions: parse_positions(&cell(&row, pos_col)),
            x: numeric_cell(&row, x_col).unwrap_or(0.0),
            y: numeric_cell(&row, y_col).unwrap_or(0.0),
            market_value_eur: numeric_cell(&row, market_col),
            stats,
        });
    }

    Ok(RecordStore::new(records))
}

fn cell(row: &StringRecord, col: Option<usize>) -> String {
    col.and_then(|c| row.get(c))
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

fn numeric_cell(row: &StringRecord, col: Option<usize>) -> Option<f64> {
    parse_number(col.and_then(|c| row.get(c))?)
}

/// Lenient numeric parse: trims, tolerates thousands separators, rejects
/// placeholders and non-finite results.
fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() || s == "-" {
        return None;
    }
    let cleaned = s.replace(',', "");
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}
