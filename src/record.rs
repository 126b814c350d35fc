use std::collections::HashMap;
use std::fmt;

/// Composite player identity: `Player` + `Squad`.
///
/// The dataset is assumed (not verified) to be unique on this pair; lookups
/// resolve to the first matching record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerKey {
    pub player: String,
    pub squad: String,
}

impl PlayerKey {
    pub fn new(player: impl Into<String>, squad: impl Into<String>) -> Self {
        Self {
            player: player.into(),
            squad: squad.into(),
        }
    }
}

impl fmt::Display for PlayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.player, self.squad)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Position {
    Gk,
    Df,
    Mf,
    Fw,
}

pub const ALL_POSITIONS: [Position; 4] = [
    Position::Gk,
    Position::Df,
    Position::Mf,
    Position::Fw,
];

impl Position {
    /// Parse one role token as it appears in the `Pos` column ("GK", "DF", ...).
    pub fn parse_token(raw: &str) -> Option<Self> {
        match raw.trim() {
            "GK" => Some(Position::Gk),
            "DF" => Some(Position::Df),
            "MF" => Some(Position::Mf),
            "FW" => Some(Position::Fw),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Position::Gk => "GK",
            Position::Df => "DF",
            Position::Mf => "MF",
            Position::Fw => "FW",
        }
    }
}

/// Split a `Pos` cell ("MF, FW") into role tokens, dropping anything unknown.
pub fn parse_positions(raw: &str) -> Vec<Position> {
    raw.split(',').filter_map(Position::parse_token).collect()
}

/// Closed enumeration of the numeric stat fields a record may carry.
///
/// Participation counters (`MP`, `Starts`, `Min`) and `Age` are stored raw;
/// everything else is a per-90 rate loaded from the matching `_per90` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stat {
    Age,
    Mp,
    Starts,
    Min,
    Gls,
    Sh,
    SoT,
    Ast,
    Xg,
    Xag,
    PrgC,
    PrgP,
    PrgR,
    CrdY,
    CrdR,
    TklW,
    Int,
    Clr,
    Err,
    Touches,
    Dis,
    Fls,
    Fld,
    Recov,
    Cs,
    Saves,
    SavePct,
    Ga,
    Pka,
    Pksv,
}

impl Stat {
    pub const ALL: [Stat; 30] = [
        Stat::Age,
        Stat::Mp,
        Stat::Starts,
        Stat::Min,
        Stat::Gls,
        Stat::Sh,
        Stat::SoT,
        Stat::Ast,
        Stat::Xg,
        Stat::Xag,
        Stat::PrgC,
        Stat::PrgP,
        Stat::PrgR,
        Stat::CrdY,
        Stat::CrdR,
        Stat::TklW,
        Stat::Int,
        Stat::Clr,
        Stat::Err,
        Stat::Touches,
        Stat::Dis,
        Stat::Fls,
        Stat::Fld,
        Stat::Recov,
        Stat::Cs,
        Stat::Saves,
        Stat::SavePct,
        Stat::Ga,
        Stat::Pka,
        Stat::Pksv,
    ];

    /// Dataset column this stat is loaded from.
    pub fn column(self) -> &'static str {
        match self {
            Stat::Age => "Age",
            Stat::Mp => "MP",
            Stat::Starts => "Starts",
            Stat::Min => "Min",
            Stat::Gls => "Gls_per90",
            Stat::Sh => "Sh_per90",
            Stat::SoT => "SoT_per90",
            Stat::Ast => "Ast_per90",
            Stat::Xg => "xG_per90",
            Stat::Xag => "xAG_per90",
            Stat::PrgC => "PrgC_per90",
            Stat::PrgP => "PrgP_per90",
            Stat::PrgR => "PrgR_per90",
            Stat::CrdY => "CrdY_per90",
            Stat::CrdR => "CrdR_per90",
            Stat::TklW => "TklW_per90",
            Stat::Int => "Int_per90",
            Stat::Clr => "Clr_per90",
            Stat::Err => "Err_per90",
            Stat::Touches => "Touches_per90",
            Stat::Dis => "Dis_per90",
            Stat::Fls => "Fls_per90",
            Stat::Fld => "Fld_per90",
            Stat::Recov => "Recov_per90",
            Stat::Cs => "CS_per90",
            Stat::Saves => "Saves_per90",
            Stat::SavePct => "Save%_per90",
            Stat::Ga => "GA_per90",
            Stat::Pka => "PKA_per90",
            Stat::Pksv => "PKsv_per90",
        }
    }

    /// Human label used by the comparison/radar panels and exports.
    pub fn label(self) -> &'static str {
        match self {
            Stat::Age => "Age",
            Stat::Mp => "Matches",
            Stat::Starts => "Starts",
            Stat::Min => "Minutes",
            Stat::Gls => "Goals",
            Stat::Sh => "Shots",
            Stat::SoT => "Shots on Target",
            Stat::Ast => "Assists",
            Stat::Xg => "Exp. Goals",
            Stat::Xag => "Exp. Assists",
            Stat::PrgC => "Prog. Carries",
            Stat::PrgP => "Prog. Passes",
            Stat::PrgR => "Prog. Runs",
            Stat::CrdY => "Yellow Cards",
            Stat::CrdR => "Red Cards",
            Stat::TklW => "Tackles Won",
            Stat::Int => "Interceptions",
            Stat::Clr => "Clearances",
            Stat::Err => "Errors",
            Stat::Touches => "Touches",
            Stat::Dis => "Dispossessed",
            Stat::Fls => "Fouls",
            Stat::Fld => "Fouls Drawn",
            Stat::Recov => "Recoveries",
            Stat::Cs => "Clean Sheets",
            Stat::Saves => "Saves",
            Stat::SavePct => "% Saves",
            Stat::Ga => "Goals Conceded",
            Stat::Pka => "Penalties Faced",
            Stat::Pksv => "Penalties Saved",
        }
    }

    /// True when the stored value is a per-90 rate rather than a raw count.
    pub fn is_per90(self) -> bool {
        !matches!(self, Stat::Age | Stat::Mp | Stat::Starts | Stat::Min)
    }
}

#[derive(Debug, Clone)]
pub struct PlayerRecord {
    pub key: PlayerKey,
    /// League name as stored in the dataset (`Comp`), e.g. "it Serie A".
    pub comp: String,
    pub positions: Vec<Position>,
    /// Precomputed embedding coordinates; opaque, only used for plotting.
    pub x: f64,
    pub y: f64,
    pub market_value_eur: Option<f64>,
    pub stats: HashMap<Stat, f64>,
}

impl PlayerRecord {
    /// Numeric value for `stat`, or `None` when the dataset had no usable value.
    pub fn stat(&self, stat: Stat) -> Option<f64> {
        self.stats.get(&stat).copied()
    }

    pub fn has_position(&self, pos: Position) -> bool {
        self.positions.contains(&pos)
    }

    /// True when the two records share at least one role token.
    pub fn shares_position(&self, other: &PlayerRecord) -> bool {
        self.positions.iter().any(|p| other.positions.contains(p))
    }

    pub fn positions_label(&self) -> String {
        self.positions
            .iter()
            .map(|p| p.label())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Immutable dataset, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<PlayerRecord>,
}

impl RecordStore {
    pub fn new(records: Vec<PlayerRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&PlayerRecord> {
        self.records.get(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerRecord> {
        self.records.iter()
    }

    /// First record matching `key`, if any (duplicate keys resolve to the first).
    pub fn find(&self, key: &PlayerKey) -> Option<&PlayerRecord> {
        self.records.iter().find(|r| &r.key == key)
    }

    /// Distinct league names in first-seen order.
    pub fn leagues(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for record in &self.records {
            if !out.iter().any(|l| l == &record.comp) {
                out.push(record.comp.clone());
            }
        }
        out
    }

    /// Extent of the embedding coordinates, as `((x_min, x_max), (y_min, y_max))`.
    pub fn embedding_extent(&self) -> ((f64, f64), (f64, f64)) {
        let mut x = (f64::INFINITY, f64::NEG_INFINITY);
        let mut y = (f64::INFINITY, f64::NEG_INFINITY);
        for record in &self.records {
            x = (x.0.min(record.x), x.1.max(record.x));
            y = (y.0.min(record.y), y.1.max(record.y));
        }
        if self.records.is_empty() {
            ((0.0, 0.0), (0.0, 0.0))
        } else {
            (x, y)
        }
    }

    /// Market-value extent over records that carry one; `(0, 0)` when none do.
    pub fn market_extent(&self) -> (f64, f64) {
        let mut extent: Option<(f64, f64)> = None;
        for value in self.records.iter().filter_map(|r| r.market_value_eur) {
            extent = Some(match extent {
                Some((lo, hi)) => (lo.min(value), hi.max(value)),
                None => (value, value),
            });
        }
        extent.unwrap_or((0.0, 0.0))
    }
}
