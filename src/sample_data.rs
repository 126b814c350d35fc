use std::collections::HashMap;
use std::env;

use rand::Rng;

use crate::record::{PlayerKey, PlayerRecord, Position, RecordStore, Stat};

/// Leagues used by the generated dataset, matching the `Comp` naming scheme
/// of the real export (country prefix + league name).
pub const SAMPLE_LEAGUES: [&str; 5] = [
    "fr Ligue 1",
    "es La Liga",
    "eng Premier League",
    "de Bundesliga",
    "it Serie A",
];

const FIRST_NAMES: [&str; 20] = [
    "A. Stone", "R. Vega", "M. Holt", "J. Nox", "T. Vale", "K. Rook", "L. Park", "D. Moss",
    "I. Noor", "C. Hale", "V. Ash", "E. Pike", "N. Gray", "O. Reed", "S. Quinn", "P. Vale",
    "F. Lund", "G. Marsh", "H. Boyd", "W. Cole",
];

const SQUADS: [&str; 25] = [
    "Alpha FC", "Omega FC", "Northbridge", "Southgate", "Eastfield", "Westmoor", "Riverside",
    "Lakeview", "Hillcrest", "Stonewall", "Ironworks", "Harborview", "Milltown", "Oakhurst",
    "Pinefield", "Cedar Rovers", "Maple United", "Birchwood", "Elm City", "Ashford",
    "Granite Town", "Copperfield", "Silverton", "Goldport", "Bronzegate",
];

pub fn sample_size_from_env() -> usize {
    env::var("SCOUT_SAMPLE_SIZE")
        .ok()
        .and_then(|val| val.parse::<usize>().ok())
        .unwrap_or(400)
        .clamp(20, 20_000)
}

/// Generate a synthetic dataset so the dashboard works with no data file.
///
/// Values are drawn so the derived views stay meaningful: attacking output
/// drives market value, embedding coordinates cluster by role, goalkeepers
/// get keeper stats instead of shooting stats.
pub fn generate(count: usize) -> RecordStore {
    let mut rng = rand::thread_rng();
    let mut records = Vec::with_capacity(count);

    let combos = FIRST_NAMES.len() * SQUADS.len();
    for i in 0..count {
        // Name/squad pairing is injective per block of `combos`; a numeric
        // suffix keeps the Player+Squad key unique beyond that.
        let first = FIRST_NAMES[i % FIRST_NAMES.len()];
        let squad = SQUADS[(i / FIRST_NAMES.len()) % SQUADS.len()];
        let player = if i < combos {
            first.to_string()
        } else {
            format!("{first} {}", i / combos + 1)
        };
        // One goalkeeper per eleven; the rest split across outfield roles,
        // with an occasional dual-role player.
        let positions = if i % 11 == 0 {
            vec![Position::Gk]
        } else {
            match i % 4 {
                0 => vec![Position::Df],
                1 => vec![Position::Mf],
                2 => vec![Position::Fw],
                _ => vec![Position::Mf, Position::Fw],
            }
        };
        let comp = SAMPLE_LEAGUES[i % SAMPLE_LEAGUES.len()].to_string();

        let minutes = rng.gen_range(90.0_f64..3_200.0).round();
        let matches = (minutes / 90.0).ceil() + rng.gen_range(0.0..4.0_f64).round();
        let starts = (matches - rng.gen_range(0.0..3.0_f64).round()).max(0.0);

        let mut stats: HashMap<Stat, f64> = HashMap::new();
        stats.insert(Stat::Age, rng.gen_range(17.0_f64..36.0).round());
        stats.insert(Stat::Mp, matches);
        stats.insert(Stat::Starts, starts);
        stats.insert(Stat::Min, minutes);

        let is_keeper = positions.contains(&Position::Gk);
        let attacking = if is_keeper {
            0.0
        } else {
            match positions[0] {
                Position::Fw => rng.gen_range(0.25_f64..0.95),
                Position::Mf => rng.gen_range(0.10_f64..0.55),
                _ => rng.gen_range(0.0_f64..0.25),
            }
        };

        stats.insert(Stat::Gls, jitter(&mut rng, attacking * 0.7));
        stats.insert(Stat::Sh, jitter(&mut rng, attacking * 3.0 + 0.3));
        stats.insert(Stat::SoT, jitter(&mut rng, attacking * 1.2 + 0.1));
        stats.insert(Stat::Ast, jitter(&mut rng, attacking * 0.4 + 0.02));
        stats.insert(Stat::Xg, jitter(&mut rng, attacking * 0.65));
        stats.insert(Stat::Xag, jitter(&mut rng, attacking * 0.35 + 0.02));
        stats.insert(Stat::PrgC, jitter(&mut rng, attacking * 3.5 + 0.5));
        stats.insert(Stat::PrgP, rng.gen_range(0.5_f64..8.0));
        stats.insert(Stat::PrgR, jitter(&mut rng, attacking * 4.0 + 0.3));
        stats.insert(Stat::CrdY, rng.gen_range(0.0_f64..0.35));
        stats.insert(Stat::CrdR, rng.gen_range(0.0_f64..0.04));
        stats.insert(Stat::TklW, rng.gen_range(0.2_f64..2.4));
        stats.insert(Stat::Int, rng.gen_range(0.1_f64..2.0));
        stats.insert(Stat::Clr, rng.gen_range(0.2_f64..4.5));
        stats.insert(Stat::Err, rng.gen_range(0.0_f64..0.12));
        stats.insert(Stat::Touches, rng.gen_range(25.0_f64..95.0));
        stats.insert(Stat::Dis, rng.gen_range(0.2_f64..2.5));
        stats.insert(Stat::Fls, rng.gen_range(0.2_f64..2.2));
        stats.insert(Stat::Fld, rng.gen_range(0.2_f64..2.4));
        stats.insert(Stat::Recov, rng.gen_range(2.0_f64..8.5));

        if is_keeper {
            stats.insert(Stat::Cs, rng.gen_range(0.1_f64..0.5));
            stats.insert(Stat::Saves, rng.gen_range(1.5_f64..4.5));
            stats.insert(Stat::SavePct, rng.gen_range(55.0_f64..85.0));
            stats.insert(Stat::Ga, rng.gen_range(0.6_f64..2.2));
            stats.insert(Stat::Pka, rng.gen_range(0.0_f64..0.3));
            stats.insert(Stat::Pksv, rng.gen_range(0.0_f64..0.1));
        }

        // Price tracks attacking output plus minutes, with league spread.
        let league_factor = 1.0 + (i % SAMPLE_LEAGUES.len()) as f64 * 0.15;
        let market = (1.0 + attacking * 60.0 + minutes / 100.0)
            * league_factor
            * rng.gen_range(0.4_f64..1.6)
            * 1.0e6;

        // Embedding: roles cluster along x, attacking output stretches y.
        let role_center = match positions[0] {
            Position::Gk => -6.0,
            Position::Df => -2.0,
            Position::Mf => 2.0,
            Position::Fw => 6.0,
        };
        let x = role_center + rng.gen_range(-2.0_f64..2.0);
        let y = attacking * 8.0 - 4.0 + rng.gen_range(-1.5_f64..1.5);

        records.push(PlayerRecord {
            key: PlayerKey::new(player, squad),
            comp,
            positions,
            x,
            y,
            market_value_eur: Some(market.round()),
            stats,
        });
    }

    RecordStore::new(records)
}

fn jitter(rng: &mut impl Rng, base: f64) -> f64 {
    (base * rng.gen_range(0.7_f64..1.3)).max(0.0)
}
