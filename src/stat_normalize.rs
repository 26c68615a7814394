use serde::{Deserialize, Serialize};

use crate::stat_fetch::{RawStatBundle, StatRow};

/// The gap-filled statistical profile for one subject in one season.
/// Every rate is a percentage-as-fraction or per-game figure regardless of
/// which upstream table supplied it; the derivation chain below enforces
/// that when a table is missing the field natively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalPlayerStats {
    pub player_name: String,
    pub games_played: f64,
    pub minutes_per_game: f64,
    pub points_per_game: f64,
    pub true_shooting_pct: f64,
    pub assist_pct: f64,
    pub assist_to_turnover: f64,
    pub rebound_pct: f64,
    pub three_pct: f64,
    pub three_makes_per_game: f64,
    pub steal_pct: f64,
    pub block_pct: f64,
    pub insufficient_sample: bool,
}

impl Default for CanonicalPlayerStats {
    fn default() -> Self {
        Self {
            player_name: String::new(),
            games_played: 0.0,
            minutes_per_game: 0.0,
            points_per_game: 0.0,
            true_shooting_pct: 0.0,
            assist_pct: 0.0,
            assist_to_turnover: 0.0,
            rebound_pct: 0.0,
            three_pct: 0.0,
            three_makes_per_game: 0.0,
            steal_pct: 0.0,
            block_pct: 0.0,
            insufficient_sample: true,
        }
    }
}

/// Collapse a (possibly partial) bundle into one canonical record. Never
/// fails: missing tables degrade to zero-valued fields and the
/// `insufficient_sample` flag is the caller-visible low-confidence signal.
pub fn clean_bundle(bundle: &RawStatBundle) -> CanonicalPlayerStats {
    let empty = StatRow::default();
    let base = bundle.base.as_ref().unwrap_or(&empty);
    let adv = bundle.advanced.as_ref().unwrap_or(&empty);
    let def = bundle.defense.as_ref().unwrap_or(&empty);

    let games_played = base.num("GP");
    let minutes_per_game = base.num("MIN");
    let points_per_game = base.num("PTS");
    let assists_per_game = base.num("AST");
    let turnovers_per_game = base.num("TOV");
    let rebounds_per_game = base.num("REB");
    let three_pct = base.num("FG3_PCT");
    let three_makes_per_game = base.num("FG3M");

    let mut true_shooting_pct = adv.num("TS_PCT");
    let mut assist_pct = adv.num("AST_PCT");
    let native_rebound_pct = adv.num("REB_PCT");
    let mut steal_pct = adv.num("STL_PCT");
    let mut block_pct = adv.num("BLK_PCT");

    // Derive steal/block rates from per-minute counting stats when the
    // advanced table lacks them and the base table has the raw counts.
    if (steal_pct == 0.0 || block_pct == 0.0) && (base.has("STL") || base.has("BLK")) {
        steal_pct = (base.num("STL") / minutes_per_game.max(1.0)) * 100.0;
        block_pct = (base.num("BLK") / minutes_per_game.max(1.0)) * 100.0;
    }

    if true_shooting_pct == 0.0 {
        let denom = 2.0 * (base.num("FGA") + 0.44 * base.num("FTA"));
        true_shooting_pct = if denom > 0.0 {
            points_per_game / denom
        } else {
            0.0
        };
    }

    if assist_pct == 0.0 {
        assist_pct = (assists_per_game / minutes_per_game.max(1.0)) * 100.0;
    }

    let assist_to_turnover = assists_per_game / turnovers_per_game.max(1.0);

    let rebound_pct = if native_rebound_pct > 0.0 {
        native_rebound_pct
    } else {
        rebounds_per_game / games_played.max(1.0)
    };

    let insufficient_sample = games_played < 10.0 || minutes_per_game < 15.0;

    let player_name = [base, adv, def]
        .iter()
        .find_map(|row| row.text("PLAYER_NAME"))
        .unwrap_or_default()
        .to_string();

    CanonicalPlayerStats {
        player_name,
        games_played,
        minutes_per_game,
        points_per_game,
        true_shooting_pct,
        assist_pct,
        assist_to_turnover,
        rebound_pct,
        three_pct,
        three_makes_per_game,
        steal_pct,
        block_pct,
        insufficient_sample,
    }
}

/// Fixed non-personalized profile for subjects that cannot be resolved or
/// fetched. Deliberately a solid-but-unspectacular stat line.
pub fn synthetic_baseline(player_name: &str) -> CanonicalPlayerStats {
    CanonicalPlayerStats {
        player_name: player_name.to_string(),
        games_played: 60.0,
        minutes_per_game: 32.0,
        points_per_game: 25.0,
        true_shooting_pct: 0.60,
        assist_pct: 0.25,
        assist_to_turnover: 2.2,
        rebound_pct: 0.12,
        three_pct: 0.37,
        three_makes_per_game: 2.8,
        steal_pct: 2.0,
        block_pct: 1.2,
        insufficient_sample: false,
    }
}
