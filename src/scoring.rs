use std::fmt;

use serde::{Deserialize, Serialize};

use crate::role_params::RoleParams;
use crate::stat_normalize::CanonicalPlayerStats;

pub const SCORE_FLOOR: i32 = 60;
pub const SCORE_CEILING: i32 = 99;

/// Manually supplied qualitative inputs, already on the 0-99 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualInputs {
    pub isolation: i32,
    pub defense_eye_test: i32,
    pub clutch: i32,
}

impl Default for ManualInputs {
    fn default() -> Self {
        Self {
            isolation: 75,
            defense_eye_test: 75,
            clutch: 75,
        }
    }
}

impl ManualInputs {
    fn clamped(self) -> Self {
        Self {
            isolation: self.isolation.clamp(0, 99),
            defense_eye_test: self.defense_eye_test.clamp(0, 99),
            clutch: self.clutch.clamp(0, 99),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubScores {
    pub scoring: i32,
    pub playmaking: i32,
    pub shooting: i32,
    pub rebounding: i32,
    pub defense: i32,
    pub isolation: i32,
    pub clutch: i32,
}

/// Map a raw metric onto the 60-99 scale using role thresholds. A
/// degenerate threshold pair collapses to the floor.
pub fn normalize(value: f64, min_val: f64, max_val: f64) -> i32 {
    if max_val == min_val {
        return SCORE_FLOOR;
    }
    let score = 60.0 + (value - min_val) / (max_val - min_val) * 40.0;
    score.clamp(SCORE_FLOOR as f64, SCORE_CEILING as f64).round() as i32
}

pub fn sub_scores(
    stats: &CanonicalPlayerStats,
    params: &RoleParams,
    inputs: ManualInputs,
) -> SubScores {
    let inputs = inputs.clamped();

    let scoring = normalize(
        stats.true_shooting_pct,
        params.true_shooting.min,
        params.true_shooting.max,
    );

    let mut playmaking = normalize(stats.assist_pct, params.assist_pct.min, params.assist_pct.max);
    if stats.assist_to_turnover < 2.0 {
        playmaking = (playmaking - 5).max(SCORE_FLOOR);
    }

    let shooting_base = normalize(stats.three_pct, params.three_pct.min, params.three_pct.max);
    let volume_ratio = (stats.three_makes_per_game / params.shooting_volume_max).min(1.0);
    let shooting =
        ((shooting_base as f64 + volume_ratio * 10.0).round() as i32).min(SCORE_CEILING);

    let rebounding = normalize(
        stats.rebound_pct,
        params.rebound_pct.min,
        params.rebound_pct.max,
    );

    // Box-score rates are a weak proxy for on-ball defense, so the data
    // component is blended under the eye-test input.
    let data_def = (60.0
        + stats.steal_pct * params.steal_multiplier
        + stats.block_pct * params.block_multiplier)
        .clamp(SCORE_FLOOR as f64, SCORE_CEILING as f64);
    let defense = (params.defense_data_weight * data_def
        + params.defense_eye_weight * f64::from(inputs.defense_eye_test))
    .round() as i32;

    SubScores {
        scoring,
        playmaking,
        shooting,
        rebounding,
        defense,
        isolation: inputs.isolation,
        clutch: inputs.clutch,
    }
}

/// Weighted overall. Shooting is display-only; the six weighted
/// sub-scores carry the rating.
pub fn overall_rating(scores: SubScores, params: &RoleParams) -> i32 {
    let w = &params.weights;
    let total = f64::from(scores.scoring) * w.scoring
        + f64::from(scores.playmaking) * w.playmaking
        + f64::from(scores.defense) * w.defense
        + f64::from(scores.rebounding) * w.rebounding
        + f64::from(scores.clutch) * w.clutch
        + f64::from(scores.isolation) * w.isolation;
    total
        .clamp(SCORE_FLOOR as f64, SCORE_CEILING as f64)
        .round() as i32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TierBadge {
    T3,
    T2,
    T1Half,
    T1,
    T0,
}

impl TierBadge {
    pub fn label(self) -> &'static str {
        match self {
            TierBadge::T0 => "T0",
            TierBadge::T1 => "T1",
            TierBadge::T1Half => "T1.5",
            TierBadge::T2 => "T2",
            TierBadge::T3 => "T3",
        }
    }
}

impl fmt::Display for TierBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn tier_badge(overall: i32) -> TierBadge {
    if overall >= 96 {
        TierBadge::T0
    } else if overall >= 90 {
        TierBadge::T1
    } else if overall >= 85 {
        TierBadge::T1Half
    } else if overall >= 80 {
        TierBadge::T2
    } else {
        TierBadge::T3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role_params::{Role, RoleParams};
    use crate::stat_normalize::synthetic_baseline;

    fn guards() -> RoleParams {
        RoleParams::defaults(Role::Guards)
    }

    #[test]
    fn normalize_is_exact_at_boundaries() {
        assert_eq!(normalize(0.50, 0.50, 0.65), 60);
        assert_eq!(normalize(0.65, 0.50, 0.65), 99);
        assert_eq!(normalize(0.40, 0.50, 0.65), 60);
        assert_eq!(normalize(0.90, 0.50, 0.65), 99);
    }

    #[test]
    fn normalize_degenerate_thresholds_floor() {
        assert_eq!(normalize(0.55, 0.55, 0.55), 60);
    }

    #[test]
    fn guards_midpoint_true_shooting_scores_eighty() {
        let stats = CanonicalPlayerStats {
            true_shooting_pct: 0.575,
            ..Default::default()
        };
        let scores = sub_scores(&stats, &guards(), ManualInputs::default());
        assert_eq!(scores.scoring, 80);
    }

    #[test]
    fn bigs_thresholds_shift_the_same_input() {
        let stats = CanonicalPlayerStats {
            true_shooting_pct: 0.575,
            ..Default::default()
        };
        let scores = sub_scores(
            &stats,
            &RoleParams::defaults(Role::Bigs),
            ManualInputs::default(),
        );
        assert_eq!(scores.scoring, 66);
    }

    #[test]
    fn zero_record_floors_with_blended_defense() {
        let stats = CanonicalPlayerStats::default();
        let scores = sub_scores(&stats, &guards(), ManualInputs::default());
        assert_eq!(scores.scoring, 60);
        assert_eq!(scores.playmaking, 60);
        assert_eq!(scores.shooting, 60);
        assert_eq!(scores.rebounding, 60);
        // 0.4 * 60 + 0.6 * 75
        assert_eq!(scores.defense, 69);
        assert_eq!(scores.isolation, 75);
        assert_eq!(scores.clutch, 75);
    }

    #[test]
    fn zero_record_with_floor_inputs_is_all_floor() {
        let stats = CanonicalPlayerStats::default();
        let inputs = ManualInputs {
            isolation: 60,
            defense_eye_test: 60,
            clutch: 60,
        };
        let scores = sub_scores(&stats, &guards(), inputs);
        assert_eq!(
            (
                scores.scoring,
                scores.playmaking,
                scores.shooting,
                scores.rebounding,
                scores.defense,
                scores.isolation,
                scores.clutch,
            ),
            (60, 60, 60, 60, 60, 60, 60)
        );
        assert_eq!(overall_rating(scores, &guards()), 60);
    }

    #[test]
    fn weak_ball_security_costs_playmaking() {
        let stats = CanonicalPlayerStats {
            assist_pct: 0.45,
            assist_to_turnover: 1.4,
            ..Default::default()
        };
        let scores = sub_scores(&stats, &guards(), ManualInputs::default());
        assert_eq!(scores.playmaking, 94);
    }

    #[test]
    fn shooting_volume_bonus_caps_at_ceiling() {
        let stats = CanonicalPlayerStats {
            three_pct: 0.42,
            three_makes_per_game: 5.5,
            ..Default::default()
        };
        let scores = sub_scores(&stats, &guards(), ManualInputs::default());
        assert_eq!(scores.shooting, 99);
    }

    #[test]
    fn manual_inputs_are_clamped_to_scale() {
        let stats = CanonicalPlayerStats::default();
        let inputs = ManualInputs {
            isolation: 150,
            defense_eye_test: -20,
            clutch: 101,
        };
        let scores = sub_scores(&stats, &guards(), inputs);
        assert_eq!(scores.isolation, 99);
        assert_eq!(scores.clutch, 99);
        // eye test clamps to 0: round(0.4 * 60 + 0.6 * 0)
        assert_eq!(scores.defense, 24);
    }

    #[test]
    fn overall_stays_in_range_for_extreme_input() {
        let scores = SubScores {
            scoring: 99,
            playmaking: 99,
            shooting: 99,
            rebounding: 99,
            defense: 99,
            isolation: 99,
            clutch: 99,
        };
        assert_eq!(overall_rating(scores, &guards()), 99);

        let baseline = synthetic_baseline("x");
        let scores = sub_scores(&baseline, &guards(), ManualInputs::default());
        let overall = overall_rating(scores, &guards());
        assert!((SCORE_FLOOR..=SCORE_CEILING).contains(&overall));
    }

    #[test]
    fn tier_ladder_cutoffs() {
        assert_eq!(tier_badge(99), TierBadge::T0);
        assert_eq!(tier_badge(96), TierBadge::T0);
        assert_eq!(tier_badge(95), TierBadge::T1);
        assert_eq!(tier_badge(90), TierBadge::T1);
        assert_eq!(tier_badge(89), TierBadge::T1Half);
        assert_eq!(tier_badge(85), TierBadge::T1Half);
        assert_eq!(tier_badge(84), TierBadge::T2);
        assert_eq!(tier_badge(80), TierBadge::T2);
        assert_eq!(tier_badge(79), TierBadge::T3);
        assert_eq!(tier_badge(60), TierBadge::T3);
        assert_eq!(TierBadge::T1Half.label(), "T1.5");
    }
}
