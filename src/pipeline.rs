use serde::{Deserialize, Serialize};

use crate::rating_cache;
use crate::role_params::{Role, global_config};
use crate::roster::global_roster;
use crate::scoring::{self, ManualInputs, SubScores, TierBadge};
use crate::season::SeasonWindow;
use crate::stat_fetch::{AcquisitionOutcome, acquire_stats};
use crate::stat_normalize::{CanonicalPlayerStats, clean_bundle, synthetic_baseline};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Real,
    Synthetic,
}

#[derive(Debug, Clone, Serialize)]
pub struct RatingReport {
    pub player_name: String,
    pub role: Role,
    pub stats: CanonicalPlayerStats,
    pub sub_scores: SubScores,
    pub overall: i32,
    pub tier: TierBadge,
    pub source: SourceKind,
    /// Populated only when `source` is synthetic.
    pub degradation_reason: Option<String>,
}

/// The one caller-facing entry point. Never fails: an unresolved subject
/// or an exhausted provider degrades to the synthetic baseline, and the
/// report says so.
pub fn compute_rating(name: &str, role: Role, inputs: ManualInputs) -> RatingReport {
    let (stats, source, degradation_reason) = fetch_player_stats(name);

    let params = global_config().role(role);
    let sub_scores = scoring::sub_scores(&stats, params, inputs);
    let overall = scoring::overall_rating(sub_scores, params);
    let tier = scoring::tier_badge(overall);

    RatingReport {
        player_name: stats.player_name.clone(),
        role,
        stats,
        sub_scores,
        overall,
        tier,
        source,
        degradation_reason,
    }
}

/// Resolve + acquire + normalize, behind the subject-keyed TTL cache.
pub fn fetch_player_stats(name: &str) -> (CanonicalPlayerStats, SourceKind, Option<String>) {
    let trimmed = name.trim();
    let key = subject_key(trimmed);

    if let Some(hit) = rating_cache::lookup(&key) {
        return (hit.stats, hit.source, hit.reason);
    }

    let (stats, source, reason) = fetch_player_stats_uncached(trimmed);
    rating_cache::store(&key, &stats, source, reason.as_deref());
    (stats, source, reason)
}

fn fetch_player_stats_uncached(name: &str) -> (CanonicalPlayerStats, SourceKind, Option<String>) {
    let Some(roster) = global_roster() else {
        return synthetic(name, "roster index unavailable".to_string());
    };

    let Some(player) = roster.resolve(name) else {
        return synthetic(
            name,
            format!("no roster match for '{name}' (use a full English name)"),
        );
    };

    let window = SeasonWindow::now();
    match acquire_stats(player.id, &window) {
        AcquisitionOutcome::Fetched(bundle) => {
            let mut stats = clean_bundle(&bundle);
            if stats.player_name.is_empty() {
                stats.player_name = player.full_name.clone();
            }
            (stats, SourceKind::Real, None)
        }
        AcquisitionOutcome::Exhausted(fault) => synthetic(
            &player.full_name,
            format!("stat provider unavailable: {fault}"),
        ),
    }
}

fn synthetic(name: &str, reason: String) -> (CanonicalPlayerStats, SourceKind, Option<String>) {
    (
        synthetic_baseline(name),
        SourceKind::Synthetic,
        Some(reason),
    )
}

fn subject_key(name: &str) -> String {
    name.to_lowercase()
}
