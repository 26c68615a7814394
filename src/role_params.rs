use std::env;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::OnceLock;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Coarse positional grouping that selects thresholds and weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Guards,
    Wings,
    Bigs,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Guards, Role::Wings, Role::Bigs];

    pub fn label(self) -> &'static str {
        match self {
            Role::Guards => "Guards",
            Role::Wings => "Wings",
            Role::Bigs => "Bigs",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "guards" | "guard" | "g" => Ok(Role::Guards),
            "wings" | "wing" | "w" => Ok(Role::Wings),
            "bigs" | "big" | "b" => Ok(Role::Bigs),
            other => Err(anyhow!("unknown role '{other}' (expected guards|wings|bigs)")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MetricRange {
    pub min: f64,
    pub max: f64,
}

impl MetricRange {
    const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RoleWeights {
    pub scoring: f64,
    pub playmaking: f64,
    pub defense: f64,
    pub rebounding: f64,
    pub clutch: f64,
    pub isolation: f64,
}

impl RoleWeights {
    pub fn sum(&self) -> f64 {
        self.scoring + self.playmaking + self.defense + self.rebounding + self.clutch
            + self.isolation
    }
}

/// Per-role scoring parameters. Static data, loaded once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleParams {
    pub weights: RoleWeights,
    pub true_shooting: MetricRange,
    pub assist_pct: MetricRange,
    pub rebound_pct: MetricRange,
    pub three_pct: MetricRange,
    pub shooting_volume_max: f64,
    pub steal_multiplier: f64,
    pub block_multiplier: f64,
    // The 40/60 data-vs-eye-test blend is unverified intuition from the
    // original tuning; kept as configuration rather than a constant.
    pub defense_data_weight: f64,
    pub defense_eye_weight: f64,
}

impl RoleParams {
    pub fn defaults(role: Role) -> Self {
        match role {
            Role::Guards => Self {
                weights: RoleWeights {
                    scoring: 0.25,
                    playmaking: 0.30,
                    defense: 0.15,
                    rebounding: 0.05,
                    clutch: 0.10,
                    isolation: 0.15,
                },
                true_shooting: MetricRange::new(0.50, 0.65),
                assist_pct: MetricRange::new(0.10, 0.45),
                rebound_pct: MetricRange::new(0.03, 0.12),
                three_pct: MetricRange::new(0.33, 0.40),
                shooting_volume_max: 4.0,
                steal_multiplier: 10.0,
                block_multiplier: 2.0,
                defense_data_weight: 0.4,
                defense_eye_weight: 0.6,
            },
            Role::Wings => Self {
                weights: RoleWeights {
                    scoring: 0.25,
                    playmaking: 0.10,
                    defense: 0.30,
                    rebounding: 0.10,
                    clutch: 0.10,
                    isolation: 0.15,
                },
                true_shooting: MetricRange::new(0.52, 0.68),
                assist_pct: MetricRange::new(0.05, 0.30),
                rebound_pct: MetricRange::new(0.06, 0.18),
                three_pct: MetricRange::new(0.30, 0.38),
                shooting_volume_max: 2.5,
                steal_multiplier: 6.0,
                block_multiplier: 6.0,
                defense_data_weight: 0.4,
                defense_eye_weight: 0.6,
            },
            Role::Bigs => Self {
                weights: RoleWeights {
                    scoring: 0.20,
                    playmaking: 0.10,
                    defense: 0.35,
                    rebounding: 0.25,
                    clutch: 0.05,
                    isolation: 0.05,
                },
                true_shooting: MetricRange::new(0.55, 0.72),
                assist_pct: MetricRange::new(0.03, 0.35),
                rebound_pct: MetricRange::new(0.10, 0.24),
                three_pct: MetricRange::new(0.25, 0.36),
                shooting_volume_max: 1.5,
                steal_multiplier: 2.0,
                block_multiplier: 8.0,
                defense_data_weight: 0.4,
                defense_eye_weight: 0.6,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub guards: RoleParams,
    pub wings: RoleParams,
    pub bigs: RoleParams,
}

impl ScoringConfig {
    pub fn defaults() -> Self {
        Self {
            guards: RoleParams::defaults(Role::Guards),
            wings: RoleParams::defaults(Role::Wings),
            bigs: RoleParams::defaults(Role::Bigs),
        }
    }

    pub fn role(&self, role: Role) -> &RoleParams {
        match role {
            Role::Guards => &self.guards,
            Role::Wings => &self.wings,
            Role::Bigs => &self.bigs,
        }
    }
}

pub fn load_scoring_config() -> Result<ScoringConfig> {
    if let Some(path) = params_path_override()
        && path.exists()
    {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("read scoring config {}", path.display()))?;
        let config = serde_json::from_str::<ScoringConfig>(&raw)
            .with_context(|| format!("parse scoring config {}", path.display()))?;
        return Ok(config);
    }
    Ok(ScoringConfig::defaults())
}

pub fn global_config() -> &'static ScoringConfig {
    static CONFIG: OnceLock<ScoringConfig> = OnceLock::new();
    CONFIG.get_or_init(|| load_scoring_config().unwrap_or_else(|_| ScoringConfig::defaults()))
}

fn params_path_override() -> Option<PathBuf> {
    env::var("HOOPGRADE_PARAMS_PATH")
        .ok()
        .map(|s| PathBuf::from(s.trim()))
}
