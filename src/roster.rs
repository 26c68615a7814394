use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct RosterPlayer {
    pub id: u32,
    pub full_name: String,
}

/// Static catalog of rateable subjects. Lookups never fail: a miss is a
/// normal outcome that routes the caller to the synthetic baseline.
#[derive(Debug, Clone, Default)]
pub struct RosterIndex {
    players: Vec<RosterPlayer>,
}

impl RosterIndex {
    pub fn from_players(players: Vec<RosterPlayer>) -> Self {
        Self { players }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Exact full-name match first, then case-insensitive substring
    /// containment; the first hit in catalog order wins.
    pub fn resolve(&self, name: &str) -> Option<&RosterPlayer> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Some(hit) = self
            .players
            .iter()
            .find(|p| p.full_name.eq_ignore_ascii_case(trimmed))
        {
            return Some(hit);
        }
        let needle = trimmed.to_lowercase();
        self.players
            .iter()
            .find(|p| p.full_name.to_lowercase().contains(&needle))
    }
}

pub fn load_roster_index() -> Result<RosterIndex> {
    if let Some(path) = roster_path_override()
        && path.exists()
    {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("read roster index {}", path.display()))?;
        let players = serde_json::from_str::<Vec<RosterPlayer>>(&raw)
            .with_context(|| format!("parse roster index {}", path.display()))?;
        return Ok(RosterIndex::from_players(players));
    }

    let raw = include_str!("../assets/roster.json");
    let players =
        serde_json::from_str::<Vec<RosterPlayer>>(raw).context("parse bundled roster index")?;
    Ok(RosterIndex::from_players(players))
}

pub fn global_roster() -> Option<&'static RosterIndex> {
    static ROSTER: OnceLock<Option<RosterIndex>> = OnceLock::new();
    ROSTER.get_or_init(|| load_roster_index().ok()).as_ref()
}

fn roster_path_override() -> Option<PathBuf> {
    env::var("HOOPGRADE_ROSTER_PATH")
        .ok()
        .map(|s| PathBuf::from(s.trim()))
}
