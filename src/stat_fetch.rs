use std::collections::HashMap;
use std::env;

use anyhow::{Context, Result, anyhow};
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use serde::Deserialize;
use serde_json::Value;

use crate::http_client::http_client;
use crate::season::SeasonWindow;

const STATS_ENDPOINT: &str = "https://stats.nba.com/stats/leaguedashplayerstats";

pub const MEASURE_TYPES: [&str; 3] = ["Base", "Advanced", "Defense"];

/// Header set for the raw fallback tier. The stats host rejects requests
/// that do not look like a browser session.
const BROWSER_HEADERS: &[(&str, &str)] = &[
    ("Accept", "application/json, text/plain, */*"),
    ("Accept-Language", "en-US,en;q=0.9"),
    ("Connection", "keep-alive"),
    ("Host", "stats.nba.com"),
    ("Origin", "https://www.nba.com"),
    ("Referer", "https://www.nba.com/stats/"),
    (
        "User-Agent",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
    ),
    ("x-nba-stats-token", "true"),
];

/// One row of an upstream table, keyed by column name. Upstream tables are
/// ragged across seasons and measure types, so missing columns read as 0.
#[derive(Debug, Clone, Default)]
pub struct StatRow {
    values: HashMap<String, Value>,
}

impl StatRow {
    pub fn from_columns(headers: &[String], row: &[Value]) -> Self {
        let values = headers
            .iter()
            .zip(row.iter())
            .map(|(h, v)| (h.clone(), v.clone()))
            .collect();
        Self { values }
    }

    pub fn has(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    pub fn num(&self, column: &str) -> f64 {
        self.values
            .get(column)
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    }

    pub fn text(&self, column: &str) -> Option<&str> {
        self.values.get(column).and_then(Value::as_str)
    }
}

/// A parsed upstream table before per-player filtering.
#[derive(Debug, Clone, Default)]
pub struct StatTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl StatTable {
    pub fn first_row_for_player(&self, player_id: u32) -> Option<StatRow> {
        let id_idx = self.headers.iter().position(|h| h == "PLAYER_ID")?;
        self.rows
            .iter()
            .find(|row| row.get(id_idx).and_then(Value::as_u64) == Some(u64::from(player_id)))
            .map(|row| StatRow::from_columns(&self.headers, row))
    }
}

/// The three measure-type tables for one season, filtered to one player.
#[derive(Debug, Clone, Default)]
pub struct RawStatBundle {
    pub season: String,
    pub base: Option<StatRow>,
    pub advanced: Option<StatRow>,
    pub defense: Option<StatRow>,
}

impl RawStatBundle {
    pub fn has_any_row(&self) -> bool {
        self.base.is_some() || self.advanced.is_some() || self.defense.is_some()
    }

    fn set(&mut self, measure: &str, row: Option<StatRow>) {
        match measure {
            "Base" => self.base = row,
            "Advanced" => self.advanced = row,
            "Defense" => self.defense = row,
            _ => {}
        }
    }
}

#[derive(Debug)]
pub enum AcquisitionOutcome {
    Fetched(RawStatBundle),
    /// Every season and tier was tried; carries the last underlying fault.
    Exhausted(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchTier {
    Structured,
    RawHttp,
}

#[derive(Debug, Clone)]
struct Attempt {
    season: String,
    tier: FetchTier,
}

fn attempt_plan(seasons: &SeasonWindow) -> Vec<Attempt> {
    let mut plan = Vec::with_capacity(4);
    for season in seasons.tries() {
        for tier in [FetchTier::Structured, FetchTier::RawHttp] {
            plan.push(Attempt {
                season: season.to_string(),
                tier,
            });
        }
    }
    plan
}

enum TierOutcome {
    Rows(RawStatBundle),
    NoRows,
    Fault(anyhow::Error),
}

/// Walk the (season x tier) attempt plan in order and return the first
/// bundle with at least one matching row. The raw tier for a season runs
/// only after that season's structured tier faulted; a structured tier
/// that parses cleanly but has no rows for the player advances straight
/// to the next season. No retries, no backoff.
pub fn acquire_stats(player_id: u32, seasons: &SeasonWindow) -> AcquisitionOutcome {
    let client = match http_client() {
        Ok(client) => client,
        Err(err) => return AcquisitionOutcome::Exhausted(format!("{err:#}")),
    };

    let mut last_fault = String::from("no acquisition attempts were made");
    let mut structured_faulted = false;

    for attempt in attempt_plan(seasons) {
        if attempt.tier == FetchTier::RawHttp && !structured_faulted {
            continue;
        }
        match run_attempt(client, &attempt, player_id) {
            TierOutcome::Rows(bundle) => return AcquisitionOutcome::Fetched(bundle),
            TierOutcome::NoRows => {
                last_fault = format!("player not found in {} season tables", attempt.season);
                structured_faulted = false;
            }
            TierOutcome::Fault(err) => {
                last_fault = format!("{} ({:?} tier): {err:#}", attempt.season, attempt.tier);
                structured_faulted = attempt.tier == FetchTier::Structured;
            }
        }
    }

    AcquisitionOutcome::Exhausted(last_fault)
}

fn run_attempt(client: &Client, attempt: &Attempt, player_id: u32) -> TierOutcome {
    let mut bundle = RawStatBundle {
        season: attempt.season.clone(),
        ..Default::default()
    };

    match attempt.tier {
        FetchTier::Structured => {
            // One bad table fails the whole tier: the structured client is
            // trusted to be all-or-nothing per season.
            for measure in MEASURE_TYPES {
                let table = match fetch_table_structured(client, &attempt.season, measure) {
                    Ok(table) => table,
                    Err(err) => return TierOutcome::Fault(err),
                };
                bundle.set(measure, table.first_row_for_player(player_id));
            }
        }
        FetchTier::RawHttp => {
            // The raw tier tolerates partial outages: any table that
            // arrives is usable, and the tier only faults when all three
            // requests fail.
            let mut last_err: Option<anyhow::Error> = None;
            let mut fetched = 0usize;
            for measure in MEASURE_TYPES {
                match fetch_table_raw(client, &attempt.season, measure) {
                    Ok(table) => {
                        fetched += 1;
                        bundle.set(measure, table.first_row_for_player(player_id));
                    }
                    Err(err) => last_err = Some(err),
                }
            }
            if fetched == 0 {
                let err = last_err.unwrap_or_else(|| anyhow!("no measure types requested"));
                return TierOutcome::Fault(err);
            }
        }
    }

    if bundle.has_any_row() {
        TierOutcome::Rows(bundle)
    } else {
        TierOutcome::NoRows
    }
}

fn stats_endpoint() -> String {
    env::var("NBA_STATS_URL")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| STATS_ENDPOINT.to_string())
}

fn season_query<'a>(season: &'a str, measure: &'a str) -> [(&'static str, &'a str); 4] {
    [
        ("Season", season),
        ("SeasonType", "Regular Season"),
        ("PerMode", "PerGame"),
        ("MeasureType", measure),
    ]
}

fn fetch_table_structured(client: &Client, season: &str, measure: &str) -> Result<StatTable> {
    let resp = client
        .get(stats_endpoint())
        .query(&season_query(season, measure))
        .header(USER_AGENT, "Mozilla/5.0")
        .send()
        .context("request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow!("http {status}"));
    }
    parse_stats_response_json(&body)
}

fn fetch_table_raw(client: &Client, season: &str, measure: &str) -> Result<StatTable> {
    let mut req = client.get(stats_endpoint()).query(&season_query(season, measure));
    for (name, value) in BROWSER_HEADERS {
        req = req.header(*name, *value);
    }
    let resp = req.send().context("request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow!("http {status}"));
    }
    parse_stats_table_json(&body)
}

#[derive(Debug, Deserialize)]
struct StatsResponse {
    #[serde(rename = "resultSets", default)]
    result_sets: Vec<ResultSet>,
}

#[derive(Debug, Deserialize)]
struct ResultSet {
    #[serde(default)]
    headers: Vec<String>,
    #[serde(rename = "rowSet", default)]
    row_set: Vec<Vec<Value>>,
}

/// Structured-tier parse: typed deserialization of the leaguedash payload.
pub fn parse_stats_response_json(raw: &str) -> Result<StatTable> {
    let parsed =
        serde_json::from_str::<StatsResponse>(raw).context("invalid leaguedash json")?;
    let set = parsed
        .result_sets
        .into_iter()
        .next()
        .context("leaguedash payload has no result sets")?;
    Ok(StatTable {
        headers: set.headers,
        rows: set.row_set,
    })
}

/// Raw-tier parse: generic traversal of whatever tabular payload came
/// back. A missing or empty table shape is a fault here, not an empty
/// success, so the orchestrator can fall through to the next attempt.
pub fn parse_stats_table_json(raw: &str) -> Result<StatTable> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(anyhow!("empty stats payload"));
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid stats payload")?;
    let set = root
        .get("resultSets")
        .and_then(Value::as_array)
        .and_then(|sets| sets.first())
        .context("stats payload has no result sets")?;

    let headers = set
        .get("headers")
        .and_then(Value::as_array)
        .context("result set has no headers")?
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect::<Vec<_>>();

    let rows = set
        .get("rowSet")
        .and_then(Value::as_array)
        .context("result set has no rows")?
        .iter()
        .filter_map(Value::as_array)
        .map(|row| row.to_vec())
        .collect::<Vec<_>>();

    Ok(StatTable { headers, rows })
}
