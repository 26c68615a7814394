use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, params};

use crate::rating_cache::app_cache_dir;
use crate::role_params::Role;
use crate::scoring::SubScores;

pub fn default_db_path() -> Option<PathBuf> {
    app_cache_dir().map(|dir| dir.join("ratings.sqlite"))
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let conn =
        Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        CREATE TABLE IF NOT EXISTS ratings_history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            player_name TEXT NOT NULL,
            role TEXT NOT NULL,
            overall INTEGER NOT NULL,
            sub_scores_json TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_ratings_player ON ratings_history(player_name);
        CREATE INDEX IF NOT EXISTS idx_ratings_created ON ratings_history(created_at);
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

#[derive(Debug, Clone)]
pub struct RatingHistoryEntry {
    pub player_name: String,
    pub role: String,
    pub overall: i32,
    pub sub_scores: SubScores,
    pub created_at: String,
}

/// Durably record one rating. The timestamp is assigned here, never by
/// the caller; storage faults propagate.
pub fn append_rating(
    conn: &Connection,
    player_name: &str,
    role: Role,
    overall: i32,
    scores: &SubScores,
) -> Result<i64> {
    let snapshot = serde_json::to_string(scores).context("serialize sub-score snapshot")?;
    let created_at = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO ratings_history (player_name, role, overall, sub_scores_json, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![player_name, role.label(), overall, snapshot, created_at],
    )
    .context("insert rating entry")?;
    Ok(conn.last_insert_rowid())
}

/// Up to `limit` most recent entries for a subject, newest first. The id
/// tie-break keeps same-second appends in insertion order.
pub fn recent_ratings(
    conn: &Connection,
    player_name: &str,
    limit: usize,
) -> Result<Vec<RatingHistoryEntry>> {
    let mut stmt = conn
        .prepare(
            "SELECT player_name, role, overall, sub_scores_json, created_at
             FROM ratings_history
             WHERE player_name = ?1
             ORDER BY created_at DESC, id DESC
             LIMIT ?2",
        )
        .context("prepare history query")?;

    let rows = stmt
        .query_map(params![player_name, limit as i64], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })
        .context("query rating history")?;

    let mut entries = Vec::new();
    for row in rows {
        let (player_name, role, overall, snapshot, created_at) =
            row.context("read rating history row")?;
        let sub_scores = serde_json::from_str::<SubScores>(&snapshot)
            .with_context(|| format!("parse sub-score snapshot for {player_name}"))?;
        entries.push(RatingHistoryEntry {
            player_name,
            role,
            overall: overall as i32,
            sub_scores,
            created_at,
        });
    }
    Ok(entries)
}
