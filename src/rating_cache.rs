use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::pipeline::SourceKind;
use crate::stat_normalize::CanonicalPlayerStats;

const CACHE_VERSION: u32 = 1;
const CACHE_DIR: &str = "hoopgrade";
const CACHE_FILE: &str = "rating_cache.json";
const DEFAULT_TTL_SECS: u64 = 3600;

static CACHE: Mutex<Option<RatingCacheFile>> = Mutex::new(None);

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct RatingCacheFile {
    version: u32,
    entries: HashMap<String, CacheEntry>,
}

/// One cached acquisition outcome for a subject. Synthetic outcomes are
/// cached too: a provider outage should not be re-probed on every
/// request inside the TTL window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub stats: CanonicalPlayerStats,
    pub source: SourceKind,
    pub reason: Option<String>,
    pub fetched_at: u64,
}

pub fn cache_ttl() -> Duration {
    let secs = env::var("STATS_CACHE_TTL_SECS")
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .unwrap_or(DEFAULT_TTL_SECS);
    Duration::from_secs(secs)
}

pub fn lookup(subject_key: &str) -> Option<CacheEntry> {
    let entry = {
        let mut guard = CACHE.lock().expect("rating cache lock poisoned");
        let cache = guard.get_or_insert_with(load_cache_file);
        cache.entries.get(subject_key).cloned()
    }?;
    let now = system_time_to_secs(SystemTime::now())?;
    if is_fresh(entry.fetched_at, now, cache_ttl()) {
        Some(entry)
    } else {
        None
    }
}

pub fn store(
    subject_key: &str,
    stats: &CanonicalPlayerStats,
    source: SourceKind,
    reason: Option<&str>,
) {
    let entry = CacheEntry {
        stats: stats.clone(),
        source,
        reason: reason.map(str::to_string),
        fetched_at: system_time_to_secs(SystemTime::now()).unwrap_or_default(),
    };
    let mut guard = CACHE.lock().expect("rating cache lock poisoned");
    let cache = guard.get_or_insert_with(load_cache_file);
    cache.version = CACHE_VERSION;
    cache.entries.insert(subject_key.to_string(), entry);
    let _ = save_cache_file(cache);
}

fn is_fresh(fetched_at: u64, now: u64, ttl: Duration) -> bool {
    now.saturating_sub(fetched_at) < ttl.as_secs()
}

fn load_cache_file() -> RatingCacheFile {
    let Some(path) = cache_path() else {
        return RatingCacheFile::default();
    };
    let Ok(raw) = fs::read_to_string(path) else {
        return RatingCacheFile::default();
    };
    let cache = serde_json::from_str::<RatingCacheFile>(&raw).unwrap_or_default();
    if cache.version != CACHE_VERSION {
        return RatingCacheFile::default();
    }
    cache
}

fn save_cache_file(cache: &RatingCacheFile) -> Result<()> {
    let Some(path) = cache_path() else {
        return Ok(());
    };
    let Some(dir) = path.parent() else {
        return Ok(());
    };
    fs::create_dir_all(dir).ok();
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string(cache).context("serialize rating cache")?;
    fs::write(&tmp, json).context("write rating cache")?;
    fs::rename(&tmp, &path).context("swap rating cache")?;
    Ok(())
}

pub fn app_cache_dir() -> Option<PathBuf> {
    if let Ok(base) = env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(CACHE_DIR));
        }
    }
    let home = env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(CACHE_DIR))
}

fn cache_path() -> Option<PathBuf> {
    app_cache_dir().map(|dir| dir.join(CACHE_FILE))
}

fn system_time_to_secs(time: SystemTime) -> Option<u64> {
    time.duration_since(UNIX_EPOCH).ok().map(|d| d.as_secs())
}
