//! Trending adds and the player directory.
//!
//! The directory is large (every NFL player Sleeper knows about) so it is
//! fetched at most once per `ProfileDirectory` and kept in memory for the
//! rest of the run. A failed first load is fatal; an unknown or unnamed id
//! is simply skipped.

use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::counter;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::config::SleeperConfig;
use crate::models::{Profile, Trend};

/// Raw directory: player id → loosely typed record.
pub type PlayerDirectory = HashMap<String, serde_json::Value>;

const METADATA_KEYS: [&str; 5] = ["age", "height", "weight", "years_exp", "news_updated"];

#[async_trait]
pub trait TrendSource: Send + Sync {
    /// Ranked trending adds, most-added first.
    async fn trending(&self, limit: usize) -> Result<Vec<Trend>>;
}

#[async_trait]
pub trait DirectorySource: Send + Sync {
    async fn load_directory(&self) -> Result<PlayerDirectory>;
}

/// Sleeper public API client (no auth).
pub struct SleeperClient {
    http: reqwest::Client,
    cfg: SleeperConfig,
}

impl SleeperClient {
    pub fn new(cfg: SleeperConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("faab-blogger/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("building sleeper http client")?;
        Ok(Self { http, cfg })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.cfg.base_url.trim_end_matches('/'), path);
        let resp = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?
            .error_for_status()
            .with_context(|| format!("GET {url} status"))?;
        resp.json::<T>()
            .await
            .with_context(|| format!("decoding {url}"))
    }
}

#[async_trait]
impl TrendSource for SleeperClient {
    async fn trending(&self, limit: usize) -> Result<Vec<Trend>> {
        let limit = if limit == 0 { self.cfg.max_trending } else { limit };
        info!(limit, "fetching trending adds from Sleeper");
        let path = format!("/players/nfl/trending/{}", self.cfg.trending_type);
        let trends: Vec<Trend> = self
            .get_json(
                &path,
                &[
                    ("season_type", self.cfg.season_type.clone()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;
        info!(count = trends.len(), "retrieved trending players");
        Ok(trends)
    }
}

#[async_trait]
impl DirectorySource for SleeperClient {
    async fn load_directory(&self) -> Result<PlayerDirectory> {
        info!("downloading Sleeper player directory (may take a moment)");
        let dir: PlayerDirectory = self.get_json("/players/nfl", &[]).await?;
        info!(entries = dir.len(), "loaded player directory");
        Ok(dir)
    }
}

/// Subset of a directory record that profiles are built from.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PlayerRecord {
    full_name: Option<String>,
    position: Option<String>,
    team: Option<String>,
    team_abbr: Option<String>,
    espn_id: Option<serde_json::Value>,
    injury_status: Option<String>,
    injury_notes: Option<String>,
    depth_chart_order: Option<serde_json::Value>,
}

/// Lazily loaded, cached player directory.
pub struct ProfileDirectory {
    source: Arc<dyn DirectorySource>,
    loaded: OnceCell<PlayerDirectory>,
}

impl ProfileDirectory {
    pub fn new(source: Arc<dyn DirectorySource>) -> Self {
        Self {
            source,
            loaded: OnceCell::new(),
        }
    }

    /// Directory contents, fetching on first use. Errors are not cached, but
    /// a successful load is never repeated.
    async fn directory(&self) -> Result<&PlayerDirectory> {
        self.loaded
            .get_or_try_init(|| async {
                self.source
                    .load_directory()
                    .await
                    .context("loading player directory")
            })
            .await
    }

    /// `Err` = directory unavailable; `Ok(None)` = unknown id or not a player.
    pub async fn resolve(&self, trend: &Trend) -> Result<Option<Profile>> {
        let directory = self.directory().await?;
        let Some(raw) = directory.get(&trend.player_id) else {
            warn!(player_id = %trend.player_id, "no player record found");
            return Ok(None);
        };
        let record = match PlayerRecord::deserialize(raw) {
            Ok(r) => r,
            Err(e) => {
                warn!(player_id = %trend.player_id, error = %e, "unreadable player record");
                return Ok(None);
            }
        };
        let Some(name) = record
            .full_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
        else {
            debug!(player_id = %trend.player_id, "skipping non-player entry");
            return Ok(None);
        };

        let metadata: BTreeMap<String, serde_json::Value> = METADATA_KEYS
            .iter()
            .filter_map(|k| {
                raw.get(*k)
                    .filter(|v| !v.is_null())
                    .map(|v| (k.to_string(), v.clone()))
            })
            .collect();

        Ok(Some(Profile {
            player_id: trend.player_id.clone(),
            name: name.to_string(),
            position: non_blank(record.position),
            team: non_blank(record.team).or_else(|| non_blank(record.team_abbr)),
            espn_id: lenient_int(record.espn_id.as_ref()),
            trending_count: trend.count,
            injury_status: non_blank(record.injury_status),
            injury_notes: non_blank(record.injury_notes),
            depth_chart_order: lenient_int(record.depth_chart_order.as_ref()),
            metadata,
        }))
    }

    /// Walk trends in rank order and keep the first `limit` that resolve.
    pub async fn profiles_from_trends(&self, trends: &[Trend], limit: usize) -> Result<Vec<Profile>> {
        let mut profiles = Vec::with_capacity(limit.min(trends.len()));
        for trend in trends {
            if profiles.len() >= limit {
                break;
            }
            match self.resolve(trend).await? {
                Some(p) => profiles.push(p),
                None => counter!("trend_profiles_skipped_total").increment(1),
            }
        }
        info!(count = profiles.len(), "prepared player profiles");
        Ok(profiles)
    }
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Integer or numeric string → i64; anything else → None.
fn lenient_int(v: Option<&serde_json::Value>) -> Option<i64> {
    match v? {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lenient_int_coerces_or_drops() {
        assert_eq!(lenient_int(Some(&json!(4262921))), Some(4262921));
        assert_eq!(lenient_int(Some(&json!(" 15847 "))), Some(15847));
        assert_eq!(lenient_int(Some(&json!("n/a"))), None);
        assert_eq!(lenient_int(Some(&json!(2.5))), None);
        assert_eq!(lenient_int(Some(&json!(null))), None);
        assert_eq!(lenient_int(None), None);
    }

    #[test]
    fn non_blank_trims() {
        assert_eq!(non_blank(Some(" KC ".into())).as_deref(), Some("KC"));
        assert_eq!(non_blank(Some("".into())), None);
    }
}
