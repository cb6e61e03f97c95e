//! Shared data model flowing through the pipeline:
//! `Trend` -> `Profile` -> `Research` -> `Evaluation` -> `Post` -> `IndexEntry`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::decision::Decision;

/// One trending-add row as returned by the trend source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trend {
    pub player_id: String,
    pub count: u64,
}

/// A trend resolved against the player directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub player_id: String,
    /// Never empty; unnamed directory entries are dropped before construction.
    pub name: String,
    pub position: Option<String>,
    pub team: Option<String>,
    /// ESPN athlete id used by the per-athlete news source.
    pub espn_id: Option<i64>,
    pub trending_count: u64,
    pub injury_status: Option<String>,
    pub injury_notes: Option<String>,
    pub depth_chart_order: Option<i64>,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl Profile {
    /// Minimal profile; everything optional left empty.
    pub fn new(player_id: impl Into<String>, name: impl Into<String>, trending_count: u64) -> Self {
        Self {
            player_id: player_id.into(),
            name: name.into(),
            position: None,
            team: None,
            espn_id: None,
            trending_count,
            injury_status: None,
            injury_notes: None,
            depth_chart_order: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Injury status, treating blank strings as absent.
    pub fn injury(&self) -> Option<&str> {
        self.injury_status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub source: String,
    pub title: String,
    pub link: String,
    pub published_at: Option<DateTime<Utc>>,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Research {
    pub profile: Profile,
    pub headlines: Vec<NewsItem>,
    pub context_points: Vec<String>,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub research: Research,
    pub decision: Decision,
}

impl Evaluation {
    pub fn profile(&self) -> &Profile {
        &self.research.profile
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub title: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub intro: String,
    pub evaluations: Vec<Evaluation>,
    pub outro: String,
}

/// Persisted metadata for one published post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub title: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub path: String,
}
