// src/ingest/providers/espn.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::ingest::normalize_text;
use crate::ingest::types::NewsStrategy;
use crate::models::{NewsItem, Profile};

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Article {
    headline: Option<String>,
    description: Option<String>,
    published: Option<String>,
    #[serde(rename = "lastModified")]
    last_modified: Option<String>,
    links: Option<Links>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Links {
    web: Option<Href>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Href {
    href: Option<String>,
}

/// RFC 3339, or ESPN's occasional minute-precision `2025-10-12T17:04Z`.
fn parse_espn_timestamp(ts: &str) -> Option<DateTime<Utc>> {
    let ts = ts.trim();
    DateTime::parse_from_rfc3339(ts)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%MZ")
                .ok()
                .map(|n| n.and_utc())
        })
}

/// Per-athlete news keyed by ESPN athlete id.
pub struct EspnNewsProvider {
    http: reqwest::Client,
    url: String,
}

impl EspnNewsProvider {
    pub fn new(http: reqwest::Client, url: String) -> Self {
        Self { http, url }
    }

    /// Parse an ESPN news body; articles without a headline are skipped.
    pub fn parse_articles(body: &str, max: usize) -> Result<Vec<NewsItem>> {
        let resp: NewsResponse = serde_json::from_str(body).context("parsing espn news json")?;
        let mut out = Vec::with_capacity(resp.articles.len().min(max));
        for article in resp.articles {
            if out.len() >= max {
                break;
            }
            let title = normalize_text(article.headline.as_deref().unwrap_or_default());
            if title.is_empty() {
                continue;
            }
            let published_at = article
                .published
                .as_deref()
                .or(article.last_modified.as_deref())
                .and_then(parse_espn_timestamp);
            let summary = article
                .description
                .as_deref()
                .map(normalize_text)
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| title.clone());
            let link = article
                .links
                .and_then(|l| l.web)
                .and_then(|w| w.href)
                .unwrap_or_default();
            out.push(NewsItem {
                source: "ESPN".to_string(),
                title,
                link,
                published_at,
                summary: Some(summary),
            });
        }
        Ok(out)
    }
}

#[async_trait]
impl NewsStrategy for EspnNewsProvider {
    fn applies_to(&self, profile: &Profile) -> bool {
        profile.espn_id.is_some()
    }

    async fn fetch(&self, profile: &Profile, max: usize) -> Result<Vec<NewsItem>> {
        let Some(espn_id) = profile.espn_id else {
            return Ok(Vec::new());
        };
        let body = self
            .http
            .get(&self.url)
            .query(&[("athlete", espn_id.to_string())])
            .send()
            .await
            .context("espn http get()")?
            .error_for_status()
            .context("espn http status")?
            .text()
            .await
            .context("espn http .text()")?;
        Self::parse_articles(&body, max)
    }

    fn name(&self) -> &'static str {
        "ESPN"
    }
}
