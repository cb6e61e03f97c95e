// src/ingest/providers/google_rss.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quick_xml::de::from_str;
use serde::Deserialize;
use time::{format_description::well_known::Rfc2822, OffsetDateTime};
use tracing::debug;

use crate::ingest::normalize_text;
use crate::ingest::types::NewsStrategy;
use crate::models::{NewsItem, Profile};

const DEFAULT_SOURCE: &str = "Google News";

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}
#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}
#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
    source: Option<SourceTag>,
}
/// `<source url="https://www.espn.com">ESPN</source>`
#[derive(Debug, Deserialize)]
struct SourceTag {
    #[serde(rename = "$text")]
    name: Option<String>,
}

fn parse_rfc2822(ts: &str) -> Option<DateTime<Utc>> {
    OffsetDateTime::parse(ts.trim(), &Rfc2822)
        .ok()
        .and_then(|dt| DateTime::from_timestamp(dt.unix_timestamp(), 0))
}

/// `name team position`, skipping absent parts.
pub fn keyword_query(profile: &Profile) -> String {
    let mut parts = vec![profile.name.as_str()];
    if let Some(team) = profile.team.as_deref() {
        parts.push(team);
    }
    if let Some(pos) = profile.position.as_deref() {
        parts.push(pos);
    }
    parts.join(" ")
}

/// Keyword search over the Google News RSS endpoint.
pub struct GoogleNewsProvider {
    http: reqwest::Client,
    url: String,
}

impl GoogleNewsProvider {
    pub fn new(http: reqwest::Client, url: String) -> Self {
        Self { http, url }
    }

    pub fn parse_feed(xml: &str, max: usize) -> Result<Vec<NewsItem>> {
        let xml_clean = scrub_html_entities_for_xml(xml);
        let rss: Rss = from_str(&xml_clean).context("parsing google news rss xml")?;

        let mut out = Vec::with_capacity(rss.channel.item.len().min(max));
        for it in rss.channel.item {
            if out.len() >= max {
                break;
            }
            let title = normalize_text(it.title.as_deref().unwrap_or_default());
            if title.is_empty() {
                continue;
            }
            let source = it
                .source
                .and_then(|s| s.name)
                .map(|s| normalize_text(&s))
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_SOURCE.to_string());
            let summary = it
                .description
                .as_deref()
                .map(normalize_text)
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| title.clone());

            out.push(NewsItem {
                source,
                title,
                link: it.link.unwrap_or_default().trim().to_string(),
                published_at: it.pub_date.as_deref().and_then(parse_rfc2822),
                summary: Some(summary),
            });
        }
        Ok(out)
    }
}

#[async_trait]
impl NewsStrategy for GoogleNewsProvider {
    async fn fetch(&self, profile: &Profile, max: usize) -> Result<Vec<NewsItem>> {
        let query = keyword_query(profile);
        debug!(%query, "querying google news rss");
        let body = self
            .http
            .get(&self.url)
            .query(&[
                ("q", query.as_str()),
                ("hl", "en-US"),
                ("gl", "US"),
                ("ceid", "US:en"),
            ])
            .send()
            .await
            .context("google news http get()")?
            .error_for_status()
            .context("google news http status")?
            .text()
            .await
            .context("google news http .text()")?;
        Self::parse_feed(&body, max)
    }

    fn name(&self) -> &'static str {
        "GoogleNews"
    }
}

fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}
