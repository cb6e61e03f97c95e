// src/ingest/mod.rs
pub mod providers;
pub mod types;

use anyhow::Result;
use metrics::counter;
use tracing::{info, warn};

use crate::config::NewsConfig;
use crate::ingest::providers::{espn::EspnNewsProvider, google_rss::GoogleNewsProvider};
use crate::ingest::types::NewsStrategy;
use crate::models::{NewsItem, Profile};

/// Normalize text: decode entities, strip tags, collapse whitespace.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, " ").to_string();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").trim().to_string();

    // 5) Length cap: 1500 chars
    if out.chars().count() > 1500 {
        out = out.chars().take(1500).collect();
    }

    out
}

/// Ordered headline strategies; the first tier that yields items wins.
pub struct NewsAggregator {
    strategies: Vec<Box<dyn NewsStrategy>>,
    max_headlines: usize,
}

impl NewsAggregator {
    pub fn new(strategies: Vec<Box<dyn NewsStrategy>>, max_headlines: usize) -> Self {
        Self {
            strategies,
            max_headlines,
        }
    }

    /// ESPN per-athlete news, then Google News keyword search.
    pub fn from_config(cfg: &NewsConfig) -> Result<Self> {
        let http = providers::news_http_client(cfg)?;
        let strategies: Vec<Box<dyn NewsStrategy>> = vec![
            Box::new(EspnNewsProvider::new(http.clone(), cfg.espn_news_url.clone())),
            Box::new(GoogleNewsProvider::new(http, cfg.google_news_url.clone())),
        ];
        Ok(Self::new(strategies, cfg.max_headlines))
    }

    /// Never fails: an empty list is a valid outcome.
    pub async fn fetch(&self, profile: &Profile) -> Vec<NewsItem> {
        let mut tried_earlier_tier = false;
        for strategy in &self.strategies {
            if !strategy.applies_to(profile) {
                continue;
            }
            if tried_earlier_tier {
                counter!("news_fallback_total").increment(1);
            }
            tried_earlier_tier = true;

            match strategy.fetch(profile, self.max_headlines).await {
                Ok(mut items) if !items.is_empty() => {
                    items.truncate(self.max_headlines);
                    info!(
                        player = %profile.name,
                        provider = strategy.name(),
                        count = items.len(),
                        "collected headlines"
                    );
                    return items;
                }
                Ok(_) => {
                    info!(player = %profile.name, provider = strategy.name(), "no headlines");
                }
                Err(e) => {
                    warn!(player = %profile.name, provider = strategy.name(), error = ?e, "headline provider failed");
                    counter!("news_strategy_errors_total").increment(1);
                }
            }
        }
        Vec::new()
    }
}
