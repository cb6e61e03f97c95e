pub mod espn;
pub mod google_rss;

use anyhow::{Context, Result};
use std::time::Duration;

use crate::config::NewsConfig;

/// Shared HTTP client for the headline providers.
pub fn news_http_client(cfg: &NewsConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("faab-blogger/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(4))
        .timeout(Duration::from_secs(cfg.timeout_secs))
        .build()
        .context("building news http client")
}
