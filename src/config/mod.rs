// src/config/mod.rs
//! Static configuration: endpoints, limits, output layout and LLM settings.

pub mod ai;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub use ai::LlmConfig;

pub const ENV_CONFIG_PATH: &str = "FAAB_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/faab.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub sleeper: SleeperConfig,
    pub news: NewsConfig,
    pub writer: WriterConfig,
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SleeperConfig {
    pub base_url: String,
    pub trending_type: String,
    pub season_type: String,
    /// Trend limit used when the caller does not ask for a specific size.
    pub max_trending: usize,
    pub timeout_secs: u64,
}

impl Default for SleeperConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.sleeper.app/v1".to_string(),
            trending_type: "add".to_string(),
            season_type: "regular".to_string(),
            max_trending: 40,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    pub espn_news_url: String,
    pub google_news_url: String,
    pub max_headlines: usize,
    pub timeout_secs: u64,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            espn_news_url: "https://site.api.espn.com/apis/site/v2/sports/football/nfl/news"
                .to_string(),
            google_news_url: "https://news.google.com/rss/search".to_string(),
            max_headlines: 3,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    pub blog_title: String,
    pub output_dir: PathBuf,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            blog_title: "Weekly FAAB Watch".to_string(),
            output_dir: PathBuf::from("content/posts"),
        }
    }
}

impl AppConfig {
    /// Load from an explicit TOML path, then apply env overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        let mut cfg: AppConfig = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        cfg.llm.apply_env_overrides();
        Ok(cfg)
    }

    /// Load using env var + fallbacks:
    /// 1) $FAAB_CONFIG_PATH (must exist)
    /// 2) config/faab.toml
    /// 3) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
        }
        let default_p = PathBuf::from(DEFAULT_CONFIG_PATH);
        if default_p.exists() {
            return Self::load_from(&default_p);
        }
        let mut cfg = AppConfig::default();
        cfg.llm.apply_env_overrides();
        Ok(cfg)
    }
}
