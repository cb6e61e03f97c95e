// src/ingest/types.rs
use anyhow::Result;

use crate::models::{NewsItem, Profile};

/// One tier of the headline fallback chain.
#[async_trait::async_trait]
pub trait NewsStrategy: Send + Sync {
    /// Whether this tier can serve the profile at all (e.g. needs an external id).
    fn applies_to(&self, _profile: &Profile) -> bool {
        true
    }

    /// Up to `max` items in source order (most relevant / newest first).
    async fn fetch(&self, profile: &Profile, max: usize) -> Result<Vec<NewsItem>>;

    fn name(&self) -> &'static str;
}
