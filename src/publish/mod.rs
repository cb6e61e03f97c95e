// src/publish/mod.rs
//! Static publishing: post Markdown, `_posts.json` index, `index.html` listing.
//!
//! The index merge is read-modify-write with no locking; one publisher per
//! output directory at a time.

pub mod render;

use anyhow::{Context, Result};
use metrics::counter;
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::WriterConfig;
use crate::models::{IndexEntry, Post};

pub const INDEX_FILE: &str = "_posts.json";
pub const LISTING_FILE: &str = "index.html";

pub struct PostStore {
    output_dir: PathBuf,
    blog_title: String,
}

impl PostStore {
    pub fn new(output_dir: impl Into<PathBuf>, blog_title: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            blog_title: blog_title.into(),
        }
    }

    pub fn from_config(cfg: &WriterConfig) -> Self {
        Self::new(cfg.output_dir.clone(), cfg.blog_title.clone())
    }

    pub fn index_path(&self) -> PathBuf {
        self.output_dir.join(INDEX_FILE)
    }

    /// Directory the listing lives in; post paths are recorded relative to it.
    fn site_root(&self) -> &Path {
        self.output_dir.parent().unwrap_or(&self.output_dir)
    }

    pub fn listing_path(&self) -> PathBuf {
        self.site_root().join(LISTING_FILE)
    }

    /// Write the post, merge its entry into the index, regenerate the listing.
    pub fn publish(&self, post: &Post) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("creating {}", self.output_dir.display()))?;

        let post_path = self.output_dir.join(format!("{}.md", post.slug));
        info!(path = %post_path.display(), "publishing blog post");
        write_atomic(&post_path, &render::render_post(post))?;

        let relative = post_path
            .strip_prefix(self.site_root())
            .unwrap_or(&post_path)
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let entry = IndexEntry {
            title: post.title.clone(),
            slug: post.slug.clone(),
            created_at: post.created_at,
            path: relative,
        };

        let merged = merge_entries(self.load_index(), entry);
        let json = serde_json::to_string_pretty(&merged).context("serializing post index")?;
        write_atomic(&self.index_path(), &json)?;

        let listing = self.listing_path();
        info!(path = %listing.display(), entries = merged.len(), "updating index");
        write_atomic(&listing, &render::render_index(&self.blog_title, &merged))?;

        counter!("posts_published_total").increment(1);
        Ok(post_path)
    }

    /// Existing entries; missing or corrupt index reads as empty.
    pub fn load_index(&self) -> Vec<IndexEntry> {
        let path = self.index_path();
        if !path.exists() {
            return Vec::new();
        }
        let raw = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read posts metadata; starting fresh");
                return Vec::new();
            }
        };
        let items = match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(serde_json::Value::Array(items)) => items,
            Ok(_) => {
                warn!(path = %path.display(), "posts metadata is not a list; starting fresh");
                return Vec::new();
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to parse posts metadata; starting fresh");
                return Vec::new();
            }
        };
        items
            .into_iter()
            .filter_map(|v| match serde_json::from_value::<IndexEntry>(v) {
                Ok(e) => Some(e),
                Err(e) => {
                    warn!(error = %e, "dropping unreadable index entry");
                    None
                }
            })
            .collect()
    }
}

/// Replace any entry with the same slug, sort newest first, one entry per slug.
pub fn merge_entries(existing: Vec<IndexEntry>, new_entry: IndexEntry) -> Vec<IndexEntry> {
    let mut entries: Vec<IndexEntry> = existing
        .into_iter()
        .filter(|e| e.slug != new_entry.slug)
        .collect();
    entries.push(new_entry);
    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut seen = HashSet::new();
    entries.retain(|e| seen.insert(e.slug.clone()));
    entries
}

/// Write to a sibling temp file, then rename into place.
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let tmp = path.with_extension(match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{ext}.tmp"),
        None => "tmp".to_string(),
    });
    let mut f = fs::File::create(&tmp).with_context(|| format!("creating {}", tmp.display()))?;
    f.write_all(contents.as_bytes())
        .with_context(|| format!("writing {}", tmp.display()))?;
    f.sync_all()
        .with_context(|| format!("syncing {}", tmp.display()))?;
    drop(f);
    fs::rename(&tmp, path).with_context(|| format!("renaming into {}", path.display()))?;
    Ok(())
}
