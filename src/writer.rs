//! Assembles evaluated players into a titled post.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::analyze::{SharedAnalyst, TextGenerator};
use crate::models::{Evaluation, Post};

const INTRO_PLAYERS: usize = 5;

pub const OUTRO_FALLBACK: &str = "As always, tailor your bids to league depth and roster needs. We'll revisit these moves in next week's FAAB report.";

pub struct NarrativeComposer {
    analyst: SharedAnalyst,
}

impl NarrativeComposer {
    pub fn new(analyst: SharedAnalyst) -> Self {
        Self { analyst }
    }

    pub async fn compose(&self, evaluations: Vec<Evaluation>) -> Post {
        self.compose_at(evaluations, Utc::now()).await
    }

    /// Title, slug and intro date all derive from `now`.
    pub async fn compose_at(&self, evaluations: Vec<Evaluation>, now: DateTime<Utc>) -> Post {
        let date_str = now.format("%B %d, %Y").to_string();
        let slug = now.format("faab-top-adds-%Y-%m-%d").to_string().to_lowercase();
        let title = format!("FAAB Top Adds for {date_str}");

        let intro = self.intro(&evaluations, &date_str).await;
        let outro = self.outro().await;
        info!(%title, players = evaluations.len(), "composed blog post");

        Post {
            title,
            slug,
            created_at: now,
            intro,
            evaluations,
            outro,
        }
    }

    async fn intro(&self, evaluations: &[Evaluation], date_str: &str) -> String {
        let names = intro_players(evaluations);
        let fallback = intro_fallback(&names, date_str);
        let user = format!(
            "Write an energetic 2-3 sentence introduction for a blog post summarizing this week's FAAB pickups. Mention the date and at least two of the key players: {names}. Date: {date_str}."
        );
        self.analyst
            .draft_section(
                "You are a fantasy football writer with a conversational tone.",
                &user,
                &fallback,
            )
            .await
    }

    async fn outro(&self) -> String {
        self.analyst
            .draft_section(
                "You are a seasoned fantasy football analyst.",
                "Write a short closing paragraph (2 sentences) reminding readers to stay flexible with their FAAB bids and teasing next week's update.",
                OUTRO_FALLBACK,
            )
            .await
    }
}

/// First five names, comma-joined, or a generic placeholder.
pub fn intro_players(evaluations: &[Evaluation]) -> String {
    let names: Vec<&str> = evaluations
        .iter()
        .take(INTRO_PLAYERS)
        .map(|e| e.profile().name.as_str())
        .collect();
    if names.is_empty() {
        "waiver-wire targets".to_string()
    } else {
        names.join(", ")
    }
}

pub fn intro_fallback(players: &str, date_str: &str) -> String {
    format!(
        "FAAB season rolls on heading into {date_str}. Managers are flocking to {players} in most leagues right now."
    )
}
