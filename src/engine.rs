//! # Heuristic Engine
//! Pure, deterministic logic that maps `(profile, news)` → summary and
//! `(profile, summary)` → `Decision`. No I/O; used directly when no LLM is
//! configured and as the per-call fallback when an LLM call fails.
//!
//! Policy: trending volume drives a score in [0,1] (saturating at 150k adds),
//! damped by a real injury designation and by a deep depth-chart slot.
//! Score >= 0.5 is a BUY; confidence is reported for the chosen label.

use crate::decision::{Decision, Recommendation};
use crate::models::{NewsItem, Profile};

/// Trending adds at which the volume signal saturates.
pub const TRENDING_SATURATION: f64 = 150_000.0;
/// Injury designations that do not dampen the score.
pub const BENIGN_INJURY_STATUSES: [&str; 3] = ["Questionable", "None", "Healthy"];
pub const INJURY_MULTIPLIER: f64 = 0.6;
pub const DEPTH_MULTIPLIER: f64 = 0.7;
pub const BUY_THRESHOLD: f64 = 0.5;
/// Above this many adds a PASS still carries a deep-league stash note.
pub const STASH_CAVEAT_MIN_ADDS: u64 = 90_000;

pub const LIMITED_NEWS_PLACEHOLDER: &str = "- Limited news available; monitor practice reports.";

/// `- {title} ({source})` per headline, newline separated.
pub fn render_headline_bullets(headlines: &[NewsItem]) -> String {
    headlines
        .iter()
        .map(|h| format!("- {} ({})", h.title, h.source))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Header line, headline bullets (or placeholder), optional injury line.
pub fn heuristic_summary(profile: &Profile, headlines: &[NewsItem]) -> String {
    let team = profile.team.as_deref().unwrap_or("FA");
    let position = profile.position.as_deref().unwrap_or("");
    let label = format!("{team} {position}");

    let bullets = render_headline_bullets(headlines);
    let mut pieces = vec![
        format!("Top notes for {} ({}):", profile.name, label.trim()),
        if bullets.is_empty() {
            LIMITED_NEWS_PLACEHOLDER.to_string()
        } else {
            bullets
        },
    ];
    if let Some(status) = profile.injury() {
        let notes = profile.injury_notes.as_deref().unwrap_or("");
        pieces.push(format!("Injury status: {status}. {notes}").trim().to_string());
    }
    pieces.join("\n").trim().to_string()
}

/// Raw score plus the rationale clauses explaining each multiplier applied.
pub fn heuristic_score(profile: &Profile) -> (f64, Vec<String>) {
    let mut clauses = Vec::new();
    let mut score = (profile.trending_count as f64 / TRENDING_SATURATION).min(1.0);

    if let Some(status) = profile.injury() {
        if !BENIGN_INJURY_STATUSES.contains(&status) {
            score *= INJURY_MULTIPLIER;
            clauses.push(format!("Downgraded due to injury status ({status})."));
        }
    }
    if let Some(order) = profile.depth_chart_order.filter(|o| *o > 2) {
        score *= DEPTH_MULTIPLIER;
        clauses.push(format!("Depth chart order {order} lowers upside."));
    }
    (score, clauses)
}

/// Deterministic buy/pass decision. Same inputs always yield the same output.
pub fn heuristic_decision(profile: &Profile, summary: &str) -> Decision {
    let (score, clauses) = heuristic_score(profile);

    let recommendation = if score >= BUY_THRESHOLD {
        Recommendation::Buy
    } else {
        Recommendation::Pass
    };
    let confidence = match recommendation {
        Recommendation::Buy => round2(score),
        Recommendation::Pass => round2(1.0 - score),
    };

    let mut parts = Vec::with_capacity(clauses.len() + 2);
    parts.push(summary.to_string());
    parts.extend(clauses);
    if recommendation == Recommendation::Pass && profile.trending_count > STASH_CAVEAT_MIN_ADDS {
        parts.push("Could stash in deeper leagues despite recommendation.".to_string());
    }
    let rationale = parts.join(" ").trim().to_string();

    Decision::new(profile.clone(), recommendation, confidence, rationale)
}

/// Plain-text bullet points shown beside each player's write-up.
pub fn context_points(profile: &Profile) -> Vec<String> {
    let mut points = vec![format!(
        "Trending adds this week: {}",
        format_thousands(profile.trending_count)
    )];
    if let Some(status) = profile.injury() {
        let note = profile
            .injury_notes
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or("Monitor practice participation.");
        points.push(format!("Injury status: {status} ({note})"));
    }
    if let Some(order) = profile.depth_chart_order.filter(|o| *o != 0) {
        points.push(format!("Depth chart order: {order}"));
    }
    if let Some(years) = profile.metadata.get("years_exp").filter(|v| !v.is_null()) {
        let years = years
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| years.to_string());
        points.push(format!("Years of NFL experience: {years}"));
    }
    points
}

/// Two-decimal rounding of the exact binary value: `1.0 - 0.005` sits just
/// below 0.995 and rounds to 0.99, never up to 1.0.
fn round2(x: f64) -> f64 {
    format!("{x:.2}").parse().unwrap_or(x)
}

fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
