// src/publish/render.rs
//! Markdown post and HTML listing rendering.

use std::fmt::Write as _;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::decision::Recommendation;
use crate::models::{Evaluation, IndexEntry, Post};

pub fn render_post(post: &Post) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "---");
    let _ = writeln!(out, "title: \"{}\"", post.title.replace('"', "\\\""));
    let _ = writeln!(out, "slug: {}", post.slug);
    let _ = writeln!(out, "date: {}", post.created_at.to_rfc3339());
    let _ = writeln!(out, "---");
    let _ = writeln!(out);
    let _ = writeln!(out, "# {}", post.title);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", post.intro.trim());

    for (i, eval) in post.evaluations.iter().enumerate() {
        let _ = writeln!(out);
        render_evaluation(&mut out, i + 1, eval);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "---");
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", post.outro.trim());
    out
}

fn render_evaluation(out: &mut String, rank: usize, eval: &Evaluation) {
    let p = eval.profile();
    let label = match (p.position.as_deref(), p.team.as_deref()) {
        (Some(pos), Some(team)) => format!(" ({pos}, {team})"),
        (Some(pos), None) => format!(" ({pos}, FA)"),
        (None, Some(team)) => format!(" ({team})"),
        (None, None) => String::new(),
    };
    let verdict = match eval.decision.recommendation {
        Recommendation::Buy => "BUY",
        Recommendation::Pass => "PASS",
    };

    let _ = writeln!(out, "## {rank}. {}{label}", p.name);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "**Recommendation:** {verdict} ({:.0}% confidence)",
        eval.decision.confidence * 100.0
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", eval.research.summary.trim());

    if !eval.research.context_points.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "**Context**");
        let _ = writeln!(out);
        for point in &eval.research.context_points {
            let _ = writeln!(out, "- {point}");
        }
    }

    if !eval.research.headlines.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "**Headlines**");
        let _ = writeln!(out);
        for h in &eval.research.headlines {
            let title = if h.link.is_empty() {
                h.title.clone()
            } else {
                format!("[{}]({})", h.title, h.link)
            };
            match h.published_at {
                Some(ts) => {
                    let _ = writeln!(out, "- {title} | {} ({})", h.source, ts.format("%b %d"));
                }
                None => {
                    let _ = writeln!(out, "- {title} | {}", h.source);
                }
            }
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "**Why:** {}", eval.decision.rationale.trim());
}

pub fn render_index(blog_title: &str, entries: &[IndexEntry]) -> String {
    let title = encode_text(blog_title);
    let mut out = String::new();
    let _ = writeln!(out, "<!DOCTYPE html>");
    let _ = writeln!(out, "<html lang=\"en\">");
    let _ = writeln!(out, "<head>");
    let _ = writeln!(out, "  <meta charset=\"utf-8\">");
    let _ = writeln!(out, "  <title>{title}</title>");
    let _ = writeln!(out, "</head>");
    let _ = writeln!(out, "<body>");
    let _ = writeln!(out, "  <h1>{title}</h1>");
    if entries.is_empty() {
        let _ = writeln!(out, "  <p>No posts yet.</p>");
    } else {
        let _ = writeln!(out, "  <ul>");
        for e in entries {
            let _ = writeln!(
                out,
                "    <li><a href=\"{}\">{}</a> <time datetime=\"{}\">{}</time></li>",
                encode_double_quoted_attribute(&e.path),
                encode_text(&e.title),
                e.created_at.to_rfc3339(),
                e.created_at.format("%Y-%m-%d"),
            );
        }
        let _ = writeln!(out, "  </ul>");
    }
    let _ = writeln!(out, "</body>");
    let _ = writeln!(out, "</html>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn index_escapes_titles_and_paths() {
        let entries = vec![IndexEntry {
            title: "Adds <&> Drops".into(),
            slug: "s".into(),
            created_at: Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap(),
            path: "posts/a\"b.md".into(),
        }];
        let html = render_index("FAAB & Friends", &entries);
        assert!(html.contains("<title>FAAB &amp; Friends</title>"));
        assert!(html.contains("Adds &lt;&amp;&gt; Drops"));
        assert!(html.contains("href=\"posts/a&quot;b.md\""));
        assert!(html.contains(">2026-10-16</time>"));
    }

    #[test]
    fn empty_index_renders_placeholder() {
        assert!(render_index("Blog", &[]).contains("No posts yet."));
    }
}
