use metrics::describe_counter;
use once_cell::sync::OnceCell;

/// One-time counter registration so series carry help text under any recorder.
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "trend_profiles_skipped_total",
            "Trending ids dropped because they are unknown or not players."
        );
        describe_counter!(
            "news_strategy_errors_total",
            "Headline provider fetch/parse errors."
        );
        describe_counter!(
            "news_fallback_total",
            "Times a lower-priority headline provider was consulted."
        );
        describe_counter!(
            "llm_fallback_total",
            "LLM calls replaced by the heuristic or a fixed fallback."
        );
        describe_counter!("posts_published_total", "Posts written to disk.");
    });
}
