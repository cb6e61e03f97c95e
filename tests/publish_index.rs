// tests/publish_index.rs
use std::fs;

use chrono::{DateTime, Duration, TimeZone, Utc};
use faab_blogger::models::Post;
use faab_blogger::publish::PostStore;

fn post(slug: &str, title: &str, created_at: DateTime<Utc>) -> Post {
    Post {
        title: title.into(),
        slug: slug.into(),
        created_at,
        intro: "Intro.".into(),
        evaluations: Vec::new(),
        outro: "Outro.".into(),
    }
}

#[test]
fn publish_writes_post_index_and_listing() {
    let site = tempfile::tempdir().unwrap();
    let store = PostStore::new(site.path().join("posts"), "Weekly FAAB Watch");
    let t = Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap();

    let path = store
        .publish(&post("faab-top-adds-2026-10-16", "FAAB Top Adds for October 16, 2026", t))
        .unwrap();

    assert_eq!(path, site.path().join("posts/faab-top-adds-2026-10-16.md"));
    let md = fs::read_to_string(&path).unwrap();
    assert!(md.contains("# FAAB Top Adds for October 16, 2026"));
    assert!(md.contains("Intro."));

    let entries = store.load_index();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path, "posts/faab-top-adds-2026-10-16.md");

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(store.index_path()).unwrap()).unwrap();
    assert_eq!(raw[0]["created_at"], "2026-10-16T09:00:00Z");

    let html = fs::read_to_string(site.path().join("index.html")).unwrap();
    assert!(html.contains("<title>Weekly FAAB Watch</title>"));
    assert!(html.contains("href=\"posts/faab-top-adds-2026-10-16.md\""));
}

#[test]
fn republishing_same_slug_keeps_one_entry_with_latest_metadata() {
    let site = tempfile::tempdir().unwrap();
    let store = PostStore::new(site.path().join("posts"), "Blog");
    let t = Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap();

    store.publish(&post("s", "First take", t)).unwrap();
    store
        .publish(&post("s", "Second take", t + Duration::hours(3)))
        .unwrap();

    let entries = store.load_index();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].title, "Second take");
    assert_eq!(entries[0].created_at, t + Duration::hours(3));

    let html = fs::read_to_string(store.listing_path()).unwrap();
    assert!(html.contains("Second take"));
    assert!(!html.contains("First take"));
}

#[test]
fn reloaded_index_is_newest_first_without_duplicates() {
    let site = tempfile::tempdir().unwrap();
    let store = PostStore::new(site.path().join("posts"), "Blog");
    let base = Utc.with_ymd_and_hms(2026, 9, 1, 12, 0, 0).unwrap();

    for (slug, day) in [("b", 7), ("a", 0), ("d", 21), ("c", 14), ("a", 28)] {
        store
            .publish(&post(slug, slug, base + Duration::days(day)))
            .unwrap();
    }

    let entries = store.load_index();
    let slugs: Vec<&str> = entries.iter().map(|e| e.slug.as_str()).collect();
    assert_eq!(slugs, vec!["a", "d", "c", "b"]);
    assert!(entries
        .windows(2)
        .all(|w| w[0].created_at >= w[1].created_at));
}

#[test]
fn corrupt_index_is_treated_as_empty() {
    let site = tempfile::tempdir().unwrap();
    let store = PostStore::new(site.path().join("posts"), "Blog");
    fs::create_dir_all(site.path().join("posts")).unwrap();
    fs::write(store.index_path(), "{ not json").unwrap();
    assert!(store.load_index().is_empty());

    let t = Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap();
    store.publish(&post("fresh", "Fresh", t)).unwrap();
    assert_eq!(store.load_index().len(), 1);
}

#[test]
fn unreadable_entries_are_dropped_individually() {
    let site = tempfile::tempdir().unwrap();
    let store = PostStore::new(site.path().join("posts"), "Blog");
    fs::create_dir_all(site.path().join("posts")).unwrap();
    fs::write(
        store.index_path(),
        r#"[
  {"title": "Old", "slug": "old", "created_at": "2026-09-01T00:00:00Z", "path": "posts/old.md"},
  {"title": "Broken", "slug": "broken"}
]"#,
    )
    .unwrap();

    let entries = store.load_index();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].slug, "old");

    // Non-list JSON also reads as empty.
    fs::write(store.index_path(), r#"{"slug": "x"}"#).unwrap();
    assert!(store.load_index().is_empty());
}
