// tests/profile_directory.rs
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use faab_blogger::models::Trend;
use faab_blogger::players::{DirectorySource, PlayerDirectory, ProfileDirectory};

const PLAYERS_JSON: &str = include_str!("fixtures/players.json");

/// Serves the fixture directory and counts loads.
struct FixtureDirectory {
    loads: AtomicUsize,
}

#[async_trait]
impl DirectorySource for FixtureDirectory {
    async fn load_directory(&self) -> Result<PlayerDirectory> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(serde_json::from_str(PLAYERS_JSON)?)
    }
}

struct DownDirectory;

#[async_trait]
impl DirectorySource for DownDirectory {
    async fn load_directory(&self) -> Result<PlayerDirectory> {
        Err(anyhow!("connection refused"))
    }
}

fn trend(id: &str, count: u64) -> Trend {
    Trend {
        player_id: id.to_string(),
        count,
    }
}

fn fixture() -> (Arc<FixtureDirectory>, ProfileDirectory) {
    let src = Arc::new(FixtureDirectory {
        loads: AtomicUsize::new(0),
    });
    let dir = ProfileDirectory::new(src.clone());
    (src, dir)
}

#[tokio::test]
async fn resolves_and_enriches_profile() {
    let (_src, dir) = fixture();
    let p = dir
        .resolve(&trend("4866", 120_000))
        .await
        .expect("directory available")
        .expect("known player");

    assert_eq!(p.name, "Rico Dowdle");
    assert_eq!(p.position.as_deref(), Some("RB"));
    assert_eq!(p.team.as_deref(), Some("DAL"));
    assert_eq!(p.espn_id, Some(4_038_815));
    assert_eq!(p.trending_count, 120_000);
    assert_eq!(p.injury_status, None);
    assert_eq!(p.depth_chart_order, Some(1));
    assert_eq!(p.metadata.get("years_exp"), Some(&serde_json::json!(5)));
    assert!(!p.metadata.contains_key("news_updated"));
}

#[tokio::test]
async fn unparseable_numbers_become_absent_and_team_falls_back() {
    let (_src, dir) = fixture();
    let p = dir.resolve(&trend("9997", 5)).await.unwrap().unwrap();
    assert_eq!(p.espn_id, None);
    assert_eq!(p.team.as_deref(), Some("NYJ"));
    assert_eq!(p.depth_chart_order, Some(3));
    assert_eq!(p.injury_status.as_deref(), Some("Out"));
}

#[tokio::test]
async fn unknown_and_non_player_entries_are_skipped() {
    let (_src, dir) = fixture();
    for id in ["nope", "DAL", "5555", "7777"] {
        let r = dir.resolve(&trend(id, 1)).await.expect("directory available");
        assert!(r.is_none(), "{id} should not resolve");
    }
}

#[tokio::test]
async fn selection_keeps_rank_order_and_stops_at_limit() {
    let (src, dir) = fixture();
    let trends = vec![
        trend("DAL", 200_000),
        trend("1234", 150_000),
        trend("nope", 140_000),
        trend("4866", 130_000),
        trend("9997", 120_000),
    ];

    let two = dir.profiles_from_trends(&trends, 2).await.unwrap();
    let names: Vec<&str> = two.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Healthy Starter", "Rico Dowdle"]);

    // Asking for more than can resolve yields min(N, resolvable).
    let all = dir.profiles_from_trends(&trends, 10).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[2].name, "Backup Receiver");

    // Directory fetched exactly once across both walks.
    assert_eq!(src.loads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn zero_limit_does_not_touch_directory() {
    let (src, dir) = fixture();
    let out = dir.profiles_from_trends(&[trend("4866", 1)], 0).await.unwrap();
    assert!(out.is_empty());
    assert_eq!(src.loads.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unavailable_directory_is_an_error_not_a_miss() {
    let dir = ProfileDirectory::new(Arc::new(DownDirectory));
    let err = dir
        .profiles_from_trends(&[trend("4866", 1)], 3)
        .await
        .expect_err("directory outage must propagate");
    assert!(format!("{err:#}").contains("loading player directory"));
}
