use faab_blogger::ingest::providers::google_rss::GoogleNewsProvider;

const GOOGLE_XML: &str = include_str!("fixtures/google_news.xml");

#[test]
fn google_fixture_parses_and_normalizes() {
    let items = GoogleNewsProvider::parse_feed(GOOGLE_XML, 3).expect("rss parse ok");
    assert_eq!(items.len(), 3);

    assert_eq!(items[0].source, "Yahoo Sports");
    assert_eq!(
        items[0].summary.as_deref(),
        Some("Rico Dowdle breaks out in Week 6 win Yahoo Sports")
    );
    assert_eq!(
        items[0].published_at.map(|t| t.to_rfc3339()).as_deref(),
        Some("2025-10-14T13:05:00+00:00")
    );

    // Missing <source> defaults; unparsable pubDate is dropped, not fatal.
    assert_eq!(items[1].source, "Google News");
    assert!(items[1].published_at.is_none());

    assert_eq!(items[2].source, "ESPN");
}

#[test]
fn google_garbage_is_an_error() {
    assert!(GoogleNewsProvider::parse_feed("{\"json\": true}", 3).is_err());
}
