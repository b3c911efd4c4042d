// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Page pipeline and content cache behavior against the in-memory store

use crate::common::{
    page_url, FakeClassifier, FakeExtractor, FakeProvider, HangingLauncher, Harness,
    ScriptedModel,
};
use fabstir_research_node::retrieval::{ContentCache, DynamicExtractor};
use fabstir_research_node::search::SearchResult;
use fabstir_research_node::store::{KeyTtl, KvStore, MemoryStore};
use fabstir_research_node::utils::NO_CONTENT;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn harness() -> Harness {
    Harness::new(ScriptedModel::no_search("a"), FakeProvider::new(0))
}

#[tokio::test]
async fn test_cache_get_after_put_is_truncated_content() {
    let cache = ContentCache::new(
        Arc::new(MemoryStore::default()),
        1_000_000,
        Duration::from_secs(7 * 24 * 3600),
    );

    let short = "short page";
    cache.put("https://a.example", short).await;
    assert_eq!(cache.get("https://a.example").await.as_deref(), Some(short));

    let huge = "é".repeat(1_000_050);
    cache.put("https://b.example", &huge).await;
    let stored = cache.get("https://b.example").await.unwrap();
    assert_eq!(stored.chars().count(), 1_000_000);
    assert!(huge.starts_with(&stored));
}

#[tokio::test]
async fn test_cache_entry_layout() {
    let h = harness();
    let page = h
        .pipeline()
        .extract_page(&SearchResult::new("Doc", page_url(1)))
        .await;

    let key = format!("scrape:{}", page_url(1));
    assert_eq!(h.store.get(&key).await.unwrap(), Some(page.content));
    match h.store.ttl(&key).await.unwrap() {
        KeyTtl::Expires(left) => {
            assert!(left <= Duration::from_secs(604_800));
            assert!(left > Duration::from_secs(604_000));
        }
        other => panic!("expected 7-day expiry, got {:?}", other),
    }
}

#[tokio::test]
async fn test_cache_hit_skips_classification() {
    let classifier = FakeClassifier::all_static();
    let extractor = Arc::new(FakeExtractor::new("fresh"));
    let mut h = harness();
    h.classifier = classifier.clone();
    h.static_extractor = extractor.clone();

    h.store
        .set(&format!("scrape:{}", page_url(1)), "cached text", None)
        .await
        .unwrap();

    let page = h
        .pipeline()
        .extract_page(&SearchResult::new("Doc", page_url(1)))
        .await;
    assert_eq!(page.content, "cached text");
    assert_eq!(classifier.calls(), 0);
    assert_eq!(extractor.calls(), 0);
}

#[tokio::test]
async fn test_cache_hit_truncated_to_context_cap() {
    let h = harness();
    h.store
        .set(&format!("scrape:{}", page_url(1)), &"z".repeat(9_000), None)
        .await
        .unwrap();

    let page = h
        .pipeline()
        .extract_page(&SearchResult::new("Doc", page_url(1)))
        .await;
    assert_eq!(page.content.len(), 5_000);
}

#[tokio::test]
async fn test_fallback_text_is_not_cached() {
    let mut h = harness();
    h.static_extractor = Arc::new(FakeExtractor::new("x").with_text(&page_url(1), NO_CONTENT));

    let page = h
        .pipeline()
        .extract_page(&SearchResult::new("Doc", page_url(1)))
        .await;
    assert_eq!(page.content, NO_CONTENT);
    assert_eq!(
        h.store.get(&format!("scrape:{}", page_url(1))).await.unwrap(),
        None
    );
}

#[tokio::test]
async fn test_page_deadline_yields_fallback() {
    let mut h = harness();
    h.static_extractor = Arc::new(FakeExtractor::new("late").with_delay(Duration::from_secs(30)));

    let page = h
        .pipeline()
        .with_page_deadline(Duration::from_millis(100))
        .extract_page(&SearchResult::new("Slow", page_url(1)))
        .await;
    assert_eq!(page.content, NO_CONTENT);
    assert_eq!(page.title, "Slow");
}

#[tokio::test]
async fn test_page_deadline_shorter_than_navigation_closes_browser() {
    let launcher = Arc::new(HangingLauncher::default());
    let mut h = harness();
    h.classifier = FakeClassifier::dynamic_for(&[page_url(1)]);
    h.dynamic_extractor = Arc::new(DynamicExtractor::new(
        launcher.clone(),
        Duration::from_secs(20),
    ));

    let start = Instant::now();
    let page = h
        .pipeline()
        .with_page_deadline(Duration::from_millis(100))
        .extract_page(&SearchResult::new("Spa", page_url(1)))
        .await;

    assert_eq!(page.content, NO_CONTENT);
    assert!(start.elapsed() < Duration::from_secs(5));
    assert_eq!(launcher.closed.load(Ordering::SeqCst), 1);
    assert_eq!(launcher.live.load(Ordering::SeqCst), 0);
}
