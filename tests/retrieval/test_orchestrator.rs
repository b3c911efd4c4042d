// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! End-to-end retrieval scenarios with faked model, search and extractors

use crate::common::{page_url, CrashingLauncher, FakeClassifier, FakeExtractor, FakeProvider, Harness, ScriptedModel};
use fabstir_research_node::retrieval::{DynamicExtractor, Retrieval};
use fabstir_research_node::utils::NO_CONTENT;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_arithmetic_question_skips_search() {
    let provider = FakeProvider::new(3);
    let classifier = FakeClassifier::all_static();
    let extractor = Arc::new(FakeExtractor::new("unused"));

    let mut h = Harness::new(ScriptedModel::no_search("4"), provider.clone());
    h.classifier = classifier.clone();
    h.static_extractor = extractor.clone();

    let retrieval = h.retriever().retrieve(&[], "What is 2 + 2?").await;

    assert_eq!(retrieval, Retrieval::Passthrough("What is 2 + 2?".to_string()));
    assert_eq!(provider.calls(), 0);
    assert_eq!(classifier.calls(), 0);
    assert_eq!(extractor.calls(), 0);
}

#[tokio::test]
async fn test_climate_news_two_pages_in_order_concurrently() {
    let provider = FakeProvider::new(5);
    let extractor = Arc::new(
        FakeExtractor::new("body")
            .with_text(&page_url(1), "Emissions fell in 2024.")
            .with_text(&page_url(2), "Sea levels keep rising.")
            .with_delay(Duration::from_millis(200)),
    );

    let mut h = Harness::new(
        ScriptedModel::searching("latest climate change news", 2, "answer"),
        provider.clone(),
    );
    h.static_extractor = extractor.clone();

    let question = "What is the latest news on climate change?";
    let block = match h.retriever().retrieve(&[], question).await {
        Retrieval::Augmented { block, .. } => block,
        other => panic!("expected augmented retrieval, got {:?}", other),
    };

    assert_eq!(
        provider.requested.lock().unwrap().as_slice(),
        &[("latest climate change news".to_string(), 2)]
    );
    assert_eq!(block.pages.len(), 2);
    assert_eq!(block.pages[0].title, "Story 1");
    assert_eq!(block.pages[0].content, "Emissions fell in 2024.");
    assert_eq!(block.pages[1].title, "Story 2");
    assert_eq!(block.pages[1].content, "Sea levels keep rising.");
    assert_eq!(extractor.max_in_flight(), 2);

    let prompt = block.render();
    assert!(prompt.contains("found 2 results"));
    let first = prompt.find("<Web Page 1>").unwrap();
    let second = prompt.find("<Web Page 2>").unwrap();
    assert!(first < second);
    assert!(prompt.contains(question));
}

#[tokio::test]
async fn test_one_failing_page_keeps_both_entries() {
    let provider = FakeProvider::new(2);
    let extractor = Arc::new(
        FakeExtractor::new("body")
            .with_text(&page_url(1), "Good page")
            .with_text(&page_url(2), NO_CONTENT),
    );

    let mut h = Harness::new(ScriptedModel::searching("q", 2, "a"), provider);
    h.static_extractor = extractor;

    let retrieval = h.retriever().retrieve(&[], "q?").await;
    let Retrieval::Augmented { block, .. } = retrieval else {
        panic!("expected augmented retrieval");
    };

    assert_eq!(block.pages.len(), 2);
    assert_eq!(block.pages[0].content, "Good page");
    assert_eq!(block.pages[1].content, NO_CONTENT);
}

#[tokio::test]
async fn test_dynamic_render_failure_yields_fallback_and_closes_browser() {
    let launcher = Arc::new(CrashingLauncher::default());
    let live = launcher.live.clone();
    let launched = launcher.launched.clone();

    let mut h = Harness::new(ScriptedModel::searching("spa", 1, "a"), FakeProvider::new(1));
    h.classifier = FakeClassifier::dynamic_for(&[page_url(1)]);
    h.dynamic_extractor = Arc::new(DynamicExtractor::new(launcher, Duration::from_secs(5)));

    let Retrieval::Augmented { block, .. } = h.retriever().retrieve(&[], "spa?").await else {
        panic!("expected augmented retrieval");
    };

    assert_eq!(block.pages.len(), 1);
    assert_eq!(block.pages[0].content, "no content found");
    assert_eq!(launched.load(Ordering::SeqCst), 1);
    assert_eq!(live.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_zero_results_renders_empty_block() {
    let h = Harness::new(ScriptedModel::searching("nothing", 3, "a"), FakeProvider::new(0));

    let prompt = h.retriever().retrieve(&[], "obscure?").await.into_prompt();
    assert!(prompt.contains("found 0 results"));
    assert!(!prompt.contains("<Web Page"));
    assert!(prompt.contains("obscure?"));
}

#[tokio::test]
async fn test_fan_out_capped_at_five() {
    let provider = FakeProvider::new(10);
    let h = Harness::new(ScriptedModel::searching("many", 12, "a"), provider.clone());

    let Retrieval::Augmented { decision, block } = h.retriever().retrieve(&[], "many?").await else {
        panic!("expected augmented retrieval");
    };

    assert_eq!(decision.max_articles, 5);
    assert_eq!(provider.requested.lock().unwrap()[0].1, 5);
    assert_eq!(block.pages.len(), 5);
}

#[tokio::test]
async fn test_long_page_truncated_to_5000_chars() {
    let long: String = "abcdefghij".repeat(700);
    let mut h = Harness::new(ScriptedModel::searching("long", 1, "a"), FakeProvider::new(1));
    h.static_extractor = Arc::new(FakeExtractor::new("x").with_text(&page_url(1), &long));

    let Retrieval::Augmented { block, .. } = h.retriever().retrieve(&[], "long?").await else {
        panic!("expected augmented retrieval");
    };
    assert_eq!(block.pages[0].content, long[..5000]);
}

#[tokio::test]
async fn test_repeat_query_served_from_cache() {
    let classifier = FakeClassifier::all_static();
    let extractor = Arc::new(FakeExtractor::new("fresh"));
    let mut h = Harness::new(ScriptedModel::searching("q", 2, "a"), FakeProvider::new(2));
    h.classifier = classifier.clone();
    h.static_extractor = extractor.clone();
    let retriever = h.retriever();

    let first = retriever.retrieve(&[], "q?").await;
    let second = retriever.retrieve(&[], "q?").await;

    assert_eq!(first, second);
    assert_eq!(extractor.calls(), 2);
    assert_eq!(classifier.calls(), 2);
}

#[tokio::test]
async fn test_malformed_decision_is_passthrough() {
    let provider = FakeProvider::new(3);
    let h = Harness::new(ScriptedModel::new("Sure, let me search!", "a"), provider.clone());

    let retrieval = h.retriever().retrieve(&[], "news?").await;
    assert_eq!(retrieval.into_prompt(), "news?");
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_decision_sees_whole_conversation() {
    use fabstir_research_node::llm::ChatMessage;

    let model = ScriptedModel::no_search("a");
    let h = Harness::new(model.clone(), FakeProvider::new(0));
    let history = vec![
        ChatMessage::user("Tell me about Rust"),
        ChatMessage::assistant("Rust is a systems language."),
    ];
    h.retriever().retrieve(&history, "Who maintains it?").await;

    let requests = model.recorded();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].json_mode);
    assert_eq!(requests[0].messages.len(), 4);
    assert_eq!(requests[0].messages[1].content, "Tell me about Rust");
    assert_eq!(requests[0].messages[3].content, "Who maintains it?");
}
