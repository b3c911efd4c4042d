// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Classifier, static extractor and search provider against a local site

use crate::common::{spawn_site, test_client, FakeExtractor};
use axum::{
    extract::Query,
    http::StatusCode,
    response::Html,
    routing::get,
    Router,
};
use fabstir_research_node::retrieval::{
    ContentCache, ExtractionPipeline, MarkupClassifier, PageExtractor, RenderClassifier,
    RenderMode, StaticExtractor,
};
use fabstir_research_node::search::{
    GoogleSearchProvider, SearchProvider, SearchResult, SearchResultFetcher,
};
use fabstir_research_node::store::MemoryStore;
use fabstir_research_node::utils::NO_CONTENT;
use std::collections::HashMap;
use std::sync::Arc;

const ARTICLE_PAGE: &str = r#"<!doctype html>
<html><head><title>Report</title></head>
<body>
  <nav>Home | World | Science</nav>
  <article>
    <h1>Arctic ice at record low</h1>
    <p>Satellite data from September shows the smallest extent on record.</p>
  </article>
  <footer>(c) Example News</footer>
</body></html>"#;

const SPA_SHELL: &str = r#"<!doctype html>
<html><head><title>App</title></head>
<body><div id="root"></div><script src="/static/js/main.4f2a9c.js"></script></body></html>"#;

const EMPTY_PAGE: &str = "<html><body><div>Nothing in a content container</div></body></html>";

async fn serve_site() -> String {
    let app = Router::new()
        .route("/article", get(|| async { Html(ARTICLE_PAGE) }))
        .route("/spa", get(|| async { Html(SPA_SHELL) }))
        .route("/empty", get(|| async { Html(EMPTY_PAGE) }))
        .route("/missing", get(|| async { (StatusCode::NOT_FOUND, "gone") }))
        .route(
            "/broken-search",
            get(|| async { (StatusCode::TOO_MANY_REQUESTS, "unusual traffic") }),
        )
        .route(
            "/search",
            get(|q: Query<HashMap<String, String>>| async move {
                let query = q.get("q").cloned().unwrap_or_default();
                Html(format!(
                    r#"<html><body>
                      <div><a href="https://one.example/a"><h3>{} result one</h3></a></div>
                      <div><a href="/url?q=https://two.example/b&amp;sa=U"><h3>Result two</h3></a></div>
                      <div><a href="https://three.example/c"><h3>Result three</h3></a></div>
                    </body></html>"#,
                    query
                ))
            }),
        );
    spawn_site(app).await
}

#[tokio::test]
async fn test_classifier_over_http() {
    let base = serve_site().await;
    let classifier = MarkupClassifier::new(test_client());

    assert_eq!(
        classifier.classify(&format!("{}/article", base)).await,
        RenderMode::Static
    );
    assert_eq!(
        classifier.classify(&format!("{}/spa", base)).await,
        RenderMode::Dynamic
    );
    // Non-2xx is a fetch failure
    assert_eq!(
        classifier.classify(&format!("{}/missing", base)).await,
        RenderMode::Dynamic
    );
}

#[tokio::test]
async fn test_static_extraction_over_http() {
    let base = serve_site().await;
    let extractor = StaticExtractor::new(test_client());

    let text = extractor.extract(&format!("{}/article", base)).await;
    assert_eq!(
        text,
        "Arctic ice at record low Satellite data from September shows the smallest extent on record."
    );
    assert_eq!(extractor.extract(&format!("{}/missing", base)).await, NO_CONTENT);
    assert_eq!(extractor.extract(&format!("{}/empty", base)).await, NO_CONTENT);
}

#[tokio::test]
async fn test_google_provider_over_http() {
    let base = serve_site().await;
    let provider =
        GoogleSearchProvider::with_search_url(test_client(), &format!("{}/search", base), 5_000);

    let results = tokio_test::assert_ok!(provider.search("arctic ice", 2).await);
    assert_eq!(
        results,
        vec![
            SearchResult::new("arctic ice result one", "https://one.example/a"),
            SearchResult::new("Result two", "https://two.example/b"),
        ]
    );
}

#[tokio::test]
async fn test_fetcher_fails_open_over_http() {
    let base = serve_site().await;
    let provider = GoogleSearchProvider::with_search_url(
        test_client(),
        &format!("{}/broken-search", base),
        5_000,
    );
    let fetcher = SearchResultFetcher::new(Arc::new(provider));

    assert!(fetcher.fetch_top_results("anything", 3).await.is_empty());
}

#[tokio::test]
async fn test_pipeline_routes_real_pages() {
    let base = serve_site().await;
    let client = test_client();
    let dynamic = Arc::new(FakeExtractor::new("rendered"));

    let pipeline = ExtractionPipeline::new(
        ContentCache::with_defaults(Arc::new(MemoryStore::default())),
        Arc::new(MarkupClassifier::new(client.clone())),
        Arc::new(StaticExtractor::new(client)),
        dynamic.clone(),
    );

    let article = pipeline
        .extract_page(&SearchResult::new("Report", format!("{}/article", base)))
        .await;
    assert!(article.content.starts_with("Arctic ice at record low"));
    assert_eq!(dynamic.calls(), 0);

    let spa_url = format!("{}/spa", base);
    let spa = pipeline.extract_page(&SearchResult::new("App", spa_url.clone())).await;
    assert_eq!(spa.content, format!("rendered ({})", spa_url));
    assert_eq!(dynamic.calls(), 1);
}
