// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Shared fakes and builders for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use fabstir_research_node::{
    api::{AppState, ClientRateLimiter},
    chat::{ChatService, ChatSessionStore, DEFAULT_SESSION_TTL},
    llm::{ChatModel, CompletionRequest, LlmError},
    retrieval::{
        BrowserLauncher, BrowserSession, ContentCache, ExtractError, ExtractionPipeline,
        PageExtractor, RenderClassifier, RenderMode, Retriever,
    },
    search::{SearchError, SearchProvider, SearchResult, SearchResultFetcher},
    store::{KvStore, MemoryStore},
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const MODEL_ID: &str = "llama3-8b-8192";

/// Model fake: answers JSON-mode calls with `decision` and plain calls
/// with `answer`, recording every request
pub struct ScriptedModel {
    decision: String,
    answer: Result<String, ()>,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedModel {
    pub fn new(decision: &str, answer: &str) -> Arc<Self> {
        Arc::new(Self {
            decision: decision.to_string(),
            answer: Ok(answer.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing_answer(decision: &str) -> Arc<Self> {
        Arc::new(Self {
            decision: decision.to_string(),
            answer: Err(()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn no_search(answer: &str) -> Arc<Self> {
        Self::new(r#"{"search_needed": false}"#, answer)
    }

    pub fn searching(query: &str, max_articles: i64, answer: &str) -> Arc<Self> {
        Self::new(
            &format!(
                r#"{{"search_needed": true, "google_query": "{}", "max_articles": {}}}"#,
                query, max_articles
            ),
            answer,
        )
    }

    pub fn recorded(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        let json_mode = request.json_mode;
        self.requests.lock().unwrap().push(request);
        if json_mode {
            return Ok(self.decision.clone());
        }
        self.answer.clone().map_err(|_| LlmError::ApiError {
            status: 503,
            message: "model overloaded".to_string(),
        })
    }
}

/// Search fake returning `count` numbered results
pub struct FakeProvider {
    count: usize,
    pub calls: AtomicUsize,
    pub requested: Mutex<Vec<(String, usize)>>,
}

impl FakeProvider {
    pub fn new(count: usize) -> Arc<Self> {
        Arc::new(Self {
            count,
            calls: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub fn page_url(n: usize) -> String {
    format!("https://news.example.com/story-{}", n)
}

#[async_trait]
impl SearchProvider for FakeProvider {
    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<SearchResult>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested
            .lock()
            .unwrap()
            .push((query.to_string(), num_results));
        Ok((1..=self.count.min(num_results))
            .map(|n| SearchResult::new(format!("Story {}", n), page_url(n)))
            .collect())
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// Classifier fake: `Static` unless the URL is listed as dynamic
#[derive(Default)]
pub struct FakeClassifier {
    dynamic: Vec<String>,
    pub calls: AtomicUsize,
}

impl FakeClassifier {
    pub fn all_static() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn dynamic_for(urls: &[String]) -> Arc<Self> {
        Arc::new(Self {
            dynamic: urls.to_vec(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RenderClassifier for FakeClassifier {
    async fn classify(&self, url: &str) -> RenderMode {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.dynamic.iter().any(|u| u == url) {
            RenderMode::Dynamic
        } else {
            RenderMode::Static
        }
    }
}

/// Extractor fake with per-URL text, a fixed delay and in-flight tracking
pub struct FakeExtractor {
    texts: HashMap<String, String>,
    default_text: String,
    delay: Duration,
    pub calls: AtomicUsize,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl FakeExtractor {
    pub fn new(default_text: &str) -> Self {
        Self {
            texts: HashMap::new(),
            default_text: default_text.to_string(),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_text(mut self, url: &str, text: &str) -> Self {
        self.texts.insert(url.to_string(), text.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageExtractor for FakeExtractor {
    async fn extract(&self, url: &str) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.texts
            .get(url)
            .cloned()
            .unwrap_or_else(|| format!("{} ({})", self.default_text, url))
    }
}

/// Browser fake whose render always fails; counts open sessions
#[derive(Default)]
pub struct CrashingLauncher {
    pub launched: Arc<AtomicUsize>,
    pub live: Arc<AtomicUsize>,
}

struct CrashingSession {
    live: Arc<AtomicUsize>,
}

#[async_trait]
impl BrowserLauncher for CrashingLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, ExtractError> {
        self.launched.fetch_add(1, Ordering::SeqCst);
        self.live.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(CrashingSession {
            live: self.live.clone(),
        }))
    }
}

#[async_trait]
impl BrowserSession for CrashingSession {
    async fn render(&mut self, url: &str) -> Result<String, ExtractError> {
        Err(ExtractError::Browser(format!("page crashed while rendering {}", url)))
    }

    async fn close(&mut self) -> Result<(), ExtractError> {
        self.live.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Browser fake whose render never finishes; counts explicit closes
#[derive(Default)]
pub struct HangingLauncher {
    pub live: Arc<AtomicUsize>,
    pub closed: Arc<AtomicUsize>,
}

struct HangingSession {
    live: Arc<AtomicUsize>,
    closed: Arc<AtomicUsize>,
}

#[async_trait]
impl BrowserLauncher for HangingLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, ExtractError> {
        self.live.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(HangingSession {
            live: self.live.clone(),
            closed: self.closed.clone(),
        }))
    }
}

#[async_trait]
impl BrowserSession for HangingSession {
    async fn render(&mut self, _url: &str) -> Result<String, ExtractError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(String::new())
    }

    async fn close(&mut self) -> Result<(), ExtractError> {
        self.live.fetch_sub(1, Ordering::SeqCst);
        self.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Retrieval collaborators, kept so tests can inspect them afterwards
pub struct Harness {
    pub model: Arc<ScriptedModel>,
    pub provider: Arc<FakeProvider>,
    pub classifier: Arc<dyn RenderClassifier>,
    pub static_extractor: Arc<dyn PageExtractor>,
    pub dynamic_extractor: Arc<dyn PageExtractor>,
    pub store: Arc<MemoryStore>,
}

impl Harness {
    pub fn new(model: Arc<ScriptedModel>, provider: Arc<FakeProvider>) -> Self {
        Self {
            model,
            provider,
            classifier: FakeClassifier::all_static(),
            static_extractor: Arc::new(FakeExtractor::new("static text")),
            dynamic_extractor: Arc::new(FakeExtractor::new("dynamic text")),
            store: Arc::new(MemoryStore::default()),
        }
    }

    pub fn pipeline(&self) -> ExtractionPipeline {
        let store: Arc<dyn KvStore> = self.store.clone();
        ExtractionPipeline::new(
            ContentCache::with_defaults(store),
            self.classifier.clone(),
            self.static_extractor.clone(),
            self.dynamic_extractor.clone(),
        )
    }

    pub fn retriever(&self) -> Retriever {
        Retriever::new(
            self.model.clone(),
            MODEL_ID,
            SearchResultFetcher::new(self.provider.clone()),
            Arc::new(self.pipeline()),
        )
    }

    pub fn chat_service(&self) -> ChatService {
        let store: Arc<dyn KvStore> = self.store.clone();
        ChatService::new(
            self.retriever(),
            self.model.clone(),
            MODEL_ID,
            ChatSessionStore::new(store, DEFAULT_SESSION_TTL),
        )
    }

    pub fn app_state(&self, rate_limit: Option<u32>) -> AppState {
        let limiter = rate_limit
            .map(|n| Arc::new(ClientRateLimiter::new(n, Duration::from_secs(60))));
        AppState::new(self.chat_service(), limiter)
    }
}

/// Serve `app` on an ephemeral loopback port, returning its base URL
pub async fn spawn_site(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// HTTP client for loopback test servers
pub fn test_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}
