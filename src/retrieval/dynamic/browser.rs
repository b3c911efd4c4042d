// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Headless browser sessions
//!
//! Each extraction launches its own browser with a private profile
//! directory, so concurrent extractions never contend for a profile lock.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use std::path::PathBuf;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::retrieval::types::ExtractError;

/// Starts browser sessions
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, ExtractError>;
}

/// A live browser, scoped to one extraction
#[async_trait]
pub trait BrowserSession: Send {
    /// Navigate to `url`, wait for navigation to finish and return the
    /// rendered markup
    async fn render(&mut self, url: &str) -> Result<String, ExtractError>;

    /// Shut the browser down. Must be called on every exit path.
    async fn close(&mut self) -> Result<(), ExtractError>;
}

/// Launches headless Chromium through the DevTools protocol
#[derive(Debug, Clone, Default)]
pub struct ChromiumLauncher {
    chrome_executable: Option<PathBuf>,
}

impl ChromiumLauncher {
    /// `chrome_executable` overrides auto-detection of the Chrome binary
    pub fn new(chrome_executable: Option<PathBuf>) -> Self {
        Self { chrome_executable }
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, ExtractError> {
        let profile_dir = TempDir::new()
            .map_err(|e| ExtractError::Browser(format!("profile dir: {}", e)))?;

        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--no-first-run")
            .arg(format!("--user-agent={}", crate::utils::BROWSER_USER_AGENT))
            .user_data_dir(profile_dir.path());
        if let Some(path) = &self.chrome_executable {
            builder = builder.chrome_executable(path);
        }
        let config = builder
            .build()
            .map_err(|e| ExtractError::Browser(format!("browser config: {}", e)))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| ExtractError::Browser(format!("launch failed: {}", e)))?;

        // The handler drives the CDP connection and must be polled
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    let msg = e.to_string();
                    // Unknown CDP messages from newer Chrome builds are harmless
                    if msg.contains("did not match any variant") {
                        continue;
                    }
                    debug!("CDP handler stopped: {}", msg);
                    break;
                }
            }
        });

        info!("Launched headless browser");
        Ok(Box::new(ChromiumSession {
            browser,
            handler_task,
            _profile_dir: profile_dir,
        }))
    }
}

struct ChromiumSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    // Removed from disk when the session is dropped
    _profile_dir: TempDir,
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn render(&mut self, url: &str) -> Result<String, ExtractError> {
        let page = self
            .browser
            .new_page(url)
            .await
            .map_err(|e| ExtractError::Browser(format!("navigation to {} failed: {}", url, e)))?;

        page.wait_for_navigation()
            .await
            .map_err(|e| ExtractError::Browser(format!("waiting for {}: {}", url, e)))?;

        page.content()
            .await
            .map_err(|e| ExtractError::Browser(format!("reading content of {}: {}", url, e)))
    }

    async fn close(&mut self) -> Result<(), ExtractError> {
        let result = self
            .browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| ExtractError::Browser(format!("close failed: {}", e)));
        // Reap the child process even if the close command failed
        let _ = self.browser.wait().await;
        self.handler_task.abort();
        debug!("Browser session closed");
        result
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        self.handler_task.abort();
    }
}
