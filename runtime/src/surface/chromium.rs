// Copyright 2026 Slice Scanner Contributors
// SPDX-License-Identifier: Apache-2.0

//! Chromium-backed surface using chromiumoxide.

use super::{Driver, Element, Surface, SurfaceError};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element as CdpElement;
use chromiumoxide::page::Page;
use futures::StreamExt;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Find the Chromium binary path.
///
/// Lookup order: explicit path, `SLICE_SCANNER_CHROMIUM_PATH`,
/// `~/.slice-scanner/chromium/`, then the system `PATH`.
pub fn find_chromium(explicit: Option<&PathBuf>) -> Option<PathBuf> {
    if let Some(path) = explicit.filter(|p| p.exists()) {
        return Some(path.clone());
    }

    if let Ok(p) = std::env::var("SLICE_SCANNER_CHROMIUM_PATH") {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        let candidates = [
            home.join(".slice-scanner/chromium/chrome-linux64/chrome"),
            home.join(".slice-scanner/chromium/chrome"),
        ];
        if let Some(found) = candidates.into_iter().find(|c| c.exists()) {
            return Some(found);
        }
    }

    ["google-chrome", "chromium", "chromium-browser"]
        .into_iter()
        .find_map(|name| which::which(name).ok())
}

/// Headless Chromium driver. One browser process, one tab per session.
pub struct ChromiumDriver {
    browser: Browser,
    active_count: Arc<AtomicUsize>,
}

impl ChromiumDriver {
    /// Launch a headless Chromium instance.
    pub async fn launch(chrome_path: Option<&PathBuf>) -> Result<Self> {
        let chrome_path = find_chromium(chrome_path)
            .context("Chromium not found. Set SLICE_SCANNER_CHROMIUM_PATH.")?;

        let config = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking")
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build browser config: {e}"))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("failed to launch Chromium")?;

        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        Ok(Self {
            browser,
            active_count: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Number of currently open sessions.
    pub fn active_sessions(&self) -> usize {
        self.active_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Driver for ChromiumDriver {
    async fn new_session(&self) -> Result<Box<dyn Surface>> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .context("failed to create new page")?;

        self.active_count.fetch_add(1, Ordering::Relaxed);

        Ok(Box::new(ChromiumSurface {
            page,
            active_count: Arc::clone(&self.active_count),
        }))
    }

    async fn shutdown(&self) -> Result<()> {
        // Browser is dropped when ChromiumDriver is dropped
        Ok(())
    }
}

/// A single Chromium tab.
pub struct ChromiumSurface {
    page: Page,
    active_count: Arc<AtomicUsize>,
}

#[async_trait]
impl Surface for ChromiumSurface {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<()> {
        let result = tokio::time::timeout(timeout, self.page.goto(url)).await;

        match result {
            Ok(Ok(_)) => {
                let _ = self.page.wait_for_navigation().await;
                Ok(())
            }
            Ok(Err(e)) => Err(SurfaceError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            }
            .into()),
            Err(_) => Err(SurfaceError::Navigation {
                url: url.to_string(),
                reason: format!("timed out after {}ms", timeout.as_millis()),
            }
            .into()),
        }
    }

    async fn run_script(&self, script: &str) -> Result<Value> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| SurfaceError::Script(e.to_string()))?;
        Ok(result.value().cloned().unwrap_or(Value::Null))
    }

    async fn enumerate(&self, selector: &str) -> Result<Vec<Box<dyn Element>>> {
        let elements = self
            .page
            .find_elements(selector)
            .await
            .with_context(|| format!("enumerating {selector}"))?;
        Ok(wrap(elements))
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.active_count.fetch_sub(1, Ordering::Relaxed);
        let _ = self.page.close().await;
        Ok(())
    }
}

fn wrap(elements: Vec<CdpElement>) -> Vec<Box<dyn Element>> {
    elements
        .into_iter()
        .map(|inner| Box::new(ChromiumElement { inner }) as Box<dyn Element>)
        .collect()
}

/// An element handle inside a Chromium tab.
pub struct ChromiumElement {
    inner: CdpElement,
}

#[async_trait]
impl Element for ChromiumElement {
    async fn text(&self) -> Result<String> {
        let text = self
            .inner
            .inner_text()
            .await
            .context("failed to read element text")?;
        Ok(text.unwrap_or_default().trim().to_string())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        self.inner
            .attribute(name)
            .await
            .with_context(|| format!("failed to read attribute {name}"))
    }

    async fn click(&self) -> Result<()> {
        self.inner.click().await.context("click failed")?;
        Ok(())
    }

    async fn find_within(&self, selector: &str) -> Result<Vec<Box<dyn Element>>> {
        let elements = self
            .inner
            .find_elements(selector)
            .await
            .with_context(|| format!("enumerating {selector} within element"))?;
        Ok(wrap(elements))
    }

    async fn is_visible(&self) -> Result<bool> {
        let returns = self
            .inner
            .call_js_fn(
                "function() { return !!(this.offsetWidth || this.offsetHeight || this.getClientRects().length); }",
                false,
            )
            .await
            .context("visibility check failed")?;
        Ok(returns
            .result
            .value
            .and_then(|v| v.as_bool())
            .unwrap_or(false))
    }
}
