// Copyright 2026 Slice Scanner Contributors
// SPDX-License-Identifier: Apache-2.0

//! Interactive-surface abstraction.
//!
//! Defines the `Driver` and `Surface` traits that abstract over the browser
//! engine (currently Chromium via chromiumoxide). Vendor adapters only ever
//! talk to a `&mut dyn Surface`, so they can be exercised against fakes.

pub mod chromium;
#[cfg(test)]
pub(crate) mod fake;
pub mod script;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

/// Interval between condition probes inside [`Surface::wait_until`].
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Per-call wait budgets used by vendor adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Waiting for page furniture to appear.
    pub wait: Duration,
    /// Probing for things that usually are not there (dialogs, alerts).
    pub short_wait: Duration,
    /// Fixed pause after a script-driven commit.
    pub settle: Duration,
    /// Page navigation.
    pub navigation: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            wait: Duration::from_millis(3_000),
            short_wait: Duration::from_millis(500),
            settle: Duration::from_millis(400),
            navigation: Duration::from_millis(30_000),
        }
    }
}

/// Something to wait for on the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitCondition {
    /// At least one element matches the selector.
    Present(String),
    /// No element matches the selector.
    Cleared(String),
    /// The script expression evaluates truthy.
    Script(String),
}

impl WaitCondition {
    pub fn present(selector: impl Into<String>) -> Self {
        Self::Present(selector.into())
    }

    pub fn cleared(selector: impl Into<String>) -> Self {
        Self::Cleared(selector.into())
    }

    pub fn script(expr: impl Into<String>) -> Self {
        Self::Script(expr.into())
    }
}

impl fmt::Display for WaitCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present(s) => write!(f, "presence of `{s}`"),
            Self::Cleared(s) => write!(f, "absence of `{s}`"),
            Self::Script(s) => write!(f, "script `{s}`"),
        }
    }
}

/// Capability-level failures. Everything else travels as `anyhow::Error`.
#[derive(thiserror::Error, Debug)]
pub enum SurfaceError {
    #[error("timed out after {timeout_ms}ms waiting for {condition}")]
    Timeout { condition: String, timeout_ms: u64 },

    #[error("no element matches `{0}`")]
    NotFound(String),

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("script failed: {0}")]
    Script(String),

    #[error("surface unavailable: {0}")]
    Unavailable(String),
}

/// A handle to one element on the surface.
#[async_trait]
pub trait Element: Send + Sync {
    /// Rendered text content, trimmed.
    async fn text(&self) -> Result<String>;
    async fn attribute(&self, name: &str) -> Result<Option<String>>;
    async fn click(&self) -> Result<()>;
    /// Descendants matching `selector`, in document order.
    async fn find_within(&self, selector: &str) -> Result<Vec<Box<dyn Element>>>;
    async fn is_visible(&self) -> Result<bool>;
}

/// A live, stateful session on an interactive surface (one browser tab).
///
/// The session has no concurrent-access contract: one adapter drives it at a time.
#[async_trait]
pub trait Surface: Send + Sync {
    /// Navigate to a URL, failing if it does not load within `timeout`.
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<()>;

    /// Evaluate a script expression and return its JSON value (`null` for undefined).
    async fn run_script(&self, script: &str) -> Result<Value>;

    /// All elements matching `selector`, in document order. No match is an
    /// empty list; a failed query is an error.
    async fn enumerate(&self, selector: &str) -> Result<Vec<Box<dyn Element>>>;

    /// Release the session.
    async fn close(self: Box<Self>) -> Result<()>;

    /// First element matching `selector`.
    async fn first(&self, selector: &str) -> Result<Box<dyn Element>> {
        self.enumerate(selector)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| SurfaceError::NotFound(selector.to_string()).into())
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        Ok(self.enumerate(selector).await?.len())
    }

    async fn read_text(&self, selector: &str) -> Result<String> {
        self.first(selector).await?.text().await
    }

    async fn read_attribute(&self, selector: &str, name: &str) -> Result<Option<String>> {
        self.first(selector).await?.attribute(name).await
    }

    async fn click(&self, selector: &str) -> Result<()> {
        self.first(selector).await?.click().await
    }

    /// Select the option at `index` of a `<select>` and fire its change event.
    async fn select_dropdown(&self, selector: &str, index: usize) -> Result<()> {
        let selected = self
            .run_script(&script::select_option(selector, index))
            .await?;
        if selected.as_bool() == Some(true) {
            Ok(())
        } else {
            Err(SurfaceError::NotFound(format!("{selector} option {index}")).into())
        }
    }

    /// Evaluate a condition once.
    async fn probe(&self, condition: &WaitCondition) -> Result<bool> {
        match condition {
            WaitCondition::Present(s) => Ok(self.count(s).await? > 0),
            WaitCondition::Cleared(s) => Ok(self.count(s).await? == 0),
            WaitCondition::Script(expr) => Ok(truthy(&self.run_script(expr).await?)),
        }
    }

    /// Poll `condition` until it holds or `timeout` elapses. Returns whether it held.
    ///
    /// Probe errors count as "not yet": the page may be mid-navigation.
    async fn wait_until(&self, condition: &WaitCondition, timeout: Duration) -> Result<bool> {
        let deadline = Instant::now() + timeout;
        loop {
            match self.probe(condition).await {
                Ok(true) => return Ok(true),
                Ok(false) => {}
                Err(e) => tracing::debug!("probe for {condition} failed: {e:#}"),
            }
            let now = Instant::now();
            if now >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(POLL_INTERVAL.min(deadline - now)).await;
        }
    }
}

/// Wait for `condition`, turning exhaustion into [`SurfaceError::Timeout`].
pub async fn require(
    surface: &dyn Surface,
    condition: &WaitCondition,
    timeout: Duration,
) -> Result<()> {
    if surface.wait_until(condition, timeout).await? {
        Ok(())
    } else {
        Err(SurfaceError::Timeout {
            condition: condition.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        }
        .into())
    }
}

/// JavaScript truthiness of a returned JSON value.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A browser engine that can open surface sessions.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Open a new session (tab).
    async fn new_session(&self) -> Result<Box<dyn Surface>>;
    /// Shut down the engine.
    async fn shutdown(&self) -> Result<()>;
}

/// A driver used when no browser is available. Every session request fails.
pub struct NoopDriver;

#[async_trait]
impl Driver for NoopDriver {
    async fn new_session(&self) -> Result<Box<dyn Surface>> {
        Err(SurfaceError::Unavailable("browser not available".to_string()).into())
    }
    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }
}
