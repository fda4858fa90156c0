// Copyright 2026 Slice Scanner Contributors
// SPDX-License-Identifier: Apache-2.0

//! In-memory surface for adapter tests.
//!
//! The page is a map from selector to matching nodes. Selectors are matched
//! literally, so a test lays out exactly the queries an adapter makes. Scripts
//! are matched by their full text against the builders in [`super::script`],
//! and clicks dispatch to named handlers that rewrite the page.

use super::{script, Element, Surface, SurfaceError};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One element on the fake page.
#[derive(Debug, Clone, Default)]
pub(crate) struct Node {
    pub text: String,
    pub attributes: HashMap<String, String>,
    /// Descendants by selector, for `find_within`.
    pub children: HashMap<String, Vec<Node>>,
    /// Click handler key.
    pub on_click: Option<String>,
    pub hidden: bool,
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }

    pub fn child(mut self, selector: &str, node: Node) -> Self {
        self.children.entry(selector.to_string()).or_default().push(node);
        self
    }

    pub fn clicks(mut self, handler: impl Into<String>) -> Self {
        self.on_click = Some(handler.into());
        self
    }
}

/// Mutable page state shared by the surface and its element handles.
#[derive(Debug, Default)]
pub(crate) struct Dom {
    pub nodes: HashMap<String, Vec<Node>>,
    /// Free-form state for handlers (selected size, crust, ...).
    pub vars: HashMap<String, String>,
    /// Navigations and clicks in order, plus anything handlers record.
    pub log: Vec<String>,
    /// When set, every query fails as a dropped connection would.
    pub dead: bool,
}

impl Dom {
    pub fn set(&mut self, selector: &str, nodes: Vec<Node>) {
        self.nodes.insert(selector.to_string(), nodes);
    }

    pub fn set_text(&mut self, selector: &str, text: impl Into<String>) {
        self.set(selector, vec![Node::text(text)]);
    }

    pub fn remove(&mut self, selector: &str) {
        self.nodes.remove(selector);
    }

    pub fn list(&mut self, selector: &str) -> &mut Vec<Node> {
        self.nodes.entry(selector.to_string()).or_default()
    }

    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn bump(&mut self, name: &str) {
        let n = self
            .var(name)
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(0);
        self.vars.insert(name.to_string(), (n + 1).to_string());
    }
}

type Handler = Arc<dyn Fn(&mut Dom) -> Value + Send + Sync>;

#[derive(Default)]
struct Shared {
    dom: Mutex<Dom>,
    scripts: Mutex<HashMap<String, Handler>>,
    clicks: Mutex<HashMap<String, Handler>>,
}

impl Shared {
    fn dispatch(&self, handlers: &Mutex<HashMap<String, Handler>>, key: &str) -> Option<Value> {
        let handler = handlers.lock().unwrap().get(key).cloned()?;
        let mut dom = self.dom.lock().unwrap();
        Some(handler(&mut dom))
    }

    fn check_alive(&self) -> Result<()> {
        if self.dom.lock().unwrap().dead {
            return Err(SurfaceError::Unavailable("connection closed".into()).into());
        }
        Ok(())
    }
}

/// A scripted page. Cloning shares the page, so a test can keep a handle for
/// inspection after handing the surface to an adapter.
#[derive(Clone)]
pub(crate) struct ScriptedSurface {
    shared: Arc<Shared>,
}

impl ScriptedSurface {
    /// An empty page that always reports itself idle.
    pub fn new() -> Self {
        let surface = Self {
            shared: Arc::new(Shared::default()),
        };
        surface.on_script(script::PAGE_IDLE, |_| Value::Bool(true))
    }

    /// Answer `script` (matched by full text) with `handler`.
    pub fn on_script(
        self,
        script: &str,
        handler: impl Fn(&mut Dom) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.shared
            .scripts
            .lock()
            .unwrap()
            .insert(script.to_string(), Arc::new(handler));
        self
    }

    /// Run `handler` when a node whose `on_click` is `key` is clicked.
    pub fn on_click(
        self,
        key: &str,
        handler: impl Fn(&mut Dom) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.shared
            .clicks
            .lock()
            .unwrap()
            .insert(key.to_string(), Arc::new(handler));
        self
    }

    /// Inspect or rewrite the page.
    pub fn with_dom<T>(&self, f: impl FnOnce(&mut Dom) -> T) -> T {
        f(&mut self.shared.dom.lock().unwrap())
    }

    fn wrap(&self, nodes: Vec<Node>) -> Vec<Box<dyn Element>> {
        nodes
            .into_iter()
            .map(|node| {
                Box::new(FakeElement {
                    node,
                    shared: Arc::clone(&self.shared),
                }) as Box<dyn Element>
            })
            .collect()
    }
}

#[async_trait]
impl Surface for ScriptedSurface {
    async fn navigate(&mut self, url: &str, _timeout: Duration) -> Result<()> {
        self.shared.check_alive()?;
        self.with_dom(|dom| dom.log.push(format!("navigate {url}")));
        Ok(())
    }

    async fn run_script(&self, script: &str) -> Result<Value> {
        self.shared.check_alive()?;
        self.shared
            .dispatch(&self.shared.scripts, script)
            .ok_or_else(|| SurfaceError::Script(format!("unexpected script: {script}")).into())
    }

    async fn enumerate(&self, selector: &str) -> Result<Vec<Box<dyn Element>>> {
        self.shared.check_alive()?;
        let nodes = self.with_dom(|dom| dom.nodes.get(selector).cloned().unwrap_or_default());
        Ok(self.wrap(nodes))
    }

    async fn close(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

/// Snapshot of a node taken at enumeration time.
struct FakeElement {
    node: Node,
    shared: Arc<Shared>,
}

#[async_trait]
impl Element for FakeElement {
    async fn text(&self) -> Result<String> {
        self.shared.check_alive()?;
        Ok(self.node.text.trim().to_string())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        self.shared.check_alive()?;
        Ok(self.node.attributes.get(name).cloned())
    }

    async fn click(&self) -> Result<()> {
        self.shared.check_alive()?;
        if let Some(key) = &self.node.on_click {
            self.shared.dom.lock().unwrap().log.push(format!("click {key}"));
            self.shared.dispatch(&self.shared.clicks, key);
        }
        Ok(())
    }

    async fn find_within(&self, selector: &str) -> Result<Vec<Box<dyn Element>>> {
        self.shared.check_alive()?;
        let nodes = self.node.children.get(selector).cloned().unwrap_or_default();
        Ok(nodes
            .into_iter()
            .map(|node| {
                Box::new(FakeElement {
                    node,
                    shared: Arc::clone(&self.shared),
                }) as Box<dyn Element>
            })
            .collect())
    }

    async fn is_visible(&self) -> Result<bool> {
        self.shared.check_alive()?;
        Ok(!self.node.hidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::WaitCondition;

    #[tokio::test]
    async fn test_click_rewrites_page() {
        let surface = ScriptedSurface::new().on_click("open", |dom| {
            dom.set_text(".panel", "opened");
            Value::Null
        });
        surface.with_dom(|dom| dom.set(".toggle", vec![Node::text("Open").clicks("open")]));

        assert_eq!(surface.count(".panel").await.unwrap(), 0);
        surface.click(".toggle").await.unwrap();
        assert_eq!(surface.read_text(".panel").await.unwrap(), "opened");
    }

    #[tokio::test(start_paused = true)]
    async fn test_dead_page_fails_queries() {
        let surface = ScriptedSurface::new();
        surface.with_dom(|dom| dom.dead = true);
        assert!(surface.count(".anything").await.is_err());
        assert!(surface.run_script(script::PAGE_IDLE).await.is_err());

        // a failed query is never read as "the modal is gone"
        let cleared = surface
            .wait_until(&WaitCondition::cleared(".modal"), Duration::from_secs(1))
            .await
            .unwrap();
        assert!(!cleared);
    }

    #[tokio::test]
    async fn test_unknown_script_is_an_error() {
        let surface = ScriptedSurface::new();
        let err = surface.run_script("window.stop()").await.unwrap_err();
        assert!(err.to_string().contains("unexpected script"));
    }
}
