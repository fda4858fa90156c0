// Copyright 2026 Slice Scanner Contributors
// SPDX-License-Identifier: Apache-2.0

//! Vendor adapters.
//!
//! A vendor is a capability set (`login`, `get_pizzas`, `get_sides`) driven
//! through a borrowed [`Surface`]. Shared behaviour lives in free functions
//! here rather than in a base type.

pub mod dominos;
pub mod enumerate;
pub mod papa_johns;

use crate::config::CollectorConfig;
use crate::sink::Sink;
use crate::surface::{Surface, WaitCondition};
use anyhow::{Context, Result};
use async_trait::async_trait;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use slice_scanner::{CatalogResult, Entity, Pizza, Side, SideListing, Variant, VendorRegistration};
use std::str::FromStr;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::{debug, info, warn};

/// One external vendor's ordering site.
#[async_trait]
pub trait Vendor: Send + Sync {
    /// Identity and size tables.
    fn registration(&self) -> &VendorRegistration;

    /// Reach a state where the menu is visible (store located, order started).
    async fn login(&self, surface: &mut dyn Surface) -> Result<()>;

    /// Enumerate every pizza variant, emitting each as it is captured.
    async fn get_pizzas(&self, surface: &mut dyn Surface, emitter: &mut Emitter<'_>) -> Result<()>;

    /// Capture side items.
    async fn get_sides(&self, surface: &mut dyn Surface, emitter: &mut Emitter<'_>) -> Result<()>;
}

/// The registered vendors, in extraction order.
pub fn registry(config: &CollectorConfig) -> Vec<Arc<dyn Vendor>> {
    vec![
        Arc::new(dominos::Dominos::new(config.timeouts, config.postcode.clone())),
        Arc::new(papa_johns::PapaJohns::new(config.timeouts)),
    ]
}

/// Builds entities from captured records and pushes them to the sink.
///
/// Records that fail validation are dropped here; they never surface as errors.
pub struct Emitter<'a> {
    registration: &'a VendorRegistration,
    sink: &'a Sink,
    emitted: usize,
    dropped: usize,
}

impl<'a> Emitter<'a> {
    pub fn new(registration: &'a VendorRegistration, sink: &'a Sink) -> Self {
        Self {
            registration,
            sink,
            emitted: 0,
            dropped: 0,
        }
    }

    pub fn registration(&self) -> &VendorRegistration {
        self.registration
    }

    /// Build and emit a pizza. Returns whether it reached the sink.
    pub fn pizza(&mut self, variant: Variant) -> bool {
        let raw = self.registration.raw_pizza(variant);
        self.push(Pizza::new(raw).map(Entity::from))
    }

    /// Build and emit a side. Returns whether it reached the sink.
    pub fn side(&mut self, listing: SideListing) -> bool {
        let raw = self.registration.raw_side(listing);
        self.push(Side::new(raw).map(Entity::from))
    }

    pub fn emitted(&self) -> usize {
        self.emitted
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    fn push(&mut self, built: CatalogResult<Entity>) -> bool {
        match built {
            Ok(entity) => {
                if self.sink.push(entity) {
                    self.emitted += 1;
                    true
                } else {
                    self.dropped += 1;
                    false
                }
            }
            Err(e) => {
                debug!(vendor = %self.registration.id, "dropping record: {e}");
                self.dropped += 1;
                false
            }
        }
    }
}

/// Outcome of one vendor's extraction.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractReport {
    pub vendor: String,
    pub emitted: usize,
    pub dropped: usize,
    pub pizza_error: Option<String>,
    pub side_error: Option<String>,
    pub elapsed_ms: u64,
}

impl ExtractReport {
    pub fn is_clean(&self) -> bool {
        self.pizza_error.is_none() && self.side_error.is_none()
    }
}

/// Log in, then best-effort pizzas, then best-effort sides.
///
/// A login failure is returned as an error since neither later step can run.
/// Failures of the later steps are logged and recorded in the report.
pub async fn extract(
    vendor: &dyn Vendor,
    surface: &mut dyn Surface,
    sink: &Sink,
) -> Result<ExtractReport> {
    let started = std::time::Instant::now();
    let registration = vendor.registration();
    info!(vendor = %registration.id, "logging in to {}", registration.site);

    vendor
        .login(surface)
        .await
        .with_context(|| format!("{} login failed", registration.id))?;

    let mut emitter = Emitter::new(registration, sink);

    let pizza_error = match vendor.get_pizzas(surface, &mut emitter).await {
        Ok(()) => None,
        Err(e) => {
            warn!(vendor = %registration.id, "pizza extraction failed: {e:#}");
            Some(format!("{e:#}"))
        }
    };

    let side_error = match vendor.get_sides(surface, &mut emitter).await {
        Ok(()) => None,
        Err(e) => {
            warn!(vendor = %registration.id, "side extraction failed: {e:#}");
            Some(format!("{e:#}"))
        }
    };

    let report = ExtractReport {
        vendor: registration.id.clone(),
        emitted: emitter.emitted(),
        dropped: emitter.dropped(),
        pizza_error,
        side_error,
        elapsed_ms: started.elapsed().as_millis() as u64,
    };
    info!(
        vendor = %report.vendor,
        "extraction finished: emitted={} dropped={} elapsed={}ms",
        report.emitted,
        report.dropped,
        report.elapsed_ms
    );
    Ok(report)
}

/// Wait for the page to go idle, then pause for `settle` so script-driven
/// updates land. Idle timeouts are tolerated; the pause always happens.
pub async fn settle(surface: &dyn Surface, wait: Duration, settle: Duration) -> Result<()> {
    let idle = WaitCondition::script(crate::surface::script::PAGE_IDLE);
    if !surface.wait_until(&idle, wait).await? {
        debug!("page did not go idle within {}ms", wait.as_millis());
    }
    tokio::time::sleep(settle).await;
    Ok(())
}

/// Pull a decimal price out of display text such as `"£12.99"` or `"€ 9,50"`.
pub fn parse_price(text: &str) -> Option<Decimal> {
    static PRICE: OnceLock<Option<Regex>> = OnceLock::new();
    let re = PRICE
        .get_or_init(|| Regex::new(r"(\d+(?:[.,]\d{1,2})?)").ok())
        .as_ref()?;
    let found = re.captures(text)?.get(1)?.as_str().replace(',', ".");
    Decimal::from_str(&found).ok()
}

/// Split a topping listing on any of `separators`, trimming each entry.
pub fn split_toppings(text: &str, separators: &[char]) -> Vec<String> {
    text.split(|c| separators.contains(&c))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Selectors describing a flat product listing.
#[derive(Debug, Clone, Copy)]
pub struct ListingSelectors<'a> {
    pub item: &'a str,
    pub name: &'a str,
    pub price: &'a str,
    pub image: Option<&'a str>,
    pub description: Option<&'a str>,
}

/// Capture every item of a flat listing as a side. Returns how many were seen.
pub async fn capture_listing(
    surface: &dyn Surface,
    selectors: ListingSelectors<'_>,
    category: Option<&str>,
    emitter: &mut Emitter<'_>,
) -> Result<usize> {
    let items = surface.enumerate(selectors.item).await?;
    for item in &items {
        let name = first_text(item.as_ref(), selectors.name).await?;
        let price = first_text(item.as_ref(), selectors.price)
            .await?
            .as_deref()
            .and_then(parse_price);
        let image = match selectors.image {
            Some(sel) => match item.find_within(sel).await?.first() {
                Some(img) => img.attribute("src").await.ok().flatten(),
                None => None,
            },
            None => None,
        };
        let description = match selectors.description {
            Some(sel) => first_text(item.as_ref(), sel).await?,
            None => None,
        };
        emitter.side(SideListing {
            name,
            price,
            image,
            description,
            category: category.map(str::to_string),
        });
    }
    Ok(items.len())
}

/// Text of the first descendant matching `selector`, if there is one.
async fn first_text(element: &dyn crate::surface::Element, selector: &str) -> Result<Option<String>> {
    match element.find_within(selector).await?.first() {
        Some(found) => Ok(Some(found.text().await?)),
        None => Ok(None),
    }
}
