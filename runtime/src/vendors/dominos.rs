// Copyright 2026 Slice Scanner Contributors
// SPDX-License-Identifier: Apache-2.0

//! Domino's UK.

use super::enumerate::{enumerate_variants, SizeOption, VariantBinding};
use super::{capture_listing, parse_price, settle, split_toppings, Emitter, ListingSelectors, Vendor};
use crate::surface::script::{self, Consume, ReadFrom};
use crate::surface::{require, Surface, SurfaceError, Timeouts, WaitCondition};
use anyhow::{Context, Result};
use async_trait::async_trait;
use slice_scanner::{Variant, VendorRegistration};
use tracing::{debug, info};

const SITE: &str = "https://www.dominos.co.uk";
const MENU_SECTIONS: [&str; 2] = ["Gourmet Pizzas", "Speciality Pizzas"];
const SIDES_SECTION: &str = "Sides";
const CRUST_CONFLICT: &str = "selected crust is not available";

pub struct Dominos {
    registration: VendorRegistration,
    timeouts: Timeouts,
    postcode: String,
}

impl Dominos {
    pub fn new(timeouts: Timeouts, postcode: impl Into<String>) -> Self {
        Self {
            registration: VendorRegistration::new("Dominos", SITE)
                .with_size("large", 13.5, 10)
                .with_size("medium", 11.5, 8)
                .with_size("small", 9.5, 6)
                .with_size("personal", 7.0, 4),
            timeouts,
            postcode: postcode.into(),
        }
    }

    async fn pizza_links(&self, surface: &dyn Surface) -> Result<Vec<String>> {
        require(surface, &WaitCondition::present(".pizza"), self.timeouts.wait).await?;
        let mut links = Vec::new();
        for section in MENU_SECTIONS {
            let selector = format!("[id=\"{section}\"] .pizza .section-footer .order a");
            for anchor in surface.enumerate(&selector).await? {
                if let Some(href) = anchor.attribute("href").await? {
                    links.push(href);
                }
            }
        }
        Ok(links)
    }
}

#[async_trait]
impl Vendor for Dominos {
    fn registration(&self) -> &VendorRegistration {
        &self.registration
    }

    async fn login(&self, surface: &mut dyn Surface) -> Result<()> {
        surface.navigate(SITE, self.timeouts.navigation).await?;
        require(surface, &WaitCondition::present("#txtPostcode"), self.timeouts.wait).await?;

        let filled = surface
            .run_script(&script::fill_input("#txtPostcode", &self.postcode))
            .await?;
        if filled.as_bool() != Some(true) {
            return Err(SurfaceError::NotFound("#txtPostcode".into()).into());
        }
        surface.click("#btnStoreSearch").await?;

        let start = ".btn.btn-neutral.btn-large";
        require(surface, &WaitCondition::present(start), self.timeouts.wait)
            .await
            .context("no store found for postcode")?;
        surface.click(start).await?;
        settle(surface, self.timeouts.wait, self.timeouts.settle).await
    }

    async fn get_pizzas(&self, surface: &mut dyn Surface, emitter: &mut Emitter<'_>) -> Result<()> {
        let links = self.pizza_links(surface).await?;
        info!("found {} Dominos pizzas", links.len());

        for link in links {
            surface.navigate(&link, self.timeouts.navigation).await?;
            require(surface, &WaitCondition::present(".pizza-name > h1"), self.timeouts.wait)
                .await
                .with_context(|| format!("pizza page {link} did not load"))?;

            let title = surface.read_text(".pizza-name > h1").await?;
            let toppings = match surface.read_text(".selected-toppings p").await {
                Ok(text) => split_toppings(&text, &[',']),
                Err(_) => Vec::new(),
            };
            let binding = Configurator {
                timeouts: self.timeouts,
                title,
                toppings,
            };

            let stats = enumerate_variants(&binding, surface, |variant| {
                emitter.pizza(variant);
            })
            .await
            .with_context(|| format!("enumerating {}", binding.title))?;
            debug!("{}: {:?}", binding.title, stats);
        }
        Ok(())
    }

    async fn get_sides(&self, surface: &mut dyn Surface, emitter: &mut Emitter<'_>) -> Result<()> {
        surface.navigate(&format!("{SITE}/menu"), self.timeouts.navigation).await?;
        let section = format!("[id=\"{SIDES_SECTION}\"]");
        if !surface
            .wait_until(&WaitCondition::present(&section), self.timeouts.wait)
            .await?
        {
            debug!("no sides section on the Dominos menu");
            return Ok(());
        }

        let item = format!("{section} .menu-item");
        let seen = capture_listing(
            surface,
            ListingSelectors {
                item: &item,
                name: ".menu-item-title",
                price: ".menu-item-price",
                image: Some("img"),
                description: Some(".menu-item-description"),
            },
            Some("sides"),
            emitter,
        )
        .await?;
        info!("found {seen} Dominos sides");
        Ok(())
    }
}

/// Click the first remaining crust button and remove its item from the list.
fn next_crust() -> String {
    script::consume_first(
        ".crust-item",
        ReadFrom::Text(Some("button.crust-type")),
        Some("button.crust-type"),
        Consume::Remove,
    )
}

/// Size buttons and a `.crust-item` list on a single pizza page.
struct Configurator {
    timeouts: Timeouts,
    title: String,
    toppings: Vec<String>,
}

impl Configurator {
    async fn open_panel(&self, surface: &dyn Surface, panel: &str, options: &str) -> Result<()> {
        let id = format!("#{panel}");
        require(surface, &WaitCondition::present(&id), self.timeouts.wait).await?;
        if surface.count(&format!("{id}.selected")).await? == 0 {
            surface.click(&id).await?;
            require(surface, &WaitCondition::present(options), self.timeouts.wait).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl VariantBinding for Configurator {
    async fn sizes(&self, surface: &mut dyn Surface) -> Result<Vec<SizeOption>> {
        self.open_panel(surface, "size", ".pizza-size").await?;
        let mut sizes = Vec::new();
        for (index, button) in surface.enumerate(".pizza-size").await?.iter().enumerate() {
            let text = button.text().await?.to_lowercase();
            if let Some(label) = text.split_whitespace().next() {
                sizes.push(SizeOption {
                    index,
                    label: label.to_string(),
                });
            }
        }
        Ok(sizes)
    }

    async fn commit_size(&self, surface: &mut dyn Surface, size: &SizeOption) -> Result<()> {
        self.open_panel(surface, "size", ".pizza-size").await?;
        let buttons = surface.enumerate(".pizza-size").await?;
        let button = buttons
            .get(size.index)
            .ok_or_else(|| SurfaceError::NotFound(format!(".pizza-size #{}", size.index)))?;
        button.click().await
    }

    async fn dismiss_conflict(&self, surface: &mut dyn Surface) -> Result<()> {
        if !surface
            .wait_until(&WaitCondition::present(".modal"), self.timeouts.short_wait)
            .await?
        {
            return Ok(());
        }
        for modal in surface.enumerate(".modal").await? {
            if !modal.is_visible().await? {
                continue;
            }
            if !modal.text().await?.to_lowercase().contains(CRUST_CONFLICT) {
                continue;
            }
            if let Some(confirm) = modal.find_within(".btn-positive").await?.first() {
                debug!("confirming crust conflict dialog");
                confirm.click().await?;
            }
            require(
                surface,
                &WaitCondition::cleared(".modal-backdrop.fade.in"),
                self.timeouts.wait,
            )
            .await?;
        }
        Ok(())
    }

    async fn open_crusts(&self, surface: &mut dyn Surface) -> Result<()> {
        self.open_panel(surface, "crust", ".crust-type").await?;
        settle(surface, self.timeouts.wait, self.timeouts.settle).await
    }

    async fn crusts_remaining(&self, surface: &mut dyn Surface) -> Result<bool> {
        Ok(surface.count("button.crust-type").await? > 0)
    }

    async fn consume_crust(&self, surface: &mut dyn Surface) -> Result<String> {
        let label = surface.run_script(&next_crust()).await?;
        label
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| SurfaceError::NotFound(".crust-item".into()).into())
    }

    async fn settle(&self, surface: &mut dyn Surface) -> Result<()> {
        settle(surface, self.timeouts.wait, self.timeouts.settle).await
    }

    async fn capture(
        &self,
        surface: &mut dyn Surface,
        size: &SizeOption,
        crust: &str,
    ) -> Result<Variant> {
        let price = surface.read_text(".pizza-price > h2").await?;
        Ok(Variant {
            title: Some(self.title.clone()),
            toppings: self.toppings.clone(),
            size: size.label.clone(),
            price: parse_price(&price),
            crust: crust.to_string(),
            image: None,
        })
    }
}
