// Copyright 2026 Slice Scanner Contributors
// SPDX-License-Identifier: Apache-2.0

//! Papa John's Ireland.

use super::enumerate::{enumerate_variants, SizeOption, VariantBinding};
use super::{capture_listing, parse_price, settle, split_toppings, Emitter, ListingSelectors, Vendor};
use crate::surface::script::{self, js_string, Consume, ReadFrom};
use crate::surface::{require, Surface, SurfaceError, Timeouts, WaitCondition};
use anyhow::{Context, Result};
use async_trait::async_trait;
use slice_scanner::{Variant, VendorRegistration};
use tracing::{debug, info};

const SITE: &str = "http://www.papajohns.ie";
const ORDER_SITE: &str = "https://order.papajohns.ie/";
const CATEGORIES: [&str; 2] = ["Finest", "Classics"];
const SIDES_CATEGORY: &str = "Sides";

const PIZZA_ID: &str = "input[name=MenuElementID]";
const SIZE_LIST: &str = "#OptionGroups_0__Options_0__list";
const CRUST_LABELS: &str = "#OptionGroups_0__Options_0__OptionItems_2__Options_0__list_quantity_div label";
const UNPARSED: &str = "unparsed";

/// Size names by dropdown position; option 0 is the placeholder.
const SIZE_LABELS: [&str; 3] = ["Small", "Medium", "Large"];

pub struct PapaJohns {
    registration: VendorRegistration,
    timeouts: Timeouts,
}

impl PapaJohns {
    pub fn new(timeouts: Timeouts) -> Self {
        Self {
            registration: VendorRegistration::new("Papa Johns", SITE)
                .with_size("small", 10.0, 6)
                .with_size("medium", 12.0, 8)
                .with_size("large", 14.0, 10),
            timeouts,
        }
    }

    async fn settle(&self, surface: &dyn Surface) -> Result<()> {
        settle(surface, self.timeouts.wait, self.timeouts.settle).await
    }

    /// Open a menu category. Returns `false` when no such category link exists.
    async fn select_category(&self, surface: &dyn Surface, title: &str) -> Result<bool> {
        self.settle(surface).await?;
        let clicked = surface
            .run_script(&script::click_link_containing(title))
            .await?;
        self.settle(surface).await?;
        Ok(clicked.as_bool() == Some(true))
    }

    /// Read every pizza id on the category page, blanking each input as it is read.
    async fn take_pizza_ids(&self, surface: &dyn Surface) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        let mut reads = 0;
        while surface.count(PIZZA_ID).await? > 0 {
            if reads == super::enumerate::MAX_OPTIONS_PER_AXIS * 4 {
                anyhow::bail!("pizza ids did not drain after {reads} reads");
            }
            reads += 1;
            let id = surface.run_script(&next_pizza_id()).await?;
            match id.as_str() {
                Some(id) if !id.is_empty() => ids.push(id.to_string()),
                _ => debug!("skipping pizza input without a value"),
            }
        }
        Ok(ids)
    }

    async fn open_pizza(&self, surface: &dyn Surface, id: &str) -> Result<()> {
        self.settle(surface).await?;
        let opened = surface.run_script(&customize_link(id)).await?;
        if opened.as_bool() != Some(true) {
            return Err(SurfaceError::NotFound(format!("customize link for pizza {id}")).into());
        }
        self.settle(surface).await
    }
}

/// Read the first pizza id input and clear its `name` so it stops matching.
fn next_pizza_id() -> String {
    script::consume_first(PIZZA_ID, ReadFrom::Value, None, Consume::ClearAttribute("name"))
}

/// Click the first unparsed crust label and unmark it.
fn next_crust() -> String {
    script::consume_first(
        &format!(".{UNPARSED}"),
        ReadFrom::Text(None),
        Some(""),
        Consume::RemoveClass(UNPARSED),
    )
}

/// Click the customize link next to the pizza id input with value `id`.
fn customize_link(id: &str) -> String {
    let input = format!("input[value=\"{id}\"]");
    format!(
        r#"(() => {{
            const input = document.querySelector('{}');
            const link = input && input.parentElement
                && input.parentElement.querySelector('.productCustomizeButtons a');
            if (!link) return false;
            link.click();
            return true;
        }})()"#,
        js_string(&input)
    )
}

#[async_trait]
impl Vendor for PapaJohns {
    fn registration(&self) -> &VendorRegistration {
        &self.registration
    }

    async fn login(&self, surface: &mut dyn Surface) -> Result<()> {
        surface.navigate(ORDER_SITE, self.timeouts.navigation).await?;
        require(surface, &WaitCondition::present("#countyList"), self.timeouts.wait).await?;

        surface.click("#countyList ul ul a").await.context("picking a store")?;
        self.settle(surface).await?;
        surface.click(".button.startOrder-link").await?;
        self.settle(surface).await?;
        self.settle(surface).await?;
        surface.click("#orderSetupSteps input").await?;
        self.settle(surface).await?;
        surface.click("#OrderSetupSubmit").await?;
        self.settle(surface).await
    }

    async fn get_pizzas(&self, surface: &mut dyn Surface, emitter: &mut Emitter<'_>) -> Result<()> {
        let binding = Configurator {
            timeouts: self.timeouts,
        };

        for category in CATEGORIES {
            if !self.select_category(surface, category).await? {
                return Err(SurfaceError::NotFound(format!("category {category}")).into());
            }
            let ids = self.take_pizza_ids(surface).await?;
            info!("found {} Papa Johns pizzas in {category}", ids.len());

            for id in ids {
                self.open_pizza(surface, &id).await?;
                let stats = enumerate_variants(&binding, surface, |variant| {
                    emitter.pizza(variant);
                })
                .await
                .with_context(|| format!("enumerating pizza {id}"))?;
                debug!("pizza {id}: {:?}", stats);
                self.select_category(surface, category).await?;
            }
        }
        Ok(())
    }

    async fn get_sides(&self, surface: &mut dyn Surface, emitter: &mut Emitter<'_>) -> Result<()> {
        if !self.select_category(surface, SIDES_CATEGORY).await? {
            debug!("no sides category on the Papa Johns menu");
            return Ok(());
        }
        let seen = capture_listing(
            surface,
            ListingSelectors {
                item: ".menuItem",
                name: ".productTitle",
                price: ".productPrice",
                image: Some(".product-image img"),
                description: Some(".product-desc"),
            },
            Some("sides"),
            emitter,
        )
        .await?;
        info!("found {seen} Papa Johns sides");
        Ok(())
    }
}

/// Size dropdown and a crust label list on the customize page.
struct Configurator {
    timeouts: Timeouts,
}

#[async_trait]
impl VariantBinding for Configurator {
    async fn sizes(&self, surface: &mut dyn Surface) -> Result<Vec<SizeOption>> {
        let options = surface.enumerate(&format!("{SIZE_LIST} option")).await?;
        let mut sizes = Vec::new();
        for (index, option) in options.iter().enumerate().skip(1) {
            let label = match SIZE_LABELS.get(index - 1) {
                Some(label) => label.to_string(),
                None => option.text().await?,
            };
            sizes.push(SizeOption { index, label });
        }
        Ok(sizes)
    }

    async fn commit_size(&self, surface: &mut dyn Surface, size: &SizeOption) -> Result<()> {
        surface.select_dropdown(SIZE_LIST, size.index).await
    }

    async fn open_crusts(&self, surface: &mut dyn Surface) -> Result<()> {
        settle(surface, self.timeouts.wait, self.timeouts.settle).await?;
        let marked = surface.run_script(&script::mark_all(CRUST_LABELS, UNPARSED)).await?;
        debug!("marked {} crust labels", marked.as_u64().unwrap_or(0));
        Ok(())
    }

    async fn crusts_remaining(&self, surface: &mut dyn Surface) -> Result<bool> {
        Ok(surface.count(&format!(".{UNPARSED}")).await? > 0)
    }

    async fn consume_crust(&self, surface: &mut dyn Surface) -> Result<String> {
        let label = surface.run_script(&next_crust()).await?;
        label
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| SurfaceError::NotFound(format!(".{UNPARSED}")).into())
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
        let title = surface.read_text(".productTitle").await?;
        let description = surface.read_text(".product-desc").await?;
        let price = surface.read_text("#CurrentPrice").await?;
        let image = surface
            .read_attribute(".product-image img", "src")
            .await
            .ok()
            .flatten();
        Ok(Variant {
            title: Some(title),
            toppings: split_toppings(&description, &[',', '&']),
            size: size.label.clone(),
            price: parse_price(&price),
            crust: crust.to_string(),
            image,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::fake::{Dom, Node, ScriptedSurface};
    use rust_decimal::Decimal;
    use serde_json::Value;

    const MENU: [(&str, &[&str]); 3] = [
        ("Small", &["Thin", "Original"]),
        ("Medium", &["Thin", "Original", "Stuffed"]),
        ("Large", &["Original", "Stuffed"]),
    ];

    fn take_crust(dom: &mut Dom) -> Value {
        let remaining = dom.list(".unparsed");
        if remaining.is_empty() {
            return Value::Null;
        }
        let crust = remaining.remove(0).text;
        if !remaining.is_empty() {
            remaining.rotate_left(1);
        }
        let size = dom.var("size").unwrap_or_default().to_string();
        dom.log.push(format!("visit {size}/{crust}"));
        dom.set_text("#CurrentPrice", "€14.50");
        Value::String(crust)
    }

    fn customize_page() -> ScriptedSurface {
        let mut surface = ScriptedSurface::new()
            .on_script(&script::mark_all(CRUST_LABELS, UNPARSED), |dom| {
                let labels = dom.list(CRUST_LABELS).clone();
                let marked = labels.len();
                dom.set(".unparsed", labels);
                Value::from(marked)
            })
            .on_script(&next_crust(), take_crust);
        for index in 1..=MENU.len() {
            surface = surface.on_script(&script::select_option(SIZE_LIST, index), move |dom| {
                let (size, crusts) = MENU[index - 1];
                dom.vars.insert("size".into(), size.into());
                dom.set(CRUST_LABELS, crusts.iter().map(|c| Node::text(*c)).collect());
                dom.remove("#CurrentPrice");
                Value::Bool(true)
            });
        }
        surface.with_dom(|dom| {
            let options = ["Choose a size", "Small 10\"", "Medium 12\"", "Large 14\""];
            dom.set(
                &format!("{SIZE_LIST} option"),
                options.into_iter().map(Node::text).collect(),
            );
            dom.set_text(".productTitle", "The Works");
            dom.set_text(".product-desc", "Pepperoni, Ham, Onions & Mushrooms");
            dom.set(
                ".product-image img",
                vec![Node::default().attr("src", "/img/the-works.png")],
            );
        });
        surface
    }

    /// Inputs named `MenuElementID`. Reading one clears its name unless `stuck`.
    fn id_page(values: &[&str], stuck: bool) -> ScriptedSurface {
        let surface = ScriptedSurface::new().on_script(&next_pizza_id(), move |dom| {
            let inputs = dom.list(PIZZA_ID);
            let Some(first) = inputs.first().cloned() else {
                return Value::Null;
            };
            if !stuck {
                inputs.remove(0);
            }
            Value::String(first.attributes.get("value").cloned().unwrap_or_default())
        });
        surface.with_dom(|dom| {
            let inputs = values
                .iter()
                .map(|v| Node::default().attr("value", *v))
                .collect();
            dom.set(PIZZA_ID, inputs);
        });
        surface
    }

    #[tokio::test(start_paused = true)]
    async fn test_sizes_skip_placeholder() {
        let mut surface = customize_page();
        let binding = Configurator {
            timeouts: Timeouts::default(),
        };
        let sizes = binding.sizes(&mut surface).await.unwrap();
        let sizes: Vec<(usize, &str)> = sizes.iter().map(|s| (s.index, s.label.as_str())).collect();
        assert_eq!(sizes, vec![(1, "Small"), (2, "Medium"), (3, "Large")]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_size_and_crust_captured_once() {
        let page = customize_page();
        let mut surface = page.clone();
        let binding = Configurator {
            timeouts: Timeouts::default(),
        };
        let mut captured = Vec::new();
        let stats = enumerate_variants(&binding, &mut surface, |v| captured.push(v))
            .await
            .unwrap();

        assert_eq!(stats.sizes, 3);
        assert_eq!(stats.captured, 7);

        let mut pairs: Vec<(String, String)> = captured
            .iter()
            .map(|v| (v.size.clone(), v.crust.clone()))
            .collect();
        pairs.sort();
        let mut expected: Vec<(String, String)> = MENU
            .iter()
            .flat_map(|(size, crusts)| crusts.iter().map(move |c| (size.to_string(), c.to_string())))
            .collect();
        expected.sort();
        assert_eq!(pairs, expected);

        let first = &captured[0];
        assert_eq!(first.title.as_deref(), Some("The Works"));
        assert_eq!(first.toppings, vec!["Pepperoni", "Ham", "Onions", "Mushrooms"]);
        assert_eq!(first.price, Some(Decimal::new(1450, 2)));
        assert_eq!(first.image.as_deref(), Some("/img/the-works.png"));
    }

    #[tokio::test]
    async fn test_take_pizza_ids_skips_blank_inputs() {
        let surface = id_page(&["101", "", "102"], false);
        let vendor = PapaJohns::new(Timeouts::default());
        let ids = vendor.take_pizza_ids(&surface).await.unwrap();
        assert_eq!(ids, vec!["101", "102"]);
        assert_eq!(surface.count(PIZZA_ID).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_take_pizza_ids_stops_on_stuck_input() {
        let vendor = PapaJohns::new(Timeouts::default());
        for value in ["101", ""] {
            let surface = id_page(&[value], true);
            let err = vendor.take_pizza_ids(&surface).await.unwrap_err();
            assert!(err.to_string().contains("did not drain"));
        }
    }

    #[test]
    fn test_customize_link_escapes_id() {
        let js = customize_link("12'3");
        assert!(js.contains(r#"input[value=\"12\'3\"]"#));
        assert!(js.contains(".productCustomizeButtons a"));
    }

    #[test]
    fn test_registration_sizes() {
        let vendor = PapaJohns::new(Timeouts::default());
        let reg = vendor.registration();
        assert_eq!(reg.id, "Papa Johns");
        assert_eq!(reg.diameter_for("Medium"), 12.0);
        assert_eq!(reg.slices_for("Large"), 10);
    }
}
