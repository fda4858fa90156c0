// Copyright 2026 Slice Scanner Contributors
// SPDX-License-Identifier: Apache-2.0

//! Variant enumeration over a size × crust configurator.
//!
//! Each size is committed in turn; then every crust offered for that size is
//! visited exactly once by destructively consuming it from the page. A crust
//! list that differs between sizes is handled naturally since it is reopened
//! per size.

use crate::surface::Surface;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use slice_scanner::Variant;
use tracing::{debug, warn};

/// Upper bound on options visited along one axis before giving up.
/// Guards against a consume step that fails to remove the option.
pub const MAX_OPTIONS_PER_AXIS: usize = 64;

/// One entry of the size selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeOption {
    /// Position the binding uses to commit this size.
    pub index: usize,
    /// Size label as shown; looked up in the vendor's size tables.
    pub label: String,
}

/// Site-specific bindings for one pizza's configurator.
#[async_trait]
pub trait VariantBinding: Send + Sync {
    /// Sizes offered for the current pizza, in selector order.
    async fn sizes(&self, surface: &mut dyn Surface) -> Result<Vec<SizeOption>>;

    /// Select a size.
    async fn commit_size(&self, surface: &mut dyn Surface, size: &SizeOption) -> Result<()>;

    /// Accept any "selected crust unavailable" prompt raised by a size change.
    async fn dismiss_conflict(&self, _surface: &mut dyn Surface) -> Result<()> {
        Ok(())
    }

    /// Reveal the crust options for the committed size.
    async fn open_crusts(&self, surface: &mut dyn Surface) -> Result<()>;

    /// Whether any crust option is left unvisited.
    async fn crusts_remaining(&self, surface: &mut dyn Surface) -> Result<bool>;

    /// Select the next unvisited crust and consume it. Returns its label.
    async fn consume_crust(&self, surface: &mut dyn Surface) -> Result<String>;

    /// Wait for the page to reflect the last selection.
    async fn settle(&self, surface: &mut dyn Surface) -> Result<()>;

    /// Read the displayed variant.
    async fn capture(&self, surface: &mut dyn Surface, size: &SizeOption, crust: &str)
        -> Result<Variant>;
}

/// Counters for one pizza's enumeration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EnumerationStats {
    pub sizes: usize,
    pub captured: usize,
    pub skipped: usize,
}

/// Visit every (size, crust) pair once, handing each captured variant to
/// `on_variant`.
///
/// A failed settle or capture skips that variant only. Failing to commit a
/// size, open the crust panel, or consume a crust aborts the enumeration,
/// since the page state is no longer known.
pub async fn enumerate_variants<F>(
    binding: &dyn VariantBinding,
    surface: &mut dyn Surface,
    mut on_variant: F,
) -> Result<EnumerationStats>
where
    F: FnMut(Variant) + Send,
{
    let mut stats = EnumerationStats::default();
    let sizes = binding.sizes(surface).await.context("reading sizes")?;
    if sizes.len() > MAX_OPTIONS_PER_AXIS {
        bail!(
            "{} sizes offered, more than the limit of {MAX_OPTIONS_PER_AXIS}",
            sizes.len()
        );
    }

    for size in &sizes {
        binding
            .commit_size(surface, size)
            .await
            .with_context(|| format!("selecting size {}", size.label))?;
        binding.dismiss_conflict(surface).await?;
        binding
            .open_crusts(surface)
            .await
            .with_context(|| format!("opening crusts for size {}", size.label))?;
        stats.sizes += 1;

        let mut visited = 0;
        while binding.crusts_remaining(surface).await? {
            if visited == MAX_OPTIONS_PER_AXIS {
                bail!(
                    "crust options for size {} did not drain after {MAX_OPTIONS_PER_AXIS} picks",
                    size.label
                );
            }
            visited += 1;

            let crust = binding
                .consume_crust(surface)
                .await
                .with_context(|| format!("selecting crust for size {}", size.label))?;

            if let Err(e) = binding.settle(surface).await {
                warn!("skipping {} / {crust}: page did not settle: {e:#}", size.label);
                stats.skipped += 1;
                continue;
            }

            match binding.capture(surface, size, &crust).await {
                Ok(variant) => {
                    debug!("captured {} / {crust}", size.label);
                    stats.captured += 1;
                    on_variant(variant);
                }
                Err(e) => {
                    warn!("skipping {} / {crust}: {e:#}", size.label);
                    stats.skipped += 1;
                }
            }
        }
    }

    Ok(stats)
}
