//! Side items (wedges, wings, dips, ...).

use serde::{Deserialize, Serialize};

use crate::product::{identity_hash, Product, RawProduct};
use crate::types::CatalogResult;

/// Side fields as captured from a vendor surface, before validation.
#[derive(Debug, Clone, Default)]
pub struct RawSide {
    pub product: RawProduct,
    pub category: Option<String>,
}

/// A validated side item. Sides carry no ranking rule, so `score` stays 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Side {
    #[serde(flatten)]
    pub product: Product,
    #[serde(rename = "type")]
    pub category: Option<String>,
}

impl Side {
    pub fn new(raw: RawSide) -> CatalogResult<Self> {
        let mut product = Product::from_raw(raw.product)?;
        product.hash = identity_hash(&[&product.vendor, &product.name]);
        Ok(Self {
            product,
            category: raw.category.filter(|c| !c.trim().is_empty()),
        })
    }
}
