//! Fields shared by every catalog product.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::types::{CatalogError, CatalogResult};

/// Product fields as captured from a vendor surface, before validation.
#[derive(Debug, Clone, Default)]
pub struct RawProduct {
    pub vendor: Option<String>,
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub quantity: Option<u32>,
}

/// Validated common product fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub vendor: String,
    pub name: String,
    pub price: Decimal,
    pub description: Option<String>,
    #[serde(rename = "img")]
    pub image: Option<String>,
    pub quantity: u32,
    #[serde(rename = "stamp")]
    pub created_at: DateTime<Utc>,
    pub hash: String,
    pub score: i64,
}

impl Product {
    /// Validate the required fields. `hash` and `score` are left for the
    /// concrete product type to fill in.
    pub(crate) fn from_raw(raw: RawProduct) -> CatalogResult<Self> {
        let vendor = required_text(raw.vendor, "vendor")?;
        let name = required_text(raw.name, "name")?;
        let price = raw.price.ok_or(CatalogError::MissingField("price"))?;

        Ok(Self {
            vendor,
            name,
            price,
            description: raw.description.filter(|d| !d.trim().is_empty()),
            image: raw.image.filter(|i| !i.trim().is_empty()),
            quantity: raw.quantity.unwrap_or(1),
            created_at: Utc::now(),
            hash: String::new(),
            score: 0,
        })
    }
}

fn required_text(value: Option<String>, field: &'static str) -> CatalogResult<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(CatalogError::MissingField(field))
}

/// Stable hex digest over a product's identity fields.
pub fn identity_hash(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_bytes());
        // unit separator keeps ("ab", "c") distinct from ("a", "bc")
        hasher.update([0x1f]);
    }
    hex::encode(hasher.finalize())
}
