//! Vendor registration: identity plus the size lookup tables used when
//! building pizzas from that vendor's captures.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::pizza::RawPizza;
use crate::product::RawProduct;
use crate::side::RawSide;

/// Diameter/slice value for sizes a vendor table does not know.
pub const UNKNOWN_DIMENSION: i32 = -1;

/// Immutable description of one vendor, built once at startup.
#[derive(Debug, Clone, Serialize)]
pub struct VendorRegistration {
    pub id: String,
    pub site: String,
    /// Lowercase size label → diameter in inches.
    pub diameters: BTreeMap<String, f64>,
    /// Lowercase size label → slice count.
    pub slices: BTreeMap<String, i32>,
}

/// One captured size × crust combination of a catalog item.
#[derive(Debug, Clone, Default)]
pub struct Variant {
    pub title: Option<String>,
    pub toppings: Vec<String>,
    pub size: String,
    pub price: Option<Decimal>,
    pub crust: String,
    pub image: Option<String>,
}

/// One side item as read from a vendor listing.
#[derive(Debug, Clone, Default)]
pub struct SideListing {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

impl VendorRegistration {
    pub fn new(id: impl Into<String>, site: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            site: site.into(),
            diameters: BTreeMap::new(),
            slices: BTreeMap::new(),
        }
    }

    /// Register a size label with its diameter and slice count.
    pub fn with_size(mut self, label: &str, diameter: f64, slices: i32) -> Self {
        let key = label.to_lowercase();
        self.diameters.insert(key.clone(), diameter);
        self.slices.insert(key, slices);
        self
    }

    /// Diameter for a size label, case-insensitive. Numeric labels pass through.
    pub fn diameter_for(&self, size: &str) -> f64 {
        let size = size.trim();
        if let Some(n) = numeric_size(size) {
            return f64::from(n);
        }
        self.diameters
            .get(&size.to_lowercase())
            .copied()
            .unwrap_or(f64::from(UNKNOWN_DIMENSION))
    }

    /// Slice count for a size label, case-insensitive. Numeric labels pass through.
    pub fn slices_for(&self, size: &str) -> i32 {
        let size = size.trim();
        if let Some(n) = numeric_size(size).and_then(|n| i32::try_from(n).ok()) {
            return n;
        }
        self.slices
            .get(&size.to_lowercase())
            .copied()
            .unwrap_or(UNKNOWN_DIMENSION)
    }

    /// Raw pizza record for a captured variant, with size lookups applied.
    pub fn raw_pizza(&self, variant: Variant) -> RawPizza {
        RawPizza {
            product: RawProduct {
                vendor: Some(self.id.clone()),
                name: variant.title,
                price: variant.price,
                image: variant.image,
                ..Default::default()
            },
            diameter: Some(self.diameter_for(&variant.size)),
            slices: Some(self.slices_for(&variant.size)),
            size: Some(variant.size),
            base: Some(variant.crust),
            toppings: Some(variant.toppings),
            sauce: None,
        }
    }

    pub fn raw_side(&self, listing: SideListing) -> RawSide {
        RawSide {
            product: RawProduct {
                vendor: Some(self.id.clone()),
                name: listing.name,
                price: listing.price,
                image: listing.image,
                description: listing.description,
                quantity: None,
            },
            category: listing.category,
        }
    }
}

/// A size label that is itself a non-negative count, such as `"12"`.
fn numeric_size(size: &str) -> Option<u32> {
    size.parse::<u32>().ok()
}
