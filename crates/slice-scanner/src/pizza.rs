//! Pizza entity: canonical attributes and value-for-money metrics.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use crate::normalize::{clean_toppings, join_prose, normalize, title_case};
use crate::product::{identity_hash, Product, RawProduct};
use crate::tables::{BASES, BUILD_YOUR_OWN, SAUCES, STYLES};
use crate::types::{CatalogError, CatalogResult};

/// Slices one person is expected to eat.
pub const SLICES_PER_PERSON: i32 = 3;

/// Sauce assumed when the vendor does not state one.
pub const DEFAULT_SAUCE: &str = "tomato";

/// Pizza fields as captured from a vendor surface, before validation.
#[derive(Debug, Clone, Default)]
pub struct RawPizza {
    pub product: RawProduct,
    /// Raw vendor size label.
    pub size: Option<String>,
    /// Raw vendor crust label.
    pub base: Option<String>,
    /// Inches; `-1` when the vendor table does not know the size.
    pub diameter: Option<f64>,
    /// `-1` when the vendor table does not know the size.
    pub slices: Option<i32>,
    pub toppings: Option<Vec<String>>,
    pub sauce: Option<String>,
}

/// A validated pizza variant.
///
/// Derived metrics are methods, recomputed from the stored fields on every call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pizza {
    #[serde(flatten)]
    pub product: Product,
    pub size: String,
    pub base: String,
    pub diameter: f64,
    pub slices: i32,
    pub toppings: Vec<String>,
    pub sauce: String,
    pub style: String,
    pub base_style: String,
}

/// Snapshot of the derived pizza metrics, rounded to two places.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PizzaMetrics {
    pub area: f64,
    pub area_per_slice: f64,
    #[serde(rename = "cost_psi")]
    pub cost_per_square_inch: f64,
    pub cost_per_slice: f64,
    pub serves: i32,
    pub score: i64,
}

impl Pizza {
    /// Validate a captured record and compute its canonical attributes.
    pub fn new(raw: RawPizza) -> CatalogResult<Self> {
        let mut product = Product::from_raw(raw.product)?;
        let size = raw.size.ok_or(CatalogError::MissingField("size"))?;
        let base = raw.base.ok_or(CatalogError::MissingField("base"))?;
        let diameter = raw.diameter.ok_or(CatalogError::MissingField("diameter"))?;
        let slices = raw.slices.ok_or(CatalogError::MissingField("slices"))?;
        let raw_toppings = raw.toppings.ok_or(CatalogError::MissingField("toppings"))?;

        let toppings = clean_toppings(&raw_toppings);
        if toppings.is_empty() {
            return Err(CatalogError::NoToppings);
        }
        if toppings.iter().any(|t| t == BUILD_YOUR_OWN) {
            return Err(CatalogError::BuildYourOwn);
        }
        if product.price <= Decimal::ZERO {
            return Err(CatalogError::InvalidPrice(product.price));
        }
        if diameter == 0.0 || !diameter.is_finite() {
            return Err(CatalogError::InvalidDimension {
                field: "diameter",
                value: diameter,
            });
        }
        if slices == 0 {
            return Err(CatalogError::InvalidDimension {
                field: "slices",
                value: 0.0,
            });
        }

        let sauce = normalize(SAUCES, raw.sauce.as_deref().unwrap_or(DEFAULT_SAUCE));
        let style = normalize(STYLES, &product.name);
        let base_style = normalize(BASES, &base);
        if product.description.is_none() {
            product.description = Some(describe(&base, &toppings));
        }
        product.hash = identity_hash(&[&product.vendor, &product.name, &size, &base]);

        let mut pizza = Self {
            product,
            size,
            base,
            diameter,
            slices,
            toppings,
            sauce,
            style,
            base_style,
        };
        pizza.product.score = pizza.score();
        Ok(pizza)
    }

    /// Area in square inches.
    pub fn area(&self) -> f64 {
        round2(std::f64::consts::PI * (self.diameter / 2.0).powi(2))
    }

    /// Area of one slice in square inches.
    pub fn area_per_slice(&self) -> f64 {
        round2(self.area() / f64::from(self.slices))
    }

    pub fn cost_per_slice(&self) -> f64 {
        round2(self.price_f64() / f64::from(self.slices))
    }

    pub fn cost_per_square_inch(&self) -> f64 {
        round2(self.price_f64() / self.area())
    }

    /// Number of people fed, at [`SLICES_PER_PERSON`] each.
    pub fn serves(&self) -> i32 {
        self.slices / SLICES_PER_PERSON
    }

    /// Value score: area times toppings (cheese counts as one) per unit price.
    pub fn score(&self) -> i64 {
        let toppings = (self.toppings.len() + 1) as f64;
        (self.area() * toppings / self.price_f64() * 10.0).floor() as i64
    }

    pub fn metrics(&self) -> PizzaMetrics {
        PizzaMetrics {
            area: self.area(),
            area_per_slice: self.area_per_slice(),
            cost_per_square_inch: self.cost_per_square_inch(),
            cost_per_slice: self.cost_per_slice(),
            serves: self.serves(),
            score: self.score(),
        }
    }

    /// JSON record with the derived metrics merged in.
    pub fn to_record(&self) -> serde_json::Result<Value> {
        let mut record = serde_json::to_value(self)?;
        if let (Value::Object(map), Value::Object(metrics)) =
            (&mut record, serde_json::to_value(self.metrics())?)
        {
            map.extend(metrics);
        }
        Ok(record)
    }

    fn price_f64(&self) -> f64 {
        self.product.price.to_f64().unwrap_or(f64::NAN)
    }
}

/// "Thin Base with Ham and Pineapple."
fn describe(base: &str, toppings: &[String]) -> String {
    let base = base.to_lowercase().replace("crust", "").replace("base", "");
    format!(
        "{} Base with {}.",
        title_case(base.trim()),
        join_prose(toppings)
    )
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
