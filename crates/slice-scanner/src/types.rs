//! Catalog entities and error types.

use serde_json::Value;

use crate::pizza::Pizza;
use crate::side::Side;

/// A validated product ready for the output sink.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Pizza(Pizza),
    Side(Side),
}

impl Entity {
    /// Collection the entity belongs to: `"pizza"` or `"sides"`.
    pub fn kind(&self) -> &'static str {
        match self {
            Entity::Pizza(_) => "pizza",
            Entity::Side(_) => "sides",
        }
    }

    pub fn vendor(&self) -> &str {
        match self {
            Entity::Pizza(p) => &p.product.vendor,
            Entity::Side(s) => &s.product.vendor,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Entity::Pizza(p) => &p.product.name,
            Entity::Side(s) => &s.product.name,
        }
    }

    /// Identity hash used for deduplication across runs.
    pub fn hash(&self) -> &str {
        match self {
            Entity::Pizza(p) => &p.product.hash,
            Entity::Side(s) => &s.product.hash,
        }
    }

    /// Flat JSON record, derived pizza metrics included, tagged with `kind`.
    pub fn to_record(&self) -> serde_json::Result<Value> {
        let mut record = match self {
            Entity::Pizza(p) => p.to_record()?,
            Entity::Side(s) => serde_json::to_value(s)?,
        };
        if let Value::Object(map) = &mut record {
            map.insert("kind".to_string(), Value::from(self.kind()));
        }
        Ok(record)
    }
}

impl From<Pizza> for Entity {
    fn from(p: Pizza) -> Self {
        Entity::Pizza(p)
    }
}

impl From<Side> for Entity {
    fn from(s: Side) -> Self {
        Entity::Side(s)
    }
}

/// Reasons a captured record cannot become an entity.
///
/// These are expected during extraction; the record is dropped and the run continues.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("No toppings left after cleaning")]
    NoToppings,

    #[error("Build-your-own pizzas are not catalogued")]
    BuildYourOwn,

    #[error("Price must be positive, got {0}")]
    InvalidPrice(rust_decimal::Decimal),

    #[error("Invalid {field}: {value}")]
    InvalidDimension { field: &'static str, value: f64 },
}

/// Convenience result type.
pub type CatalogResult<T> = Result<T, CatalogError>;
