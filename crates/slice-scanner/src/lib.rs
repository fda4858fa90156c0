//! Slice Scanner core catalog library: vendor vocabulary canonicalization,
//! pizza value metrics, and validated product entities.

pub mod normalize;
pub mod pizza;
pub mod product;
pub mod registration;
pub mod side;
pub mod tables;
pub mod types;

pub use normalize::{clean_toppings, normalize};
pub use pizza::{Pizza, PizzaMetrics, RawPizza};
pub use product::{Product, RawProduct};
pub use registration::{SideListing, Variant, VendorRegistration, UNKNOWN_DIMENSION};
pub use side::{RawSide, Side};
pub use types::*;
