//! Controlled vocabularies for pizza attributes.
//!
//! Each table maps a canonical key to the lowercase substrings that identify it
//! in vendor text. Tables are scanned in declaration order, so earlier entries
//! win when a vendor label contains synonyms for several keys
//! (e.g. "Cajun Chicken" must precede "Chicken").

/// A canonical-key → synonym-list table.
pub type Table = [(&'static str, &'static [&'static str])];

/// Topping sentinel for build-your-own products. Pizzas carrying it are never emitted.
pub const BUILD_YOUR_OWN: &str = "Create your own";

/// Crust families. "Thin & Crispy Crust" → "Thin".
pub static BASES: &Table = &[
    ("Stuffed", &["stuffed", "decadence", "cheesy bites"]),
    ("Other", &["garlic twist", "hotdog"]),
    ("Thin", &["thin", "italian"]),
    ("Regular", &["regular", "classic", "pan", "original"]),
    ("Thick", &["pan", "thick"]),
    ("Gluten Free", &["gluten"]),
];

/// Toppings. "Smoked Bacon Rashers" → "Bacon", "Spicy Minced Beef" → "Beef".
pub static TOPPINGS: &Table = &[
    ("Aubergines", &["aubergine"]),
    ("BBQ Sauce", &["bbq"]),
    ("Chorizo", &["chorizo"]),
    ("Salami", &["salami"]),
    ("Tomato Sauce", &["domino's own tomato sauce"]),
    ("Bacon", &["bacon"]),
    ("Spinach", &["spinach"]),
    ("Onion Bhaji", &["bhaji"]),
    ("Onions", &["onion"]),
    ("Oregano", &["oregano"]),
    ("Sausage", &["sausage"]),
    ("Olives", &["olives"]),
    ("Pineapple", &["pineapple"]),
    ("Chillies", &["chilli"]),
    ("Ham", &["ham"]),
    ("Mushrooms", &["mushroom"]),
    ("Peppers", &["red pepper", "mixed peppers", "green pepper"]),
    ("Tomatoes", &["tomato", "sunblush"]),
    ("Cajun Chicken", &["cajun chicken"]),
    ("Tandoori Chicken", &["tandoori chicken"]),
    ("Chicken", &["chicken", "chicken breast strips", "char"]),
    ("Jalapenos", &["jalap"]),
    ("Pepperoni", &["pepperoni"]),
    ("Meatballs", &["meatball"]),
    ("Beef", &["beef"]),
    ("Pork", &["pork"]),
    ("Pesto", &["pesto"]),
    ("Goat's Cheese", &["goat"]),
    ("Piri", &["piri"]),
    ("Sweetcorn", &["sweetcorn", "sweet corn"]),
    ("Pepper Confit", &["pepper confit"]),
    (BUILD_YOUR_OWN, &["freestyle", "create"]),
];

/// Sauces.
pub static SAUCES: &Table = &[("BBQ Sauce", &["bbq"]), ("Tomato Sauce", &["tomato"])];

/// Pizza styles, matched against the product name. "Vegi Supreme" → "Vegetarian".
pub static STYLES: &Table = &[
    ("Hawaiian", &["hawaiian"]),
    ("Hot", &["hot"]),
    ("BBQ", &["bbq"]),
    ("Vegetarian", &["veg"]),
    ("Meaty", &["meat"]),
];

/// Substrings marking topping entries that are presentation artifacts, not toppings.
pub static IGNORED_TOPPINGS: &[&str] = &[
    "cheese",
    "seasoning",
    "herbs",
    "base",
    "sauce",
    "mozzarella",
];
