//! Best-effort canonicalization of vendor vocabulary.

use crate::tables::{Table, IGNORED_TOPPINGS, TOPPINGS};

/// Map a raw vendor label onto a table's canonical key.
///
/// A label that already is a canonical key comes back unchanged. Otherwise the
/// first key (in table order) with a synonym occurring in the lowercased label
/// wins. Labels with no match are returned as given; normalization never fails.
pub fn normalize(table: &Table, raw: &str) -> String {
    if table.iter().any(|(key, _)| *key == raw) {
        return raw.to_string();
    }

    let lower = raw.to_lowercase();
    table
        .iter()
        .find(|(_, synonyms)| synonyms.iter().any(|s| lower.contains(s)))
        .map(|(key, _)| key.to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Whether a raw topping entry is an ignored presentation artifact (cheese, sauce, ...).
pub fn is_ignored_topping(raw: &str) -> bool {
    let lower = raw.to_lowercase();
    IGNORED_TOPPINGS.iter().any(|ignored| lower.contains(ignored))
}

/// Drop blank and ignored entries, then canonicalize what remains. Order and
/// duplicates are preserved.
pub fn clean_toppings<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    raw.iter()
        .map(|t| t.as_ref().trim())
        .filter(|t| !t.is_empty() && !is_ignored_topping(t))
        .map(|t| normalize(TOPPINGS, t))
        .collect()
}

/// Python-style title casing: uppercase after any non-alphabetic character.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

/// Join items as English prose: "Ham", "Ham and Pineapple", "Ham, Pineapple and Onions".
pub fn join_prose<S: AsRef<str>>(items: &[S]) -> String {
    match items {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(|s| s.as_ref()).collect();
            format!("{} and {}", head.join(", "), last.as_ref())
        }
    }
}
