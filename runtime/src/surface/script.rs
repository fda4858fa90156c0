// Copyright 2026 Slice Scanner Contributors
// SPDX-License-Identifier: Apache-2.0

//! Script builders for surface interactions.
//!
//! Every interpolated value goes through [`js_string`] and lands inside a
//! string literal, never in a code position.

/// Document loaded and no jQuery requests in flight.
pub const PAGE_IDLE: &str =
    "document.readyState === 'complete' && (!window.jQuery || window.jQuery.active === 0)";

/// Select option `index` of the `<select>` matching `selector` and fire `change`.
/// Evaluates to `true` when the option exists.
pub fn select_option(selector: &str, index: usize) -> String {
    format!(
        r#"(() => {{
            const el = document.querySelector('{}');
            if (!el || {index} >= el.options.length) return false;
            el.selectedIndex = {index};
            el.dispatchEvent(new Event('change', {{ bubbles: true }}));
            return true;
        }})()"#,
        js_string(selector)
    )
}

/// Set an input's value and fire `input`/`change`. Evaluates to `true` when found.
pub fn fill_input(selector: &str, value: &str) -> String {
    format!(
        r#"(() => {{
            const el = document.querySelector('{}');
            if (!el) return false;
            el.value = '{}';
            el.dispatchEvent(new Event('input', {{ bubbles: true }}));
            el.dispatchEvent(new Event('change', {{ bubbles: true }}));
            return true;
        }})()"#,
        js_string(selector),
        js_string(value)
    )
}

/// Click the first `<a>` whose text contains `text`. Evaluates to `true` when clicked.
pub fn click_link_containing(text: &str) -> String {
    format!(
        r#"(() => {{
            const link = [...document.querySelectorAll('a')]
                .find(a => a.textContent.includes('{}'));
            if (!link) return false;
            link.click();
            return true;
        }})()"#,
        js_string(text)
    )
}

/// Destructively read one item: take the first element matching `selector`,
/// record its `read` value, click `commit` (a descendant selector, or `""` for
/// the element itself; `None` skips the click), then apply `consume` so the
/// element no longer matches.
/// Evaluates to the read value, or `null` when nothing matches.
pub fn consume_first(
    selector: &str,
    read: ReadFrom<'_>,
    commit: Option<&str>,
    consume: Consume<'_>,
) -> String {
    let read_js = match read {
        ReadFrom::Text(None) => "el.textContent.trim()".to_string(),
        ReadFrom::Text(Some(sub)) => format!(
            "((el.querySelector('{0}') || el).textContent || '').trim()",
            js_string(sub)
        ),
        ReadFrom::Value => "el.value".to_string(),
    };
    let commit_js = match commit {
        None => String::new(),
        Some("") => "el.click();".to_string(),
        Some(sub) => format!(
            "const target = el.querySelector('{}'); if (target) target.click();",
            js_string(sub)
        ),
    };
    let consume_js = match consume {
        Consume::Remove => "el.remove();".to_string(),
        Consume::RemoveClass(class) => format!("el.classList.remove('{}');", js_string(class)),
        Consume::ClearAttribute(attr) => format!("el.setAttribute('{}', '');", js_string(attr)),
    };
    format!(
        r#"(() => {{
            const el = document.querySelector('{}');
            if (!el) return null;
            const value = {read_js};
            {commit_js}
            {consume_js}
            return value;
        }})()"#,
        js_string(selector)
    )
}

/// Where [`consume_first`] reads its value from.
#[derive(Debug, Clone, Copy)]
pub enum ReadFrom<'a> {
    /// Text of the element, or of its first descendant matching the selector.
    Text(Option<&'a str>),
    /// The element's `value` property.
    Value,
}

/// How [`consume_first`] stops an element from matching again.
#[derive(Debug, Clone, Copy)]
pub enum Consume<'a> {
    Remove,
    RemoveClass(&'a str),
    ClearAttribute(&'a str),
}

/// Add `class` to every element matching `selector`. Evaluates to the count marked.
pub fn mark_all(selector: &str, class: &str) -> String {
    format!(
        r#"(() => {{
            const els = document.querySelectorAll('{}');
            els.forEach(el => el.classList.add('{}'));
            return els.length;
        }})()"#,
        js_string(selector),
        js_string(class)
    )
}

/// Escape a string for safe injection into a single-quoted JavaScript literal.
///
/// Backslashes, quotes, backticks, and line breaks are escaped; angle brackets
/// become `\x3c`/`\x3e` so a value cannot close a `<script>` element; null
/// bytes are dropped.
pub fn js_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 8);
    for ch in s.chars() {
        match ch {
            '\\' => result.push_str("\\\\"),
            '\'' => result.push_str("\\'"),
            '"' => result.push_str("\\\""),
            '`' => result.push_str("\\`"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            '\0' => {}
            '<' => result.push_str("\\x3c"),
            '>' => result.push_str("\\x3e"),
            _ => result.push(ch),
        }
    }
    result
}
