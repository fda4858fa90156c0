// Copyright 2026 Slice Scanner Contributors
// SPDX-License-Identifier: Apache-2.0

//! Collector configuration from `SLICE_SCANNER_*` environment variables.

use crate::surface::Timeouts;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SCHEDULE: &str = "0 0 3 * * *";
pub const DEFAULT_POSTCODE: &str = "sw116ru";

const DEFAULT_WAIT_MS: u64 = 3_000;
const DEFAULT_SHORT_WAIT_MS: u64 = 500;
const DEFAULT_SETTLE_MS: u64 = 400;
const DEFAULT_NAV_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Cron expression with a seconds field.
    pub schedule: String,
    pub timeouts: Timeouts,
    /// JSONL catalog output.
    pub catalog_path: PathBuf,
    pub chromium_path: Option<PathBuf>,
    /// Postcode used for the Dominos store search.
    pub postcode: String,
    /// Run once immediately before waiting for the first fire time.
    pub run_on_start: bool,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl CollectorConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Unparseable values fall back
    /// to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let string = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let millis = |name: &str, default_value: u64| {
            Duration::from_millis(
                string(name)
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(default_value),
            )
        };

        Self {
            schedule: string("SLICE_SCANNER_SCHEDULE").unwrap_or_else(|| DEFAULT_SCHEDULE.into()),
            timeouts: Timeouts {
                wait: millis("SLICE_SCANNER_WAIT_MS", DEFAULT_WAIT_MS),
                short_wait: millis("SLICE_SCANNER_SHORT_WAIT_MS", DEFAULT_SHORT_WAIT_MS),
                settle: millis("SLICE_SCANNER_SETTLE_MS", DEFAULT_SETTLE_MS),
                navigation: millis("SLICE_SCANNER_NAV_TIMEOUT_MS", DEFAULT_NAV_TIMEOUT_MS),
            },
            catalog_path: string("SLICE_SCANNER_CATALOG")
                .map(PathBuf::from)
                .unwrap_or_else(default_catalog_path),
            chromium_path: string("SLICE_SCANNER_CHROMIUM_PATH").map(PathBuf::from),
            postcode: string("SLICE_SCANNER_POSTCODE").unwrap_or_else(|| DEFAULT_POSTCODE.into()),
            run_on_start: string("SLICE_SCANNER_RUN_ON_START")
                .map(|v| parse_bool(&v))
                .unwrap_or(true),
        }
    }
}

/// `~/.slice-scanner/catalog.jsonl`, or relative to the working directory
/// when there is no home directory.
pub fn default_catalog_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".slice-scanner")
        .join("catalog.jsonl")
}

fn parse_bool(raw: &str) -> bool {
    !matches!(
        raw.to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}
