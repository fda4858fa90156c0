// Copyright 2026 Slice Scanner Contributors
// SPDX-License-Identifier: Apache-2.0

//! `slicescan vendors`: print vendor registrations as JSON.

use crate::config::CollectorConfig;
use crate::vendors::registry;
use anyhow::Result;

pub fn run(config: &CollectorConfig) -> Result<()> {
    let registrations: Vec<_> = registry(config)
        .iter()
        .map(|vendor| vendor.registration().clone())
        .collect();
    println!("{}", serde_json::to_string_pretty(&registrations)?);
    Ok(())
}
