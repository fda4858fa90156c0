// Copyright 2026 Slice Scanner Contributors
// SPDX-License-Identifier: Apache-2.0

//! `slicescan next`: print upcoming fire times of the schedule.

use crate::scheduler::Scheduler;
use anyhow::Result;

pub fn run(expression: &str, count: usize) -> Result<()> {
    let scheduler = Scheduler::parse(expression)?;
    let upcoming = scheduler.upcoming(count);
    if upcoming.is_empty() {
        eprintln!("  Schedule `{expression}` never fires again.");
    }
    for time in upcoming {
        println!("{}", time.to_rfc3339());
    }
    Ok(())
}
