// Copyright 2026 Slice Scanner Contributors
// SPDX-License-Identifier: Apache-2.0

//! Recurring extraction driven by a cron expression.
//!
//! Runs are strictly sequential: the next fire time is computed only after the
//! previous run finishes, so a late run never overlaps the next one.

use crate::orchestrator::Orchestrator;
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{error, info};

#[derive(Debug, Clone)]
pub struct Scheduler {
    expression: String,
    schedule: Schedule,
}

impl Scheduler {
    /// Parse a cron expression with a seconds field (6 or 7 fields).
    pub fn parse(expression: &str) -> Result<Self> {
        let schedule = Schedule::from_str(expression)
            .map_err(|e| anyhow!("invalid schedule `{expression}`: {e}"))?;
        Ok(Self {
            expression: expression.to_string(),
            schedule,
        })
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// First fire time strictly after `after`.
    pub fn next_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule.after(&after).next()
    }

    /// The next `count` fire times from now.
    pub fn upcoming(&self, count: usize) -> Vec<DateTime<Utc>> {
        self.schedule.upcoming(Utc).take(count).collect()
    }

    /// Sleep until each fire time and run the orchestrator, until `shutdown`
    /// is notified. With `run_on_start`, one run happens immediately.
    ///
    /// Shutdown is only observed between runs; a run in progress completes.
    /// Returns the number of runs attempted.
    pub async fn run(
        &self,
        orchestrator: &Orchestrator,
        shutdown: Arc<Notify>,
        run_on_start: bool,
    ) -> Result<usize> {
        let mut runs = 0;
        if run_on_start {
            run_logged(orchestrator).await;
            runs += 1;
        }

        loop {
            let now = Utc::now();
            let Some(next) = self.next_after(now) else {
                info!("schedule `{}` has no further fire times", self.expression);
                return Ok(runs);
            };
            info!("next extraction run at {}", next.to_rfc3339());
            let wait = (next - now).to_std().unwrap_or_default();

            tokio::select! {
                _ = shutdown.notified() => {
                    info!("scheduler stopping");
                    return Ok(runs);
                }
                _ = tokio::time::sleep(wait) => {
                    run_logged(orchestrator).await;
                    runs += 1;
                }
            }
        }
    }
}

async fn run_logged(orchestrator: &Orchestrator) {
    if let Err(e) = orchestrator.run_once().await {
        error!("extraction run failed: {e:#}");
    }
}
