// Copyright 2026 Slice Scanner Contributors
// SPDX-License-Identifier: Apache-2.0

//! `slicescan run` and `slicescan schedule`.

use crate::config::CollectorConfig;
use crate::orchestrator::{Orchestrator, RunReport};
use crate::output::{spawn_consumer, CatalogWriter};
use crate::scheduler::Scheduler;
use crate::sink;
use crate::surface::chromium::ChromiumDriver;
use crate::surface::{Driver, NoopDriver};
use crate::vendors::registry;
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{info, warn};

/// One extraction run, then exit.
pub async fn run(config: &CollectorConfig) -> Result<()> {
    let pipeline = Pipeline::start(config).await?;
    let result = pipeline.orchestrator.run_once().await;
    let written = pipeline.finish().await?;

    let report = result?;
    print_report(&report, written, config);
    Ok(())
}

/// Recurring runs until Ctrl-C.
pub async fn schedule(config: &CollectorConfig) -> Result<()> {
    let scheduler = Scheduler::parse(&config.schedule)?;
    let pipeline = Pipeline::start(config).await?;

    let shutdown = Arc::new(Notify::new());
    let signal = Arc::clone(&shutdown);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested; finishing current run");
            signal.notify_one();
        }
    });

    info!(
        "scheduling extraction with `{}` (run on start: {})",
        scheduler.expression(),
        config.run_on_start
    );
    let runs = scheduler
        .run(&pipeline.orchestrator, shutdown, config.run_on_start)
        .await;
    let written = pipeline.finish().await?;
    let runs = runs?;

    eprintln!(
        "  Stopped after {runs} run(s); {written} record(s) written to {}",
        config.catalog_path.display()
    );
    Ok(())
}

/// Driver, orchestrator and catalog consumer wired together.
struct Pipeline {
    driver: Arc<dyn Driver>,
    orchestrator: Orchestrator,
    consumer: tokio::task::JoinHandle<u64>,
}

impl Pipeline {
    async fn start(config: &CollectorConfig) -> Result<Self> {
        let writer = CatalogWriter::open(&config.catalog_path)?;
        let (sink, rx) = sink::channel();
        let consumer = spawn_consumer(writer, rx);

        let driver: Arc<dyn Driver> = match ChromiumDriver::launch(config.chromium_path.as_ref()).await {
            Ok(driver) => {
                info!("Chromium driver initialized");
                Arc::new(driver)
            }
            Err(e) => {
                warn!("failed to initialize Chromium: {e:#}");
                warn!("runs will fail until a browser is available");
                Arc::new(NoopDriver)
            }
        };

        let orchestrator = Orchestrator::new(Arc::clone(&driver), registry(config), sink);
        Ok(Self {
            driver,
            orchestrator,
            consumer,
        })
    }

    /// Drop the producer side, wait for the catalog to drain and shut the
    /// driver down. Returns the number of records written.
    async fn finish(self) -> Result<u64> {
        let Self {
            driver,
            orchestrator,
            consumer,
        } = self;
        drop(orchestrator);
        let written = consumer.await.context("catalog writer task failed")?;
        if let Err(e) = driver.shutdown().await {
            warn!("driver shutdown failed: {e:#}");
        }
        Ok(written)
    }
}

fn print_report(report: &RunReport, written: u64, config: &CollectorConfig) {
    for outcome in &report.vendors {
        match (&outcome.report, &outcome.error) {
            (Some(r), _) if r.is_clean() => {
                eprintln!("  {}: {} emitted, {} dropped", r.vendor, r.emitted, r.dropped)
            }
            (Some(r), _) => eprintln!(
                "  {}: {} emitted, {} dropped (partial: {})",
                r.vendor,
                r.emitted,
                r.dropped,
                r.pizza_error
                    .as_deref()
                    .or(r.side_error.as_deref())
                    .unwrap_or("unknown error")
            ),
            (None, error) => eprintln!(
                "  {}: failed: {}",
                outcome.vendor,
                error.as_deref().unwrap_or("unknown error")
            ),
        }
    }
    eprintln!(
        "  {written} record(s) written to {} in {}ms",
        config.catalog_path.display(),
        report.elapsed_ms
    );
}
