// Copyright 2026 Slice Scanner Contributors
// SPDX-License-Identifier: Apache-2.0

//! Extraction orchestrator: one surface session per run, every registered
//! vendor in order, failures isolated per vendor.

use crate::sink::Sink;
use crate::surface::Driver;
use crate::vendors::{extract, ExtractReport, Vendor};
use anyhow::{Context, Result};
use futures::FutureExt;
use serde::Serialize;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// What happened to one vendor during a run.
#[derive(Debug, Clone, Serialize)]
pub struct VendorOutcome {
    pub vendor: String,
    /// Present when `login` succeeded and the adapter returned.
    pub report: Option<ExtractReport>,
    /// Login failure or panic message.
    pub error: Option<String>,
}

impl VendorOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Summary of one `run_once`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub vendors: Vec<VendorOutcome>,
    pub emitted: usize,
    pub dropped: usize,
    pub elapsed_ms: u64,
}

impl RunReport {
    pub fn failed(&self) -> usize {
        self.vendors.iter().filter(|v| !v.succeeded()).count()
    }
}

pub struct Orchestrator {
    driver: Arc<dyn Driver>,
    vendors: Vec<Arc<dyn Vendor>>,
    sink: Sink,
}

impl Orchestrator {
    pub fn new(driver: Arc<dyn Driver>, vendors: Vec<Arc<dyn Vendor>>, sink: Sink) -> Self {
        Self {
            driver,
            vendors,
            sink,
        }
    }

    pub fn vendors(&self) -> &[Arc<dyn Vendor>] {
        &self.vendors
    }

    /// Run every vendor once against a single session.
    ///
    /// Only a failure to open the session is returned as an error. Vendor
    /// errors and panics are logged and recorded in the report, and the
    /// session is closed exactly once regardless.
    pub async fn run_once(&self) -> Result<RunReport> {
        let started = Instant::now();
        let mut surface = self
            .driver
            .new_session()
            .await
            .context("failed to open surface session")?;
        info!("extraction run started for {} vendor(s)", self.vendors.len());

        let mut report = RunReport::default();
        for vendor in &self.vendors {
            let id = vendor.registration().id.clone();
            let attempt = AssertUnwindSafe(extract(vendor.as_ref(), surface.as_mut(), &self.sink))
                .catch_unwind()
                .await;

            let outcome = match attempt {
                Ok(Ok(extracted)) => {
                    report.emitted += extracted.emitted;
                    report.dropped += extracted.dropped;
                    VendorOutcome {
                        vendor: id,
                        report: Some(extracted),
                        error: None,
                    }
                }
                Ok(Err(e)) => {
                    error!(vendor = %id, "extraction failed: {e:#}");
                    VendorOutcome {
                        vendor: id,
                        report: None,
                        error: Some(format!("{e:#}")),
                    }
                }
                Err(panic) => {
                    let message = panic_message(panic.as_ref());
                    error!(vendor = %id, "extraction panicked: {message}");
                    VendorOutcome {
                        vendor: id,
                        report: None,
                        error: Some(format!("panicked: {message}")),
                    }
                }
            };
            report.vendors.push(outcome);
        }

        if let Err(e) = surface.close().await {
            warn!("failed to close surface session: {e:#}");
        }

        report.elapsed_ms = started.elapsed().as_millis() as u64;
        info!(
            "extraction run finished: emitted={} dropped={} failed_vendors={} elapsed={}ms",
            report.emitted,
            report.dropped,
            report.failed(),
            report.elapsed_ms
        );
        Ok(report)
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink;
    use crate::surface::NoopDriver;

    #[tokio::test]
    async fn test_session_failure_is_an_error() {
        let (sink, _rx) = sink::channel();
        let orchestrator = Orchestrator::new(Arc::new(NoopDriver), Vec::new(), sink);
        let err = orchestrator.run_once().await.unwrap_err();
        assert!(format!("{err:#}").contains("browser not available"));
    }

    #[test]
    fn test_panic_message() {
        let boxed: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(boxed.as_ref()), "boom");
        let boxed: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(boxed.as_ref()), "bang");
        let boxed: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(boxed.as_ref()), "unknown panic");
    }
}
