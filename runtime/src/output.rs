// Copyright 2026 Slice Scanner Contributors
// SPDX-License-Identifier: Apache-2.0

//! JSONL catalog writer, the default sink consumer.
//!
//! - One entity record per line, tagged with `kind`
//! - Automatic rotation when the file exceeds the size limit (50MB by default)
//! - Rotated files named `.1`, `.2`, etc. (max 5 rotations)

use crate::sink::SinkReceiver;
use anyhow::{Context, Result};
use slice_scanner::Entity;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::task::JoinHandle;

/// Catalog size before rotation (50 MB).
pub const MAX_CATALOG_SIZE: u64 = 50 * 1024 * 1024;

/// Maximum number of rotated catalog files to keep.
const MAX_ROTATIONS: u32 = 5;

/// Append-only JSONL catalog with rotation.
pub struct CatalogWriter {
    file: File,
    path: PathBuf,
    current_size: u64,
    max_size: u64,
    written: u64,
}

impl CatalogWriter {
    /// Open or create the catalog file.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = open_append(path)?;
        let current_size = file.metadata().map(|m| m.len()).unwrap_or(0);

        Ok(Self {
            file,
            path: path.to_path_buf(),
            current_size,
            max_size: MAX_CATALOG_SIZE,
            written: 0,
        })
    }

    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size.max(1);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records written since open.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Append one entity record.
    pub fn write(&mut self, entity: &Entity) -> Result<()> {
        if self.current_size >= self.max_size {
            self.rotate()?;
        }

        let json = serde_json::to_string(&entity.to_record()?)?;
        writeln!(self.file, "{json}")
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        self.current_size += json.len() as u64 + 1;
        self.written += 1;
        Ok(())
    }

    /// Write entities until every sink is dropped. Write failures are logged
    /// and the record is skipped. Blocks the calling thread.
    pub fn drain(&mut self, rx: &mut SinkReceiver) -> u64 {
        while let Some(entity) = rx.blocking_recv() {
            if let Err(e) = self.write(&entity) {
                tracing::warn!("dropping {} {}: {e:#}", entity.kind(), entity.name());
            }
        }
        if let Err(e) = self.file.flush() {
            tracing::warn!("catalog flush failed: {e}");
        }
        self.written
    }

    /// Rotate: catalog.jsonl → catalog.jsonl.1, .1 → .2, etc.
    ///
    /// If the live file cannot be moved aside, writes keep appending to it and
    /// the next write tries again.
    fn rotate(&mut self) -> Result<()> {
        self.file.flush()?;

        for i in (1..MAX_ROTATIONS).rev() {
            let from = rotation_path(&self.path, i);
            let to = rotation_path(&self.path, i + 1);
            if from.exists() {
                if let Err(e) = std::fs::rename(&from, &to) {
                    tracing::warn!("failed to rotate {} to {}: {e}", from.display(), to.display());
                }
            }
        }

        let first = rotation_path(&self.path, 1);
        if let Err(e) = std::fs::rename(&self.path, &first) {
            tracing::warn!(
                "failed to rotate {} to {}: {e}",
                self.path.display(),
                first.display()
            );
            return Ok(());
        }

        self.file = open_append(&self.path).context("failed to reopen catalog after rotation")?;
        self.current_size = 0;
        tracing::info!("rotated catalog {}", self.path.display());
        Ok(())
    }
}

/// Run `writer` on the blocking pool, draining `rx` until every sink is
/// dropped. Resolves to the number of records written.
pub fn spawn_consumer(mut writer: CatalogWriter, mut rx: SinkReceiver) -> JoinHandle<u64> {
    tokio::task::spawn_blocking(move || writer.drain(&mut rx))
}

fn open_append(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open catalog: {}", path.display()))
}

/// `catalog.jsonl.1`, `catalog.jsonl.2`, etc.
fn rotation_path(base: &Path, index: u32) -> PathBuf {
    let name = format!(
        "{}.{index}",
        base.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("catalog.jsonl")
    );
    base.with_file_name(name)
}
