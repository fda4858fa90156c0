// Copyright 2026 Slice Scanner Contributors
// SPDX-License-Identifier: Apache-2.0

//! Output sink for extracted entities.
//!
//! An unbounded FIFO backed by `tokio::sync::mpsc`. Adapters push entities as
//! soon as they are built; an independent consumer drains them, possibly while
//! the run is still in progress.

use slice_scanner::Entity;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Create a connected sink and receiver.
pub fn channel() -> (Sink, SinkReceiver) {
    let (tx, rx) = unbounded_channel();
    (Sink { tx }, SinkReceiver { rx })
}

/// Producer side. Cheap to clone; never blocks.
#[derive(Debug, Clone)]
pub struct Sink {
    tx: UnboundedSender<Entity>,
}

impl Sink {
    /// Append an entity. Returns `false` if the consumer has gone away.
    pub fn push(&self, entity: Entity) -> bool {
        match self.tx.send(entity) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!("sink closed, dropping {} {}", e.0.kind(), e.0.name());
                false
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer side.
#[derive(Debug)]
pub struct SinkReceiver {
    rx: UnboundedReceiver<Entity>,
}

impl SinkReceiver {
    /// Next entity, or `None` once every [`Sink`] is dropped and the queue is empty.
    pub async fn recv(&mut self) -> Option<Entity> {
        self.rx.recv().await
    }

    /// Blocking variant of [`recv`](Self::recv), for consumers on plain threads.
    pub fn blocking_recv(&mut self) -> Option<Entity> {
        self.rx.blocking_recv()
    }

    /// Everything currently queued, without waiting.
    pub fn drain(&mut self) -> Vec<Entity> {
        let mut out = Vec::new();
        while let Ok(entity) = self.rx.try_recv() {
            out.push(entity);
        }
        out
    }
}
