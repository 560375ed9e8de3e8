//! Collector -> consumer event hand-off.
//!
//! An unbounded crossbeam channel: publish never blocks and the channel
//! itself never drops an event. Backpressure is deliberately absent — the
//! consumer drains far more often than the collector produces.

use crate::event::MonitorEvent;
use crossbeam_channel::{unbounded, Receiver, Sender};

/// Consumer-side end of the event queue. Create once, hand the
/// [`EventPublisher`] to the collector, keep this for draining.
pub struct EventChannel {
    tx: Sender<MonitorEvent>,
    rx: Receiver<MonitorEvent>,
}

impl Default for EventChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl EventChannel {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    /// A cloneable publishing handle for the collector thread.
    pub fn publisher(&self) -> EventPublisher {
        EventPublisher {
            tx: self.tx.clone(),
        }
    }

    /// Removes and returns every queued event in FIFO order. Returns
    /// immediately with an empty vec when there is nothing queued.
    pub fn drain_all(&self) -> Vec<MonitorEvent> {
        self.rx.try_iter().collect()
    }
}

/// Producer-side handle. Publishing is non-blocking; an event sent after
/// the consumer end is gone (process shutdown) is silently dropped.
#[derive(Clone)]
pub struct EventPublisher {
    tx: Sender<MonitorEvent>,
}

impl EventPublisher {
    pub fn publish(&self, event: MonitorEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!("event channel closed, dropping event");
        }
    }
}
