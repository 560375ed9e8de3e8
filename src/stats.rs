//! Session-level counters driving UI summaries.

use crate::event::{EventKind, MonitorEvent};

/// Monotonically increasing counts for one process lifetime. Owned by the
/// consumer; the firewall collaborator increments `blocks` through
/// [`record_block`](Self::record_block) on a successful block action.
#[derive(Debug, Default)]
pub struct SessionStats {
    packets: u64,
    alerts: u64,
    blocks: u64,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_event(&mut self, event: &MonitorEvent) {
        match event.kind() {
            EventKind::Packet => self.packets += 1,
            EventKind::Alert => self.alerts += 1,
        }
    }

    pub fn record_block(&mut self) {
        self.blocks += 1;
    }

    pub fn packets(&self) -> u64 {
        self.packets
    }

    pub fn alerts(&self) -> u64 {
        self.alerts
    }

    pub fn blocks(&self) -> u64 {
        self.blocks
    }
}
