//! Heuristic intrusion detection over a sliding time window.
//!
//! Two rules run per observed connection attempt, in a fixed order:
//! a sensitive-port signature check and a per-source rate check. Both may
//! fire for the same observation.

use crate::event::{MonitorEvent, Severity};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Length of the rate-counting window. Counts accumulate until the window
/// expires, then everything is cleared at once.
pub const RATE_WINDOW: Duration = Duration::from_secs(10);

/// Per-source observation count at which the rate rule fires.
pub const RATE_THRESHOLD: u32 = 15;

/// Destination ports that always trigger a WARN alert: SSH, Telnet, RDP, SMB.
pub const SENSITIVE_PORTS: [u16; 4] = [22, 23, 3389, 445];

/// Reset-on-expiry per-source hit counter.
///
/// The reset is a hard one: once more than [`RATE_WINDOW`] has elapsed since
/// `window_start`, every source's count is cleared and the window restarts at
/// `now`. This is not a rolling or decaying window.
#[derive(Debug)]
pub struct RateWindow {
    counts: HashMap<String, u32>,
    window_start: Instant,
}

impl RateWindow {
    pub fn new(now: Instant) -> Self {
        Self {
            counts: HashMap::new(),
            window_start: now,
        }
    }

    /// Records one observation for `source` and returns its count within the
    /// current window. Expiry is checked first, so the first call after a
    /// stale window always returns 1. Never fails.
    ///
    /// A source at or above [`RATE_THRESHOLD`] re-fires the rate rule on
    /// every subsequent call within the same window; the repeat alerting is
    /// intentional, not edge-triggered.
    pub fn record(&mut self, source: &str, now: Instant) -> u32 {
        if now.duration_since(self.window_start) > RATE_WINDOW {
            self.counts.clear();
            self.window_start = now;
        }
        let count = self.counts.entry(source.to_string()).or_insert(0);
        *count += 1;
        *count
    }
}

/// Stateless-per-call detector; all state lives in the owned [`RateWindow`].
///
/// Owned exclusively by the collector thread, so no locking is needed.
#[derive(Debug)]
pub struct Detector {
    window: RateWindow,
}

impl Detector {
    pub fn new(now: Instant) -> Self {
        Self {
            window: RateWindow::new(now),
        }
    }

    /// Evaluates one observation and returns zero or more alerts, port alert
    /// first. With `dport` absent only the rate rule runs (the increment
    /// still occurs).
    pub fn evaluate(&mut self, src: &str, dport: Option<u16>, now: Instant) -> Vec<MonitorEvent> {
        let mut alerts = Vec::new();

        if let Some(port) = dport {
            if SENSITIVE_PORTS.contains(&port) {
                alerts.push(MonitorEvent::alert(
                    Severity::Warn,
                    format!("Suspicious target port {port} reached from {src}"),
                ));
            }
        }

        let count = self.window.record(src, now);
        if count >= RATE_THRESHOLD {
            alerts.push(MonitorEvent::alert(
                Severity::Danger,
                format!("High rate from {src} ({count} events / 10s)"),
            ));
        }

        alerts
    }
}
