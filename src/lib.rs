//! netwarden — firewall companion daemon.
//!
//! Core pipeline: a background collector observes (or simulates) network
//! traffic, applies rate- and signature-based heuristics over a 10 second
//! window, and publishes events through a non-blocking channel. The
//! consumer drains on a fixed cadence, aggregates session counters and
//! forwards alerts to an append-only log store. iptables control lives in
//! [`firewall`] and only touches the core through the block counter.

#[cfg(feature = "capture")]
pub mod capture;
pub mod channel;
pub mod consumer;
pub mod detection;
pub mod event;
pub mod firewall;
pub mod logs;
pub mod monitor;
pub mod stats;

pub use channel::{EventChannel, EventPublisher};
pub use consumer::drain_cycle;
pub use detection::{Detector, RateWindow, RATE_THRESHOLD, RATE_WINDOW, SENSITIVE_PORTS};
pub use event::{AlertInfo, EventKind, MonitorEvent, PacketInfo, Payload, Severity};
pub use logs::LogManager;
pub use monitor::{
    capture_available, MonitorConfig, MonitorHandle, Observation, ObservationSource,
    PacketMonitor, SimulatedSource, SourceError,
};
pub use stats::SessionStats;
