//! Event types flowing from the collector to the consumer.

use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// Severity of an alert, doubling as the level of a log-store line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Warn,
    Error,
    Danger,
}

impl Severity {
    /// Fixed-width label used in log lines.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Danger => "DANGER",
        }
    }
}

/// One observed (or simulated) network connection attempt.
#[derive(Debug, Clone, Serialize)]
pub struct PacketInfo {
    pub src: String,
    pub dst: String,
    pub proto: String,
    /// Destination port, when one could be extracted. Simulated packets
    /// never carry one.
    pub dport: Option<u16>,
    /// Free-form marker; the simulated source uses it for its sequence tag.
    pub info: Option<String>,
}

/// A heuristic warning about an observation or pattern of observations.
#[derive(Debug, Clone, Serialize)]
pub struct AlertInfo {
    pub severity: Severity,
    pub message: String,
}

/// Discriminant of a [`MonitorEvent`], handy for counters and filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Packet,
    Alert,
}

/// Payload variants. Keeping the data inside the enum makes a
/// kind/payload mismatch unrepresentable.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Payload {
    Packet(PacketInfo),
    Alert(AlertInfo),
}

/// The immutable unit of information published by the monitor. Ownership
/// moves to the channel on publish and to the consumer on receipt.
#[derive(Debug, Clone, Serialize)]
pub struct MonitorEvent {
    /// Unix seconds at construction time.
    pub timestamp: f64,
    #[serde(flatten)]
    pub payload: Payload,
}

impl MonitorEvent {
    pub fn packet(info: PacketInfo) -> Self {
        Self {
            timestamp: unix_now(),
            payload: Payload::Packet(info),
        }
    }

    pub fn alert(severity: Severity, message: String) -> Self {
        Self {
            timestamp: unix_now(),
            payload: Payload::Alert(AlertInfo { severity, message }),
        }
    }

    pub fn kind(&self) -> EventKind {
        match self.payload {
            Payload::Packet(_) => EventKind::Packet,
            Payload::Alert(_) => EventKind::Alert,
        }
    }
}

fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
