//! Consumer-side drain cycle.
//!
//! Runs on a fixed cadence in the foreground task: empty the channel,
//! update session counters and forward alerts to the log store. Never
//! raises to the caller; a failed log append is traced and skipped.

use crate::channel::EventChannel;
use crate::event::{MonitorEvent, Payload, Severity};
use crate::logs::LogManager;
use crate::stats::SessionStats;

/// One full drain pass in receipt order. Packet events bump the packet
/// counter; alert events bump the alert counter and land in the log store
/// at WARN (ERROR-severity alerts at ERROR). Returns the drained events so
/// display layers can render them.
pub fn drain_cycle(
    channel: &EventChannel,
    stats: &mut SessionStats,
    logs: &LogManager,
) -> Vec<MonitorEvent> {
    let events = channel.drain_all();
    for event in &events {
        stats.record_event(event);
        if let Payload::Alert(alert) = &event.payload {
            let level = match alert.severity {
                Severity::Error => Severity::Error,
                _ => Severity::Warn,
            };
            if let Err(e) = logs.append(level, &alert.message) {
                tracing::warn!(error = %e, "failed to append alert to log store");
            }
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{MonitorEvent, PacketInfo, Severity};
    use tempfile::tempdir;

    fn packet(src: &str) -> MonitorEvent {
        MonitorEvent::packet(PacketInfo {
            src: src.into(),
            dst: "10.0.0.2".into(),
            proto: "TCP".into(),
            dport: Some(80),
            info: None,
        })
    }

    #[test]
    fn drain_updates_counters_and_forwards_alerts() {
        let dir = tempdir().unwrap();
        let logs = LogManager::new(dir.path()).unwrap();
        let mut stats = SessionStats::new();
        let channel = EventChannel::new();
        let publisher = channel.publisher();

        publisher.publish(packet("10.0.0.1"));
        publisher.publish(MonitorEvent::alert(Severity::Danger, "High rate from 10.0.0.1".into()));
        publisher.publish(packet("10.0.0.1"));

        let drained = drain_cycle(&channel, &mut stats, &logs);
        assert_eq!(drained.len(), 3);
        assert_eq!(stats.packets(), 2);
        assert_eq!(stats.alerts(), 1);

        let lines = logs.read_last(10).unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("WARN"));
        assert!(lines[0].contains("High rate from 10.0.0.1"));
    }

    #[test]
    fn error_alerts_are_logged_at_error() {
        let dir = tempdir().unwrap();
        let logs = LogManager::new(dir.path()).unwrap();
        let mut stats = SessionStats::new();
        let channel = EventChannel::new();

        channel
            .publisher()
            .publish(MonitorEvent::alert(Severity::Error, "Monitor error: boom".into()));
        drain_cycle(&channel, &mut stats, &logs);

        let lines = logs.read_last(1).unwrap();
        assert!(lines[0].contains("ERROR"));
    }

    #[test]
    fn empty_channel_is_a_no_op() {
        let dir = tempdir().unwrap();
        let logs = LogManager::new(dir.path()).unwrap();
        let mut stats = SessionStats::new();
        let channel = EventChannel::new();

        assert!(drain_cycle(&channel, &mut stats, &logs).is_empty());
        assert_eq!(stats.packets(), 0);
        assert!(logs.read_last(10).unwrap().is_empty());
    }

    #[test]
    fn packets_never_reach_the_log_store() {
        let dir = tempdir().unwrap();
        let logs = LogManager::new(dir.path()).unwrap();
        let mut stats = SessionStats::new();
        let channel = EventChannel::new();

        for _ in 0..5 {
            channel.publisher().publish(packet("10.0.0.1"));
        }
        drain_cycle(&channel, &mut stats, &logs);

        assert_eq!(stats.packets(), 5);
        assert!(logs.read_last(10).unwrap().is_empty());
    }
}
