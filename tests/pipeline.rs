//! End-to-end pipeline test: collector thread -> channel -> drain cycle ->
//! session stats and log store.

use netwarden::{
    drain_cycle, EventChannel, EventKind, LogManager, MonitorConfig, Observation,
    ObservationSource, PacketMonitor, Payload, SessionStats, SourceError,
};
use std::thread;
use std::time::Duration;
use tempfile::tempdir;

/// Feeds a fixed script of observations, then idles.
struct ScriptedSource {
    script: Vec<Observation>,
}

impl ObservationSource for ScriptedSource {
    fn next_observation(&mut self) -> Result<Option<Observation>, SourceError> {
        if self.script.is_empty() {
            thread::sleep(Duration::from_millis(5));
            return Ok(None);
        }
        Ok(Some(self.script.remove(0)))
    }

    fn describe(&self) -> &'static str {
        "scripted"
    }
}

fn observation(src: &str, dport: Option<u16>) -> Observation {
    Observation {
        src: src.to_string(),
        dst: "192.0.2.1".to_string(),
        proto: "TCP".to_string(),
        dport,
        info: None,
    }
}

#[test]
fn scripted_burst_flows_through_to_stats_and_logs() {
    let dir = tempdir().unwrap();
    let logs = LogManager::new(dir.path()).unwrap();
    let mut stats = SessionStats::new();
    let channel = EventChannel::new();

    // One RDP probe followed by a 15-observation burst from the same source:
    // expect one WARN (port 3389) plus DANGER alerts on the 15th and 16th
    // observations.
    let mut script = vec![observation("203.0.113.9", Some(3389))];
    for _ in 0..15 {
        script.push(observation("203.0.113.9", Some(8080)));
    }

    let monitor = PacketMonitor::new(MonitorConfig::default(), channel.publisher());
    let handle = monitor.spawn_with(Box::new(ScriptedSource { script }));

    // Drain on a cadence until the script has fully flowed through.
    let mut drained = Vec::new();
    for _ in 0..40 {
        drained.extend(drain_cycle(&channel, &mut stats, &logs));
        if stats.packets() == 16 && stats.alerts() == 3 {
            break;
        }
        thread::sleep(Duration::from_millis(10));
    }

    handle.stop();
    handle.join();
    drained.extend(drain_cycle(&channel, &mut stats, &logs));

    assert_eq!(stats.packets(), 16);
    assert_eq!(stats.alerts(), 3);
    assert_eq!(stats.blocks(), 0);

    // First event is the probe packet, second its port alert.
    assert_eq!(drained[0].kind(), EventKind::Packet);
    match &drained[1].payload {
        Payload::Alert(alert) => assert!(alert.message.contains("port 3389")),
        _ => panic!("expected port alert right after the probe packet"),
    }

    // All three alerts were forwarded to the log store at WARN.
    let lines = logs.read_last(10).unwrap();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("Suspicious target port 3389"));
    assert!(lines[1].contains("High rate from 203.0.113.9 (15 events / 10s)"));
    assert!(lines[2].contains("High rate from 203.0.113.9 (16 events / 10s)"));
    assert!(lines.iter().all(|l| l.contains("WARN")));

    // Keyword search finds the alerts case-insensitively.
    let matches = logs.search("HIGH RATE", 10).unwrap();
    assert_eq!(matches.len(), 2);
}

#[test]
fn stopped_monitor_publishes_nothing_new() {
    let dir = tempdir().unwrap();
    let logs = LogManager::new(dir.path()).unwrap();
    let mut stats = SessionStats::new();
    let channel = EventChannel::new();

    let monitor = PacketMonitor::new(MonitorConfig::default(), channel.publisher());
    let handle = monitor.spawn_with(Box::new(ScriptedSource {
        script: vec![observation("198.51.100.7", Some(443))],
    }));

    thread::sleep(Duration::from_millis(50));
    handle.stop();
    handle.join();

    // Events queued before the stop are still delivered.
    drain_cycle(&channel, &mut stats, &logs);
    assert_eq!(stats.packets(), 1);

    thread::sleep(Duration::from_millis(30));
    assert!(drain_cycle(&channel, &mut stats, &logs).is_empty());
    assert_eq!(stats.packets(), 1);
}
