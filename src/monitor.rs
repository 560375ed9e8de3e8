//! Background traffic monitor.
//!
//! A single collector thread pulls observations from an
//! [`ObservationSource`] — live capture when the `capture` feature is
//! enabled and a device can be opened, a simulated source otherwise — runs
//! them through the [`Detector`](crate::detection::Detector) and publishes
//! the results on the event channel. Downstream event shape is identical in
//! both modes.

use crate::channel::EventPublisher;
use crate::detection::Detector;
use crate::event::{MonitorEvent, PacketInfo, Severity};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors an observation source can hit at runtime. Capability absence is
/// not an error: it silently selects the simulated source at startup.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("capture failed: {0}")]
    Capture(String),
}

/// One unit pulled from a source before it becomes a published event.
#[derive(Debug, Clone)]
pub struct Observation {
    pub src: String,
    pub dst: String,
    pub proto: String,
    pub dport: Option<u16>,
    pub info: Option<String>,
}

/// A pull-based supply of observations. `Ok(None)` means "nothing right
/// now" (capture read timeout) and lets the collector re-check its stop
/// flag; implementations must not block longer than roughly one poll
/// period per call.
pub trait ObservationSource: Send {
    fn next_observation(&mut self) -> Result<Option<Observation>, SourceError>;

    /// Short mode tag for diagnostics.
    fn describe(&self) -> &'static str;
}

/// Fallback source: one synthetic observation per poll period with fixed
/// placeholder addresses and an incrementing sequence marker. Carries no
/// destination port, so it can never produce alerts.
pub struct SimulatedSource {
    period: Duration,
    seq: u64,
}

impl SimulatedSource {
    pub fn new(period: Duration) -> Self {
        Self { period, seq: 0 }
    }
}

impl ObservationSource for SimulatedSource {
    fn next_observation(&mut self) -> Result<Option<Observation>, SourceError> {
        thread::sleep(self.period);
        self.seq += 1;
        Ok(Some(Observation {
            src: "0.0.0.0".to_string(),
            dst: "127.0.0.1".to_string(),
            proto: "SIM".to_string(),
            dport: None,
            info: Some(format!("sample {}", self.seq)),
        }))
    }

    fn describe(&self) -> &'static str {
        "simulation"
    }
}

/// Whether live capture can be used: the feature is compiled in and a
/// device opens successfully. Probed once at monitor start; insufficient
/// privilege simply yields `false`.
#[cfg(feature = "capture")]
pub fn capture_available(interface: Option<&str>) -> bool {
    crate::capture::LiveCapture::open(interface).is_ok()
}

/// Without the `capture` feature there is no capture capability.
#[cfg(not(feature = "capture"))]
pub fn capture_available(_interface: Option<&str>) -> bool {
    false
}

#[cfg(feature = "capture")]
fn select_source(config: &MonitorConfig) -> Box<dyn ObservationSource> {
    match crate::capture::LiveCapture::open(config.interface.as_deref()) {
        Ok(live) => Box::new(live),
        Err(e) => {
            tracing::info!(error = %e, "live capture unavailable, falling back to simulation");
            Box::new(SimulatedSource::new(config.poll))
        }
    }
}

#[cfg(not(feature = "capture"))]
fn select_source(config: &MonitorConfig) -> Box<dyn ObservationSource> {
    Box::new(SimulatedSource::new(config.poll))
}

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Capture interface name; `None` lets pcap pick the default device.
    pub interface: Option<String>,
    /// Simulated-source period, also the upper bound on stop latency.
    pub poll: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interface: None,
            poll: Duration::from_secs(1),
        }
    }
}

/// The collector. Built once, then consumed by [`spawn`](Self::spawn).
pub struct PacketMonitor {
    config: MonitorConfig,
    publisher: EventPublisher,
    stop: Arc<AtomicBool>,
}

impl PacketMonitor {
    pub fn new(config: MonitorConfig, publisher: EventPublisher) -> Self {
        Self {
            config,
            publisher,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Starts the collector thread with the mode chosen by capability probe.
    pub fn spawn(self) -> MonitorHandle {
        let source = select_source(&self.config);
        self.spawn_with(source)
    }

    /// Starts the collector thread with an explicit source. The seam used
    /// by tests and replay tooling.
    pub fn spawn_with(self, source: Box<dyn ObservationSource>) -> MonitorHandle {
        let stop = self.stop.clone();
        let thread = thread::spawn(move || self.run(source));
        MonitorHandle { stop, thread }
    }

    fn run(self, mut source: Box<dyn ObservationSource>) {
        tracing::info!(mode = source.describe(), "packet monitor started");
        let mut detector = Detector::new(Instant::now());

        while !self.stop.load(Ordering::SeqCst) {
            match source.next_observation() {
                Ok(Some(obs)) => {
                    let src = obs.src.clone();
                    let dport = obs.dport;
                    self.publisher.publish(MonitorEvent::packet(PacketInfo {
                        src: obs.src,
                        dst: obs.dst,
                        proto: obs.proto,
                        dport: obs.dport,
                        info: obs.info,
                    }));
                    if dport.is_some() {
                        for alert in detector.evaluate(&src, dport, Instant::now()) {
                            self.publisher.publish(alert);
                        }
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    // One ERROR alert, then degrade to simulation so the
                    // event flow to the consumer never stops.
                    tracing::warn!(error = %e, "capture failed, degrading to simulation");
                    self.publisher
                        .publish(MonitorEvent::alert(Severity::Error, format!("Monitor error: {e}")));
                    source = Box::new(SimulatedSource::new(self.config.poll));
                }
            }
        }
        tracing::info!("packet monitor stopped");
    }
}

/// Handle to a running monitor: cooperative stop plus join.
pub struct MonitorHandle {
    stop: Arc<AtomicBool>,
    thread: JoinHandle<()>,
}

impl MonitorHandle {
    /// Signals the collector to stop. Takes effect within one loop
    /// iteration; events already queued are unaffected.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Waits for the collector thread to exit.
    pub fn join(self) {
        let _ = self.thread.join();
    }
}
