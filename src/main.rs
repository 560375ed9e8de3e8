mod cli;

use clap::Parser;
use cli::{Cli, Command};
use netwarden::{
    drain_cycle, firewall, EventChannel, LogManager, MonitorConfig, PacketMonitor, SessionStats,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let logs = LogManager::new(&cli.log_dir)?;

    match cli.command {
        Command::Monitor {
            interface,
            poll_ms,
            drain_ms,
            json,
        } => run_monitor(&logs, interface, poll_ms, drain_ms, json).await?,

        Command::Logs { tail, search } => {
            let lines = match search {
                Some(keyword) => logs.search(&keyword, tail)?,
                None => logs.read_last(tail)?,
            };
            if lines.is_empty() {
                println!("No matching log lines.");
            } else {
                for line in lines {
                    println!("{line}");
                }
            }
        }

        Command::BlockIp { ip } => {
            firewall_action(&logs, "block_ip", firewall::block_ip(&ip), true);
        }
        Command::AllowIp { ip } => {
            firewall_action(&logs, "allow_ip", firewall::allow_ip(&ip), false);
        }
        Command::BlockPort { port } => {
            firewall_action(&logs, "block_port", firewall::block_port(port), true);
        }
        Command::AllowPort { port } => {
            firewall_action(&logs, "allow_port", firewall::allow_port(port), false);
        }
        Command::Reset => {
            firewall_action(&logs, "reset", firewall::reset(), false);
        }
    }

    Ok(())
}

async fn run_monitor(
    logs: &LogManager,
    interface: Option<String>,
    poll_ms: u64,
    drain_ms: u64,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let channel = EventChannel::new();
    let monitor = PacketMonitor::new(
        MonitorConfig {
            interface,
            poll: Duration::from_millis(poll_ms),
        },
        channel.publisher(),
    );
    let handle = monitor.spawn();

    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_ctrlc = shutdown.clone();
    ctrlc::set_handler(move || {
        shutdown_ctrlc.store(true, Ordering::SeqCst);
    })?;

    let mut stats = SessionStats::new();
    let mut interval = tokio::time::interval(Duration::from_millis(drain_ms));

    while !shutdown.load(Ordering::SeqCst) {
        interval.tick().await;
        for event in drain_cycle(&channel, &mut stats, logs) {
            if json {
                match serde_json::to_string(&event) {
                    Ok(line) => println!("{line}"),
                    Err(e) => tracing::warn!(error = %e, "failed to serialize event"),
                }
            }
        }
    }

    tracing::info!("shutting down");
    handle.stop();
    handle.join();
    // Final pass so events queued during shutdown are not lost.
    drain_cycle(&channel, &mut stats, logs);

    tracing::info!(
        packets = stats.packets(),
        alerts = stats.alerts(),
        blocks = stats.blocks(),
        "session summary"
    );
    Ok(())
}

/// Applies one firewall action result: successful blocks bump the session
/// block counter and log INFO; failures log ERROR. Mirrors the contract the
/// monitoring core expects from the firewall collaborator.
fn firewall_action(
    logs: &LogManager,
    action: &str,
    result: Result<String, firewall::FirewallError>,
    counts_as_block: bool,
) {
    let mut stats = SessionStats::new();
    match result {
        Ok(msg) => {
            if counts_as_block {
                stats.record_block();
            }
            let msg = if msg.is_empty() { "ok".to_string() } else { msg };
            if let Err(e) = logs.info(&format!("{action} -> {msg}")) {
                tracing::warn!(error = %e, "failed to log firewall action");
            }
            println!("{action}: {msg}");
        }
        Err(e) => {
            if let Err(log_err) = logs.error(&format!("{action} -> {e}")) {
                tracing::warn!(error = %log_err, "failed to log firewall action");
            }
            eprintln!("{action} failed: {e}");
        }
    }
}
