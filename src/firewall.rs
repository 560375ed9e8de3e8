//! iptables rule control.
//!
//! Stateless fire-and-forget wrappers around the iptables binary. The only
//! contract with the monitoring core: a successful block action increments
//! [`SessionStats::record_block`](crate::stats::SessionStats::record_block)
//! and logs one INFO line; failures log one ERROR line (both done by the
//! caller).

use std::io;
use std::process::Command;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FirewallError {
    #[error("requires root (run with sudo)")]
    NotRoot,

    #[error("failed to run iptables: {0}")]
    Spawn(#[from] io::Error),

    #[error("iptables failed: {0}")]
    Command(String),
}

/// Effective-uid check via `id -u`; any failure to ask counts as not root.
pub fn is_root() -> bool {
    Command::new("id")
        .arg("-u")
        .output()
        .map(|out| String::from_utf8_lossy(&out.stdout).trim() == "0")
        .unwrap_or(false)
}

fn run(args: &[&str]) -> Result<String, FirewallError> {
    if !is_root() {
        return Err(FirewallError::NotRoot);
    }
    let output = Command::new("iptables").args(args).output()?;
    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        Err(FirewallError::Command(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ))
    }
}

pub fn block_ip(ip: &str) -> Result<String, FirewallError> {
    run(&["-A", "INPUT", "-s", ip, "-j", "DROP"])
}

pub fn allow_ip(ip: &str) -> Result<String, FirewallError> {
    run(&["-D", "INPUT", "-s", ip, "-j", "DROP"])
}

pub fn block_port(port: u16) -> Result<String, FirewallError> {
    let port = port.to_string();
    run(&["-A", "INPUT", "-p", "tcp", "--dport", &port, "-j", "DROP"])
}

pub fn allow_port(port: u16) -> Result<String, FirewallError> {
    let port = port.to_string();
    run(&["-D", "INPUT", "-p", "tcp", "--dport", &port, "-j", "DROP"])
}

/// Flushes all chains, deletes user-defined chains and zeroes counters.
pub fn reset() -> Result<String, FirewallError> {
    let mut combined = Vec::new();
    for args in [["-F"], ["-X"], ["-Z"]] {
        let out = run(&args)?;
        if !out.is_empty() {
            combined.push(out);
        }
    }
    Ok(combined.join("\n"))
}
