use clap::{Parser, Subcommand};

/// netwarden — firewall companion: live traffic monitoring with heuristic
/// IDS alerts and iptables control.
#[derive(Parser, Debug)]
#[command(name = "netwarden", version, about)]
pub struct Cli {
    /// Directory holding the append-only log store.
    #[arg(long = "log-dir", value_name = "DIR", default_value = "logs")]
    pub log_dir: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the traffic monitor until Ctrl+C.
    Monitor {
        /// Capture interface; omitted means the default device. Ignored in
        /// simulation mode.
        #[arg(short = 'i', long = "interface", value_name = "IFACE")]
        interface: Option<String>,

        /// Simulated-source poll period in milliseconds.
        #[arg(long = "poll-ms", value_name = "MS", default_value_t = 1000)]
        poll_ms: u64,

        /// Consumer drain cadence in milliseconds.
        #[arg(long = "drain-ms", value_name = "MS", default_value_t = 350)]
        drain_ms: u64,

        /// Print drained events to stdout as newline-delimited JSON.
        #[arg(short = 'j', long = "json")]
        json: bool,
    },

    /// Show recent log lines, optionally filtered by keyword.
    Logs {
        /// Number of lines to show.
        #[arg(short = 'n', long = "tail", value_name = "N", default_value_t = 200)]
        tail: usize,

        /// Case-insensitive keyword filter over the recent log history.
        #[arg(short = 's', long = "search", value_name = "KEYWORD")]
        search: Option<String>,
    },

    /// Drop all inbound traffic from an IP.
    BlockIp { ip: String },

    /// Remove a previously added IP drop rule.
    AllowIp { ip: String },

    /// Drop inbound TCP traffic to a port.
    BlockPort { port: u16 },

    /// Remove a previously added port drop rule.
    AllowPort { port: u16 },

    /// Flush all iptables chains and zero the counters.
    Reset,
}
