//! Provides a means to read, parse and hold the options of a scan.
use clap::Parser;
use std::num::NonZeroUsize;
use std::time::Duration;

use crate::error::ScanError;

/// Lowest port a scan may cover.
pub const LOWEST_PORT_NUMBER: u16 = 1;
/// Highest port a scan may cover.
pub const TOP_PORT_NUMBER: u16 = 65535;

/// How long a single connection attempt may take before the port is
/// reported as not open.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// Ceiling on concurrent workers, and therefore on threads and open sockets.
pub const MAX_WORKERS: NonZeroUsize = match NonZeroUsize::new(5000) {
    Some(n) => n,
    None => unreachable!(),
};

/// Parses one port number given on the command line.
pub fn parse_port(input: &str) -> Result<u16, ScanError> {
    let port: u16 = input
        .trim()
        .parse()
        .map_err(|_| ScanError::InvalidArguments(format!("Invalid port number '{input}'")))?;

    if port < LOWEST_PORT_NUMBER {
        return Err(ScanError::InvalidArguments(format!(
            "Port {port} must be between {LOWEST_PORT_NUMBER} and {TOP_PORT_NUMBER}",
        )));
    }

    Ok(port)
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "rangescan",
    version = env!("CARGO_PKG_VERSION"),
    max_term_width = 120,
    help_template = "{bin} {version}\n{about}\n\nUSAGE:\n    {usage}\n\nOPTIONS:\n{options}\n{after-help}",
    after_help = "Example: rangescan google.com 1 1000",
)]
/// Threaded TCP connect scanner.
/// Splits the port range between up to 5000 worker threads, each of which
/// tries a one second TCP connect on every port of its share.
pub struct Opts {
    /// Host name or IPv4 address to scan.
    pub target: String,

    /// First port of the range (inclusive).
    #[arg(value_parser = parse_port)]
    pub start_port: u16,

    /// Last port of the range (inclusive).
    #[arg(value_parser = parse_port)]
    pub end_port: u16,

    /// Greppable mode. Only output the open ports.
    #[arg(short, long, conflicts_with = "json")]
    pub greppable: bool,

    /// Accessible mode. Turns off features which negatively affect screen readers.
    #[arg(long)]
    pub accessible: bool,

    /// Print the final report as JSON.
    #[arg(long)]
    pub json: bool,

    /// A comma-delimited list or file of DNS resolvers.
    #[arg(long)]
    pub resolver: Option<String>,
}

impl Opts {
    /// The scan this invocation asks for.
    pub fn request(&self) -> ScanRequest {
        ScanRequest::new(self.target.clone(), self.start_port, self.end_port)
    }
}

/// A scan of one host over one inclusive port range.
///
/// The range is not checked here; [`crate::partition::partition`] rejects an
/// empty range before anything is spawned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    target: String,
    start_port: u16,
    end_port: u16,
}

impl ScanRequest {
    /// Builds a request for `target` over `start_port..=end_port`.
    pub fn new(target: impl Into<String>, start_port: u16, end_port: u16) -> Self {
        Self {
            target: target.into(),
            start_port,
            end_port,
        }
    }

    /// Host name or IPv4 literal to scan.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// First port of the range.
    pub const fn start_port(&self) -> u16 {
        self.start_port
    }

    /// Last port of the range.
    pub const fn end_port(&self) -> u16 {
        self.end_port
    }
}

/// Tunables of the scan engine.
///
/// The binary always uses [`ScanConfig::default`]; other values are for
/// library callers and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    /// Connect, read and write timeout of a single probe.
    pub probe_timeout: Duration,
    /// Upper bound on the number of workers.
    pub max_workers: NonZeroUsize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            probe_timeout: PROBE_TIMEOUT,
            max_workers: MAX_WORKERS,
        }
    }
}
