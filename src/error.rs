//! Error taxonomy shared by the scan engine and the command line shell.
use std::io;

use thiserror::Error;

/// Everything that can go wrong while building or running a scan.
///
/// Only [`ScanError::InvalidArguments`] and [`ScanError::InvalidRange`] are
/// fatal, and both are raised before a single worker is spawned. The other
/// variants are recovered where they happen: a resolution failure ends one
/// worker, a probe failure marks one port as not open.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Bad command line input, such as a port that is not a number.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The requested range is empty or contains port 0.
    #[error("Invalid port range {start}-{end}")]
    InvalidRange {
        /// First port of the rejected range.
        start: u16,
        /// Last port of the rejected range.
        end: u16,
    },

    /// The target did not resolve to an IPv4 address.
    #[error("DNS lookup failed for {target}: {reason}")]
    Resolution {
        /// The host or address that failed.
        target: String,
        /// Resolver message.
        reason: String,
    },

    /// Socket creation or the connection attempt failed.
    #[error("Probe of port {port} failed: {source}")]
    Probe {
        /// Port being probed.
        port: u16,
        /// Underlying socket error.
        #[source]
        source: io::Error,
    },

    /// The OS refused to start a worker thread.
    #[error("Could not spawn worker {worker_id}: {source}")]
    Spawn {
        /// Worker that never started.
        worker_id: usize,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    pub(crate) fn resolution(target: &str, reason: impl ToString) -> Self {
        Self::Resolution {
            target: target.to_owned(),
            reason: reason.to_string(),
        }
    }
}
