//! The finished result of a scan.
use serde_derive::Serialize;

use crate::input::ScanRequest;
use crate::partition::SubRange;

/// A worker that contributed no ports because it failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerFailure {
    /// Id of the failed worker.
    pub worker_id: usize,
    /// First port of its slice.
    pub start: u16,
    /// Last port of its slice.
    pub end: u16,
    /// Why it failed.
    pub reason: String,
}

impl WorkerFailure {
    pub(crate) fn new(slice: &SubRange, reason: String) -> Self {
        Self {
            worker_id: slice.worker_id,
            start: slice.start,
            end: slice.end,
            reason,
        }
    }
}

/// Open ports of one target, in the order workers found them.
///
/// Discovery order depends on thread scheduling, so two scans of the same
/// host can list the same ports in a different order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    target: String,
    start_port: u16,
    end_port: u16,
    worker_count: usize,
    open_ports: Vec<u16>,
    total_open: usize,
    failed_workers: Vec<WorkerFailure>,
}

impl ScanReport {
    pub(crate) fn new(
        request: &ScanRequest,
        worker_count: usize,
        open_ports: Vec<u16>,
        failed_workers: Vec<WorkerFailure>,
    ) -> Self {
        Self {
            target: request.target().to_owned(),
            start_port: request.start_port(),
            end_port: request.end_port(),
            worker_count,
            total_open: open_ports.len(),
            open_ports,
            failed_workers,
        }
    }

    /// The host as given in the request.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// The requested range as `(start, end)`.
    pub const fn requested_range(&self) -> (u16, u16) {
        (self.start_port, self.end_port)
    }

    /// How many workers the range was split across.
    pub const fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Open ports in discovery order.
    pub fn open_ports(&self) -> &[u16] {
        &self.open_ports
    }

    /// Number of open ports.
    pub const fn total_open(&self) -> usize {
        self.total_open
    }

    /// Workers that failed and so scanned nothing.
    pub fn failed_workers(&self) -> &[WorkerFailure] {
        &self.failed_workers
    }

    /// Single line listing of the open ports, e.g. `127.0.0.1 -> [22,80]`.
    pub fn greppable(&self) -> String {
        let ports = self
            .open_ports
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        format!("{} -> [{ports}]", self.target)
    }
}
