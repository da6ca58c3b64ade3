//! Collects the open ports found by all workers of one scan.
use std::sync::{Mutex, PoisonError};

/// Arrival-ordered list of open ports shared by every worker.
///
/// Workers only ever call [`ResultSink::append`]. The full list is taken with
/// [`ResultSink::into_ports`], which consumes the sink and so can only happen
/// once no worker holds a reference any more.
#[derive(Debug, Default)]
pub struct ResultSink {
    ports: Mutex<Vec<u16>>,
}

impl ResultSink {
    /// A sink with room for `capacity` ports, so appends never reallocate
    /// when every scanned port turns out to be open.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ports: Mutex::new(Vec::with_capacity(capacity)),
        }
    }

    /// Records `port` and returns the index it was stored at.
    pub fn append(&self, port: u16) -> usize {
        // A worker that panicked mid-scan cannot have left the Vec half-written.
        let mut ports = self.ports.lock().unwrap_or_else(PoisonError::into_inner);
        ports.push(port);
        ports.len() - 1
    }

    /// Number of ports recorded so far.
    pub fn len(&self) -> usize {
        self.ports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no port has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All recorded ports in the order they were appended.
    pub fn into_ports(self) -> Vec<u16> {
        self.ports
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
