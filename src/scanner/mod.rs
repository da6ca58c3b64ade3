//! Core functionality for actual scanning behaviour.
use crate::address::{Resolve, SystemResolver};
use crate::error::ScanError;
use crate::input::{ScanConfig, ScanRequest};
use crate::partition::{partition, SubRange};
use crate::report::{ScanReport, WorkerFailure};
use log::{debug, warn};

mod probe;
mod sink;

pub use probe::{Probe, ProbeOutcome, TcpProber};
pub use sink::ResultSink;

use std::any::Any;
use std::thread;

/// The scan coordinator.
///
/// Splits the requested range with [`partition`], runs one worker thread per
/// slice and waits for all of them before building the [`ScanReport`].
/// Each worker resolves the target once, then probes its ports in ascending
/// order, appending every open one to a shared [`ResultSink`].
///
/// The resolver and the prober default to [`SystemResolver`] and
/// [`TcpProber`] and can be swapped out with [`Scanner::with_resolver`] and
/// [`Scanner::with_prober`].
pub struct Scanner {
    config: ScanConfig,
    resolver: Box<dyn Resolve>,
    prober: Box<dyn Probe>,
}

impl std::fmt::Debug for Scanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scanner")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new(ScanConfig::default())
    }
}

impl Scanner {
    /// A scanner using the operating system resolver and TCP connect probes
    /// bounded by `config.probe_timeout`.
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            resolver: Box::new(SystemResolver),
            prober: Box::new(TcpProber::new(config.probe_timeout)),
        }
    }

    /// Replaces the resolver every worker uses.
    #[must_use]
    pub fn with_resolver(mut self, resolver: impl Resolve + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Replaces the per-port probe.
    #[must_use]
    pub fn with_prober(mut self, prober: impl Probe + 'static) -> Self {
        self.prober = Box::new(prober);
        self
    }

    /// Runs the scan and blocks until every worker has finished.
    ///
    /// Fails only when the range is invalid, in which case nothing has been
    /// spawned, resolved or probed. Workers that fail are listed in
    /// [`ScanReport::failed_workers`] and simply contribute no ports.
    pub fn run(&self, request: &ScanRequest) -> Result<ScanReport, ScanError> {
        let slices = partition(
            request.start_port(),
            request.end_port(),
            self.config.max_workers,
        )?;
        let total_ports = slices.iter().map(|s| s.len() as usize).sum::<usize>();

        debug!(
            "Start scanning {}.\nWorkers {}\nNumber of ports {}\nTimeout {:?}",
            request.target(),
            slices.len(),
            total_ports,
            self.config.probe_timeout,
        );

        let sink = ResultSink::with_capacity(total_ports);
        let failed_workers = thread::scope(|scope| {
            let handles: Vec<_> = slices
                .iter()
                .map(|slice| {
                    let sink = &sink;
                    let handle = thread::Builder::new()
                        .name(format!("scan-worker-{}", slice.worker_id))
                        .spawn_scoped(scope, move || {
                            self.scan_slice(request.target(), slice, sink)
                        });
                    (slice, handle)
                })
                .collect();

            handles
                .into_iter()
                .filter_map(|(slice, handle)| {
                    let outcome = match handle {
                        Ok(handle) => handle.join(),
                        Err(source) => Ok(Err(ScanError::Spawn {
                            worker_id: slice.worker_id,
                            source,
                        })),
                    };
                    match outcome {
                        Ok(Ok(found)) => {
                            debug!("Worker {} found {found} open ports", slice.worker_id);
                            None
                        }
                        Ok(Err(e)) => Some(WorkerFailure::new(slice, e.to_string())),
                        Err(panic) => Some(WorkerFailure::new(slice, panic_reason(&*panic))),
                    }
                })
                .collect::<Vec<_>>()
        });

        let open_ports = sink.into_ports();
        debug!("Open ports found: {open_ports:?}");

        Ok(ScanReport::new(
            request,
            slices.len(),
            open_ports,
            failed_workers,
        ))
    }

    /// Body of one worker: resolve once, then probe `slice` in ascending order.
    fn scan_slice(
        &self,
        target: &str,
        slice: &SubRange,
        sink: &ResultSink,
    ) -> Result<usize, ScanError> {
        let ip = self.resolver.resolve(target).inspect_err(|e| {
            warn!("{e}");
        })?;

        let mut found = 0;
        for port in slice.ports() {
            if let ProbeOutcome::Open(port) = self.prober.probe(ip, port) {
                sink.append(port);
                found += 1;
            }
        }
        Ok(found)
    }
}

fn panic_reason(panic: &(dyn Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "worker panicked".to_owned())
}
