//! This crate exposes the scan engine of the `rangescan` TCP connect scanner.
//!
//! `rangescan` takes one host and one inclusive port range, splits the range
//! between up to 5000 worker threads and reports every port that accepted a
//! TCP connection within one second.
//!
//! ## Architecture Overview
//!
//! The core scanning behaviour is managed by
//! [`Scanner`](crate::scanner::Scanner):
//!
//! 1. **Partitioning**: [`partition`](crate::partition::partition) cuts the
//!    range into `min(ports, 5000)` contiguous slices, the last one taking
//!    the remainder
//! 2. **Workers**: one thread per slice resolves the target through a
//!    [`Resolve`](crate::address::Resolve) implementation, then probes each
//!    port of its slice with a [`Probe`](crate::scanner::Probe)
//! 3. **Aggregation**: open ports go into a shared
//!    [`ResultSink`](crate::scanner::ResultSink)
//! 4. **Report**: once every worker is joined the sink becomes a
//!    [`ScanReport`](crate::report::ScanReport)
//!
//! ## Basic Usage Example
//!
//! ```rust,no_run
//! use rangescan::input::{ScanConfig, ScanRequest};
//! use rangescan::scanner::Scanner;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let request = ScanRequest::new("127.0.0.1", 1, 1_000);
//!     let scanner = Scanner::new(ScanConfig::default());
//!
//!     let report = scanner.run(&request)?;
//!
//!     println!("Discovered {} open ports:", report.total_open());
//!     for port in report.open_ports() {
//!         println!("  {port}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Only an invalid range makes [`Scanner::run`](crate::scanner::Scanner::run)
//! fail, and it does so before any thread starts. A worker whose DNS lookup
//! fails is listed in the report and contributes no ports; a port whose
//! connection attempt fails in any way is reported as closed.
#![allow(clippy::needless_doctest_main)]
#![warn(missing_docs)]

pub mod tui;

pub mod input;

pub mod error;

pub mod address;

pub mod partition;

pub mod scanner;

pub mod report;
