#![deny(clippy::all)]
#![warn(clippy::pedantic)]

use anyhow::Context;
use clap::Parser;
use log::debug;
use rangescan::address::DnsResolver;
use rangescan::error::ScanError;
use rangescan::input::{Opts, ScanConfig};
use rangescan::partition::worker_count;
use rangescan::report::ScanReport;
use rangescan::scanner::Scanner;
use rangescan::{detail, warning};

use std::process;

/// File descriptors kept free for stdio, the resolver and the allocator.
#[cfg(unix)]
const RESERVED_DESCRIPTORS: u64 = 100;

#[cfg(not(tarpaulin_include))]
/// Reads the command line, runs one scan and prints its report.
/// Exits with 1 when the arguments or the range are invalid, 0 otherwise.
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let opts = match Opts::try_parse() {
        Ok(opts) => opts,
        Err(e) => {
            let code = i32::from(e.use_stderr());
            // Printing help or the version can only fail on a closed stdout.
            let _ = e.print();
            process::exit(code);
        }
    };
    debug!("Main() `opts` arguments are {opts:?}");

    if let Err(e) = run(&opts) {
        match e.downcast_ref::<ScanError>() {
            Some(ScanError::InvalidRange { .. }) => println!("Invalid port range"),
            _ => warning!(format!("{e:#}"), false, opts.accessible),
        }
        process::exit(1);
    }
}

#[cfg(not(tarpaulin_include))]
fn run(opts: &Opts) -> anyhow::Result<()> {
    let config = ScanConfig::default();
    let request = opts.request();
    let workers = worker_count(request.start_port(), request.end_port(), config.max_workers)?;

    #[cfg(unix)]
    adjust_ulimit_size(workers, opts);

    let mut scanner = Scanner::new(config);
    if let Some(spec) = &opts.resolver {
        let resolver = DnsResolver::from_spec(spec)
            .with_context(|| format!("Could not build a resolver from {spec:?}"))?;
        scanner = scanner.with_resolver(resolver);
    }

    if !opts.greppable && !opts.json {
        println!(
            "Scanning {} ports {}-{} with {} threads...",
            request.target(),
            request.start_port(),
            request.end_port(),
            workers
        );
    }

    let report = scanner.run(&request)?;

    if !report.failed_workers().is_empty() {
        detail!(
            format!(
                "{} of {} workers scanned nothing",
                report.failed_workers().len(),
                report.worker_count()
            ),
            opts.greppable,
            opts.accessible
        );
    }

    if opts.json {
        let json = serde_json::to_string_pretty(&report).context("Could not serialize report")?;
        println!("{json}");
    } else if opts.greppable {
        println!("{}", report.greppable());
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &ScanReport) {
    println!("\nOpen ports on {}:", report.target());
    for port in report.open_ports() {
        println!("Port {port} is open");
    }
    println!(
        "Scan completed. Found {} open ports.",
        report.total_open()
    );
}

/// Every worker holds one socket at a time, so make sure the soft descriptor
/// limit fits all of them.
#[cfg(unix)]
fn adjust_ulimit_size(workers: usize, opts: &Opts) {
    let wanted = u64::try_from(workers)
        .unwrap_or(u64::MAX)
        .saturating_add(RESERVED_DESCRIPTORS);

    match rlimit::increase_nofile_limit(wanted) {
        Ok(limit) if limit < wanted => {
            warning!(
                format!(
                    "File limit {limit} is lower than the {wanted} descriptors {workers} workers may need. Some ports may be reported as closed."
                ),
                opts.greppable,
                opts.accessible
            );
        }
        Ok(limit) => debug!("File limit is {limit}"),
        Err(e) => debug!("Could not raise the file limit: {e}"),
    }
}
