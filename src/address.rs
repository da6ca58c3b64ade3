//! Turns the scan target into the single IPv4 address every worker probes.

use std::fs;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, ToSocketAddrs};
use std::str::FromStr;
use std::time::Duration;

use hickory_resolver::{
    config::{LookupIpStrategy, NameServerConfig, Protocol, ResolverConfig, ResolverOpts},
    Resolver,
};
use log::debug;

use crate::error::ScanError;

/// Maps a host name or dotted-quad string to one IPv4 address.
///
/// Implementations perform a single lookup per call: no retry, and no cache
/// shared between callers. Each worker calls this once.
pub trait Resolve: Send + Sync {
    /// Resolves `target`, returning the first IPv4 address found.
    fn resolve(&self, target: &str) -> Result<Ipv4Addr, ScanError>;
}

/// Parses `target` as an IPv4 literal, skipping DNS altogether.
fn literal(target: &str) -> Option<Ipv4Addr> {
    Ipv4Addr::from_str(target.trim()).ok()
}

/// Resolves through the operating system (`getaddrinfo` on Unix).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemResolver;

impl Resolve for SystemResolver {
    fn resolve(&self, target: &str) -> Result<Ipv4Addr, ScanError> {
        if let Some(ip) = literal(target) {
            return Ok(ip);
        }

        let addrs = (target.trim(), 0)
            .to_socket_addrs()
            .map_err(|e| ScanError::resolution(target, e))?;

        first_ipv4(addrs.map(|addr| addr.ip()))
            .ok_or_else(|| ScanError::resolution(target, "no IPv4 address found"))
    }
}

/// Resolves through explicitly chosen name servers.
///
/// Every call builds its own client, so concurrent workers never wait on one
/// another and nothing is cached between them. A client makes one attempt,
/// asks only for A records and keeps no cache.
#[derive(Debug, Clone)]
pub struct DnsResolver {
    config: ResolverConfig,
    opts: ResolverOpts,
}

impl DnsResolver {
    /// Builds a resolver from a comma-separated list of name server IPs, or
    /// from a file holding one IP per line.
    ///
    /// ```rust,no_run
    /// # use rangescan::address::{DnsResolver, Resolve};
    /// let resolver = DnsResolver::from_spec("1.1.1.1,8.8.8.8").unwrap();
    /// let ip = resolver.resolve("example.com");
    /// ```
    pub fn from_spec(spec: &str) -> io::Result<Self> {
        let servers = match read_resolver_from_file(spec) {
            Ok(ips) => ips,
            Err(_) => spec
                .split(',')
                .filter_map(|r| IpAddr::from_str(r.trim()).ok())
                .collect::<Vec<_>>(),
        };

        if servers.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("no name server addresses in {spec:?}"),
            ));
        }

        Self::with_name_servers(&servers)
    }

    /// Builds a resolver that queries `servers` over UDP port 53.
    pub fn with_name_servers(servers: &[IpAddr]) -> io::Result<Self> {
        let addrs = servers
            .iter()
            .map(|ip| SocketAddr::new(*ip, 53))
            .collect::<Vec<_>>();
        Self::with_name_server_addrs(&addrs)
    }

    /// Builds a resolver that queries each of `servers` over UDP.
    pub fn with_name_server_addrs(servers: &[SocketAddr]) -> io::Result<Self> {
        if servers.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "no name server addresses",
            ));
        }

        let mut config = ResolverConfig::new();
        for addr in servers {
            config.add_name_server(NameServerConfig::new(*addr, Protocol::Udp));
        }

        let mut opts = ResolverOpts::default();
        opts.attempts = 1;
        opts.cache_size = 0;
        opts.ip_strategy = LookupIpStrategy::Ipv4Only;

        debug!("Using name servers {servers:?}");
        Ok(Self { config, opts })
    }

    /// How long one lookup waits for an answer. Defaults to hickory's five
    /// seconds.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }
}

impl Resolve for DnsResolver {
    fn resolve(&self, target: &str) -> Result<Ipv4Addr, ScanError> {
        if let Some(ip) = literal(target) {
            return Ok(ip);
        }

        let resolver = Resolver::new(self.config.clone(), self.opts.clone())
            .map_err(|e| ScanError::resolution(target, e))?;
        let lookup = resolver
            .lookup_ip(target.trim())
            .map_err(|e| ScanError::resolution(target, e))?;

        first_ipv4(lookup.iter())
            .ok_or_else(|| ScanError::resolution(target, "no IPv4 address found"))
    }
}

fn first_ipv4(mut ips: impl Iterator<Item = IpAddr>) -> Option<Ipv4Addr> {
    ips.find_map(|ip| match ip {
        IpAddr::V4(v4) => Some(v4),
        IpAddr::V6(_) => None,
    })
}

/// Parses an input file of IPs for use in DNS resolution.
fn read_resolver_from_file(path: &str) -> io::Result<Vec<IpAddr>> {
    let ips = fs::read_to_string(path)?
        .lines()
        .filter_map(|line| IpAddr::from_str(line.trim()).ok())
        .collect();

    Ok(ips)
}
