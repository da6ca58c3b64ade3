//! Single-attempt TCP connect probes.
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

use log::debug;
use socket2::{Domain, Protocol, SockAddr, Socket, Type};

use crate::error::ScanError;

/// Result of probing one port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The handshake completed.
    Open(u16),
    /// Refused, timed out, unreachable, or the socket could not be created.
    Closed(u16),
}

impl ProbeOutcome {
    /// The port this outcome is about.
    pub const fn port(self) -> u16 {
        match self {
            Self::Open(port) | Self::Closed(port) => port,
        }
    }

    /// Whether the port accepted the connection.
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open(_))
    }
}

/// Decides whether one port of one address is open.
pub trait Probe: Send + Sync {
    /// Makes exactly one attempt against `ip:port`.
    fn probe(&self, ip: Ipv4Addr, port: u16) -> ProbeOutcome;
}

/// Probes with a fresh blocking TCP socket per port.
#[derive(Debug, Clone, Copy)]
pub struct TcpProber {
    timeout: Duration,
}

impl TcpProber {
    /// A prober that gives up on a port after `timeout`.
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Performs the connection to the socket with timeout.
    ///
    /// The socket is created, given read and write timeouts, connected, and
    /// dropped again before returning, whatever the outcome.
    fn connect(&self, addr: SocketAddrV4) -> Result<(), ScanError> {
        let port = addr.port();
        let to_probe_error = |source| ScanError::Probe { port, source };

        let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP))
            .map_err(to_probe_error)?;
        socket
            .set_read_timeout(Some(self.timeout))
            .map_err(to_probe_error)?;
        socket
            .set_write_timeout(Some(self.timeout))
            .map_err(to_probe_error)?;

        let target = SockAddr::from(SocketAddr::V4(addr));
        socket
            .connect_timeout(&target, self.timeout)
            .map_err(to_probe_error)
    }
}

impl Probe for TcpProber {
    fn probe(&self, ip: Ipv4Addr, port: u16) -> ProbeOutcome {
        match self.connect(SocketAddrV4::new(ip, port)) {
            Ok(()) => {
                debug!("Connection to {ip}:{port} was successful");
                ProbeOutcome::Open(port)
            }
            Err(e) => {
                debug!("{e}");
                ProbeOutcome::Closed(port)
            }
        }
    }
}
