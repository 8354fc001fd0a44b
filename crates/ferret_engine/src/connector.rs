use std::net::ToSocketAddrs;

use ferret_core::address::DEFAULT_PORT;
use ferret_logging::ferret_debug;
use mio::net::TcpStream;

use crate::OpenError;

/// Opens the socket for a transfer without waiting for the connect to finish.
pub trait Connector: Send {
    fn open(&self, host: &str, port: &str) -> Result<TcpStream, OpenError>;
}

/// Resolves with the system resolver and issues a non-blocking TCP connect to
/// the first address returned.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

impl Connector for TcpConnector {
    fn open(&self, host: &str, port: &str) -> Result<TcpStream, OpenError> {
        let port = match port.trim() {
            "" => DEFAULT_PORT,
            port => port,
        };
        let port: u16 = port.parse().map_err(|_| OpenError::Resolve)?;

        let addr = (host, port)
            .to_socket_addrs()
            .map_err(|err| {
                ferret_debug!("Resolving {}:{} failed: {}", host, port, err);
                OpenError::Resolve
            })?
            .next()
            .ok_or(OpenError::Resolve)?;

        ferret_debug!("Connecting to {} ({}:{})", addr, host, port);
        TcpStream::connect(addr).map_err(|err| OpenError::Socket(err.to_string()))
    }
}
