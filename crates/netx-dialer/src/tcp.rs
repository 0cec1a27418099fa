//! System TCP dialer.
//!
//! Resolves the address with the system resolver, keeps the addresses that
//! match the requested family and tries them in order until one connects.
//! The whole dial is bounded by the configured connect timeout and aborts
//! as soon as the caller's cancellation token fires.

use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use netx_config::TcpDialerConfig;
use tokio::net::{TcpStream, lookup_host};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::DialerError;
use crate::{DialFuture, Dialer};

/// Network names accepted by [`TcpDialer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    /// Either address family.
    Tcp,
    /// IPv4 only.
    Tcp4,
    /// IPv6 only.
    Tcp6,
}

impl Network {
    pub const fn as_str(self) -> &'static str {
        match self {
            Network::Tcp => "tcp",
            Network::Tcp4 => "tcp4",
            Network::Tcp6 => "tcp6",
        }
    }

    pub fn accepts(self, addr: &SocketAddr) -> bool {
        match self {
            Network::Tcp => true,
            Network::Tcp4 => addr.is_ipv4(),
            Network::Tcp6 => addr.is_ipv6(),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = DialerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tcp" => Ok(Network::Tcp),
            "tcp4" => Ok(Network::Tcp4),
            "tcp6" => Ok(Network::Tcp6),
            _ => Err(DialerError::UnsupportedNetwork(s.to_string())),
        }
    }
}

/// Dialer backed by `tokio::net::TcpStream`.
#[derive(Debug, Clone, Default)]
pub struct TcpDialer {
    config: TcpDialerConfig,
}

impl TcpDialer {
    pub fn new(config: TcpDialerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TcpDialerConfig {
        &self.config
    }

    async fn connect(&self, network: Network, address: &str) -> io::Result<TcpStream> {
        let addrs: Vec<SocketAddr> = lookup_host(address)
            .await?
            .filter(|addr| network.accepts(addr))
            .collect();
        if addrs.is_empty() {
            return Err(DialerError::NoAddresses {
                network: network.as_str(),
                address: address.to_string(),
            }
            .into());
        }

        let mut last_err = None;
        for addr in addrs {
            match TcpStream::connect(addr).await {
                Ok(stream) => {
                    apply_tcp_options(&stream, &self.config)?;
                    return Ok(stream);
                }
                Err(e) => {
                    debug!(kind = ?e.kind(), "connect attempt failed");
                    last_err = Some(e);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| io::Error::from(io::ErrorKind::AddrNotAvailable)))
    }
}

impl Dialer for TcpDialer {
    type Conn = TcpStream;

    fn dial<'a>(
        &'a self,
        cancel: &'a CancellationToken,
        network: &'a str,
        address: &'a str,
    ) -> DialFuture<'a, Self::Conn> {
        Box::pin(async move {
            let network = network.parse::<Network>().map_err(io::Error::from)?;
            let connect = async {
                match self.config.connect_timeout() {
                    Some(limit) => {
                        match tokio::time::timeout(limit, self.connect(network, address)).await {
                            Ok(res) => res,
                            Err(_) => Err(io::Error::from(DialerError::TimedOut)),
                        }
                    }
                    None => self.connect(network, address).await,
                }
            };
            tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(io::Error::from(DialerError::Cancelled)),
                res = connect => res,
            }
        })
    }
}

/// Apply TCP socket options.
fn apply_tcp_options(stream: &TcpStream, config: &TcpDialerConfig) -> io::Result<()> {
    stream.set_nodelay(config.no_delay)?;

    if config.keepalive_secs > 0 {
        let sock = socket2::SockRef::from(stream);
        let keepalive =
            socket2::TcpKeepalive::new().with_time(Duration::from_secs(config.keepalive_secs));
        sock.set_tcp_keepalive(&keepalive)?;
    }

    Ok(())
}
