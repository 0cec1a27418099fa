//! Dialer and connection abstractions for netx.
//!
//! Defines the two capabilities every layer agrees on, so decorators can be
//! stacked in any order without knowing about each other:
//!
//! - [`Dialer`]: establishes a connection from a network name and address.
//! - [`Connection`]: an ordered byte stream with an explicit close
//!   (`AsyncRead` + `AsyncWrite`, closed via `poll_shutdown`).
//!
//! # Dialers
//!
//! - [`tcp`]: the system TCP dialer.
//! - [`errorwrap`]: classifies every failure of the wrapped dialer and of
//!   every connection it produces.
//! - [`logging`]: traces dials and connection lifecycles.
//! - [`func`]: closure-backed dialer for tests and embedding.
//!
//! # Example
//!
//! ```rust,no_run
//! use netx_dialer::{Dialer, ErrorWrapperDialer, LoggingDialer, TcpDialer};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> std::io::Result<()> {
//! let dialer = LoggingDialer::new(ErrorWrapperDialer::new(TcpDialer::default()));
//! let cancel = CancellationToken::new();
//! let conn = dialer.dial(&cancel, "tcp", "example.com:80").await?;
//! conn.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod errorwrap;
pub mod func;
pub mod logging;
pub mod tcp;

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::sync::CancellationToken;

pub use netx_config::TcpDialerConfig;
pub use error::DialerError;
pub use errorwrap::{ErrorWrapperConn, ErrorWrapperDialer};
pub use func::FnDialer;
pub use logging::{LoggingConn, LoggingDialer};
pub use tcp::{Network, TcpDialer};

/// Marker trait for streams a dialer can hand out.
pub trait Connection: AsyncRead + AsyncWrite + Unpin + Send + 'static {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send + 'static> Connection for T {}

/// A type-erased connection.
pub type BoxConnection = Box<dyn Connection>;

/// The future returned by [`Dialer::dial`].
pub type DialFuture<'a, C> = Pin<Box<dyn Future<Output = io::Result<C>> + Send + 'a>>;

/// A shareable, type-erased dialer.
pub type DynDialer = Arc<dyn Dialer<Conn = BoxConnection>>;

/// Establishes connections.
pub trait Dialer: Send + Sync {
    /// The connection type produced by this dialer.
    type Conn: Connection;

    /// Connect to `address` over `network` (`"tcp"`, `"tcp4"`, `"tcp6"`).
    ///
    /// `cancel` belongs to the caller. Decorators forward it untouched;
    /// only the dialer that actually performs I/O observes it.
    fn dial<'a>(
        &'a self,
        cancel: &'a CancellationToken,
        network: &'a str,
        address: &'a str,
    ) -> DialFuture<'a, Self::Conn>;

    /// Erase the connection type.
    fn boxed(self) -> BoxedDialer<Self>
    where
        Self: Sized,
    {
        BoxedDialer(self)
    }
}

impl<D: Dialer + ?Sized> Dialer for Arc<D> {
    type Conn = D::Conn;

    fn dial<'a>(
        &'a self,
        cancel: &'a CancellationToken,
        network: &'a str,
        address: &'a str,
    ) -> DialFuture<'a, Self::Conn> {
        (**self).dial(cancel, network, address)
    }
}

impl<D: Dialer + ?Sized> Dialer for Box<D> {
    type Conn = D::Conn;

    fn dial<'a>(
        &'a self,
        cancel: &'a CancellationToken,
        network: &'a str,
        address: &'a str,
    ) -> DialFuture<'a, Self::Conn> {
        (**self).dial(cancel, network, address)
    }
}

/// Adapter returned by [`Dialer::boxed`].
#[derive(Debug, Clone)]
pub struct BoxedDialer<D>(D);

impl<D> BoxedDialer<D> {
    pub fn into_inner(self) -> D {
        self.0
    }
}

impl<D: Dialer> Dialer for BoxedDialer<D> {
    type Conn = BoxConnection;

    fn dial<'a>(
        &'a self,
        cancel: &'a CancellationToken,
        network: &'a str,
        address: &'a str,
    ) -> DialFuture<'a, Self::Conn> {
        Box::pin(async move {
            let conn = self.0.dial(cancel, network, address).await?;
            Ok(Box::new(conn) as BoxConnection)
        })
    }
}
