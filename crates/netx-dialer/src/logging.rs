//! Tracing decorators.
//!
//! [`LoggingDialer`] records every dial with its latency and outcome, and
//! hands out [`LoggingConn`]s that count bytes and log when the connection
//! is shut down. Errors are logged as the inner layer reports
//! them; stack this decorator outside an
//! [`ErrorWrapperDialer`](crate::ErrorWrapperDialer) to log classified
//! errors only.

use std::fmt;
use std::io::{self, IoSlice};
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, ReadBuf};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::{DialFuture, Dialer};

/// Dialer decorator that traces dials.
#[derive(Debug, Clone)]
pub struct LoggingDialer<D> {
    inner: D,
}

impl<D> LoggingDialer<D> {
    pub fn new(inner: D) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }
}

impl<D: Dialer> Dialer for LoggingDialer<D> {
    type Conn = LoggingConn<D::Conn>;

    fn dial<'a>(
        &'a self,
        cancel: &'a CancellationToken,
        network: &'a str,
        address: &'a str,
    ) -> DialFuture<'a, Self::Conn> {
        Box::pin(async move {
            debug!(network, address, "dial start");
            let started = Instant::now();
            match self.inner.dial(cancel, network, address).await {
                Ok(conn) => {
                    debug!(
                        network,
                        address,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "dial done"
                    );
                    Ok(LoggingConn::new(conn, address))
                }
                Err(e) => {
                    debug!(
                        network,
                        address,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        error = %e,
                        "dial failed"
                    );
                    Err(e)
                }
            }
        })
    }
}

/// Connection decorator that counts bytes and traces its lifecycle.
pub struct LoggingConn<C> {
    inner: C,
    peer: String,
    opened: Instant,
    bytes_read: u64,
    bytes_written: u64,
    closed: bool,
}

impl<C> LoggingConn<C> {
    pub fn new(inner: C, peer: impl Into<String>) -> Self {
        Self {
            inner,
            peer: peer.into(),
            opened: Instant::now(),
            bytes_read: 0,
            bytes_written: 0,
            closed: false,
        }
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn into_inner(self) -> C {
        self.inner
    }

    fn log_end(&self, event: &'static str) {
        debug!(
            peer = %self.peer,
            bytes_read = self.bytes_read,
            bytes_written = self.bytes_written,
            elapsed_ms = self.opened.elapsed().as_millis() as u64,
            "{event}"
        );
    }
}

impl<C: AsyncWrite + Unpin> LoggingConn<C> {
    pub async fn close(mut self) -> io::Result<()> {
        self.shutdown().await
    }
}

impl<C> fmt::Debug for LoggingConn<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingConn")
            .field("peer", &self.peer)
            .field("bytes_read", &self.bytes_read)
            .field("bytes_written", &self.bytes_written)
            .finish_non_exhaustive()
    }
}

impl<C: AsyncRead + Unpin> AsyncRead for LoggingConn<C> {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let before = buf.filled().len();
        let res = Pin::new(&mut self.inner).poll_read(cx, buf);
        match &res {
            Poll::Ready(Ok(())) => {
                let n = buf.filled().len() - before;
                self.bytes_read += n as u64;
                trace!(peer = %self.peer, n, "read");
            }
            Poll::Ready(Err(e)) => debug!(peer = %self.peer, error = %e, "read failed"),
            Poll::Pending => {}
        }
        res
    }
}

impl<C: AsyncWrite + Unpin> AsyncWrite for LoggingConn<C> {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let res = Pin::new(&mut self.inner).poll_write(cx, buf);
        self.record_write(&res);
        res
    }

    fn poll_write_vectored(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        bufs: &[IoSlice<'_>],
    ) -> Poll<io::Result<usize>> {
        let res = Pin::new(&mut self.inner).poll_write_vectored(cx, bufs);
        self.record_write(&res);
        res
    }

    fn is_write_vectored(&self) -> bool {
        self.inner.is_write_vectored()
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let res = Pin::new(&mut self.inner).poll_shutdown(cx);
        match &res {
            Poll::Ready(Ok(())) if !self.closed => {
                self.log_end("connection closed");
                self.closed = true;
            }
            Poll::Ready(Err(e)) => debug!(peer = %self.peer, error = %e, "close failed"),
            _ => {}
        }
        res
    }
}

impl<C> LoggingConn<C> {
    fn record_write(&mut self, res: &Poll<io::Result<usize>>) {
        match res {
            Poll::Ready(Ok(n)) => {
                self.bytes_written += *n as u64;
                trace!(peer = %self.peer, n, "write");
            }
            Poll::Ready(Err(e)) => debug!(peer = %self.peer, error = %e, "write failed"),
            Poll::Pending => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, DuplexStream, duplex};

    use super::*;
    use crate::FnDialer;

    #[tokio::test]
    async fn counts_bytes_both_ways() {
        let (client, mut server) = duplex(64);
        let mut conn = LoggingConn::new(client, "peer:1");

        conn.write_all(b"ping").await.unwrap();
        let mut buf = [0u8; 4];
        server.read_exact(&mut buf).await.unwrap();
        server.write_all(b"pong!").await.unwrap();
        let mut reply = [0u8; 5];
        conn.read_exact(&mut reply).await.unwrap();

        assert_eq!(conn.bytes_written(), 4);
        assert_eq!(conn.bytes_read(), 5);
        conn.close().await.unwrap();
    }

    #[tokio::test]
    async fn dial_errors_pass_through() {
        let dialer = LoggingDialer::new(FnDialer::new(
            |_: &CancellationToken, _: &str, _: &str| -> DialFuture<'static, DuplexStream> {
                Box::pin(async { Err(io::Error::from(io::ErrorKind::ConnectionRefused)) })
            },
        ));
        let cancel = CancellationToken::new();
        let err = dialer.dial(&cancel, "tcp", "a:1").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::ConnectionRefused);
    }

    #[tokio::test]
    async fn into_inner_returns_connection() {
        let (client, mut server) = duplex(16);
        let conn = LoggingConn::new(client, "peer:1");
        let mut inner = conn.into_inner();
        inner.write_all(b"ok").await.unwrap();
        let mut buf = [0u8; 2];
        server.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"ok");
    }
}
