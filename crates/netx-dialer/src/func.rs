//! Closure-backed dialer.

use std::fmt;
use std::marker::PhantomData;

use tokio_util::sync::CancellationToken;

use crate::{Connection, DialFuture, Dialer};

/// Adapts a closure into a [`Dialer`].
///
/// The closure receives the dial arguments and returns a `'static` future,
/// so it must copy whatever it needs out of them before the future starts.
///
/// ```rust
/// use std::io;
/// use netx_dialer::{DialFuture, Dialer, FnDialer};
/// use tokio::io::DuplexStream;
/// use tokio_util::sync::CancellationToken;
///
/// let dialer = FnDialer::new(
///     |_: &CancellationToken, _: &str, _: &str| -> DialFuture<'static, DuplexStream> {
///         Box::pin(async { Err(io::Error::from(io::ErrorKind::ConnectionRefused)) })
///     },
/// );
/// # let _ = dialer;
/// ```
pub struct FnDialer<F, C> {
    f: F,
    _conn: PhantomData<fn() -> C>,
}

impl<F, C> FnDialer<F, C>
where
    F: Fn(&CancellationToken, &str, &str) -> DialFuture<'static, C> + Send + Sync,
    C: Connection,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            _conn: PhantomData,
        }
    }
}

impl<F: Clone, C> Clone for FnDialer<F, C> {
    fn clone(&self) -> Self {
        Self {
            f: self.f.clone(),
            _conn: PhantomData,
        }
    }
}

impl<F, C> fmt::Debug for FnDialer<F, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnDialer").finish_non_exhaustive()
    }
}

impl<F, C> Dialer for FnDialer<F, C>
where
    F: Fn(&CancellationToken, &str, &str) -> DialFuture<'static, C> + Send + Sync,
    C: Connection,
{
    type Conn = C;

    fn dial<'a>(
        &'a self,
        cancel: &'a CancellationToken,
        network: &'a str,
        address: &'a str,
    ) -> DialFuture<'a, Self::Conn> {
        (self.f)(cancel, network, address)
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream, duplex};

    use super::*;

    #[tokio::test]
    async fn closure_result_is_returned() {
        let dials = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&dials);
        let dialer = FnDialer::new(
            move |_: &CancellationToken, _: &str, address: &str| -> DialFuture<'static, DuplexStream> {
                counter.fetch_add(1, Ordering::SeqCst);
                let greeting = address.as_bytes().to_vec();
                Box::pin(async move {
                    let (client, mut server) = duplex(64);
                    server.write_all(&greeting).await?;
                    Ok(client)
                })
            },
        );

        let cancel = CancellationToken::new();
        let mut conn = dialer.dial(&cancel, "tcp", "peer").await.unwrap();
        let mut buf = [0u8; 4];
        conn.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"peer");
        assert_eq!(dials.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn closure_error_is_returned() {
        let dialer = FnDialer::new(
            |_: &CancellationToken, _: &str, _: &str| -> DialFuture<'static, DuplexStream> {
                Box::pin(async { Err(io::Error::from(io::ErrorKind::HostUnreachable)) })
            },
        );
        let cancel = CancellationToken::new();
        let err = dialer.dial(&cancel, "tcp", "x:1").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::HostUnreachable);
    }
}
