//! Decorators that classify every failure of a dialer and its connections.
//!
//! [`ErrorWrapperDialer`] tags dial failures with `connect`. Each connection
//! it produces is an [`ErrorWrapperConn`], which tags read failures with
//! `read`, write and flush failures with `write`, and shutdown failures with
//! `close`. Successful results pass through untouched, and errors surface as
//! `io::Error` values whose payload is a [`ClassifiedError`]
//! (see [`ClassifiedError::from_io_error`]).
//!
//! [`ClassifiedError`]: netx_errorx::ClassifiedError
//! [`ClassifiedError::from_io_error`]: netx_errorx::ClassifiedError::from_io_error

use std::fmt;
use std::io::{self, IoSlice};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use netx_errorx::{Classifier, Classify, ClassifyExt, Operation};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, ReadBuf};
use tokio_util::sync::CancellationToken;

use crate::{DialFuture, Dialer};

/// Dialer decorator that classifies failures as `connect` and wraps every
/// connection it returns.
pub struct ErrorWrapperDialer<D, K: ?Sized = Classifier> {
    inner: D,
    classifier: Arc<K>,
}

impl<D> ErrorWrapperDialer<D> {
    /// Wrap `inner` with the built-in classifier.
    pub fn new(inner: D) -> Self {
        Self::with_classifier(inner, Arc::new(Classifier::default()))
    }
}

impl<D, K: ?Sized> ErrorWrapperDialer<D, K> {
    pub fn with_classifier(inner: D, classifier: Arc<K>) -> Self {
        Self { inner, classifier }
    }

    pub fn classifier(&self) -> &Arc<K> {
        &self.classifier
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }
}

impl<D: Clone, K: ?Sized> Clone for ErrorWrapperDialer<D, K> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            classifier: Arc::clone(&self.classifier),
        }
    }
}

impl<D: fmt::Debug, K: ?Sized> fmt::Debug for ErrorWrapperDialer<D, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorWrapperDialer")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl<D, K> Dialer for ErrorWrapperDialer<D, K>
where
    D: Dialer,
    K: Classify + ?Sized + 'static,
{
    type Conn = ErrorWrapperConn<D::Conn, K>;

    fn dial<'a>(
        &'a self,
        cancel: &'a CancellationToken,
        network: &'a str,
        address: &'a str,
    ) -> DialFuture<'a, Self::Conn> {
        Box::pin(async move {
            match self.inner.dial(cancel, network, address).await {
                Ok(conn) => Ok(ErrorWrapperConn::new(conn, Arc::clone(&self.classifier))),
                Err(err) => Err(self.classifier.classify(&err, Operation::Connect).into()),
            }
        })
    }
}

/// Connection decorator that classifies every I/O failure.
///
/// Owns the inner connection exclusively; there is no way to get it back
/// out, so unclassified errors cannot leak past this type.
pub struct ErrorWrapperConn<C, K: ?Sized = Classifier> {
    inner: C,
    classifier: Arc<K>,
}

impl<C, K: ?Sized> ErrorWrapperConn<C, K> {
    pub fn new(inner: C, classifier: Arc<K>) -> Self {
        Self { inner, classifier }
    }
}

impl<C, K> ErrorWrapperConn<C, K>
where
    C: AsyncWrite + Unpin,
    K: Classify + ?Sized,
{
    /// Shut the connection down and release it.
    ///
    /// The inner connection is dropped exactly once, whatever the outcome.
    pub async fn close(mut self) -> io::Result<()> {
        self.shutdown().await
    }
}

impl<C, K: ?Sized> fmt::Debug for ErrorWrapperConn<C, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorWrapperConn").finish_non_exhaustive()
    }
}

impl<C, K> AsyncRead for ErrorWrapperConn<C, K>
where
    C: AsyncRead + Unpin,
    K: Classify + ?Sized,
{
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner)
            .poll_read(cx, buf)
            .map(|res| self.classifier.classify_io(res, Operation::Read))
    }
}

impl<C, K> AsyncWrite for ErrorWrapperConn<C, K>
where
    C: AsyncWrite + Unpin,
    K: Classify + ?Sized,
{
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.inner)
            .poll_write(cx, buf)
            .map(|res| self.classifier.classify_io(res, Operation::Write))
    }

    fn poll_write_vectored(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        bufs: &[IoSlice<'_>],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.inner)
            .poll_write_vectored(cx, bufs)
            .map(|res| self.classifier.classify_io(res, Operation::Write))
    }

    fn is_write_vectored(&self) -> bool {
        self.inner.is_write_vectored()
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner)
            .poll_flush(cx)
            .map(|res| self.classifier.classify_io(res, Operation::Write))
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner)
            .poll_shutdown(cx)
            .map(|res| self.classifier.classify_io(res, Operation::Close))
    }
}
