#![allow(clippy::tests_outside_test_module)]
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use netx_dialer::{
    BoxConnection, DialFuture, Dialer, DynDialer, ErrorWrapperDialer, FnDialer, LoggingDialer,
    TcpDialer, TcpDialerConfig,
};
use netx_errorx::{ClassifiedError, Classifier, Failure, Operation, Redactor, RuleSet};
use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream, duplex};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

fn classified(err: &io::Error) -> &ClassifiedError {
    ClassifiedError::from_io_error(err).expect("error must be classified")
}

/// Echo server that serves a single connection.
async fn spawn_echo() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let (mut rd, mut wr) = stream.split();
        let _ = tokio::io::copy(&mut rd, &mut wr).await;
    });
    addr
}

async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

#[tokio::test]
async fn refused_dial_is_connect_connection_refused() {
    init_tracing();
    let addr = closed_port().await;
    let dialer = LoggingDialer::new(ErrorWrapperDialer::new(TcpDialer::default()));
    let cancel = CancellationToken::new();

    let err = dialer
        .dial(&cancel, "tcp", &addr.to_string())
        .await
        .unwrap_err();
    let c = classified(&err);
    assert_eq!(c.operation(), Operation::Connect);
    assert_eq!(c.failure(), Failure::ConnectionRefused);
    assert!(!c.message().contains("127.0.0.1"));
    assert_eq!(err.kind(), io::ErrorKind::ConnectionRefused);
}

#[tokio::test]
async fn wrapped_tcp_round_trip_passes_through() {
    init_tracing();
    let addr = spawn_echo().await;
    let dialer = ErrorWrapperDialer::new(TcpDialer::default());
    let cancel = CancellationToken::new();

    let mut conn = dialer
        .dial(&cancel, "tcp4", &addr.to_string())
        .await
        .unwrap();
    conn.write_all(b"hello, world").await.unwrap();
    let mut buf = [0u8; 12];
    conn.read_exact(&mut buf).await.unwrap();
    assert_eq!(&buf, b"hello, world");
    conn.close().await.unwrap();
}

#[tokio::test]
async fn double_shutdown_is_ok_or_close_classified() {
    let addr = spawn_echo().await;
    let dialer = ErrorWrapperDialer::new(TcpDialer::default());
    let cancel = CancellationToken::new();

    let mut conn = dialer
        .dial(&cancel, "tcp", &addr.to_string())
        .await
        .unwrap();
    conn.shutdown().await.unwrap();
    if let Err(err) = conn.shutdown().await {
        assert_eq!(classified(&err).operation(), Operation::Close);
    }
}

#[tokio::test]
async fn read_after_peer_close_is_eof_not_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        drop(stream);
    });

    let dialer = ErrorWrapperDialer::new(TcpDialer::default());
    let cancel = CancellationToken::new();
    let mut conn = dialer
        .dial(&cancel, "tcp", &addr.to_string())
        .await
        .unwrap();
    let mut buf = Vec::new();
    // Clean EOF is a successful zero-byte read; a reset is a classified read error.
    match conn.read_to_end(&mut buf).await {
        Ok(n) => assert_eq!(n, 0),
        Err(err) => assert_eq!(classified(&err).operation(), Operation::Read),
    }
}

#[tokio::test]
async fn cancelled_dial_is_classified_interrupted() {
    let dialer = ErrorWrapperDialer::new(TcpDialer::new(TcpDialerConfig::default()));
    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = dialer
        .dial(&cancel, "tcp", "127.0.0.1:9")
        .await
        .unwrap_err();
    let c = classified(&err);
    assert_eq!(c.operation(), Operation::Connect);
    assert_eq!(c.failure(), Failure::Interrupted);
}

#[tokio::test]
async fn decorators_compose_behind_dyn_dialer() {
    let addr = spawn_echo().await;
    let dialer: DynDialer = Arc::new(
        LoggingDialer::new(ErrorWrapperDialer::new(TcpDialer::default())).boxed(),
    );
    let cancel = CancellationToken::new();

    let mut conn: BoxConnection = dialer
        .dial(&cancel, "tcp", &addr.to_string())
        .await
        .unwrap();
    conn.write_all(b"x").await.unwrap();
    let mut one = [0u8; 1];
    conn.read_exact(&mut one).await.unwrap();
    assert_eq!(&one, b"x");
}

#[tokio::test]
async fn custom_classifier_is_shared_by_connections() {
    let classifier = Arc::new(Classifier::new(RuleSet::empty(), Redactor::default()));
    let raw = FnDialer::new(
        |_: &CancellationToken, _: &str, _: &str| -> DialFuture<'static, DuplexStream> {
            Box::pin(async {
                let (client, server) = duplex(8);
                drop(server);
                Ok(client)
            })
        },
    );
    let dialer = ErrorWrapperDialer::with_classifier(raw, Arc::clone(&classifier));
    let cancel = CancellationToken::new();

    let mut conn = dialer.dial(&cancel, "tcp", "peer:1").await.unwrap();
    // The peer is gone, so the write fails; with no rules it is unknown.
    let err = conn.write_all(b"data").await.unwrap_err();
    let c = classified(&err);
    assert_eq!(c.operation(), Operation::Write);
    assert_eq!(c.failure(), Failure::Unknown);
    assert_eq!(Arc::strong_count(&classifier), 3);
}
