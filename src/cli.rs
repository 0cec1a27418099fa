//! CLI module for the `netx dial` measurement.

use std::io::{self, Write as _};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use netx_config::{
    CliOverrides, Config, ConfigError, LoggingConfig, apply_overrides, load_config,
    validate_config,
};
use netx_core::defaults::{
    DEFAULT_NETWORK, DEFAULT_READ_BYTES, DEFAULT_READ_TIMEOUT_SECS, MAX_READ_BYTES,
};
use netx_dialer::{Dialer, ErrorWrapperDialer, LoggingDialer, TcpDialer};
use netx_errorx::{ClassifiedError, Classifier, Classify, ErrorxError, Operation};
use serde::Serialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

/// `netx dial` arguments.
#[derive(Parser, Debug, Clone)]
pub struct DialArgs {
    /// Target address (host:port).
    pub address: String,

    /// Network: tcp, tcp4 or tcp6.
    #[arg(short, long, default_value = DEFAULT_NETWORK)]
    pub network: String,

    /// Config file path (toml/json/jsonc/yaml). Built-in defaults when omitted.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Payload to write after connecting.
    #[arg(short, long)]
    pub send: Option<String>,

    /// Read up to this many bytes after writing (0 = skip the read).
    #[arg(short, long, default_value_t = DEFAULT_READ_BYTES)]
    pub read: usize,

    /// Give up on the read after this many seconds.
    #[arg(long, default_value_t = DEFAULT_READ_TIMEOUT_SECS)]
    pub read_timeout_secs: u64,

    #[command(flatten)]
    pub overrides: CliOverrides,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("classifier: {0}")]
    Classifier(#[from] ErrorxError),
    #[error("read size {0} exceeds the {max}-byte limit", max = MAX_READ_BYTES)]
    ReadTooLarge(usize),
    #[error("output: {0}")]
    Output(#[from] io::Error),
    #[error("encode: {0}")]
    Encode(#[from] serde_json::Error),
}

/// What a single measurement does.
#[derive(Debug, Clone)]
pub struct DialPlan {
    pub network: String,
    pub address: String,
    pub send: Option<Vec<u8>>,
    pub read_bytes: usize,
    pub read_timeout: Duration,
}

/// Outcome of one phase: the classified error, or `null` on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseRecord {
    pub phase: Operation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<usize>,
    pub error: Option<ClassifiedError>,
}

impl PhaseRecord {
    fn new(phase: Operation, bytes: Option<usize>, error: Option<ClassifiedError>) -> Self {
        Self {
            phase,
            bytes,
            error,
        }
    }
}

/// Run `netx dial`. Returns whether every phase succeeded.
pub async fn run(args: DialArgs) -> Result<bool, CliError> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    apply_overrides(&mut config, &args.overrides);
    validate_config(&config)?;

    if args.read > MAX_READ_BYTES {
        return Err(CliError::ReadTooLarge(args.read));
    }

    init_tracing(&config.logging);

    let classifier = Arc::new(Classifier::from_config(&config.classifier)?);
    let dialer = LoggingDialer::new(ErrorWrapperDialer::with_classifier(
        TcpDialer::new(config.dialer.clone()),
        Arc::clone(&classifier),
    ));

    let cancel = CancellationToken::new();
    cancel_on_signal(cancel.clone());

    let plan = DialPlan {
        network: args.network,
        address: args.address,
        send: args.send.map(String::into_bytes),
        read_bytes: args.read,
        read_timeout: Duration::from_secs(args.read_timeout_secs),
    };
    let records = measure(&dialer, &*classifier, &cancel, &plan).await;
    // Stops the signal listener.
    cancel.cancel();

    let mut stdout = io::stdout().lock();
    for record in &records {
        serde_json::to_writer(&mut stdout, record)?;
        writeln!(stdout)?;
    }
    Ok(records.iter().all(|r| r.error.is_none()))
}

/// Connect, optionally write and read, then close.
///
/// Every phase that runs yields one record. A failed connect ends the
/// measurement; later phases still run after a failed write or read so the
/// close outcome is always observed. Firing `cancel` aborts the dial, write
/// or read in progress with an `interrupted` failure.
pub async fn measure<D, K>(
    dialer: &D,
    classifier: &K,
    cancel: &CancellationToken,
    plan: &DialPlan,
) -> Vec<PhaseRecord>
where
    D: Dialer,
    K: Classify + ?Sized,
{
    let mut records = Vec::with_capacity(4);

    let mut conn = match dialer.dial(cancel, &plan.network, &plan.address).await {
        Ok(conn) => {
            records.push(PhaseRecord::new(Operation::Connect, None, None));
            conn
        }
        Err(e) => {
            records.push(PhaseRecord::new(
                Operation::Connect,
                None,
                Some(recover(classifier, &e, Operation::Connect)),
            ));
            return records;
        }
    };

    if let Some(data) = &plan.send {
        let mut written = 0;
        let write = async {
            while written < data.len() {
                match conn.write(&data[written..]).await {
                    Ok(0) => return Err(io::Error::from(io::ErrorKind::WriteZero)),
                    Ok(n) => written += n,
                    Err(e) => return Err(e),
                }
            }
            conn.flush().await
        };
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(cancelled()),
            res = write => res,
        };
        let error = outcome.err().map(|e| recover(classifier, &e, Operation::Write));
        records.push(PhaseRecord::new(Operation::Write, Some(written), error));
    }

    if plan.read_bytes > 0 {
        let mut buf = vec![0u8; plan.read_bytes];
        let read = async {
            match tokio::time::timeout(plan.read_timeout, conn.read(&mut buf)).await {
                Ok(res) => res,
                Err(_) => Err(io::Error::new(io::ErrorKind::TimedOut, "read timed out")),
            }
        };
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(cancelled()),
            res = read => res,
        };
        let record = match outcome {
            Ok(n) => PhaseRecord::new(Operation::Read, Some(n), None),
            Err(e) => PhaseRecord::new(
                Operation::Read,
                Some(0),
                Some(recover(classifier, &e, Operation::Read)),
            ),
        };
        records.push(record);
    }

    let error = conn
        .shutdown()
        .await
        .err()
        .map(|e| recover(classifier, &e, Operation::Close));
    drop(conn);
    records.push(PhaseRecord::new(Operation::Close, None, error));

    records
}

fn cancelled() -> io::Error {
    io::Error::new(io::ErrorKind::Interrupted, "measurement cancelled")
}

/// The classified payload of `err`, classifying it here if a layer below
/// did not.
fn recover<K: Classify + ?Sized>(
    classifier: &K,
    err: &io::Error,
    operation: Operation,
) -> ClassifiedError {
    ClassifiedError::from_io_error(err)
        .cloned()
        .unwrap_or_else(|| classifier.classify(err, operation))
}

/// Install the global subscriber.
///
/// With no configured level or filters, `RUST_LOG` is honoured before
/// falling back to `warn`. Logs go to stderr unless `output = "stdout"`;
/// stdout carries the phase records.
fn init_tracing(config: &LoggingConfig) {
    let filter = if config.level.is_none() && config.filters.is_empty() {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    } else {
        let directives = std::iter::once(config.level.as_deref().unwrap_or("warn").to_string())
            .chain(config.filters.iter().map(|(m, l)| format!("{m}={l}")))
            .collect::<Vec<_>>()
            .join(",");
        EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let writer = match config.output.as_deref() {
        Some("stdout") => BoxMakeWriter::new(io::stdout),
        _ => BoxMakeWriter::new(io::stderr),
    };
    let layer: Box<dyn Layer<Registry> + Send + Sync> = match config.format.as_deref() {
        Some("json") => fmt::layer().json().with_writer(writer).boxed(),
        Some("compact") => fmt::layer().compact().with_writer(writer).boxed(),
        _ => fmt::layer().with_writer(writer).boxed(),
    };

    tracing_subscriber::registry().with(layer).with(filter).init();
}

/// Cancel `token` on Ctrl+C or SIGTERM. The listener exits once the token is
/// cancelled by anyone.
fn cancel_on_signal(token: CancellationToken) {
    tokio::spawn(async move {
        tokio::select! {
            _ = token.cancelled() => {}
            signal = next_signal() => {
                info!(signal, "cancelling measurement");
                token.cancel();
            }
        }
    });
}

async fn next_signal() -> &'static str {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => "interrupt",
        _ = terminate => "terminate",
    }
}
