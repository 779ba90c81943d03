//! Diagnostics for the `mnist-labels` binary.
//!
//! Events go to stderr through a `tracing-subscriber` registry, filtered by
//! `RUST_LOG` (default `info`). `MNIST_LABELS_LOG_FORMAT` picks `human` or
//! `json` lines. Records emitted through the `log` crate are forwarded too.

use std::{env, io, str::FromStr, sync::OnceLock};

use thiserror::Error;
use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError,
};

const LOG_FORMAT_ENV: &str = "MNIST_LABELS_LOG_FORMAT";
const DEFAULT_DIRECTIVE: &str = "info";

static INSTALLED: OnceLock<()> = OnceLock::new();

/// Shape of each emitted log line.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LogFormat {
    /// Plain text for terminals.
    #[default]
    Human,
    /// One JSON object per event, with the active spans attached.
    Json,
}

impl LogFormat {
    /// Reads the format from `MNIST_LABELS_LOG_FORMAT`, defaulting to
    /// [`LogFormat::Human`] when unset.
    ///
    /// # Errors
    /// Returns [`LoggingError`] when the variable is not UTF-8 or names an
    /// unknown format.
    pub fn from_env() -> Result<Self, LoggingError> {
        match env::var(LOG_FORMAT_ENV) {
            Ok(raw) => raw.parse(),
            Err(env::VarError::NotPresent) => Ok(Self::default()),
            Err(source @ env::VarError::NotUnicode(_)) => Err(LoggingError::InvalidUnicode {
                name: LOG_FORMAT_ENV,
                source,
            }),
        }
    }
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            _ => Err(LoggingError::UnsupportedFormat {
                provided: normalized,
            }),
        }
    }
}

/// Failures while setting up diagnostics.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The format variable held bytes that are not UTF-8.
    #[error("`{name}` is not valid UTF-8: {source}")]
    InvalidUnicode {
        /// Variable name.
        name: &'static str,
        /// Lookup failure.
        #[source]
        source: env::VarError,
    },
    /// The format variable named something other than `human` or `json`.
    #[error("unknown log format `{provided}` (use `human` or `json`)")]
    UnsupportedFormat {
        /// Normalized value that was rejected.
        provided: String,
    },
}

/// Installs the process-wide subscriber once.
///
/// Later calls return immediately. When another subscriber already owns the
/// global slot, that one is kept and a note goes to stderr.
///
/// # Errors
/// Returns [`LoggingError`] when `MNIST_LABELS_LOG_FORMAT` is unusable.
pub fn init_logging() -> Result<(), LoggingError> {
    if INSTALLED.get().is_some() {
        return Ok(());
    }

    let format = LogFormat::from_env()?;
    if let Err(err) = install(format) {
        note_foreign_subscriber(&err);
    }
    INSTALLED.get_or_init(|| ());
    Ok(())
}

fn install(format: LogFormat) -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    let lines = tracing_subscriber::fmt::layer().with_writer(io::stderr);
    let lines = match format {
        LogFormat::Human => lines.boxed(),
        LogFormat::Json => lines
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .boxed(),
    };

    // A logger that already owns the `log` slot stays in place.
    if LogTracer::init().is_err() {
        tracing::debug!("log records already forwarded");
    }

    tracing_subscriber::registry()
        .with(filter)
        .with(lines)
        .try_init()
}

#[expect(
    clippy::print_stderr,
    reason = "the foreign subscriber may not print our events"
)]
fn note_foreign_subscriber(err: &TryInitError) {
    eprintln!("mnist-labels: keeping existing tracing subscriber: {err}");
}
