//! `mnist-labels` binary.
//!
//! Decodes one MNIST label file and prints its summary on stdout. Failures
//! are logged with their stable error code and turn into a non-zero exit.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use mnist_labels_cli::{
    cli::{Cli, CliError, render_summary, run_cli},
    logging::{self, LoggingError},
};
use tracing::error;

fn decode_and_print(cli: Cli) -> Result<()> {
    let summary = run_cli(cli).context("decoding labels failed")?;
    let mut out = BufWriter::new(io::stdout().lock());
    render_summary(&summary, &mut out).context("writing summary failed")?;
    out.flush().context("flushing stdout failed")
}

/// Stable code of the label error behind `err`, if there is one.
fn label_error_code(err: &anyhow::Error) -> Option<&'static str> {
    err.downcast_ref::<CliError>()
        .and_then(CliError::label_error)
        .map(|label_error| label_error.code().as_str())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        print_logging_failure(&err);
        return ExitCode::FAILURE;
    }

    match decode_and_print(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let message = format!("{err:#}");
            match label_error_code(&err) {
                Some(code) => error!(code, error = %message, "mnist-labels failed"),
                None => error!(error = %message, "mnist-labels failed"),
            }
            ExitCode::FAILURE
        }
    }
}

#[expect(
    clippy::print_stderr,
    reason = "no subscriber exists to carry this message"
)]
fn print_logging_failure(err: &LoggingError) {
    eprintln!("mnist-labels: cannot set up logging: {err}");
}
