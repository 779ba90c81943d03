//! Command implementations and argument parsing for the mnist-labels CLI.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use mnist_labels_core::{
    HttpDownloader, LabelArray, LabelContainer, LabelError, LabelOptions, MnistConfig,
    MnistDownloader, Split, class_counts, mnist_labels,
};
use thiserror::Error;
use tracing::{info, instrument};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "mnist-labels", about = "Download and decode MNIST IDX label files.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Decode a label file, downloading it first when no path is given.
    Decode(DecodeCommand),
}

/// Options accepted by the `decode` command.
#[derive(Debug, Args, Clone)]
pub struct DecodeCommand {
    /// IDX label file to decode (gzip or raw). Downloads when omitted.
    pub path: Option<PathBuf>,

    /// Download the test split instead of the training split.
    #[arg(long, conflicts_with = "path")]
    pub test: bool,

    /// Container used to hold the decoded labels.
    #[arg(long, value_enum, default_value_t = ContainerKind::Specialized)]
    pub container: ContainerKind,

    /// Keep the downloaded file instead of deleting it after decoding.
    #[arg(long = "keep-download")]
    pub keep_download: bool,

    /// Base URL hosting the MNIST archives.
    #[arg(long = "base-url")]
    pub base_url: Option<String>,

    /// Directory that receives downloaded archives.
    #[arg(long = "download-dir")]
    pub download_dir: Option<PathBuf>,

    /// Print every label after the summary.
    #[arg(long)]
    pub print: bool,
}

/// Label containers selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ContainerKind {
    /// Fixed-width unsigned-byte array.
    Specialized,
    /// Plain growable vector.
    Generic,
}

impl ContainerKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Specialized => "specialized",
            Self::Generic => "generic",
        }
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Resolving, downloading, or decoding the labels failed.
    #[error(transparent)]
    Labels(#[from] LabelError),
    /// `--test` was combined with an explicit path, which never downloads.
    #[error("`--test` selects a download split and cannot be combined with a path")]
    SplitWithPath,
}

impl CliError {
    /// Returns the underlying [`LabelError`], if any.
    #[must_use]
    pub const fn label_error(&self) -> Option<&LabelError> {
        match self {
            Self::Labels(error) => Some(error),
            Self::SplitWithPath => None,
        }
    }
}

/// Where the decoded labels came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelSource {
    /// A file supplied on the command line.
    File(PathBuf),
    /// A file fetched for the given split.
    Downloaded(Split),
}

/// Summarises the outcome of a `decode` command.
#[derive(Debug, Clone)]
pub struct DecodeSummary {
    /// Origin of the label file.
    pub source: LabelSource,
    /// Container the labels were decoded into.
    pub container: ContainerKind,
    /// Decoded labels in file order.
    pub labels: Vec<u8>,
    /// Whether [`render_summary`] lists every label.
    pub print_labels: bool,
}

impl DecodeSummary {
    /// Occurrences of each label value.
    #[must_use]
    pub fn class_counts(&self) -> BTreeMap<u8, usize> {
        class_counts(&self.labels)
    }
}

/// Executes the CLI command represented by `cli`, downloading over HTTP.
///
/// # Errors
/// Returns [`CliError`] when resolving or decoding the labels fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use mnist_labels_cli::cli::{Cli, Command, ContainerKind, DecodeCommand, run_cli};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = tempfile::tempdir()?;
/// let path = dir.path().join("labels-idx1-ubyte");
/// std::fs::write(&path, [0, 0, 8, 1, 0, 0, 0, 2, 3, 8])?;
/// let cli = Cli {
///     command: Command::Decode(DecodeCommand {
///         path: Some(path),
///         test: false,
///         container: ContainerKind::Specialized,
///         keep_download: false,
///         base_url: None,
///         download_dir: None,
///         print: false,
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.labels, vec![3, 8]);
/// # Ok(())
/// # }
/// ```
pub fn run_cli(cli: Cli) -> Result<DecodeSummary, CliError> {
    match cli.command {
        Command::Decode(decode) => {
            let downloader = HttpDownloader::new(build_config(&decode));
            run_decode(decode, &downloader)
        }
    }
}

/// Executes the CLI command with an injected downloader.
///
/// # Errors
/// Returns [`CliError`] when resolving or decoding the labels fails, or
/// [`CliError::SplitWithPath`] when `--test` accompanies an explicit path.
pub fn run_cli_with(cli: Cli, downloader: &dyn MnistDownloader) -> Result<DecodeSummary, CliError> {
    match cli.command {
        Command::Decode(decode) => run_decode(decode, downloader),
    }
}

pub(super) fn build_config(command: &DecodeCommand) -> MnistConfig {
    let mut config = MnistConfig::default();
    if let Some(base_url) = &command.base_url {
        config.base_url.clone_from(base_url);
    }
    if let Some(dir) = &command.download_dir {
        config.download_dir.clone_from(dir);
    }
    config
}

#[instrument(name = "cli.decode", skip_all, fields(container = command.container.as_str()))]
fn run_decode(
    command: DecodeCommand,
    downloader: &dyn MnistDownloader,
) -> Result<DecodeSummary, CliError> {
    let DecodeCommand {
        path,
        test,
        container,
        keep_download,
        print,
        ..
    } = command;

    let mut options = LabelOptions::new()
        .with_test(test)
        .with_delete_tempfile(!keep_download);
    let source = match path {
        Some(_) if test => return Err(CliError::SplitWithPath),
        Some(path) => {
            options = options.with_file_path(&path);
            LabelSource::File(path)
        }
        None => LabelSource::Downloaded(options.split()),
    };

    let labels = match container {
        ContainerKind::Specialized => Vec::from(decode::<LabelArray>(&options, downloader)?),
        ContainerKind::Generic => decode::<Vec<u8>>(&options, downloader)?,
    };
    info!(count = labels.len(), "decoded labels");

    Ok(DecodeSummary {
        source,
        container,
        labels,
        print_labels: print,
    })
}

fn decode<C: LabelContainer>(
    options: &LabelOptions,
    downloader: &dyn MnistDownloader,
) -> Result<C, CliError> {
    Ok(mnist_labels(options, downloader)?)
}

/// Renders `summary` to `writer` in a human-readable text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use mnist_labels_cli::cli::{ContainerKind, DecodeSummary, LabelSource, render_summary};
/// # use mnist_labels_core::Split;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let summary = DecodeSummary {
///     source: LabelSource::Downloaded(Split::Test),
///     container: ContainerKind::Generic,
///     labels: vec![1, 1, 2],
///     print_labels: false,
/// };
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// let text = String::from_utf8(buffer)?;
/// assert!(text.contains("labels: 3"));
/// assert!(text.contains("class 1: 2"));
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &DecodeSummary, mut writer: impl Write) -> io::Result<()> {
    match &summary.source {
        LabelSource::File(path) => writeln!(writer, "source: {}", path.display())?,
        LabelSource::Downloaded(split) => {
            writeln!(writer, "source: downloaded {} labels", split_name(*split))?;
        }
    }
    writeln!(writer, "container: {}", summary.container.as_str())?;
    writeln!(writer, "labels: {}", summary.labels.len())?;
    for (label, count) in summary.class_counts() {
        writeln!(writer, "class {label}: {count}")?;
    }
    if summary.print_labels {
        for (index, label) in summary.labels.iter().enumerate() {
            writeln!(writer, "{index}\t{label}")?;
        }
    }
    Ok(())
}

const fn split_name(split: Split) -> &'static str {
    match split {
        Split::Train => "train",
        Split::Test => "test",
    }
}
