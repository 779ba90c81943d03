//! Command-line interface orchestration for the MNIST label decoder.
//!
//! The CLI offers a single `decode` command that decodes a local IDX label
//! file, or downloads the training or test labels first, and summarises the
//! result.

mod commands;

pub use commands::{
    Cli, CliError, Command, ContainerKind, DecodeCommand, DecodeSummary, LabelSource,
    render_summary, run_cli, run_cli_with,
};
