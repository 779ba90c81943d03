//! MNIST label-file decoder.
//!
//! Reads the IDX label format used by the MNIST handwritten-digit dataset: a
//! big-endian `(magic, count)` header followed by `count` unsigned-byte
//! labels, optionally gzip-compressed. Labels are returned in file order in
//! either a [`LabelArray`] or a plain `Vec<u8>`, chosen by type parameter.
//!
//! [`mnist_labels`] is the usual entry point. It decodes a caller-supplied
//! file, or fetches the label file through an injected [`MnistDownloader`]
//! and deletes the download afterwards.
//!
//! ```no_run
//! use mnist_labels_core::{LabelArray, LabelOptions, MnistConfig, load_labels};
//!
//! let labels: LabelArray = load_labels(&LabelOptions::new(), MnistConfig::default())
//!     .expect("training labels download and decode");
//! assert_eq!(labels.len(), 60_000);
//! ```

mod container;
mod download;
mod error;
mod idx;
mod labels;
mod source;

pub use container::{LabelArray, LabelContainer, class_counts};
pub use download::{DownloadClient, HttpDownloader, MnistConfig, MnistDownloader, UreqClient};
pub use error::{LabelError, LabelErrorCode, Result};
pub use idx::{
    IDX_HEADER_LEN, IDX_LABEL_MAGIC, IdxHeader, decode_labels, decode_labels_from_reader,
    read_header,
};
pub use labels::{LabelOptions, load_labels, mnist_labels};
pub use source::{DatasetFile, FileKind, ResolvedSource, Split, resolve_source};
