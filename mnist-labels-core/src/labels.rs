//! Top-level entry point: resolve, decode, then clean up.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};

use crate::{
    HttpDownloader, LabelContainer, MnistConfig, MnistDownloader, Result, Split, decode_labels,
    resolve_source,
};

/// Options accepted by [`mnist_labels`].
///
/// # Examples
/// ```
/// use mnist_labels_core::{LabelOptions, Split};
///
/// let options = LabelOptions::new().with_test(true).with_delete_tempfile(false);
/// assert_eq!(options.split(), Split::Test);
/// assert!(options.file_path().is_none());
/// assert!(!options.delete_tempfile());
/// ```
#[derive(Clone, Debug)]
pub struct LabelOptions {
    file_path: Option<PathBuf>,
    split: Split,
    delete_tempfile: bool,
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self {
            file_path: None,
            split: Split::Train,
            delete_tempfile: true,
        }
    }
}

impl LabelOptions {
    /// Creates options that download the training labels and delete them
    /// after decoding.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes `path` instead of downloading. The file is never deleted.
    #[must_use]
    pub fn with_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    /// Selects the split to download when no file path is supplied.
    #[must_use]
    pub const fn with_split(mut self, split: Split) -> Self {
        self.split = split;
        self
    }

    /// Selects the test split when `test` is `true`.
    #[must_use]
    pub const fn with_test(self, test: bool) -> Self {
        self.with_split(Split::from_test_flag(test))
    }

    /// Controls whether a downloaded file is removed after decoding.
    #[must_use]
    pub const fn with_delete_tempfile(mut self, delete: bool) -> Self {
        self.delete_tempfile = delete;
        self
    }

    /// Caller-supplied label file, if any.
    #[must_use]
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Split requested from the downloader.
    #[must_use]
    pub const fn split(&self) -> Split {
        self.split
    }

    /// Whether a downloaded file is removed after decoding.
    #[must_use]
    pub const fn delete_tempfile(&self) -> bool {
        self.delete_tempfile
    }
}

/// Loads MNIST labels into the container `C`.
///
/// Uses the configured file path when present; otherwise asks `downloader`
/// for the label file of the configured split. A downloaded file is removed
/// once decoding finishes, whether it succeeded or not, unless
/// [`LabelOptions::with_delete_tempfile`] disabled it. Removal problems are
/// logged and never replace the decode result.
///
/// # Errors
/// Returns the downloader's error unchanged, or any [`decode_labels`] error.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// use std::path::PathBuf;
/// use mnist_labels_core::{DatasetFile, LabelArray, LabelError, LabelOptions, mnist_labels};
///
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = tempfile::tempdir()?;
/// let path = dir.path().join("t10k-labels-idx1-ubyte");
/// std::fs::write(&path, [0, 0, 8, 1, 0, 0, 0, 1, 4])?;
///
/// let downloaded = path.clone();
/// let downloader = move |_: DatasetFile| -> Result<PathBuf, LabelError> { Ok(downloaded.clone()) };
/// let labels: LabelArray = mnist_labels(&LabelOptions::new().with_test(true), &downloader)?;
///
/// assert_eq!(labels.as_slice(), &[4]);
/// assert!(!path.exists());
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "mnist_labels",
    skip_all,
    fields(split = ?options.split(), supplied = options.file_path().is_some()),
)]
pub fn mnist_labels<C: LabelContainer>(
    options: &LabelOptions,
    downloader: &dyn MnistDownloader,
) -> Result<C> {
    let source = resolve_source(options.file_path(), options.split(), downloader)?;
    let decoded = decode_labels(source.path());

    if source.is_owned() && options.delete_tempfile() {
        remove_downloaded(source.path());
    }

    decoded
}

/// Loads MNIST labels, downloading over HTTP with `config` when needed.
///
/// # Errors
/// See [`mnist_labels`].
pub fn load_labels<C: LabelContainer>(options: &LabelOptions, config: MnistConfig) -> Result<C> {
    mnist_labels(options, &HttpDownloader::new(config))
}

fn remove_downloaded(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "removed downloaded label file"),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "downloaded label file already removed");
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to remove downloaded label file");
        }
    }
}
