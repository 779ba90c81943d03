//! Resolution of the label file to decode.
//!
//! A caller either supplies a path (which the decoder never deletes) or lets
//! the decoder fetch one through an injected [`MnistDownloader`], in which
//! case the decoder owns the downloaded file.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::{MnistDownloader, Result};

/// Which half of the MNIST dataset to use.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Split {
    /// The 60,000-item training set.
    #[default]
    Train,
    /// The 10,000-item test set.
    Test,
}

impl Split {
    /// Maps a `test` flag onto a split.
    ///
    /// # Examples
    /// ```
    /// use mnist_labels_core::Split;
    ///
    /// assert_eq!(Split::from_test_flag(true), Split::Test);
    /// assert_eq!(Split::from_test_flag(false), Split::Train);
    /// ```
    #[must_use]
    pub const fn from_test_flag(test: bool) -> Self {
        if test { Self::Test } else { Self::Train }
    }

    /// Returns `true` for the test split.
    #[must_use]
    pub const fn is_test(self) -> bool {
        matches!(self, Self::Test)
    }
}

/// Whether a dataset file carries images or labels.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FileKind {
    /// An `idx3-ubyte` image file.
    Images,
    /// An `idx1-ubyte` label file.
    Labels,
}

/// A request for one of the four MNIST dataset files.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct DatasetFile {
    /// Images or labels.
    pub kind: FileKind,
    /// Training or test split.
    pub split: Split,
}

impl DatasetFile {
    /// Requests the label file for `split`.
    #[must_use]
    pub const fn labels(split: Split) -> Self {
        Self {
            kind: FileKind::Labels,
            split,
        }
    }

    /// Requests the image file for `split`.
    #[must_use]
    pub const fn images(split: Split) -> Self {
        Self {
            kind: FileKind::Images,
            split,
        }
    }

    /// Canonical compressed file name published for this dataset file.
    ///
    /// # Examples
    /// ```
    /// use mnist_labels_core::{DatasetFile, Split};
    ///
    /// assert_eq!(
    ///     DatasetFile::labels(Split::Test).file_name(),
    ///     "t10k-labels-idx1-ubyte.gz",
    /// );
    /// ```
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match (self.kind, self.split) {
            (FileKind::Images, Split::Train) => "train-images-idx3-ubyte.gz",
            (FileKind::Images, Split::Test) => "t10k-images-idx3-ubyte.gz",
            (FileKind::Labels, Split::Train) => "train-labels-idx1-ubyte.gz",
            (FileKind::Labels, Split::Test) => "t10k-labels-idx1-ubyte.gz",
        }
    }
}

/// A label file path together with who owns its lifecycle.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolvedSource {
    path: PathBuf,
    owned: bool,
}

impl ResolvedSource {
    /// Location of the label file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` when the file was downloaded on the caller's behalf.
    #[must_use]
    pub const fn is_owned(&self) -> bool {
        self.owned
    }

    /// Consumes the source and returns its path.
    #[must_use]
    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

/// Resolves the label file to decode.
///
/// A supplied `file_path` is returned unchanged and marked as caller-owned;
/// `downloader` is not consulted. Otherwise the label file for `split` is
/// downloaded exactly once and marked as owned by the decoder.
///
/// # Errors
/// Propagates the downloader's error unchanged.
///
/// # Examples
/// ```
/// use std::path::{Path, PathBuf};
/// use mnist_labels_core::{DatasetFile, LabelError, Split, resolve_source};
///
/// let downloader = |_: DatasetFile| -> Result<PathBuf, LabelError> {
///     Ok(PathBuf::from("/tmp/downloaded"))
/// };
///
/// let supplied = resolve_source(Some(Path::new("labels.gz")), Split::Train, &downloader)
///     .expect("supplied paths always resolve");
/// assert!(!supplied.is_owned());
///
/// let fetched = resolve_source(None, Split::Test, &downloader).expect("download succeeds");
/// assert!(fetched.is_owned());
/// assert_eq!(fetched.path(), Path::new("/tmp/downloaded"));
/// ```
#[instrument(skip(downloader))]
pub fn resolve_source(
    file_path: Option<&Path>,
    split: Split,
    downloader: &dyn MnistDownloader,
) -> Result<ResolvedSource> {
    if let Some(path) = file_path {
        return Ok(ResolvedSource {
            path: path.to_path_buf(),
            owned: false,
        });
    }

    let path = downloader.download(DatasetFile::labels(split))?;
    debug!(path = %path.display(), "resolved downloaded label file");
    Ok(ResolvedSource { path, owned: true })
}
