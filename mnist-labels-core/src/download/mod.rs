//! Download collaborator for MNIST dataset files.
//!
//! [`MnistDownloader`] is the seam the decoder fetches files through. The
//! production implementation, [`HttpDownloader`], pulls the published gzip
//! archives over HTTP and stores each one under a fresh name in the
//! configured download directory.

use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::{DatasetFile, LabelError, Result};

const DOWNLOAD_DIR_ENV: &str = "MNIST_LABELS_DOWNLOAD_DIR";
const BASE_URL_ENV: &str = "MNIST_LABELS_BASE_URL";
const DEFAULT_BASE_URL: &str = "https://storage.googleapis.com/cvdf-datasets/mnist";

/// Fetches one MNIST dataset file and returns its local path.
///
/// Any `Fn(DatasetFile) -> Result<PathBuf>` closure is a downloader.
pub trait MnistDownloader {
    /// Downloads `file` and returns where it was written.
    ///
    /// # Errors
    /// Returns [`LabelError`] when fetching or storing the file fails.
    fn download(&self, file: DatasetFile) -> Result<PathBuf>;
}

impl<F> MnistDownloader for F
where
    F: Fn(DatasetFile) -> Result<PathBuf>,
{
    fn download(&self, file: DatasetFile) -> Result<PathBuf> {
        self(file)
    }
}

/// Configuration for where dataset files come from and where they land.
#[derive(Clone, Debug)]
pub struct MnistConfig {
    /// Directory that receives downloaded files.
    pub download_dir: PathBuf,
    /// Base URL that hosts the MNIST gzip IDX files.
    pub base_url: String,
}

impl Default for MnistConfig {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
            base_url: env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned()),
        }
    }
}

impl MnistConfig {
    /// URL of `file` under the configured base URL.
    ///
    /// # Examples
    /// ```
    /// use mnist_labels_core::{DatasetFile, MnistConfig, Split};
    ///
    /// let config = MnistConfig {
    ///     download_dir: std::env::temp_dir(),
    ///     base_url: "https://example.test/mnist/".to_owned(),
    /// };
    /// assert_eq!(
    ///     config.file_url(DatasetFile::labels(Split::Train)),
    ///     "https://example.test/mnist/train-labels-idx1-ubyte.gz",
    /// );
    /// ```
    #[must_use]
    pub fn file_url(&self, file: DatasetFile) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            file.file_name()
        )
    }
}

fn default_download_dir() -> PathBuf {
    if let Some(explicit) = env::var_os(DOWNLOAD_DIR_ENV) {
        return PathBuf::from(explicit);
    }

    env::temp_dir().join("mnist-labels")
}

/// Transport used by [`HttpDownloader`] to fetch raw bytes.
pub trait DownloadClient {
    /// Downloads URL contents as bytes.
    ///
    /// # Errors
    /// Returns [`LabelError::Download`] if the request fails.
    fn download_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

/// [`DownloadClient`] backed by a blocking `ureq` agent.
#[derive(Clone, Copy, Debug, Default)]
pub struct UreqClient;

impl DownloadClient for UreqClient {
    fn download_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let mut response = ureq::get(url)
            .call()
            .map_err(|error| download_error(url, &error))?;

        response
            .body_mut()
            .read_to_vec()
            .map_err(|error| download_error(url, &error))
    }
}

fn download_error(url: &str, error: &ureq::Error) -> LabelError {
    LabelError::Download {
        url: url.to_owned(),
        message: error.to_string(),
    }
}

/// Downloads dataset files over HTTP into uniquely named local files.
///
/// Every call produces a new file; nothing is cached between calls. Callers
/// that receive a path own it and are expected to delete it.
pub struct HttpDownloader<C = UreqClient> {
    config: MnistConfig,
    client: C,
}

impl HttpDownloader {
    /// Creates a downloader that uses `ureq` for transport.
    #[must_use]
    pub const fn new(config: MnistConfig) -> Self {
        Self::with_client(config, UreqClient)
    }
}

impl<C: DownloadClient> HttpDownloader<C> {
    /// Creates a downloader with a custom transport.
    #[must_use]
    pub const fn with_client(config: MnistConfig, client: C) -> Self {
        Self { config, client }
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &MnistConfig {
        &self.config
    }
}

impl<C: DownloadClient> MnistDownloader for HttpDownloader<C> {
    #[instrument(name = "download", skip(self), fields(url = %self.config.file_url(file)))]
    fn download(&self, file: DatasetFile) -> Result<PathBuf> {
        let url = self.config.file_url(file);
        let payload = self.client.download_bytes(&url)?;
        let path = persist_download(&self.config.download_dir, file, &payload)?;
        info!(
            path = %path.display(),
            bytes = payload.len(),
            "downloaded MNIST dataset file"
        );
        Ok(path)
    }
}

fn persist_download(dir: &Path, file: DatasetFile, bytes: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|source| LabelError::io(dir, source))?;

    let suffix = format!("-{}", file.file_name());
    let mut staged = tempfile::Builder::new()
        .prefix("mnist-")
        .suffix(&suffix)
        .tempfile_in(dir)
        .map_err(|source| LabelError::io(dir, source))?;
    staged
        .write_all(bytes)
        .map_err(|source| LabelError::io(staged.path(), source))?;
    let (_, path) = staged
        .keep()
        .map_err(|error| LabelError::io(dir, error.error))?;
    Ok(path)
}
