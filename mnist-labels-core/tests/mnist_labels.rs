//! Behavioural tests for the `mnist_labels` entry point.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use mnist_labels_core::{
    DatasetFile, FileKind, LabelArray, LabelError, LabelOptions, MnistDownloader, Result, Split,
    mnist_labels,
};
use mnist_labels_test_support::idx::{
    LABEL_MAGIC, SAMPLE_LABELS, encode_idx, encode_labels, gzip, write_file,
};
use rstest::{fixture, rstest};
use tempfile::TempDir;

/// Downloader double that hands back a prepared file and records requests.
struct RecordingDownloader {
    path: PathBuf,
    requests: RefCell<Vec<DatasetFile>>,
}

impl RecordingDownloader {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            requests: RefCell::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<DatasetFile> {
        self.requests.borrow().clone()
    }
}

impl MnistDownloader for RecordingDownloader {
    fn download(&self, file: DatasetFile) -> Result<PathBuf> {
        self.requests.borrow_mut().push(file);
        Ok(self.path.clone())
    }
}

struct Sample {
    _dir: TempDir,
    path: PathBuf,
}

#[fixture]
fn sample() -> Sample {
    let dir = match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    };
    let payload = gzip(&encode_labels(&SAMPLE_LABELS));
    let path = write_file(dir.path(), "test_mnist_labels", &payload);
    Sample { _dir: dir, path }
}

#[rstest]
fn passing_file_returns_correct_labels(sample: Sample) {
    let downloader = RecordingDownloader::new(&sample.path);
    let options = LabelOptions::new().with_file_path(&sample.path);

    let labels: LabelArray = mnist_labels(&options, &downloader).expect("labels must decode");

    assert_eq!(labels.as_slice(), &SAMPLE_LABELS);
}

#[rstest]
fn specialized_and_generic_containers_hold_identical_labels(sample: Sample) {
    let downloader = RecordingDownloader::new(&sample.path);
    let options = LabelOptions::new().with_file_path(&sample.path);

    let array: LabelArray = mnist_labels(&options, &downloader).expect("array must decode");
    let plain: Vec<u8> = mnist_labels(&options, &downloader).expect("vec must decode");

    assert_eq!(array.as_slice(), plain.as_slice());
    assert_eq!(plain, SAMPLE_LABELS.to_vec());
}

#[rstest]
#[case::default_split(None, Split::Train)]
#[case::train(Some(false), Split::Train)]
#[case::test(Some(true), Split::Test)]
fn omitted_file_downloads_labels_once(
    sample: Sample,
    #[case] test: Option<bool>,
    #[case] expected: Split,
) {
    let downloader = RecordingDownloader::new(&sample.path);
    let options = match test {
        Some(flag) => LabelOptions::new().with_test(flag),
        None => LabelOptions::new(),
    };

    let labels: Vec<u8> = mnist_labels(&options, &downloader).expect("labels must decode");

    assert_eq!(labels, SAMPLE_LABELS.to_vec());
    assert_eq!(
        downloader.requests(),
        vec![DatasetFile {
            kind: FileKind::Labels,
            split: expected,
        }]
    );
}

#[rstest]
#[case::delete_requested(true)]
#[case::delete_disabled(false)]
fn supplied_file_is_never_downloaded_or_deleted(sample: Sample, #[case] delete: bool) {
    let downloader = RecordingDownloader::new(&sample.path);
    let options = LabelOptions::new()
        .with_file_path(&sample.path)
        .with_delete_tempfile(delete);

    let _: LabelArray = mnist_labels(&options, &downloader).expect("labels must decode");

    assert!(downloader.requests().is_empty());
    assert!(sample.path.exists());
}

#[rstest]
fn omitted_file_removes_download_by_default(sample: Sample) {
    let downloader = RecordingDownloader::new(&sample.path);

    let _: LabelArray =
        mnist_labels(&LabelOptions::new(), &downloader).expect("labels must decode");

    assert!(!sample.path.exists());
}

#[rstest]
fn omitted_file_is_kept_when_deletion_disabled(sample: Sample) {
    let downloader = RecordingDownloader::new(&sample.path);
    let options = LabelOptions::new().with_delete_tempfile(false);

    let _: LabelArray = mnist_labels(&options, &downloader).expect("labels must decode");

    assert_eq!(downloader.requests().len(), 1);
    assert!(sample.path.exists());
}

#[rstest]
fn truncated_download_fails_without_partial_labels() {
    let dir = match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    };
    let payload = gzip(&encode_idx(LABEL_MAGIC, 4, &[5, 0, 9]));
    let path = write_file(dir.path(), "truncated", &payload);
    let downloader = RecordingDownloader::new(&path);

    let result: Result<LabelArray> = mnist_labels(&LabelOptions::new(), &downloader);

    assert!(matches!(
        result,
        Err(LabelError::TruncatedPayload {
            expected: 4,
            actual: 3,
            ..
        })
    ));
    assert!(!path.exists());
}

#[rstest]
fn download_errors_surface_unchanged() {
    let downloader = |file: DatasetFile| -> Result<PathBuf> {
        Err(LabelError::Download {
            url: file.file_name().to_owned(),
            message: "connection refused".to_owned(),
        })
    };

    let result: Result<Vec<u8>> = mnist_labels(&LabelOptions::new().with_test(true), &downloader);

    let Err(LabelError::Download { url, message }) = result else {
        panic!("expected Download error");
    };
    assert_eq!(url, "t10k-labels-idx1-ubyte.gz");
    assert_eq!(message, "connection refused");
}
