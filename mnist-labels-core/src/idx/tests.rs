//! Unit tests for IDX label parsing.

use super::*;
use crate::{LabelArray, LabelErrorCode};
use mnist_labels_test_support::idx::{
    IMAGE_MAGIC, LABEL_MAGIC, SAMPLE_LABELS, encode_idx, encode_labels, gzip, write_file,
};
use rstest::rstest;
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

#[rstest]
#[case::gzip(true)]
#[case::raw(false)]
fn decodes_sample_labels_in_file_order(#[case] compressed: bool) {
    let dir = temp_dir();
    let raw = encode_labels(&SAMPLE_LABELS);
    let bytes = if compressed { gzip(&raw) } else { raw };
    let path = write_file(dir.path(), "labels", &bytes);

    let labels: LabelArray = decode_labels(&path).expect("sample labels must decode");
    assert_eq!(labels.as_slice(), &SAMPLE_LABELS);
}

#[rstest]
#[case::split_in_header(4)]
#[case::split_after_header(IDX_HEADER_LEN)]
#[case::split_in_payload(10)]
fn decodes_concatenated_gzip_members(#[case] split_at: usize) {
    let dir = temp_dir();
    let raw = encode_labels(&SAMPLE_LABELS);
    let (head, tail) = raw.split_at(split_at);
    let mut bytes = gzip(head);
    bytes.extend(gzip(tail));
    let path = write_file(dir.path(), "multi", &bytes);

    let labels: Vec<u8> = decode_labels(&path).expect("multi-member gzip must decode");
    assert_eq!(labels, SAMPLE_LABELS.to_vec());
}

#[rstest]
fn specialized_and_generic_containers_agree() {
    let dir = temp_dir();
    let path = write_file(dir.path(), "labels", &gzip(&encode_labels(&SAMPLE_LABELS)));

    let array: LabelArray = decode_labels(&path).expect("array decode must succeed");
    let plain: Vec<u8> = decode_labels(&path).expect("vec decode must succeed");
    assert_eq!(array.as_slice(), plain.as_slice());
}

#[rstest]
fn empty_label_file_decodes_to_empty_sequence() {
    let labels: Vec<u8> = decode_labels_from_reader(&encode_labels(&[])[..], Path::new("empty"))
        .expect("zero labels is valid");
    assert!(labels.is_empty());
}

#[rstest]
fn trailing_bytes_are_ignored() {
    let raw = encode_idx(LABEL_MAGIC, 2, &[4, 2, 99, 98]);
    let labels: Vec<u8> =
        decode_labels_from_reader(&raw[..], Path::new("trailing")).expect("decode must succeed");
    assert_eq!(labels, vec![4, 2]);
}

#[rstest]
#[case::image_magic(IMAGE_MAGIC)]
#[case::signed_byte(0x0000_0901)]
#[case::two_dimensions(0x0000_0802)]
#[case::nonzero_prefix(0x0100_0801)]
fn rejects_non_label_magic(#[case] magic: u32) {
    let raw = encode_idx(magic, 1, &[3]);
    let error = decode_labels_from_reader::<Vec<u8>, _>(&raw[..], Path::new("bad"))
        .expect_err("non-label magic must fail");
    let LabelError::InvalidMagic { magic: reported, .. } = error else {
        panic!("expected InvalidMagic error");
    };
    assert_eq!(reported, magic);
}

#[rstest]
#[case::empty(0)]
#[case::magic_only(4)]
#[case::one_short(7)]
fn rejects_truncated_header(#[case] available: usize) {
    let raw = encode_labels(&SAMPLE_LABELS);
    let short = raw.get(..available).expect("fixture is long enough");
    let error = decode_labels_from_reader::<Vec<u8>, _>(short, Path::new("short"))
        .expect_err("short header must fail");
    let LabelError::TruncatedHeader { actual, .. } = error else {
        panic!("expected TruncatedHeader error");
    };
    assert_eq!(actual, available);
}

#[rstest]
#[case::gzip(true)]
#[case::raw(false)]
fn truncated_payload_yields_no_partial_sequence(#[case] compressed: bool) {
    let dir = temp_dir();
    let raw = encode_idx(LABEL_MAGIC, 4, &[5, 0]);
    let bytes = if compressed { gzip(&raw) } else { raw };
    let path = write_file(dir.path(), "truncated", &bytes);

    let error = decode_labels::<LabelArray>(&path).expect_err("truncated payload must fail");
    let LabelError::TruncatedPayload {
        expected, actual, ..
    } = error
    else {
        panic!("expected TruncatedPayload error");
    };
    assert_eq!((expected, actual), (4, 2));
}

#[rstest]
fn missing_file_reports_io_error_with_path() {
    let dir = temp_dir();
    let path = dir.path().join("absent");
    let error = decode_labels::<Vec<u8>>(&path).expect_err("missing file must fail");
    assert_eq!(error.code(), LabelErrorCode::Io);
    let LabelError::Io { path: reported, .. } = error else {
        panic!("expected Io error");
    };
    assert_eq!(reported, path);
}

#[rstest]
fn corrupt_gzip_stream_reports_io_error() {
    let dir = temp_dir();
    // Gzip signature followed by an unsupported compression method.
    let bytes = [0x1f, 0x8b, 0x00, 0x00, 0, 0, 0, 0, 0, 0xff, 1, 2, 3];
    let path = write_file(dir.path(), "corrupt", &bytes);

    let error = decode_labels::<Vec<u8>>(&path).expect_err("corrupt gzip must fail");
    assert_eq!(error.code(), LabelErrorCode::Io);
}

#[rstest]
fn read_header_splits_big_endian_fields() {
    let raw = encode_idx(LABEL_MAGIC, 60_000, &[]);
    let header = read_header(&mut &raw[..], Path::new("header")).expect("header must parse");
    assert_eq!(header, IdxHeader::new(0x0000_0801, 60_000));
    assert_eq!(header.data_type(), 0x08);
    assert_eq!(header.dimensions(), 0x01);
}
