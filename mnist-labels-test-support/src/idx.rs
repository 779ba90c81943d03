//! Builders for IDX label-file fixtures.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;

/// Magic number of an unsigned-byte, one-dimensional IDX file.
pub const LABEL_MAGIC: u32 = 0x0000_0801;
/// Magic number of an unsigned-byte, three-dimensional IDX image file.
pub const IMAGE_MAGIC: u32 = 0x0000_0803;
/// Four labels used throughout the decoder tests.
pub const SAMPLE_LABELS: [u8; 4] = [5, 0, 9, 1];

/// Encodes a well-formed label file whose count matches `labels`.
///
/// # Examples
/// ```
/// use mnist_labels_test_support::idx::encode_labels;
///
/// assert_eq!(encode_labels(&[7]), vec![0, 0, 8, 1, 0, 0, 0, 1, 7]);
/// ```
#[must_use]
pub fn encode_labels(labels: &[u8]) -> Vec<u8> {
    let count = u32::try_from(labels.len()).expect("fixture label count must fit u32");
    encode_idx(LABEL_MAGIC, count, labels)
}

/// Encodes an IDX stream with an arbitrary header, which may disagree with
/// the payload length.
#[must_use]
pub fn encode_idx(magic: u32, count: u32, payload: &[u8]) -> Vec<u8> {
    let mut raw = Vec::with_capacity(8 + payload.len());
    append_u32_be(&mut raw, magic);
    append_u32_be(&mut raw, count);
    raw.extend_from_slice(payload);
    raw
}

/// Gzip-compresses `raw`.
#[must_use]
pub fn gzip(raw: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(raw)
        .expect("gzip payload writing must succeed in tests");
    encoder
        .finish()
        .expect("gzip payload finalization must succeed in tests")
}

/// Writes `bytes` to `dir/name` and returns the path.
#[must_use]
pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).expect("fixture file writing must succeed in tests");
    path
}

fn append_u32_be(buffer: &mut Vec<u8>, value: u32) {
    for shift in [24_u32, 16, 8, 0] {
        let byte = u8::try_from((value >> shift) & 0xFF).expect("byte must fit u8");
        buffer.push(byte);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use rstest::rstest;
    use std::io::Read;

    #[rstest]
    #[case(LABEL_MAGIC, [0, 0, 8, 1])]
    #[case(IMAGE_MAGIC, [0, 0, 8, 3])]
    #[case(0x0102_0304, [1, 2, 3, 4])]
    fn headers_are_big_endian(#[case] magic: u32, #[case] expected: [u8; 4]) {
        let raw = encode_idx(magic, 2, &[]);
        assert_eq!(raw, [expected, [0, 0, 0, 2]].concat());
    }

    #[rstest]
    fn gzip_output_decompresses_to_input() {
        let raw = encode_labels(&SAMPLE_LABELS);
        let mut decoded = Vec::new();
        GzDecoder::new(gzip(&raw).as_slice())
            .read_to_end(&mut decoded)
            .expect("fixture must decompress");
        assert_eq!(decoded, raw);
    }
}
