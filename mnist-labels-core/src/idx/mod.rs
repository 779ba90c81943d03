//! IDX label-file parsing.
//!
//! A label file is an 8-byte big-endian header (`magic`, `count`) followed by
//! `count` unsigned-byte labels. Files may be gzip-compressed on disk; the
//! decoder sniffs the gzip signature and decompresses transparently.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use flate2::bufread::MultiGzDecoder;
use tracing::{Span, debug, field, instrument};

use crate::{LabelContainer, LabelError, Result};

/// Length of the IDX header in bytes.
pub const IDX_HEADER_LEN: usize = 8;
/// Magic number of a one-dimensional unsigned-byte IDX file.
pub const IDX_LABEL_MAGIC: u32 = 0x0000_0801;

const IDX_UNSIGNED_BYTE: u8 = 0x08;
const IDX_LABEL_DIMENSIONS: u8 = 0x01;
const GZIP_SIGNATURE: [u8; 2] = [0x1f, 0x8b];
// Upper bound on up-front allocation for the label buffer.
const MAX_PREALLOCATED_LABELS: usize = 1 << 20;

/// The fixed 8-byte header at the start of an IDX file.
///
/// # Examples
/// ```
/// use mnist_labels_core::{IDX_LABEL_MAGIC, IdxHeader};
///
/// let header = IdxHeader::new(IDX_LABEL_MAGIC, 60_000);
/// assert_eq!(header.data_type(), 0x08);
/// assert_eq!(header.dimensions(), 1);
/// assert!(header.is_label_file());
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct IdxHeader {
    magic: u32,
    count: u32,
}

impl IdxHeader {
    /// Builds a header from its two raw fields.
    #[must_use]
    pub const fn new(magic: u32, count: u32) -> Self {
        Self { magic, count }
    }

    /// Raw magic number.
    #[must_use]
    pub const fn magic(self) -> u32 {
        self.magic
    }

    /// Number of items declared by the header.
    #[must_use]
    pub const fn count(self) -> u32 {
        self.count
    }

    /// Data-type code stored in the third magic byte (`0x08` for `u8`).
    #[must_use]
    pub fn data_type(self) -> u8 {
        magic_byte(self.magic, 8)
    }

    /// Number of dimensions stored in the fourth magic byte.
    #[must_use]
    pub fn dimensions(self) -> u8 {
        magic_byte(self.magic, 0)
    }

    /// Returns `true` when the magic describes a 1-D unsigned-byte array.
    #[must_use]
    pub fn is_label_file(self) -> bool {
        self.magic >> 16 == 0
            && self.data_type() == IDX_UNSIGNED_BYTE
            && self.dimensions() == IDX_LABEL_DIMENSIONS
    }
}

fn magic_byte(magic: u32, shift: u32) -> u8 {
    u8::try_from((magic >> shift) & 0xFF).unwrap_or(u8::MAX)
}

/// Decodes the label file at `path` into the container `C`.
///
/// Gzip-compressed and raw files are both accepted. Gzip files may hold
/// several concatenated members; they decode as one stream. Bytes beyond the
/// declared payload are ignored.
///
/// # Errors
/// Returns [`LabelError::Io`] when the file cannot be opened or read,
/// [`LabelError::TruncatedHeader`] or [`LabelError::TruncatedPayload`] when it
/// ends early, and [`LabelError::InvalidMagic`] when the header does not
/// describe an unsigned-byte label file.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// use mnist_labels_core::{LabelArray, decode_labels};
///
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = tempfile::tempdir()?;
/// let path = dir.path().join("labels-idx1-ubyte");
/// std::fs::write(&path, [0, 0, 8, 1, 0, 0, 0, 2, 7, 3])?;
///
/// let labels: LabelArray = decode_labels(&path)?;
/// assert_eq!(labels.as_slice(), &[7, 3]);
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "decode_labels",
    skip_all,
    fields(path = %path.display(), gzip = field::Empty),
)]
pub fn decode_labels<C: LabelContainer>(path: &Path) -> Result<C> {
    let file = File::open(path).map_err(|source| LabelError::io(path, source))?;
    let mut reader = BufReader::new(file);
    let gzip = has_gzip_signature(&mut reader).map_err(|source| LabelError::io(path, source))?;
    Span::current().record("gzip", gzip);

    if gzip {
        decode_labels_from_reader(MultiGzDecoder::new(reader), path)
    } else {
        decode_labels_from_reader(reader, path)
    }
}

/// Decodes an already-decompressed IDX label stream.
///
/// `origin` names the stream in errors and diagnostics.
///
/// # Errors
/// Returns the same errors as [`decode_labels`], minus open failures.
///
/// # Examples
/// ```
/// use std::path::Path;
/// use mnist_labels_core::decode_labels_from_reader;
///
/// let bytes: &[u8] = &[0, 0, 8, 1, 0, 0, 0, 3, 5, 0, 9];
/// let labels: Vec<u8> = decode_labels_from_reader(bytes, Path::new("memory"))
///     .expect("well-formed labels decode");
/// assert_eq!(labels, vec![5, 0, 9]);
/// ```
pub fn decode_labels_from_reader<C, R>(mut reader: R, origin: &Path) -> Result<C>
where
    C: LabelContainer,
    R: Read,
{
    let header = read_header(&mut reader, origin)?;
    if !header.is_label_file() {
        return Err(LabelError::InvalidMagic {
            path: origin.to_path_buf(),
            magic: header.magic(),
        });
    }

    let expected = usize::try_from(header.count()).map_err(|_| LabelError::CountOverflow {
        path: origin.to_path_buf(),
        count: header.count(),
    })?;
    let labels = read_at_most(&mut reader, expected, MAX_PREALLOCATED_LABELS)
        .map_err(|source| LabelError::io(origin, source))?;
    if labels.len() != expected {
        return Err(LabelError::TruncatedPayload {
            path: origin.to_path_buf(),
            expected,
            actual: labels.len(),
        });
    }

    debug!(path = %origin.display(), count = expected, "decoded IDX label payload");
    Ok(C::from_labels(labels))
}

/// Reads and splits the 8-byte IDX header without validating the magic.
///
/// # Errors
/// Returns [`LabelError::TruncatedHeader`] when fewer than 8 bytes are
/// available and [`LabelError::Io`] when reading fails.
pub fn read_header<R: Read>(reader: &mut R, origin: &Path) -> Result<IdxHeader> {
    let bytes = read_at_most(reader, IDX_HEADER_LEN, IDX_HEADER_LEN)
        .map_err(|source| LabelError::io(origin, source))?;
    let header: [u8; IDX_HEADER_LEN] =
        bytes
            .try_into()
            .map_err(|short: Vec<u8>| LabelError::TruncatedHeader {
                path: origin.to_path_buf(),
                actual: short.len(),
            })?;
    let [m0, m1, m2, m3, c0, c1, c2, c3] = header;
    Ok(IdxHeader::new(
        read_u32_be([m0, m1, m2, m3]),
        read_u32_be([c0, c1, c2, c3]),
    ))
}

fn has_gzip_signature<R: BufRead>(reader: &mut R) -> io::Result<bool> {
    let buffered = reader.fill_buf()?;
    Ok(buffered.starts_with(&GZIP_SIGNATURE))
}

fn read_at_most<R: Read>(reader: &mut R, len: usize, preallocate: usize) -> io::Result<Vec<u8>> {
    let limit = u64::try_from(len).unwrap_or(u64::MAX);
    let mut buffer = Vec::with_capacity(len.min(preallocate));
    reader.take(limit).read_to_end(&mut buffer)?;
    Ok(buffer)
}

fn read_u32_be(bytes: [u8; 4]) -> u32 {
    bytes
        .iter()
        .fold(0_u32, |acc, byte| (acc << 8) | u32::from(*byte))
}

#[cfg(test)]
mod tests;
