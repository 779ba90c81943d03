//! Error types for the MNIST label decoder.
//!
//! Defines the error enum surfaced by every public operation, its stable
//! machine-readable codes, and a convenient result alias.

use std::{fmt, io, path::PathBuf};

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Errors produced while resolving, downloading, or decoding a label file.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum LabelError {
    /// Opening or reading a label file failed.
    #[error("failed to read `{path}`: {source}")]
    Io {
        /// File that triggered the failure.
        path: PathBuf,
        /// Underlying operating system or decompression error.
        #[source]
        source: io::Error,
    },
    /// The file ended before the 8-byte IDX header was complete.
    #[error("`{path}` ends after {actual} bytes, before the 8-byte IDX header is complete")]
    TruncatedHeader {
        /// File with the short header.
        path: PathBuf,
        /// Number of header bytes that were available.
        actual: usize,
    },
    /// The magic number does not describe a one-dimensional unsigned-byte array.
    #[error("`{path}` has IDX magic {magic:#010x}, which is not an unsigned-byte label file")]
    InvalidMagic {
        /// File carrying the unexpected magic number.
        path: PathBuf,
        /// Magic number read from the header.
        magic: u32,
    },
    /// Fewer label bytes followed the header than its count declared.
    #[error("`{path}` declares {expected} labels but only {actual} are present")]
    TruncatedPayload {
        /// File with the short payload.
        path: PathBuf,
        /// Label count declared by the header.
        expected: usize,
        /// Label bytes actually available.
        actual: usize,
    },
    /// The declared label count cannot be addressed on this platform.
    #[error("label count {count} in `{path}` does not fit usize")]
    CountOverflow {
        /// File declaring the oversized count.
        path: PathBuf,
        /// Count read from the header.
        count: u32,
    },
    /// Fetching a dataset file from the remote source failed.
    #[error("dataset download failed for `{url}`: {message}")]
    Download {
        /// URL that failed.
        url: String,
        /// Human-readable failure message.
        message: String,
    },
}

define_error_codes! {
    /// Stable codes describing [`LabelError`] variants.
    enum LabelErrorCode for LabelError {
        /// Opening or reading a label file failed.
        Io => Io { .. } => "LABELS_IO",
        /// The file ended before the IDX header was complete.
        TruncatedHeader => TruncatedHeader { .. } => "LABELS_TRUNCATED_HEADER",
        /// The magic number does not describe a label file.
        InvalidMagic => InvalidMagic { .. } => "LABELS_INVALID_MAGIC",
        /// Fewer label bytes followed the header than declared.
        TruncatedPayload => TruncatedPayload { .. } => "LABELS_TRUNCATED_PAYLOAD",
        /// The declared label count does not fit usize.
        CountOverflow => CountOverflow { .. } => "LABELS_COUNT_OVERFLOW",
        /// Fetching a dataset file failed.
        Download => Download { .. } => "LABELS_DOWNLOAD",
    }
}

impl LabelError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenient alias for results returned by the label decoder.
pub type Result<T> = core::result::Result<T, LabelError>;
