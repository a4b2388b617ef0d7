//! Library-wide error and result types.
//!
//! Only the lower layers (byte sources, the FST, banner parsing, strict text
//! decoding) surface these. [`crate::volume::Volume`] resolves every error
//! into a documented fallback value.

use std::fmt;
use std::io;

/// Result alias used throughout gckit.
pub type Result<T> = std::result::Result<T, Error>;

/// All errors the library can produce.
#[derive(Debug)]
pub enum Error {
    /// No byte source is attached to the volume.
    MissingSource,
    /// The byte source declined or truncated a read.
    ReadFailed {
        /// Logical offset of the failed read.
        offset: u64,
        /// Requested length in bytes.
        length: u64,
    },
    /// A resource failed validation (message describes which check).
    MalformedResource(&'static str),
    /// Bytes did not decode cleanly under the assumed charset.
    EncodingFallback,
    /// An offset or size field would read outside the valid region.
    InvalidRange,
    /// An underlying I/O operation failed.
    Io(io::Error),
    /// LZ4 decompression failed.
    #[cfg(feature = "compression")]
    Lz4,
    /// Zstandard decompression failed.
    #[cfg(feature = "compression")]
    Zstd,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingSource => write!(f, "no byte source attached"),
            Error::ReadFailed { offset, length } => {
                write!(f, "read of {length:#x} bytes at {offset:#x} failed")
            }
            Error::MalformedResource(s) => write!(f, "malformed resource: {s}"),
            Error::EncodingFallback => write!(f, "text did not decode cleanly"),
            Error::InvalidRange => write!(f, "invalid offset or size"),
            Error::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "compression")]
            Error::Lz4 => write!(f, "lz4 decompression failed"),
            #[cfg(feature = "compression")]
            Error::Zstd => write!(f, "zstd decompression failed"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let Error::Io(e) = self {
            Some(e)
        } else {
            None
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}
