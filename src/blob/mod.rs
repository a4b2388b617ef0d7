//! Random-access byte sources over disc image containers.
//!
//! A [`ByteSource`] presents the *logical* disc image regardless of how it is
//! stored on the host. Everything above this layer (field accessors, the FST,
//! banner decoding, sync hashing) reads through the trait and never sees the
//! container format.
//!
//! | Type | Container |
//! |------|-----------|
//! | [`PlainSource`]  | Raw ISO/GCM image over any `Read + Seek` |
//! | [`SplitSource`]  | Several consecutive parts forming one image |
//! | [`CompressedSource`] | Whole-image Zstandard or LZ4 stream (`compression` feature) |

#[cfg(feature = "compression")]
pub mod compressed;
pub mod plain;
pub mod split;

#[cfg(feature = "compression")]
pub use compressed::CompressedSource;
pub use plain::PlainSource;
pub use split::SplitSource;

use crate::Result;

/// Container format a [`ByteSource`] reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobType {
    /// Uncompressed image, one file.
    Plain,
    /// Uncompressed image split across several files.
    Split,
    /// Whole image compressed as a single Zstandard stream.
    Zstd,
    /// Whole image compressed as a size-prepended LZ4 block.
    Lz4,
}

/// Random-access reader over the logical bytes of a disc image.
///
/// Implementations must be shareable between threads; stream-backed sources
/// guard their reader internally.
pub trait ByteSource: Send + Sync {
    /// Fill `buf` with the bytes starting at `offset`.
    ///
    /// Succeeds only when the whole buffer was filled. On failure the contents
    /// of `buf` are unspecified.
    fn read(&self, offset: u64, buf: &mut [u8]) -> Result<()>;

    /// Size of the logical disc image in bytes.
    fn data_size(&self) -> u64;

    /// Size of the container on the host in bytes.
    fn raw_size(&self) -> u64;

    /// Whether [`ByteSource::data_size`] is exact rather than an estimate.
    fn is_data_size_accurate(&self) -> bool;

    /// Container format of this source.
    fn blob_type(&self) -> BlobType;
}
