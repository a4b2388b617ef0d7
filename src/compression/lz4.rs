//! LZ4 decompression (requires the `compression` feature).
//!
//! The compressed image is expected in the **size-prepended block format**:
//! a little-endian `u32` giving the decompressed byte count, followed by the
//! raw LZ4 block. This matches [`lz4_flex::decompress_size_prepended`].

#![cfg(feature = "compression")]

use crate::{Error, Result};

/// Decompress a size-prepended LZ4 buffer.
///
/// Returns [`Error::Lz4`] on any decompression failure.
pub fn decompress_lz4(data: &[u8]) -> Result<Vec<u8>> {
    lz4_flex::decompress_size_prepended(data).map_err(|_| Error::Lz4)
}
