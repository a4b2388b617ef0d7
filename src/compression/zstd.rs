//! Zstandard decompression (requires the `compression` feature).
//!
//! A `.iso.zst` image is a complete disc image compressed as one Zstd
//! stream; [`decompress_zstd`] inflates it in one go.

#![cfg(feature = "compression")]

use crate::{Error, Result};

/// Decompress a complete Zstandard-compressed buffer.
///
/// Returns [`Error::Zstd`] on any decompression failure.
pub fn decompress_zstd(data: &[u8]) -> Result<Vec<u8>> {
    zstd::decode_all(data).map_err(|_| Error::Zstd)
}
