//! Whole-image compressed containers (requires the `compression` feature).
//!
//! The entire disc image is one Zstandard stream (`.iso.zst`) or one
//! size-prepended LZ4 block. The image is decompressed once when the source
//! is created and served from memory afterwards.

#![cfg(feature = "compression")]

use std::io::Cursor;

use super::{BlobType, ByteSource, PlainSource};
use crate::Result;
use crate::compression::lz4::decompress_lz4;
use crate::compression::zstd::decompress_zstd;

/// Byte source over a decompressed in-memory image.
#[derive(Debug)]
pub struct CompressedSource {
    image: PlainSource<Cursor<Vec<u8>>>,
    raw_size: u64,
    blob_type: BlobType,
}

impl CompressedSource {
    /// Decompress a Zstandard-compressed image.
    pub fn from_zstd(data: &[u8]) -> Result<Self> {
        Self::build(decompress_zstd(data)?, data.len(), BlobType::Zstd)
    }

    /// Decompress a size-prepended LZ4 image.
    pub fn from_lz4(data: &[u8]) -> Result<Self> {
        Self::build(decompress_lz4(data)?, data.len(), BlobType::Lz4)
    }

    fn build(image: Vec<u8>, raw_size: usize, blob_type: BlobType) -> Result<Self> {
        Ok(Self {
            image: PlainSource::new(Cursor::new(image))?,
            raw_size: raw_size as u64,
            blob_type,
        })
    }
}

impl ByteSource for CompressedSource {
    fn read(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        self.image.read(offset, buf)
    }

    fn data_size(&self) -> u64 {
        self.image.data_size()
    }

    fn raw_size(&self) -> u64 {
        self.raw_size
    }

    fn is_data_size_accurate(&self) -> bool {
        true
    }

    fn blob_type(&self) -> BlobType {
        self.blob_type
    }
}
