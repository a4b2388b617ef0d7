//! Sync hash - a SHA-1 fingerprint of a disc's game content.
//!
//! Two dumps of the same game hash identically no matter which container
//! holds them, because the digest is computed over *logical* bytes read
//! through [`ByteSource`]. Which byte ranges count as game content is decided
//! by a [`ContentSelector`]; [`GamePartition`] is the standard choice.
//!
//! ## GamePartition ranges, in hash order
//! ```text
//! Header + apploader  [0x0000, 0x2440 + 0x20 + u32 @0x2454 + u32 @0x2458)
//! Boot DOL            [u32 @0x420, + max(section offset + size))
//! FST                 [u32 @0x424, + u32 @0x428)
//! opening.bnr         [FST entry offset, + FST entry size)
//! ```
//! A range whose bounds cannot be read, or whose bytes cannot be read in
//! full, is left out of the digest. Ranges are read in chunks of
//! `CHUNK_SIZE` bytes, so their length is not limited.

use log::debug;
use sha1::{Digest, Sha1};

use crate::blob::ByteSource;
use crate::formats::banner::BANNER_PATH;
use crate::formats::fst::{FST_OFFSET_FIELD, FST_SIZE_FIELD, Fst};
use crate::utils::{be_u32, read_array, read_be_u32};

/// A 20-byte SHA-1 digest.
pub type SyncHash = [u8; 20];

/// Read granularity for [`SyncHasher::add_range`].
const CHUNK_SIZE: usize = 0x10_0000;

const DOL_OFFSET_FIELD: u64 = 0x420;
const DOL_HEADER_SIZE: usize = 0x100;
const DOL_SECTIONS: usize = 18;
const DOL_SIZES: usize = 0x90;

const APPLOADER_OFFSET: u64 = 0x2440;
const APPLOADER_HEADER_SIZE: u64 = 0x20;

/// A logical byte range of the disc image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashRange {
    /// Logical disc offset of the first byte.
    pub offset: u64,
    /// Length in bytes.
    pub length: u64,
}

impl HashRange {
    /// Range of `length` bytes starting at `offset`.
    pub fn new(offset: u64, length: u64) -> Self {
        Self { offset, length }
    }
}

/// Chooses the byte ranges that make up a disc's game content.
pub trait ContentSelector {
    /// Ranges to hash, in order.
    fn select(&self, source: &dyn ByteSource) -> Vec<HashRange>;
}

/// Selects the header through the apploader, the boot DOL, the FST and the
/// banner of an unpartitioned disc.
#[derive(Debug, Clone, Copy, Default)]
pub struct GamePartition;

impl ContentSelector for GamePartition {
    fn select(&self, source: &dyn ByteSource) -> Vec<HashRange> {
        let apploader = match (
            read_be_u32(source, APPLOADER_OFFSET + 0x14),
            read_be_u32(source, APPLOADER_OFFSET + 0x18),
        ) {
            (Ok(code), Ok(trailer)) => APPLOADER_HEADER_SIZE + code as u64 + trailer as u64,
            _ => 0,
        };
        let mut ranges = vec![HashRange::new(0, APPLOADER_OFFSET + apploader)];

        if let Some(dol) = boot_dol_range(source) {
            ranges.push(dol);
        }

        if let (Ok(offset), Ok(size)) = (
            read_be_u32(source, FST_OFFSET_FIELD),
            read_be_u32(source, FST_SIZE_FIELD),
        ) {
            ranges.push(HashRange::new(offset as u64, size as u64));
        }

        if let Some(banner) = Fst::parse(source).ok().and_then(|fst| fst.find(BANNER_PATH)) {
            ranges.push(HashRange::new(banner.offset, banner.size));
        }

        ranges
    }
}

/// Location and size of the boot DOL, from its section table.
fn boot_dol_range(source: &dyn ByteSource) -> Option<HashRange> {
    let offset = read_be_u32(source, DOL_OFFSET_FIELD).ok()? as u64;
    let header = read_array::<DOL_HEADER_SIZE>(source, offset).ok()?;
    let mut size = DOL_HEADER_SIZE as u64;
    for i in 0..DOL_SECTIONS {
        let section_offset = be_u32(&header, i * 4).ok()? as u64;
        let section_size = be_u32(&header, DOL_SIZES + i * 4).ok()? as u64;
        size = size.max(section_offset + section_size);
    }
    Some(HashRange::new(offset, size))
}

/// Incremental sync hash computation.
#[derive(Clone, Default)]
pub struct SyncHasher {
    context: Sha1,
}

impl SyncHasher {
    /// A hasher that has seen no input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes.
    pub fn update(&mut self, data: &[u8]) {
        self.context.update(data);
    }

    /// Feed the bytes of `range`. Nothing is fed unless the whole range
    /// could be read; returns whether it was.
    pub fn add_range(&mut self, source: &dyn ByteSource, range: HashRange) -> bool {
        let mut context = self.context.clone();
        let mut buf = vec![0u8; (range.length as usize).min(CHUNK_SIZE)];
        let mut pos = 0u64;
        while pos < range.length {
            let len = (range.length - pos).min(CHUNK_SIZE as u64) as usize;
            let Some(offset) = range.offset.checked_add(pos) else {
                debug!("skipping out-of-range sync hash range {range:x?}");
                return false;
            };
            if let Err(e) = source.read(offset, &mut buf[..len]) {
                debug!("skipping unreadable sync hash range {range:x?}: {e}");
                return false;
            }
            context.update(&buf[..len]);
            pos += len as u64;
        }
        self.context = context;
        true
    }

    /// Finish and return the digest.
    pub fn finish(self) -> SyncHash {
        self.context.finalize().into()
    }
}

/// Hash the ranges `selector` picks from `source`.
pub fn sync_hash(source: &dyn ByteSource, selector: &dyn ContentSelector) -> SyncHash {
    let mut hasher = SyncHasher::new();
    for range in selector.select(source) {
        hasher.add_range(source, range);
    }
    hasher.finish()
}
