//! Low-level byte helpers shared by all parsers.
//!
//! Every function either returns exactly the value it promises or an error -
//! there is no partial-read ambiguity.

use crate::blob::ByteSource;
use crate::{Error, Result};

/// Read a big-endian `u16` from `buf` at `offset`.
#[inline]
pub(crate) fn be_u16(buf: &[u8], offset: usize) -> Result<u16> {
    Ok(u16::from_be_bytes(bytesa::<2>(buf, offset)?))
}

/// Read a big-endian 24-bit value from `buf` at `offset`.
#[inline]
pub(crate) fn be_u24(buf: &[u8], offset: usize) -> Result<u32> {
    let b = bytesa::<3>(buf, offset)?;
    Ok(u32::from_be_bytes([0, b[0], b[1], b[2]]))
}

/// Read a big-endian `u32` from `buf` at `offset`.
#[inline]
pub(crate) fn be_u32(buf: &[u8], offset: usize) -> Result<u32> {
    Ok(u32::from_be_bytes(bytesa::<4>(buf, offset)?))
}

/// Copy exactly `N` bytes starting at `offset` into a fixed-size array.
///
/// Returns [`Error::InvalidRange`] if the slice is too short.
#[inline]
pub(crate) fn bytesa<const N: usize>(buf: &[u8], offset: usize) -> Result<[u8; N]> {
    let end = offset.checked_add(N).ok_or(Error::InvalidRange)?;
    let slice = buf.get(offset..end).ok_or(Error::InvalidRange)?;
    let mut b = [0u8; N];
    b.copy_from_slice(slice);
    Ok(b)
}

/// Read exactly `N` bytes from `source` at `offset`.
#[inline]
pub(crate) fn read_array<const N: usize>(source: &dyn ByteSource, offset: u64) -> Result<[u8; N]> {
    let mut b = [0u8; N];
    source.read(offset, &mut b)?;
    Ok(b)
}

/// Read a big-endian `u32` from `source` at `offset`.
#[inline]
pub(crate) fn read_be_u32(source: &dyn ByteSource, offset: u64) -> Result<u32> {
    Ok(u32::from_be_bytes(read_array::<4>(source, offset)?))
}

/// Return the prefix of `buf` up to (not including) the first null byte.
///
/// The whole slice is returned when it contains no null byte.
#[inline]
pub(crate) fn until_nul(buf: &[u8]) -> &[u8] {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    &buf[..end]
}
