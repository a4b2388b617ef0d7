//! Split disc images: one logical image stored as consecutive parts.
//!
//! Common for dumps kept on FAT32 media (`game.part0.iso`, `game.part1.iso`,
//! ...). Parts are concatenated in the order given; a read may span several
//! parts.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use super::{BlobType, ByteSource, PlainSource};
use crate::{Error, Result};

/// Byte source over several consecutive image parts.
#[derive(Debug)]
pub struct SplitSource<R> {
    /// `(logical start offset, part)` in ascending order.
    parts: Vec<(u64, PlainSource<R>)>,
    size: u64,
}

impl<R: Read + Seek + Send> SplitSource<R> {
    /// Join `readers` in order into one logical image.
    ///
    /// Returns [`Error::InvalidRange`] when no parts are given.
    pub fn new<I: IntoIterator<Item = R>>(readers: I) -> Result<Self> {
        let mut parts = Vec::new();
        let mut size = 0u64;
        for reader in readers {
            let part = PlainSource::new(reader)?;
            let part_size = part.data_size();
            parts.push((size, part));
            size = size.checked_add(part_size).ok_or(Error::InvalidRange)?;
        }
        if parts.is_empty() {
            return Err(Error::InvalidRange);
        }
        Ok(Self { parts, size })
    }

    /// Number of parts.
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }
}

impl SplitSource<BufReader<File>> {
    /// Open each path in order as one part.
    pub fn open<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let readers = paths
            .iter()
            .map(|p| File::open(p).map(BufReader::new))
            .collect::<std::io::Result<Vec<_>>>()?;
        Self::new(readers)
    }
}

impl<R: Read + Seek + Send> ByteSource for SplitSource<R> {
    fn read(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        let length = buf.len() as u64;
        let end = offset.checked_add(length).ok_or(Error::InvalidRange)?;
        if end > self.size {
            return Err(Error::ReadFailed { offset, length });
        }

        // Index of the last part starting at or before `offset`.
        let mut index = self.parts.partition_point(|(start, _)| *start <= offset) - 1;
        let mut pos = offset;
        let mut done = 0usize;
        while done < buf.len() {
            let (start, part) = self.parts.get(index).ok_or(Error::ReadFailed { offset, length })?;
            let local = pos - start;
            let available = part.data_size() - local;
            let take = available.min((buf.len() - done) as u64) as usize;
            part.read(local, &mut buf[done..done + take])?;
            done += take;
            pos += take as u64;
            index += 1;
        }
        Ok(())
    }

    fn data_size(&self) -> u64 {
        self.size
    }

    fn raw_size(&self) -> u64 {
        self.size
    }

    fn is_data_size_accurate(&self) -> bool {
        true
    }

    fn blob_type(&self) -> BlobType {
        BlobType::Split
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use super::*;

    fn split(image: &[u8], cuts: &[usize]) -> SplitSource<Cursor<Vec<u8>>> {
        let mut parts = Vec::new();
        let mut prev = 0;
        for &cut in cuts.iter().chain(std::iter::once(&image.len())) {
            parts.push(Cursor::new(image[prev..cut].to_vec()));
            prev = cut;
        }
        SplitSource::new(parts).unwrap()
    }

    #[test]
    fn read_spanning_parts_matches_whole_image() {
        let image: Vec<u8> = (0..100u8).collect();
        let src = split(&image, &[10, 11, 40]);
        assert_eq!(src.part_count(), 4);
        assert_eq!(src.data_size(), 100);

        let mut buf = [0u8; 50];
        src.read(5, &mut buf).unwrap();
        assert_eq!(&buf[..], &image[5..55]);
    }

    #[test]
    fn zero_length_parts_are_skipped() {
        let image: Vec<u8> = (0..32u8).collect();
        let src = split(&image, &[16, 16]);
        let mut buf = [0u8; 8];
        src.read(12, &mut buf).unwrap();
        assert_eq!(&buf[..], &image[12..20]);
    }

    #[test]
    fn read_past_end_fails() {
        let src = split(&[0u8; 20], &[10]);
        let mut buf = [0u8; 4];
        assert!(src.read(18, &mut buf).is_err());
    }

    #[test]
    fn opens_parts_from_disk() {
        let mut first = tempfile::NamedTempFile::new().unwrap();
        let mut second = tempfile::NamedTempFile::new().unwrap();
        first.write_all(b"GAL").unwrap();
        second.write_all(b"E01").unwrap();
        first.flush().unwrap();
        second.flush().unwrap();

        let src = SplitSource::open(&[first.path(), second.path()]).unwrap();
        let mut buf = [0u8; 6];
        src.read(0, &mut buf).unwrap();
        assert_eq!(&buf, b"GALE01");
        assert_eq!(src.blob_type(), BlobType::Split);
    }

    #[test]
    fn no_parts_is_rejected() {
        let parts: Vec<Cursor<Vec<u8>>> = Vec::new();
        assert!(SplitSource::new(parts).is_err());
    }
}
