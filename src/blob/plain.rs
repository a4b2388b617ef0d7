//! Plain (uncompressed, single file) disc images.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::Mutex;

use super::{BlobType, ByteSource};
use crate::{Error, Result};

/// Byte source over a raw ISO/GCM image.
///
/// Generic over [`Read`] + [`Seek`]: pass a [`File`], a [`std::io::Cursor`]
/// over an in-memory image, or anything else implementing both traits.
#[derive(Debug)]
pub struct PlainSource<R> {
    inner: Mutex<R>,
    size: u64,
}

impl<R: Read + Seek + Send> PlainSource<R> {
    /// Wrap `reader`, measuring its length by seeking to the end.
    pub fn new(mut reader: R) -> Result<Self> {
        let size = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;
        Ok(Self {
            inner: Mutex::new(reader),
            size,
        })
    }
}

impl PlainSource<BufReader<File>> {
    /// Open a raw image from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(BufReader::new(File::open(path)?))
    }
}

impl<R: Read + Seek + Send> ByteSource for PlainSource<R> {
    fn read(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        let length = buf.len() as u64;
        let failed = || Error::ReadFailed { offset, length };
        let end = offset.checked_add(length).ok_or(Error::InvalidRange)?;
        if end > self.size {
            return Err(failed());
        }
        let mut inner = self.inner.lock().map_err(|_| failed())?;
        inner.seek(SeekFrom::Start(offset))?;
        inner.read_exact(buf).map_err(|_| failed())
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
        BlobType::Plain
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use super::*;

    #[test]
    fn reads_inside_bounds() {
        let src = PlainSource::new(Cursor::new((0u8..=255).collect::<Vec<_>>())).unwrap();
        let mut buf = [0u8; 4];
        src.read(0x10, &mut buf).unwrap();
        assert_eq!(buf, [0x10, 0x11, 0x12, 0x13]);
        assert_eq!(src.data_size(), 256);
        assert_eq!(src.blob_type(), BlobType::Plain);
    }

    #[test]
    fn read_past_end_fails() {
        let src = PlainSource::new(Cursor::new(vec![0u8; 16])).unwrap();
        let mut buf = [0u8; 4];
        assert!(matches!(
            src.read(14, &mut buf),
            Err(Error::ReadFailed { offset: 14, length: 4 })
        ));
        assert!(matches!(src.read(u64::MAX, &mut buf), Err(Error::InvalidRange)));
    }

    #[test]
    fn opens_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"GALE01").unwrap();
        file.flush().unwrap();

        let src = PlainSource::open(file.path()).unwrap();
        let mut buf = [0u8; 6];
        src.read(0, &mut buf).unwrap();
        assert_eq!(&buf, b"GALE01");
        assert_eq!(src.raw_size(), 6);
    }
}
