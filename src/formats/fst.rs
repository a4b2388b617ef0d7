//! FST (File System Table) - the GameCube disc file system.
//!
//! Only path lookup and bounded reads are provided; the volume uses them to
//! pull `opening.bnr` and `boot.id` off the disc.
//!
//! ## Location
//! ```text
//! [0x424] FstOffset  (u32 BE, absolute disc offset)
//! [0x428] FstSize    (u32 BE)
//! ```
//!
//! ## Layout
//! ```text
//! [0x00] Entry table   (EntryCount × 0x0C bytes; entry 0 is the root directory)
//! [...]  Name table    (null-terminated names)
//! ```
//!
//! ## Entry (0x0C bytes)
//! ```text
//! [0x00] Flags       (u8; 0 = file, 1 = directory)
//! [0x01] NameOffset  (u24 BE, into the name table)
//! [0x04] file: data offset (u32 BE)  | dir: parent index     (u32 BE)
//! [0x08] file: data size   (u32 BE)  | dir: index past last child (u32 BE)
//! ```
//! The root entry's "index past last child" equals the total entry count.

use log::debug;

use crate::blob::ByteSource;
use crate::utils::{be_u24, be_u32, read_be_u32, until_nul};
use crate::{Error, Result};

/// Disc offset of the `u32` FST offset field.
pub const FST_OFFSET_FIELD: u64 = 0x424;
/// Disc offset of the `u32` FST size field.
pub const FST_SIZE_FIELD: u64 = 0x428;

const ENTRY_SIZE: usize = 0x0C;
/// Largest FST accepted. Retail discs stay far below this.
const MAX_FST_SIZE: u32 = 0x200_0000;

#[derive(Debug, Clone, Copy)]
struct FstEntry {
    is_dir: bool,
    name_offset: u32,
    /// File data offset, or parent index for directories.
    offset: u32,
    /// File size, or index past the last child for directories.
    size: u32,
}

/// Location of a file on disc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileInfo {
    /// Absolute disc offset of the file data.
    pub offset: u64,
    /// File size in bytes.
    pub size: u64,
}

/// Parsed file system table.
#[derive(Debug)]
pub struct Fst {
    entries: Vec<FstEntry>,
    names: Vec<u8>,
}

impl Fst {
    /// Read and validate the FST of a disc image.
    ///
    /// Fails with [`Error::MalformedResource`] when the table is empty,
    /// implausibly large, or its root entry is not a directory.
    pub fn parse(source: &dyn ByteSource) -> Result<Self> {
        let fst_offset = read_be_u32(source, FST_OFFSET_FIELD)? as u64;
        let fst_size = read_be_u32(source, FST_SIZE_FIELD)?;
        if (fst_size as usize) < ENTRY_SIZE || fst_size > MAX_FST_SIZE {
            return Err(Error::MalformedResource("FST size out of range"));
        }

        let mut table = vec![0u8; fst_size as usize];
        source.read(fst_offset, &mut table)?;
        Self::from_bytes(&table)
    }

    /// Parse an FST already loaded into memory.
    pub fn from_bytes(table: &[u8]) -> Result<Self> {
        let root = parse_entry(table, 0)?;
        if !root.is_dir {
            return Err(Error::MalformedResource("FST root is not a directory"));
        }
        let count = root.size as usize;
        let names_start = count
            .checked_mul(ENTRY_SIZE)
            .filter(|&n| count > 0 && n <= table.len())
            .ok_or(Error::MalformedResource("FST entry count exceeds table"))?;

        let entries = (0..count)
            .map(|i| parse_entry(table, i))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            entries,
            names: table[names_start..].to_vec(),
        })
    }

    /// Number of entries, including the root.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Look up a file by `/`-separated path, comparing names without regard
    /// to ASCII case. Directories are never returned.
    pub fn find(&self, path: &str) -> Option<FileInfo> {
        let mut components = path.split('/').filter(|c| !c.is_empty()).peekable();
        let mut index = 1;
        let mut end = self.entries.len();

        while let Some(component) = components.next() {
            let is_last = components.peek().is_none();
            let found = self.find_in_dir(component, index, end)?;
            let entry = self.entries[found];
            match (entry.is_dir, is_last) {
                (false, true) => {
                    return Some(FileInfo {
                        offset: entry.offset as u64,
                        size: entry.size as u64,
                    });
                }
                (true, false) => {
                    index = found + 1;
                    end = entry.size as usize;
                }
                _ => return None,
            }
        }
        None
    }

    /// Index of the entry named `name` among the children in `index..end`.
    fn find_in_dir(&self, name: &str, mut index: usize, end: usize) -> Option<usize> {
        if end > self.entries.len() {
            return None;
        }
        while index < end {
            let entry = self.entries[index];
            if self.name(entry).eq_ignore_ascii_case(name.as_bytes()) {
                return Some(index);
            }
            index = if entry.is_dir {
                let next = entry.size as usize;
                // A directory must end after itself or the table is corrupt.
                if next <= index {
                    return None;
                }
                next
            } else {
                index + 1
            };
        }
        None
    }

    fn name(&self, entry: FstEntry) -> &[u8] {
        self.names
            .get(entry.name_offset as usize..)
            .map(until_nul)
            .unwrap_or_default()
    }
}

fn parse_entry(table: &[u8], index: usize) -> Result<FstEntry> {
    let base = index * ENTRY_SIZE;
    let flags = *table.get(base).ok_or(Error::InvalidRange)?;
    Ok(FstEntry {
        is_dir: flags & 1 != 0,
        name_offset: be_u24(table, base + 1)?,
        offset: be_u32(table, base + 4)?,
        size: be_u32(table, base + 8)?,
    })
}

/// Read up to `max_size` bytes of the file at `path`.
///
/// Returns an empty buffer when there is no file system, the file is
/// missing, or the read fails.
pub fn read_file(source: &dyn ByteSource, fst: Option<&Fst>, path: &str, max_size: usize) -> Vec<u8> {
    let Some(info) = fst.and_then(|fst| fst.find(path)) else {
        debug!("{path} not found on disc");
        return Vec::new();
    };
    let len = info.size.min(max_size as u64) as usize;
    let mut buf = vec![0u8; len];
    match source.read(info.offset, &mut buf) {
        Ok(()) => buf,
        Err(e) => {
            debug!("failed to read {path}: {e}");
            Vec::new()
        }
    }
}


#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::build::{Node, fst_bytes};
    use super::*;
    use crate::blob::PlainSource;

    fn sample() -> Fst {
        Fst::from_bytes(&fst_bytes(&[
            Node::Dir("audio", vec![Node::File("bgm.adp", 0x9000, 0x40)]),
            Node::File("boot.id", 0x8000, 0x34),
            Node::Dir("empty", vec![]),
            Node::File("opening.bnr", 0x8100, 0x1960),
        ]))
        .unwrap()
    }

    #[test]
    fn finds_root_and_nested_files() {
        let fst = sample();
        assert_eq!(fst.entry_count(), 6);
        assert_eq!(
            fst.find("opening.bnr"),
            Some(FileInfo { offset: 0x8100, size: 0x1960 })
        );
        assert_eq!(
            fst.find("/audio/bgm.adp"),
            Some(FileInfo { offset: 0x9000, size: 0x40 })
        );
    }

    #[test]
    fn lookup_ignores_ascii_case() {
        assert!(sample().find("OPENING.BNR").is_some());
    }

    #[test]
    fn directories_and_missing_paths_are_not_files() {
        let fst = sample();
        assert_eq!(fst.find("audio"), None);
        assert_eq!(fst.find("bgm.adp"), None);
        assert_eq!(fst.find("boot.id/x"), None);
        assert_eq!(fst.find("empty/anything"), None);
        assert_eq!(fst.find(""), None);
    }

    #[test]
    fn root_must_be_directory() {
        let mut table = fst_bytes(&[Node::File("a", 0, 0)]);
        table[0] = 0;
        assert!(matches!(
            Fst::from_bytes(&table),
            Err(Error::MalformedResource(_))
        ));
    }

    #[test]
    fn entry_count_must_fit() {
        let mut table = fst_bytes(&[Node::File("a", 0, 0)]);
        table[8..12].copy_from_slice(&1000u32.to_be_bytes());
        assert!(Fst::from_bytes(&table).is_err());
    }

    #[test]
    fn parse_from_disc_and_read_file() {
        let table = fst_bytes(&[Node::File("boot.id", 0x40, 8)]);
        let mut image = vec![0u8; 0x500];
        image[0x424..0x428].copy_from_slice(&0x440u32.to_be_bytes());
        image[0x428..0x42C].copy_from_slice(&(table.len() as u32).to_be_bytes());
        image[0x440..0x440 + table.len()].copy_from_slice(&table);
        image[0x40..0x48].copy_from_slice(b"ABCDEFGH");
        let src = PlainSource::new(Cursor::new(image)).unwrap();

        let fst = Fst::parse(&src).unwrap();
        assert_eq!(read_file(&src, Some(&fst), "boot.id", 0x100), b"ABCDEFGH");
        assert_eq!(read_file(&src, Some(&fst), "boot.id", 4), b"ABCD");
        assert!(read_file(&src, Some(&fst), "missing", 4).is_empty());
        assert!(read_file(&src, None, "boot.id", 4).is_empty());
    }

    #[test]
    fn zero_fst_size_is_rejected() {
        let src = PlainSource::new(Cursor::new(vec![0u8; 0x500])).unwrap();
        assert!(matches!(Fst::parse(&src), Err(Error::MalformedResource(_))));
    }
}
