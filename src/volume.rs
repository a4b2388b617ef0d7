//! GameCube disc volume - fixed-offset header fields, banner and sync hash.
//!
//! ## Disc header fields read here
//! ```text
//! [0x0000] Game code + maker code              (6 bytes ASCII)
//! [0x0003]   Country code (last game code char) (1 byte)
//! [0x0004]   Maker code                         (2 bytes ASCII)
//! [0x0006] Disc number                         (u8)
//! [0x0007] Revision                            (u8)
//! [0x0020] Internal name                       (0x60 bytes)
//! [0x0428] FST size                            (u32 BE)
//! [0x0458] Region code                         (u32 BE)
//! [0x2440] Apploader build date                (0x10 bytes, "YYYY/MM/DD")
//! ```
//!
//! ## Fallback policy
//! No accessor fails. A missing source or failed read yields the field's
//! fallback: `""`, `0`, `false`, [`Country::Unknown`], the empty
//! [`ConvertedBanner`], or [`NO_UID`] for [`Volume::unique_id`] when the base
//! code itself cannot be read. Partial results are only produced by
//! `unique_id`, which degrades to the bare base code when `boot.id` is
//! unusable.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

use log::warn;

use crate::blob::{BlobType, ByteSource, PlainSource};
use crate::formats::banner::{BANNER_PATH, BNR2_SIZE, ConvertedBanner};
use crate::formats::fst::{FST_SIZE_FIELD, Fst, read_file};
use crate::region::{Country, Language, Region};
use crate::sync_hash::{ContentSelector, GamePartition, SyncHash, SyncHasher, sync_hash};
use crate::text::StringDecoder;
use crate::utils::{read_array, read_be_u32, until_nul};
use crate::{Error, Result};

/// Returned by [`Volume::unique_id`] when the game code cannot be read.
pub const NO_UID: &str = "NO_UID";

/// Path of the arcade boot identifier file.
pub const BOOT_ID_PATH: &str = "boot.id";
const BOOT_ID_SIZE: usize = 0x34;
const BOOT_ID_CODE: usize = 0x30;
/// `GGGGMM-CCCC`
const UNIQUE_ID_MAX_LEN: usize = 11;

const REGION_FIELD: u64 = 0x458;
const NAME_OFFSET: u64 = 0x20;
const NAME_SIZE: usize = 0x60;
const APPLOADER_DATE_OFFSET: u64 = 0x2440;
const APPLOADER_DATE_LEN: usize = 10;

/// Read-only view over a GameCube disc image.
///
/// Owns its byte source. The file system and the decoded banner are computed
/// on first use and cached for the lifetime of the volume; concurrent first
/// access computes each of them once.
pub struct Volume {
    source: Option<Box<dyn ByteSource>>,
    file_system: OnceLock<Option<Fst>>,
    banner: OnceLock<ConvertedBanner>,
}

impl Volume {
    /// Take ownership of `source`.
    pub fn new<S: ByteSource + 'static>(source: S) -> Self {
        Self::from_boxed(Some(Box::new(source)))
    }

    /// A volume with no backing source. Every accessor returns its fallback.
    pub fn detached() -> Self {
        Self::from_boxed(None)
    }

    fn from_boxed(source: Option<Box<dyn ByteSource>>) -> Self {
        Self {
            source,
            file_system: OnceLock::new(),
            banner: OnceLock::new(),
        }
    }

    /// Open a raw image from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(PlainSource::open(path)?))
    }

    /// The backing byte source, if any.
    pub fn source(&self) -> Option<&dyn ByteSource> {
        self.source.as_deref()
    }

    /// Fill `buf` from the disc at `offset`.
    pub fn read(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        self.source().ok_or(Error::MissingSource)?.read(offset, buf)
    }

    fn read_array<const N: usize>(&self, offset: u64) -> Result<[u8; N]> {
        read_array::<N>(self.source().ok_or(Error::MissingSource)?, offset)
    }

    fn read_u8(&self, offset: u64) -> Option<u8> {
        self.read_array::<1>(offset).ok().map(|[b]| b)
    }

    /// ASCII field of `N` bytes, cut at the first null.
    fn read_ascii<const N: usize>(&self, offset: u64) -> Option<String> {
        let raw = self.read_array::<N>(offset).ok()?;
        Some(String::from_utf8_lossy(until_nul(&raw)).into_owned())
    }

    /// The cached file system, parsed on first use.
    pub fn file_system(&self) -> Option<&Fst> {
        self.file_system
            .get_or_init(|| {
                let source = self.source()?;
                Fst::parse(source)
                    .inspect_err(|e| warn!("invalid file system: {e}"))
                    .ok()
            })
            .as_ref()
    }

    /// Game code followed by maker code, e.g. `GALE01`. `""` on failure.
    pub fn game_id(&self) -> String {
        self.read_ascii::<6>(0).unwrap_or_default()
    }

    /// Game ID, extended with the arcade `boot.id` code when one is present:
    /// `GALE01` or `GGPE01-AAAB`.
    ///
    /// Returns [`NO_UID`] if the game ID cannot be read.
    pub fn unique_id(&self) -> String {
        self.unique_id_with(self.file_system())
    }

    /// [`Volume::unique_id`] with an explicit file system for the `boot.id`
    /// lookup.
    pub fn unique_id_with(&self, fs: Option<&Fst>) -> String {
        let base = match self.read_array::<6>(0) {
            Ok(base) => base,
            Err(e) => {
                warn!("failed to read unique ID from disc image: {e}");
                return NO_UID.to_owned();
            }
        };
        let mut id = until_nul(&base).to_vec();
        if let Some(code) = self.source().and_then(|s| boot_id_code(s, fs)) {
            id.push(b'-');
            id.extend_from_slice(&code);
            id.truncate(UNIQUE_ID_MAX_LEN);
        }
        String::from_utf8_lossy(&id).into_owned()
    }

    /// [`Volume::unique_id`] followed by `r` and the revision, e.g. `GALE01r2`.
    pub fn revision_specific_unique_id(&self) -> String {
        format!("{}r{}", self.unique_id(), self.revision())
    }

    /// Country from the header byte at 0x03.
    pub fn country(&self) -> Country {
        self.read_u8(3).map_or(Country::Unknown, Country::from_code)
    }

    /// Region from the code at 0x458, or the country's typical region when
    /// that is unreadable or unknown.
    pub fn region(&self) -> Region {
        let region = self
            .source()
            .and_then(|s| read_be_u32(s, REGION_FIELD).ok())
            .map_or(Region::Unknown, Region::from_code);
        if region == Region::Unknown {
            self.country().typical_region()
        } else {
            region
        }
    }

    /// Two-character maker code, e.g. `01`. `""` on failure.
    pub fn maker_id(&self) -> String {
        self.read_ascii::<2>(4).unwrap_or_default()
    }

    /// Zero-based disc number. `0` on failure.
    pub fn disc_number(&self) -> u8 {
        self.read_u8(6).unwrap_or(0)
    }

    /// Whether this is the second disc of a multi-disc game.
    pub fn is_disc_two(&self) -> bool {
        self.disc_number() != 0
    }

    /// Revision number. `0` on failure.
    pub fn revision(&self) -> u8 {
        self.read_u8(7).unwrap_or(0)
    }

    /// Internal name from the disc header, decoded in the country's charset.
    /// `""` on failure.
    pub fn internal_name(&self) -> String {
        self.read_array::<NAME_SIZE>(NAME_OFFSET)
            .map(|raw| StringDecoder::for_country(self.country()).decode(&raw))
            .unwrap_or_default()
    }

    /// The internal name as a list: empty when it cannot be read.
    pub fn names(&self) -> Vec<String> {
        match self.read_array::<NAME_SIZE>(NAME_OFFSET) {
            Ok(raw) => vec![StringDecoder::for_country(self.country()).decode(&raw)],
            Err(_) => Vec::new(),
        }
    }

    /// Size of the file system table in bytes. `0` on failure.
    pub fn fst_size(&self) -> u32 {
        self.source()
            .and_then(|s| read_be_u32(s, FST_SIZE_FIELD).ok())
            .unwrap_or(0)
    }

    /// Apploader build date, e.g. `2001/11/14`. `""` on failure.
    pub fn apploader_date(&self) -> String {
        self.read_array::<0x10>(APPLOADER_DATE_OFFSET)
            .map(|raw| String::from_utf8_lossy(until_nul(&raw[..APPLOADER_DATE_LEN])).into_owned())
            .unwrap_or_default()
    }

    /// Logical image size. `0` without a source.
    pub fn size(&self) -> u64 {
        self.source().map_or(0, |s| s.data_size())
    }

    /// Container size on the host. `0` without a source.
    pub fn raw_size(&self) -> u64 {
        self.source().map_or(0, |s| s.raw_size())
    }

    /// Whether [`Volume::size`] is exact. `false` without a source.
    pub fn is_size_accurate(&self) -> bool {
        self.source().is_some_and(|s| s.is_data_size_accurate())
    }

    /// Container format of the source. `None` without a source.
    pub fn blob_type(&self) -> Option<BlobType> {
        self.source().map(|s| s.blob_type())
    }

    /// The decoded `opening.bnr`, parsed on first use.
    ///
    /// The empty banner is returned (and cached) when the file is missing,
    /// truncated or malformed.
    pub fn banner(&self) -> &ConvertedBanner {
        self.banner.get_or_init(|| self.load_banner())
    }

    fn load_banner(&self) -> ConvertedBanner {
        let Some(source) = self.source() else {
            return ConvertedBanner::default();
        };
        let data = read_file(source, self.file_system(), BANNER_PATH, BNR2_SIZE);
        if data.len() < 4 {
            warn!("could not read {BANNER_PATH}");
            return ConvertedBanner::default();
        }
        let decoder = StringDecoder::for_country(self.country());
        ConvertedBanner::parse(&data, self.region(), decoder).unwrap_or_else(|e| {
            warn!(
                "invalid {BANNER_PATH}: {e} (type {:02x?}, size {:#x})",
                &data[..4],
                data.len()
            );
            ConvertedBanner::default()
        })
    }

    /// Banner short titles by language.
    pub fn short_names(&self) -> &BTreeMap<Language, String> {
        &self.banner().short_names
    }

    /// Banner full titles by language.
    pub fn long_names(&self) -> &BTreeMap<Language, String> {
        &self.banner().long_names
    }

    /// Banner short publisher names by language.
    pub fn short_makers(&self) -> &BTreeMap<Language, String> {
        &self.banner().short_makers
    }

    /// Banner full publisher names by language.
    pub fn long_makers(&self) -> &BTreeMap<Language, String> {
        &self.banner().long_makers
    }

    /// Banner descriptions by language.
    pub fn descriptions(&self) -> &BTreeMap<Language, String> {
        &self.banner().descriptions
    }

    /// Banner image as `(width, height, rgba8 pixels)`. `(0, 0, [])` when
    /// there is no valid banner.
    pub fn banner_image(&self) -> (u32, u32, &[u8]) {
        let banner = self.banner();
        (banner.width, banner.height, banner.pixels.as_slice())
    }

    /// Sync hash over the standard game content ranges.
    pub fn sync_hash(&self) -> SyncHash {
        self.sync_hash_with(&GamePartition)
    }

    /// Sync hash over the ranges `selector` chooses.
    ///
    /// Without a source this is the digest of no input.
    pub fn sync_hash_with(&self, selector: &dyn ContentSelector) -> SyncHash {
        match self.source() {
            Some(source) => sync_hash(source, selector),
            None => SyncHasher::new().finish(),
        }
    }
}

/// The four-character code from `boot.id`, if the file exists and the code is
/// all `A-Z` / `0-9`.
fn boot_id_code(source: &dyn ByteSource, fs: Option<&Fst>) -> Option<[u8; 4]> {
    let boot_id = read_file(source, fs, BOOT_ID_PATH, BOOT_ID_SIZE);
    if boot_id.len() != BOOT_ID_SIZE {
        return None;
    }
    let mut code = [0u8; 4];
    code.copy_from_slice(&boot_id[BOOT_ID_CODE..BOOT_ID_CODE + 4]);
    code.iter()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        .then_some(code)
}

impl std::fmt::Debug for Volume {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Volume")
            .field("blob_type", &self.blob_type())
            .field("size", &self.size())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn volume(image: Vec<u8>) -> Volume {
        Volume::new(PlainSource::new(Cursor::new(image)).unwrap())
    }

    fn header() -> Vec<u8> {
        let mut image = vec![0u8; 0x2460];
        image[..6].copy_from_slice(b"GALE01");
        image[7] = 2;
        image[0x20..0x37].copy_from_slice(b"Super Smash Bros. Melee");
        image[0x428..0x42C].copy_from_slice(&0x1234u32.to_be_bytes());
        image[0x458..0x45C].copy_from_slice(&1u32.to_be_bytes());
        image[0x2440..0x2450].copy_from_slice(b"2001/11/14\0\0\0\0\0\0");
        image
    }

    #[test]
    fn header_fields() {
        let v = volume(header());
        assert_eq!(v.game_id(), "GALE01");
        assert_eq!(v.maker_id(), "01");
        assert_eq!(v.country(), Country::Usa);
        assert_eq!(v.region(), Region::NtscU);
        assert_eq!(v.revision(), 2);
        assert_eq!(v.disc_number(), 0);
        assert!(!v.is_disc_two());
        assert_eq!(v.internal_name(), "Super Smash Bros. Melee");
        assert_eq!(v.names(), ["Super Smash Bros. Melee"]);
        assert_eq!(v.fst_size(), 0x1234);
        assert_eq!(v.apploader_date(), "2001/11/14");
        assert_eq!(v.size(), 0x2460);
        assert!(v.is_size_accurate());
        assert_eq!(v.blob_type(), Some(BlobType::Plain));
    }

    #[test]
    fn apploader_date_is_cut_at_ten_characters() {
        let mut image = header();
        image[0x2440..0x2450].copy_from_slice(b"2001/11/14XXXXXX");
        assert_eq!(volume(image).apploader_date(), "2001/11/14");
    }

    #[test]
    fn unknown_region_code_falls_back_to_country() {
        let mut image = header();
        image[3] = b'P';
        image[0x458..0x45C].copy_from_slice(&9u32.to_be_bytes());
        assert_eq!(volume(image).region(), Region::Pal);
    }

    #[test]
    fn without_file_system_unique_id_is_base_code() {
        let v = volume(header());
        assert!(v.file_system().is_none());
        assert_eq!(v.unique_id(), "GALE01");
        assert_eq!(v.revision_specific_unique_id(), "GALE01r2");
    }

    #[test]
    fn detached_volume_returns_fallbacks() {
        let v = Volume::detached();
        assert_eq!(v.unique_id(), NO_UID);
        assert_eq!(v.revision_specific_unique_id(), "NO_UIDr0");
        assert_eq!(v.game_id(), "");
        assert_eq!(v.maker_id(), "");
        assert_eq!(v.country(), Country::Unknown);
        assert_eq!(v.region(), Region::Unknown);
        assert_eq!(v.revision(), 0);
        assert_eq!(v.internal_name(), "");
        assert!(v.names().is_empty());
        assert_eq!(v.fst_size(), 0);
        assert_eq!(v.apploader_date(), "");
        assert_eq!((v.size(), v.raw_size()), (0, 0));
        assert!(!v.is_size_accurate());
        assert_eq!(v.blob_type(), None);
        assert!(v.banner().is_empty());
        assert_eq!(v.banner_image(), (0, 0, &[][..]));
        assert!(matches!(v.read(0, &mut [0u8; 1]), Err(Error::MissingSource)));
    }

    #[test]
    fn truncated_image_returns_fallbacks() {
        let v = volume(b"GAL".to_vec());
        assert_eq!(v.unique_id(), NO_UID);
        assert_eq!(v.game_id(), "");
        // The country byte is past the end too.
        assert_eq!(v.country(), Country::Unknown);
        assert_eq!(v.fst_size(), 0);
        assert!(v.short_names().is_empty());
        assert_eq!(v.size(), 3);
    }

    #[test]
    fn banner_is_cached() {
        let v = volume(header());
        let first: *const ConvertedBanner = v.banner();
        let second: *const ConvertedBanner = v.banner();
        assert_eq!(first, second);
        assert!(v.banner().is_empty());
    }
}
