//! BNR (`opening.bnr`) - disc banner with icon image and localized titles.
//!
//! Two variants exist. `BNR1` (NTSC) carries one language block; `BNR2`
//! (PAL) carries six. The magic and the exact file length must agree or the
//! banner is rejected.
//!
//! ## Layout
//! ```text
//! [0x0000] Magic "BNR1" / "BNR2"               (4 bytes)
//! [0x0004] Padding                             (0x1C bytes)
//! [0x0020] Image, 96×32 RGB5A3, 4×4 tiles      (0x1800 bytes)
//! [0x1820] Language blocks                     (1 or 6 × 0x140 bytes)
//! ```
//!
//! ## Language block (0x140 bytes)
//! ```text
//! [0x000] Short name    (0x20 bytes)
//! [0x020] Short maker   (0x20 bytes)
//! [0x040] Long name     (0x40 bytes)
//! [0x080] Long maker    (0x40 bytes)
//! [0x0C0] Description   (0x80 bytes)
//! ```
//! All text fields are null-padded, Shift-JIS or Windows-1252 depending on
//! the disc's country.
//!
//! ## Language slots
//! | Variant | Slots |
//! |---------|-------|
//! | BNR1 | Japanese on NTSC-J discs, English otherwise |
//! | BNR2 | English, German, French, Spanish, Italian, Dutch |

use std::collections::BTreeMap;

use crate::image::decode_rgb5a3_image;
use crate::region::{Language, Region};
use crate::text::StringDecoder;
use crate::{Error, Result};

/// Path of the banner file on disc.
pub const BANNER_PATH: &str = "opening.bnr";

/// Banner image width in pixels.
pub const BANNER_WIDTH: u32 = 96;
/// Banner image height in pixels.
pub const BANNER_HEIGHT: u32 = 32;

const IMAGE_OFFSET: usize = 0x20;
const IMAGE_SIZE: usize = (BANNER_WIDTH * BANNER_HEIGHT * 2) as usize;
const INFO_OFFSET: usize = IMAGE_OFFSET + IMAGE_SIZE;
const INFO_SIZE: usize = 0x140;

/// Exact length of a `BNR1` file.
pub const BNR1_SIZE: usize = INFO_OFFSET + INFO_SIZE;
/// Exact length of a `BNR2` file.
pub const BNR2_SIZE: usize = INFO_OFFSET + INFO_SIZE * 6;

const PAL_SLOTS: [Language; 6] = [
    Language::English,
    Language::German,
    Language::French,
    Language::Spanish,
    Language::Italian,
    Language::Dutch,
];

/// Banner variant, selected by magic and length together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    /// One language block.
    Bnr1,
    /// Six language blocks.
    Bnr2,
}

impl BannerKind {
    /// Identify the variant of `data`.
    ///
    /// Fails with [`Error::MalformedResource`] unless the magic and the
    /// length match one of the two accepted combinations.
    pub fn detect(data: &[u8]) -> Result<Self> {
        match (data.get(..4), data.len()) {
            (Some(b"BNR1"), BNR1_SIZE) => Ok(Self::Bnr1),
            (Some(b"BNR2"), BNR2_SIZE) => Ok(Self::Bnr2),
            (None, _) => Err(Error::MalformedResource("banner shorter than its magic")),
            _ => Err(Error::MalformedResource("banner magic and size disagree")),
        }
    }

    /// Languages assigned to each language block, in file order.
    pub fn slots(self, region: Region) -> &'static [Language] {
        match self {
            Self::Bnr1 if region == Region::NtscJ => &[Language::Japanese],
            Self::Bnr1 => &[Language::English],
            Self::Bnr2 => &PAL_SLOTS,
        }
    }
}

/// Decoded banner.
///
/// [`ConvertedBanner::default`] is the empty banner: no image and no text.
/// A language appears in a map only when its text is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertedBanner {
    /// Image width in pixels (0 for the empty banner).
    pub width: u32,
    /// Image height in pixels (0 for the empty banner).
    pub height: u32,
    /// Row-major RGBA8 pixels.
    pub pixels: Vec<u8>,
    /// Short title (0x20-byte field).
    pub short_names: BTreeMap<Language, String>,
    /// Short publisher name (0x20-byte field).
    pub short_makers: BTreeMap<Language, String>,
    /// Full title (0x40-byte field).
    pub long_names: BTreeMap<Language, String>,
    /// Full publisher name (0x40-byte field).
    pub long_makers: BTreeMap<Language, String>,
    /// Description (0x80-byte field).
    pub descriptions: BTreeMap<Language, String>,
}

impl ConvertedBanner {
    /// Validate and decode a banner file.
    ///
    /// `region` picks the language of a `BNR1` block and `decoder` the
    /// charset of every text field.
    pub fn parse(data: &[u8], region: Region, decoder: StringDecoder) -> Result<Self> {
        let kind = BannerKind::detect(data)?;
        let pixels = decode_rgb5a3_image(
            &data[IMAGE_OFFSET..INFO_OFFSET],
            BANNER_WIDTH as usize,
            BANNER_HEIGHT as usize,
        )?;

        let mut banner = Self {
            width: BANNER_WIDTH,
            height: BANNER_HEIGHT,
            pixels,
            ..Self::default()
        };

        for (i, &language) in kind.slots(region).iter().enumerate() {
            let block = &data[INFO_OFFSET + i * INFO_SIZE..INFO_OFFSET + (i + 1) * INFO_SIZE];
            let fields = [
                (&mut banner.short_names, 0x00..0x20),
                (&mut banner.short_makers, 0x20..0x40),
                (&mut banner.long_names, 0x40..0x80),
                (&mut banner.long_makers, 0x80..0xC0),
                (&mut banner.descriptions, 0xC0..0x140),
            ];
            for (map, range) in fields {
                let text = decoder.decode(&block[range]);
                if !text.is_empty() {
                    map.insert(language, text);
                }
            }
        }

        Ok(banner)
    }

    /// Whether this is the empty banner.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

/// Builds banner files for tests.
#[cfg(test)]
pub(crate) mod build {
    use super::*;

    /// Text for one language block: short name, short maker, long name,
    /// long maker, description.
    pub type Block<'a> = [&'a [u8]; 5];

    /// Serialise a banner with an all-opaque-black image.
    pub fn banner_bytes(magic: &[u8; 4], blocks: &[Block<'_>]) -> Vec<u8> {
        let mut out = vec![0u8; INFO_OFFSET + blocks.len() * INFO_SIZE];
        out[..4].copy_from_slice(magic);
        for px in out[IMAGE_OFFSET..INFO_OFFSET].chunks_exact_mut(2) {
            px.copy_from_slice(&0x8000u16.to_be_bytes());
        }
        let starts = [0x00, 0x20, 0x40, 0x80, 0xC0];
        for (i, block) in blocks.iter().enumerate() {
            let base = INFO_OFFSET + i * INFO_SIZE;
            for (text, start) in block.iter().zip(starts) {
                out[base + start..base + start + text.len()].copy_from_slice(text);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::build::{Block, banner_bytes};
    use super::*;

    const MELEE: Block<'static> = [
        b"SUPER SMASH BROS.",
        b"Nintendo",
        b"Super Smash Bros. Melee",
        b"Nintendo / HAL Laboratory",
        b"",
    ];

    #[test]
    fn sizes() {
        assert_eq!(BNR1_SIZE, 0x1960);
        assert_eq!(BNR2_SIZE, 0x1FA0);
    }

    #[test]
    fn bnr1_outside_japan_is_english() {
        let data = banner_bytes(b"BNR1", &[MELEE]);
        let banner = ConvertedBanner::parse(&data, Region::NtscU, StringDecoder::Windows1252).unwrap();

        assert_eq!(banner.width, 96);
        assert_eq!(banner.height, 32);
        assert_eq!(banner.pixels.len(), 96 * 32 * 4);
        assert_eq!(&banner.pixels[..4], &[0, 0, 0, 0xFF]);

        assert_eq!(banner.short_names.len(), 1);
        assert_eq!(banner.short_names[&Language::English], "SUPER SMASH BROS.");
        assert_eq!(banner.short_makers[&Language::English], "Nintendo");
        assert_eq!(banner.long_names[&Language::English], "Super Smash Bros. Melee");
        assert_eq!(banner.long_makers[&Language::English], "Nintendo / HAL Laboratory");
        // Empty fields are omitted, not stored as "".
        assert!(banner.descriptions.is_empty());
    }

    #[test]
    fn bnr1_in_japan_is_japanese() {
        let block: Block<'_> = [b"MARIO", b"", b"", b"", b""];
        let data = banner_bytes(b"BNR1", &[block]);
        let banner = ConvertedBanner::parse(&data, Region::NtscJ, StringDecoder::ShiftJis).unwrap();
        assert_eq!(
            banner.short_names.keys().copied().collect::<Vec<_>>(),
            [Language::Japanese]
        );
        assert_eq!(banner.short_names[&Language::Japanese], "MARIO");
    }

    #[test]
    fn bnr2_has_six_languages_from_english() {
        let blocks = [MELEE; 6];
        let data = banner_bytes(b"BNR2", &blocks);
        let banner = ConvertedBanner::parse(&data, Region::Pal, StringDecoder::Windows1252).unwrap();
        assert_eq!(
            banner.long_names.keys().copied().collect::<Vec<_>>(),
            PAL_SLOTS
        );
    }

    #[test]
    fn bnr2_empty_block_is_skipped() {
        let mut blocks = [MELEE; 6];
        blocks[2] = [b"".as_slice(); 5];
        let data = banner_bytes(b"BNR2", &blocks);
        let banner = ConvertedBanner::parse(&data, Region::Pal, StringDecoder::Windows1252).unwrap();
        assert_eq!(banner.short_names.len(), 5);
        assert!(!banner.short_names.contains_key(&Language::French));
    }

    #[test]
    fn magic_and_size_must_agree() {
        let bnr1 = banner_bytes(b"BNR1", &[MELEE]);
        let bnr2 = banner_bytes(b"BNR2", &[MELEE; 6]);
        let mut swapped1 = bnr1.clone();
        swapped1[..4].copy_from_slice(b"BNR2");
        let mut swapped2 = bnr2.clone();
        swapped2[..4].copy_from_slice(b"BNR1");

        for data in [&swapped1, &swapped2, &bnr1[..0x100].to_vec(), &b"BN".to_vec()] {
            assert!(matches!(
                ConvertedBanner::parse(data, Region::NtscU, StringDecoder::Windows1252),
                Err(Error::MalformedResource(_))
            ));
        }
        let mut bad_magic = bnr1.clone();
        bad_magic[..4].copy_from_slice(b"XXXX");
        assert!(BannerKind::detect(&bad_magic).is_err());
    }

    #[test]
    fn default_is_empty() {
        let banner = ConvertedBanner::default();
        assert!(banner.is_empty());
        assert_eq!((banner.width, banner.height), (0, 0));
        assert!(banner.descriptions.is_empty() && banner.long_makers.is_empty());
    }
}
