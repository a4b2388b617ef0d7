//! Country, region and language enumerations.
//!
//! The disc header carries a one-byte country code at offset 0x03 (the last
//! character of the 4-character game code) and a big-endian `u32` region code
//! at 0x458. Both mappings here are total: unrecognised values become
//! `Unknown`, never an error.

/// Country a disc was released for, from the header byte at 0x03.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Country {
    /// Region free (`'A'`).
    World,
    Europe,
    Germany,
    France,
    Italy,
    Netherlands,
    Russia,
    Spain,
    Australia,
    Usa,
    Japan,
    Korea,
    Taiwan,
    /// Development kit discs (`'O'`).
    Sdk,
    Unknown,
}

impl Country {
    /// Map a raw country code byte.
    pub fn from_code(code: u8) -> Self {
        match code {
            b'A' => Self::World,
            // X/Y are multi-language PAL releases, L/M Japanese imports to PAL.
            b'P' | b'X' | b'Y' | b'L' | b'M' => Self::Europe,
            b'D' => Self::Germany,
            b'F' => Self::France,
            b'I' => Self::Italy,
            b'H' => Self::Netherlands,
            b'R' => Self::Russia,
            b'S' => Self::Spain,
            b'U' => Self::Australia,
            // N is a Japanese import to NTSC-U.
            b'E' | b'N' | b'Z' => Self::Usa,
            b'J' => Self::Japan,
            b'K' | b'Q' | b'T' => Self::Korea,
            b'W' => Self::Taiwan,
            b'O' => Self::Sdk,
            _ => Self::Unknown,
        }
    }

    /// The region a release for this country normally targets.
    pub fn typical_region(self) -> Region {
        match self {
            Self::Japan | Self::Taiwan => Region::NtscJ,
            Self::Usa => Region::NtscU,
            Self::Korea => Region::NtscK,
            Self::Europe
            | Self::Germany
            | Self::France
            | Self::Italy
            | Self::Netherlands
            | Self::Russia
            | Self::Spain
            | Self::Australia => Region::Pal,
            Self::World | Self::Sdk | Self::Unknown => Region::Unknown,
        }
    }
}

/// Console region lockout setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    NtscJ,
    NtscU,
    Pal,
    NtscK,
    Unknown,
}

impl Region {
    /// Map the `u32` region code stored at 0x458.
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => Self::NtscJ,
            1 => Self::NtscU,
            2 => Self::Pal,
            4 => Self::NtscK,
            _ => Self::Unknown,
        }
    }
}

/// Banner text language.
///
/// The ordering is significant only for map iteration; banner slots are
/// assigned through explicit tables, never through ordinal arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Language {
    Japanese,
    English,
    German,
    French,
    Spanish,
    Italian,
    Dutch,
    SimplifiedChinese,
    TraditionalChinese,
    Korean,
    Unknown,
}
