//! Legacy text decoding for disc header and banner strings.
//!
//! Japanese and Taiwanese releases store text as Shift-JIS; every other
//! release uses Windows-1252. Fields are fixed-width and null-padded, so
//! decoding always stops at the first null byte.

use encoding_rs::{Encoding, SHIFT_JIS, WINDOWS_1252};
use log::debug;

use crate::region::Country;
use crate::utils::until_nul;
use crate::{Error, Result};

/// One of the two legacy charsets used on disc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringDecoder {
    ShiftJis,
    Windows1252,
}

impl StringDecoder {
    /// Pick the decoder for a disc released in `country`.
    pub fn for_country(country: Country) -> Self {
        match country {
            Country::Japan | Country::Taiwan => Self::ShiftJis,
            _ => Self::Windows1252,
        }
    }

    fn encoding(self) -> &'static Encoding {
        match self {
            Self::ShiftJis => SHIFT_JIS,
            Self::Windows1252 => WINDOWS_1252,
        }
    }

    /// Decode a null-padded field, replacing malformed sequences with U+FFFD.
    ///
    /// Never fails. Fallbacks are logged at debug level.
    pub fn decode(self, field: &[u8]) -> String {
        match self.decode_strict(field) {
            Ok(s) => s,
            Err(_) => {
                debug!("{:?} field did not decode cleanly, using replacement characters", self);
                let (s, _) = self.encoding().decode_without_bom_handling(until_nul(field));
                s.into_owned()
            }
        }
    }

    /// Decode a null-padded field, failing with [`Error::EncodingFallback`]
    /// on any malformed sequence.
    pub fn decode_strict(self, field: &[u8]) -> Result<String> {
        self.encoding()
            .decode_without_bom_handling_and_without_replacement(until_nul(field))
            .map(|s| s.into_owned())
            .ok_or(Error::EncodingFallback)
    }
}
