//! RGB5A3 texture decoding.
//!
//! Each pixel is a big-endian `u16`. Bit 15 selects the layout; set means
//! opaque:
//!
//! ```text
//! 1 RRRRR GGGGG BBBBB     opaque RGB555
//! 0 AAA RRRR GGGG BBBB    ARGB3444
//! ```
//!
//! Pixels are stored in 4×4 tiles, tiles in row-major order. Translucent
//! pixels are composited over black, so colour channels come out
//! premultiplied by alpha.

use crate::utils::be_u16;
use crate::{Error, Result};

/// Tile edge length in pixels.
const TILE: usize = 4;

#[inline]
fn expand3(v: u16) -> u8 {
    let v = v as u8;
    (v << 5) | (v << 2) | (v >> 1)
}

#[inline]
fn expand4(v: u16) -> u8 {
    let v = v as u8;
    (v << 4) | v
}

#[inline]
fn expand5(v: u16) -> u8 {
    let v = v as u8;
    (v << 3) | (v >> 2)
}

/// Decode one RGB5A3 value into `[r, g, b, a]`.
pub fn decode_rgb5a3(val: u16) -> [u8; 4] {
    if val & 0x8000 != 0 {
        [
            expand5((val >> 10) & 0x1F),
            expand5((val >> 5) & 0x1F),
            expand5(val & 0x1F),
            0xFF,
        ]
    } else {
        let a = expand3((val >> 12) & 0x7);
        let over_black = |c: u8| (c as u32 * a as u32 / 255) as u8;
        [
            over_black(expand4((val >> 8) & 0xF)),
            over_black(expand4((val >> 4) & 0xF)),
            over_black(expand4(val & 0xF)),
            a,
        ]
    }
}

/// Decode a tiled RGB5A3 image into a row-major RGBA8 buffer.
///
/// `width` and `height` must be multiples of 4 and `src` must hold at least
/// `width * height` pixels; otherwise [`Error::InvalidRange`] is returned.
pub fn decode_rgb5a3_image(src: &[u8], width: usize, height: usize) -> Result<Vec<u8>> {
    if width % TILE != 0 || height % TILE != 0 {
        return Err(Error::InvalidRange);
    }
    let mut out = vec![0u8; width * height * 4];
    let mut pos = 0;
    for ty in (0..height).step_by(TILE) {
        for tx in (0..width).step_by(TILE) {
            for iy in 0..TILE {
                for ix in 0..TILE {
                    let rgba = decode_rgb5a3(be_u16(src, pos)?);
                    pos += 2;
                    let dst = ((ty + iy) * width + tx + ix) * 4;
                    out[dst..dst + 4].copy_from_slice(&rgba);
                }
            }
        }
    }
    Ok(out)
}
