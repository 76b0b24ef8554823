//! Mapping between container bytes and a square RGB pixel grid
//!
//! Every pixel carries three consecutive container bytes in its R, G and B
//! channels. Pixels are laid out row-major, left to right and top to bottom,
//! so reading the raster's interleaved channel buffer back front to back
//! yields the container unchanged, followed by zero padding.

use crate::constants::CHANNEL_COUNT;
use crate::error::PackError;
use bytes::Bytes;
use image::{Rgb, RgbImage};

/// Number of pixels needed to hold `byte_count` bytes
pub fn pixel_count(byte_count: usize) -> usize {
    byte_count.div_ceil(CHANNEL_COUNT)
}

/// Side length of the smallest square grid that holds `byte_count` bytes
pub fn grid_side(byte_count: usize) -> usize {
    let pixels = pixel_count(byte_count);

    // Float estimate, corrected so that side² >= pixels > (side - 1)²
    let mut side = (pixels as f64).sqrt() as usize;
    while side * side < pixels {
        side += 1;
    }
    while side > 0 && (side - 1) * (side - 1) >= pixels {
        side -= 1;
    }
    side
}

/// Packed 24-bit value of a pixel: `r << 16 | g << 8 | b`
pub fn pixel_value(pixel: &Rgb<u8>) -> u32 {
    let [r, g, b] = pixel.0;
    (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// Split a packed 24-bit value back into a pixel, most significant byte first
pub fn pixel_from_value(value: u32) -> Rgb<u8> {
    Rgb([(value >> 16) as u8, (value >> 8) as u8, value as u8])
}

/// Lay a byte stream out on the smallest square grid that holds it.
///
/// The final pixel is zero-padded in its missing low channels; pixels past
/// the content stay all-zero.
pub fn pack(bytes: &[u8]) -> Result<RgbImage, PackError> {
    let side = grid_side(bytes.len());
    let dim = u32::try_from(side)
        .map_err(|_| PackError::InvalidRaster(format!("grid side {} exceeds u32", side)))?;

    let mut raw = vec![0u8; side * side * CHANNEL_COUNT];
    raw[..bytes.len()].copy_from_slice(bytes);

    RgbImage::from_raw(dim, dim, raw)
        .ok_or_else(|| PackError::InvalidRaster(format!("{}x{} buffer mismatch", dim, dim)))
}

/// Read a raster's pixels back into a byte stream, row-major, R then G then B.
///
/// The result includes the zero padding; the container decoder stops at
/// the end-of-data marker before reaching it.
pub fn unpack(raster: RgbImage) -> Bytes {
    Bytes::from(raster.into_raw())
}
