//! Tileset image decoding and color-key transparency.

use macroquad::texture::Image;

use crate::error::MapError;

/// Decodes encoded image bytes into an RGBA8 [`Image`].
pub trait ImageDecoder {
    /// On failure returns a human readable reason; the loader adds the path.
    fn decode(&self, bytes: &[u8]) -> Result<Image, String>;
}

/// Decoder backed by macroquad's bundled image codecs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MacroquadDecoder;

impl ImageDecoder for MacroquadDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Image, String> {
        Image::from_file_with_format(bytes, None).map_err(|e| e.to_string())
    }
}

/// Parses `#RRGGBB` (the `#` is optional) into an opaque RGBA color.
pub fn parse_hex_color(hex: &str) -> Result<[u8; 4], MapError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(MapError::InvalidColor(hex.to_owned()));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| MapError::InvalidColor(hex.to_owned()))
    };
    Ok([channel(0)?, channel(2)?, channel(4)?, 0xFF])
}

/// Replaces every pixel exactly equal to `key` (all four channels) with
/// fully transparent black. Returns how many pixels were replaced.
pub fn strip_color(image: &mut Image, key: [u8; 4]) -> usize {
    let mut replaced = 0;
    for px in image.bytes.chunks_exact_mut(4) {
        if px[..] == key[..] {
            px.copy_from_slice(&[0, 0, 0, 0]);
            replaced += 1;
        }
    }
    replaced
}
