//! Background color parsing, formatting and average-color extraction.
//!
//! Colors are entered as hex strings. Accepted forms are `#rgb`, `#rgba`,
//! `#rrggbb` and `#rrggbbaa`, case-insensitive. The alpha component of the
//! four- and eight-digit forms is ignored because canvases are opaque RGB.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::decode::{decode_file, DecodeError, DecodedImage};
use crate::error::ValidationError;

/// An opaque RGB color used as rotation fill and canvas background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BackgroundColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl BackgroundColor {
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const BLACK: Self = Self::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Format as lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Default for BackgroundColor {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for BackgroundColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for BackgroundColor {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_background_color(s)
    }
}

/// Parse a background color string from the form.
///
/// The `#` prefix is checked first so a bare `00ff00` reports the missing
/// prefix rather than a generic format error.
pub fn parse_background_color(input: &str) -> Result<BackgroundColor, ValidationError> {
    let Some(body) = input.strip_prefix('#') else {
        return Err(ValidationError::MissingHashPrefix(input.to_string()));
    };

    let invalid = || ValidationError::InvalidHexColor(input.to_string());

    if !body.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let digits: Vec<u8> = body.bytes().map(hex_value).collect();
    match digits.len() {
        // #rgb / #rgba: each digit is doubled (0xf -> 0xff)
        3 | 4 => Ok(BackgroundColor::new(
            digits[0] * 17,
            digits[1] * 17,
            digits[2] * 17,
        )),
        // #rrggbb / #rrggbbaa
        6 | 8 => Ok(BackgroundColor::new(
            (digits[0] << 4) | digits[1],
            (digits[2] << 4) | digits[3],
            (digits[4] << 4) | digits[5],
        )),
        _ => Err(invalid()),
    }
}

#[inline]
fn hex_value(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        b'A'..=b'F' => b - b'A' + 10,
        _ => 0,
    }
}

/// Compute the single representative color of an image.
///
/// This is the area-weighted mean of every pixel, i.e. the value a box
/// downsample to 1x1 would produce, with each channel rounded to nearest.
/// Returns `None` for an image without pixels.
pub fn average_color(image: &DecodedImage) -> Option<BackgroundColor> {
    let count = image.pixel_count();
    if count == 0 || image.pixels.is_empty() {
        return None;
    }

    let mut sums = [0u64; 3];
    for chunk in image.pixels.chunks_exact(3) {
        sums[0] += u64::from(chunk[0]);
        sums[1] += u64::from(chunk[1]);
        sums[2] += u64::from(chunk[2]);
    }

    let mean = |sum: u64| ((sum + count / 2) / count) as u8;
    Some(BackgroundColor::new(
        mean(sums[0]),
        mean(sums[1]),
        mean(sums[2]),
    ))
}

/// Decode a sample image and return its average color.
pub fn average_color_of_file(path: &Path) -> Result<BackgroundColor, DecodeError> {
    let image = decode_file(path)?;
    average_color(&image)
        .ok_or_else(|| DecodeError::CorruptedFile("image contains no pixels".to_string()))
}


// ============================================================================
// Property-Based Tests
// ============================================================================
