//! Encoding of composited RGB canvases, with the codec chosen by extension.
//!
//! JPEG quality is configurable; PNG, BMP and GIF are written with the
//! encoder defaults. All encoders are deterministic, so the same canvas
//! always produces the same bytes.

use std::io::Cursor;
use std::path::Path;

use image::codecs::bmp::BmpEncoder;
use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use thiserror::Error;

use crate::decode::DecodedImage;

/// JPEG quality used when none is configured.
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

/// Errors that can occur while encoding or saving an output image.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The output extension does not map to a supported codec
    #[error("Unsupported output format: {0:?}")]
    UnsupportedFormat(String),

    /// The codec rejected the image
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    /// Writing the encoded bytes failed
    #[error("I/O error: {0}")]
    IoError(String),
}

/// Output codecs, one per accepted input extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
    Bmp,
    Gif,
}

impl OutputFormat {
    /// Map a file extension (without the dot, any case) to a codec.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "bmp" => Some(Self::Bmp),
            "gif" => Some(Self::Gif),
            _ => None,
        }
    }

    /// Pick the codec from a path's extension.
    pub fn from_path(path: &Path) -> Result<Self, EncodeError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_extension(&ext).ok_or(EncodeError::UnsupportedFormat(ext))
    }
}

/// Encode an RGB image to bytes in the given format.
///
/// # Arguments
///
/// * `image` - RGB canvas to encode
/// * `format` - Target codec
/// * `jpeg_quality` - JPEG quality (clamped to 1-100), ignored by other codecs
///
/// # Errors
///
/// Returns `EncodeError::InvalidDimensions` for empty images and
/// `EncodeError::InvalidPixelData` if the buffer does not match the size.
pub fn encode_image(
    image: &DecodedImage,
    format: OutputFormat,
    jpeg_quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = image.dimensions();

    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected_len = (width as usize) * (height as usize) * 3;
    if image.pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: image.pixels.len(),
        });
    }

    let pixels = image.pixels.as_slice();
    let mut buffer = Cursor::new(Vec::new());

    let result = match format {
        OutputFormat::Png => {
            PngEncoder::new(&mut buffer).write_image(pixels, width, height, ExtendedColorType::Rgb8)
        }
        OutputFormat::Jpeg => {
            let quality = jpeg_quality.clamp(1, 100);
            JpegEncoder::new_with_quality(&mut buffer, quality).write_image(
                pixels,
                width,
                height,
                ExtendedColorType::Rgb8,
            )
        }
        OutputFormat::Bmp => {
            BmpEncoder::new(&mut buffer).write_image(pixels, width, height, ExtendedColorType::Rgb8)
        }
        OutputFormat::Gif => {
            // The trailer is written when the encoder drops, so keep it scoped
            let mut encoder = GifEncoder::new(&mut buffer);
            encoder.encode(pixels, width, height, ExtendedColorType::Rgb8)
        }
    };
    result.map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Encode `image` with the codec implied by `path` and write it there,
/// replacing any existing file.
pub fn save_image(image: &DecodedImage, path: &Path, jpeg_quality: u8) -> Result<(), EncodeError> {
    let format = OutputFormat::from_path(path)?;
    let bytes = encode_image(image, format, jpeg_quality)?;
    std::fs::write(path, bytes).map_err(|e| EncodeError::IoError(e.to_string()))
}
