//! Core types for image decoding.

use thiserror::Error;

use crate::color::BackgroundColor;

/// Error types for image decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The file format is not recognized or supported.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// I/O error during file reading.
    #[error("I/O error: {0}")]
    IoError(String),
}

/// A decoded image with RGB pixel data.
///
/// Every input is flattened to 8-bit RGB on decode. Alpha is dropped rather
/// than blended and palettes are expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGB pixel data in row-major order (3 bytes per pixel).
    /// Length should be width * height * 3.
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Create a new DecodedImage with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            (width as usize) * (height as usize) * 3,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create an image of the given size where every pixel is `color`.
    pub fn filled(width: u32, height: u32, color: BackgroundColor) -> Self {
        let count = (width as usize) * (height as usize);
        let pixels = color.to_array().repeat(count);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a DecodedImage from an image::RgbImage.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img.into_raw();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Convert any decoded `image` crate buffer to RGB8.
    pub fn from_dynamic(img: image::DynamicImage) -> Self {
        Self::from_rgb_image(img.into_rgb8())
    }

    /// Read the RGB value at (x, y).
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = ((y as usize) * (self.width as usize) + x as usize) * 3;
        [self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]]
    }

    /// Get the image dimensions as (width, height).
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoded_image_creation() {
        let pixels = vec![0u8; 100 * 50 * 3];
        let img = DecodedImage::new(100, 50, pixels);

        assert_eq!(img.dimensions(), (100, 50));
        assert_eq!(img.pixel_count(), 5000);
        assert!(!img.is_empty());
    }

    #[test]
    fn test_decoded_image_empty() {
        let img = DecodedImage::new(0, 0, vec![]);
        assert!(img.is_empty());
    }

    #[test]
    fn test_filled_image() {
        let img = DecodedImage::filled(3, 2, BackgroundColor::new(10, 20, 30));
        assert_eq!(img.pixels.len(), 18);
        assert_eq!(img.pixel(0, 0), [10, 20, 30]);
        assert_eq!(img.pixel(2, 1), [10, 20, 30]);
    }

    #[test]
    fn test_from_dynamic_drops_alpha() {
        let rgba = image::RgbaImage::from_raw(1, 1, vec![200, 100, 50, 0]).unwrap();
        let img = DecodedImage::from_dynamic(image::DynamicImage::ImageRgba8(rgba));
        assert_eq!(img.pixel(0, 0), [200, 100, 50]);
    }

    #[test]
    fn test_from_rgb_image_keeps_layout() {
        let rgb = image::RgbImage::from_raw(2, 1, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let img = DecodedImage::from_rgb_image(rgb);
        assert_eq!(img.dimensions(), (2, 1));
        assert_eq!(img.pixel(1, 0), [4, 5, 6]);
    }

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::CorruptedFile("bad header".to_string());
        assert_eq!(
            err.to_string(),
            "Corrupted or incomplete image file: bad header"
        );

        let err = DecodeError::InvalidFormat;
        assert_eq!(err.to_string(), "Invalid or unsupported image format");
    }
}
