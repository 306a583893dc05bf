//! Decoding of PNG, JPEG, BMP and GIF sources into RGB.

use std::io::{BufRead, Cursor, Seek};
use std::path::Path;

use image::{ImageError, ImageReader};

use super::{DecodeError, DecodedImage};

/// Decode an image from in-memory bytes.
///
/// The format is detected from the content, not from a file name.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the format is not recognized.
/// Returns `DecodeError::CorruptedFile` if the data is truncated or corrupt.
pub fn decode_bytes(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    decode_reader(ImageReader::new(Cursor::new(bytes)))
}

/// Decode an image file from disk.
///
/// Like the bytes variant, the format is taken from the file content, so a
/// PNG saved with a `.jpg` name still decodes.
///
/// # Errors
///
/// Returns `DecodeError::IoError` if the file cannot be opened, plus the
/// errors of [`decode_bytes`].
pub fn decode_file(path: &Path) -> Result<DecodedImage, DecodeError> {
    let reader = ImageReader::open(path).map_err(|e| DecodeError::IoError(e.to_string()))?;
    decode_reader(reader)
}

fn decode_reader<R: BufRead + Seek>(reader: ImageReader<R>) -> Result<DecodedImage, DecodeError> {
    let reader = reader
        .with_guessed_format()
        .map_err(|e| DecodeError::IoError(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let img = reader.decode().map_err(map_image_error)?;
    Ok(DecodedImage::from_dynamic(img))
}

fn map_image_error(err: ImageError) -> DecodeError {
    match err {
        ImageError::Unsupported(_) => DecodeError::InvalidFormat,
        ImageError::IoError(e) => DecodeError::IoError(e.to_string()),
        other => DecodeError::CorruptedFile(other.to_string()),
    }
}
