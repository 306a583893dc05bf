//! Image decoding for rotobatch.
//!
//! This module provides functionality for:
//! - Decoding PNG, JPEG, BMP and GIF files (first frame) into RGB
//! - The shared `DecodedImage` pixel buffer used by every transform
//!
//! # Architecture
//!
//! All operations are synchronous. Each source image is decoded once per
//! batch and dropped before the next file is opened.
//!
//! # Examples
//!
//! ```ignore
//! use rotobatch_core::decode::decode_file;
//!
//! let image = decode_file(std::path::Path::new("photo.jpg"))?;
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

mod reader;
mod types;

pub use reader::{decode_bytes, decode_file};
pub use types::{DecodeError, DecodedImage};
