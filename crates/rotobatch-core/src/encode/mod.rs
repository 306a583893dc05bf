//! Image encoding for rotobatch.
//!
//! This module provides functionality for:
//! - Mapping output extensions to codecs (PNG, JPEG, BMP, GIF)
//! - Encoding RGB canvases with a configurable JPEG quality
//! - Writing the result over any existing file
//!
//! # Examples
//!
//! ```ignore
//! use rotobatch_core::encode::{save_image, DEFAULT_JPEG_QUALITY};
//!
//! save_image(&canvas, std::path::Path::new("photo_rotated_90.jpg"), DEFAULT_JPEG_QUALITY)?;
//! ```

mod writer;

pub use writer::{encode_image, save_image, EncodeError, OutputFormat, DEFAULT_JPEG_QUALITY};
