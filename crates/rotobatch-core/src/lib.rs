//! Rotobatch Core - Batch image rotation library
//!
//! This crate rotates every image of a directory by a list of angles and
//! writes each result, centred on a background canvas of the original size,
//! to an output directory. It also provides the form controller that drives
//! the batch from user-entered text fields.

pub mod batch;
pub mod color;
pub mod decode;
pub mod discover;
pub mod encode;
pub mod error;
pub mod form;
pub mod job;
pub mod transform;

pub use batch::{BatchHandle, BatchReport, BatchRotator, FileFailure};
pub use color::{average_color, average_color_of_file, parse_background_color, BackgroundColor};
pub use decode::{decode_bytes, decode_file, DecodeError, DecodedImage};
pub use discover::{discover_images, ImageFile, IMAGE_EXTENSIONS};
pub use encode::{save_image, EncodeError, OutputFormat, DEFAULT_JPEG_QUALITY};
pub use error::{RotateError, ValidationError};
pub use form::{Dialogs, FormController, FormState};
pub use job::{parse_angles, ErrorPolicy, JobOptions, RotationJob};
pub use transform::{apply_rotation, compute_rotated_bounds, rotate_onto_canvas, InterpolationFilter};
