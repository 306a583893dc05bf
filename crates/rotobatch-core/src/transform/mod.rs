//! Image transformation operations: rotation and compositing.
//!
//! # Transform Order
//!
//! Each (image, angle) pair goes through:
//! 1. Rotation with canvas expansion and fill
//! 2. Centre paste onto a canvas of the original size
//!
//! # Coordinate System
//!
//! - Rotation angles are integer degrees, positive = counter-clockwise
//! - Origin is top-left corner

mod composite;
mod rotation;

pub use composite::{center_offset, composite_centered, paste};
pub use rotation::{apply_rotation, compute_rotated_bounds, normalize_degrees, InterpolationFilter};

use crate::color::BackgroundColor;
use crate::decode::DecodedImage;

/// Rotate `image` by `angle_degrees` and centre the result on a canvas the
/// size of the original, both filled with `background`.
pub fn rotate_onto_canvas(
    image: &DecodedImage,
    angle_degrees: i32,
    background: BackgroundColor,
    filter: InterpolationFilter,
) -> DecodedImage {
    let rotated = apply_rotation(image, angle_degrees, background, filter);
    composite_centered(&rotated, image.width, image.height, background)
}
