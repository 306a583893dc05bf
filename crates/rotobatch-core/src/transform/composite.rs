//! Center compositing onto a fixed-size background canvas.
//!
//! The canvas keeps the original (pre-rotation) dimensions. When the rotated
//! image is larger than the canvas the paste offset goes negative and the
//! overhang is cropped.

use crate::color::BackgroundColor;
use crate::decode::DecodedImage;

/// Offset that centres an `inner` extent on an `outer` extent.
///
/// Uses floor division, so an odd difference puts the extra pixel on the
/// right/bottom and negative differences round towards negative infinity.
#[inline]
pub fn center_offset(outer: u32, inner: u32) -> i64 {
    (i64::from(outer) - i64::from(inner)).div_euclid(2)
}

/// Paste `overlay` onto a `width` x `height` canvas filled with `background`,
/// centred, and return the canvas.
///
/// This is a plain copy: overlay pixels replace canvas pixels, there is no
/// blending.
pub fn composite_centered(
    overlay: &DecodedImage,
    width: u32,
    height: u32,
    background: BackgroundColor,
) -> DecodedImage {
    let mut canvas = DecodedImage::filled(width, height, background);
    let offset_x = center_offset(width, overlay.width);
    let offset_y = center_offset(height, overlay.height);
    paste(&mut canvas, overlay, offset_x, offset_y);
    canvas
}

/// Copy `src` into `dst` with its top-left corner at (`x`, `y`), clipping
/// whatever falls outside `dst`.
pub fn paste(dst: &mut DecodedImage, src: &DecodedImage, x: i64, y: i64) {
    let dst_w = i64::from(dst.width);
    let dst_h = i64::from(dst.height);

    // Visible range of the source, in source coordinates
    let x_start = (-x).clamp(0, i64::from(src.width));
    let x_end = (dst_w - x).clamp(0, i64::from(src.width));
    let y_start = (-y).clamp(0, i64::from(src.height));
    let y_end = (dst_h - y).clamp(0, i64::from(src.height));

    if x_start >= x_end || y_start >= y_end {
        return;
    }

    let row_bytes = ((x_end - x_start) * 3) as usize;
    for sy in y_start..y_end {
        let src_idx = ((sy * i64::from(src.width) + x_start) * 3) as usize;
        let dy = sy + y;
        let dst_idx = ((dy * dst_w + x_start + x) * 3) as usize;
        dst.pixels[dst_idx..dst_idx + row_bytes]
            .copy_from_slice(&src.pixels[src_idx..src_idx + row_bytes]);
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
