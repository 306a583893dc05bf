//! Rotation with bounding-box expansion and a solid fill color.
//!
//! Angles are integer degrees, positive = counter-clockwise. They are reduced
//! modulo 360 first. Quarter turns and half turns are exact pixel transposes;
//! every other angle goes through an affine inverse mapping.
//!
//! # Algorithm
//!
//! For each output pixel centre `(x + 0.5, y + 0.5)` we compute the source
//! position with the inverse matrix
//!
//! ```text
//! src_x = a * x + b * y + c
//! src_y = d * x + e * y + f
//! ```
//!
//! where `a = e = cos θ`, `b = -sin θ`, `d = sin θ`, and `(c, f)` keeps the
//! centre of the expanded canvas on the centre of the source. Samples that
//! fall outside the source take the fill color.

use serde::{Deserialize, Serialize};

use crate::color::BackgroundColor;
use crate::decode::DecodedImage;

/// Interpolation filter for rotation operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationFilter {
    /// Nearest neighbor - pixel-exact, no new colors introduced.
    #[default]
    Nearest,
    /// Bilinear interpolation over the 4 nearest pixels.
    Bilinear,
    /// Lanczos3 interpolation over a 6x6 neighborhood.
    Lanczos3,
}

/// Reduce an angle in degrees into `[0, 360)`.
#[inline]
pub fn normalize_degrees(angle_degrees: i32) -> u32 {
    angle_degrees.rem_euclid(360) as u32
}

/// Inverse affine mapping from output pixel coordinates to source coordinates.
#[derive(Debug, Clone, Copy)]
struct AffineMatrix {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
}

impl AffineMatrix {
    #[inline]
    fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.b * y + self.c,
            self.d * x + self.e * y + self.f,
        )
    }
}

/// Round to 15 decimal places so `cos`/`sin` residue does not move a bound.
#[inline]
fn round15(v: f64) -> f64 {
    (v * 1e15).round() / 1e15
}

/// Build the inverse matrix and the expanded canvas size for a general angle.
fn expanded_matrix(width: u32, height: u32, angle_degrees: f64) -> (AffineMatrix, u32, u32) {
    let (w, h) = (f64::from(width), f64::from(height));
    let (cx, cy) = (w / 2.0, h / 2.0);

    let theta = -angle_degrees.to_radians();
    let cos = round15(theta.cos());
    let sin = round15(theta.sin());

    let mut m = AffineMatrix {
        a: cos,
        b: sin,
        c: 0.0,
        d: -sin,
        e: cos,
        f: 0.0,
    };

    // Rotate around the image centre
    let (c, f) = m.apply(-cx, -cy);
    m.c = c + cx;
    m.f = f + cy;

    let corners = [(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)].map(|(x, y)| m.apply(x, y));
    let (min_x, max_x) = min_max(corners.iter().map(|p| p.0));
    let (min_y, max_y) = min_max(corners.iter().map(|p| p.1));

    let new_w = (max_x.ceil() - min_x.floor()) as u32;
    let new_h = (max_y.ceil() - min_y.floor()) as u32;

    // Shift so the expanded canvas stays centred on the source
    let (c, f) = m.apply(
        -(f64::from(new_w) - w) / 2.0,
        -(f64::from(new_h) - h) / 2.0,
    );
    m.c = c;
    m.f = f;

    (m, new_w.max(1), new_h.max(1))
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

/// Compute the dimensions of the expanded canvas for a rotated image.
///
/// # Arguments
///
/// * `width` - Original image width
/// * `height` - Original image height
/// * `angle_degrees` - Rotation angle in degrees (positive = counter-clockwise)
///
/// # Returns
///
/// Tuple of (new_width, new_height). Quarter turns swap the dimensions,
/// half turns keep them, other angles grow to contain all four corners.
pub fn compute_rotated_bounds(width: u32, height: u32, angle_degrees: i32) -> (u32, u32) {
    match normalize_degrees(angle_degrees) {
        0 | 180 => (width, height),
        90 | 270 => (height, width),
        angle => {
            let (_, w, h) = expanded_matrix(width, height, f64::from(angle));
            (w, h)
        }
    }
}

/// Rotate an image around its centre, expanding the canvas to fit.
///
/// Area of the expanded canvas not covered by the source is painted with
/// `fill`.
///
/// # Arguments
///
/// * `image` - Source image to rotate
/// * `angle_degrees` - Rotation angle in degrees (positive = counter-clockwise)
/// * `fill` - Color for newly exposed area
/// * `filter` - Interpolation used for non-quarter-turn angles
pub fn apply_rotation(
    image: &DecodedImage,
    angle_degrees: i32,
    fill: BackgroundColor,
    filter: InterpolationFilter,
) -> DecodedImage {
    if image.is_empty() {
        return image.clone();
    }

    match normalize_degrees(angle_degrees) {
        0 => image.clone(),
        90 => rotate_quarter_ccw(image),
        180 => rotate_half(image),
        270 => rotate_quarter_cw(image),
        angle => rotate_affine(image, f64::from(angle), fill, filter),
    }
}

fn rotate_half(image: &DecodedImage) -> DecodedImage {
    let pixels = image
        .pixels
        .chunks_exact(3)
        .rev()
        .flatten()
        .copied()
        .collect();
    DecodedImage::new(image.width, image.height, pixels)
}

/// 90 degrees counter-clockwise: the right edge becomes the top edge.
fn rotate_quarter_ccw(image: &DecodedImage) -> DecodedImage {
    let (w, h) = (image.width, image.height);
    let mut pixels = Vec::with_capacity(image.pixels.len());
    for y in 0..w {
        for x in 0..h {
            pixels.extend_from_slice(&image.pixel(w - 1 - y, x));
        }
    }
    DecodedImage::new(h, w, pixels)
}

/// 90 degrees clockwise: the left edge becomes the top edge.
fn rotate_quarter_cw(image: &DecodedImage) -> DecodedImage {
    let (w, h) = (image.width, image.height);
    let mut pixels = Vec::with_capacity(image.pixels.len());
    for y in 0..w {
        for x in 0..h {
            pixels.extend_from_slice(&image.pixel(y, h - 1 - x));
        }
    }
    DecodedImage::new(h, w, pixels)
}

fn rotate_affine(
    image: &DecodedImage,
    angle_degrees: f64,
    fill: BackgroundColor,
    filter: InterpolationFilter,
) -> DecodedImage {
    let (matrix, dst_w, dst_h) = expanded_matrix(image.width, image.height, angle_degrees);
    let fill = fill.to_array();

    let mut output = Vec::with_capacity((dst_w as usize) * (dst_h as usize) * 3);

    for dst_y in 0..dst_h {
        for dst_x in 0..dst_w {
            // Sample at the pixel centre
            let (src_x, src_y) =
                matrix.apply(f64::from(dst_x) + 0.5, f64::from(dst_y) + 0.5);

            let pixel = if inside(image, src_x, src_y) {
                match filter {
                    InterpolationFilter::Nearest => sample_nearest(image, src_x, src_y),
                    InterpolationFilter::Bilinear => sample_bilinear(image, src_x, src_y),
                    InterpolationFilter::Lanczos3 => sample_lanczos3(image, src_x, src_y),
                }
            } else {
                fill
            };

            output.extend_from_slice(&pixel);
        }
    }

    DecodedImage::new(dst_w, dst_h, output)
}

#[inline]
fn inside(image: &DecodedImage, x: f64, y: f64) -> bool {
    x >= 0.0 && y >= 0.0 && x < f64::from(image.width) && y < f64::from(image.height)
}

/// Clamp a possibly out-of-range neighbor index onto the image.
#[inline]
fn clamp_index(v: i64, len: u32) -> u32 {
    v.clamp(0, i64::from(len) - 1) as u32
}

#[inline]
fn get_pixel_f64(image: &DecodedImage, px: i64, py: i64) -> [f64; 3] {
    let p = image.pixel(clamp_index(px, image.width), clamp_index(py, image.height));
    [f64::from(p[0]), f64::from(p[1]), f64::from(p[2])]
}

fn sample_nearest(image: &DecodedImage, x: f64, y: f64) -> [u8; 3] {
    image.pixel(
        clamp_index(x.floor() as i64, image.width),
        clamp_index(y.floor() as i64, image.height),
    )
}

/// Bilinear interpolation considers the 4 nearest pixel centres and weights
/// their contribution based on distance. Neighbors past the edge repeat the
/// edge pixel.
fn sample_bilinear(image: &DecodedImage, x: f64, y: f64) -> [u8; 3] {
    // Shift from pixel-centre to pixel-index space
    let x = x - 0.5;
    let y = y - 0.5;

    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let p00 = get_pixel_f64(image, x0, y0);
    let p10 = get_pixel_f64(image, x0 + 1, y0);
    let p01 = get_pixel_f64(image, x0, y0 + 1);
    let p11 = get_pixel_f64(image, x0 + 1, y0 + 1);

    let mut result = [0u8; 3];
    for i in 0..3 {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }

    result
}

/// Lanczos3 interpolation over a 6x6 neighborhood, edge pixels repeated.
fn sample_lanczos3(image: &DecodedImage, x: f64, y: f64) -> [u8; 3] {
    let x = x - 0.5;
    let y = y - 0.5;
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let mut sum = [0.0f64; 3];
    let mut weight_sum = 0.0;

    for ky in -2..=3 {
        for kx in -2..=3 {
            let px = x0 + kx;
            let py = y0 + ky;
            let weight = lanczos_weight(x - px as f64, 3.0) * lanczos_weight(y - py as f64, 3.0);

            let pixel = get_pixel_f64(image, px, py);
            sum[0] += pixel[0] * weight;
            sum[1] += pixel[1] * weight;
            sum[2] += pixel[2] * weight;
            weight_sum += weight;
        }
    }

    if weight_sum.abs() < f64::EPSILON {
        return sample_nearest(image, x + 0.5, y + 0.5);
    }

    let mut result = [0u8; 3];
    for i in 0..3 {
        result[i] = (sum[i] / weight_sum).clamp(0.0, 255.0).round() as u8;
    }
    result
}

/// Lanczos kernel weight function.
///
/// ```text
/// L(x) = sinc(x) * sinc(x/a)  for |x| < a
/// L(x) = 0                     for |x| >= a
/// ```
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;

    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
