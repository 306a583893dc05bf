//! Rotation job description and the parsing of its form inputs.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::color::BackgroundColor;
use crate::discover::discover_images;
use crate::encode::DEFAULT_JPEG_QUALITY;
use crate::error::{RotateError, ValidationError};
use crate::transform::InterpolationFilter;

/// What to do when one input file cannot be processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorPolicy {
    /// Abort the whole batch on the first failure.
    #[default]
    FailFast,
    /// Record the failure, skip the rest of that file, continue with the next.
    ContinueOnError,
}

/// Settings of a job that are not part of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobOptions {
    pub filter: InterpolationFilter,
    pub jpeg_quality: u8,
    pub error_policy: ErrorPolicy,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            filter: InterpolationFilter::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            error_policy: ErrorPolicy::default(),
        }
    }
}

/// One batch invocation: every image of `input_dir` rotated to every angle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationJob {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Degrees, positive = counter-clockwise, processed in this order.
    pub angles: Vec<i32>,
    pub background: BackgroundColor,
    pub filter: InterpolationFilter,
    pub jpeg_quality: u8,
    pub error_policy: ErrorPolicy,
}

impl RotationJob {
    /// Create a job with default filter, quality and error policy.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::NoAngles` if `angles` is empty.
    pub fn new(
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        angles: Vec<i32>,
        background: BackgroundColor,
    ) -> Result<Self, ValidationError> {
        if angles.is_empty() {
            return Err(ValidationError::NoAngles);
        }
        Ok(Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            angles,
            background,
            filter: InterpolationFilter::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            error_policy: ErrorPolicy::default(),
        })
    }

    /// Build a job from the raw text of the form fields.
    ///
    /// Angles are validated before the color, and both before any file I/O.
    pub fn from_form(
        input_dir: &str,
        output_dir: &str,
        angles: &str,
        background: &str,
    ) -> Result<Self, ValidationError> {
        let angles = parse_angles(angles)?;
        let background: BackgroundColor = background.parse()?;
        Self::new(input_dir, output_dir, angles, background)
    }

    pub fn with_filter(mut self, filter: InterpolationFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    pub fn with_options(self, options: JobOptions) -> Self {
        self.with_filter(options.filter)
            .with_jpeg_quality(options.jpeg_quality)
            .with_error_policy(options.error_policy)
    }

    /// Full output path for an output file name.
    pub fn output_path(&self, file_name: impl AsRef<Path>) -> PathBuf {
        self.output_dir.join(file_name)
    }

    /// The output paths a run would write, in processing order.
    ///
    /// Lists the input directory but does not decode anything or touch the
    /// output directory.
    pub fn planned_outputs(&self) -> Result<Vec<PathBuf>, RotateError> {
        let images = discover_images(&self.input_dir)?;
        Ok(images
            .iter()
            .flat_map(|image| {
                self.angles
                    .iter()
                    .map(move |&angle| self.output_path(image.output_file_name(angle)))
            })
            .collect())
    }
}

/// Parse a comma-separated list of integer angles.
///
/// Whitespace around each token is ignored and a leading sign is allowed.
/// An empty token, including an empty input or a trailing comma, is an error.
pub fn parse_angles(input: &str) -> Result<Vec<i32>, ValidationError> {
    input
        .split(',')
        .map(|token| {
            token
                .trim()
                .parse::<i32>()
                .map_err(|_| ValidationError::InvalidAngle {
                    token: token.to_string(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_angles_basic() {
        assert_eq!(parse_angles("90,180").unwrap(), vec![90, 180]);
        assert_eq!(parse_angles("45").unwrap(), vec![45]);
    }

    #[test]
    fn test_parse_angles_keeps_order_and_duplicates() {
        assert_eq!(parse_angles("270,90,90,0").unwrap(), vec![270, 90, 90, 0]);
    }

    #[test]
    fn test_parse_angles_whitespace_and_signs() {
        assert_eq!(parse_angles(" 15 , -30,+45 ").unwrap(), vec![15, -30, 45]);
        assert_eq!(parse_angles("400,-720").unwrap(), vec![400, -720]);
    }

    #[test]
    fn test_parse_angles_rejects_non_integer() {
        assert_eq!(
            parse_angles("45,abc"),
            Err(ValidationError::InvalidAngle {
                token: "abc".to_string()
            })
        );
        assert!(parse_angles("12.5").is_err());
        assert!(parse_angles("90;180").is_err());
    }

    #[test]
    fn test_parse_angles_ascii_digits_only() {
        assert!(matches!(
            parse_angles("1_0"),
            Err(ValidationError::InvalidAngle { .. })
        ));
        // Arabic-Indic digits
        assert!(parse_angles("\u{0669}\u{0660}").is_err());
        assert_eq!(parse_angles("+010").unwrap(), vec![10]);
    }

    #[test]
    fn test_parse_angles_rejects_empty_tokens() {
        assert!(parse_angles("").is_err());
        assert!(parse_angles("90,").is_err());
        assert!(parse_angles(",90").is_err());
        assert!(parse_angles("90,,180").is_err());
    }

    #[test]
    fn test_job_requires_angles() {
        let result = RotationJob::new("in", "out", vec![], BackgroundColor::WHITE);
        assert_eq!(result, Err(ValidationError::NoAngles));
    }

    #[test]
    fn test_job_defaults() {
        let job = RotationJob::new("in", "out", vec![90], BackgroundColor::WHITE).unwrap();
        assert_eq!(job.filter, InterpolationFilter::Nearest);
        assert_eq!(job.jpeg_quality, DEFAULT_JPEG_QUALITY);
        assert_eq!(job.error_policy, ErrorPolicy::FailFast);
    }

    #[test]
    fn test_with_options() {
        let options = JobOptions {
            filter: InterpolationFilter::Bilinear,
            jpeg_quality: 92,
            error_policy: ErrorPolicy::ContinueOnError,
        };
        let job = RotationJob::new("in", "out", vec![90], BackgroundColor::WHITE)
            .unwrap()
            .with_options(options);
        assert_eq!(job.filter, InterpolationFilter::Bilinear);
        assert_eq!(job.jpeg_quality, 92);
        assert_eq!(job.error_policy, ErrorPolicy::ContinueOnError);
    }

    #[test]
    fn test_from_form_validates_angles_first() {
        // Both fields are invalid; the angle error wins
        let result = RotationJob::from_form("in", "out", "45,abc", "00ff00");
        assert!(matches!(result, Err(ValidationError::InvalidAngle { .. })));

        let result = RotationJob::from_form("in", "out", "45", "00ff00");
        assert!(matches!(result, Err(ValidationError::MissingHashPrefix(_))));
    }

    #[test]
    fn test_from_form_success() {
        let job = RotationJob::from_form("/a", "/b", "90,180", "#ffffff").unwrap();
        assert_eq!(job.input_dir, PathBuf::from("/a"));
        assert_eq!(job.output_dir, PathBuf::from("/b"));
        assert_eq!(job.angles, vec![90, 180]);
        assert_eq!(job.background, BackgroundColor::WHITE);
    }

    #[test]
    fn test_planned_outputs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("photo.jpg"), b"not decoded").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"skip").unwrap();

        let job = RotationJob::new(dir.path(), "/out", vec![90, -5], BackgroundColor::WHITE)
            .unwrap();
        assert_eq!(
            job.planned_outputs().unwrap(),
            vec![
                PathBuf::from("/out/photo_rotated_90.jpg"),
                PathBuf::from("/out/photo_rotated_-5.jpg"),
            ]
        );
    }
}
