//! The rotation form: four text fields and the actions behind its buttons.
//!
//! [`FormController`] holds the field values in a [`FormState`] and talks to
//! the user only through a [`Dialogs`] implementation, so the same logic
//! drives a terminal prompt, a GUI, or a scripted test double.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::batch::{BatchHandle, BatchReport, BatchRotator};
use crate::color::{average_color_of_file, BackgroundColor};
use crate::error::RotateError;
use crate::job::{JobOptions, RotationJob};

/// Title of the dialog reporting invalid form input.
pub const INPUT_ERROR_TITLE: &str = "Input error";
/// Title of the dialog reporting a failed batch.
pub const BATCH_ERROR_TITLE: &str = "Rotation failed";
/// Title of the dialog reporting a failed color extraction.
pub const COLOR_ERROR_TITLE: &str = "Color extraction failed";
pub const DONE_TITLE: &str = "Done";
pub const DONE_MESSAGE: &str = "Image processing complete!";

/// User-facing dialogs the form needs.
///
/// The `pick_*` methods return `None` when the user cancels.
pub trait Dialogs {
    fn pick_directory(&mut self, title: &str) -> Option<PathBuf>;
    fn pick_color(&mut self, current: Option<BackgroundColor>) -> Option<BackgroundColor>;
    fn pick_image_file(&mut self) -> Option<PathBuf>;
    fn show_info(&mut self, title: &str, message: &str);
    fn show_error(&mut self, title: &str, message: &str);
}

/// Raw text of the form fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub input_dir: String,
    pub output_dir: String,
    pub angles: String,
    pub background: String,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            input_dir: String::new(),
            output_dir: String::new(),
            angles: String::new(),
            background: BackgroundColor::WHITE.to_hex(),
        }
    }
}

impl FormState {
    /// Validate the fields and build a job from them.
    pub fn to_job(&self) -> Result<RotationJob, RotateError> {
        Ok(RotationJob::from_form(
            &self.input_dir,
            &self.output_dir,
            &self.angles,
            &self.background,
        )?)
    }
}

/// Drives the form actions against a [`Dialogs`] collaborator.
#[derive(Debug)]
pub struct FormController<D> {
    state: FormState,
    options: JobOptions,
    dialogs: D,
}

impl<D: Dialogs> FormController<D> {
    pub fn new(dialogs: D) -> Self {
        Self::with_state(dialogs, FormState::default())
    }

    pub fn with_state(dialogs: D, state: FormState) -> Self {
        Self {
            state,
            options: JobOptions::default(),
            dialogs,
        }
    }

    /// Filter, quality and error policy applied to every job started here.
    pub fn with_options(mut self, options: JobOptions) -> Self {
        self.options = options;
        self
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }

    pub fn dialogs(&self) -> &D {
        &self.dialogs
    }

    pub fn dialogs_mut(&mut self) -> &mut D {
        &mut self.dialogs
    }

    pub fn into_parts(self) -> (FormState, D) {
        (self.state, self.dialogs)
    }

    /// Ask for the input directory. Cancelling keeps the current value.
    pub fn browse_input_directory(&mut self) {
        if let Some(dir) = self.dialogs.pick_directory("Select input directory") {
            self.state.input_dir = dir.to_string_lossy().into_owned();
        }
    }

    /// Ask for the output directory. Cancelling keeps the current value.
    pub fn browse_output_directory(&mut self) {
        if let Some(dir) = self.dialogs.pick_directory("Select output directory") {
            self.state.output_dir = dir.to_string_lossy().into_owned();
        }
    }

    pub fn choose_background_color(&mut self) {
        let current = self.state.background.parse().ok();
        if let Some(color) = self.dialogs.pick_color(current) {
            self.state.background = color.to_hex();
        }
    }

    /// Set the background to the average color of an image the user picks.
    pub fn extract_color_from_image(&mut self) {
        let Some(path) = self.dialogs.pick_image_file() else {
            return;
        };
        match average_color_of_file(&path) {
            Ok(color) => {
                info!(file = %path.display(), color = %color, "Extracted background color");
                self.state.background = color.to_hex();
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "Color extraction failed");
                let message = format!("{}: {e}", path.display());
                self.dialogs.show_error(COLOR_ERROR_TITLE, &message);
            }
        }
    }

    /// Validate the form and run the batch, reporting the outcome in a dialog.
    ///
    /// Invalid input is reported before any file is touched.
    pub fn start_rotation(&mut self) -> Result<BatchReport, RotateError> {
        let job = self.validated_job()?;
        let result = BatchRotator::new(job).run();
        self.report_outcome(&result);
        result
    }

    /// Validate the form and run the batch on a worker thread.
    ///
    /// Only validation is reported through the dialogs; the outcome of the
    /// batch is delivered by the returned handle.
    pub fn start_rotation_in_background(&mut self) -> Result<BatchHandle, RotateError> {
        let job = self.validated_job()?;
        BatchRotator::new(job).spawn()
    }

    /// Show the dialog for a finished batch.
    pub fn report_outcome(&mut self, result: &Result<BatchReport, RotateError>) {
        match result {
            Ok(report) if report.is_complete() => {
                self.dialogs.show_info(DONE_TITLE, DONE_MESSAGE);
            }
            Ok(report) => {
                let mut message = format!(
                    "{} of {} images could not be processed:",
                    report.failures.len(),
                    report.failures.len() + report.images_processed
                );
                for failure in &report.failures {
                    message.push('\n');
                    message.push_str(&failure.error.to_string());
                }
                self.dialogs.show_error(BATCH_ERROR_TITLE, &message);
            }
            Err(e) => self.dialogs.show_error(BATCH_ERROR_TITLE, &e.to_string()),
        }
    }

    fn validated_job(&mut self) -> Result<RotationJob, RotateError> {
        match self.state.to_job() {
            Ok(job) => Ok(job.with_options(self.options)),
            Err(e) => {
                self.dialogs.show_error(INPUT_ERROR_TITLE, &e.to_string());
                Err(e)
            }
        }
    }
}
