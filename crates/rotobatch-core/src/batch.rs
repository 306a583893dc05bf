//! The batch rotator: every input image, every angle, one output each.
//!
//! Files are processed in directory-listing order and angles in the order
//! given. Each source is decoded once, rotated and composited for every
//! angle, then dropped before the next file is opened.

use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use tracing::{debug, info, warn};

use crate::decode::decode_file;
use crate::discover::{discover_images, ImageFile};
use crate::encode::save_image;
use crate::error::RotateError;
use crate::job::{ErrorPolicy, RotationJob};
use crate::transform::rotate_onto_canvas;

/// An input file that was skipped under `ErrorPolicy::ContinueOnError`.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: RotateError,
}

/// Summary of a finished batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Input images whose every angle was written.
    pub images_processed: usize,
    /// Output files written, in the order they were written.
    pub outputs: Vec<PathBuf>,
    /// Per-file failures; always empty under `ErrorPolicy::FailFast`.
    pub failures: Vec<FileFailure>,
}

impl BatchReport {
    /// True when no input file failed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs a [`RotationJob`].
#[derive(Debug, Clone)]
pub struct BatchRotator {
    job: RotationJob,
}

impl BatchRotator {
    pub fn new(job: RotationJob) -> Self {
        Self { job }
    }

    /// Process every (image, angle) pair, blocking until done.
    ///
    /// The output directory is created first (with parents). Existing files
    /// with the same names are overwritten.
    ///
    /// # Errors
    ///
    /// Directory errors always abort. Per-file decode/encode errors abort
    /// under `ErrorPolicy::FailFast` and are collected in the report under
    /// `ErrorPolicy::ContinueOnError`.
    pub fn run(&self) -> Result<BatchReport, RotateError> {
        let job = &self.job;
        info!(
            input = %job.input_dir.display(),
            output = %job.output_dir.display(),
            angles = ?job.angles,
            background = %job.background,
            filter = ?job.filter,
            "Starting rotation batch"
        );

        std::fs::create_dir_all(&job.output_dir)
            .map_err(|e| RotateError::io(&job.output_dir, e))?;

        let images = discover_images(&job.input_dir)?;
        info!(count = images.len(), "Found input images");

        let mut report = BatchReport::default();
        for image in &images {
            match self.process_file(image, &mut report.outputs) {
                Ok(()) => report.images_processed += 1,
                Err(error) => match job.error_policy {
                    ErrorPolicy::FailFast => return Err(error),
                    ErrorPolicy::ContinueOnError => {
                        warn!(file = %image.display_name(), %error, "Skipping image");
                        report.failures.push(FileFailure {
                            path: image.path.clone(),
                            error,
                        });
                    }
                },
            }
        }

        info!(
            images = report.images_processed,
            outputs = report.outputs.len(),
            failures = report.failures.len(),
            "Rotation batch finished"
        );
        Ok(report)
    }

    fn process_file(&self, image: &ImageFile, outputs: &mut Vec<PathBuf>) -> Result<(), RotateError> {
        let job = &self.job;
        let source = decode_file(&image.path).map_err(|source| RotateError::Decode {
            path: image.path.clone(),
            source,
        })?;
        info!(
            file = %image.display_name(),
            width = source.width,
            height = source.height,
            "Rotating image"
        );

        for &angle in &job.angles {
            let canvas = rotate_onto_canvas(&source, angle, job.background, job.filter);
            let path = job.output_path(image.output_file_name(angle));

            save_image(&canvas, &path, job.jpeg_quality).map_err(|source| RotateError::Encode {
                path: path.clone(),
                source,
            })?;
            debug!(output = %path.display(), angle, "Wrote rotated image");
            outputs.push(path);
        }

        Ok(())
    }

    /// Run the batch on a worker thread.
    ///
    /// The returned handle delivers the same result `run` would have returned.
    pub fn spawn(self) -> Result<BatchHandle, RotateError> {
        let (sender, receiver) = mpsc::channel();
        let worker = thread::Builder::new()
            .name("rotobatch-worker".to_string())
            .spawn(move || {
                // The receiver may already be gone; nothing to report to then
                let _ = sender.send(self.run());
            })
            .map_err(|e| RotateError::Worker(e.to_string()))?;

        Ok(BatchHandle {
            receiver,
            worker: Some(worker),
        })
    }
}

/// Handle to a batch running on a worker thread.
#[derive(Debug)]
pub struct BatchHandle {
    receiver: mpsc::Receiver<Result<BatchReport, RotateError>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl BatchHandle {
    /// Block until the batch finishes.
    pub fn wait(mut self) -> Result<BatchReport, RotateError> {
        let result = self.receiver.recv().unwrap_or_else(|_| Err(worker_lost()));
        self.join_worker();
        result
    }

    /// Return the result if the batch has finished, without blocking.
    ///
    /// The result is handed out once; later calls return `None`.
    pub fn try_result(&mut self) -> Option<Result<BatchReport, RotateError>> {
        match self.receiver.try_recv() {
            Ok(result) => {
                self.join_worker();
                Some(result)
            }
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => {
                if self.worker.is_some() {
                    self.join_worker();
                    Some(Err(worker_lost()))
                } else {
                    None
                }
            }
        }
    }

    fn join_worker(&mut self) {
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("Rotation worker panicked");
            }
        }
    }
}

fn worker_lost() -> RotateError {
    RotateError::Worker("worker stopped without reporting a result".to_string())
}
