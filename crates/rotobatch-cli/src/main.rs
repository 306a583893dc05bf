//! rotobatch - rotate every image of a directory by a list of angles.

mod config;
mod error;
mod terminal;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use rotobatch_core::{
    average_color_of_file, parse_angles, parse_background_color, BackgroundColor, BatchReport,
    BatchRotator, FormController, FormState, InterpolationFilter, RotationJob, ValidationError,
};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use config::AppConfig;
use error::{CliError, Result};
use terminal::TerminalDialogs;

/// Resampling filter for non-right-angle rotations.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Filter {
    /// Nearest neighbor, no new colors
    Nearest,
    /// Bilinear, smoother edges
    Bilinear,
    /// Lanczos3, sharpest
    Lanczos3,
}

impl From<Filter> for InterpolationFilter {
    fn from(filter: Filter) -> Self {
        match filter {
            Filter::Nearest => Self::Nearest,
            Filter::Bilinear => Self::Bilinear,
            Filter::Lanczos3 => Self::Lanczos3,
        }
    }
}

/// Batch image rotation onto fixed-size background canvases.
#[derive(Parser)]
#[command(name = "rotobatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Config file (defaults to config.json in the user config directory)
    #[arg(long, global = true, env = "ROTOBATCH_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rotate every image of a directory by each angle
    Rotate(RotateArgs),

    /// Print the average color of an image as #rrggbb
    AverageColor {
        /// Image file
        image: PathBuf,
    },

    /// Fill in the rotation form from terminal prompts
    Interactive,
}

#[derive(Args)]
struct RotateArgs {
    /// Directory containing the source images
    #[arg(short, long)]
    input: PathBuf,

    /// Directory for the rotated images (created if missing)
    #[arg(short, long)]
    output: PathBuf,

    /// Comma-separated angles in degrees, counter-clockwise (e.g. "90,180")
    #[arg(short, long, allow_hyphen_values = true)]
    angles: Option<String>,

    /// Background color as #rgb or #rrggbb
    #[arg(short, long, conflicts_with = "background_from")]
    background: Option<String>,

    /// Use the average color of this image as the background
    #[arg(long, value_name = "IMAGE")]
    background_from: Option<PathBuf>,

    /// Resampling filter
    #[arg(long, value_enum)]
    filter: Option<Filter>,

    /// JPEG quality for .jpg/.jpeg outputs
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    jpeg_quality: Option<u8>,

    /// Skip images that fail instead of stopping the batch
    #[arg(long)]
    keep_going: bool,

    /// List the files that would be written without writing anything
    #[arg(long)]
    dry_run: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if !e.is_reported() {
                eprintln!("error: {e}");
            }
            ExitCode::from(e.exit_code())
        }
    }
}

/// Install the stderr subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Rotate(args) => rotate(args, &config),
        Commands::AverageColor { image } => {
            let color = extract_color(&image)?;
            println!("{}", color.to_hex());
            Ok(())
        }
        Commands::Interactive => interactive(&config),
    }
}

fn rotate(args: RotateArgs, config: &AppConfig) -> Result<()> {
    // Angles are checked before the background, whatever its source
    let angles_text = args
        .angles
        .or_else(|| config.angles_text())
        .ok_or(ValidationError::NoAngles)?;
    let angles = parse_angles(&angles_text)?;

    let background = match &args.background_from {
        Some(path) => extract_color(path)?,
        None => {
            let text = args
                .background
                .as_deref()
                .or(config.background.as_deref())
                .unwrap_or("#ffffff");
            parse_background_color(text)?
        }
    };

    let options = config.job_options(args.filter.map(Into::into), args.jpeg_quality, args.keep_going);
    let job = RotationJob::new(args.input, args.output, angles, background)?.with_options(options);

    if args.dry_run {
        let mut stdout = std::io::stdout().lock();
        for path in job.planned_outputs()? {
            writeln!(stdout, "{}", path.display())?;
        }
        return Ok(());
    }

    let report = BatchRotator::new(job).run()?;
    println!(
        "Wrote {} files for {} images",
        report.outputs.len(),
        report.images_processed
    );
    check_complete(&report)
}

fn interactive(config: &AppConfig) -> Result<()> {
    let mut state = FormState::default();
    if let Some(angles) = config.angles_text() {
        state.angles = angles;
    }
    if let Some(background) = &config.background {
        state.background = background.clone();
    }

    let dialogs = TerminalDialogs::new(std::io::stdin().lock(), std::io::stdout());
    let mut form =
        FormController::with_state(dialogs, state).with_options(config.job_options(None, None, false));

    form.browse_input_directory();
    form.browse_output_directory();

    let label = match form.state().angles.as_str() {
        "" => "Rotation angles (comma-separated)".to_string(),
        current => format!("Rotation angles (comma-separated) [{current}]"),
    };
    if let Some(angles) = form.dialogs_mut().prompt(&label) {
        form.state_mut().angles = angles;
    }

    if form
        .dialogs_mut()
        .confirm("Take the background color from an image?")
    {
        form.extract_color_from_image();
    } else {
        form.choose_background_color();
    }

    info!(state = ?form.state(), "Starting rotation from form");
    // The form shows every outcome in a dialog
    let report = form
        .start_rotation()
        .map_err(|e| CliError::from(e).reported())?;
    check_complete(&report).map_err(CliError::reported)
}

fn extract_color(path: &Path) -> Result<BackgroundColor> {
    average_color_of_file(path).map_err(|source| CliError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

fn check_complete(report: &BatchReport) -> Result<()> {
    if report.is_complete() {
        Ok(())
    } else {
        Err(CliError::Incomplete {
            failed: report.failures.len(),
            total: report.failures.len() + report.images_processed,
        })
    }
}
