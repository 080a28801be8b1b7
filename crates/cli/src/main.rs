mod settings;

use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::Parser;

use autocrop_core::capture::domain::capture_size::CaptureMultiplier;
use autocrop_core::capture::infrastructure::image_file_source::ImageFileSource;
use autocrop_core::cropping::domain::cropper::{CropExtent, Cropper};
use autocrop_core::persistence::domain::output_name::Timestamp;
use autocrop_core::persistence::infrastructure::image_file_reader::ImageFileReader;
use autocrop_core::persistence::infrastructure::png_file_writer::PngFileWriter;
use autocrop_core::pipeline::crop_batch_use_case::{default_workers, BatchConfig, CropBatchUseCase};
use autocrop_core::pipeline::crop_image_use_case::CropImageUseCase;
use autocrop_core::shared::constants::IMAGE_EXTENSIONS;

use settings::Settings;

/// Crop rendered images to their visible pixels.
#[derive(Parser)]
#[command(name = "autocrop", version)]
struct Cli {
    /// Input images or directories of images.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output directory (defaults to the settings file, then the input's directory).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Pad the crop to a transparent square.
    #[arg(long, conflicts_with = "no_square")]
    square: bool,

    /// Do not pad, even if the saved settings say so.
    #[arg(long)]
    no_square: bool,

    /// Keep the right column and top row of the visible bounds.
    #[arg(long, conflicts_with = "legacy")]
    inclusive: bool,

    /// Drop the right column and top row, even if the saved settings say otherwise.
    #[arg(long)]
    legacy: bool,

    /// Capture size multiplier relative to the source resolution (0.1-3.0).
    #[arg(short, long)]
    multiplier: Option<f32>,

    /// Worker threads for batch mode.
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Store the effective options as the new defaults.
    #[arg(long)]
    save_settings: bool,
}

/// Flags merged over the saved settings.
#[derive(Debug, PartialEq)]
struct Options {
    cropper: Cropper,
    multiplier: CaptureMultiplier,
    output_dir: Option<PathBuf>,
    jobs: usize,
}

impl Options {
    fn resolve(cli: &Cli, settings: &Settings) -> Result<Self, Box<dyn std::error::Error>> {
        let extent = if cli.inclusive {
            CropExtent::Inclusive
        } else if cli.legacy {
            CropExtent::Legacy
        } else {
            settings.extent.into()
        };
        let square = if cli.square || cli.no_square {
            cli.square
        } else {
            settings.square
        };
        let multiplier = CaptureMultiplier::new(cli.multiplier.unwrap_or(settings.multiplier))?;
        let jobs = cli.jobs.or(settings.jobs).unwrap_or_else(default_workers);
        if jobs == 0 {
            return Err("Jobs must be at least 1".into());
        }
        Ok(Self {
            cropper: Cropper::new(square).with_extent(extent),
            multiplier,
            output_dir: cli.output_dir.clone().or_else(|| settings.output_dir.clone()),
            jobs,
        })
    }

    fn to_settings(&self) -> Settings {
        Settings {
            square: self.cropper.square(),
            extent: self.cropper.extent().into(),
            multiplier: self.multiplier.value(),
            output_dir: self.output_dir.clone(),
            jobs: Some(self.jobs),
        }
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let options = Options::resolve(&cli, &Settings::load())?;
    if cli.save_settings {
        let path = options.to_settings().save()?;
        log::info!("Saved settings to {}", path.display());
    }

    let inputs = expand_inputs(&cli.inputs)?;
    if inputs.is_empty() {
        return Err("No images found in the given inputs".into());
    }

    let single = cli.inputs.len() == 1 && !cli.inputs[0].is_dir();
    if single {
        run_single(&inputs[0], &options)
    } else {
        if ignores_multiplier(&cli, single) {
            log::warn!("--multiplier only applies to single captures; ignoring it in batch mode");
        }
        run_batch(inputs, &options)
    }
}

/// Only an explicit `-m` is worth a warning; a saved multiplier is silently unused.
fn ignores_multiplier(cli: &Cli, single: bool) -> bool {
    !single && cli.multiplier.is_some()
}

fn run_single(input: &Path, options: &Options) -> Result<(), Box<dyn std::error::Error>> {
    let source = ImageFileSource::open(input, &ImageFileReader::new())?;
    let output_dir = options
        .output_dir
        .clone()
        .unwrap_or_else(|| parent_dir(input));

    let mut use_case = CropImageUseCase::new(
        Box::new(source),
        Box::new(PngFileWriter::new()),
        options.cropper,
        options.multiplier,
    );
    let report = use_case.execute(&output_dir, Timestamp::now())?;
    println!("{}", report.path.display());
    Ok(())
}

fn run_batch(inputs: Vec<PathBuf>, options: &Options) -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = options
        .output_dir
        .clone()
        .unwrap_or_else(|| parent_dir(&inputs[0]));

    let use_case = CropBatchUseCase::new(
        Arc::new(ImageFileReader::new()),
        Arc::new(PngFileWriter::new()),
        options.cropper,
    );
    let config = BatchConfig {
        workers: options.jobs,
        on_progress: Some(Box::new(|current, total| {
            eprint!("\rCropping file {current}/{total}");
            true
        })),
        ..BatchConfig::default()
    };

    let report = use_case.execute(CropBatchUseCase::plan(&inputs, &output_dir), config);
    eprintln!();
    for item in &report.succeeded {
        println!("{}", item.output.display());
    }
    for failure in &report.failed {
        eprintln!("Failed: {}: {}", failure.input.display(), failure.error);
    }

    if report.succeeded.is_empty() {
        return Err(format!("None of the {} file(s) could be cropped", inputs.len()).into());
    }
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    for input in &cli.inputs {
        if !input.exists() {
            return Err(format!("Input not found: {}", input.display()).into());
        }
    }
    if cli.jobs == Some(0) {
        return Err("Jobs must be at least 1".into());
    }
    Ok(())
}

/// Files are kept as given; directories contribute their images, sorted by name.
fn expand_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found: Vec<PathBuf> = std::fs::read_dir(input)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && is_image(p))
                .collect();
            found.sort();
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }
    Ok(files)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}
