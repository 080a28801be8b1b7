use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::cropping::domain::bounding_box::BoundingBox;
use crate::cropping::domain::cropper::Cropper;
use crate::persistence::domain::image_reader::ImageReader;
use crate::persistence::domain::image_writer::ImageWriter;
use crate::persistence::domain::output_name::{cropped_file_name, numbered_cropped_file_name};

const DEFAULT_CHANNEL_CAPACITY: usize = 16;

/// One file to trim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CropJob {
    pub index: usize,
    pub input: PathBuf,
    pub output: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchItem {
    pub index: usize,
    pub input: PathBuf,
    pub output: PathBuf,
    pub bounds: BoundingBox,
    pub output_size: (u32, u32),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchFailure {
    pub index: usize,
    pub input: PathBuf,
    pub error: String,
}

/// Outcome of a batch run, both lists ordered by job index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub succeeded: Vec<BatchItem>,
    pub failed: Vec<BatchFailure>,
    pub cancelled: bool,
}

impl BatchReport {
    pub fn processed(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

/// Configuration for a batch run.
pub struct BatchConfig {
    pub workers: usize,
    /// Called with `(done, total)` after each job; returning `false` cancels.
    pub on_progress: Option<Box<dyn Fn(usize, usize) -> bool + Send>>,
    pub cancelled: Arc<AtomicBool>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            on_progress: None,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }
}

/// Number of workers when none is configured.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

type JobResult = Result<BatchItem, BatchFailure>;

/// Trims many image files concurrently.
///
/// Layout: `feeder → [worker × N: read → trim → write] → main (collect)`
///
/// Each worker owns the buffers it decodes; the only shared state is the
/// reader/writer pair and the cancel flag. A failing file is recorded and
/// the batch carries on.
pub struct CropBatchUseCase {
    reader: Arc<dyn ImageReader>,
    writer: Arc<dyn ImageWriter>,
    cropper: Cropper,
    channel_capacity: usize,
}

impl CropBatchUseCase {
    pub fn new(reader: Arc<dyn ImageReader>, writer: Arc<dyn ImageWriter>, cropper: Cropper) -> Self {
        Self {
            reader,
            writer,
            cropper,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    /// Maps each input to `<output_dir>/<stem>_cropped.png`.
    ///
    /// Inputs sharing a stem (`a/icon.png` and `b/icon.tga`) get numbered
    /// names (`icon_1_cropped.png`) so no job overwrites another's output.
    /// Names are compared case-insensitively.
    pub fn plan(inputs: &[PathBuf], output_dir: &Path) -> Vec<CropJob> {
        let mut taken = HashSet::new();
        inputs
            .iter()
            .enumerate()
            .map(|(index, input)| {
                let mut name = cropped_file_name(input);
                let mut n = 0;
                while !taken.insert(name.to_lowercase()) {
                    n += 1;
                    name = numbered_cropped_file_name(input, n);
                }
                if n > 0 {
                    log::debug!("{} renamed to {name} to avoid a clash", input.display());
                }
                CropJob {
                    index,
                    input: input.clone(),
                    output: output_dir.join(name),
                }
            })
            .collect()
    }

    pub fn execute(&self, jobs: Vec<CropJob>, config: BatchConfig) -> BatchReport {
        let total = jobs.len();
        let workers = config.workers.clamp(1, total.max(1));
        log::info!("Cropping {total} file(s) with {workers} worker(s)");

        let (job_tx, job_rx) = crossbeam_channel::bounded::<CropJob>(self.channel_capacity);
        let (result_tx, result_rx) = crossbeam_channel::unbounded::<JobResult>();

        let feeder = spawn_feeder(jobs, job_tx, config.cancelled.clone());
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                spawn_worker(
                    self.reader.clone(),
                    self.writer.clone(),
                    self.cropper,
                    job_rx.clone(),
                    result_tx.clone(),
                    config.cancelled.clone(),
                )
            })
            .collect();
        drop(job_rx);
        drop(result_tx);

        let mut report = collect_results(result_rx, total, &config);
        join_threads(feeder, handles, &mut report);

        report.cancelled |= config.cancelled.load(Ordering::Relaxed);
        report.succeeded.sort_by_key(|item| item.index);
        report.failed.sort_by_key(|f| f.index);
        log::info!(
            "Batch finished: {} cropped, {} failed{}",
            report.succeeded.len(),
            report.failed.len(),
            if report.cancelled { " (cancelled)" } else { "" }
        );
        report
    }
}

fn spawn_feeder(
    jobs: Vec<CropJob>,
    job_tx: crossbeam_channel::Sender<CropJob>,
    cancelled: Arc<AtomicBool>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        for job in jobs {
            if cancelled.load(Ordering::Relaxed) {
                break;
            }
            if job_tx.send(job).is_err() {
                break;
            }
        }
    })
}

fn spawn_worker(
    reader: Arc<dyn ImageReader>,
    writer: Arc<dyn ImageWriter>,
    cropper: Cropper,
    job_rx: crossbeam_channel::Receiver<CropJob>,
    result_tx: crossbeam_channel::Sender<JobResult>,
    cancelled: Arc<AtomicBool>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        for job in job_rx {
            if cancelled.load(Ordering::Relaxed) {
                break;
            }
            let result = process_job(&job, &*reader, &*writer, &cropper).map_err(|e| {
                BatchFailure {
                    index: job.index,
                    input: job.input.clone(),
                    error: e.to_string(),
                }
            });
            if result_tx.send(result).is_err() {
                break;
            }
        }
    })
}

fn process_job(
    job: &CropJob,
    reader: &dyn ImageReader,
    writer: &dyn ImageWriter,
    cropper: &Cropper,
) -> Result<BatchItem, Box<dyn std::error::Error>> {
    let buffer = reader.read(&job.input)?;
    let trimmed = cropper.trim(&buffer)?;
    writer.write(&job.output, &trimmed.buffer)?;
    Ok(BatchItem {
        index: job.index,
        input: job.input.clone(),
        output: job.output.clone(),
        bounds: trimmed.bounds,
        output_size: trimmed.buffer.dimensions(),
    })
}

/// Drains worker results on the calling thread, reporting progress.
fn collect_results(
    result_rx: crossbeam_channel::Receiver<JobResult>,
    total: usize,
    config: &BatchConfig,
) -> BatchReport {
    let mut report = BatchReport::default();

    for result in result_rx {
        match result {
            Ok(item) => {
                log::debug!(
                    "{} -> {} ({}x{})",
                    item.input.display(),
                    item.output.display(),
                    item.output_size.0,
                    item.output_size.1
                );
                report.succeeded.push(item);
            }
            Err(failure) => {
                log::warn!("Skipping {}: {}", failure.input.display(), failure.error);
                report.failed.push(failure);
            }
        }

        if let Some(ref callback) = config.on_progress {
            if !callback(report.processed(), total) {
                config.cancelled.store(true, Ordering::Relaxed);
            }
        }
    }

    report
}

fn join_threads(feeder: JoinHandle<()>, workers: Vec<JoinHandle<()>>, report: &mut BatchReport) {
    if feeder.join().is_err() {
        log::error!("Feeder thread panicked");
        report.cancelled = true;
    }
    for handle in workers {
        if handle.join().is_err() {
            log::error!("Worker thread panicked");
        }
    }
}
