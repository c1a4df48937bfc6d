//! Batch synthesis of wedge GIFs from still frames.
//!
//! A JSON manifest describes one output sequence per entry: where the
//! half-circle wedge sits, which way it faces and which slice of the
//! still-frame listing it animates. Every entry becomes one independent
//! task on the worker pool; each task renders its frames and writes one
//! looping GIF.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::Context;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, ImageReader, RgbaImage};
use indicatif::ProgressBar;
use serde::Deserialize;

use crate::label::catalog;
use crate::models::Point;
use crate::pipeline::TaskPool;
use crate::render;

const STILL_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// One manifest entry. Field names are fixed by the upstream metadata
/// producer; `direction` is the observed motion bearing in degrees and
/// the frame indices are half-open into the sorted still listing.
#[derive(Debug, Clone, Deserialize)]
pub struct SequenceSpec {
    pub direction: f64,
    pub point1: (f64, f64),
    pub batch_start_index: usize,
    pub batch_end_index: usize,
}

impl SequenceSpec {
    /// The wedge opens opposite the recorded motion direction.
    pub fn facing_deg(&self) -> f64 {
        self.direction - 180.0
    }
}

#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub manifest: PathBuf,
    pub frames_dir: PathBuf,
    pub out_dir: PathBuf,
    pub radius: f64,
    pub fps: u32,
    /// 0 means one worker per available core.
    pub workers: usize,
    /// Output name prefix; defaults to the name of the frames directory's
    /// parent (the dataset directory).
    pub prefix: Option<String>,
    pub verbose: bool,
}

/// One unit of work for the pool: everything needed to render one GIF,
/// owned by the task so workers share no state.
#[derive(Debug, Clone)]
pub struct GifTask {
    pub stills: Vec<PathBuf>,
    pub center: Point,
    pub radius: f64,
    pub facing_deg: f64,
    pub fps: u32,
    pub output: PathBuf,
}

#[derive(Debug)]
pub struct GenerateReport {
    pub outputs: Vec<PathBuf>,
    /// (1-based manifest entry, error chain) per failed task.
    pub failures: Vec<(usize, String)>,
}

pub fn load_manifest(path: &Path) -> anyhow::Result<Vec<SequenceSpec>> {
    let reader = BufReader::new(
        File::open(path).with_context(|| format!("failed to open manifest {}", path.display()))?,
    );
    serde_json::from_reader(reader)
        .with_context(|| format!("failed to parse manifest {}", path.display()))
}

/// Turn manifest entries into pool tasks. Frame ranges are clamped to the
/// listing, like the original data producer's slicing; a range that
/// clamps to empty still becomes a task so its failure gets reported
/// instead of vanishing.
pub fn build_tasks(
    specs: &[SequenceSpec],
    stills: &[PathBuf],
    config: &GenerateConfig,
    prefix: &str,
) -> Vec<GifTask> {
    specs
        .iter()
        .enumerate()
        .map(|(idx, spec)| {
            let start = spec.batch_start_index.min(stills.len());
            let end = spec.batch_end_index.min(stills.len());
            let slice = if start < end { &stills[start..end] } else { &[] };

            GifTask {
                stills: slice.to_vec(),
                center: Point::new(spec.point1.0, spec.point1.1),
                radius: config.radius,
                facing_deg: spec.facing_deg(),
                fps: config.fps,
                output: config
                    .out_dir
                    .join(format!("{prefix}_output_{}.gif", idx + 1)),
            }
        })
        .collect()
}

/// Render one task: decode each still, apply the wedge transform, encode
/// the looping GIF.
pub fn render_task(task: &GifTask) -> anyhow::Result<PathBuf> {
    if task.stills.is_empty() {
        anyhow::bail!("frame range selects no stills");
    }

    let mut frames = Vec::with_capacity(task.stills.len());
    for path in &task.stills {
        let still = ImageReader::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?
            .decode()
            .with_context(|| format!("failed to decode {}", path.display()))?
            .to_rgba8();
        frames.push(render::wedge_frame(
            &still,
            task.center,
            task.radius,
            task.facing_deg,
        ));
    }

    write_gif(&task.output, frames, task.fps)
        .with_context(|| format!("failed to write {}", task.output.display()))?;
    Ok(task.output.clone())
}

/// Encode frames as an infinitely looping GIF at `fps`.
pub fn write_gif(path: &Path, frames: Vec<RgbaImage>, fps: u32) -> anyhow::Result<()> {
    let file = BufWriter::new(File::create(path)?);
    let mut encoder = GifEncoder::new_with_speed(file, 10);
    encoder.set_repeat(Repeat::Infinite)?;

    let frame_ms = 1000 / fps.max(1);
    for buffer in frames {
        let delay = Delay::from_numer_denom_ms(frame_ms, 1);
        encoder.encode_frame(Frame::from_parts(buffer, 0, 0, delay))?;
    }
    Ok(())
}

/// Run the whole batch: manifest in, one GIF per entry out, tasks spread
/// over the worker pool. Failed tasks are collected into the report;
/// they never block or discard the successful ones.
pub fn run(config: &GenerateConfig) -> anyhow::Result<GenerateReport> {
    let specs = load_manifest(&config.manifest)?;
    let stills = catalog::list_files(&config.frames_dir, STILL_EXTENSIONS)?;

    fs::create_dir_all(&config.out_dir).with_context(|| {
        format!(
            "failed to create output directory {}",
            config.out_dir.display()
        )
    })?;

    let prefix = match &config.prefix {
        Some(prefix) => prefix.clone(),
        None => default_prefix(&config.frames_dir),
    };
    let tasks = build_tasks(&specs, &stills, config, &prefix);

    let pool = if config.workers == 0 {
        TaskPool::with_available_parallelism()
    } else {
        TaskPool::new(config.workers)
    };
    if config.verbose {
        println!(
            "Rendering {} sequences from {} stills on {} workers",
            tasks.len(),
            stills.len(),
            pool.workers()
        );
    }

    let bar = ProgressBar::new(tasks.len() as u64);
    let reports = pool.run(tasks, |task| {
        let result = render_task(&task);
        bar.inc(1);
        result
    });
    bar.finish();

    let mut outputs = Vec::new();
    let mut failures = Vec::new();
    for report in reports {
        match report.result {
            Ok(path) => outputs.push(path),
            Err(e) => failures.push((report.index + 1, format!("{e:#}"))),
        }
    }
    Ok(GenerateReport { outputs, failures })
}

/// Dataset name for output files: the directory the frames directory
/// lives in, e.g. `CRG/frames` -> `CRG`.
fn default_prefix(frames_dir: &Path) -> String {
    frames_dir
        .parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sequence".to_string())
}
