use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};

use giflabel::generate::{self, GenerateConfig};
use giflabel::{SessionOptions, Viewport};

#[derive(Parser)]
#[command(name = "giflabel")]
#[command(about = "Label the motion angle in animated GIFs, and synthesize them from stills")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the angle-labeling session
    Label {
        /// Directory containing the GIFs to label (a folder picker opens
        /// when omitted and no ./gifs directory exists)
        #[arg(value_name = "DIR")]
        dir: Option<PathBuf>,

        /// Label store file
        #[arg(long, default_value = "labels.csv")]
        store: PathBuf,

        /// Display region width in pixels
        #[arg(long, default_value_t = 400)]
        width: u32,

        /// Display region height in pixels
        #[arg(long, default_value_t = 200)]
        height: u32,

        /// Playback frame period in milliseconds
        #[arg(long, default_value_t = 100)]
        period_ms: u64,
    },

    /// Render wedge GIFs from a manifest of sequence descriptions
    Generate {
        /// JSON manifest of sequences (center, direction, frame range)
        #[arg(long)]
        manifest: PathBuf,

        /// Directory of still frames to slice
        #[arg(long)]
        frames: PathBuf,

        /// Output directory for the rendered GIFs
        #[arg(long, default_value = "gifs")]
        out: PathBuf,

        /// Wedge radius in pixels
        #[arg(long, default_value_t = 128.0)]
        radius: f64,

        /// Output frame rate
        #[arg(long, default_value_t = 24)]
        fps: u32,

        /// Worker threads (0 = one per core)
        #[arg(long, default_value_t = 0)]
        workers: usize,

        /// Output filename prefix (default: the dataset directory name)
        #[arg(long)]
        prefix: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    match args.command {
        Commands::Label {
            dir,
            store,
            width,
            height,
            period_ms,
        } => {
            let options = SessionOptions {
                source_dir: resolve_source_dir(dir)?,
                store_path: store,
                viewport: Viewport::new(width, height),
                period: Duration::from_millis(period_ms),
            };
            run_label(options)
        }

        Commands::Generate {
            manifest,
            frames,
            out,
            radius,
            fps,
            workers,
            prefix,
        } => {
            let config = GenerateConfig {
                manifest,
                frames_dir: frames,
                out_dir: out,
                radius,
                fps,
                workers,
                prefix,
                verbose: args.verbose,
            };

            let report = generate::run(&config)?;
            println!("Rendered {} GIFs to {}", report.outputs.len(), config.out_dir.display());

            if !report.failures.is_empty() {
                eprintln!("{} sequence(s) failed:", report.failures.len());
                for (entry, reason) in &report.failures {
                    eprintln!("  entry {entry}: {reason}");
                }
                anyhow::bail!("{} of {} sequences failed", report.failures.len(),
                    report.failures.len() + report.outputs.len());
            }
            Ok(())
        }
    }
}

/// Use the given directory, fall back to ./gifs, otherwise (gui builds
/// only) ask with a folder picker.
fn resolve_source_dir(dir: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(dir) = dir {
        return Ok(dir);
    }
    let default = PathBuf::from("gifs");
    if default.is_dir() {
        return Ok(default);
    }
    pick_source_dir().context("no source directory given")
}

#[cfg(feature = "gui")]
fn pick_source_dir() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Choose the GIF directory to label")
        .pick_folder()
}

#[cfg(not(feature = "gui"))]
fn pick_source_dir() -> Option<PathBuf> {
    None
}

#[cfg(feature = "gui")]
fn run_label(options: SessionOptions) -> anyhow::Result<()> {
    giflabel::gui::run(options)
}

#[cfg(not(feature = "gui"))]
fn run_label(_options: SessionOptions) -> anyhow::Result<()> {
    anyhow::bail!("this build has no labeling UI; rebuild with `--features gui`")
}
