use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::Context;
use image::codecs::gif::GifDecoder;
use image::imageops::{self, FilterType};
use image::{AnimationDecoder, RgbaImage};

use crate::models::Viewport;

/// Supplies the decoded frame sequence for an item: ordered, finite and
/// restartable (the same item can be requested again after navigating
/// away). Decode failures are reported as errors and handled by the
/// session as a skip, never as a crash.
pub trait SequenceSource {
    fn load(&self, item: &str) -> anyhow::Result<Vec<RgbaImage>>;
}

/// Loads animated GIFs from a flat directory and resizes every frame to
/// the display viewport.
pub struct GifFolderSource {
    dir: PathBuf,
    viewport: Viewport,
}

impl GifFolderSource {
    pub fn new(dir: impl Into<PathBuf>, viewport: Viewport) -> Self {
        Self {
            dir: dir.into(),
            viewport,
        }
    }
}

impl SequenceSource for GifFolderSource {
    fn load(&self, item: &str) -> anyhow::Result<Vec<RgbaImage>> {
        let path = self.dir.join(item);
        let reader = BufReader::new(
            File::open(&path).with_context(|| format!("failed to open {}", path.display()))?,
        );
        let decoder = GifDecoder::new(reader)
            .with_context(|| format!("failed to decode {}", path.display()))?;
        let frames = decoder
            .into_frames()
            .collect_frames()
            .with_context(|| format!("failed to decode frames of {}", path.display()))?;

        if frames.is_empty() {
            anyhow::bail!("{} contains no frames", path.display());
        }

        Ok(frames
            .into_iter()
            .map(|frame| {
                imageops::resize(
                    &frame.into_buffer(),
                    self.viewport.width,
                    self.viewport.height,
                    FilterType::Lanczos3,
                )
            })
            .collect())
    }
}
