use std::collections::HashSet;
use std::fs::{self, File};
use std::path::Path;
use std::time::Duration;

use giflabel::generate;
use giflabel::{Point, SequenceSource, SessionOptions, Viewport};
use image::{Rgba, RgbaImage};
use tempfile::TempDir;

/// Creates a temp directory containing one small two-frame animated GIF
/// per name. The directory is cleaned up when dropped.
pub fn animated_gif_dir(names: &[&str]) -> TempDir {
    let dir = TempDir::new().expect("failed to create temp directory");
    for name in names {
        let frames = vec![
            RgbaImage::from_pixel(16, 16, Rgba([255, 0, 0, 255])),
            RgbaImage::from_pixel(16, 16, Rgba([0, 0, 255, 255])),
        ];
        generate::write_gif(&dir.path().join(name), frames, 10).expect("failed to write test gif");
    }
    dir
}

/// Creates a temp directory of empty placeholder files. Only the catalog
/// sees these; pair with [`StubSource`] so nothing tries to decode them.
pub fn placeholder_gif_dir(names: &[&str]) -> TempDir {
    let dir = TempDir::new().expect("failed to create temp directory");
    for name in names {
        File::create(dir.path().join(name)).expect("failed to create placeholder");
    }
    dir
}

/// Writes a label store file with the standard header.
pub fn write_store(path: &Path, rows: &[(&str, f64)]) {
    let mut text = String::from("filename,angle\n");
    for (name, angle) in rows {
        text.push_str(&format!("{name},{angle:.2}\n"));
    }
    fs::write(path, text).expect("failed to write store fixture");
}

/// Session options rooted in a fixture directory, with the store file
/// kept alongside the GIFs (the catalog's extension filter ignores it).
pub fn options_in(dir: &TempDir) -> SessionOptions {
    SessionOptions {
        source_dir: dir.path().to_path_buf(),
        store_path: dir.path().join("labels.csv"),
        viewport: Viewport::default(),
        period: Duration::from_millis(100),
    }
}

/// A sequence source with a fixed frame count per item and an optional
/// set of items that fail to decode.
pub struct StubSource {
    pub frame_count: usize,
    pub unreadable: HashSet<String>,
}

impl StubSource {
    pub fn new(frame_count: usize) -> Self {
        Self {
            frame_count,
            unreadable: HashSet::new(),
        }
    }

    pub fn with_unreadable(mut self, names: &[&str]) -> Self {
        self.unreadable = names.iter().map(|s| s.to_string()).collect();
        self
    }
}

impl SequenceSource for StubSource {
    fn load(&self, item: &str) -> anyhow::Result<Vec<RgbaImage>> {
        if self.unreadable.contains(item) {
            anyhow::bail!("stub decode failure for {item}");
        }
        Ok((0..self.frame_count)
            .map(|_| RgbaImage::new(4, 4))
            .collect())
    }
}

/// A pointer position that maps back to `angle` under the session's
/// angle formula, at distance 100 from the origin.
pub fn pointer_for(viewport: Viewport, angle: f64) -> Point {
    let origin = viewport.origin();
    let rads = (180.0 - angle).to_radians();
    Point::new(origin.x + 100.0 * rads.cos(), origin.y + 100.0 * rads.sin())
}
