use std::path::PathBuf;
use std::time::Duration;

use image::RgbaImage;
use thiserror::Error;

use crate::label::angle;
use crate::label::catalog::{Catalog, CatalogError};
use crate::label::frames::SequenceSource;
use crate::label::playback::Playback;
use crate::label::store::{LabelMap, LabelStore, StoreError};
use crate::models::{Point, Progress, Viewport};

const GIF_EXTENSIONS: &[&str] = &["gif"];

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub source_dir: PathBuf,
    pub store_path: PathBuf,
    pub viewport: Viewport,
    pub period: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("gifs"),
            store_path: PathBuf::from("labels.csv"),
            viewport: Viewport::default(),
            period: Duration::from_millis(100),
        }
    }
}

/// Conditions that abort session startup. Everything recoverable during a
/// running session is a [`Notice`] instead.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// User-visible, non-fatal feedback from a session operation. The
/// front-end decides how to present these; the controller only reports
/// what happened.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// A new item landed on display.
    Loaded { index: usize, name: String },
    /// Navigation past the last item; the cursor did not move.
    EndOfSequence,
    /// Navigation before the first item; the cursor did not move.
    StartOfSequence,
    /// Every item already has a label; navigation fell back to `advance`.
    AllLabeled,
    /// The item could not be decoded and was skipped.
    SkippedUnreadable { name: String, reason: String },
    /// The pending selection was promoted into the store.
    Saved { name: String, angle: f64 },
    /// The current item's label was removed from the store.
    Removed { name: String },
    /// Save was requested with no pending selection; nothing was written.
    NoSelection,
    /// A click committed this angle as the pending selection.
    Selected { angle: f64 },
}

/// The labeling session: the ordered item catalog, the label mapping, the
/// cursor, the pending selection and playback bookkeeping, all owned by
/// one object so the front-end holds no session state of its own.
///
/// Operations are synchronous and run on a single event loop; their
/// atomicity comes from that, not from any locking.
pub struct Session {
    catalog: Catalog,
    store: LabelStore,
    labels: LabelMap,
    cursor: usize,
    pending: Option<f64>,
    playback: Playback,
    viewport: Viewport,
    source: Box<dyn SequenceSource>,
    frames: Vec<RgbaImage>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("catalog", &self.catalog)
            .field("store", &self.store)
            .field("labels", &self.labels)
            .field("cursor", &self.cursor)
            .field("pending", &self.pending)
            .field("playback", &self.playback)
            .field("viewport", &self.viewport)
            .field("source", &"<dyn SequenceSource>")
            .field("frames", &self.frames.len())
            .finish()
    }
}

impl Session {
    /// Scan the source directory, parse the label store and land on the
    /// first unlabeled item (or item 0 for review when everything is
    /// labeled already). Returns the session together with the notices
    /// produced by the initial landing.
    pub fn open(
        options: SessionOptions,
        source: Box<dyn SequenceSource>,
    ) -> Result<(Self, Vec<Notice>), SessionError> {
        let catalog = Catalog::scan(&options.source_dir, GIF_EXTENSIONS)?;
        let store = LabelStore::new(&options.store_path);
        let labels = store.load()?;

        let start = catalog
            .items()
            .iter()
            .position(|name| !labels.contains_key(name))
            .unwrap_or(0);

        let mut session = Self {
            catalog,
            store,
            labels,
            cursor: start,
            pending: None,
            playback: Playback::new(options.period),
            viewport: options.viewport,
            source,
            frames: Vec::new(),
        };
        let notices = session.land(start);
        Ok((session, notices))
    }

    // --- navigation ---

    /// Move one item forward, or report `EndOfSequence` at the last item.
    pub fn advance(&mut self) -> Vec<Notice> {
        if self.cursor + 1 < self.catalog.len() {
            self.land(self.cursor + 1)
        } else {
            vec![Notice::EndOfSequence]
        }
    }

    /// Move one item back, or report `StartOfSequence` at the first item.
    pub fn retreat(&mut self) -> Vec<Notice> {
        if self.cursor > 0 {
            self.land(self.cursor - 1)
        } else {
            vec![Notice::StartOfSequence]
        }
    }

    /// Circular scan, starting just after the cursor and wrapping at the
    /// end, for the next item without a label. Falls back to `advance`
    /// with an `AllLabeled` notice when the scan finds nothing.
    pub fn seek_next_unlabeled(&mut self) -> Vec<Notice> {
        let count = self.catalog.len();
        for step in 1..count {
            let index = (self.cursor + step) % count;
            if !self.labels.contains_key(self.catalog.name_at(index)) {
                return self.land(index);
            }
        }

        let mut notices = vec![Notice::AllLabeled];
        notices.extend(self.advance());
        notices
    }

    /// Land on `index`: cancel playback, reset the pending selection
    /// (repopulated from the stored label when one exists) and load the
    /// item's frames. An unreadable item is reported and skipped by
    /// advancing; an unreadable final item leaves the cursor on it with
    /// nothing on display.
    fn land(&mut self, index: usize) -> Vec<Notice> {
        let mut notices = Vec::new();
        let mut index = index;
        loop {
            self.cursor = index;
            self.playback.cancel();
            self.frames.clear();
            let name = self.catalog.name_at(index).to_string();
            self.pending = self.labels.get(&name).copied();

            match self.source.load(&name) {
                Ok(frames) => {
                    self.playback.start(frames.len());
                    self.frames = frames;
                    notices.push(Notice::Loaded { index, name });
                    return notices;
                }
                Err(e) => {
                    notices.push(Notice::SkippedUnreadable {
                        name,
                        reason: format!("{e:#}"),
                    });
                    if index + 1 < self.catalog.len() {
                        index += 1;
                    } else {
                        notices.push(Notice::EndOfSequence);
                        return notices;
                    }
                }
            }
        }
    }

    // --- pointer interaction ---

    /// Angle under the pointer. Pure: hover feedback never touches the
    /// pending selection.
    pub fn pointer_angle(&self, p: Point) -> f64 {
        angle::from_pointer(self.viewport, p)
    }

    /// Commit the angle under a click as the pending selection. Clicks
    /// outside the display region are ignored.
    pub fn select(&mut self, p: Point) -> Option<Notice> {
        if !self.viewport.contains(p) {
            return None;
        }
        let angle = angle::from_pointer(self.viewport, p);
        self.pending = Some(angle);
        Some(Notice::Selected { angle })
    }

    // --- persistence ---

    /// Promote the pending selection into the label mapping and rewrite
    /// the store, then move on to the next unlabeled item.
    ///
    /// The rewrite happens against a candidate mapping; the in-memory
    /// mapping is only replaced once the write has succeeded, so a failed
    /// write leaves memory and disk agreeing on the pre-save state.
    pub fn save(&mut self) -> Result<Vec<Notice>, StoreError> {
        let Some(angle) = self.pending else {
            return Ok(vec![Notice::NoSelection]);
        };
        let name = self.current_name().to_string();

        let mut candidate = self.labels.clone();
        candidate.insert(name.clone(), angle);
        self.store.write(self.catalog.items(), &candidate)?;
        self.labels = candidate;

        let mut notices = vec![Notice::Saved { name, angle }];
        notices.extend(self.seek_next_unlabeled());
        Ok(notices)
    }

    /// Remove the current item's label and rewrite the store. A silent
    /// no-op when the item has no label. Same write-then-commit discipline
    /// as `save`.
    pub fn undo(&mut self) -> Result<Vec<Notice>, StoreError> {
        let name = self.current_name().to_string();
        if !self.labels.contains_key(&name) {
            return Ok(Vec::new());
        }

        let mut candidate = self.labels.clone();
        candidate.remove(&name);
        self.store.write(self.catalog.items(), &candidate)?;
        self.labels = candidate;
        self.pending = None;

        Ok(vec![Notice::Removed { name }])
    }

    // --- playback ---

    /// Advance playback by one frame; stale generations are rejected.
    pub fn tick(&mut self, generation: u64) -> Option<usize> {
        self.playback.tick(generation)
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    /// The frame currently on display, if the item decoded at all.
    pub fn current_frame(&self) -> Option<&RgbaImage> {
        self.frames.get(self.playback.current_frame())
    }

    // --- views ---

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current_name(&self) -> &str {
        self.catalog.name_at(self.cursor)
    }

    pub fn pending(&self) -> Option<f64> {
        self.pending
    }

    /// The stored label for the current item, if any.
    pub fn saved_angle(&self) -> Option<f64> {
        self.labels.get(self.current_name()).copied()
    }

    pub fn labels(&self) -> &LabelMap {
        &self.labels
    }

    pub fn items(&self) -> &[String] {
        self.catalog.items()
    }

    /// Labeled items versus catalog size, derived on demand.
    pub fn progress(&self) -> Progress {
        Progress {
            labeled: self
                .catalog
                .items()
                .iter()
                .filter(|name| self.labels.contains_key(*name))
                .count(),
            total: self.catalog.len(),
        }
    }
}
