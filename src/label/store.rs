use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// In-memory label mapping: item filename to angle in degrees. BTreeMap so
/// iteration order is stable, though rows are always emitted in catalog
/// order anyway.
pub type LabelMap = BTreeMap<String, f64>;

const HEADER: &str = "filename,angle";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("label store {path} is corrupt at line {line}: {reason}")]
    Corrupt {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("failed to read label store {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write label store {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Flat record file of item -> angle, one row per labeled item.
///
/// The store is always rewritten whole: a header row, then one
/// `<filename>,<angle>` row per labeled item in catalog order. Rewriting
/// everything on each save keeps the file free of duplicate or stale rows
/// at the cost of O(items) I/O, which is nothing at this scale.
#[derive(Debug, Clone)]
pub struct LabelStore {
    path: PathBuf,
}

impl LabelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse the store into a label mapping. A missing file is an empty
    /// mapping; a malformed row aborts with `Corrupt` rather than loading
    /// a partial mapping.
    pub fn load(&self) -> Result<LabelMap, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(LabelMap::new()),
            Err(e) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };

        let mut labels = LabelMap::new();
        // Line 1 is the header row.
        for (idx, row) in text.lines().enumerate().skip(1) {
            if row.trim().is_empty() {
                continue;
            }
            let (name, angle_field) =
                row.rsplit_once(',')
                    .ok_or_else(|| self.corrupt(idx + 1, "expected `filename,angle`"))?;
            if name.is_empty() {
                return Err(self.corrupt(idx + 1, "empty filename"));
            }
            let angle: f64 = angle_field
                .trim()
                .parse()
                .map_err(|_| self.corrupt(idx + 1, &format!("bad angle `{angle_field}`")))?;
            if !angle.is_finite() || !(0.0..=180.0).contains(&angle) {
                return Err(self.corrupt(idx + 1, &format!("angle {angle} outside [0, 180]")));
            }
            labels.insert(name.to_string(), angle);
        }

        Ok(labels)
    }

    /// Rewrite the store from `labels`, emitting rows in the order of
    /// `items`. The new content goes to a sibling temp file first and is
    /// renamed into place, so a failed write never leaves a partial store
    /// committed.
    pub fn write(&self, items: &[String], labels: &LabelMap) -> Result<(), StoreError> {
        let mut out = String::with_capacity(64 + labels.len() * 24);
        out.push_str(HEADER);
        out.push('\n');
        for name in items {
            if let Some(angle) = labels.get(name) {
                out.push_str(&format!("{name},{angle:.2}\n"));
            }
        }

        let tmp = self.path.with_extension("csv.tmp");
        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };
        fs::write(&tmp, out).map_err(write_err)?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            write_err(e)
        })
    }

    fn corrupt(&self, line: usize, reason: &str) -> StoreError {
        StoreError::Corrupt {
            path: self.path.clone(),
            line,
            reason: reason.to_string(),
        }
    }
}
