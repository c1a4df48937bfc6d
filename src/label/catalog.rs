use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("source directory not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("no matching files in {dir} (looked for {extensions:?})")]
    NoItemsFound {
        dir: PathBuf,
        extensions: Vec<String>,
    },
}

/// The ordered item collection for a labeling session. Discovered once at
/// session start and immutable afterwards; the sort order of filenames is
/// the canonical navigation and persistence order.
#[derive(Debug, Clone)]
pub struct Catalog {
    dir: PathBuf,
    items: Vec<String>,
}

impl Catalog {
    /// Enumerate all files in `dir` matching one of `extensions`
    /// (case-insensitive), sorted lexicographically by filename.
    pub fn scan(dir: &Path, extensions: &[&str]) -> Result<Self, CatalogError> {
        let items = list_files(dir, extensions)?
            .into_iter()
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();

        Ok(Self {
            dir: dir.to_path_buf(),
            items,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn name_at(&self, index: usize) -> &str {
        &self.items[index]
    }

    pub fn path_at(&self, index: usize) -> PathBuf {
        self.dir.join(&self.items[index])
    }
}

/// Sorted listing of the files directly inside `dir` whose extension
/// matches one of `extensions`, compared case-insensitively. Shared by the
/// session catalog (.gif) and the generator's still-frame listing.
pub fn list_files(dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>, CatalogError> {
    if !dir.is_dir() {
        return Err(CatalogError::SourceNotFound(dir.to_path_buf()));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .map(|ext| {
                    let ext = ext.to_string_lossy();
                    extensions.iter().any(|want| ext.eq_ignore_ascii_case(want))
                })
                .unwrap_or(false)
        })
        .map(|e| e.into_path())
        .collect();

    if files.is_empty() {
        return Err(CatalogError::NoItemsFound {
            dir: dir.to_path_buf(),
            extensions: extensions.iter().map(|s| s.to_string()).collect(),
        });
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
