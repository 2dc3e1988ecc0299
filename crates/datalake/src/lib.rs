//! Durable local storage for header/body pairs (spec.md §4.1).

pub mod placement;
pub mod tracking;

use common::AppError;
use gutenberg::BookId;
use placement::{BucketPlacement, PlacementPolicy, TimestampPlacement};
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn header_filename(id: BookId) -> String {
    format!("{id}_header.txt")
}

fn body_filename(id: BookId) -> String {
    format!("{id}_body.txt")
}

/// Persists and retrieves header/body pairs for ingested books, and tracks
/// which identifiers are present on this node.
pub struct Datalake {
    root: PathBuf,
    tracking_path: PathBuf,
    policy: Arc<dyn PlacementPolicy>,
}

impl Datalake {
    pub fn new(root: impl Into<PathBuf>, tracking_filename: &str, policy: Arc<dyn PlacementPolicy>) -> Self {
        let root = root.into();
        let tracking_path = root.join(tracking_filename);
        Self { root, tracking_path, policy }
    }

    pub fn bucket(root: impl Into<PathBuf>, tracking_filename: &str, bucket_size: u64) -> Self {
        Self::new(root, tracking_filename, Arc::new(BucketPlacement { bucket_size }))
    }

    pub fn timestamp(root: impl Into<PathBuf>, tracking_filename: &str) -> Self {
        Self::new(root, tracking_filename, Arc::new(TimestampPlacement))
    }

    /// Writes `<id>_header.txt` and `<id>_body.txt`, then records `id` in
    /// the tracking file. Returns the directory the pair was written to.
    pub fn save(&self, id: BookId, header: &str, body: &str) -> Result<String, AppError> {
        let now = chrono::Local::now();
        let dir = self.policy.dir_for_save(&self.root, id, now);
        std::fs::create_dir_all(&dir)?;

        std::fs::write(dir.join(header_filename(id)), header)?;
        std::fs::write(dir.join(body_filename(id)), body)?;

        tracking::append_entry(&self.tracking_path, self.policy.as_ref(), id, &dir)?;

        Ok(dir.to_string_lossy().into_owned())
    }

    fn resolve_dir(&self, id: BookId) -> Result<PathBuf, AppError> {
        if let Some(dir) = tracking::lookup_dir(&self.tracking_path, self.policy.as_ref(), id)? {
            return Ok(dir);
        }
        if let Some(dir) = self.policy.compute_dir(&self.root, id) {
            if dir.join(body_filename(id)).exists() {
                return Ok(dir);
            }
        }
        Err(AppError::NotFound(format!("book {id} not present in datalake")))
    }

    pub fn read_header(&self, id: BookId) -> Result<String, AppError> {
        let dir = self.resolve_dir(id)?;
        std::fs::read_to_string(dir.join(header_filename(id))).map_err(AppError::from)
    }

    pub fn read_body(&self, id: BookId) -> Result<String, AppError> {
        let dir = self.resolve_dir(id)?;
        std::fs::read_to_string(dir.join(body_filename(id))).map_err(AppError::from)
    }

    pub fn is_present(&self, id: BookId) -> bool {
        match self.resolve_dir(id) {
            Ok(dir) => dir.join(header_filename(id)).exists() && dir.join(body_filename(id)).exists(),
            Err(_) => false,
        }
    }

    pub fn path_of(&self, id: BookId) -> Option<String> {
        self.resolve_dir(id).ok().map(|d| d.to_string_lossy().into_owned())
    }

    /// Sorted identifiers from the tracking file.
    pub fn list_ids(&self) -> Result<Vec<BookId>, AppError> {
        tracking::list_ids(&self.tracking_path, self.policy.as_ref())
    }

    /// Walks the datalake directory tree and returns sorted identifiers
    /// deduced from `<N>_body.txt` filenames. Used only when the tracking
    /// file is missing or unusable (disaster recovery, spec.md §4.3).
    pub fn scan_ids(&self) -> Vec<BookId> {
        let mut ids: Vec<BookId> = walkdir::WalkDir::new(&self.root)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let name = entry.file_name().to_str()?.to_string();
                let n = name.strip_suffix("_body.txt")?;
                BookId::new(n.parse().ok()?)
            })
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
