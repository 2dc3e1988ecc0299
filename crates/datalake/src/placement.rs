//! Placement policies for the on-disk datalake layout (spec.md §4.1, §6).

use gutenberg::BookId;
use std::path::{Path, PathBuf};

/// Where a book's header/body pair lives on disk, and how that location is
/// recorded in the tracking file.
pub trait PlacementPolicy: Send + Sync {
    /// Directory for `id`, if it can be derived from the identifier alone
    /// (true for bucket placement, false for timestamp placement — the
    /// latter needs the save-time clock reading recorded in the tracking
    /// file instead).
    fn compute_dir(&self, root: &Path, id: BookId) -> Option<PathBuf>;

    /// The directory to actually write into for a fresh `save` at `now`.
    fn dir_for_save(&self, root: &Path, id: BookId, now: chrono::DateTime<chrono::Local>) -> PathBuf;

    /// Serializes a tracking-file entry for `id` stored at `dir`.
    fn tracking_line(&self, id: BookId, dir: &Path) -> String;

    /// Parses a tracking-file line back into `(id, path)`. `path` is `None`
    /// when the policy can recompute the directory from `id` alone.
    fn parse_tracking_line(&self, line: &str) -> Option<(BookId, Option<PathBuf>)>;
}

/// `<root>/bucket_<id / bucket_size>`.
pub struct BucketPlacement {
    pub bucket_size: u64,
}

impl PlacementPolicy for BucketPlacement {
    fn compute_dir(&self, root: &Path, id: BookId) -> Option<PathBuf> {
        let bucket = id.value() as u64 / self.bucket_size.max(1);
        Some(root.join(format!("bucket_{bucket}")))
    }

    fn dir_for_save(&self, root: &Path, id: BookId, _now: chrono::DateTime<chrono::Local>) -> PathBuf {
        self.compute_dir(root, id).expect("bucket dir always derivable")
    }

    fn tracking_line(&self, id: BookId, _dir: &Path) -> String {
        id.to_string()
    }

    fn parse_tracking_line(&self, line: &str) -> Option<(BookId, Option<PathBuf>)> {
        let id: u32 = line.trim().parse().ok()?;
        let id = BookId::new(id)?;
        Some((id, None))
    }
}

/// `<root>/<YYYYMMDD>/<HH>/<id>`, using the local clock at save time.
pub struct TimestampPlacement;

impl PlacementPolicy for TimestampPlacement {
    fn compute_dir(&self, _root: &Path, _id: BookId) -> Option<PathBuf> {
        None
    }

    fn dir_for_save(&self, root: &Path, id: BookId, now: chrono::DateTime<chrono::Local>) -> PathBuf {
        root.join(now.format("%Y%m%d").to_string())
            .join(now.format("%H").to_string())
            .join(id.to_string())
    }

    fn tracking_line(&self, id: BookId, dir: &Path) -> String {
        format!("{id}|{}", dir.display())
    }

    fn parse_tracking_line(&self, line: &str) -> Option<(BookId, Option<PathBuf>)> {
        let (id_part, path_part) = line.trim().split_once('|')?;
        let id = BookId::new(id_part.parse().ok()?)?;
        Some((id, Some(PathBuf::from(path_part))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u32) -> BookId {
        BookId::new(n).unwrap()
    }

    #[test]
    fn bucket_groups_ids_by_bucket_size() {
        let policy = BucketPlacement { bucket_size: 1000 };
        let root = Path::new("/data");
        assert_eq!(
            policy.compute_dir(root, id(1342)).unwrap(),
            PathBuf::from("/data/bucket_1")
        );
        assert_eq!(
            policy.compute_dir(root, id(999)).unwrap(),
            PathBuf::from("/data/bucket_0")
        );
    }

    #[test]
    fn bucket_tracking_line_roundtrips() {
        let policy = BucketPlacement { bucket_size: 1000 };
        let line = policy.tracking_line(id(42), Path::new("/data/bucket_0"));
        assert_eq!(line, "42");
        let (parsed_id, path) = policy.parse_tracking_line(&line).unwrap();
        assert_eq!(parsed_id, id(42));
        assert_eq!(path, None);
    }

    #[test]
    fn timestamp_tracking_line_roundtrips() {
        let policy = TimestampPlacement;
        let dir = Path::new("/data/20240101/13/42");
        let line = policy.tracking_line(id(42), dir);
        assert_eq!(line, "42|/data/20240101/13/42");
        let (parsed_id, path) = policy.parse_tracking_line(&line).unwrap();
        assert_eq!(parsed_id, id(42));
        assert_eq!(path, Some(dir.to_path_buf()));
    }

    #[test]
    fn timestamp_cannot_compute_dir_from_id_alone() {
        let policy = TimestampPlacement;
        assert!(policy.compute_dir(Path::new("/data"), id(1)).is_none());
    }
}
