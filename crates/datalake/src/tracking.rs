//! The per-node tracking file: an append-and-rewrite log of identifiers
//! present in the datalake, serialized by an advisory file-range lock
//! (spec.md §4.1, §5).

use crate::placement::PlacementPolicy;
use common::AppError;
use fs4::FileExt;
use gutenberg::BookId;
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Opens (creating if absent) the tracking file and holds an exclusive
/// lock for the duration of the read-modify-write. Concurrent `save`s on
/// the same node serialize through this lock; cross-process safe because
/// the lock is taken on the file itself, not an in-memory mutex.
fn with_locked_tracking_file<R>(
    path: &Path,
    f: impl FnOnce(&mut File) -> Result<R, AppError>,
) -> Result<R, AppError> {
    let mut file = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .open(path)?;
    file.lock_exclusive()
        .map_err(|e| AppError::Io(std::io::Error::new(e.kind(), e.to_string())))?;
    let result = f(&mut file);
    // Best-effort: an error here doesn't change the outcome of `result`,
    // and the OS releases the lock on close regardless.
    let _ = FileExt::unlock(&file);
    result
}

fn read_existing_entries(
    file: &mut File,
    policy: &dyn PlacementPolicy,
) -> Result<BTreeMap<BookId, Option<PathBuf>>, AppError> {
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    let mut entries = BTreeMap::new();
    for line in contents.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if let Some((id, path)) = policy.parse_tracking_line(line) {
            entries.insert(id, path);
        }
    }
    Ok(entries)
}

/// Appends `id` (mapped to `dir`) to the tracking file, coalescing
/// duplicates and rewriting the file in ascending identifier order.
pub fn append_entry(
    tracking_path: &Path,
    policy: &dyn PlacementPolicy,
    id: BookId,
    dir: &Path,
) -> Result<(), AppError> {
    with_locked_tracking_file(tracking_path, |file| {
        use std::io::Seek;
        let mut entries = read_existing_entries(file, policy)?;
        entries.insert(id, Some(dir.to_path_buf()));

        let mut rewritten = String::new();
        for (entry_id, entry_dir) in &entries {
            let dir_ref = entry_dir.as_deref().unwrap_or(dir);
            rewritten.push_str(&policy.tracking_line(*entry_id, dir_ref));
            rewritten.push('\n');
        }

        file.set_len(0)?;
        file.seek(std::io::SeekFrom::Start(0))?;
        file.write_all(rewritten.as_bytes())?;
        file.flush()?;
        Ok(())
    })
}

/// Returns the sorted identifiers currently recorded in the tracking file.
pub fn list_ids(tracking_path: &Path, policy: &dyn PlacementPolicy) -> Result<Vec<BookId>, AppError> {
    if !tracking_path.exists() {
        return Ok(Vec::new());
    }
    with_locked_tracking_file(tracking_path, |file| {
        let entries = read_existing_entries(file, policy)?;
        Ok(entries.into_keys().collect())
    })
}

/// Resolves the recorded directory for `id`, if the tracking file carries
/// an explicit path for it (always true for timestamp placement; bucket
/// placement relies on the caller falling back to `compute_dir` instead).
pub fn lookup_dir(
    tracking_path: &Path,
    policy: &dyn PlacementPolicy,
    id: BookId,
) -> Result<Option<PathBuf>, AppError> {
    if !tracking_path.exists() {
        return Ok(None);
    }
    with_locked_tracking_file(tracking_path, |file| {
        let entries = read_existing_entries(file, policy)?;
        Ok(entries.get(&id).cloned().flatten())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::BucketPlacement;

    fn id(n: u32) -> BookId {
        BookId::new(n).unwrap()
    }

    #[test]
    fn append_then_list_returns_sorted_ids() {
        let dir = tempfile::tempdir().unwrap();
        let tracking = dir.path().join("tracking.txt");
        let policy = BucketPlacement { bucket_size: 1000 };

        append_entry(&tracking, &policy, id(50), Path::new("/data/bucket_0")).unwrap();
        append_entry(&tracking, &policy, id(10), Path::new("/data/bucket_0")).unwrap();
        append_entry(&tracking, &policy, id(30), Path::new("/data/bucket_0")).unwrap();

        assert_eq!(list_ids(&tracking, &policy).unwrap(), vec![id(10), id(30), id(50)]);
    }

    #[test]
    fn duplicate_appends_coalesce() {
        let dir = tempfile::tempdir().unwrap();
        let tracking = dir.path().join("tracking.txt");
        let policy = BucketPlacement { bucket_size: 1000 };

        append_entry(&tracking, &policy, id(10), Path::new("/data/bucket_0")).unwrap();
        append_entry(&tracking, &policy, id(10), Path::new("/data/bucket_0")).unwrap();

        assert_eq!(list_ids(&tracking, &policy).unwrap(), vec![id(10)]);
    }

    #[test]
    fn missing_tracking_file_lists_empty() {
        let dir = tempfile::tempdir().unwrap();
        let tracking = dir.path().join("missing.txt");
        let policy = BucketPlacement { bucket_size: 1000 };
        assert_eq!(list_ids(&tracking, &policy).unwrap(), Vec::new());
    }
}
