//! Retention sweep over the images directory.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::Context;
use looper_core::retention::RetentionPolicy;

use crate::metadata_log::MetadataLog;
use crate::source::local::list_images;

#[derive(Debug, Default)]
pub struct CleanupReport {
    pub removed: Vec<PathBuf>,
    pub entries_dropped: usize,
}

/// Delete images that violate `policy` and forget their metadata entries.
///
/// Only supported image files directly inside `images_dir` are considered.
pub fn sweep(
    images_dir: &Path,
    policy: &RetentionPolicy,
    log: &mut MetadataLog,
    now: SystemTime,
) -> anyhow::Result<CleanupReport> {
    if policy.is_empty() || !images_dir.is_dir() {
        return Ok(CleanupReport::default());
    }
    let dir = images_dir
        .canonicalize()
        .with_context(|| format!("resolve {}", images_dir.display()))?;

    let files: Vec<(PathBuf, SystemTime)> = list_images(&dir)?
        .into_iter()
        .filter_map(|p| {
            let mtime = fs::metadata(&p).and_then(|m| m.modified()).ok()?;
            Some((p, mtime))
        })
        .collect();

    let mut report = CleanupReport::default();
    for path in policy.select_expired(&files, now) {
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "removed expired image");
                report.removed.push(path);
            }
            Err(err) => tracing::warn!(path = %path.display(), "failed to remove expired image: {err}"),
        }
    }

    let gone: HashSet<&Path> = report.removed.iter().map(PathBuf::as_path).collect();
    report.entries_dropped = log.retain_paths(|p| !gone.contains(p));
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use looper_core::metadata::MetadataEntry;
    use std::time::Duration;

    fn entry(path: &Path) -> MetadataEntry {
        MetadataEntry {
            tick: 1,
            timestamp: Utc::now(),
            path: path.to_path_buf(),
            interval_secs: None,
            preview: false,
            applied: true,
            source: None,
        }
    }

    #[test]
    fn max_files_keeps_newest_and_prunes_log() {
        let data = tempfile::tempdir().unwrap();
        let images = data.path().join("images");
        fs::create_dir_all(&images).unwrap();
        let images = images.canonicalize().unwrap();

        let mut paths = Vec::new();
        for name in ["a.jpg", "b.jpg", "c.jpg"] {
            let p = images.join(name);
            fs::write(&p, b"x").unwrap();
            paths.push(p);
        }
        fs::write(images.join("readme.txt"), b"x").unwrap();

        let mut log = MetadataLog::open(data.path().join("metadata.json")).unwrap();
        for p in &paths {
            log.append(entry(p));
        }

        // a is oldest, c newest.
        let base = SystemTime::now();
        for (i, p) in paths.iter().enumerate() {
            let f = fs::File::options().write(true).open(p).unwrap();
            f.set_modified(base - Duration::from_secs(300 - i as u64 * 100)).unwrap();
        }

        let policy = RetentionPolicy::from_limits(None, Some(1));
        let report = sweep(&images, &policy, &mut log, base).unwrap();

        assert_eq!(report.removed.len(), 2);
        assert!(!paths[0].exists() && !paths[1].exists());
        assert!(paths[2].exists());
        assert!(images.join("readme.txt").exists());
        assert_eq!(report.entries_dropped, 2);
        assert_eq!(log.entries().len(), 1);
        assert_eq!(log.entries()[0].path, paths[2]);
    }

    #[test]
    fn max_age_removes_old_files() {
        let data = tempfile::tempdir().unwrap();
        let images = data.path().canonicalize().unwrap();
        let old = images.join("old.png");
        fs::write(&old, b"x").unwrap();
        let now = SystemTime::now() + Duration::from_secs(3 * 24 * 60 * 60);

        let mut log = MetadataLog::open(images.join("metadata.json")).unwrap();
        let report = sweep(&images, &RetentionPolicy::from_limits(Some(2), None), &mut log, now).unwrap();

        assert_eq!(report.removed, vec![old.clone()]);
        assert!(!old.exists());
    }

    #[test]
    fn empty_policy_or_missing_dir_is_noop() {
        let data = tempfile::tempdir().unwrap();
        let mut log = MetadataLog::open(data.path().join("metadata.json")).unwrap();
        let report = sweep(
            &data.path().join("missing"),
            &RetentionPolicy::from_limits(Some(1), Some(1)),
            &mut log,
            SystemTime::now(),
        )
        .unwrap();
        assert!(report.removed.is_empty());

        let kept = data.path().join("keep.jpg");
        fs::write(&kept, b"x").unwrap();
        sweep(data.path(), &RetentionPolicy::default(), &mut log, SystemTime::now()).unwrap();
        assert!(kept.exists());
    }
}
