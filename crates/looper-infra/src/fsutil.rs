//! Small filesystem helpers.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, anyhow};
use tempfile::NamedTempFile;

/// Replace `path` with `bytes` in one rename, creating parent directories.
///
/// The temp file lives next to the target so the rename never crosses filesystems.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| anyhow!("{} has no parent directory", path.display()))?;
    fs::create_dir_all(dir).with_context(|| format!("create dir {}", dir.display()))?;

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("create temp file in {}", dir.display()))?;
    tmp.write_all(bytes)
        .and_then(|()| tmp.as_file().sync_all())
        .with_context(|| format!("write {}", tmp.path().display()))?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("replace {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_parents_and_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/deeper/file.json");

        atomic_write(&target, b"[]").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "[]");

        atomic_write(&target, b"[1]").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "[1]");

        let names: Vec<_> = fs::read_dir(target.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("file.json")]);
    }

    #[cfg(unix)]
    #[test]
    fn parent_that_is_a_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"").unwrap();
        assert!(atomic_write(&blocker.join("x.json"), b"{}").is_err());
    }
}
