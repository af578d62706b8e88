//! The metadata file: a JSON array with one entry per tick.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use looper_core::LooperError;
use looper_core::metadata::MetadataEntry;

use crate::fsutil::atomic_write;

#[derive(Debug)]
pub struct MetadataLog {
    path: PathBuf,
    entries: Vec<MetadataEntry>,
    appended: usize,
    dirty: bool,
}

impl MetadataLog {
    /// Load the existing log. A missing file starts empty; an unreadable one
    /// is moved aside to `<name>.bak` and the log starts empty.
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => Vec::new(),
            Ok(text) => match serde_json::from_str::<Vec<MetadataEntry>>(&text) {
                Ok(entries) => entries,
                Err(err) => {
                    let backup = backup_path(&path);
                    tracing::warn!(
                        path = %path.display(),
                        backup = %backup.display(),
                        "metadata log is not valid JSON ({err}); starting a new one"
                    );
                    fs::rename(&path, &backup)
                        .with_context(|| format!("move {} aside", path.display()))?;
                    Vec::new()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(err) => {
                return Err(err).with_context(|| format!("read {}", path.display()));
            }
        };

        Ok(Self {
            path,
            entries,
            appended: 0,
            dirty: false,
        })
    }

    pub fn entries(&self) -> &[MetadataEntry] {
        &self.entries
    }

    /// Entries added since this log was opened.
    pub fn appended(&self) -> usize {
        self.appended
    }

    /// Add an entry and write the file. A failed write is retried once, then
    /// left for the next write or the final [`flush`](Self::flush).
    pub fn append(&mut self, entry: MetadataEntry) {
        self.entries.push(entry);
        self.appended += 1;
        self.dirty = true;
        self.persist_best_effort();
    }

    /// Drop entries whose path is not accepted by `keep`. Returns how many were removed.
    pub fn retain_paths<F: FnMut(&Path) -> bool>(&mut self, mut keep: F) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| keep(&e.path));
        let removed = before - self.entries.len();
        if removed > 0 {
            self.dirty = true;
        }
        removed
    }

    /// Forget entries whose image is no longer on disk, so the file tracks
    /// the images that still exist instead of growing without bound.
    pub fn prune_missing(&mut self) -> usize {
        self.retain_paths(Path::is_file)
    }

    /// Write whatever is pending. Errors here are reported to the caller.
    pub fn flush(&mut self) -> Result<(), LooperError> {
        if !self.dirty && self.path.exists() {
            return Ok(());
        }
        self.write_with_retry().map_err(|err| LooperError::Io {
            path: self.path.display().to_string(),
            source: io::Error::other(format!("{err:#}")),
        })?;
        self.dirty = false;
        Ok(())
    }

    fn persist_best_effort(&mut self) {
        match self.write_with_retry() {
            Ok(()) => self.dirty = false,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), "could not write metadata: {err:#}");
            }
        }
    }

    fn write_with_retry(&self) -> anyhow::Result<()> {
        self.write().or_else(|first| {
            tracing::debug!("metadata write failed, retrying: {first:#}");
            self.write()
        })
    }

    fn write(&self) -> anyhow::Result<()> {
        let bytes = serde_json::to_vec_pretty(&self.entries).context("serialize metadata")?;
        atomic_write(&self.path, &bytes)
    }
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".bak");
    path.with_file_name(name)
}
