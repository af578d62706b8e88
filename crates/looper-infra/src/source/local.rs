use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use looper_core::LooperError;
use looper_core::image::{ImageRef, is_supported_image};

use super::ImageSource;

/// Image files directly inside a directory, sorted by path.
#[derive(Debug, Clone)]
pub struct LocalSource {
    dir: PathBuf,
}

impl LocalSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

/// List supported image files in `dir` (not recursive), sorted by path.
pub fn list_images(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))? {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                tracing::warn!(dir = %dir.display(), "skipping unreadable entry: {err}");
                continue;
            }
        };
        let path = entry.path();
        if path.is_file() && is_supported_image(&path) {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

impl ImageSource for LocalSource {
    fn gather(&mut self) -> anyhow::Result<Vec<ImageRef>> {
        if !self.dir.is_dir() {
            return Err(LooperError::config(format!(
                "{} is not a directory",
                self.dir.display()
            ))
            .into());
        }
        let dir = self
            .dir
            .canonicalize()
            .with_context(|| format!("resolve {}", self.dir.display()))?;

        let images: Vec<ImageRef> = list_images(&dir)?.into_iter().map(ImageRef::local).collect();
        tracing::debug!(dir = %dir.display(), count = images.len(), "scanned local images");
        Ok(images)
    }
}
