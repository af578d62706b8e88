//! The saved session: the last image list and loop settings, for `--resume`.

use std::fs;
use std::io;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use looper_core::image::ImageRef;
use serde::{Deserialize, Serialize};

use crate::fsutil::atomic_write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopSettings {
    pub interval_secs: u64,
    pub shuffle: bool,
    pub randomize_order: bool,
    pub randomize_intervals: bool,
    pub min_interval_secs: u64,
    pub max_interval_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub saved_at: DateTime<Utc>,
    pub settings: LoopSettings,
    pub images: Vec<ImageRef>,
}

impl Session {
    pub fn new(settings: LoopSettings, images: Vec<ImageRef>) -> Self {
        Self {
            saved_at: Utc::now(),
            settings,
            images,
        }
    }

    /// Images from the session that are still on disk.
    pub fn existing_images(&self) -> Vec<ImageRef> {
        self.images
            .iter()
            .filter(|img| img.path.is_file())
            .cloned()
            .collect()
    }
}

pub fn save(path: &Path, session: &Session) -> anyhow::Result<()> {
    let bytes = serde_json::to_vec_pretty(session).context("serialize session")?;
    atomic_write(path, &bytes)
}

/// `Ok(None)` when no session has been saved yet, or the saved one cannot be parsed.
pub fn load(path: &Path) -> anyhow::Result<Option<Session>> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err).with_context(|| format!("read {}", path.display())),
    };
    match serde_json::from_str(&text) {
        Ok(session) => Ok(Some(session)),
        Err(err) => {
            tracing::warn!(path = %path.display(), "ignoring unreadable session ({err})");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> LoopSettings {
        LoopSettings {
            interval_secs: 30,
            shuffle: true,
            randomize_order: false,
            randomize_intervals: false,
            min_interval_secs: 15,
            max_interval_secs: 60,
        }
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        assert!(load(&path).unwrap().is_none());

        let img = dir.path().join("a.png");
        fs::write(&img, b"x").unwrap();
        let session = Session::new(
            settings(),
            vec![ImageRef::local(&img), ImageRef::local(dir.path().join("gone.png"))],
        );
        save(&path, &session).unwrap();

        let loaded = load(&path).unwrap().unwrap();
        assert_eq!(loaded, session);
        assert_eq!(loaded.existing_images(), vec![ImageRef::local(&img)]);
    }

    #[test]
    fn garbage_loads_as_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "nope").unwrap();
        assert!(load(&path).unwrap().is_none());
    }
}
