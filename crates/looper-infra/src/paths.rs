//! Where looper keeps its files.

use std::path::{Path, PathBuf};

use anyhow::anyhow;

/// Resolve the data directory: explicit override, `LOOPER_DATA_DIR`, then the platform data dir.
pub fn data_dir(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(p) = explicit {
        return Ok(p.to_path_buf());
    }
    if let Some(p) = std::env::var_os("LOOPER_DATA_DIR").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    let base = dirs::data_dir().ok_or_else(|| anyhow!("no data directory for this platform"))?;
    Ok(base.join("looper"))
}

/// Files under one data directory.
#[derive(Debug, Clone)]
pub struct DataLayout {
    pub root: PathBuf,
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn images_dir(&self) -> PathBuf {
        self.root.join("images")
    }

    pub fn metadata_file(&self) -> PathBuf {
        self.root.join("metadata.json")
    }

    pub fn session_file(&self) -> PathBuf {
        self.root.join("session.json")
    }

    pub fn log_file(&self) -> PathBuf {
        self.root.join("looper.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn data_dir_prefers_explicit_then_env() {
        let _g = ENV_LOCK.lock().unwrap();
        let old = std::env::var_os("LOOPER_DATA_DIR");

        unsafe {
            std::env::set_var("LOOPER_DATA_DIR", "/tmp/looper-env");
        }
        assert_eq!(
            data_dir(Some(Path::new("/x"))).unwrap(),
            PathBuf::from("/x")
        );
        assert_eq!(data_dir(None).unwrap(), PathBuf::from("/tmp/looper-env"));

        unsafe {
            match old {
                Some(v) => std::env::set_var("LOOPER_DATA_DIR", v),
                None => std::env::remove_var("LOOPER_DATA_DIR"),
            }
        }
    }

    #[test]
    fn layout_paths() {
        let l = DataLayout::new("/d");
        assert_eq!(l.images_dir(), PathBuf::from("/d/images"));
        assert_eq!(l.metadata_file(), PathBuf::from("/d/metadata.json"));
        assert_eq!(l.session_file(), PathBuf::from("/d/session.json"));
    }
}
