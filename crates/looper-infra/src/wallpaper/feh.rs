use std::ffi::OsStr;
use std::path::Path;

use super::run_tool;

/// Fallback for window managers without a desktop shell.
pub(super) fn set_wallpaper(image_abs: &Path) -> anyhow::Result<()> {
    run_tool("feh", [OsStr::new("--bg-fill"), image_abs.as_os_str()])
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::wallpaper::test_support::{ENV_LOCK, with_path, write_exe};

    #[test]
    fn passes_fill_mode_and_path() {
        let _g = ENV_LOCK.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("feh.log");
        write_exe(
            &dir.path().join("feh"),
            &format!("#!/bin/sh\necho \"$@\" > {}\n", log.display()),
        );
        let img = dir.path().join("wall.png");
        std::fs::write(&img, b"png").unwrap();

        with_path(dir.path(), || set_wallpaper(&img).unwrap());

        let args = std::fs::read_to_string(&log).unwrap();
        assert_eq!(args.trim(), format!("--bg-fill {}", img.display()));
    }
}
