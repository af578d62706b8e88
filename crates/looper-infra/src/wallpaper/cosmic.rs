//! cosmic-bg watches its cosmic-config files, so setting the wallpaper is a config rewrite.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};

use crate::fsutil::atomic_write;

fn config_dir() -> anyhow::Result<PathBuf> {
    let base = match std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        Some(v) => PathBuf::from(v),
        None => dirs::home_dir()
            .ok_or_else(|| anyhow!("HOME not set"))?
            .join(".config"),
    };
    Ok(base.join("cosmic/com.system76.CosmicBackground/v1"))
}

/// Swap the path inside `source: Path("...")`.
fn replace_source_path(text: &str, new_path: &str) -> anyhow::Result<String> {
    const NEEDLE: &str = "source: Path(\"";

    let start = text
        .find(NEEDLE)
        .ok_or_else(|| anyhow!("COSMIC config: missing `source: Path(\"...\")`"))?
        + NEEDLE.len();
    let len = text[start..]
        .find("\")")
        .ok_or_else(|| anyhow!("COSMIC config: unterminated source path"))?;

    let mut out = String::with_capacity(text.len() + new_path.len());
    out.push_str(&text[..start]);
    out.push_str(new_path);
    out.push_str(&text[start + len..]);
    Ok(out)
}

pub(super) fn set_wallpaper(image_abs: &Path) -> anyhow::Result<()> {
    let dir = config_dir()?;
    let all = dir.join("all");

    atomic_write(&dir.join("same-on-all"), b"true\n").context("write same-on-all")?;

    let text = fs::read_to_string(&all).with_context(|| {
        format!(
            "read {} (open COSMIC Wallpaper settings once)",
            all.display()
        )
    })?;
    let new_path = image_abs
        .to_str()
        .ok_or_else(|| anyhow!("path is not valid UTF-8"))?;

    let updated = replace_source_path(&text, new_path)?;
    atomic_write(&all, updated.as_bytes()).context("write all")
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::wallpaper::test_support::ENV_LOCK;

    const SAMPLE: &str = "(\n    output: \"all\",\n    source: Path(\"/usr/share/backgrounds/old.png\"),\n    filter_by_theme: true,\n)\n";

    #[test]
    fn replaces_only_the_source_path() {
        let out = replace_source_path(SAMPLE, "/home/me/new.jpg").unwrap();
        assert!(out.contains("source: Path(\"/home/me/new.jpg\"),"));
        assert!(out.contains("filter_by_theme: true"));
        assert!(!out.contains("old.png"));
    }

    #[test]
    fn rejects_config_without_source() {
        assert!(replace_source_path("(output: \"all\")", "/x.png").is_err());
        assert!(replace_source_path("source: Path(\"/broken", "/x.png").is_err());
    }

    #[test]
    fn rewrites_config_under_xdg_config_home() {
        let _g = ENV_LOCK.lock().unwrap();
        let home = tempfile::tempdir().unwrap();
        let cfg = home.path().join("cosmic/com.system76.CosmicBackground/v1");
        fs::create_dir_all(&cfg).unwrap();
        fs::write(cfg.join("all"), SAMPLE).unwrap();
        let img = home.path().join("pic.png");
        fs::write(&img, b"png").unwrap();

        let old = std::env::var_os("XDG_CONFIG_HOME");
        unsafe {
            std::env::set_var("XDG_CONFIG_HOME", home.path());
        }
        let res = set_wallpaper(&img);
        unsafe {
            match old {
                Some(v) => std::env::set_var("XDG_CONFIG_HOME", v),
                None => std::env::remove_var("XDG_CONFIG_HOME"),
            }
        }

        res.unwrap();
        let all = fs::read_to_string(cfg.join("all")).unwrap();
        assert!(all.contains(&format!("source: Path(\"{}\")", img.display())));
        assert_eq!(fs::read_to_string(cfg.join("same-on-all")).unwrap(), "true\n");
    }
}
