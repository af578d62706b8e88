//! Desktop wallpaper backends.
//!
//! One backend is picked per run from the platform and, on Linux, the
//! running desktop. Every backend takes an absolute path to an existing file.

use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;

use anyhow::{Context, anyhow};

use crate::env_detect::DesktopKind;

mod cosmic;
mod feh;
mod gnome;
mod kde;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(windows)]
mod windows;

/// Applies an image as the desktop background.
pub trait WallpaperSetter {
    fn apply(&mut self, image_abs: &Path) -> anyhow::Result<()>;
}

impl<T: WallpaperSetter + ?Sized> WallpaperSetter for &mut T {
    fn apply(&mut self, image_abs: &Path) -> anyhow::Result<()> {
        (**self).apply(image_abs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Cosmic,
    Gnome,
    Kde,
    Feh,
    MacOs,
    Windows,
}

impl Backend {
    pub fn detect() -> Self {
        if cfg!(target_os = "macos") {
            return Self::MacOs;
        }
        if cfg!(windows) {
            return Self::Windows;
        }
        match crate::env_detect::detect_desktop() {
            DesktopKind::Cosmic => Self::Cosmic,
            DesktopKind::Gnome => Self::Gnome,
            DesktopKind::Kde => Self::Kde,
            DesktopKind::Other => Self::Feh,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Cosmic => "COSMIC",
            Self::Gnome => "GNOME",
            Self::Kde => "KDE Plasma",
            Self::Feh => "feh",
            Self::MacOs => "macOS",
            Self::Windows => "Windows",
        }
    }
}

/// The production setter: dispatches to the backend for this machine.
#[derive(Debug, Clone)]
pub struct DesktopSetter {
    backend: Backend,
}

impl DesktopSetter {
    pub fn detect() -> Self {
        Self::with_backend(Backend::detect())
    }

    pub fn with_backend(backend: Backend) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }
}

impl WallpaperSetter for DesktopSetter {
    fn apply(&mut self, image_abs: &Path) -> anyhow::Result<()> {
        if !image_abs.is_file() {
            return Err(anyhow!("image not found")).with_context(|| format!("{image_abs:?}"));
        }

        let result = match self.backend {
            Backend::Cosmic => cosmic::set_wallpaper(image_abs),
            Backend::Gnome => gnome::set_wallpaper(image_abs),
            Backend::Kde => kde::set_wallpaper(image_abs),
            Backend::Feh => feh::set_wallpaper(image_abs),
            #[cfg(target_os = "macos")]
            Backend::MacOs => macos::set_wallpaper(image_abs),
            #[cfg(windows)]
            Backend::Windows => windows::set_wallpaper(image_abs),
            #[allow(unreachable_patterns)]
            other => Err(anyhow!("{} backend is not available on this platform", other.name())),
        };
        result.with_context(|| format!("{} wallpaper", self.backend.name()))
    }
}

fn file_uri(path: &Path) -> anyhow::Result<String> {
    let s = path
        .to_str()
        .ok_or_else(|| anyhow!("path is not valid UTF-8"))?;
    Ok(format!("file://{s}"))
}

/// Run a tool to completion and fail on a non-zero exit.
fn run_tool<I, S>(program: &str, args: I) -> anyhow::Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = Command::new(program)
        .args(args)
        .output()
        .with_context(|| format!("run {program}"))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!("{program} exited with {}", output.status))
            .with_context(|| stderr.trim().to_string());
    }
    Ok(())
}
