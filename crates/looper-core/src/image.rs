//! Image references and the attributes of where they came from.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LooperError;

/// Extensions accepted from local folders and the images directory.
pub const IMAGE_EXTS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif", "webp"];

pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTS.iter().any(|ok| e.eq_ignore_ascii_case(ok)))
}

/// Attribution recorded for downloaded images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<Resolution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloaded_at: Option<DateTime<Utc>>,
}

/// A file on disk that can be applied as wallpaper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceInfo>,
}

impl ImageRef {
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            source: None,
        }
    }

    pub fn downloaded(path: impl Into<PathBuf>, source: SourceInfo) -> Self {
        Self {
            path: path.into(),
            source: Some(source),
        }
    }
}

/// Drop repeated paths, keeping the first occurrence.
pub fn dedup_by_path(images: Vec<ImageRef>) -> Vec<ImageRef> {
    let mut seen = std::collections::HashSet::new();
    images
        .into_iter()
        .filter(|img| seen.insert(img.path.clone()))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Resolution {
    type Err = LooperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LooperError::config(format!("invalid resolution {s:?} (expected WIDTHxHEIGHT)"));
        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
        let width: u32 = w.parse().map_err(|_| invalid())?;
        let height: u32 = h.parse().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok(Self { width, height })
    }
}

/// Remote image categories. Unknown names fall back to [`Category::Nature`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Category {
    #[default]
    Nature,
    Graffiti,
}

impl Category {
    pub fn parse_lenient(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "graffiti" => Self::Graffiti,
            _ => Self::Nature,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nature => "nature",
            Self::Graffiti => "graffiti",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
