//! Metadata records written once per tick.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::image::SourceInfo;
use crate::rotation::Tick;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub tick: u64,
    pub timestamp: DateTime<Utc>,
    pub path: PathBuf,
    /// Seconds until the next tick, absent after the last one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_secs: Option<u64>,
    #[serde(default)]
    pub preview: bool,
    /// Whether the desktop accepted the image. Always false in preview.
    #[serde(default)]
    pub applied: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceInfo>,
}

impl MetadataEntry {
    pub fn from_tick(tick: &Tick, at: DateTime<Utc>, preview: bool, applied: bool) -> Self {
        Self {
            tick: tick.number,
            timestamp: at,
            path: tick.image.path.clone(),
            interval_secs: tick.interval.map(|d| d.as_secs()),
            preview,
            applied,
            source: tick.image.source.clone(),
        }
    }
}
