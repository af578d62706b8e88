//! Which stored images a retention policy wants gone.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

const SECS_PER_DAY: u64 = 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetentionPolicy {
    pub max_age: Option<Duration>,
    pub max_files: Option<usize>,
}

impl RetentionPolicy {
    /// Day counts too large to express in seconds saturate to "never expires".
    pub fn from_limits(max_age_days: Option<u64>, max_files: Option<usize>) -> Self {
        Self {
            max_age: max_age_days.map(|d| Duration::from_secs(d.saturating_mul(SECS_PER_DAY))),
            max_files,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.max_age.is_none() && self.max_files.is_none()
    }

    /// Pick files to delete: everything older than `max_age`, then the oldest
    /// of the rest until at most `max_files` remain.
    pub fn select_expired(&self, files: &[(PathBuf, SystemTime)], now: SystemTime) -> Vec<PathBuf> {
        let mut keep: Vec<&(PathBuf, SystemTime)> = Vec::with_capacity(files.len());
        let mut expired = Vec::new();

        for entry in files {
            let too_old = self.max_age.is_some_and(|max| {
                now.duration_since(entry.1).is_ok_and(|age| age > max)
            });
            if too_old {
                expired.push(entry.0.clone());
            } else {
                keep.push(entry);
            }
        }

        if let Some(max) = self.max_files
            && keep.len() > max
        {
            // Oldest first; ties broken by path for a stable result.
            keep.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
            let excess = keep.len() - max;
            expired.extend(keep.iter().take(excess).map(|e| e.0.clone()));
        }

        expired
    }
}
