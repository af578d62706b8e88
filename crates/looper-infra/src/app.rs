//! Wiring: options in, one finished rotation run out.

use std::path::PathBuf;
use std::time::SystemTime;

use anyhow::Context;
use looper_core::LooperError;
use looper_core::image::{Category, ImageRef, Resolution, dedup_by_path};
use looper_core::retention::RetentionPolicy;
use looper_core::rotation::{IntervalPolicy, OrderPolicy, Rotation};
use rand::Rng;

use crate::cleanup;
use crate::metadata_log::MetadataLog;
use crate::paths::DataLayout;
use crate::runner::{Looper, RunSummary};
use crate::session::{self, LoopSettings, Session};
use crate::signal::{Sleeper, StopSignal};
use crate::source::{Fetcher, HttpFetcher, ImageSource, LocalSource, RemoteSource};
use crate::wallpaper::{DesktopSetter, WallpaperSetter};

/// Images fetched when no local folder is given and `download` is unset.
pub const DEFAULT_DOWNLOADS: usize = 5;

#[derive(Debug, Clone)]
pub struct Options {
    pub data_dir: Option<PathBuf>,
    pub local: Option<PathBuf>,
    pub download: Option<usize>,
    pub category: Category,
    pub resolution: Resolution,
    pub refresh: bool,
    pub count: Option<u64>,
    pub settings: LoopSettings,
    pub preview: bool,
    pub retention: RetentionPolicy,
    pub resume: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            data_dir: None,
            local: None,
            download: None,
            category: Category::default(),
            resolution: Resolution::default(),
            refresh: false,
            count: None,
            settings: LoopSettings {
                interval_secs: 30,
                shuffle: false,
                randomize_order: false,
                randomize_intervals: false,
                min_interval_secs: 15,
                max_interval_secs: 60,
            },
            preview: false,
            retention: RetentionPolicy::default(),
            resume: false,
        }
    }
}

pub fn interval_policy(settings: &LoopSettings) -> Result<IntervalPolicy, LooperError> {
    if settings.randomize_intervals {
        if settings.min_interval_secs == 0 {
            return Err(LooperError::config("--min-interval must be at least 1 second"));
        }
        return IntervalPolicy::random(settings.min_interval_secs, settings.max_interval_secs);
    }
    if settings.interval_secs == 0 {
        return Err(LooperError::config("--interval must be at least 1 second"));
    }
    Ok(IntervalPolicy::Fixed(settings.interval_secs))
}

/// Collaborators the run talks to; swapped for fakes in tests.
pub struct Collaborators<S, Z, F> {
    pub setter: S,
    pub sleeper: Z,
    pub fetcher: F,
}

/// Run with the real desktop, signal handler and HTTP client.
pub fn run(opts: &Options) -> anyhow::Result<RunSummary> {
    let setter = DesktopSetter::detect();
    tracing::debug!(backend = setter.backend().name(), "wallpaper backend");

    let collab = Collaborators {
        setter,
        sleeper: StopSignal::install()?,
        fetcher: HttpFetcher::new()?,
    };
    run_with(opts, collab, &mut rand::rng())
}

pub fn run_with<S, Z, F, R>(
    opts: &Options,
    collab: Collaborators<S, Z, F>,
    rng: &mut R,
) -> anyhow::Result<RunSummary>
where
    S: WallpaperSetter,
    Z: Sleeper,
    F: Fetcher,
    R: Rng + ?Sized,
{
    interval_policy(&opts.settings)?;
    if opts.count == Some(0) {
        return Err(LooperError::config("--count must be at least 1").into());
    }

    let layout = DataLayout::new(crate::paths::data_dir(opts.data_dir.as_deref())?);
    std::fs::create_dir_all(&layout.root)
        .with_context(|| format!("create dir {}", layout.root.display()))?;

    let saved = if opts.resume {
        let s = session::load(&layout.session_file())?;
        if s.is_none() {
            tracing::warn!("no saved session found; starting fresh");
        }
        s
    } else {
        None
    };
    let settings = saved.as_ref().map_or(opts.settings, |s| s.settings);
    let interval = interval_policy(&settings)?;
    let order = OrderPolicy::from_flags(settings.shuffle, settings.randomize_order);

    let mut log = MetadataLog::open(layout.metadata_file())?;

    // Cleanup runs before images are gathered, so pruned files never enter the rotation.
    let report = cleanup::sweep(
        &layout.images_dir(),
        &opts.retention,
        &mut log,
        SystemTime::now(),
    )?;
    if !report.removed.is_empty() {
        tracing::info!(
            removed = report.removed.len(),
            entries = report.entries_dropped,
            "cleanup finished"
        );
    }
    let stale = log.prune_missing();
    if stale > 0 {
        tracing::debug!(entries = stale, "dropped metadata for images no longer on disk");
    }

    let images = match &saved {
        Some(s) if !s.existing_images().is_empty() => s.existing_images(),
        _ => gather(opts, &layout, &collab.fetcher)?,
    };
    if images.is_empty() {
        return Err(LooperError::config("no images available to rotate").into());
    }

    let mut rotation = Rotation::new(images, order, interval, opts.count)?;
    let session_file = layout.session_file();
    save_session(&session_file, settings, rotation.images());

    tracing::info!(
        "starting wallpaper loop with {} images ({}). Press Ctrl+C to stop.",
        rotation.images().len(),
        describe(interval)
    );

    let mut looper = Looper::new(collab.setter, collab.sleeper).preview(opts.preview);
    let summary = looper.run(&mut rotation, &mut log, rng);

    if summary.interrupted {
        tracing::info!(
            "stopped by user after {} ticks; saving session and exiting",
            rotation.ticks()
        );
    }
    save_session(&session_file, settings, rotation.images());
    log.flush()?;

    tracing::info!(
        ticks = summary.ticks,
        applied = summary.applied,
        failed = summary.failed,
        recorded = log.appended(),
        "done"
    );
    Ok(summary)
}

fn gather<F: Fetcher>(
    opts: &Options,
    layout: &DataLayout,
    fetcher: &F,
) -> anyhow::Result<Vec<ImageRef>> {
    let mut images = Vec::new();

    if let Some(dir) = &opts.local {
        images.extend(LocalSource::new(dir).gather()?);
    }

    let downloads = match (&opts.local, opts.download) {
        (_, Some(n)) => n,
        (Some(_), None) => 0,
        (None, None) => DEFAULT_DOWNLOADS,
    };
    if downloads > 0 {
        let mut remote = RemoteSource::new(
            fetcher,
            layout.images_dir(),
            opts.category,
            opts.resolution,
            downloads,
        )
        .refresh(opts.refresh);
        images.extend(remote.gather()?);
    }

    Ok(dedup_by_path(images)
        .into_iter()
        .filter(|img| img.path.is_file())
        .collect())
}

fn save_session(path: &std::path::Path, settings: LoopSettings, images: &[ImageRef]) {
    let session = Session::new(settings, images.to_vec());
    if let Err(err) = session::save(path, &session) {
        tracing::warn!("could not save session: {err:#}");
    }
}

fn describe(interval: IntervalPolicy) -> String {
    match interval {
        IntervalPolicy::Fixed(secs) => format!("{secs}s per image"),
        IntervalPolicy::Random { min, max } => format!("{min}-{max}s per image"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_validation() {
        let mut s = Options::default().settings;
        assert_eq!(interval_policy(&s).unwrap(), IntervalPolicy::Fixed(30));

        s.interval_secs = 0;
        assert!(interval_policy(&s).unwrap_err().is_config());

        s.randomize_intervals = true;
        s.min_interval_secs = 20;
        s.max_interval_secs = 10;
        assert!(interval_policy(&s).unwrap_err().is_config());

        s.max_interval_secs = 40;
        assert_eq!(
            interval_policy(&s).unwrap(),
            IntervalPolicy::Random { min: 20, max: 40 }
        );

        s.min_interval_secs = 0;
        assert!(interval_policy(&s).is_err());
    }

    #[test]
    fn describe_intervals() {
        assert_eq!(describe(IntervalPolicy::Fixed(5)), "5s per image");
        assert_eq!(
            describe(IntervalPolicy::Random { min: 1, max: 9 }),
            "1-9s per image"
        );
    }
}
