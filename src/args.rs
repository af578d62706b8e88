//! CLI argument definitions.

use std::path::PathBuf;

use clap::Parser;
use looper_core::image::{Category, Resolution};
use looper_core::retention::RetentionPolicy;
use looper_infra::app::Options;
use looper_infra::paths::{DataLayout, data_dir};
use looper_infra::session::LoopSettings;

#[derive(Debug, Parser)]
#[command(name = "looper", version)]
#[command(about = "Cycle desktop wallpapers from a local folder or picsum.photos", long_about = None)]
pub struct Cli {
    /// Number of wallpaper changes before exiting. Runs until Ctrl+C when omitted.
    #[arg(long, value_name = "N")]
    pub count: Option<u64>,

    /// Seconds each wallpaper stays up.
    #[arg(long, value_name = "SECONDS", default_value_t = 30)]
    pub interval: u64,

    /// Remote image category (nature, graffiti).
    #[arg(long, value_name = "NAME", default_value = "nature")]
    pub category: String,

    /// Size of downloaded images.
    #[arg(long, value_name = "WxH", default_value = "1920x1080")]
    pub resolution: Resolution,

    /// Images to download. Defaults to 5 without --local, 0 with it.
    #[arg(long, value_name = "N")]
    pub download: Option<usize>,

    /// Download fresh images instead of reusing earlier downloads.
    #[arg(long)]
    pub refresh: bool,

    /// Rotate images from this folder.
    #[arg(long, value_name = "PATH")]
    pub local: Option<PathBuf>,

    /// Shuffle the images at the start of every pass.
    #[arg(long)]
    pub shuffle: bool,

    /// Same as --shuffle.
    #[arg(long)]
    pub randomize_order: bool,

    /// Pick each interval at random between --min-interval and --max-interval.
    #[arg(long)]
    pub randomize_intervals: bool,

    #[arg(long, value_name = "SECONDS", default_value_t = 15)]
    pub min_interval: u64,

    #[arg(long, value_name = "SECONDS", default_value_t = 60)]
    pub max_interval: u64,

    /// Print and record selections without changing the wallpaper.
    #[arg(long)]
    pub preview: bool,

    /// Also write the runtime log to a file (default: <data-dir>/looper.log).
    #[arg(long, value_name = "PATH")]
    pub log: Option<Option<PathBuf>>,

    /// Where images, metadata and the session are kept.
    #[arg(long, value_name = "PATH", env = "LOOPER_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Delete downloaded images older than this many days at startup.
    #[arg(long, value_name = "DAYS")]
    pub max_age_days: Option<u64>,

    /// Keep at most this many downloaded images at startup.
    #[arg(long, value_name = "N")]
    pub max_files: Option<usize>,

    /// Reuse the images and timing of the last session.
    #[arg(long)]
    pub resume: bool,
}

impl Cli {
    pub fn options(&self) -> Options {
        Options {
            data_dir: self.data_dir.clone(),
            local: self.local.clone(),
            download: self.download,
            category: Category::parse_lenient(&self.category),
            resolution: self.resolution,
            refresh: self.refresh,
            count: self.count,
            settings: LoopSettings {
                interval_secs: self.interval,
                shuffle: self.shuffle,
                randomize_order: self.randomize_order,
                randomize_intervals: self.randomize_intervals,
                min_interval_secs: self.min_interval,
                max_interval_secs: self.max_interval,
            },
            preview: self.preview,
            retention: RetentionPolicy::from_limits(self.max_age_days, self.max_files),
            resume: self.resume,
        }
    }

    /// Resolved runtime log path, if `--log` was given.
    pub fn log_file(&self) -> anyhow::Result<Option<PathBuf>> {
        match &self.log {
            None => Ok(None),
            Some(Some(path)) => Ok(Some(path.clone())),
            Some(None) => {
                let root = data_dir(self.data_dir.as_deref())?;
                Ok(Some(DataLayout::new(root).log_file()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("looper").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = parse(&["--data-dir", "/d"]);
        let opts = cli.options();
        assert_eq!(opts.count, None);
        assert_eq!(opts.settings.interval_secs, 30);
        assert_eq!(opts.category, Category::Nature);
        assert_eq!(opts.resolution, Resolution::default());
        assert!(opts.retention.is_empty());
        assert!(!opts.preview);
        assert!(cli.log_file().unwrap().is_none());
    }

    #[test]
    fn full_flag_set() {
        let cli = parse(&[
            "--count",
            "10",
            "--local",
            "/pics",
            "--shuffle",
            "--randomize-order",
            "--randomize-intervals",
            "--min-interval",
            "5",
            "--max-interval",
            "9",
            "--category",
            "Graffiti",
            "--resolution",
            "800x600",
            "--preview",
            "--max-files",
            "20",
            "--data-dir",
            "/d",
        ]);
        let opts = cli.options();
        assert_eq!(opts.count, Some(10));
        assert_eq!(opts.local, Some(PathBuf::from("/pics")));
        assert!(opts.settings.shuffle && opts.settings.randomize_order);
        assert!(opts.settings.randomize_intervals);
        assert_eq!(
            (opts.settings.min_interval_secs, opts.settings.max_interval_secs),
            (5, 9)
        );
        assert_eq!(opts.category, Category::Graffiti);
        assert_eq!(opts.resolution.to_string(), "800x600");
        assert!(opts.preview);
        assert_eq!(opts.retention.max_files, Some(20));
    }

    #[test]
    fn log_flag_with_and_without_path() {
        let cli = parse(&["--data-dir", "/d", "--log"]);
        assert_eq!(cli.log_file().unwrap(), Some(PathBuf::from("/d/looper.log")));

        let cli = parse(&["--log", "/tmp/run.log"]);
        assert_eq!(cli.log_file().unwrap(), Some(PathBuf::from("/tmp/run.log")));
    }

    #[test]
    fn bad_resolution_is_rejected() {
        let res = Cli::try_parse_from(["looper", "--resolution", "big"]);
        assert!(res.is_err());
    }
}
