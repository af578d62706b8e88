//! Downloads from picsum.photos, cached in the images directory.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, anyhow};
use chrono::{DateTime, Utc};
use looper_core::LooperError;
use looper_core::image::{Category, ImageRef, Resolution, SourceInfo, is_supported_image};
use rand::Rng;

use super::ImageSource;
use crate::fsutil::atomic_write;

pub const PROVIDER: &str = "picsum";
const BASE_URL: &str = "https://picsum.photos";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Fetches the body of a URL.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> anyhow::Result<Vec<u8>>;
}

impl<T: Fetcher + ?Sized> Fetcher for &T {
    fn fetch(&self, url: &str) -> anyhow::Result<Vec<u8>> {
        (**self).fetch(url)
    }
}

/// Blocking `reqwest` client.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("looper/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build HTTP client")?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> anyhow::Result<Vec<u8>> {
        let resp = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("GET {url}"))?
            .error_for_status()
            .with_context(|| format!("GET {url}"))?;
        let bytes = resp.bytes().context("read body")?;
        Ok(bytes.to_vec())
    }
}

pub fn image_url(resolution: Resolution, sig: u32) -> String {
    format!(
        "{BASE_URL}/{}/{}?random={sig}",
        resolution.width, resolution.height
    )
}

pub struct RemoteSource<F> {
    fetcher: F,
    images_dir: PathBuf,
    category: Category,
    resolution: Resolution,
    count: usize,
    refresh: bool,
    pause: Duration,
}

impl<F: Fetcher> RemoteSource<F> {
    pub fn new(
        fetcher: F,
        images_dir: impl Into<PathBuf>,
        category: Category,
        resolution: Resolution,
        count: usize,
    ) -> Self {
        Self {
            fetcher,
            images_dir: images_dir.into(),
            category,
            resolution,
            count,
            refresh: false,
            pause: Duration::from_millis(200),
        }
    }

    /// Ignore previously downloaded files for this category.
    pub fn refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }

    /// Delay between consecutive downloads.
    pub fn pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    fn source_info(&self, url: Option<String>, downloaded_at: Option<DateTime<Utc>>) -> SourceInfo {
        SourceInfo {
            provider: PROVIDER.to_string(),
            url,
            category: self.category.as_str().to_string(),
            resolution: Some(self.resolution),
            downloaded_at,
        }
    }

    /// Earlier downloads for this category, newest first.
    fn cached(&self) -> Vec<ImageRef> {
        let prefix = format!("{}_", self.category);
        let Ok(entries) = fs::read_dir(&self.images_dir) else {
            return Vec::new();
        };

        let mut found: Vec<(SystemTime, PathBuf)> = entries
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| p.is_file() && is_supported_image(p))
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(&prefix))
            })
            .filter_map(|p| {
                let mtime = fs::metadata(&p).and_then(|m| m.modified()).ok()?;
                Some((mtime, p))
            })
            .collect();
        found.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

        found
            .into_iter()
            .take(self.count)
            .map(|(mtime, path)| {
                let info = self.source_info(None, Some(DateTime::<Utc>::from(mtime)));
                ImageRef::downloaded(path, info)
            })
            .collect()
    }

    fn unique_file_name(&self, rng: &mut impl Rng) -> PathBuf {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        loop {
            let name = format!(
                "{}_{secs}_{}.jpg",
                self.category,
                rng.random_range(1000..=9999)
            );
            let path = self.images_dir.join(name);
            if !path.exists() {
                return path;
            }
        }
    }

    fn download_one(&self, rng: &mut impl Rng) -> anyhow::Result<ImageRef> {
        let sig: u32 = rng.random_range(1..i32::MAX as u32);
        let url = image_url(self.resolution, sig);

        let bytes = self.fetcher.fetch(&url)?;
        if bytes.is_empty() {
            return Err(anyhow!("empty response body")).with_context(|| url.clone());
        }

        let path = self.unique_file_name(rng);
        atomic_write(&path, &bytes)?;

        Ok(ImageRef::downloaded(
            path,
            self.source_info(Some(url), Some(Utc::now())),
        ))
    }
}

impl<F: Fetcher> ImageSource for RemoteSource<F> {
    fn gather(&mut self) -> anyhow::Result<Vec<ImageRef>> {
        fs::create_dir_all(&self.images_dir)
            .with_context(|| format!("create dir {}", self.images_dir.display()))?;
        let images_dir = self
            .images_dir
            .canonicalize()
            .with_context(|| format!("resolve {}", self.images_dir.display()))?;
        self.images_dir = images_dir;

        let mut images = if self.refresh { Vec::new() } else { self.cached() };
        if !images.is_empty() {
            tracing::info!(
                category = %self.category,
                cached = images.len(),
                "reusing downloaded images"
            );
        }

        let missing = self.count.saturating_sub(images.len());
        if missing > 0 {
            tracing::info!(category = %self.category, count = missing, "downloading images");
        }

        let mut rng = rand::rng();
        for i in 0..missing {
            if i > 0 && !self.pause.is_zero() {
                std::thread::sleep(self.pause);
            }
            match self.download_one(&mut rng) {
                Ok(img) => {
                    tracing::info!(path = %img.path.display(), "downloaded");
                    images.push(img);
                }
                Err(err) => {
                    let err = LooperError::Network(format!("{err:#}"));
                    tracing::warn!("download {} of {missing} skipped: {err}", i + 1);
                }
            }
        }

        Ok(images)
    }
}
