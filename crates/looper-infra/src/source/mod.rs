//! Where rotation images come from.

use looper_core::image::ImageRef;

pub mod local;
pub mod remote;

pub use local::LocalSource;
pub use remote::{Fetcher, HttpFetcher, RemoteSource};

/// Produces the list of images to rotate.
///
/// Per-image failures are logged and skipped; an `Err` means the source as a
/// whole could not be read.
pub trait ImageSource {
    fn gather(&mut self) -> anyhow::Result<Vec<ImageRef>>;
}
