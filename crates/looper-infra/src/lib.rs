//! looper-infra: OS adapters (wallpaper backends, image sources, metadata files)
//! and the rotation loop that drives them.

pub mod app;
pub mod cleanup;
pub mod env_detect;
pub mod fsutil;
pub mod metadata_log;
pub mod paths;
pub mod runner;
pub mod session;
pub mod signal;
pub mod source;
pub mod wallpaper;
