//! looper-core: rotation state, metadata records and retention rules.
//!
//! Nothing in here touches the filesystem or spawns processes.

pub mod error;
pub mod image;
pub mod metadata;
pub mod retention;
pub mod rotation;

pub use error::LooperError;
