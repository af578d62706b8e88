//! Error taxonomy shared by the CLI and the adapters.

use thiserror::Error;

/// Failures grouped by how the run loop recovers from them.
#[derive(Debug, Error)]
pub enum LooperError {
    /// Bad options or nothing to rotate. Fatal.
    #[error("configuration error: {0}")]
    Config(String),

    /// A single download failed. The image is skipped.
    #[error("network error: {0}")]
    Network(String),

    /// The desktop refused the wallpaper. The tick is logged and the loop continues.
    #[error("platform error: {0}")]
    Platform(String),

    /// Metadata or session file I/O.
    #[error("i/o error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl LooperError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_category() {
        let err = LooperError::config("no images found");
        assert_eq!(err.to_string(), "configuration error: no images found");
        assert!(err.is_config());

        let err = LooperError::Io {
            path: "/tmp/metadata.json".into(),
            source: std::io::Error::other("disk full"),
        };
        assert!(err.to_string().contains("/tmp/metadata.json"));
        assert!(!err.is_config());
    }
}
