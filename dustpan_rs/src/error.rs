//! Error types for the host side of dustpan (loading projects and config).
//!
//! The analysis engine itself never fails: malformed input yields empty sections.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DustpanError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid glob pattern {pattern:?}: {source}")]
    Glob {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

pub type Result<T> = std::result::Result<T, DustpanError>;
