use std::path::PathBuf;
use thiserror::Error;

/// Result type for tree parsing operations
pub type Result<T> = std::result::Result<T, TreeError>;

/// Errors that can occur while configuring or feeding the tree parser
#[derive(Error, Debug)]
pub enum TreeError {
    /// Tree format configuration is unusable
    #[error("Invalid tree format: {0}")]
    InvalidFormat(String),

    /// Tree format file is not valid TOML
    #[error("Tree format parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Failed to read a tree export or format file
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Instance-suffix pattern could not be compiled
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

impl TreeError {
    /// Create an invalid format error
    pub fn invalid_format(msg: impl Into<String>) -> Self {
        Self::InvalidFormat(msg.into())
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
