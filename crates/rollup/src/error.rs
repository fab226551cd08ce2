use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RollupError>;

#[derive(Error, Debug)]
pub enum RollupError {
    /// An assembly contains itself through a chain of sub-assemblies
    #[error("Cyclic sub-assembly reference: {}", path.join(" -> "))]
    CyclicReference { path: Vec<String> },

    #[error("Part count overflow for '{part}' in '{assembly}'")]
    CountOverflow { assembly: String, part: String },

    #[error("Unknown assembly: {0}")]
    UnknownAssembly(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RollupError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
