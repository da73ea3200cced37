use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures of an [`EventStore`](crate::engine::source::EventStore) query.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("page numbers start at 1, got {0}")]
    InvalidPage(usize),

    #[error("page size must be positive")]
    InvalidPageSize,

    #[error("event store unavailable: {0}")]
    Unavailable(String),
}

/// Failures while refreshing dashboard panels. No retry is attempted.
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("fetch for panel '{panel}' failed: {source}")]
    Fetch {
        panel: String,
        #[source]
        source: FetchError,
    },
}

impl RefreshError {
    pub fn panel(&self) -> &str {
        match self {
            RefreshError::Fetch { panel, .. } => panel,
        }
    }
}

/// Failures while loading a JSON record snapshot from disk.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
}
