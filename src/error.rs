use std::path::PathBuf;

use thiserror::Error;

/// Failures while building a [`crate::dom::Page`] from a fixture.
#[derive(Error, Debug)]
pub enum PageError {
    #[error("failed to read page fixture {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid page fixture: {0}")]
    Json(#[from] serde_json::Error),

    #[error("element id '{0}' is used more than once")]
    DuplicateId(String),
}
