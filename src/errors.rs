use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error("Display error: {0}")]
    Display(String),

    #[error("Demo aborted: {0}")]
    Aborted(String),

    #[error("Cannot dump frame to {path}: {source}")]
    Dump {
        path: PathBuf,
        #[source]
        source: png::EncodingError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
