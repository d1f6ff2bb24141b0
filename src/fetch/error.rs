use std::io;
use thiserror::Error;

/// Malformed fetch configuration, reported before any I/O
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Cannot use 'to_file' and 'files' parameters together!")]
    FilesWithToFile,

    #[error("Couldn't determine the filename from the path {0}, please supply 'to_file' parameter.")]
    UndeterminedFilename(String),
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server returned error status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Failed to read {url}: {source}")]
    Io {
        url: String,
        #[source]
        source: io::Error,
    },

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
}

/// Failure of a whole fetch-list run
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Filesystem error, exactly as the handle reported it
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("Fetch task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
