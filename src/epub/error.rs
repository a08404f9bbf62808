/// Error types for building publication packages
use thiserror::Error;

/// Fatal failures: no valid package could be produced.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Failed to render the article body: {0}")]
    Render(#[from] RenderError),

    #[error("Failed to write archive entry {path}: {reason}")]
    Archive { path: String, reason: String },

    #[error("Archive serialization produced an invalid package: {0}")]
    Serialization(String),

    #[error("Failed to set up the HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

#[derive(Error, Debug)]
#[error("{0}")]
pub struct RenderError(pub String);

/// Reasons a cover could not be resolved. These never fail a build; the cover is dropped instead.
#[derive(Error, Debug)]
pub enum CoverError {
    #[error("Request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("Server responded with HTTP {0}")]
    Status(u16),

    #[error("Response is not an image (content type {0})")]
    NotAnImage(String),

    #[error("Image is empty")]
    Empty,

    #[error("Image is larger than {0} bytes")]
    TooLarge(usize),

    #[error("Failed to read image file: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BuildError>;
