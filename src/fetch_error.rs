#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("File not found (404): {0}")]
    NotFound(String),
    #[error("Server error (5xx): {0}")]
    ServerError(String),
    #[error("Unexpected HTTP status {status} for {url}")]
    Status { status: u16, url: String },
    #[error("Cache I/O failed: {0}")]
    Cache(#[from] std::io::Error),
}
