use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("malformed object event: {0}")]
    MalformedEvent(String),

    #[error("{service} call failed: {details}")]
    Backend { service: String, details: String },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("serialize error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid response from {backend}: {details}")]
    BackendResponse { backend: String, details: String },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("serialize error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("could not sign locator for {bucket}/{object_key}: {details}")]
    SignFailed {
        bucket: String,
        object_key: String,
        details: String,
    },

    #[error("search request failed: {0}")]
    Request(String),
}

pub type Result<T, E = IngestError> = std::result::Result<T, E>;
