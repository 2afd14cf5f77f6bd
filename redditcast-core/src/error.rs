use thiserror::Error;

#[derive(Error, Debug)]
pub enum BroadcastError {
    #[error("Listing API error: {0}")]
    Listing(#[from] ListingError),

    #[error("Caption service error: {0}")]
    Caption(#[from] CaptionError),

    /// Reported by `ChatHost` implementations when the host rejects an
    /// injected message or a generation trigger.
    #[error("Host error: {message}")]
    Host { message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

#[derive(Error, Debug, Clone)]
pub enum ListingError {
    #[error("Subreddit not found: {subreddit}")]
    SubredditNotFound { subreddit: String },

    #[error("Invalid listing response: {details}")]
    InvalidResponse { details: String },

    #[error("Listing request failed with status {status_code}")]
    RequestFailed { status_code: u16 },
}

#[derive(Error, Debug, Clone)]
pub enum CaptionError {
    #[error("Image download failed with status {status_code}")]
    DownloadFailed { status_code: u16 },

    #[error("Caption request failed with status {status_code}")]
    ServiceError { status_code: u16 },

    #[error("Invalid caption response: {details}")]
    InvalidResponse { details: String },
}
