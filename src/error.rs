//! Crate-wide error type.
//!
//! Enrichment stages (images, translation, content extraction) catch these at
//! the stage boundary and degrade to "no result". Only storage and
//! configuration errors are expected to reach the caller of a run.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("malformed feed: {0}")]
    Feed(#[from] feed_rs::parser::ParseFeedError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("invalid setting: {0}")]
    InvalidSetting(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("translation failed: {0}")]
    Translation(String),
}

pub type Result<T> = std::result::Result<T, Error>;
