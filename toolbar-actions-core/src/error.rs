//! Error types

use thiserror::Error;

/// Failures talking to the remote action store.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request to action store failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("action store responded with {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode action store response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid action store url: {0}")]
    Url(#[from] url::ParseError),
}

/// Problems with the toolbar configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to parse toolbar config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("toolbar config has no apiURL")]
    MissingApiUrl,

    #[error("invalid apiURL '{url}': {source}")]
    InvalidApiUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}
