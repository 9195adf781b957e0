use thiserror::Error;

/// Startup failures. None of these are recoverable; the shells abort before
/// serving traffic.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid timezone {0:?}")]
    InvalidTimezone(String),

    #[error("number of images must be a positive integer, got {0:?}")]
    InvalidImageCount(String),

    #[error("unknown response mode {0:?}, expected \"callback\" or \"inline\"")]
    InvalidResponseMode(String),

    #[error("{name}: expected a number, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("HTTP POST body is empty")]
    EmptyBody,

    #[error("invalid percent-escape at byte {0}")]
    InvalidEscape(usize),

    #[error("malformed form body: {0}")]
    Malformed(#[from] serde_urlencoded::de::Error),
}

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("invalid command {0:?}")]
    UnknownCommand(String),

    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("response_url is empty")]
    MissingUrl,

    #[error("failed to post to response_url: {0}")]
    Http(#[from] reqwest::Error),

    #[error("response_url answered {0}")]
    Status(reqwest::StatusCode),
}

/// Per-request failure, mapped to an HTTP status by both shells.
#[derive(Debug, Error)]
pub enum WfhError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Handler(#[from] HandlerError),
}

impl WfhError {
    pub fn status_code(&self) -> u16 {
        match self {
            WfhError::Decode(_) => 400,
            WfhError::Handler(_) => 500,
        }
    }
}
