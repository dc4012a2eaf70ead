use thiserror::Error;

/// Why a scrape or map call against the extraction service did not produce
/// usable data.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("connect failure: {0}")]
    Connect(String),

    #[error("request timeout")]
    Timeout,

    #[error("extraction api returned {status}: {message}")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("extraction api reported failure: {0}")]
    Unsuccessful(String),

    #[error("malformed extraction response: {0}")]
    MalformedResponse(String),

    #[error("transport error: {0}")]
    Transport(String),
}

impl ExtractionError {
    pub fn from_reqwest_error(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Api {
                status,
                message: err.to_string(),
            }
        } else if err.is_decode() {
            Self::MalformedResponse(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }

    /// Short machine-friendly label, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidUrl(_) => "invalid_url",
            Self::Connect(_) => "connect",
            Self::Timeout => "timeout",
            Self::Api { .. } => "api",
            Self::Unsuccessful(_) => "unsuccessful",
            Self::MalformedResponse(_) => "malformed_response",
            Self::Transport(_) => "transport",
        }
    }
}
