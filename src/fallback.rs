use thiserror::Error;

/// Why an optional external dependency was replaced by its fallback value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    #[error("{0} is not set")]
    MissingCredentials(&'static str),

    #[error("request failed with status {0}")]
    Status(u16),

    #[error("response does not include {0}")]
    MissingField(&'static str),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("generated text is empty")]
    EmptyOutput,
}

impl From<reqwest::Error> for FallbackReason {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::Status(status.as_u16()),
            None => Self::Transport(err.to_string()),
        }
    }
}
