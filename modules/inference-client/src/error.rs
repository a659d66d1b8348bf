use thiserror::Error;

pub type Result<T> = std::result::Result<T, InferenceError>;

#[derive(Debug, Error)]
pub enum InferenceError {
    /// The call exceeded its configured timeout. Never retried here;
    /// retry policy belongs to the caller.
    #[error("inference request timed out")]
    Timeout,

    /// Transport-level failure: connection refused, DNS, reset.
    #[error("backend unreachable: {0}")]
    Unreachable(String),

    /// Backend answered with a non-2xx status.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Response body was not a well-formed prediction.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for InferenceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            InferenceError::Timeout
        } else if err.is_decode() {
            InferenceError::Parse(err.to_string())
        } else {
            InferenceError::Unreachable(err.to_string())
        }
    }
}
