//! Relay error taxonomy: every failure a request can hit, with its HTTP
//! mapping. The `Display` text is the client-visible summary; raw upstream
//! detail stays in the variant fields and is only ever logged.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    /// No file part was present in the multipart body.
    #[error("No image uploaded")]
    MissingUpload,

    /// Declared media type is outside the allowed set.
    #[error("Unsupported media type: {got}")]
    UnsupportedMediaType { got: String },

    /// Declared payload size exceeds the configured maximum.
    #[error("Payload too large: {size} bytes (max {max})")]
    PayloadTooLarge { size: u64, max: u64 },

    /// Scratch directory write or read failed.
    #[error("Failed to store upload")]
    Storage { detail: String },

    /// Inference backend could not be reached at all.
    #[error("Inference backend unreachable")]
    UpstreamUnreachable { detail: String },

    /// Inference call exceeded its timeout.
    #[error("Inference backend timed out")]
    UpstreamTimeout,

    /// Inference backend answered with a non-2xx status or a malformed body.
    #[error("Inference backend rejected the request")]
    UpstreamRejected { status: u16, detail: String },
}

impl RelayError {
    /// HTTP status for the client response. Pre-storage rejections are 4xx,
    /// everything after is the relay's (or upstream's) fault.
    pub fn status_code(&self) -> u16 {
        match self {
            RelayError::MissingUpload
            | RelayError::UnsupportedMediaType { .. }
            | RelayError::PayloadTooLarge { .. } => 400,
            RelayError::Storage { .. }
            | RelayError::UpstreamUnreachable { .. }
            | RelayError::UpstreamTimeout
            | RelayError::UpstreamRejected { .. } => 500,
        }
    }

    /// Operator-facing detail for logs; never sent to the client.
    pub fn detail(&self) -> Option<&str> {
        match self {
            RelayError::Storage { detail }
            | RelayError::UpstreamUnreachable { detail }
            | RelayError::UpstreamRejected { detail, .. } => Some(detail),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pre_storage_rejections_are_bad_requests() {
        assert_eq!(RelayError::MissingUpload.status_code(), 400);
        assert_eq!(
            RelayError::UnsupportedMediaType { got: "text/plain".into() }.status_code(),
            400
        );
        assert_eq!(
            RelayError::PayloadTooLarge { size: 20, max: 10 }.status_code(),
            400
        );
    }

    #[test]
    fn post_storage_failures_are_server_errors() {
        assert_eq!(RelayError::UpstreamTimeout.status_code(), 500);
        assert_eq!(
            RelayError::Storage { detail: "disk full".into() }.status_code(),
            500
        );
    }

    #[test]
    fn client_message_omits_raw_detail() {
        let err = RelayError::UpstreamRejected {
            status: 502,
            detail: "raw backend stack trace".into(),
        };
        let msg = err.to_string();
        assert!(!msg.contains("stack trace"));
        assert_eq!(err.detail(), Some("raw backend stack trace"));
    }

    #[test]
    fn missing_upload_message_matches_contract() {
        assert_eq!(RelayError::MissingUpload.to_string(), "No image uploaded");
    }
}
