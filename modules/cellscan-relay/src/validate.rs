use cellscan_common::{Config, RelayError};

/// Pre-storage validation of one upload's declared media type and size.
/// Pure function with no side effects; the orchestrator calls it before
/// any byte reaches the scratch directory, so a rejected upload never
/// touches disk.
pub fn validate_upload(
    media_type: Option<&str>,
    size: u64,
    config: &Config,
) -> Result<(), RelayError> {
    let declared = media_type.unwrap_or("").to_ascii_lowercase();
    if !config.allowed_media_types.iter().any(|t| *t == declared) {
        return Err(RelayError::UnsupportedMediaType {
            got: if declared.is_empty() { "none".to_string() } else { declared },
        });
    }

    if size > config.max_upload_bytes {
        return Err(RelayError::PayloadTooLarge {
            size,
            max: config.max_upload_bytes,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            inference_url: "http://localhost:8000".into(),
            inference_timeout_secs: 30,
            health_timeout_secs: 5,
            upload_dir: "uploads".into(),
            max_upload_bytes: 10 * 1024 * 1024,
            allowed_media_types: vec![
                "image/jpeg".into(),
                "image/jpg".into(),
                "image/png".into(),
            ],
            web_host: "0.0.0.0".into(),
            web_port: 5000,
        }
    }

    #[test]
    fn accepts_jpeg_and_png() {
        let config = test_config();
        assert!(validate_upload(Some("image/jpeg"), 1024, &config).is_ok());
        assert!(validate_upload(Some("image/jpg"), 1024, &config).is_ok());
        assert!(validate_upload(Some("image/png"), 1024, &config).is_ok());
    }

    #[test]
    fn media_type_is_case_insensitive() {
        let config = test_config();
        assert!(validate_upload(Some("IMAGE/JPEG"), 1024, &config).is_ok());
    }

    #[test]
    fn rejects_unsupported_type() {
        let config = test_config();
        let err = validate_upload(Some("text/plain"), 1024, &config).unwrap_err();
        assert!(matches!(err, RelayError::UnsupportedMediaType { .. }));
    }

    #[test]
    fn rejects_missing_type() {
        let config = test_config();
        let err = validate_upload(None, 1024, &config).unwrap_err();
        assert!(matches!(err, RelayError::UnsupportedMediaType { .. }));
    }

    #[test]
    fn rejects_oversize_payload() {
        let config = test_config();
        let err = validate_upload(Some("image/png"), 15 * 1024 * 1024, &config).unwrap_err();
        match err {
            RelayError::PayloadTooLarge { size, max } => {
                assert_eq!(size, 15 * 1024 * 1024);
                assert_eq!(max, 10 * 1024 * 1024);
            }
            other => panic!("expected PayloadTooLarge, got {other:?}"),
        }
    }

    #[test]
    fn accepts_payload_exactly_at_limit() {
        let config = test_config();
        assert!(validate_upload(Some("image/jpeg"), config.max_upload_bytes, &config).is_ok());
    }

    #[test]
    fn unsupported_type_checked_before_size() {
        // Both checks fail; the media type rejection must win so the client
        // sees the earlier precondition.
        let config = test_config();
        let err = validate_upload(Some("text/plain"), 15 * 1024 * 1024, &config).unwrap_err();
        assert!(matches!(err, RelayError::UnsupportedMediaType { .. }));
    }
}
