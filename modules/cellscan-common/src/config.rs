use std::env;

pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Constructed once at startup and shared by reference; nothing reads the
/// environment after this point.
#[derive(Debug, Clone)]
pub struct Config {
    // Inference backend
    pub inference_url: String,
    pub inference_timeout_secs: u64,
    pub health_timeout_secs: u64,

    // Upload handling
    pub upload_dir: String,
    pub max_upload_bytes: u64,
    pub allowed_media_types: Vec<String>,

    // Web server
    pub web_host: String,
    pub web_port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    /// Every value has a default; the relay can start with an empty env.
    pub fn from_env() -> Self {
        Self {
            inference_url: env::var("INFERENCE_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            inference_timeout_secs: env_u64("INFERENCE_TIMEOUT_SECS", 30),
            health_timeout_secs: env_u64("HEALTH_TIMEOUT_SECS", 5),
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
            max_upload_bytes: env_u64("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES),
            allowed_media_types: env::var("ALLOWED_MEDIA_TYPES")
                .unwrap_or_else(|_| "image/jpeg,image/jpg,image/png".to_string())
                .split(',')
                .filter(|s| !s.is_empty())
                .map(|s| s.trim().to_ascii_lowercase())
                .collect(),
            web_host: env::var("WEB_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            web_port: env::var("WEB_PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .expect("WEB_PORT must be a number"),
        }
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .map(|v| v.parse().unwrap_or_else(|_| panic!("{key} must be a number")))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_u64_falls_back_to_default() {
        assert_eq!(env_u64("CELLSCAN_TEST_UNSET_VAR", 42), 42);
    }

    #[test]
    fn default_upload_limit_is_ten_mib() {
        assert_eq!(DEFAULT_MAX_UPLOAD_BYTES, 10_485_760);
    }
}
