pub mod error;
pub mod types;

pub use error::{InferenceError, Result};
pub use types::Prediction;

use std::time::Duration;

pub struct InferenceClient {
    client: reqwest::Client,
    base_url: String,
}

impl InferenceClient {
    /// Build a client with a hard per-call timeout. The timeout covers the
    /// whole exchange (connect, send, read), independent of the caller's
    /// own connection state.
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Submit one image for prediction via the backend's /predict endpoint.
    /// Exactly one POST per call; a timeout or failure is surfaced, never
    /// retried, so the same image is never double-submitted.
    pub async fn predict(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<Prediction> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .map_err(|e| InferenceError::Parse(format!("invalid content type: {e}")))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let resp = self
            .client
            .post(format!("{}/predict", self.base_url))
            .multipart(form)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(InferenceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = resp.text().await?;
        let prediction: Prediction = serde_json::from_str(&body)
            .map_err(|e| InferenceError::Parse(e.to_string()))?;

        if !(0.0..=100.0).contains(&prediction.confidence) {
            return Err(InferenceError::Parse(format!(
                "confidence out of range: {}",
                prediction.confidence
            )));
        }

        tracing::debug!(
            prediction = %prediction.prediction,
            confidence = prediction.confidence,
            "Backend prediction received"
        );
        Ok(prediction)
    }

    /// Liveness probe against the backend root. Uses its own, shorter
    /// timeout so a slow backend degrades health without tying up 30s.
    pub async fn liveness(&self, probe_timeout: Duration) -> Result<()> {
        let resp = self
            .client
            .get(format!("{}/", self.base_url))
            .timeout(probe_timeout)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(InferenceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}
