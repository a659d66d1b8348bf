use serde::{Deserialize, Serialize};

/// Uniform response wrapper: exactly one of `data` / `error` is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), error: None }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self { success: false, data: None, error: Some(message.into()) }
    }
}

/// Composite health of the relay and its upstream, recomputed per query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub local: String,
    pub upstream: String,
}

impl HealthReport {
    /// Upstream probe succeeded.
    pub fn healthy() -> Self {
        Self {
            status: "OK".to_string(),
            local: "healthy".to_string(),
            upstream: "healthy".to_string(),
        }
    }

    /// The relay itself is serving but the upstream probe failed.
    pub fn degraded() -> Self {
        Self {
            status: "ERROR".to_string(),
            local: "healthy".to_string(),
            upstream: "unavailable".to_string(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == "OK"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_serializes_exactly_one_branch() {
        let ok: Envelope<u32> = Envelope::ok(7);
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], 7);
        assert!(json.get("error").is_none());

        let fail: Envelope<u32> = Envelope::fail("boom");
        let json = serde_json::to_value(&fail).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "boom");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn degraded_report_keeps_local_healthy() {
        let report = HealthReport::degraded();
        assert_eq!(report.local, "healthy");
        assert_eq!(report.upstream, "unavailable");
        assert!(!report.is_healthy());
    }
}
