use serde::{Deserialize, Serialize};

/// Normalized prediction returned by the inference backend.
///
/// Only `prediction` and `confidence` are required; everything else the
/// backend sends (probabilities, model metadata) is carried through
/// unchanged in `extra`. The relay does not interpret prediction semantics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub prediction: String,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_fields_pass_through() {
        let raw = serde_json::json!({
            "prediction": "Parasitized",
            "confidence": 92.4,
            "risk_level": "High",
            "probabilities": { "Parasitized": 92.4, "Uninfected": 7.6 }
        });
        let p: Prediction = serde_json::from_value(raw).unwrap();
        assert_eq!(p.prediction, "Parasitized");
        assert!(p.extra.contains_key("probabilities"));

        let round = serde_json::to_value(&p).unwrap();
        assert_eq!(round["probabilities"]["Uninfected"], 7.6);
    }

    #[test]
    fn missing_confidence_is_an_error() {
        let raw = serde_json::json!({ "prediction": "Uninfected" });
        assert!(serde_json::from_value::<Prediction>(raw).is_err());
    }
}
