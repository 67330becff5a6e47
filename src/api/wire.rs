//! Wire types for the analysis service's HTTP API.
//!
//! The service has no enforced schema: every response field is optional and
//! the same concept may appear under several names. These types accept
//! whatever is present; [`super::normalize`] turns them into the crate's
//! model types. A field of the wrong type is read as absent rather than
//! failing the whole payload.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// POST /analyze
// ---------------------------------------------------------------------------

/// Request body for `POST /analyze`.
#[derive(Debug, Serialize)]
pub struct AnalyzeRequest<'a> {
    pub code: &'a str,
    pub advanced: bool,
    pub context: &'a str,
    pub variants: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<&'a str>,
}

/// Response body from `POST /analyze` (2xx).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisPayload {
    #[serde(default, deserialize_with = "lenient")]
    pub optimized_code: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub analysis: Option<AnalysisSection>,
    #[serde(default, deserialize_with = "lenient")]
    pub optimization: Option<OptimizationSection>,
    #[serde(default, deserialize_with = "lenient")]
    pub green_score: Option<WireScore>,
    /// Usually a string such as `"2.8"`; numbers are accepted too.
    #[serde(default)]
    pub energy_saved: Option<serde_json::Value>,
    #[serde(default)]
    pub co2_saved: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub variants: Option<WireVariants>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisSection {
    #[serde(default, deserialize_with = "lenient")]
    pub greenscore: Option<WireScore>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct WireScore {
    #[serde(default, deserialize_with = "lenient")]
    pub original: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub optimized: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub improvement: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptimizationSection {
    #[serde(default, deserialize_with = "lenient")]
    pub context: Option<String>,
    /// Dimension → `"NN%"` (numbers accepted).
    #[serde(default, deserialize_with = "lenient")]
    pub savings: Option<BTreeMap<String, serde_json::Value>>,
    #[serde(default, deserialize_with = "lenient")]
    pub model_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireVariants {
    #[serde(default, deserialize_with = "lenient")]
    pub fast_version: Option<WireVariant>,
    #[serde(default, deserialize_with = "lenient")]
    pub green_version: Option<WireVariant>,
    #[serde(default, deserialize_with = "lenient")]
    pub trade_off: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub recommended: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireVariant {
    #[serde(default, deserialize_with = "lenient")]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "lenient", alias = "speed_boost")]
    pub speed: Option<f64>,
    #[serde(default, deserialize_with = "lenient", alias = "energy_savings")]
    pub energy: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub context: Option<String>,
}

/// Read an optional field, treating a value of the wrong type as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// GET /models
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct ModelsResponse {
    #[serde(default)]
    pub models: Vec<WireModel>,
    #[serde(default)]
    pub default_model: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WireModel {
    pub key: String,
    #[serde(default, alias = "display_name")]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_omits_model_when_absent() {
        let body = AnalyzeRequest {
            code: "x=1",
            advanced: false,
            context: "readability",
            variants: false,
            model: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("model").is_none());
        assert_eq!(json["context"], "readability");
    }

    #[test]
    fn payload_accepts_sparse_body() {
        let payload: AnalysisPayload = serde_json::from_str(r#"{"optimized_code": "pass"}"#).unwrap();
        assert_eq!(payload.optimized_code.as_deref(), Some("pass"));
        assert!(payload.variants.is_none());
    }

    #[test]
    fn mistyped_score_reads_as_absent() {
        let payload: AnalysisPayload = serde_json::from_str(
            r#"{"optimized_code": "print(1)", "green_score": {"original": "60", "optimized": 85}}"#,
        )
        .unwrap();
        let score = payload.green_score.unwrap();
        assert!(score.original.is_none());
        assert_eq!(score.optimized, Some(85.0));
    }

    #[test]
    fn mistyped_section_reads_as_absent() {
        let payload: AnalysisPayload =
            serde_json::from_str(r#"{"optimized_code": "pass", "variants": "none"}"#).unwrap();
        assert!(payload.variants.is_none());
    }

    #[test]
    fn variant_accepts_legacy_field_names() {
        let variant: WireVariant =
            serde_json::from_str(r#"{"code": "f()", "speed_boost": 45, "energy_savings": 32}"#)
                .unwrap();
        assert_eq!(variant.speed, Some(45.0));
        assert_eq!(variant.energy, Some(32.0));
    }

    #[test]
    fn models_response_tolerates_missing_fields() {
        let resp: ModelsResponse =
            serde_json::from_str(r#"{"models": [{"key": "local-gpt"}]}"#).unwrap();
        assert_eq!(resp.models.len(), 1);
        assert!(resp.default_model.is_none());
    }
}
