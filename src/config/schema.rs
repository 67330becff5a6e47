/// Configuration schema and built-in defaults.
///
/// Defines the TOML-serializable configuration structure: the top-level
/// `default_model`, the `[api]`, `[features]` and `[logging]` sections, and
/// the `[[models]]` static catalog.
///
/// Every value is compiled in. The only runtime override is the API base
/// URL (see [`super::load`]).
use serde::{Deserialize, Serialize};

use crate::model::{ModelDescriptor, ModelStatus};

/// Default base URL of the analysis service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Default client-side request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Default model catalog key.
pub const DEFAULT_MODEL: &str = "huggingface";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level greencode configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GreenCodeConfig {
    /// Model used when the user does not pick one.
    pub default_model: String,
    pub api: ApiConfig,
    pub features: FeatureFlags,
    pub logging: LoggingConfig,
    /// Static model catalog, used when `GET /models` is unavailable.
    pub models: Vec<ModelDescriptor>,
}

impl Default for GreenCodeConfig {
    fn default() -> Self {
        Self {
            default_model: DEFAULT_MODEL.to_string(),
            api: ApiConfig::default(),
            features: FeatureFlags::default(),
            logging: LoggingConfig::default(),
            models: default_catalog(),
        }
    }
}

impl GreenCodeConfig {
    /// Look up a catalog entry by key.
    pub fn model(&self, key: &str) -> Option<&ModelDescriptor> {
        self.models.iter().find(|m| m.key == key)
    }
}

// ---------------------------------------------------------------------------
// [api]
// ---------------------------------------------------------------------------

/// Endpoint paths relative to the base URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub analyze: String,
    pub health: String,
    pub models: String,
    pub clear_cache: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            analyze: "/analyze".to_string(),
            health: "/health".to_string(),
            models: "/models".to_string(),
            clear_cache: "/clear-cache".to_string(),
        }
    }
}

/// Analysis service location and request policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL; overridable with `GREENCODE_API_URL`.
    pub base_url: String,
    /// Client-side timeout applied to every request (milliseconds).
    pub timeout_ms: u64,
    pub endpoints: Endpoints,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            endpoints: Endpoints::default(),
        }
    }
}

impl ApiConfig {
    /// Join the base URL and an endpoint path, tolerating a trailing `/`.
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), endpoint)
    }
}

// ---------------------------------------------------------------------------
// [features]
// ---------------------------------------------------------------------------

/// Compiled-in feature flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    /// Default for `OptimizationRequest::advanced` on the CLI.
    pub advanced_analysis: bool,
    /// Default for `OptimizationRequest::want_variants` on the CLI.
    pub show_variants: bool,
    /// Send the selected model key with each request.
    pub model_selection: bool,
    /// Call the analysis service. When off, the demo dataset is returned.
    pub use_real_api: bool,
    /// Substitute the demo dataset when a real call fails.
    pub mock_fallback: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            advanced_analysis: true,
            show_variants: true,
            model_selection: true,
            use_real_api: true,
            mock_fallback: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

/// JSONL event log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Write events to `~/.greencode/<file>`.
    pub enabled: bool,
    pub file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            file: "events.jsonl".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [[models]]
// ---------------------------------------------------------------------------

/// The built-in model catalog.
pub fn default_catalog() -> Vec<ModelDescriptor> {
    vec![
        ModelDescriptor::new(
            "huggingface",
            "Hugging Face API",
            "Uses StarCoder model via Hugging Face Inference API",
            ModelStatus::Available,
        ),
        ModelDescriptor::new(
            "openai",
            "OpenAI",
            "Uses OpenAI API for code optimization",
            ModelStatus::Available,
        ),
        ModelDescriptor::new(
            "starcoder1b",
            "StarCoder 1B (Pending)",
            "1B parameter model - Faster but less accurate",
            ModelStatus::Pending,
        ),
        ModelDescriptor::new(
            "starcoder3b",
            "StarCoder 3B (Pending)",
            "3B parameter model - Better accuracy, slower inference",
            ModelStatus::Pending,
        ),
        ModelDescriptor::new(
            "codegen350m",
            "CodeGen 350M (Pending)",
            "350M parameter model - Fast, lightweight optimization",
            ModelStatus::Pending,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service_contract() {
        let cfg = GreenCodeConfig::default();
        assert_eq!(cfg.api.base_url, "http://localhost:5000");
        assert_eq!(cfg.api.timeout_ms, 30_000);
        assert_eq!(cfg.api.endpoints.analyze, "/analyze");
        assert_eq!(cfg.api.endpoints.clear_cache, "/clear-cache");
        assert_eq!(cfg.default_model, "huggingface");
        assert!(cfg.features.use_real_api);
        assert!(cfg.features.mock_fallback);
    }

    #[test]
    fn event_log_is_on_by_default() {
        let logging = GreenCodeConfig::default().logging;
        assert!(logging.enabled);
        assert_eq!(logging.file, "events.jsonl");
    }

    #[test]
    fn catalog_keys_are_unique() {
        let catalog = default_catalog();
        let mut keys: Vec<&str> = catalog.iter().map(|m| m.key.as_str()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), catalog.len());
    }

    #[test]
    fn default_model_is_in_catalog() {
        let cfg = GreenCodeConfig::default();
        let model = cfg.model(&cfg.default_model).unwrap();
        assert_eq!(model.status, ModelStatus::Available);
    }

    #[test]
    fn url_joins_without_double_slash() {
        let mut api = ApiConfig::default();
        api.base_url = "http://example.test:8080/".to_string();
        assert_eq!(api.url("/analyze"), "http://example.test:8080/analyze");
    }

    #[test]
    fn config_round_trips_through_toml() {
        let cfg = GreenCodeConfig::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        let parsed: GreenCodeConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.models.len(), cfg.models.len());
        assert_eq!(parsed.api.timeout_ms, cfg.api.timeout_ms);
    }
}
