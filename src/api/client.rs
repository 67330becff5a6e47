//! HTTP client for the remote analysis service.
//!
//! Uses the synchronous `ureq` client. Every call is a single attempt bound
//! to the configured timeout; when the deadline passes the socket is dropped
//! and the call fails with [`GreenCodeError::Timeout`]. Nothing is retried.
//!
//! Endpoints:
//!
//! - `POST /analyze`: [`GreenCodeClient::send`]
//! - `GET /health`: [`GreenCodeClient::fetch_health`]
//! - `GET /models`: [`GreenCodeClient::fetch_models`] (falls back to the
//!   static catalog, never fails)
//! - `POST /clear-cache`: [`GreenCodeClient::clear_model_cache`]
use std::collections::HashSet;
use std::error::Error as _;
use std::io;
use std::time::Duration;

use super::AnalysisTransport;
use super::wire::{AnalysisPayload, AnalyzeRequest, ErrorBody, ModelsResponse, WireModel};
use crate::analytics::logger::{EventEntry, EventKind, EventLog};
use crate::config::GreenCodeConfig;
use crate::config::schema::ApiConfig;
use crate::error::{GreenCodeError, Result};
use crate::model::{
    Ack, HealthStatus, ModelCatalog, ModelDescriptor, ModelStatus, OptimizationRequest,
};

/// Synchronous client for the analysis service.
///
/// Cheap to build; holds no connection between calls.
#[derive(Debug, Clone)]
pub struct GreenCodeClient {
    api: ApiConfig,
    timeout: Duration,
    send_model: bool,
    fallback_models: Vec<ModelDescriptor>,
    default_model: String,
    log: EventLog,
}

impl GreenCodeClient {
    /// Build a client from the resolved config.
    pub fn from_config(config: &GreenCodeConfig) -> Self {
        Self {
            api: config.api.clone(),
            timeout: Duration::from_millis(config.api.timeout_ms),
            send_model: config.features.model_selection,
            fallback_models: config.models.clone(),
            default_model: config.default_model.clone(),
            log: EventLog::from_config(&config.logging),
        }
    }

    /// Replace the event log (tests point it at a temp file or disable it).
    pub fn with_event_log(mut self, log: EventLog) -> Self {
        self.log = log;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.api.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn url(&self, endpoint: &str) -> String {
        // On Windows, "localhost" may resolve to ::1 first and stall when the
        // service only binds IPv4.
        self.api
            .url(endpoint)
            .replace("://localhost", "://127.0.0.1")
    }

    /// `POST /analyze`: submit code and return the raw payload.
    pub fn send(&self, request: &OptimizationRequest) -> Result<AnalysisPayload> {
        let body = AnalyzeRequest {
            code: &request.source_code,
            advanced: request.advanced,
            context: request.context.as_str(),
            variants: request.want_variants,
            model: self.send_model.then_some(request.model.as_str()),
        };

        let resp = ureq::post(&self.url(&self.api.endpoints.analyze))
            .timeout(self.timeout)
            .send_json(&body)
            .map_err(|e| self.classify(e))?;

        resp.into_json::<AnalysisPayload>()
            .map_err(|e| self.classify_body_error(e))
    }

    /// `GET /health`: return the service's health payload.
    pub fn fetch_health(&self) -> Result<HealthStatus> {
        let resp = ureq::get(&self.url(&self.api.endpoints.health))
            .timeout(self.timeout)
            .call()
            .map_err(|e| self.classify(e))?;

        let payload: serde_json::Value = resp
            .into_json()
            .map_err(|e| self.classify_body_error(e))?;
        Ok(HealthStatus::from_payload(payload))
    }

    /// `GET /models`: list selectable models.
    ///
    /// Any failure (unreachable, non-2xx, unparseable, empty list) is logged
    /// and answered with the static catalog and the configured default.
    pub fn fetch_models(&self) -> ModelCatalog {
        match self.fetch_remote_models() {
            Ok(catalog) => catalog,
            Err(err) => {
                let mut entry = EventEntry::new(EventKind::ModelsFallback, "complete");
                entry.error_kind = Some(err.kind().to_string());
                entry.message = Some(err.to_string());
                self.log.record(&entry);
                self.local_catalog()
            }
        }
    }

    /// The static catalog with the configured default model.
    pub fn local_catalog(&self) -> ModelCatalog {
        ModelCatalog {
            models: self.fallback_models.clone(),
            default_model: self.default_model.clone(),
            from_fallback: true,
        }
    }

    fn fetch_remote_models(&self) -> Result<ModelCatalog> {
        let resp = ureq::get(&self.url(&self.api.endpoints.models))
            .timeout(self.timeout)
            .call()
            .map_err(|e| self.classify(e))?;

        let parsed: ModelsResponse = resp
            .into_json()
            .map_err(|e| self.classify_body_error(e))?;

        let models = dedup_models(parsed.models);
        if models.is_empty() {
            return Err(GreenCodeError::MalformedResponse(
                "model list is empty".to_string(),
            ));
        }

        Ok(ModelCatalog {
            models,
            default_model: parsed
                .default_model
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| self.default_model.clone()),
            from_fallback: false,
        })
    }

    /// `POST /clear-cache`: ask the service to drop its loaded models.
    pub fn clear_model_cache(&self) -> Result<Ack> {
        let result = ureq::post(&self.url(&self.api.endpoints.clear_cache))
            .timeout(self.timeout)
            .call()
            .map_err(|e| self.classify(e))
            .and_then(|resp| {
                resp.into_json::<serde_json::Value>()
                    .map_err(|e| self.classify_body_error(e))
            });

        let mut entry = EventEntry::new(
            EventKind::ClearCache,
            if result.is_ok() { "complete" } else { "failed" },
        );
        if let Err(err) = &result {
            entry.error_kind = Some(err.kind().to_string());
            entry.message = Some(err.to_string());
        }
        self.log.record(&entry);

        result
            .map(|payload| Ack { payload })
            .map_err(|e| GreenCodeError::CacheClear(Box::new(e)))
    }

    // -----------------------------------------------------------------------
    // Error classification
    // -----------------------------------------------------------------------

    fn classify(&self, err: ureq::Error) -> GreenCodeError {
        match err {
            ureq::Error::Status(status, resp) => {
                let message = resp
                    .into_json::<ErrorBody>()
                    .ok()
                    .and_then(|body| body.error)
                    .filter(|msg| !msg.is_empty())
                    .unwrap_or_else(|| format!("API request failed with status {status}"));
                GreenCodeError::Http { status, message }
            }
            ureq::Error::Transport(transport) => {
                if is_timeout(&transport) {
                    self.timeout_error()
                } else {
                    GreenCodeError::Network(transport.to_string())
                }
            }
        }
    }

    fn classify_body_error(&self, err: io::Error) -> GreenCodeError {
        match err.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => self.timeout_error(),
            _ => GreenCodeError::MalformedResponse(err.to_string()),
        }
    }

    fn timeout_error(&self) -> GreenCodeError {
        GreenCodeError::Timeout {
            timeout_ms: self.timeout.as_millis() as u64,
        }
    }
}

impl AnalysisTransport for GreenCodeClient {
    fn send(&self, request: &OptimizationRequest) -> Result<AnalysisPayload> {
        GreenCodeClient::send(self, request)
    }

    fn fetch_health(&self) -> Result<HealthStatus> {
        GreenCodeClient::fetch_health(self)
    }

    fn fetch_models(&self) -> ModelCatalog {
        GreenCodeClient::fetch_models(self)
    }

    fn clear_model_cache(&self) -> Result<Ack> {
        GreenCodeClient::clear_model_cache(self)
    }
}

/// Walk the error chain looking for an I/O timeout.
fn is_timeout(transport: &ureq::Transport) -> bool {
    let mut source = transport.source();
    while let Some(err) = source {
        if let Some(io_err) = err.downcast_ref::<io::Error>()
            && matches!(
                io_err.kind(),
                io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
            )
        {
            return true;
        }
        source = err.source();
    }
    false
}

/// Map wire models to descriptors, keeping the first entry per key.
fn dedup_models(models: Vec<WireModel>) -> Vec<ModelDescriptor> {
    let mut seen = HashSet::new();
    models
        .into_iter()
        .filter(|m| !m.key.is_empty() && seen.insert(m.key.clone()))
        .map(|m| {
            let status = match m.status.as_deref() {
                Some("local") => ModelStatus::Local,
                Some("pending") => ModelStatus::Pending,
                _ => ModelStatus::Available,
            };
            ModelDescriptor {
                display_name: m.name.unwrap_or_else(|| m.key.clone()),
                description: m.description.unwrap_or_default(),
                key: m.key,
                status,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire_model(key: &str, name: Option<&str>, status: Option<&str>) -> WireModel {
        WireModel {
            key: key.to_string(),
            name: name.map(str::to_string),
            description: None,
            status: status.map(str::to_string),
        }
    }

    #[test]
    fn client_from_default_config() {
        let client = GreenCodeClient::from_config(&GreenCodeConfig::default());
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.timeout(), Duration::from_millis(30_000));
        assert!(client.send_model);
    }

    #[test]
    fn url_rewrites_localhost() {
        let client = GreenCodeClient::from_config(&GreenCodeConfig::default());
        assert_eq!(client.url("/analyze"), "http://127.0.0.1:5000/analyze");
    }

    #[test]
    fn local_catalog_uses_configured_default() {
        let client = GreenCodeClient::from_config(&GreenCodeConfig::default());
        let catalog = client.local_catalog();
        assert!(catalog.from_fallback);
        assert_eq!(catalog.default_model, "huggingface");
        assert_eq!(catalog.models.len(), 5);
    }

    #[test]
    fn dedup_keeps_first_entry_per_key() {
        let models = dedup_models(vec![
            wire_model("a", Some("First"), Some("local")),
            wire_model("b", None, Some("pending")),
            wire_model("a", Some("Second"), None),
            wire_model("", Some("Nameless"), None),
        ]);
        assert_eq!(models.len(), 2);
        assert_eq!(models[0].display_name, "First");
        assert_eq!(models[0].status, ModelStatus::Local);
        assert_eq!(models[1].display_name, "b");
        assert_eq!(models[1].status, ModelStatus::Pending);
    }

    #[test]
    fn body_timeout_maps_to_timeout_error() {
        let client = GreenCodeClient::from_config(&GreenCodeConfig::default());
        let err = client.classify_body_error(io::Error::new(io::ErrorKind::TimedOut, "slow"));
        assert_eq!(err, GreenCodeError::Timeout { timeout_ms: 30_000 });

        let err = client.classify_body_error(io::Error::new(io::ErrorKind::InvalidData, "bad"));
        assert!(matches!(err, GreenCodeError::MalformedResponse(_)));
    }
}
