//! Core data model shared by the client, orchestrator and display surfaces.
//!
//! These are the *normalized* types. The external service's response shape
//! lives in [`crate::api::wire`] and is mapped onto these by
//! [`crate::api::normalize`].

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ErrorInfo;

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Optimization objective selected by the user, passed through unmodified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationContext {
    #[default]
    EnergyEfficiency,
    Performance,
    MemoryEfficiency,
    Readability,
}

impl OptimizationContext {
    pub const ALL: [OptimizationContext; 4] = [
        Self::EnergyEfficiency,
        Self::Performance,
        Self::MemoryEfficiency,
        Self::Readability,
    ];

    /// Wire name of the context (`energy_efficiency`, `performance`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EnergyEfficiency => "energy_efficiency",
            Self::Performance => "performance",
            Self::MemoryEfficiency => "memory_efficiency",
            Self::Readability => "readability",
        }
    }

    /// Parse a context name; accepts `-` in place of `_` and any case.
    pub fn parse(val: &str) -> Option<Self> {
        match val.to_ascii_lowercase().replace('-', "_").as_str() {
            "energy_efficiency" | "energy" => Some(Self::EnergyEfficiency),
            "performance" | "speed" => Some(Self::Performance),
            "memory_efficiency" | "memory" => Some(Self::MemoryEfficiency),
            "readability" => Some(Self::Readability),
            _ => None,
        }
    }
}

impl std::fmt::Display for OptimizationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One user-initiated optimization attempt. Immutable once sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizationRequest {
    pub source_code: String,
    pub context: OptimizationContext,
    pub advanced: bool,
    pub want_variants: bool,
    /// Catalog key of the model to use.
    pub model: String,
}

impl OptimizationRequest {
    /// Build a request with advanced analysis and variants turned on.
    pub fn new(
        source_code: impl Into<String>,
        context: OptimizationContext,
        model: impl Into<String>,
    ) -> Self {
        Self {
            source_code: source_code.into(),
            context,
            advanced: true,
            want_variants: true,
            model: model.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// GreenScore pair for the original and optimized code (0–100 each).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GreenScore {
    pub original: u8,
    pub optimized: u8,
    pub improvement: i32,
}

impl GreenScore {
    /// Build a score, clamping both ratings into `[0, 100]`.
    pub fn clamped(original: i64, optimized: i64, improvement: i64) -> Self {
        Self {
            original: original.clamp(0, 100) as u8,
            optimized: optimized.clamp(0, 100) as u8,
            improvement: improvement.clamp(i32::MIN as i64, i32::MAX as i64) as i32,
        }
    }
}

/// An alternative rendition of the optimized code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeVariant {
    pub code: String,
    pub speed_score: f64,
    pub energy_score: f64,
    pub best_for_description: String,
}

/// Which variant the service recommends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Fast,
    Green,
    #[default]
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantSet {
    pub fast: CodeVariant,
    pub green: CodeVariant,
    pub trade_off: String,
    pub recommended: Recommendation,
}

/// Where a result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    /// Returned by the analysis service.
    Remote,
    /// Substituted from the local demo dataset.
    Fallback,
}

impl std::fmt::Display for ResultSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remote => write!(f, "remote"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// Normalized outcome of a successful attempt.
///
/// Produced once per attempt and replaces any prior result in full.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationResult {
    pub optimized_code: String,
    /// Absent when the service reported no score.
    pub score: Option<GreenScore>,
    pub energy_saved_joules: Option<f64>,
    pub co2_saved_grams: Option<f64>,
    /// Savings percentage per dimension (`energy`, `time`, `memory`, ...).
    pub savings_percent_by_dimension: BTreeMap<String, f64>,
    pub variants: Option<VariantSet>,
    pub context: Option<String>,
    pub model_name: Option<String>,
    pub source: ResultSource,
    /// Set when a real call failed and demo data was substituted.
    pub warning: Option<String>,
}

impl OptimizationResult {
    pub fn savings(&self, dimension: &str) -> Option<f64> {
        self.savings_percent_by_dimension.get(dimension).copied()
    }
}

// ---------------------------------------------------------------------------
// Request lifecycle
// ---------------------------------------------------------------------------

/// Lifecycle of the current attempt, owned by the orchestrator.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestState {
    #[default]
    Idle,
    InFlight,
    Complete(Arc<OptimizationResult>),
    Failed(ErrorInfo),
}

impl RequestState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::InFlight => "in_flight",
            Self::Complete(_) => "complete",
            Self::Failed(_) => "failed",
        }
    }

    pub fn result(&self) -> Option<&Arc<OptimizationResult>> {
        match self {
            Self::Complete(result) => Some(result),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete(_) | Self::Failed(_))
    }
}

/// Variant selection in the code panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantChoice {
    #[default]
    Base,
    Fast,
    Green,
}

impl VariantChoice {
    pub fn parse(val: &str) -> Option<Self> {
        match val.to_ascii_lowercase().as_str() {
            "base" | "optimized" => Some(Self::Base),
            "fast" | "speed" => Some(Self::Fast),
            "green" | "energy" => Some(Self::Green),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Model catalog / service metadata
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelStatus {
    #[default]
    Available,
    Local,
    Pending,
}

impl std::fmt::Display for ModelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available => write!(f, "available"),
            Self::Local => write!(f, "local"),
            Self::Pending => write!(f, "pending"),
        }
    }
}

/// A selectable model, unique by `key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub key: String,
    pub display_name: String,
    pub description: String,
    #[serde(default)]
    pub status: ModelStatus,
}

impl ModelDescriptor {
    pub fn new(
        key: &str,
        display_name: &str,
        description: &str,
        status: ModelStatus,
    ) -> Self {
        Self {
            key: key.to_string(),
            display_name: display_name.to_string(),
            description: description.to_string(),
            status,
        }
    }
}

/// Result of `fetch_models`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelCatalog {
    pub models: Vec<ModelDescriptor>,
    pub default_model: String,
    /// `true` when the static local catalog was substituted.
    pub from_fallback: bool,
}

impl ModelCatalog {
    pub fn get(&self, key: &str) -> Option<&ModelDescriptor> {
        self.models.iter().find(|m| m.key == key)
    }
}

/// Arbitrary health payload returned by `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthStatus {
    /// The `status` field, when the payload has one.
    pub status: Option<String>,
    pub payload: serde_json::Value,
}

impl HealthStatus {
    pub fn from_payload(payload: serde_json::Value) -> Self {
        let status = payload
            .get("status")
            .and_then(|s| s.as_str())
            .map(str::to_string);
        Self { status, payload }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self.status.as_deref(), Some("healthy") | Some("ok"))
    }
}

/// Acknowledgement payload from `POST /clear-cache`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ack {
    pub payload: serde_json::Value,
}

impl Ack {
    pub fn message(&self) -> Option<&str> {
        self.payload.get("message").and_then(|m| m.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_parses_variants() {
        assert_eq!(
            OptimizationContext::parse("energy_efficiency"),
            Some(OptimizationContext::EnergyEfficiency)
        );
        assert_eq!(
            OptimizationContext::parse("Memory-Efficiency"),
            Some(OptimizationContext::MemoryEfficiency)
        );
        assert_eq!(
            OptimizationContext::parse("performance"),
            Some(OptimizationContext::Performance)
        );
        assert_eq!(OptimizationContext::parse("speedy"), None);
    }

    #[test]
    fn context_serializes_snake_case() {
        let json = serde_json::to_string(&OptimizationContext::MemoryEfficiency).unwrap();
        assert_eq!(json, "\"memory_efficiency\"");
    }

    #[test]
    fn request_defaults_to_advanced_with_variants() {
        let req = OptimizationRequest::new("x = 1", OptimizationContext::Readability, "openai");
        assert!(req.advanced);
        assert!(req.want_variants);
        assert_eq!(req.model, "openai");
    }

    #[test]
    fn green_score_clamps_ratings() {
        let score = GreenScore::clamped(-5, 140, 145);
        assert_eq!(score.original, 0);
        assert_eq!(score.optimized, 100);
        assert_eq!(score.improvement, 145);
    }

    #[test]
    fn request_state_accessors() {
        assert_eq!(RequestState::Idle.name(), "idle");
        assert!(!RequestState::InFlight.is_terminal());
        assert!(RequestState::Idle.result().is_none());
    }

    #[test]
    fn health_status_reads_status_field() {
        let health = HealthStatus::from_payload(serde_json::json!({
            "status": "healthy",
            "message": "GreenCode AI Backend is running"
        }));
        assert!(health.is_healthy());

        let odd = HealthStatus::from_payload(serde_json::json!([1, 2]));
        assert_eq!(odd.status, None);
        assert!(!odd.is_healthy());
    }

    #[test]
    fn variant_choice_parses_aliases() {
        assert_eq!(VariantChoice::parse("speed"), Some(VariantChoice::Fast));
        assert_eq!(VariantChoice::parse("GREEN"), Some(VariantChoice::Green));
        assert_eq!(VariantChoice::parse("optimized"), Some(VariantChoice::Base));
        assert_eq!(VariantChoice::parse("balanced"), None);
    }
}
