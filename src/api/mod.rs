//! Transport layer for the remote analysis service.
//!
//! - [`wire`]: serde types for the service's (unenforced) JSON schema
//! - [`normalize`]: mapping from wire payloads to [`crate::model`] types
//! - [`client`]: the `ureq` HTTP client

pub mod client;
pub mod normalize;
pub mod wire;

pub use client::GreenCodeClient;

use crate::error::Result;
use crate::model::{Ack, HealthStatus, ModelCatalog, OptimizationRequest};
use wire::AnalysisPayload;

/// The seam between the orchestrator and the network.
///
/// One call is one outbound request; implementations classify failures into
/// [`crate::error::GreenCodeError`] and never retry.
pub trait AnalysisTransport {
    /// Submit code for analysis and return the untrusted payload.
    fn send(&self, request: &OptimizationRequest) -> Result<AnalysisPayload>;

    fn fetch_health(&self) -> Result<HealthStatus>;

    /// Selectable models. Never fails: falls back to a local catalog.
    fn fetch_models(&self) -> ModelCatalog;

    fn clear_model_cache(&self) -> Result<Ack>;
}
