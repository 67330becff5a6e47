//! JSON API handlers for the playground.
//!
//! Each handler corresponds to an endpoint and returns a
//! `Response<Cursor<Vec<u8>>>` with JSON content.

use std::io::Cursor;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tiny_http::{Response, StatusCode};

use super::{Playground, content_type_json};
use crate::api::AnalysisTransport;
use crate::error::{ErrorInfo, ErrorKind, GreenCodeError};
use crate::model::{
    OptimizationContext, OptimizationRequest, OptimizationResult, RequestState, VariantChoice,
};

// ---------------------------------------------------------------------------
// JSON request / response types
// ---------------------------------------------------------------------------

/// `POST /api/optimize` body. Missing options fall back to config defaults.
#[derive(Debug, Deserialize)]
struct OptimizeBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    context: Option<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    advanced: Option<bool>,
    #[serde(default)]
    variants: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct VariantBody {
    which: String,
}

/// Snapshot of the orchestrator state plus the code panel.
#[derive(Debug, Serialize)]
struct StateResponse {
    state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<OptimizationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorInfo>,
    displayed_code: String,
    label: String,
    selected: VariantChoice,
    has_variants: bool,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    kind: ErrorKind,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn json_with_status<T: Serialize>(data: &T, status: u16) -> Result<Response<Cursor<Vec<u8>>>> {
    let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
    Ok(Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(status)))
}

fn json_response<T: Serialize>(data: &T) -> Result<Response<Cursor<Vec<u8>>>> {
    json_with_status(data, 200)
}

/// Map a client error to an HTTP status for the browser.
fn status_for(err: &GreenCodeError) -> u16 {
    match err.kind() {
        ErrorKind::Validation => 400,
        ErrorKind::Timeout => 504,
        _ => 502,
    }
}

fn error_response(err: &GreenCodeError, message: String) -> Result<Response<Cursor<Vec<u8>>>> {
    json_with_status(
        &ErrorResponse {
            error: message,
            kind: err.kind(),
        },
        status_for(err),
    )
}

fn state_snapshot<T: AnalysisTransport>(playground: &Playground<T>) -> StateResponse {
    let state = playground.orchestrator.state();
    let code = playground.dashboard.code.borrow();
    StateResponse {
        state: state.name(),
        result: state.result().map(|r| OptimizationResult::clone(r)),
        error: match state {
            RequestState::Failed(info) => Some(info.clone()),
            _ => None,
        },
        displayed_code: code.displayed_code().to_string(),
        label: code.label().to_string(),
        selected: code.selected(),
        has_variants: code.has_variants(),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `POST /api/optimize`: run one attempt.
pub fn post_optimize<T: AnalysisTransport>(
    playground: &mut Playground<T>,
    body: &str,
) -> Result<Response<Cursor<Vec<u8>>>> {
    let body: OptimizeBody =
        serde_json::from_str(body).context("invalid JSON in optimize request")?;

    let context = match body.context.as_deref() {
        Some(raw) => OptimizationContext::parse(raw)
            .with_context(|| format!("unknown optimization context '{raw}'"))?,
        None => OptimizationContext::default(),
    };
    let features = &playground.config.features;
    let request = OptimizationRequest {
        source_code: body.code,
        context,
        advanced: body.advanced.unwrap_or(features.advanced_analysis),
        want_variants: body.variants.unwrap_or(features.show_variants),
        model: body
            .model
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| playground.config.default_model.clone()),
    };

    match playground.orchestrator.optimize(&request) {
        Ok(_) => json_response(&state_snapshot(playground)),
        Err(err) => error_response(&err, ErrorInfo::from(&err).message),
    }
}

/// `GET /api/state`: current state and displayed code.
pub fn get_state<T: AnalysisTransport>(
    playground: &Playground<T>,
) -> Result<Response<Cursor<Vec<u8>>>> {
    json_response(&state_snapshot(playground))
}

/// `POST /api/variant`: switch the displayed variant.
pub fn post_variant<T: AnalysisTransport>(
    playground: &mut Playground<T>,
    body: &str,
) -> Result<Response<Cursor<Vec<u8>>>> {
    let body: VariantBody =
        serde_json::from_str(body).context("invalid JSON in variant request")?;
    let Some(which) = VariantChoice::parse(&body.which) else {
        return json_with_status(
            &serde_json::json!({ "error": format!("unknown variant '{}'", body.which) }),
            400,
        );
    };

    playground.dashboard.code.borrow_mut().select_variant(which);
    json_response(&state_snapshot(playground))
}

/// `GET /api/models`: model catalog (remote or static).
pub fn get_models<T: AnalysisTransport>(
    playground: &Playground<T>,
) -> Result<Response<Cursor<Vec<u8>>>> {
    json_response(&playground.orchestrator.transport().fetch_models())
}

/// `GET /api/health`: proxy the service health check.
pub fn get_health<T: AnalysisTransport>(
    playground: &Playground<T>,
) -> Result<Response<Cursor<Vec<u8>>>> {
    match playground.orchestrator.transport().fetch_health() {
        Ok(health) => json_response(&health),
        Err(err) => error_response(&err, err.to_string()),
    }
}

/// `POST /api/clear-cache`: ask the service to drop cached models.
pub fn post_clear_cache<T: AnalysisTransport>(
    playground: &Playground<T>,
) -> Result<Response<Cursor<Vec<u8>>>> {
    match playground.orchestrator.transport().clear_model_cache() {
        Ok(ack) => json_response(&ack),
        Err(err) => error_response(&err, err.to_string()),
    }
}
