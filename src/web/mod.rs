//! Local optimization playground.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - A single-page playground for submitting code and switching variants
//! - JSON endpoints backed by one [`Orchestrator`] and one [`Dashboard`]
//!
//! Launched via `greencode web` (default: `http://127.0.0.1:9747`).
//! Requests are handled one at a time, so at most one optimization is in
//! flight.

mod api;
mod frontend;

use std::io::{Cursor, Read};

use anyhow::Result;
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::analytics::logger::EventLog;
use crate::api::{AnalysisTransport, GreenCodeClient};
use crate::config::GreenCodeConfig;
use crate::display::Dashboard;
use crate::orchestrator::Orchestrator;

/// Default bind address for `greencode web`.
pub const DEFAULT_ADDR: &str = "127.0.0.1:9747";

/// Everything a request handler needs: one editor session.
pub struct Playground<T: AnalysisTransport = GreenCodeClient> {
    pub config: GreenCodeConfig,
    pub orchestrator: Orchestrator<T>,
    pub dashboard: Dashboard,
}

impl Playground {
    pub fn new(config: GreenCodeConfig) -> Self {
        let log = EventLog::from_config(&config.logging);
        let client = GreenCodeClient::from_config(&config).with_event_log(log);
        Playground::with_transport(config, client)
    }
}

impl<T: AnalysisTransport> Playground<T> {
    /// Build a session around any transport.
    pub fn with_transport(config: GreenCodeConfig, transport: T) -> Self {
        let log = EventLog::from_config(&config.logging);
        let mut orchestrator = Orchestrator::new(transport, &config.features).with_event_log(log);
        let dashboard = Dashboard::new();
        dashboard.attach(orchestrator.publisher_mut());
        Self {
            config,
            orchestrator,
            dashboard,
        }
    }
}

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the playground server on `addr`. Blocks the current thread.
pub fn serve(addr: &str, config: GreenCodeConfig) -> Result<()> {
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    println!("greencode playground running at http://{addr}");
    println!("Analysis service: {}", config.api.base_url);
    println!("Press Ctrl+C to stop.\n");

    let mut playground = Playground::new(config);

    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        let body = if matches!(method, Method::Put | Method::Post | Method::Patch) {
            let mut buf = String::new();
            let _ = request.as_reader().read_to_string(&mut buf);
            Some(buf)
        } else {
            None
        };

        let resp = match dispatch(&mut playground, &method, &url, body.as_deref()) {
            Ok(resp) => resp,
            Err(e) => {
                let body = serde_json::json!({ "error": format!("{e:#}") }).to_string();
                Response::from_data(body.into_bytes())
                    .with_header(content_type_json())
                    .with_status_code(StatusCode(400))
            }
        };
        let _ = request.respond(resp);

        println!(
            "{} {} {}",
            method,
            url,
            chrono::Local::now().format("%H:%M:%S")
        );
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

fn dispatch<T: AnalysisTransport>(
    playground: &mut Playground<T>,
    method: &Method,
    url: &str,
    body: Option<&str>,
) -> Result<Response<Cursor<Vec<u8>>>> {
    let path = url.split('?').next().unwrap_or(url);

    match (method, path) {
        (&Method::Get, "/") | (&Method::Get, "/index.html") => Ok(serve_frontend()),

        (&Method::Post, "/api/optimize") => api::post_optimize(playground, body.unwrap_or("{}")),
        (&Method::Get, "/api/state") => api::get_state(playground),
        (&Method::Post, "/api/variant") => api::post_variant(playground, body.unwrap_or("{}")),

        (&Method::Get, "/api/models") => api::get_models(playground),
        (&Method::Get, "/api/health") => api::get_health(playground),
        (&Method::Post, "/api/clear-cache") => api::post_clear_cache(playground),

        _ => Ok(not_found()),
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn serve_frontend() -> Response<Cursor<Vec<u8>>> {
    Response::from_data(frontend::INDEX_HTML.as_bytes().to_vec())
        .with_header(content_type_html())
        .with_status_code(StatusCode(200))
}

fn not_found() -> Response<Cursor<Vec<u8>>> {
    let body = r#"{"error": "not found"}"#;
    Response::from_data(body.as_bytes().to_vec())
        .with_header(content_type_json())
        .with_status_code(StatusCode(404))
}

pub(crate) fn content_type_json() -> Header {
    Header::from_bytes("Content-Type", "application/json; charset=utf-8")
        .expect("static header is valid")
}

fn content_type_html() -> Header {
    Header::from_bytes("Content-Type", "text/html; charset=utf-8")
        .expect("static header is valid")
}
