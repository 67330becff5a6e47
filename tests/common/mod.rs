//! Stub analysis service for integration tests.

#![allow(dead_code)]

use std::io::Read;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use greencode::config::GreenCodeConfig;
use tiny_http::{Header, Response, Server};

/// One request as seen by the stub.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub url: String,
    pub body: String,
}

/// A canned reply.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl Reply {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

pub struct StubServer {
    pub base_url: String,
    pub requests: Receiver<Recorded>,
}

impl StubServer {
    /// Serve `replies` in order, one per incoming request, then stop.
    pub fn start(replies: Vec<Reply>) -> Self {
        let server = Server::http("127.0.0.1:0").expect("bind stub server");
        let addr = server
            .server_addr()
            .to_ip()
            .expect("stub server has an IP address");
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            for reply in replies {
                let Ok(mut request) = server.recv() else {
                    return;
                };
                let mut body = String::new();
                let _ = request.as_reader().read_to_string(&mut body);
                let _ = tx.send(Recorded {
                    method: request.method().to_string(),
                    url: request.url().to_string(),
                    body,
                });

                if !reply.delay.is_zero() {
                    thread::sleep(reply.delay);
                }
                let header = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                    .expect("valid header");
                let response = Response::from_string(reply.body)
                    .with_status_code(reply.status)
                    .with_header(header);
                let _ = request.respond(response);
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            requests: rx,
        }
    }

    /// Next recorded request, waiting briefly for the server thread.
    pub fn next_request(&self) -> Recorded {
        self.requests
            .recv_timeout(Duration::from_secs(5))
            .expect("stub server saw a request")
    }

    /// Config pointed at this stub with event logging off.
    pub fn config(&self) -> GreenCodeConfig {
        config_for(&self.base_url)
    }
}

pub fn config_for(base_url: &str) -> GreenCodeConfig {
    let mut cfg = GreenCodeConfig::default();
    cfg.api.base_url = base_url.to_string();
    cfg.logging.enabled = false;
    cfg
}

/// A URL nothing is listening on.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

pub const ANALYZE_OK: &str = r#"{
    "optimized_code": "print(1)",
    "green_score": {"original": 40, "optimized": 70},
    "energy_saved": "3.2 J",
    "co2_saved": 1.1,
    "optimization": {
        "context": "performance",
        "savings": {"energy": "35%", "time": 20, "memory": "5.5%"},
        "model_name": "HuggingFace CodeT5"
    },
    "variants": {
        "fast_version": {"code": "print(1)  # fast", "speed": 50, "energy": 20},
        "green_version": {"code": "print(1)  # green", "speed": 25, "energy": 60},
        "trade_off": "speed vs energy",
        "recommended": "fast"
    }
}"#;
