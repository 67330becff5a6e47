//! Configuration for greencode.
//!
//! Settings are compiled in ([`schema::GreenCodeConfig::default()`]). The
//! single runtime override is the analysis service location:
//!
//! - `GREENCODE_API_URL`: base URL of the analysis service
//!
//! Empty values are ignored so an exported-but-blank variable does not
//! break requests.
//!
//! # Usage
//!
//! ```rust,ignore
//! use greencode::config;
//!
//! let cfg = config::load();
//! let url = cfg.api.url(&cfg.api.endpoints.analyze);
//! ```

pub mod schema;

use anyhow::{Context, Result};

pub use schema::GreenCodeConfig;

/// Environment variable overriding `api.base_url`.
pub const API_URL_ENV: &str = "GREENCODE_API_URL";

/// Load the resolved configuration: defaults plus environment override.
pub fn load() -> GreenCodeConfig {
    let mut config = GreenCodeConfig::default();
    apply_env_overrides(&mut config);
    config
}

fn apply_env_overrides(config: &mut GreenCodeConfig) {
    if let Ok(val) = std::env::var(API_URL_ENV) {
        apply_base_url(config, &val);
    }
}

fn apply_base_url(config: &mut GreenCodeConfig, val: &str) {
    let val = val.trim();
    if !val.is_empty() {
        config.api.base_url = val.to_string();
    }
}

/// Show the effective configuration as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}
