//! CLI command implementations.
//!
//! Provides subcommand handlers for:
//! - `greencode optimize [FILE]`: submit code and show the result
//! - `greencode health`: check the analysis service
//! - `greencode models`: list selectable models
//! - `greencode clear-cache`: drop the service's cached models
//! - `greencode stats`: summarize the local event log
//! - `greencode config`: show the effective configuration

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

use greencode::analytics::logger::EventLog;
use greencode::analytics::reporter::{self, Stats};
use greencode::api::GreenCodeClient;
use greencode::config::{self, GreenCodeConfig};
use greencode::display::Dashboard;
use greencode::model::{
    ModelCatalog, ModelStatus, OptimizationContext, OptimizationRequest, OptimizationResult,
    VariantChoice,
};
use greencode::orchestrator::Orchestrator;

/// Output format for commands that print data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            _ => Self::Table,
        }
    }
}

/// Options for `greencode optimize`.
#[derive(Debug, Clone)]
pub struct OptimizeOptions {
    pub file: Option<String>,
    pub context: String,
    pub model: Option<String>,
    pub basic: bool,
    pub no_variants: bool,
    pub show: String,
    pub format: OutputFormat,
}

// ---------------------------------------------------------------------------
// greencode optimize
// ---------------------------------------------------------------------------

/// Submit code for optimization and render the dashboard.
pub fn run_optimize(opts: OptimizeOptions) -> Result<()> {
    let cfg = config::load();

    let context = OptimizationContext::parse(&opts.context).with_context(|| {
        format!(
            "unknown context '{}' (expected one of: {})",
            opts.context,
            OptimizationContext::ALL.map(|c| c.as_str()).join(", ")
        )
    })?;
    let show = VariantChoice::parse(&opts.show)
        .with_context(|| format!("unknown variant '{}' (expected base, fast or green)", opts.show))?;
    let model = opts.model.unwrap_or_else(|| cfg.default_model.clone());
    if cfg.model(&model).is_none() {
        eprintln!(
            "{}",
            format!("warning: '{model}' is not in the local model catalog").yellow()
        );
    }

    let code = read_source(opts.file.as_deref())?;
    let request = OptimizationRequest {
        source_code: code,
        context,
        advanced: cfg.features.advanced_analysis && !opts.basic,
        want_variants: cfg.features.show_variants && !opts.no_variants,
        model,
    };

    let (mut orchestrator, dashboard) = session(&cfg);
    let outcome = orchestrator.optimize(&request);

    match opts.format {
        OutputFormat::Json => print_optimize_json(&outcome)?,
        OutputFormat::Table => {
            if outcome.is_ok() {
                let mut code_panel = dashboard.code.borrow_mut();
                if show != VariantChoice::Base && !code_panel.has_variants() {
                    eprintln!("{}", "No variants returned; showing base code.".dimmed());
                }
                code_panel.select_variant(show);
            }
            print!("{}", dashboard.render(true));
        }
    }

    outcome.map(|_| ()).map_err(anyhow::Error::new)
}

/// Build an orchestrator with the dashboard subscribed to it.
fn session(cfg: &GreenCodeConfig) -> (Orchestrator<GreenCodeClient>, Dashboard) {
    let log = EventLog::from_config(&cfg.logging);
    let client = GreenCodeClient::from_config(cfg).with_event_log(log.clone());
    let mut orchestrator = Orchestrator::new(client, &cfg.features).with_event_log(log);
    let dashboard = Dashboard::new();
    dashboard.load(orchestrator.state());
    dashboard.attach(orchestrator.publisher_mut());
    (orchestrator, dashboard)
}

fn read_source(file: Option<&str>) -> Result<String> {
    match file {
        Some("-") | None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read code from stdin")?;
            Ok(buf)
        }
        Some(path) => fs::read_to_string(Path::new(path))
            .with_context(|| format!("failed to read {path}")),
    }
}

#[derive(Serialize)]
struct OptimizeJson<'a> {
    state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a OptimizationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<greencode::error::ErrorInfo>,
}

fn print_optimize_json(
    outcome: &greencode::error::Result<std::sync::Arc<OptimizationResult>>,
) -> Result<()> {
    let body = match outcome {
        Ok(result) => OptimizeJson {
            state: "complete",
            result: Some(result.as_ref()),
            error: None,
        },
        Err(err) => OptimizeJson {
            state: "failed",
            result: None,
            error: Some(err.into()),
        },
    };
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// greencode health
// ---------------------------------------------------------------------------

/// Check configuration and service reachability.
pub fn run_health() -> Result<()> {
    let cfg = config::load();
    println!("{}", "greencode Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    print_health_item("Service URL", true, &cfg.api.base_url);
    print_health_item(
        "Real API",
        cfg.features.use_real_api,
        if cfg.features.use_real_api {
            "enabled"
        } else {
            "disabled (demo data only)"
        },
    );
    print_health_item(
        "Mock fallback",
        true,
        if cfg.features.mock_fallback { "on" } else { "off" },
    );

    let client = GreenCodeClient::from_config(&cfg);
    match client.fetch_health() {
        Ok(health) => {
            let detail = health
                .payload
                .get("message")
                .and_then(|m| m.as_str())
                .or(health.status.as_deref())
                .unwrap_or("reachable")
                .to_string();
            print_health_item("Analysis service", health.is_healthy(), &detail);
        }
        Err(err) => print_health_item("Analysis service", false, &err.to_string()),
    }

    let log = EventLog::from_config(&cfg.logging);
    let log_detail = match log.path() {
        Some(path) if path.exists() => path.display().to_string(),
        Some(_) => "no events yet".to_string(),
        None => "disabled".to_string(),
    };
    print_health_item("Event log", true, &log_detail);

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<20} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// greencode models
// ---------------------------------------------------------------------------

pub fn run_models(format: OutputFormat) -> Result<()> {
    let cfg = config::load();
    let log = EventLog::from_config(&cfg.logging);
    let catalog = GreenCodeClient::from_config(&cfg)
        .with_event_log(log)
        .fetch_models();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&catalog)?),
        OutputFormat::Table => print_models_table(&catalog),
    }
    Ok(())
}

fn print_models_table(catalog: &ModelCatalog) {
    println!("{}", "Available Models".bold().cyan());
    if catalog.from_fallback {
        println!(
            "  {}",
            "(service unreachable, showing local catalog)".yellow()
        );
    }
    for model in &catalog.models {
        let marker = if model.key == catalog.default_model {
            "*"
        } else {
            " "
        };
        let status = match model.status {
            ModelStatus::Available => model.status.to_string().green(),
            ModelStatus::Local => model.status.to_string().cyan(),
            ModelStatus::Pending => model.status.to_string().dimmed(),
        };
        println!(
            "  {} {:<14} {:<26} {:<10} {}",
            marker,
            model.key,
            truncate(&model.display_name, 26),
            status,
            model.description.dimmed()
        );
    }
}

// ---------------------------------------------------------------------------
// greencode clear-cache
// ---------------------------------------------------------------------------

pub fn run_clear_cache() -> Result<()> {
    let cfg = config::load();
    let log = EventLog::from_config(&cfg.logging);
    let ack = GreenCodeClient::from_config(&cfg)
        .with_event_log(log)
        .clear_model_cache()?;

    println!(
        "{} {}",
        "✓".green().bold(),
        ack.message().unwrap_or("Model cache cleared")
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// greencode stats
// ---------------------------------------------------------------------------

pub fn run_stats(format: OutputFormat, days: Option<u32>) -> Result<()> {
    let cfg = config::load();
    let stats = reporter::compute_stats(&EventLog::from_config(&cfg.logging), days);

    if stats.total_attempts == 0 {
        println!(
            "{}",
            "No data yet. Run `greencode optimize` to record attempts.".yellow()
        );
        return Ok(());
    }

    match format {
        OutputFormat::Json => print_stats_json(&stats)?,
        OutputFormat::Table => print_stats_table(&stats),
    }
    Ok(())
}

fn print_stats_table(stats: &Stats) {
    println!("{}", "greencode Optimization Report".bold().cyan());
    println!("{}", "=".repeat(60));
    println!();

    let o = &stats.outcomes;
    println!("  {} {}", "Attempts:       ".bold(), stats.total_attempts);
    println!(
        "  {} remote {} ({:.0}%)  fallback {} ({:.0}%)  failed {} ({:.0}%)",
        "Outcomes:       ".bold(),
        o.remote,
        o.pct(o.remote),
        o.fallback,
        o.pct(o.fallback),
        o.failed,
        o.pct(o.failed),
    );
    println!(
        "  {} {:+.1}",
        "Avg improvement:".bold(),
        stats.avg_score_improvement
    );
    println!(
        "  {} {:.0} ms",
        "Avg latency:    ".bold(),
        stats.avg_latency_ms
    );
    println!(
        "  {} {}  {} {}",
        "Model fallbacks:".bold(),
        stats.models_fallbacks,
        "Cache clears:".bold(),
        stats.cache_clears
    );

    if !stats.context_counts.is_empty() {
        println!();
        println!("{}", "Contexts".bold().cyan());
        for (i, (ctx, count)) in stats.context_counts.iter().enumerate() {
            let line = format!("  {:<20} {:>6}", ctx, count);
            if i % 2 == 0 {
                println!("{}", line);
            } else {
                println!("{}", line.dimmed());
            }
        }
    }
}

fn print_stats_json(stats: &Stats) -> Result<()> {
    let value = serde_json::json!({
        "total_attempts": stats.total_attempts,
        "outcomes": {
            "remote": stats.outcomes.remote,
            "fallback": stats.outcomes.fallback,
            "failed": stats.outcomes.failed,
        },
        "avg_score_improvement": stats.avg_score_improvement,
        "avg_latency_ms": stats.avg_latency_ms,
        "contexts": stats.context_counts.iter().map(|(ctx, count)| serde_json::json!({
            "context": ctx,
            "count": count,
        })).collect::<Vec<_>>(),
        "models_fallbacks": stats.models_fallbacks,
        "cache_clears": stats.cache_clears,
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// greencode config
// ---------------------------------------------------------------------------

pub fn run_config_show() -> Result<()> {
    println!("{}", config::show_effective_config()?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
