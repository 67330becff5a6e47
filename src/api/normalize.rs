//! Mapping from the untrusted wire payload to [`OptimizationResult`].
//!
//! Rules:
//! - `optimized_code` must be present and non-blank, otherwise the payload is
//!   rejected as malformed even though the HTTP call succeeded.
//! - The score is read from top-level `green_score`, falling back to
//!   `analysis.greenscore`.
//! - Savings strings (`"58%"`) and saved-energy strings (`"2.8"`, `"2.8 J"`)
//!   are parsed into numbers; unparseable entries are dropped.
//! - Variants are kept only when both the fast and green versions carry code.
use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use super::wire::{AnalysisPayload, WireScore, WireVariant, WireVariants};
use crate::error::{GreenCodeError, Result};
use crate::model::{
    CodeVariant, GreenScore, OptimizationResult, Recommendation, ResultSource, VariantSet,
};

/// `"58%"`, `"12.5 %"`, `"40"`.
static PERCENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(-?\d+(?:\.\d+)?)\s*%?\s*$").expect("percent regex must compile")
});

/// Leading decimal of a quantity such as `"2.8"` or `"1.5 g"`.
static QUANTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(-?\d+(?:\.\d+)?)").expect("quantity regex must compile")
});

/// Normalize a successful `/analyze` payload.
pub fn normalize(payload: AnalysisPayload) -> Result<OptimizationResult> {
    let optimized_code = match payload.optimized_code {
        Some(code) if !code.trim().is_empty() => code,
        Some(_) => {
            return Err(GreenCodeError::MalformedResponse(
                "optimized_code is empty".to_string(),
            ));
        }
        None => {
            return Err(GreenCodeError::MalformedResponse(
                "optimized_code is missing".to_string(),
            ));
        }
    };

    let score = payload
        .green_score
        .and_then(score_from_wire)
        .or_else(|| {
            payload
                .analysis
                .as_ref()
                .and_then(|a| a.greenscore)
                .and_then(score_from_wire)
        });

    let (context, model_name, savings) = match payload.optimization {
        Some(opt) => (
            opt.context,
            opt.model_name,
            opt.savings.map(parse_savings).unwrap_or_default(),
        ),
        None => (None, None, BTreeMap::new()),
    };

    Ok(OptimizationResult {
        optimized_code,
        score,
        energy_saved_joules: payload.energy_saved.as_ref().and_then(parse_quantity),
        co2_saved_grams: payload.co2_saved.as_ref().and_then(parse_quantity),
        savings_percent_by_dimension: savings,
        variants: payload.variants.and_then(variants_from_wire),
        context,
        model_name,
        source: ResultSource::Remote,
        warning: None,
    })
}

/// Parse a percentage such as `"58%"` into `58.0`.
pub fn parse_percent(raw: &str) -> Option<f64> {
    PERCENT_RE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn parse_savings(raw: BTreeMap<String, serde_json::Value>) -> BTreeMap<String, f64> {
    raw.into_iter()
        .filter_map(|(dimension, value)| {
            let pct = match &value {
                serde_json::Value::String(s) => parse_percent(s),
                serde_json::Value::Number(n) => n.as_f64(),
                _ => None,
            }?;
            Some((dimension, pct))
        })
        .collect()
}

fn parse_quantity(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => QUANTITY_RE
            .captures(s)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok()),
        _ => None,
    }
}

/// Round a wire rating into `[0, 100]`; NaN becomes 0.
fn rating(raw: f64) -> i64 {
    raw.round().clamp(0.0, 100.0) as i64
}

fn score_from_wire(score: WireScore) -> Option<GreenScore> {
    let original = rating(score.original?);
    let optimized = rating(score.optimized?);
    let improvement = score
        .improvement
        .map(|i| i.round() as i64)
        .unwrap_or(optimized - original);
    Some(GreenScore::clamped(original, optimized, improvement))
}

fn variants_from_wire(variants: WireVariants) -> Option<VariantSet> {
    let fast = variant_from_wire(variants.fast_version?)?;
    let green = variant_from_wire(variants.green_version?)?;
    let recommended = match variants.recommended.as_deref() {
        Some("fast") => Recommendation::Fast,
        Some("green") => Recommendation::Green,
        _ => Recommendation::Neutral,
    };
    Some(VariantSet {
        fast,
        green,
        trade_off: variants.trade_off.unwrap_or_default(),
        recommended,
    })
}

fn variant_from_wire(variant: WireVariant) -> Option<CodeVariant> {
    let code = variant.code.filter(|c| !c.trim().is_empty())?;
    Some(CodeVariant {
        code,
        speed_score: variant.speed.unwrap_or(0.0),
        energy_score: variant.energy.unwrap_or(0.0),
        best_for_description: variant.context.unwrap_or_default(),
    })
}
