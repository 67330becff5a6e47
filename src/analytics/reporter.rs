//! Analytics reporter: aggregates the JSONL event log for `greencode stats`.

use std::collections::HashMap;

use crate::analytics::logger::{EventEntry, EventKind, EventLog};

// ---------------------------------------------------------------------------
// Aggregated stats
// ---------------------------------------------------------------------------

/// Summary statistics over optimization attempts.
#[derive(Debug)]
pub struct Stats {
    pub total_attempts: usize,
    pub outcomes: OutcomeDistribution,
    /// Mean GreenScore improvement over attempts that reported one.
    pub avg_score_improvement: f64,
    /// Mean latency over attempts that reported one (milliseconds).
    pub avg_latency_ms: f64,
    /// Attempts per optimization context, most frequent first.
    pub context_counts: Vec<(String, usize)>,
    pub models_fallbacks: usize,
    pub cache_clears: usize,
}

/// How attempts ended.
#[derive(Debug, Default)]
pub struct OutcomeDistribution {
    pub remote: usize,
    pub fallback: usize,
    pub failed: usize,
}

impl OutcomeDistribution {
    pub fn total(&self) -> usize {
        self.remote + self.fallback + self.failed
    }

    /// Percentage for a given bucket, 0.0 when there is no data.
    pub fn pct(&self, count: usize) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            (count as f64 / total as f64) * 100.0
        }
    }
}

// ---------------------------------------------------------------------------
// Stats computation
// ---------------------------------------------------------------------------

/// Compute stats from the event log, optionally limited to the last `days`.
pub fn compute_stats(log: &EventLog, days: Option<u32>) -> Stats {
    build_stats(&log.read_since_days(days))
}

fn build_stats(entries: &[EventEntry]) -> Stats {
    let attempts: Vec<&EventEntry> = entries
        .iter()
        .filter(|e| e.kind == EventKind::Optimize)
        .collect();

    let mut outcomes = OutcomeDistribution::default();
    let mut contexts: HashMap<&str, usize> = HashMap::new();
    for entry in &attempts {
        match (entry.outcome.as_str(), entry.source.as_deref()) {
            ("complete", Some("fallback")) => outcomes.fallback += 1,
            ("complete", _) => outcomes.remote += 1,
            _ => outcomes.failed += 1,
        }
        if let Some(ctx) = entry.context.as_deref() {
            *contexts.entry(ctx).or_default() += 1;
        }
    }

    let mut context_counts: Vec<(String, usize)> = contexts
        .into_iter()
        .map(|(ctx, count)| (ctx.to_string(), count))
        .collect();
    context_counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    Stats {
        total_attempts: attempts.len(),
        outcomes,
        avg_score_improvement: mean(attempts.iter().filter_map(|e| e.score_improvement.map(f64::from))),
        avg_latency_ms: mean(attempts.iter().filter_map(|e| e.latency_ms.map(|ms| ms as f64))),
        context_counts,
        models_fallbacks: count_kind(entries, EventKind::ModelsFallback),
        cache_clears: count_kind(entries, EventKind::ClearCache),
    }
}

fn count_kind(entries: &[EventEntry], kind: EventKind) -> usize {
    entries.iter().filter(|e| e.kind == kind).count()
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 { 0.0 } else { sum / n as f64 }
}
