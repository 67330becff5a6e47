//! Deterministic demo dataset.
//!
//! Returned when real API usage is disabled, or when a real call fails and
//! mock fallback is on, so the playground always has something to show.

use std::collections::BTreeMap;

use crate::model::{
    CodeVariant, GreenScore, OptimizationResult, Recommendation, ResultSource, VariantSet,
};

pub const MOCK_OPTIMIZED_CODE: &str = "def calculate_values(data):\n    result = [item * 2 for item in data if item > 0]\n    total = sum(result)\n    return result, total";

const MOCK_FAST_CODE: &str = "def calculate_values(data):\n    filtered_data = [i for i in data if i > 0]\n    result = [i * 2 for i in filtered_data]\n    return result, sum(result)";

const MOCK_GREEN_CODE: &str = "def calculate_values(data):\n    # Process values in a single iteration to reduce energy\n    result = []\n    total = 0\n    for item in data:\n        if item > 0:\n            doubled = item * 2\n            result.append(doubled)\n            total += doubled\n    return result, total";

/// The demo result. Identical on every call.
pub fn mock_result() -> OptimizationResult {
    let savings = BTreeMap::from([
        ("energy".to_string(), 58.0),
        ("time".to_string(), 42.0),
        ("memory".to_string(), 15.0),
    ]);

    OptimizationResult {
        optimized_code: MOCK_OPTIMIZED_CODE.to_string(),
        score: Some(GreenScore {
            original: 60,
            optimized: 85,
            improvement: 25,
        }),
        energy_saved_joules: None,
        co2_saved_grams: None,
        savings_percent_by_dimension: savings,
        variants: Some(VariantSet {
            fast: CodeVariant {
                code: MOCK_FAST_CODE.to_string(),
                speed_score: 45.0,
                energy_score: 32.0,
                best_for_description: "Latency-sensitive code paths".to_string(),
            },
            green: CodeVariant {
                code: MOCK_GREEN_CODE.to_string(),
                speed_score: 30.0,
                energy_score: 65.0,
                best_for_description: "Long-running or battery-powered workloads".to_string(),
            },
            trade_off: "The fast version trades a second pass over the data for speed; the green version does a single pass to save energy.".to_string(),
            recommended: Recommendation::Green,
        }),
        context: Some("energy_efficiency".to_string()),
        model_name: None,
        source: ResultSource::Fallback,
        warning: None,
    }
}
