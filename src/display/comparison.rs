//! Side-by-side comparison of the fast and green variants.

use colored::Colorize;

use crate::events::OptimizationEvent;
use crate::model::{OptimizationResult, Recommendation, VariantSet};

#[derive(Debug, Clone, Default)]
pub struct ComparisonPanel {
    variants: Option<VariantSet>,
}

impl ComparisonPanel {
    pub fn apply(&mut self, event: &OptimizationEvent) {
        if let OptimizationEvent::Completed(result) = event {
            self.show(result);
        }
    }

    pub fn show(&mut self, result: &OptimizationResult) {
        self.variants = result.variants.clone();
    }

    pub fn variants(&self) -> Option<&VariantSet> {
        self.variants.as_ref()
    }

    /// How much faster the fast variant scores than the green one (never negative).
    pub fn speed_advantage(&self) -> Option<f64> {
        self.variants
            .as_ref()
            .map(|v| (v.fast.speed_score - v.green.speed_score).max(0.0))
    }

    /// How much greener the green variant scores than the fast one (never negative).
    pub fn energy_advantage(&self) -> Option<f64> {
        self.variants
            .as_ref()
            .map(|v| (v.green.energy_score - v.fast.energy_score).max(0.0))
    }

    pub fn render(&self) -> String {
        let Some(v) = &self.variants else {
            return format!("{}\n", "No variants for this result.".dimmed());
        };

        let mut out = String::new();
        out.push_str(&format!("{}\n", "Variant Comparison".bold().cyan()));
        out.push_str(&format!(
            "  {:<18} speed {:>5.0}  energy {:>5.0}  {}\n",
            "Speed Optimized",
            v.fast.speed_score,
            v.fast.energy_score,
            v.fast.best_for_description.dimmed()
        ));
        out.push_str(&format!(
            "  {:<18} speed {:>5.0}  energy {:>5.0}  {}\n",
            "Energy Optimized",
            v.green.speed_score,
            v.green.energy_score,
            v.green.best_for_description.dimmed()
        ));
        out.push_str(&format!(
            "  Speed advantage: +{:.0}   Energy advantage: +{:.0}\n",
            self.speed_advantage().unwrap_or(0.0),
            self.energy_advantage().unwrap_or(0.0)
        ));
        if !v.trade_off.is_empty() {
            out.push_str(&format!("  Trade-off: {}\n", v.trade_off));
        }
        let recommended = match v.recommended {
            Recommendation::Fast => "Speed Optimized",
            Recommendation::Green => "Energy Optimized",
            Recommendation::Neutral => "either, depending on your priority",
        };
        out.push_str(&format!("  Recommended: {}\n", recommended.green()));
        out
    }
}
