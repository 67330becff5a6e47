//! Sustainability metrics panel.

use colored::Colorize;

use crate::events::OptimizationEvent;
use crate::model::OptimizationResult;

/// GreenScore, energy, CO2 and savings figures for the latest result.
///
/// Starts out with the demo figures shown before any optimization has run.
/// Each completed result replaces every figure; fields the service omitted
/// fall back to the demo values, never to an earlier result. Failures leave
/// the panel as it was.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsPanel {
    pub original_score: u8,
    pub optimized_score: u8,
    pub improvement: i32,
    pub energy_saved_joules: f64,
    pub co2_saved_grams: f64,
    pub energy_saving_percent: f64,
}

impl Default for MetricsPanel {
    fn default() -> Self {
        Self {
            original_score: 60,
            optimized_score: 85,
            improvement: 25,
            energy_saved_joules: 2.8,
            co2_saved_grams: 1.5,
            energy_saving_percent: 58.0,
        }
    }
}

impl MetricsPanel {
    pub fn apply(&mut self, event: &OptimizationEvent) {
        if let OptimizationEvent::Completed(result) = event {
            self.show(result);
        }
    }

    /// Replace every figure. Fields the result omits show the demo values.
    pub fn show(&mut self, result: &OptimizationResult) {
        *self = Self::default();
        if let Some(score) = result.score {
            self.original_score = score.original;
            self.optimized_score = score.optimized;
            self.improvement = score.improvement;
        }
        if let Some(joules) = result.energy_saved_joules {
            self.energy_saved_joules = joules;
        }
        if let Some(grams) = result.co2_saved_grams {
            self.co2_saved_grams = grams;
        }
        if let Some(pct) = result.savings("energy") {
            self.energy_saving_percent = pct;
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}\n", "Sustainability Metrics".bold().cyan()));
        out.push_str(&format!(
            "  {} {} -> {} ({})\n",
            "GreenScore:   ".bold(),
            self.original_score,
            self.optimized_score.to_string().green(),
            format_delta(self.improvement)
        ));
        out.push_str(&format!(
            "  {} {:.1} J ({:.0}% less)\n",
            "Energy saved: ".bold(),
            self.energy_saved_joules,
            self.energy_saving_percent
        ));
        out.push_str(&format!(
            "  {} {:.1} g\n",
            "CO2 saved:    ".bold(),
            self.co2_saved_grams
        ));
        out
    }
}

fn format_delta(delta: i32) -> String {
    if delta >= 0 {
        format!("+{delta}")
    } else {
        delta.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::error::{ErrorInfo, ErrorKind};
    use crate::model::{GreenScore, ResultSource};

    fn result() -> OptimizationResult {
        OptimizationResult {
            optimized_code: "print(1)".to_string(),
            score: Some(GreenScore::clamped(40, 95, 55)),
            energy_saved_joules: Some(4.2),
            co2_saved_grams: None,
            savings_percent_by_dimension: [("energy".to_string(), 71.0)].into(),
            variants: None,
            context: None,
            model_name: None,
            source: ResultSource::Remote,
            warning: None,
        }
    }

    #[test]
    fn completed_event_overwrites_present_fields() {
        let mut panel = MetricsPanel::default();
        panel.apply(&OptimizationEvent::Completed(Arc::new(result())));

        assert_eq!(panel.original_score, 40);
        assert_eq!(panel.optimized_score, 95);
        assert_eq!(panel.improvement, 55);
        assert_eq!(panel.energy_saved_joules, 4.2);
        assert_eq!(panel.co2_saved_grams, 1.5);
        assert_eq!(panel.energy_saving_percent, 71.0);
    }

    #[test]
    fn sparse_result_does_not_keep_previous_figures() {
        let mut panel = MetricsPanel::default();
        panel.show(&result());

        let sparse = OptimizationResult {
            score: None,
            energy_saved_joules: None,
            savings_percent_by_dimension: Default::default(),
            ..result()
        };
        panel.show(&sparse);

        assert_eq!(panel, MetricsPanel::default());
    }

    #[test]
    fn failed_event_leaves_panel_unchanged() {
        let mut panel = MetricsPanel::default();
        panel.apply(&OptimizationEvent::Failed(ErrorInfo {
            kind: ErrorKind::Timeout,
            status: None,
            message: "slow".to_string(),
        }));
        assert_eq!(panel, MetricsPanel::default());
    }

    #[test]
    fn negative_improvement_renders_without_plus() {
        assert_eq!(format_delta(-5), "-5");
        assert_eq!(format_delta(25), "+25");
    }
}
