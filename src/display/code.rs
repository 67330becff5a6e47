//! Optimized-code panel with fast/green variant switching.

use colored::Colorize;

use crate::events::OptimizationEvent;
use crate::model::{OptimizationResult, VariantChoice, VariantSet};

/// Shows the optimized code of the latest result, or one of its variants.
#[derive(Debug, Clone, Default)]
pub struct CodePanel {
    base_code: String,
    variants: Option<VariantSet>,
    selected: VariantChoice,
    model_name: Option<String>,
    warning: Option<String>,
    error: Option<String>,
}

impl CodePanel {
    pub fn apply(&mut self, event: &OptimizationEvent) {
        match event {
            OptimizationEvent::Completed(result) => self.show(result),
            OptimizationEvent::Failed(info) => self.error = Some(info.message.clone()),
        }
    }

    /// Display a new result. Selection goes back to the base code.
    pub fn show(&mut self, result: &OptimizationResult) {
        self.base_code = result.optimized_code.clone();
        self.variants = result.variants.clone();
        self.selected = VariantChoice::Base;
        self.model_name = result.model_name.clone();
        self.warning = result.warning.clone();
        self.error = None;
    }

    /// Switch the displayed code and return it.
    ///
    /// Asking for `Fast` or `Green` when the result has no variants changes
    /// nothing.
    pub fn select_variant(&mut self, which: VariantChoice) -> &str {
        if which == VariantChoice::Base || self.variants.is_some() {
            self.selected = which;
        }
        self.displayed_code()
    }

    pub fn displayed_code(&self) -> &str {
        match (self.selected, &self.variants) {
            (VariantChoice::Fast, Some(v)) => &v.fast.code,
            (VariantChoice::Green, Some(v)) => &v.green.code,
            _ => &self.base_code,
        }
    }

    pub fn selected(&self) -> VariantChoice {
        self.selected
    }

    pub fn has_variants(&self) -> bool {
        self.variants.is_some()
    }

    pub fn label(&self) -> &str {
        match self.selected {
            VariantChoice::Fast => "Speed Optimized",
            VariantChoice::Green => "Energy Optimized",
            VariantChoice::Base => self.model_name.as_deref().unwrap_or("Optimized"),
        }
    }

    /// Dismissible error from the last failed attempt.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(err) = &self.error {
            out.push_str(&format!("{}\n", err.red()));
        }
        if let Some(warning) = &self.warning {
            out.push_str(&format!("{}\n", warning.yellow()));
        }
        if self.base_code.is_empty() {
            out.push_str(&format!("{}\n", "No optimized code yet.".dimmed()));
            return out;
        }
        out.push_str(&format!("{}\n", self.label().bold().cyan()));
        out.push_str(&"-".repeat(60));
        out.push('\n');
        out.push_str(self.displayed_code());
        out.push('\n');
        if self.has_variants() {
            out.push_str(&format!(
                "{}\n",
                "Variants available: base | fast | green".dimmed()
            ));
        }
        out
    }
}
