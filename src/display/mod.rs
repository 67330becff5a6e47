//! Display surfaces for optimization results.
//!
//! Each panel only renders what it is given. Panels never call the
//! orchestrator: they read its state once for the initial render and then
//! follow the publisher (see [`Dashboard::attach`]).

pub mod code;
pub mod comparison;
pub mod metrics;

use std::cell::RefCell;
use std::rc::Rc;

pub use code::CodePanel;
pub use comparison::ComparisonPanel;
pub use metrics::MetricsPanel;

use crate::events::{ResultPublisher, SubscriptionId};
use crate::model::RequestState;

/// The metrics, code and comparison panels wired to one publisher.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    pub metrics: Rc<RefCell<MetricsPanel>>,
    pub code: Rc<RefCell<CodePanel>>,
    pub comparison: Rc<RefCell<ComparisonPanel>>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial render from an orchestrator state snapshot.
    pub fn load(&self, state: &RequestState) {
        if let RequestState::Complete(result) = state {
            self.metrics.borrow_mut().show(result);
            self.code.borrow_mut().show(result);
            self.comparison.borrow_mut().show(result);
        }
    }

    /// Subscribe every panel to `publisher`.
    pub fn attach(&self, publisher: &mut ResultPublisher) -> [SubscriptionId; 3] {
        let metrics = Rc::clone(&self.metrics);
        let code = Rc::clone(&self.code);
        let comparison = Rc::clone(&self.comparison);
        [
            publisher.subscribe(move |event| metrics.borrow_mut().apply(event)),
            publisher.subscribe(move |event| code.borrow_mut().apply(event)),
            publisher.subscribe(move |event| comparison.borrow_mut().apply(event)),
        ]
    }

    pub fn render(&self, show_comparison: bool) -> String {
        let mut out = self.code.borrow().render();
        out.push('\n');
        out.push_str(&self.metrics.borrow().render());
        if show_comparison && self.code.borrow().has_variants() {
            out.push('\n');
            out.push_str(&self.comparison.borrow().render());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::events::OptimizationEvent;
    use crate::model::VariantChoice;
    use crate::orchestrator::fallback::mock_result;

    #[test]
    fn attached_panels_follow_publisher() {
        let dashboard = Dashboard::new();
        let mut publisher = ResultPublisher::new();
        dashboard.attach(&mut publisher);

        let mut result = mock_result();
        result.optimized_code = "print(1)".to_string();
        publisher.publish(&OptimizationEvent::Completed(Arc::new(result)));

        assert_eq!(dashboard.code.borrow().displayed_code(), "print(1)");
        assert_eq!(dashboard.comparison.borrow().energy_advantage(), Some(33.0));
        assert_eq!(dashboard.metrics.borrow().optimized_score, 85);
    }

    #[test]
    fn load_reads_existing_state() {
        let dashboard = Dashboard::new();
        dashboard.load(&RequestState::Complete(Arc::new(mock_result())));
        assert_eq!(
            dashboard.code.borrow_mut().select_variant(VariantChoice::Fast),
            mock_result().variants.unwrap().fast.code
        );
    }
}
