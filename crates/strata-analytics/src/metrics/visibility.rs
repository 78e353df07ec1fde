//! Visibility metrics (Herbert Dowalil).
//!
//! - `RV(c)`: visible elements of `c` divided by all elements of `c`.
//! - `ARV`: unweighted mean of `RV` over all components.
//! - `GRV`: visible elements over all components divided by all elements
//!   over all components. Large components weigh more than in `ARV`.
//!
//! A component without elements has `RV = 0`.

use serde::Serialize;
use strata_core::MetricsComponents;
use tracing::{debug, instrument};

use super::{VisibilityOracle, ratio};

/// Visibility of one component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentVisibility {
    pub component: String,
    pub visible_elements: usize,
    pub total_elements: usize,
    pub relative_visibility: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisibilityMetrics {
    /// `RV` per component, in component order.
    pub components: Vec<ComponentVisibility>,
    pub average_relative_visibility: f64,
    pub global_relative_visibility: f64,
}

impl VisibilityMetrics {
    #[must_use]
    pub fn relative_visibility(&self, component: &str) -> Option<f64> {
        self.components
            .iter()
            .find(|c| c.component == component)
            .map(|c| c.relative_visibility)
    }
}

/// Compute visibility metrics for `components`.
#[must_use]
#[instrument(skip_all, fields(components = components.len()))]
#[allow(clippy::cast_precision_loss)]
pub fn visibility_metrics<E, O>(components: &MetricsComponents<E>, oracle: &O) -> VisibilityMetrics
where
    O: VisibilityOracle<E> + ?Sized,
{
    let per_component: Vec<ComponentVisibility> = components
        .iter()
        .map(|component| {
            let total_elements = component.len();
            let visible_elements = component
                .elements()
                .iter()
                .filter(|e| oracle.is_visible(e))
                .count();
            ComponentVisibility {
                component: component.identifier().to_string(),
                visible_elements,
                total_elements,
                relative_visibility: ratio(visible_elements, total_elements),
            }
        })
        .collect();

    let average_relative_visibility = if per_component.is_empty() {
        0.0
    } else {
        per_component.iter().map(|c| c.relative_visibility).sum::<f64>() / per_component.len() as f64
    };
    let global_relative_visibility = ratio(
        per_component.iter().map(|c| c.visible_elements).sum(),
        per_component.iter().map(|c| c.total_elements).sum(),
    );

    debug!(
        arv = average_relative_visibility,
        grv = global_relative_visibility,
        "visibility metrics computed"
    );

    VisibilityMetrics {
        components: per_component,
        average_relative_visibility,
        global_relative_visibility,
    }
}
