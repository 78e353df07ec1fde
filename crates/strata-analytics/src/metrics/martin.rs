//! Component dependency metrics (Robert C. Martin).
//!
//! For each component `c`, counting only other components:
//!
//! - `Ce(c)`: efferent coupling, components `c` depends on.
//! - `Ca(c)`: afferent coupling, components depending on `c`.
//! - `I(c) = Ce / (Ce + Ca)`, or 0 for an isolated component.
//! - `A(c)`: abstract share of the *visible* elements of `c`, or 0 when
//!   nothing is visible. Elements that cannot be seen from outside do not
//!   take part in coupling between components, so they are left out of
//!   abstractness as well. Martin's original definition counts all classes.
//! - `D(c) = |A + I - 1|`: normalized distance from the main sequence.

use serde::Serialize;
use strata_core::ComponentGraph;
use tracing::{debug, instrument};

use super::{AbstractnessOracle, ratio};

/// Coupling metrics of one component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentCoupling {
    pub component: String,
    pub efferent_coupling: usize,
    pub afferent_coupling: usize,
    pub instability: f64,
    pub abstractness: f64,
    pub normalized_distance_from_main_sequence: f64,
}

/// Coupling metrics for every component, in component order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentDependencyMetrics {
    pub components: Vec<ComponentCoupling>,
}

impl ComponentDependencyMetrics {
    #[must_use]
    pub fn get(&self, component: &str) -> Option<&ComponentCoupling> {
        self.components.iter().find(|c| c.component == component)
    }
}

/// Compute Martin's coupling metrics for every component of `graph`.
#[must_use]
#[instrument(skip_all, fields(components = graph.len()))]
pub fn component_dependency_metrics<E, O>(
    graph: &ComponentGraph<'_, E>,
    oracle: &O,
) -> ComponentDependencyMetrics
where
    O: AbstractnessOracle<E> + ?Sized,
{
    let components = graph
        .components()
        .iter()
        .enumerate()
        .map(|(position, component)| {
            let efferent = graph.successors(position).len();
            let afferent = graph.predecessors(position).len();
            let instability = ratio(efferent, efferent + afferent);

            let visible: Vec<&E> = component
                .elements()
                .iter()
                .filter(|e| oracle.is_visible(e))
                .collect();
            let abstract_visible = visible.iter().filter(|e| oracle.is_abstract(e)).count();
            let abstractness = ratio(abstract_visible, visible.len());

            ComponentCoupling {
                component: component.identifier().to_string(),
                efferent_coupling: efferent,
                afferent_coupling: afferent,
                instability,
                abstractness,
                normalized_distance_from_main_sequence: (abstractness + instability - 1.0).abs(),
            }
        })
        .collect::<Vec<_>>();

    debug!(components = components.len(), "component dependency metrics computed");

    ComponentDependencyMetrics { components }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::ElementClassifier;
    use strata_core::{MetricsComponent, MetricsComponents};

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct Class {
        name: &'static str,
        public: bool,
        interface: bool,
    }

    const fn class(name: &'static str, public: bool, interface: bool) -> Class {
        Class {
            name,
            public,
            interface,
        }
    }

    fn oracle() -> ElementClassifier<fn(&Class) -> bool, fn(&Class) -> bool> {
        ElementClassifier::new(|c: &Class| c.public, |c: &Class| c.interface)
    }

    fn close(actual: f64, expected: f64) -> bool {
        (actual - expected).abs() < 1e-12
    }

    #[test]
    fn instability_follows_coupling_direction() {
        let set = MetricsComponents::new([
            MetricsComponent::new("api", [class("api.Port", true, true)]),
            MetricsComponent::new("impl", [class("impl.Adapter", true, false)]),
            MetricsComponent::new("lonely", [class("lonely.Thing", true, false)]),
        ])
        .expect("valid components");
        let graph = ComponentGraph::from_component_edges(&set, [("impl", "api")]).expect("known ids");
        let m = component_dependency_metrics(&graph, &oracle());

        let imp = m.get("impl").expect("impl present");
        assert_eq!((imp.efferent_coupling, imp.afferent_coupling), (1, 0));
        assert!(close(imp.instability, 1.0));
        assert!(close(imp.normalized_distance_from_main_sequence, 0.0));

        let api = m.get("api").expect("api present");
        assert_eq!((api.efferent_coupling, api.afferent_coupling), (0, 1));
        assert!(close(api.instability, 0.0));
        assert!(close(api.abstractness, 1.0));
        assert!(close(api.normalized_distance_from_main_sequence, 0.0));

        let lonely = m.get("lonely").expect("lonely present");
        assert_eq!((lonely.efferent_coupling, lonely.afferent_coupling), (0, 0));
        assert!(close(lonely.instability, 0.0));
        assert!(close(lonely.normalized_distance_from_main_sequence, 1.0));
    }

    #[test]
    fn abstractness_ignores_hidden_elements() {
        let set = MetricsComponents::new([MetricsComponent::new(
            "core",
            [
                class("core.Api", true, true),
                class("core.Impl", true, false),
                class("core.HiddenBase", false, true),
                class("core.Helper", false, false),
            ],
        )])
        .expect("valid components");
        let graph = ComponentGraph::from_component_edges(&set, []).expect("no edges");
        let m = component_dependency_metrics(&graph, &oracle());

        let core = m.get("core").expect("core present");
        assert!(close(core.abstractness, 0.5));
        assert!(close(core.normalized_distance_from_main_sequence, 0.5));
    }

    #[test]
    fn no_visible_elements_means_zero_abstractness() {
        let set = MetricsComponents::new([MetricsComponent::new(
            "internal",
            [class("internal.Base", false, true)],
        )])
        .expect("valid components");
        let graph = ComponentGraph::from_component_edges(&set, []).expect("no edges");
        let m = component_dependency_metrics(&graph, &oracle());
        assert!(close(m.components[0].abstractness, 0.0));
    }

    #[test]
    fn duplicate_dependencies_count_once() {
        let set = MetricsComponents::new([
            MetricsComponent::new("a", [class("a.A", true, false), class("a.B", true, false)]),
            MetricsComponent::new("b", [class("b.C", true, false)]),
        ])
        .expect("valid components");
        let (a, b, c) = (
            class("a.A", true, false),
            class("a.B", true, false),
            class("b.C", true, false),
        );
        let graph = ComponentGraph::from_element_dependencies(&set, [(&a, &c), (&b, &c)]);
        let m = component_dependency_metrics(&graph, &oracle());
        assert_eq!(m.get("a").map(|c| c.efferent_coupling), Some(1));
        assert_eq!(m.get("b").map(|c| c.afferent_coupling), Some(1));
    }
}
