//! Component metrics over a [`ComponentGraph`](strata_core::ComponentGraph).
//!
//! # Overview
//!
//! Three independent metric families, each a pure function of its input:
//!
//! - **Cumulative dependency** (`lakos`): How many components does each
//!   component transitively rely on, and how does the total compare to a
//!   balanced binary tree of the same size?
//! - **Component coupling** (`martin`): Efferent/afferent coupling,
//!   instability, abstractness and distance from the main sequence.
//! - **Visibility** (`visibility`): Which share of each component's
//!   elements is visible from outside?
//!
//! Element properties (visibility, abstractness) come from the caller
//! through [`VisibilityOracle`] and [`AbstractnessOracle`]; this crate
//! never inspects elements itself.
//!
//! # Usage
//!
//! ```rust,ignore
//! use strata_analytics::metrics::{lakos::lakos_metrics, martin::component_dependency_metrics};
//! use strata_analytics::metrics::{ElementClassifier, visibility::visibility_metrics};
//!
//! let graph = ComponentGraph::from_element_dependencies(&components, deps);
//! let lakos = lakos_metrics(&graph);
//! let oracle = ElementClassifier::new(|c: &Class| c.is_public, |c: &Class| c.is_interface);
//! let martin = component_dependency_metrics(&graph, &oracle);
//! let visibility = visibility_metrics(&components, &oracle);
//! ```

pub mod lakos;
pub mod martin;
pub mod visibility;

/// Decides whether an element is visible outside its component.
pub trait VisibilityOracle<E> {
    fn is_visible(&self, element: &E) -> bool;
}

/// Decides whether an element is abstract (an interface, abstract class, trait, ...).
pub trait AbstractnessOracle<E>: VisibilityOracle<E> {
    fn is_abstract(&self, element: &E) -> bool;
}

impl<E, F> VisibilityOracle<E> for F
where
    F: Fn(&E) -> bool,
{
    fn is_visible(&self, element: &E) -> bool {
        self(element)
    }
}

/// Pairs a visibility predicate with an abstractness predicate.
#[derive(Debug, Clone, Copy)]
pub struct ElementClassifier<V, A> {
    visible: V,
    abstract_: A,
}

impl<V, A> ElementClassifier<V, A> {
    pub const fn new(visible: V, abstract_: A) -> Self {
        Self { visible, abstract_ }
    }
}

impl<E, V, A> VisibilityOracle<E> for ElementClassifier<V, A>
where
    V: Fn(&E) -> bool,
{
    fn is_visible(&self, element: &E) -> bool {
        (self.visible)(element)
    }
}

impl<E, V, A> AbstractnessOracle<E> for ElementClassifier<V, A>
where
    V: Fn(&E) -> bool,
    A: Fn(&E) -> bool,
{
    fn is_abstract(&self, element: &E) -> bool {
        (self.abstract_)(element)
    }
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
