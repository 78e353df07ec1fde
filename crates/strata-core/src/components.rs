//! Metrics components and the component dependency graph derived from them.
//!
//! A [`MetricsComponent`] is a named grouping of code elements (for example
//! every class of one package). Metric calculators treat each component as a
//! single node: component `A` depends on component `B` when any element of
//! `A` depends on any element of `B` and `A != B`.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeSet, HashMap, HashSet};
use std::hash::Hash;

use tracing::{debug, instrument};

use crate::error::{GraphDefect, Result};

/// A named grouping of elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsComponent<E> {
    identifier: String,
    elements: Vec<E>,
}

impl<E> MetricsComponent<E>
where
    E: Eq + Hash + Clone,
{
    /// Create a component. Repeated elements are kept once, in first-seen order.
    pub fn new(identifier: impl Into<String>, elements: impl IntoIterator<Item = E>) -> Self {
        let mut seen: HashSet<E> = HashSet::new();
        let elements = elements
            .into_iter()
            .filter(|element| seen.insert(element.clone()))
            .collect();
        Self {
            identifier: identifier.into(),
            elements,
        }
    }
}

impl<E> MetricsComponent<E> {
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    #[must_use]
    pub fn elements(&self) -> &[E] {
        &self.elements
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// A validated set of components with unique, non-empty identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsComponents<E> {
    components: Vec<MetricsComponent<E>>,
    by_id: HashMap<String, usize>,
}

impl<E> MetricsComponents<E> {
    /// # Errors
    ///
    /// Returns [`GraphDefect::EmptyComponentId`] or
    /// [`GraphDefect::DuplicateComponentId`] wrapped in
    /// [`Error::InvalidGraph`](crate::Error::InvalidGraph).
    pub fn new(components: impl IntoIterator<Item = MetricsComponent<E>>) -> Result<Self> {
        let components: Vec<MetricsComponent<E>> = components.into_iter().collect();
        let mut by_id = HashMap::with_capacity(components.len());

        for (position, component) in components.iter().enumerate() {
            if component.identifier.trim().is_empty() {
                return Err(GraphDefect::EmptyComponentId { position }.into());
            }
            if by_id.insert(component.identifier.clone(), position).is_some() {
                return Err(GraphDefect::DuplicateComponentId(component.identifier.clone()).into());
            }
        }

        Ok(Self { components, by_id })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MetricsComponent<E>> {
        self.components.iter()
    }

    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<&MetricsComponent<E>> {
        self.position(identifier).map(|i| &self.components[i])
    }

    /// Position of a component in input order.
    #[must_use]
    pub fn position(&self, identifier: &str) -> Option<usize> {
        self.by_id.get(identifier).copied()
    }
}

impl<'a, E> IntoIterator for &'a MetricsComponents<E> {
    type Item = &'a MetricsComponent<E>;
    type IntoIter = std::slice::Iter<'a, MetricsComponent<E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.iter()
    }
}

/// Directed dependencies between distinct components.
///
/// Nodes are component positions in the backing [`MetricsComponents`].
/// Edges are deduplicated and never self-referential.
#[derive(Debug, Clone)]
pub struct ComponentGraph<'c, E> {
    components: &'c MetricsComponents<E>,
    successors: Vec<BTreeSet<usize>>,
    predecessors: Vec<BTreeSet<usize>>,
}

impl<'c, E> ComponentGraph<'c, E> {
    fn empty(components: &'c MetricsComponents<E>) -> Self {
        Self {
            components,
            successors: vec![BTreeSet::new(); components.len()],
            predecessors: vec![BTreeSet::new(); components.len()],
        }
    }

    fn link(&mut self, from: usize, to: usize) {
        if from != to {
            self.successors[from].insert(to);
            self.predecessors[to].insert(from);
        }
    }

    /// Build the graph from edges already expressed as component identifiers.
    ///
    /// Self-edges are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`GraphDefect::UnknownComponent`] if an identifier is not in
    /// `components`.
    #[instrument(skip_all)]
    pub fn from_component_edges<'s>(
        components: &'c MetricsComponents<E>,
        edges: impl IntoIterator<Item = (&'s str, &'s str)>,
    ) -> Result<Self> {
        let mut graph = Self::empty(components);
        let resolve = |id: &str| {
            components
                .position(id)
                .ok_or_else(|| GraphDefect::UnknownComponent(id.to_string()))
        };

        for (from, to) in edges {
            let from = resolve(from)?;
            let to = resolve(to)?;
            graph.link(from, to);
        }

        debug!(
            components = components.len(),
            edges = graph.edge_count(),
            "component graph built from component edges"
        );
        Ok(graph)
    }

    #[must_use]
    pub const fn components(&self) -> &'c MetricsComponents<E> {
        self.components
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.successors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.successors.is_empty()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.successors.iter().map(BTreeSet::len).sum()
    }

    /// Identifier of the component at `position`.
    #[must_use]
    pub fn identifier(&self, position: usize) -> &'c str {
        self.components.components[position].identifier()
    }

    /// Positions of components `position` depends on, ascending.
    #[must_use]
    pub fn successors(&self, position: usize) -> &BTreeSet<usize> {
        &self.successors[position]
    }

    /// Positions of components depending on `position`, ascending.
    #[must_use]
    pub fn predecessors(&self, position: usize) -> &BTreeSet<usize> {
        &self.predecessors[position]
    }

    /// Identifiers of the components `identifier` depends on.
    #[must_use]
    pub fn dependencies_of(&self, identifier: &str) -> Option<Vec<&'c str>> {
        let position = self.components.position(identifier)?;
        Some(self.successors[position].iter().map(|&i| self.identifier(i)).collect())
    }

    /// Identifiers of the components depending on `identifier`.
    #[must_use]
    pub fn dependents_of(&self, identifier: &str) -> Option<Vec<&'c str>> {
        let position = self.components.position(identifier)?;
        Some(self.predecessors[position].iter().map(|&i| self.identifier(i)).collect())
    }
}

impl<'c, E> ComponentGraph<'c, E>
where
    E: Eq + Hash,
{
    /// Derive component edges from element-level dependencies.
    ///
    /// `A -> B` exists if any element of `A` depends on any element of `B`
    /// and `A != B`. Dependencies with an endpoint outside every component
    /// are ignored. An element listed in several components contributes to
    /// all of them.
    #[instrument(skip_all)]
    pub fn from_element_dependencies<'e>(
        components: &'c MetricsComponents<E>,
        dependencies: impl IntoIterator<Item = (&'e E, &'e E)>,
    ) -> Self
    where
        E: 'e,
    {
        let mut owners: HashMap<&E, Vec<usize>> = HashMap::new();
        for (position, component) in components.iter().enumerate() {
            for element in component.elements() {
                owners.entry(element).or_default().push(position);
            }
        }

        let mut graph = Self::empty(components);
        let mut ignored = 0_usize;
        for (origin, target) in dependencies {
            let (Some(from), Some(to)) = (owners.get(origin), owners.get(target)) else {
                ignored += 1;
                continue;
            };
            for &f in from {
                for &t in to {
                    graph.link(f, t);
                }
            }
        }

        debug!(
            components = components.len(),
            edges = graph.edge_count(),
            ignored,
            "component graph derived from element dependencies"
        );
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn components() -> MetricsComponents<&'static str> {
        MetricsComponents::new([
            MetricsComponent::new("app", ["app.Main", "app.Cli"]),
            MetricsComponent::new("core", ["core.Service", "core.Repo"]),
            MetricsComponent::new("util", ["util.Strings"]),
        ])
        .expect("valid components")
    }

    #[test]
    fn repeated_elements_are_kept_once() {
        let c = MetricsComponent::new("x", [1, 2, 1, 3, 2]);
        assert_eq!(c.elements(), &[1, 2, 3]);
    }

    #[test]
    fn empty_identifier_is_rejected() {
        let err = MetricsComponents::new([MetricsComponent::new("  ", [1])])
            .expect_err("blank id accepted");
        assert_eq!(
            err,
            Error::InvalidGraph(GraphDefect::EmptyComponentId { position: 0 })
        );
    }

    #[test]
    fn duplicate_identifier_is_rejected() {
        let err = MetricsComponents::new([
            MetricsComponent::new("a", [1]),
            MetricsComponent::new("a", [2]),
        ])
        .expect_err("duplicate id accepted");
        assert_eq!(
            err,
            Error::InvalidGraph(GraphDefect::DuplicateComponentId("a".into()))
        );
    }

    #[test]
    fn element_dependencies_collapse_to_component_edges() {
        let components = components();
        let deps = [
            (&"app.Main", &"core.Service"),
            (&"app.Cli", &"core.Repo"),
            (&"core.Service", &"core.Repo"),
            (&"core.Repo", &"util.Strings"),
            (&"app.Main", &"java.lang.String"),
        ];
        let graph = ComponentGraph::from_element_dependencies(&components, deps);

        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.dependencies_of("app"), Some(vec!["core"]));
        assert_eq!(graph.dependencies_of("core"), Some(vec!["util"]));
        assert_eq!(graph.dependents_of("core"), Some(vec!["app"]));
        assert_eq!(graph.dependencies_of("missing"), None);
    }

    #[test]
    fn component_edges_drop_self_edges_and_reject_unknown_ids() {
        let components = components();
        let graph = ComponentGraph::from_component_edges(
            &components,
            [("app", "app"), ("app", "core"), ("app", "core")],
        )
        .expect("known ids");
        assert_eq!(graph.edge_count(), 1);

        let err = ComponentGraph::from_component_edges(&components, [("app", "web")])
            .expect_err("unknown id accepted");
        assert_eq!(
            err,
            Error::InvalidGraph(GraphDefect::UnknownComponent("web".into()))
        );
    }
}
