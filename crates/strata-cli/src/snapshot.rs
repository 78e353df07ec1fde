//! JSON architecture snapshots.
//!
//! A snapshot is what an importer produced for one analysis run: the
//! components with their elements, and element-level dependencies.
//!
//! ```json
//! {
//!   "components": [
//!     {"id": "app", "elements": [{"name": "app.Main", "visible": true, "abstract": false}]}
//!   ],
//!   "dependencies": [{"origin": "app.Main", "target": "core.Service", "description": "calls"}]
//! }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use strata_core::{ComponentGraph, Graph, MetricsComponent, MetricsComponents};
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Element {
    pub name: String,
    #[serde(default)]
    pub visible: bool,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentRecord {
    pub id: String,
    #[serde(default)]
    pub elements: Vec<Element>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dependency {
    pub origin: String,
    pub target: String,
    #[serde(default)]
    pub description: String,
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.description.is_empty() {
            write!(f, "{} -> {}", self.origin, self.target)
        } else {
            write!(f, "{} -> {} ({})", self.origin, self.target, self.description)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub components: Vec<ComponentRecord>,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

impl Snapshot {
    /// Read and parse a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    #[instrument]
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let snapshot: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        debug!(
            components = snapshot.components.len(),
            dependencies = snapshot.dependencies.len(),
            "snapshot loaded"
        );
        Ok(snapshot)
    }

    /// Validated metrics components.
    ///
    /// # Errors
    ///
    /// Returns an error for empty or duplicate component identifiers.
    pub fn metrics_components(&self) -> Result<MetricsComponents<Element>> {
        let components = MetricsComponents::new(
            self.components
                .iter()
                .map(|c| MetricsComponent::new(c.id.clone(), c.elements.iter().cloned())),
        )?;
        Ok(components)
    }

    /// Component dependency graph derived from the element dependencies.
    ///
    /// # Errors
    ///
    /// Returns an error if a dependency names a component outside `components`.
    pub fn component_graph<'c>(
        &self,
        components: &'c MetricsComponents<Element>,
    ) -> Result<ComponentGraph<'c, Element>> {
        let graph = ComponentGraph::from_component_edges(
            components,
            self.crossing_dependencies().into_iter().map(|(from, to, _)| (from, to)),
        )?;
        Ok(graph)
    }

    /// Component-level multigraph for cycle detection.
    ///
    /// Every element dependency crossing two components becomes one edge
    /// between them, carrying the dependency as its descriptor. Dependencies
    /// inside one component or touching unknown elements are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error for empty or duplicate component identifiers.
    pub fn cycle_graph(&self) -> Result<Graph<String, Dependency>> {
        let components = self.metrics_components()?;
        let edges: Vec<(String, String, Dependency)> = self
            .crossing_dependencies()
            .into_iter()
            .map(|(from, to, d)| (from.to_string(), to.to_string(), d.clone()))
            .collect();

        let graph = Graph::new(
            components.iter().map(|c| c.identifier().to_string()),
            edges,
        )?;
        Ok(graph)
    }

    /// `(from, to, dependency)` for every dependency between two components.
    ///
    /// An element listed under several components counts for each of them,
    /// in the cycle graph and the metrics graph alike.
    fn crossing_dependencies(&self) -> Vec<(&str, &str, &Dependency)> {
        let mut owners: HashMap<&str, Vec<&str>> = HashMap::new();
        for component in &self.components {
            for element in &component.elements {
                let ids = owners.entry(element.name.as_str()).or_default();
                if !ids.contains(&component.id.as_str()) {
                    ids.push(component.id.as_str());
                }
            }
        }

        let mut crossing = Vec::new();
        for dependency in &self.dependencies {
            let (Some(from), Some(to)) = (
                owners.get(dependency.origin.as_str()),
                owners.get(dependency.target.as_str()),
            ) else {
                continue;
            };
            for &f in from {
                for &t in to {
                    if f != t {
                        crossing.push((f, t, dependency));
                    }
                }
            }
        }
        crossing
    }
}
