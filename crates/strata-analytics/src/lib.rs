#![forbid(unsafe_code)]
//! strata-analytics library.
//!
//! Dependency-graph analytics behind architecture rules:
//!
//! - [`cycles`]: bounded enumeration of elementary cycles over a
//!   [`Graph`](strata_core::Graph), preceded by a full [`scc`]
//!   decomposition.
//! - [`metrics`]: Lakos cumulative dependency, Martin coupling and
//!   visibility metrics over [`MetricsComponents`](strata_core::MetricsComponents).
//!
//! Every entry point is a synchronous, pure function of its arguments.
//! Limits are passed in explicitly; nothing is cached between calls, so
//! independent callers may run analyses concurrently on separate graphs.
//!
//! # Conventions
//!
//! - **Errors**: Use [`strata_core::Result`] for return types.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod cycles;
pub mod metrics;
pub mod scc;

pub use cycles::{Cycle, CycleStep, Cycles, detect_cycles, detect_cycles_with_budget};
pub use metrics::lakos::{LakosMetrics, balanced_binary_tree_ccd, lakos_metrics};
pub use metrics::martin::{ComponentCoupling, ComponentDependencyMetrics, component_dependency_metrics};
pub use metrics::visibility::{ComponentVisibility, VisibilityMetrics, visibility_metrics};
pub use metrics::{AbstractnessOracle, ElementClassifier, VisibilityOracle};
pub use scc::{Scc, strongly_connected_components};
