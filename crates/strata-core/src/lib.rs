#![forbid(unsafe_code)]
//! strata-core library.
//!
//! Data model shared by the strata analytics: the generic dependency
//! [`Graph`], [`MetricsComponents`] and the [`ComponentGraph`] derived from
//! them, explicit [`CycleLimits`]/[`SccBudget`] values and the error kinds.
//!
//! # Conventions
//!
//! - **Errors**: Library code returns [`Result`] with the typed [`Error`].
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//! - **Configuration**: Passed explicitly to every entry point. Nothing here
//!   reads files, the environment or global state.

pub mod components;
pub mod error;
pub mod fingerprint;
pub mod graph;
pub mod limits;

pub use components::{ComponentGraph, MetricsComponent, MetricsComponents};
pub use error::{Error, ErrorCode, GraphDefect, Result};
pub use fingerprint::graph_fingerprint;
pub use graph::{Edge, EdgeId, Graph, NodeId};
pub use limits::{CycleLimits, DEFAULT_MAX_CYCLES, DEFAULT_MAX_EDGES_PER_STEP, SccBudget};
