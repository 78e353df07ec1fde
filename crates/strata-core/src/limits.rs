//! Explicit limit values threaded through every analytics call.
//!
//! The core never reads configuration from files, the environment or
//! thread-local state. Callers resolve these values once and pass them in.

use std::num::NonZeroUsize;

use serde::Serialize;

use crate::error::{Error, Result};

/// Default cap on the number of reported cycles.
pub const DEFAULT_MAX_CYCLES: usize = 100;

/// Default cap on the number of edges reported per cycle step.
pub const DEFAULT_MAX_EDGES_PER_STEP: usize = 20;

/// Reporting caps for cycle enumeration.
///
/// Both caps only bound how much is *reported*. They never influence whether
/// a cycle is detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CycleLimits {
    max_cycles: NonZeroUsize,
    max_edges_per_step: NonZeroUsize,
}

impl CycleLimits {
    /// Build limits from raw caller values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if either value is not positive.
    pub fn new(max_cycles: i64, max_edges_per_step: i64) -> Result<Self> {
        Ok(Self {
            max_cycles: positive("max_cycles", max_cycles)?,
            max_edges_per_step: positive("max_edges_per_step", max_edges_per_step)?,
        })
    }

    #[must_use]
    pub const fn max_cycles(&self) -> usize {
        self.max_cycles.get()
    }

    #[must_use]
    pub const fn max_edges_per_step(&self) -> usize {
        self.max_edges_per_step.get()
    }
}

impl Default for CycleLimits {
    fn default() -> Self {
        Self {
            max_cycles: NonZeroUsize::new(DEFAULT_MAX_CYCLES).unwrap_or(NonZeroUsize::MIN),
            max_edges_per_step: NonZeroUsize::new(DEFAULT_MAX_EDGES_PER_STEP)
                .unwrap_or(NonZeroUsize::MIN),
        }
    }
}

/// Work budget for the strongly connected component decomposition.
///
/// One work unit is one node visit or one edge traversal. The decomposition
/// of a graph with `V` nodes and `E` edges needs roughly `V + E` units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SccBudget {
    max_work: Option<u64>,
}

impl SccBudget {
    #[must_use]
    pub const fn unbounded() -> Self {
        Self { max_work: None }
    }

    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if `max_work` is not positive.
    pub fn bounded(max_work: i64) -> Result<Self> {
        let max_work = u64::try_from(max_work)
            .ok()
            .filter(|&work| work > 0)
            .ok_or_else(|| Error::configuration("max_work", format!("{max_work} is not positive")))?;
        Ok(Self {
            max_work: Some(max_work),
        })
    }

    #[must_use]
    pub const fn max_work(&self) -> Option<u64> {
        self.max_work
    }
}

fn positive(key: &str, value: i64) -> Result<NonZeroUsize> {
    usize::try_from(value)
        .ok()
        .and_then(NonZeroUsize::new)
        .ok_or_else(|| Error::configuration(key, format!("{value} is not positive")))
}
