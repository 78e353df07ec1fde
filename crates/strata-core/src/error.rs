//! Error kinds shared by every analytics entry point.
//!
//! Each [`Error`] maps to a stable [`ErrorCode`] so rule-evaluation layers
//! can branch on the kind without matching display strings.

use std::fmt;

/// Result alias used throughout the strata crates.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    UnknownNode,
    EmptyComponentId,
    DuplicateComponentId,
    UnknownComponent,
    ResourceExhaustion,
    InvalidLimit,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::UnknownNode => "E1001",
            Self::EmptyComponentId => "E1002",
            Self::DuplicateComponentId => "E1003",
            Self::UnknownComponent => "E1004",
            Self::ResourceExhaustion => "E2001",
            Self::InvalidLimit => "E3001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::UnknownNode => "Edge references a node outside the node set",
            Self::EmptyComponentId => "Component identifier is empty",
            Self::DuplicateComponentId => "Component identifier is not unique",
            Self::UnknownComponent => "Dependency references an unknown component",
            Self::ResourceExhaustion => "SCC decomposition exceeded its work budget",
            Self::InvalidLimit => "Limit must be a positive integer",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::UnknownNode => Some("Add both endpoints of every edge to the node set."),
            Self::EmptyComponentId | Self::DuplicateComponentId => {
                Some("Give every component a distinct, non-empty identifier.")
            }
            Self::UnknownComponent => {
                Some("Declare the component before referencing it in a dependency.")
            }
            Self::ResourceExhaustion => {
                Some("Raise the SCC work budget or analyse a smaller slice of the codebase.")
            }
            Self::InvalidLimit => Some("Use a value of at least 1."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// What made a graph or component set unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphDefect {
    /// Edge number `edge` (input order) has an endpoint outside the node set.
    #[error("edge #{edge} references unknown node {node}")]
    UnknownNode { edge: usize, node: String },

    /// Component at `position` has an empty identifier.
    #[error("component #{position} has an empty identifier")]
    EmptyComponentId { position: usize },

    #[error("component identifier '{0}' is used more than once")]
    DuplicateComponentId(String),

    #[error("dependency references unknown component '{0}'")]
    UnknownComponent(String),
}

impl GraphDefect {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownNode { .. } => ErrorCode::UnknownNode,
            Self::EmptyComponentId { .. } => ErrorCode::EmptyComponentId,
            Self::DuplicateComponentId(_) => ErrorCode::DuplicateComponentId,
            Self::UnknownComponent(_) => ErrorCode::UnknownComponent,
        }
    }
}

/// Errors returned by graph construction, cycle detection and metrics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid graph: {0}")]
    InvalidGraph(#[from] GraphDefect),

    /// The SCC decomposition needed more work units than its budget allows.
    #[error("SCC decomposition exhausted its budget of {budget} work units")]
    ResourceExhaustion { budget: u64 },

    /// A limit value was not a positive integer.
    #[error("invalid configuration for '{key}': {reason}")]
    Configuration { key: String, reason: String },
}

impl Error {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidGraph(defect) => defect.code(),
            Self::ResourceExhaustion { .. } => ErrorCode::ResourceExhaustion,
            Self::Configuration { .. } => ErrorCode::InvalidLimit,
        }
    }

    pub(crate) fn configuration(key: &str, reason: impl Into<String>) -> Self {
        Self::Configuration {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}
