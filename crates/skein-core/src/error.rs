use std::fmt;

use thiserror::Error;

/// Geometric relationship that prevents a unique solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Parallel,
    Coincident,
    NonCoplanar,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::Parallel => write!(f, "parallel"),
            Relation::Coincident => write!(f, "coincident"),
            Relation::NonCoplanar => write!(f, "non-coplanar"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SkeinError {
    #[error("Construction error: {0}")]
    Construction(String),

    #[error("Parameter {param} outside range [{lower}, {upper}]")]
    ParameterRange { param: f64, lower: f64, upper: f64 },

    #[error("Tolerance violation: {0}")]
    Tolerance(String),

    #[error("Relationship error ({relation}): {detail}")]
    Relationship { relation: Relation, detail: String },

    #[error("{search} did not converge within {iterations} iterations")]
    Convergence {
        search: &'static str,
        iterations: usize,
    },

    #[error("Topology error: {0}")]
    Topology(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl SkeinError {
    pub fn relationship(relation: Relation, detail: impl Into<String>) -> Self {
        Self::Relationship {
            relation,
            detail: detail.into(),
        }
    }

    /// True for the bounded-search failure path, as opposed to a definite answer.
    pub fn is_convergence(&self) -> bool {
        matches!(self, Self::Convergence { .. })
    }
}

pub type Result<T> = std::result::Result<T, SkeinError>;
