//! Error types for route mutations and provider refinement

use thiserror::Error;

/// Caller errors on a route sequence. These indicate a bug upstream
/// and are never silently repaired.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("stop {id} is already on the route")]
    DuplicateStop { id: String },

    #[error("index {index} is out of range for a route of {len} stops")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Errors from refining straight-line segments with a routing provider
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefineError {
    #[error("segment refinement was cancelled")]
    Cancelled,
}
