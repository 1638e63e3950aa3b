//! Delivery route timing
//!
//! Derives drive and handling time estimates between consecutive stops of a
//! delivery route and keeps them consistent as stops are added, removed or
//! reordered. Geometry and timing are pure and synchronous; order loading
//! and routing-provider refinement sit on top as async services.

pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod handlers;
pub mod services;
pub mod types;

pub use error::{RefineError, RouteError};
pub use services::adjacency::{compute_segments, summarize, RoutePlan};
pub use services::geo::distance_km;
pub use services::mutation::{add_stop, move_stop, remove_stop};
pub use services::timing::TimeEstimator;
pub use types::{Coordinates, RouteSequence, RouteSummary, Segment, SegmentSet, Stop};
