//! Route timing services

pub mod adjacency;
pub mod geo;
pub mod mutation;
pub mod order_cache;
pub mod routing;
pub mod schedule;
pub mod timing;
