//! Provider-based refinement of straight-line segments
//!
//! The adjacency model stays synchronous and pure. Routed distances and
//! drive times are layered on top: each segment is looked up with the
//! provider, retried on failure, and kept at its straight-line estimate if
//! the provider cannot answer. The whole refinement can be cancelled.

mod here;

pub use here::{HereConfig, HereRoutingClient};

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::RefineError;
use crate::services::adjacency::RoutePlan;
use crate::services::geo::distance_km;
use crate::services::timing::TimeEstimator;
use crate::types::{Coordinates, EstimateSource, Segment};

/// Distance and drive time for one leg
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegEstimate {
    pub distance_km: f64,
    pub drive_minutes: u32,
}

/// Routing service trait for abstraction (HERE, straight line, etc.)
#[async_trait]
pub trait RoutingService: Send + Sync {
    async fn leg(&self, from: &Coordinates, to: &Coordinates) -> Result<LegEstimate>;

    /// How the returned legs were obtained
    fn estimate_source(&self) -> EstimateSource {
        EstimateSource::Routed
    }

    /// Get service name for logging
    fn name(&self) -> &str;
}

/// Great-circle distance at a constant average speed. Never fails.
pub struct StraightLineRouting {
    estimator: TimeEstimator,
}

impl Default for StraightLineRouting {
    fn default() -> Self {
        Self::new(TimeEstimator::default())
    }
}

impl StraightLineRouting {
    pub fn new(estimator: TimeEstimator) -> Self {
        Self { estimator }
    }
}

#[async_trait]
impl RoutingService for StraightLineRouting {
    async fn leg(&self, from: &Coordinates, to: &Coordinates) -> Result<LegEstimate> {
        let distance = distance_km(from, to);
        Ok(LegEstimate {
            distance_km: distance,
            drive_minutes: self.estimator.drive_minutes(distance),
        })
    }

    fn estimate_source(&self) -> EstimateSource {
        EstimateSource::StraightLine
    }

    fn name(&self) -> &str {
        "StraightLine"
    }
}

/// Create routing service based on configuration.
///
/// Uses HERE when an API key is configured, straight line otherwise or if
/// the HERE client cannot be built.
pub fn create_routing_service(config: &Config) -> Box<dyn RoutingService> {
    if let Some(api_key) = &config.here_api_key {
        let here = HereConfig {
            base_url: config.here_routing_url.clone(),
            api_key: api_key.clone(),
            timeout_seconds: config.routing_timeout_seconds,
            transport_mode: config.here_transport_mode.clone(),
        };
        match HereRoutingClient::new(here) {
            Ok(client) => {
                info!("Using HERE routing at {}", config.here_routing_url);
                return Box::new(client);
            }
            Err(e) => warn!("HERE client unavailable: {}. Falling back to straight line.", e),
        }
    }

    info!("Using straight-line routing estimates");
    Box::new(StraightLineRouting::new(config.estimator()))
}

const RETRY_BACKOFF: Duration = Duration::from_millis(250);

/// Replace the plan's straight-line distances and drive times with
/// provider values.
///
/// Handling minutes always stay with the plan's estimator. Segments the
/// provider fails on after `max_retries` retries keep their straight-line
/// values.
pub async fn refine_segments(
    plan: &RoutePlan,
    service: &dyn RoutingService,
    cancel: &CancellationToken,
    max_retries: u32,
) -> Result<Vec<Segment>, RefineError> {
    let mut refined = Vec::with_capacity(plan.segments().len());

    for segment in plan.segments() {
        if cancel.is_cancelled() {
            return Err(RefineError::Cancelled);
        }

        let (Some(from), Some(to)) = (location_of(plan, &segment.from_id), location_of(plan, &segment.to_id))
        else {
            refined.push(segment.clone());
            continue;
        };

        match leg_with_retries(service, &from, &to, cancel, max_retries).await? {
            Some(leg) => refined.push(Segment {
                distance_km: leg.distance_km,
                drive_minutes: leg.drive_minutes,
                source: service.estimate_source(),
                ..segment.clone()
            }),
            None => {
                warn!(
                    from = %segment.from_id,
                    to = %segment.to_id,
                    provider = service.name(),
                    "Keeping straight-line estimate for segment"
                );
                refined.push(segment.clone());
            }
        }
    }

    Ok(refined)
}

fn location_of(plan: &RoutePlan, id: &str) -> Option<Coordinates> {
    let index = plan.sequence().position(id)?;
    plan.sequence().stops()[index].valid_location()
}

async fn leg_with_retries(
    service: &dyn RoutingService,
    from: &Coordinates,
    to: &Coordinates,
    cancel: &CancellationToken,
    max_retries: u32,
) -> Result<Option<LegEstimate>, RefineError> {
    for attempt in 0..=max_retries {
        if attempt > 0 {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(RefineError::Cancelled),
                _ = tokio::time::sleep(RETRY_BACKOFF * attempt) => {}
            }
        }

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(RefineError::Cancelled),
            result = service.leg(from, to) => result,
        };

        match result {
            Ok(leg) => return Ok(Some(leg)),
            Err(e) => debug!(attempt, provider = service.name(), "Routing request failed: {}", e),
        }
    }
    Ok(None)
}
