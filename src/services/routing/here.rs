//! HERE Routing API v8 client
//!
//! API documentation:
//! https://developer.here.com/documentation/routing-api/dev_guide/index.html
//!
//! Only the route summary is requested; geometry is not needed for timing.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{LegEstimate, RoutingService};
use crate::defaults::{DEFAULT_HERE_ROUTING_URL, DEFAULT_HERE_TRANSPORT_MODE, DEFAULT_ROUTING_TIMEOUT_SECONDS};
use crate::types::Coordinates;

/// HERE client configuration
#[derive(Debug, Clone)]
pub struct HereConfig {
    /// Routes endpoint (e.g., "https://router.hereapi.com/v8/routes")
    pub base_url: String,
    pub api_key: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// car, truck, pedestrian, bicycle, ...
    pub transport_mode: String,
}

impl Default for HereConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_HERE_ROUTING_URL.to_string(),
            api_key: String::new(),
            timeout_seconds: DEFAULT_ROUTING_TIMEOUT_SECONDS,
            transport_mode: DEFAULT_HERE_TRANSPORT_MODE.to_string(),
        }
    }
}

/// HERE routing client
pub struct HereRoutingClient {
    client: Client,
    config: HereConfig,
}

impl HereRoutingClient {
    pub fn new(config: HereConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    fn build_query(&self, from: &Coordinates, to: &Coordinates) -> Vec<(&'static str, String)> {
        vec![
            ("apiKey", self.config.api_key.clone()),
            ("origin", format!("{},{}", from.lat, from.lng)),
            ("destination", format!("{},{}", to.lat, to.lng)),
            ("transportMode", self.config.transport_mode.clone()),
            ("return", "summary".to_string()),
        ]
    }
}

#[async_trait]
impl RoutingService for HereRoutingClient {
    async fn leg(&self, from: &Coordinates, to: &Coordinates) -> Result<LegEstimate> {
        let response = self
            .client
            .get(&self.config.base_url)
            .query(&self.build_query(from, to))
            .send()
            .await
            .context("Failed to send route request to HERE")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("HERE routing returned error {}: {}", status, body);
        }

        let routes: RoutesResponse = response
            .json()
            .await
            .context("Failed to parse HERE routing response")?;

        let leg = leg_from_response(&routes)?;
        debug!(distance_km = leg.distance_km, drive_minutes = leg.drive_minutes, "HERE leg");
        Ok(leg)
    }

    fn name(&self) -> &str {
        "HERE"
    }
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Deserialize)]
struct RoutesResponse {
    #[serde(default)]
    routes: Vec<HereRoute>,
}

#[derive(Debug, Deserialize)]
struct HereRoute {
    #[serde(default)]
    sections: Vec<HereSection>,
}

#[derive(Debug, Deserialize)]
struct HereSection {
    summary: SectionSummary,
}

#[derive(Debug, Deserialize)]
struct SectionSummary {
    /// meters
    length: f64,
    /// seconds, including traffic
    duration: f64,
}

/// Sum the sections of the first route
fn leg_from_response(response: &RoutesResponse) -> Result<LegEstimate> {
    let route = response.routes.first().context("HERE returned no routes")?;
    if route.sections.is_empty() {
        anyhow::bail!("HERE route has no sections");
    }

    let (meters, seconds) = route
        .sections
        .iter()
        .fold((0.0, 0.0), |(m, s), section| {
            (m + section.summary.length, s + section.summary.duration)
        });

    Ok(LegEstimate {
        distance_km: meters / 1000.0,
        drive_minutes: (seconds / 60.0).round() as u32,
    })
}
