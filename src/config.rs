//! Configuration management

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{self, Context, Result};

use crate::defaults::{
    DEFAULT_AVERAGE_SPEED_KMH, DEFAULT_HANDLING_MINUTES_PER_COMPLEXITY, DEFAULT_HERE_ROUTING_URL,
    DEFAULT_HERE_TRANSPORT_MODE, DEFAULT_ROUTING_MAX_RETRIES, DEFAULT_ROUTING_TIMEOUT_SECONDS,
};
use crate::services::timing::TimeEstimator;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Average vehicle speed for drive time estimates
    pub average_speed_kmh: f64,

    /// Handling minutes per complexity tier
    pub handling_minutes_per_complexity: u32,

    /// HERE Maps API key (optional, straight-line estimates only when unset)
    pub here_api_key: Option<String>,

    /// HERE Routing v8 endpoint
    pub here_routing_url: String,

    /// HERE transport mode (car, truck, ...)
    pub here_transport_mode: String,

    /// Routing provider request timeout
    pub routing_timeout_seconds: u64,

    /// Retries per segment before keeping the straight-line estimate
    pub routing_max_retries: u32,

    /// Default order file for the CLI
    pub orders_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`; empty values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let average_speed_kmh: f64 = parse_or(&get, "AVERAGE_SPEED_KMH", DEFAULT_AVERAGE_SPEED_KMH)?;
        if !average_speed_kmh.is_finite() || average_speed_kmh <= 0.0 {
            anyhow::bail!("AVERAGE_SPEED_KMH must be positive (current: {})", average_speed_kmh);
        }

        let handling_minutes_per_complexity = parse_or(
            &get,
            "HANDLING_MINUTES_PER_COMPLEXITY",
            DEFAULT_HANDLING_MINUTES_PER_COMPLEXITY,
        )?;

        let here_api_key = get("HERE_MAPS_API_KEY");

        let here_routing_url =
            get("HERE_ROUTING_URL").unwrap_or_else(|| DEFAULT_HERE_ROUTING_URL.to_string());

        let here_transport_mode =
            get("HERE_TRANSPORT_MODE").unwrap_or_else(|| DEFAULT_HERE_TRANSPORT_MODE.to_string());

        let routing_timeout_seconds =
            parse_or(&get, "ROUTING_TIMEOUT_SECONDS", DEFAULT_ROUTING_TIMEOUT_SECONDS)?;

        let routing_max_retries = parse_or(&get, "ROUTING_MAX_RETRIES", DEFAULT_ROUTING_MAX_RETRIES)?;

        let orders_file = get("ORDERS_FILE").map(PathBuf::from);

        Ok(Self {
            average_speed_kmh,
            handling_minutes_per_complexity,
            here_api_key,
            here_routing_url,
            here_transport_mode,
            routing_timeout_seconds,
            routing_max_retries,
            orders_file,
        })
    }

    pub fn estimator(&self) -> TimeEstimator {
        TimeEstimator::with_params(self.average_speed_kmh, self.handling_minutes_per_complexity)
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a number (current: '{}')", key, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_config_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.average_speed_kmh, 60.0);
        assert_eq!(config.handling_minutes_per_complexity, 20);
        assert!(config.here_api_key.is_none());
        assert_eq!(config.here_routing_url, "https://router.hereapi.com/v8/routes");
        assert_eq!(config.here_transport_mode, "car");
        assert_eq!(config.routing_timeout_seconds, 10);
        assert_eq!(config.routing_max_retries, 2);
        assert!(config.orders_file.is_none());
    }

    #[test]
    fn test_config_overrides() {
        let config = config_from(&[
            ("AVERAGE_SPEED_KMH", "45.5"),
            ("HANDLING_MINUTES_PER_COMPLEXITY", "30"),
            ("HERE_MAPS_API_KEY", "secret"),
            ("HERE_TRANSPORT_MODE", "truck"),
            ("ROUTING_MAX_RETRIES", "0"),
            ("ORDERS_FILE", "data/orders.json"),
        ])
        .unwrap();

        assert_eq!(config.average_speed_kmh, 45.5);
        assert_eq!(config.handling_minutes_per_complexity, 30);
        assert_eq!(config.here_api_key.as_deref(), Some("secret"));
        assert_eq!(config.here_transport_mode, "truck");
        assert_eq!(config.routing_max_retries, 0);
        assert_eq!(config.orders_file, Some(PathBuf::from("data/orders.json")));

        let estimator = config.estimator();
        assert_eq!(estimator.handling_minutes(2), 60);
    }

    #[test]
    fn test_config_empty_api_key_is_unset() {
        let config = config_from(&[("HERE_MAPS_API_KEY", "  ")]).unwrap();
        assert!(config.here_api_key.is_none());
    }

    #[test]
    fn test_config_rejects_bad_numbers() {
        assert!(config_from(&[("AVERAGE_SPEED_KMH", "fast")]).is_err());
        assert!(config_from(&[("AVERAGE_SPEED_KMH", "0")]).is_err());
        assert!(config_from(&[("AVERAGE_SPEED_KMH", "-10")]).is_err());
        assert!(config_from(&[("HANDLING_MINUTES_PER_COMPLEXITY", "-1")]).is_err());
    }
}
