//! Drive and handling time estimates

use serde::{Deserialize, Serialize};

use crate::defaults::{DEFAULT_AVERAGE_SPEED_KMH, DEFAULT_HANDLING_MINUTES_PER_COMPLEXITY};

/// Converts distances and complexity tiers into whole minutes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEstimator {
    /// Assumed constant vehicle speed
    pub average_speed_kmh: f64,
    /// Handling time per complexity tier (tier 2 takes twice tier 1)
    pub handling_minutes_per_complexity: u32,
}

impl Default for TimeEstimator {
    fn default() -> Self {
        Self {
            average_speed_kmh: DEFAULT_AVERAGE_SPEED_KMH,
            handling_minutes_per_complexity: DEFAULT_HANDLING_MINUTES_PER_COMPLEXITY,
        }
    }
}

impl TimeEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(average_speed_kmh: f64, handling_minutes_per_complexity: u32) -> Self {
        Self {
            average_speed_kmh,
            handling_minutes_per_complexity,
        }
    }

    /// Rounded drive minutes for a distance.
    ///
    /// Any positive distance takes at least one minute, so a zero result
    /// always means the two stops share a location.
    pub fn drive_minutes(&self, distance_km: f64) -> u32 {
        if !distance_km.is_finite() || distance_km <= 0.0 {
            return 0;
        }
        let minutes = (distance_km / self.average_speed_kmh * 60.0).round();
        (minutes as u32).max(1)
    }

    /// Handling minutes at a stop of the given complexity tier
    pub fn handling_minutes(&self, complexity: u32) -> u32 {
        complexity.saturating_mul(self.handling_minutes_per_complexity)
    }
}

/// Render minutes as `"1h 5min"`, or `"45min"` below an hour
pub fn format_minutes(total_minutes: u32) -> String {
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    if hours > 0 {
        format!("{}h {}min", hours, minutes)
    } else {
        format!("{}min", minutes)
    }
}
