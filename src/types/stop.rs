//! Stop and coordinate types

use serde::{Deserialize, Serialize};

use crate::defaults::DEFAULT_COMPLEXITY;

/// Coordinates (decimal degrees, WGS84)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Finite and inside the latitude/longitude ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// One delivery order placed on a route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    pub id: String,
    /// `None` when the upstream record had no usable coordinates.
    #[serde(default)]
    pub location: Option<Coordinates>,
    /// Handling effort tier. Missing means tier 1.
    #[serde(default)]
    pub complexity: Option<u32>,
}

impl Stop {
    pub fn new(id: impl Into<String>, lat: f64, lng: f64, complexity: u32) -> Self {
        Self {
            id: id.into(),
            location: Some(Coordinates::new(lat, lng)),
            complexity: Some(complexity),
        }
    }

    /// Stop without a declared complexity tier
    pub fn without_complexity(id: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            id: id.into(),
            location: Some(Coordinates::new(lat, lng)),
            complexity: None,
        }
    }

    /// Complexity tier with the missing-field default applied
    pub fn complexity(&self) -> u32 {
        self.complexity.unwrap_or(DEFAULT_COMPLEXITY)
    }

    /// Location usable for distance computation, if any
    pub fn valid_location(&self) -> Option<Coordinates> {
        self.location.filter(Coordinates::is_valid)
    }
}
