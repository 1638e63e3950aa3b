//! Route types

use serde::{Deserialize, Serialize};

use super::Stop;
use crate::error::RouteError;

/// Ordered stops of a single delivery run. Ids are unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Stop>", into = "Vec<Stop>")]
pub struct RouteSequence {
    stops: Vec<Stop>,
}

impl RouteSequence {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a sequence, rejecting duplicate ids
    pub fn new(stops: Vec<Stop>) -> Result<Self, RouteError> {
        for (i, stop) in stops.iter().enumerate() {
            if stops[..i].iter().any(|s| s.id == stop.id) {
                return Err(RouteError::DuplicateStop { id: stop.id.clone() });
            }
        }
        Ok(Self { stops })
    }

    /// Caller guarantees unique ids
    pub(crate) fn from_unique(stops: Vec<Stop>) -> Self {
        Self { stops }
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.stops.iter().position(|s| s.id == id)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.stops.iter().map(|s| s.id.as_str()).collect()
    }
}

impl TryFrom<Vec<Stop>> for RouteSequence {
    type Error = RouteError;

    fn try_from(stops: Vec<Stop>) -> Result<Self, Self::Error> {
        Self::new(stops)
    }
}

impl From<RouteSequence> for Vec<Stop> {
    fn from(sequence: RouteSequence) -> Self {
        sequence.stops
    }
}

/// Where a segment's distance and drive time came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateSource {
    /// Great-circle distance at the configured average speed
    #[default]
    StraightLine,
    /// Returned by an external routing provider
    Routed,
}

/// Directed gap between two consecutive stops
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub from_id: String,
    pub to_id: String,
    pub distance_km: f64,
    pub drive_minutes: u32,
    /// Derived from the destination stop's complexity
    pub handling_minutes: u32,
    #[serde(default)]
    pub source: EstimateSource,
}

impl Segment {
    pub fn total_minutes(&self) -> u32 {
        self.drive_minutes.saturating_add(self.handling_minutes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MissingLocation,
    InvalidLocation,
}

impl SkipReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            SkipReason::MissingLocation => "missing_location",
            SkipReason::InvalidLocation => "invalid_location",
        }
    }
}

/// A stop left out of segment generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedStop {
    pub id: String,
    /// Position in the sequence
    pub index: usize,
    pub reason: SkipReason,
}

/// Segments derived from a sequence, plus the stops that could not take part
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentSet {
    pub segments: Vec<Segment>,
    pub skipped: Vec<SkippedStop>,
}

impl SegmentSet {
    pub fn has_warnings(&self) -> bool {
        !self.skipped.is_empty()
    }
}

/// Aggregated route totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub segment_count: usize,
    pub total_distance_km: f64,
    pub total_drive_minutes: u32,
    pub total_handling_minutes: u32,
    pub total_minutes: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_rejects_duplicate_ids() {
        let result = RouteSequence::new(vec![
            Stop::new("A", 50.0, 14.0, 1),
            Stop::new("B", 50.1, 14.1, 1),
            Stop::new("A", 50.2, 14.2, 1),
        ]);
        assert_eq!(result, Err(RouteError::DuplicateStop { id: "A".to_string() }));
    }

    #[test]
    fn test_sequence_deserialize_validates_ids() {
        let json = r#"[{"id":"A","location":{"lat":50.0,"lng":14.0}},{"id":"A"}]"#;
        let result: Result<RouteSequence, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_segment_serializes_camel_case() {
        let segment = Segment {
            from_id: "A".to_string(),
            to_id: "B".to_string(),
            distance_km: 1.5,
            drive_minutes: 2,
            handling_minutes: 40,
            source: EstimateSource::StraightLine,
        };
        let json = serde_json::to_string(&segment).unwrap();
        assert!(json.contains("\"fromId\":\"A\""));
        assert!(json.contains("\"handlingMinutes\":40"));
        assert!(json.contains("\"source\":\"straight_line\""));
        assert_eq!(segment.total_minutes(), 42);
    }

    #[test]
    fn test_total_minutes_saturates() {
        let segment = Segment {
            from_id: "A".to_string(),
            to_id: "B".to_string(),
            distance_km: 30.0,
            drive_minutes: 30,
            handling_minutes: u32::MAX,
            source: EstimateSource::StraightLine,
        };
        assert_eq!(segment.total_minutes(), u32::MAX);
    }
}
