//! Segment derivation for an ordered route.
//!
//! Segments are always rebuilt from the whole sequence. Routes hold a few
//! dozen stops at most, so a full pass is cheap and no segment can go stale
//! after an insert, removal or move.

use serde::Serialize;
use tracing::warn;

use crate::error::RouteError;
use crate::services::geo::distance_km;
use crate::services::mutation;
use crate::services::timing::TimeEstimator;
use crate::types::{
    Coordinates, EstimateSource, RouteSequence, RouteSummary, Segment, SegmentSet, SkipReason,
    SkippedStop, Stop,
};

/// Build the straight-line segment from `from` to `to`.
pub fn build_segment(
    from: &Stop,
    from_location: &Coordinates,
    to: &Stop,
    to_location: &Coordinates,
    estimator: &TimeEstimator,
) -> Segment {
    let distance = distance_km(from_location, to_location);
    Segment {
        from_id: from.id.clone(),
        to_id: to.id.clone(),
        distance_km: distance,
        drive_minutes: estimator.drive_minutes(distance),
        handling_minutes: estimator.handling_minutes(to.complexity()),
        source: EstimateSource::StraightLine,
    }
}

/// Compute segments between consecutive stops.
///
/// Stops without a usable location are left out and reported in
/// `skipped`; their neighbours are joined directly, so a sequence of N
/// located stops always yields `max(N - 1, 0)` segments.
pub fn compute_segments(sequence: &RouteSequence, estimator: &TimeEstimator) -> SegmentSet {
    let mut segments = Vec::with_capacity(sequence.len().saturating_sub(1));
    let mut skipped = Vec::new();
    let mut previous: Option<(&Stop, Coordinates)> = None;

    for (index, stop) in sequence.stops().iter().enumerate() {
        let location = match (stop.location, stop.valid_location()) {
            (_, Some(location)) => location,
            (None, None) => {
                skipped.push(skip(stop, index, SkipReason::MissingLocation));
                continue;
            }
            (Some(_), None) => {
                skipped.push(skip(stop, index, SkipReason::InvalidLocation));
                continue;
            }
        };

        if let Some((prev_stop, prev_location)) = previous {
            segments.push(build_segment(prev_stop, &prev_location, stop, &location, estimator));
        }
        previous = Some((stop, location));
    }

    SegmentSet { segments, skipped }
}

fn skip(stop: &Stop, index: usize, reason: SkipReason) -> SkippedStop {
    warn!(
        stop_id = %stop.id,
        index,
        reason = reason.as_str(),
        "Stop excluded from segment computation"
    );
    SkippedStop {
        id: stop.id.clone(),
        index,
        reason,
    }
}

/// Sum distances and times over all segments
pub fn summarize(segments: &[Segment]) -> RouteSummary {
    let mut summary = RouteSummary {
        segment_count: segments.len(),
        ..Default::default()
    };
    for segment in segments {
        summary.total_distance_km += segment.distance_km;
        summary.total_drive_minutes = summary.total_drive_minutes.saturating_add(segment.drive_minutes);
        summary.total_handling_minutes = summary
            .total_handling_minutes
            .saturating_add(segment.handling_minutes);
    }
    summary.total_minutes = summary
        .total_drive_minutes
        .saturating_add(summary.total_handling_minutes);
    summary
}

/// A route sequence together with the segments derived from it.
///
/// Every mutation returns a new plan; the receiver is left untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePlan {
    sequence: RouteSequence,
    #[serde(flatten)]
    segments: SegmentSet,
    #[serde(skip)]
    estimator: TimeEstimator,
}

impl RoutePlan {
    pub fn new(sequence: RouteSequence, estimator: TimeEstimator) -> Self {
        let segments = compute_segments(&sequence, &estimator);
        Self {
            sequence,
            segments,
            estimator,
        }
    }

    pub fn sequence(&self) -> &RouteSequence {
        &self.sequence
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments.segments
    }

    pub fn skipped(&self) -> &[SkippedStop] {
        &self.segments.skipped
    }

    pub fn segment_set(&self) -> &SegmentSet {
        &self.segments
    }

    pub fn estimator(&self) -> &TimeEstimator {
        &self.estimator
    }

    pub fn summary(&self) -> RouteSummary {
        summarize(self.segments())
    }

    pub fn add_stop(&self, stop: Stop, at_index: Option<usize>) -> Result<Self, RouteError> {
        let sequence = mutation::add_stop(&self.sequence, stop, at_index)?;
        Ok(Self::new(sequence, self.estimator))
    }

    pub fn remove_stop(&self, id: &str) -> Self {
        Self::new(mutation::remove_stop(&self.sequence, id), self.estimator)
    }

    pub fn move_stop(&self, from_index: usize, to_index: usize) -> Result<Self, RouteError> {
        let sequence = mutation::move_stop(&self.sequence, from_index, to_index)?;
        Ok(Self::new(sequence, self.estimator))
    }
}
