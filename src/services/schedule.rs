//! Arrival/departure walk over a route plan.
//!
//! Starting at a departure time, the first located stop is reached
//! immediately and handled for its own complexity. Each later stop is
//! reached after the segment's drive time and left after its handling
//! time. Nothing is re-optimised, only times are derived.

use chrono::{NaiveTime, Timelike};
use serde::Serialize;

use crate::services::adjacency::RoutePlan;
use crate::types::Segment;

/// Computed arrival/departure for a single stop.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopSchedule {
    pub stop_id: String,
    pub estimated_arrival: NaiveTime,
    pub estimated_departure: NaiveTime,
    pub drive_minutes_from_previous: u32,
    pub handling_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResult {
    pub stops: Vec<StopSchedule>,
    /// Departure from the last stop (or the start time for an empty route)
    pub finish: NaiveTime,
    pub total_drive_minutes: u32,
    pub total_handling_minutes: u32,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn add_minutes(time: NaiveTime, minutes: u32) -> NaiveTime {
    let total_secs = time.num_seconds_from_midnight() as i64 + minutes as i64 * 60;
    let clamped = total_secs.clamp(0, 24 * 60 * 60 - 1) as u32;
    NaiveTime::from_num_seconds_from_midnight_opt(clamped, 0).unwrap_or(time)
}

/// Parse `HH:MM` as used on the command line
pub fn parse_start_time(value: &str) -> anyhow::Result<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|e| anyhow::anyhow!("invalid start time '{}' (expected HH:MM): {}", value, e))
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

pub fn compute_schedule(plan: &RoutePlan, start: NaiveTime) -> ScheduleResult {
    compute_schedule_with_segments(plan, plan.segments(), start)
}

/// Same walk over `segments` in place of the plan's own, e.g. after
/// provider refinement. `segments` must come from `plan`.
pub fn compute_schedule_with_segments(
    plan: &RoutePlan,
    segments: &[Segment],
    start: NaiveTime,
) -> ScheduleResult {
    let first = plan
        .sequence()
        .stops()
        .iter()
        .find(|s| s.valid_location().is_some());

    let Some(first) = first else {
        return ScheduleResult {
            stops: vec![],
            finish: start,
            total_drive_minutes: 0,
            total_handling_minutes: 0,
        };
    };

    let first_handling = plan.estimator().handling_minutes(first.complexity());
    let mut cursor = add_minutes(start, first_handling);
    let mut stops = Vec::with_capacity(segments.len() + 1);
    stops.push(StopSchedule {
        stop_id: first.id.clone(),
        estimated_arrival: start,
        estimated_departure: cursor,
        drive_minutes_from_previous: 0,
        handling_minutes: first_handling,
    });

    let mut total_drive: u32 = 0;
    let mut total_handling = first_handling;

    for segment in segments {
        let arrival = add_minutes(cursor, segment.drive_minutes);
        let departure = add_minutes(arrival, segment.handling_minutes);

        stops.push(StopSchedule {
            stop_id: segment.to_id.clone(),
            estimated_arrival: arrival,
            estimated_departure: departure,
            drive_minutes_from_previous: segment.drive_minutes,
            handling_minutes: segment.handling_minutes,
        });

        total_drive = total_drive.saturating_add(segment.drive_minutes);
        total_handling = total_handling.saturating_add(segment.handling_minutes);
        cursor = departure;
    }

    ScheduleResult {
        stops,
        finish: cursor,
        total_drive_minutes: total_drive,
        total_handling_minutes: total_handling,
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::timing::TimeEstimator;
    use crate::types::{RouteSequence, Stop};

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn plan(stops: Vec<Stop>) -> RoutePlan {
        RoutePlan::new(RouteSequence::new(stops).unwrap(), TimeEstimator::new())
    }

    #[test]
    fn empty_route_finishes_at_start() {
        let result = compute_schedule(&plan(vec![]), hm(8, 0));
        assert!(result.stops.is_empty());
        assert_eq!(result.finish, hm(8, 0));
        assert_eq!(result.total_drive_minutes, 0);
        assert_eq!(result.total_handling_minutes, 0);
    }

    #[test]
    fn single_stop_is_handled_at_start() {
        let result = compute_schedule(&plan(vec![Stop::new("A", 50.0, 14.0, 2)]), hm(8, 0));
        assert_eq!(result.stops.len(), 1);
        assert_eq!(result.stops[0].estimated_arrival, hm(8, 0));
        assert_eq!(result.stops[0].estimated_departure, hm(8, 40));
        assert_eq!(result.finish, hm(8, 40));
    }

    #[test]
    fn stops_follow_drive_and_handling_times() {
        // 0.5 degree of longitude at lat 50 is ~35.7 km -> 36 min at 60 km/h
        let p = plan(vec![
            Stop::new("A", 50.0, 14.0, 1),
            Stop::new("B", 50.0, 14.5, 3),
            Stop::new("C", 50.0, 14.5, 1),
        ]);
        let drive_ab = p.segments()[0].drive_minutes;
        assert_eq!(drive_ab, 36);

        let result = compute_schedule(&p, hm(8, 0));
        assert_eq!(result.stops.len(), 3);

        // A: 08:00 - 08:20
        assert_eq!(result.stops[0].estimated_departure, hm(8, 20));
        // B: arrive 08:56, 60 min handling, depart 09:56
        assert_eq!(result.stops[1].estimated_arrival, hm(8, 56));
        assert_eq!(result.stops[1].estimated_departure, hm(9, 56));
        // C: same place, no drive, 20 min handling
        assert_eq!(result.stops[2].estimated_arrival, hm(9, 56));
        assert_eq!(result.stops[2].estimated_departure, hm(10, 16));

        assert_eq!(result.finish, hm(10, 16));
        assert_eq!(result.total_drive_minutes, 36);
        assert_eq!(result.total_handling_minutes, 100);
    }

    #[test]
    fn skipped_stops_are_not_scheduled() {
        let mut broken = Stop::new("X", 0.0, 0.0, 1);
        broken.location = None;
        let result = compute_schedule(
            &plan(vec![broken, Stop::new("A", 50.0, 14.0, 1), Stop::new("B", 50.0, 14.0, 1)]),
            hm(8, 0),
        );
        let ids: Vec<_> = result.stops.iter().map(|s| s.stop_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
    }

    #[test]
    fn times_clamp_at_end_of_day() {
        let result = compute_schedule(&plan(vec![Stop::new("A", 50.0, 14.0, 3)]), hm(23, 30));
        assert_eq!(result.stops[0].estimated_departure, NaiveTime::from_hms_opt(23, 59, 59).unwrap());
    }

    #[test]
    fn huge_complexity_saturates_totals() {
        let result = compute_schedule(
            &plan(vec![Stop::new("A", 50.0, 14.0, 300_000_000), Stop::new("B", 50.0, 14.0, 300_000_000)]),
            hm(8, 0),
        );
        assert_eq!(result.total_handling_minutes, u32::MAX);
        assert_eq!(result.finish, NaiveTime::from_hms_opt(23, 59, 59).unwrap());
    }

    #[test]
    fn refined_segments_drive_the_schedule() {
        let p = plan(vec![Stop::new("A", 50.0, 14.0, 1), Stop::new("B", 50.0, 14.5, 1)]);
        let mut segments = p.segments().to_vec();
        segments[0].drive_minutes = 50;

        let result = compute_schedule_with_segments(&p, &segments, hm(8, 0));
        assert_eq!(result.stops[1].estimated_arrival, hm(9, 10));
        assert_eq!(result.total_drive_minutes, 50);
    }

    #[test]
    fn parse_start_time_accepts_hh_mm() {
        assert_eq!(parse_start_time("07:45").unwrap(), hm(7, 45));
        assert!(parse_start_time("7.45").is_err());
    }
}
