//! Structural changes to a route sequence.
//!
//! All operations take the current sequence by reference and return a new
//! one. Pool/route membership is exclusive upstream, so a duplicate id or a
//! bad index is reported as an error instead of being repaired.

use tracing::debug;

use crate::error::RouteError;
use crate::types::{RouteSequence, Stop};

/// Insert `stop` at `at_index`, or append when no index is given
pub fn add_stop(
    sequence: &RouteSequence,
    stop: Stop,
    at_index: Option<usize>,
) -> Result<RouteSequence, RouteError> {
    if sequence.contains(&stop.id) {
        return Err(RouteError::DuplicateStop { id: stop.id });
    }

    let len = sequence.len();
    let index = at_index.unwrap_or(len);
    if index > len {
        return Err(RouteError::IndexOutOfRange { index, len });
    }

    debug!(stop_id = %stop.id, index, "Adding stop to route");
    let mut stops = sequence.stops().to_vec();
    stops.insert(index, stop);
    Ok(RouteSequence::from_unique(stops))
}

/// Remove the stop with `id`. An unknown id leaves the sequence as is.
pub fn remove_stop(sequence: &RouteSequence, id: &str) -> RouteSequence {
    match sequence.position(id) {
        Some(index) => {
            debug!(stop_id = %id, index, "Removing stop from route");
            let mut stops = sequence.stops().to_vec();
            stops.remove(index);
            RouteSequence::from_unique(stops)
        }
        None => {
            debug!(stop_id = %id, "Stop not on route, nothing to remove");
            sequence.clone()
        }
    }
}

/// Move the stop at `from_index` to `to_index`, shifting the stops in between
pub fn move_stop(
    sequence: &RouteSequence,
    from_index: usize,
    to_index: usize,
) -> Result<RouteSequence, RouteError> {
    let len = sequence.len();
    for index in [from_index, to_index] {
        if index >= len {
            return Err(RouteError::IndexOutOfRange { index, len });
        }
    }

    let mut stops = sequence.stops().to_vec();
    let stop = stops.remove(from_index);
    debug!(stop_id = %stop.id, from_index, to_index, "Moving stop");
    stops.insert(to_index, stop);
    Ok(RouteSequence::from_unique(stops))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn route(ids: &[&str]) -> RouteSequence {
        RouteSequence::new(
            ids.iter()
                .enumerate()
                .map(|(i, id)| Stop::new(*id, 50.0 + i as f64 * 0.01, 14.0, 1))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_add_stop_appends_by_default() {
        let seq = add_stop(&route(&["A", "B"]), Stop::new("X", 49.0, 15.0, 2), None).unwrap();
        assert_eq!(seq.ids(), vec!["A", "B", "X"]);
    }

    #[test]
    fn test_add_stop_at_index() {
        let original = route(&["A", "B", "C"]);
        let seq = add_stop(&original, Stop::new("X", 49.0, 15.0, 2), Some(1)).unwrap();
        assert_eq!(seq.ids(), vec!["A", "X", "B", "C"]);
        assert_eq!(original.ids(), vec!["A", "B", "C"]);

        let seq = add_stop(&original, Stop::new("X", 49.0, 15.0, 2), Some(0)).unwrap();
        assert_eq!(seq.ids(), vec!["X", "A", "B", "C"]);

        let seq = add_stop(&original, Stop::new("X", 49.0, 15.0, 2), Some(3)).unwrap();
        assert_eq!(seq.ids(), vec!["A", "B", "C", "X"]);
    }

    #[test]
    fn test_add_stop_to_empty_route() {
        let seq = add_stop(&RouteSequence::empty(), Stop::new("X", 49.0, 15.0, 2), None).unwrap();
        assert_eq!(seq.ids(), vec!["X"]);
    }

    #[test]
    fn test_add_duplicate_stop_fails() {
        let result = add_stop(&route(&["A", "B"]), Stop::new("B", 49.0, 15.0, 2), None);
        assert_eq!(result, Err(RouteError::DuplicateStop { id: "B".to_string() }));
    }

    #[test]
    fn test_add_stop_past_end_fails() {
        let result = add_stop(&route(&["A", "B"]), Stop::new("X", 49.0, 15.0, 2), Some(3));
        assert_eq!(result, Err(RouteError::IndexOutOfRange { index: 3, len: 2 }));
    }

    #[test]
    fn test_remove_stop() {
        let seq = remove_stop(&route(&["A", "B", "C"]), "B");
        assert_eq!(seq.ids(), vec!["A", "C"]);
    }

    #[test]
    fn test_remove_absent_stop_is_noop() {
        let original = route(&["A", "B"]);
        let seq = remove_stop(&original, "Z");
        assert_eq!(seq, original);

        // removing twice, as when two views race
        let once = remove_stop(&original, "A");
        assert_eq!(remove_stop(&once, "A"), once);
    }

    #[test]
    fn test_add_then_remove_restores_sequence() {
        let original = route(&["A", "B", "C"]);
        for at in [None, Some(0), Some(2), Some(3)] {
            let added = add_stop(&original, Stop::new("X", 49.0, 15.0, 2), at).unwrap();
            assert_eq!(remove_stop(&added, "X"), original);
        }
    }

    #[test]
    fn test_move_stop_forward_and_backward() {
        let original = route(&["A", "B", "C", "D"]);

        assert_eq!(move_stop(&original, 0, 2).unwrap().ids(), vec!["B", "C", "A", "D"]);
        assert_eq!(move_stop(&original, 3, 1).unwrap().ids(), vec!["A", "D", "B", "C"]);
        assert_eq!(move_stop(&original, 1, 1).unwrap(), original);
    }

    #[test]
    fn test_move_stop_preserves_membership() {
        let original = route(&["A", "B", "C", "D", "E"]);
        let before: BTreeSet<String> = original.stops().iter().map(|s| s.id.clone()).collect();

        for from in 0..5 {
            for to in 0..5 {
                let moved = move_stop(&original, from, to).unwrap();
                let after: BTreeSet<String> = moved.stops().iter().map(|s| s.id.clone()).collect();
                assert_eq!(before, after);
                assert_eq!(moved.len(), original.len());
                assert_eq!(moved.stops()[to], original.stops()[from]);
            }
        }
    }

    #[test]
    fn test_move_stop_out_of_range_fails() {
        let original = route(&["A", "B"]);
        assert_eq!(move_stop(&original, 2, 0), Err(RouteError::IndexOutOfRange { index: 2, len: 2 }));
        assert_eq!(move_stop(&original, 0, 5), Err(RouteError::IndexOutOfRange { index: 5, len: 2 }));
        assert!(move_stop(&RouteSequence::empty(), 0, 0).is_err());
    }
}
