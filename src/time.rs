/////////////////////////////////////////////////////////////////////////////////////////////
//
// Searches an ordered list of snapshot times for the pair bracketing a query time.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Searches an ordered list of snapshot times for the pair bracketing a query time.
//!
//! The search is a linear forward scan rather than a binary search: simulation
//! callers query with monotonically non-decreasing times, so threading the
//! previous result's lower index back in as the cursor makes each call
//! amortized O(1). The cursor is caller-owned state; independent callers can
//! search the same list concurrently with their own cursors.

use log::debug;
use serde::{Deserialize, Serialize};

/// One named, timestamped data snapshot.
///
/// Lists of instants are caller-owned and must be ordered by strictly
/// increasing `value`; this module only searches them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeInstant {
    pub name: String,
    pub value: f64,
}

impl TimeInstant {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// The pair of snapshot indices bracketing a query time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBracket {
    /// Last index whose value is at or below the query time.
    pub lower: usize,

    /// `lower + 1`, or `None` when `lower` is the final snapshot; the caller
    /// then holds the last snapshot (nearest-known-value extrapolation).
    pub upper: Option<usize>,
}

/// Finds the pair of indices in `times` bracketing `value`, scanning forward
/// from just past `cursor`.
///
/// Pass `None` as the cursor on the first call; on subsequent calls with
/// non-decreasing query times, pass `Some(previous.lower)` to resume the scan
/// where it left off. A cursor of `Some(i)` asserts that `i` is a valid index
/// and `times[i].value` is already known to be at or below `value`; an
/// out-of-range cursor is a caller bug, checked in debug builds.
///
/// Returns `None` when no index at or after the scan start has a value at or
/// below `value` — the query lies before all known snapshots. This is an
/// expected, recoverable condition, not an error.
pub fn find_bracket(
    times: &[TimeInstant],
    cursor: Option<usize>,
    value: f64,
) -> Option<TimeBracket> {
    debug_assert!(
        cursor.map_or(true, |c| c < times.len()),
        "cursor {:?} out of range for {} snapshot(s)",
        cursor,
        times.len()
    );

    let start = match cursor {
        Some(c) => c + 1,
        None => 0,
    };

    let mut lower = cursor;
    for (i, instant) in times.iter().enumerate().skip(start) {
        if instant.value > value {
            break;
        }
        lower = Some(i);
    }

    let lower = lower?;
    let upper = match lower + 1 < times.len() {
        true => Some(lower + 1),
        false => None,
    };

    match upper {
        Some(hi) => debug!(
            "found time {} between index {} (t = {}) and index {} (t = {})",
            value, lower, times[lower].value, hi, times[hi].value
        ),
        None => debug!(
            "found time {} after index {} (t = {})",
            value, lower, times[lower].value
        ),
    }

    Some(TimeBracket { lower, upper })
}

/// Names of all snapshots in the list, in order.
pub fn time_names(times: &[TimeInstant]) -> Vec<&str> {
    times.iter().map(|t| t.name.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instants(values: &[f64]) -> Vec<TimeInstant> {
        values
            .iter()
            .map(|&v| TimeInstant::new(format!("{}", v), v))
            .collect()
    }

    #[test]
    fn query_between_snapshots() {
        let times = instants(&[0.0, 1.0, 2.0]);
        let bracket = find_bracket(&times, None, 1.5).unwrap();
        assert_eq!(bracket.lower, 1);
        assert_eq!(bracket.upper, Some(2));
    }

    #[test]
    fn query_before_first_snapshot() {
        let times = instants(&[1.0, 2.0]);
        assert_eq!(find_bracket(&times, None, 0.5), None);
    }

    #[test]
    fn query_after_last_snapshot() {
        let times = instants(&[0.0, 1.0]);
        let bracket = find_bracket(&times, None, 5.0).unwrap();
        assert_eq!(bracket.lower, 1);
        assert_eq!(bracket.upper, None);
    }

    #[test]
    fn query_exactly_on_a_snapshot() {
        let times = instants(&[0.0, 1.0, 2.0]);
        let bracket = find_bracket(&times, None, 1.0).unwrap();
        assert_eq!(bracket.lower, 1);
        assert_eq!(bracket.upper, Some(2));
    }

    #[test]
    fn cursor_resumes_monotonic_scan() {
        let times = instants(&[0.0, 1.0, 2.0, 3.0, 4.0]);

        let first = find_bracket(&times, None, 0.5).unwrap();
        assert_eq!(first.lower, 0);

        let second = find_bracket(&times, Some(first.lower), 2.5).unwrap();
        assert_eq!(second.lower, 2);
        assert_eq!(second.upper, Some(3));

        // Same query again with the updated cursor stays on the same bracket.
        let third = find_bracket(&times, Some(second.lower), 2.5).unwrap();
        assert_eq!(third, second);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn out_of_range_cursor_is_rejected() {
        let times = instants(&[0.0, 1.0]);
        let _ = find_bracket(&times, Some(5), 1.5);
    }

    #[test]
    fn empty_list_finds_nothing() {
        assert_eq!(find_bracket(&[], None, 1.0), None);
    }

    #[test]
    fn names_in_order() {
        let times = vec![TimeInstant::new("t0", 0.0), TimeInstant::new("t1", 1.0)];
        assert_eq!(time_names(&times), vec!["t0", "t1"]);
    }
}
