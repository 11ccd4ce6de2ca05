//! Half-open intervals over u64 and the static partitioner.

use std::fmt;

use serde::Serialize;

use crate::error::SearchError;

/// Smallest prime candidate; every search space starts here.
pub const FIRST_CANDIDATE: u64 = 2;

/// Half-open range [left, right) of unsigned integers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Interval {
    pub left: u64,
    pub right: u64,
}

impl Interval {
    /// New interval with the left <= right invariant enforced: a reversed
    /// pair collapses to the empty interval [left, left).
    pub fn new(left: u64, right: u64) -> Self {
        Self {
            left,
            right: right.max(left),
        }
    }

    /// The search space [2, upper). An upper bound of 2 or below collapses
    /// to the empty interval: zero work, not an error.
    pub fn search_space(upper: u64) -> Self {
        Self::new(FIRST_CANDIDATE, upper)
    }

    /// Number of integers in the interval.
    pub fn len(&self) -> u64 {
        self.right - self.left
    }

    pub fn is_empty(&self) -> bool {
        self.left == self.right
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.left, self.right)
    }
}

/// Split `bounds` into exactly `workers` contiguous, non-overlapping
/// intervals whose union is `bounds`. Each of the first workers-1 intervals
/// holds ⌊len/workers⌋ integers; the last extends to `bounds.right` and
/// absorbs the remainder, so it may be larger than the others (and when
/// workers exceeds the range length it holds the whole range).
pub fn partition(bounds: Interval, workers: usize) -> Result<Vec<Interval>, SearchError> {
    if workers == 0 {
        return Err(SearchError::ZeroWorkers);
    }
    let step = bounds.len() / workers as u64;
    let mut parts = Vec::with_capacity(workers);
    for i in 0..workers {
        let left = bounds.left + i as u64 * step;
        let right = if i == workers - 1 {
            bounds.right
        } else {
            left + step
        };
        parts.push(Interval::new(left, right));
    }
    Ok(parts)
}

/// Parse the CLI upper bound. Non-numeric or negative input is rejected
/// rather than silently falling back to the default.
pub fn parse_upper_bound(raw: &str) -> Result<u64, SearchError> {
    let trimmed = raw.trim();
    trimmed.parse::<u64>().map_err(|_| {
        let reason = if trimmed.starts_with('-') {
            "negative values are not allowed".to_string()
        } else {
            "expected a non-negative integer".to_string()
        };
        SearchError::InvalidArgument {
            value: raw.to_string(),
            reason,
        }
    })
}
