//! Inclusive code point intervals and range search
//!
//! Tables of intervals must be sorted by `first` with no two intervals
//! overlapping. That is checked by the test suite, not at runtime.

/// An inclusive range of code points, `first..=last`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    pub first: u32,
    pub last: u32,
}

impl Interval {
    pub const fn new(first: u32, last: u32) -> Self {
        Self { first, last }
    }

    /// Check if a code point falls inside this interval
    pub const fn contains(&self, point: u32) -> bool {
        point >= self.first && point <= self.last
    }
}

/// Binary search a sorted interval table for `point`.
///
/// Points outside the table's overall span are rejected before any probe.
pub fn contains(point: u32, table: &[Interval]) -> bool {
    let (Some(lowest), Some(highest)) = (table.first(), table.last()) else {
        return false;
    };
    if point < lowest.first || point > highest.last {
        return false;
    }

    // Half-open window [min, max) so the bounds never underflow
    let mut min = 0;
    let mut max = table.len();
    while min < max {
        let mid = min + (max - min) / 2;
        let interval = &table[mid];
        if point > interval.last {
            min = mid + 1;
        } else if point < interval.first {
            max = mid;
        } else {
            return true;
        }
    }

    false
}

/// Check that a table is strictly sorted and free of overlaps
pub fn is_well_formed(table: &[Interval]) -> bool {
    table.iter().all(|i| i.first <= i.last)
        && table.windows(2).all(|pair| pair[0].last < pair[1].first)
}
