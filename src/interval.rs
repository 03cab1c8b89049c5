use std::cmp::Ordering;
use std::fmt;

/// A closed span `[start, end]` of character offsets within one sentence.
///
/// Intervals order by start, then by end. Two disjoint intervals therefore
/// only compare equal when they are identical, which is what lets the
/// interval tree key on them directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    start: usize,
    end: usize,
}

impl Interval {
    /// Build `[start, end]`. Panics if `start > end`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(start <= end, "interval start {start} past end {end}");
        Interval { start, end }
    }

    /// The degenerate interval `[at, at]`.
    pub fn point(at: usize) -> Self {
        Interval { start: at, end: at }
    }

    /// The interval of `len` characters beginning at `start`.
    /// Panics if `len` is 0.
    pub fn with_len(start: usize, len: usize) -> Self {
        assert!(len > 0, "empty interval at {start}");
        Interval::new(start, start + len - 1)
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of offsets covered.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl Ord for Interval {
    fn cmp(&self, other: &Self) -> Ordering {
        self.start
            .cmp(&other.start)
            .then_with(|| self.end.cmp(&other.end))
    }
}

impl PartialOrd for Interval {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}
