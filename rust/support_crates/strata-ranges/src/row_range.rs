//! Inclusive interval of row positions.

use std::{
    fmt,
    ops::{Range, RangeInclusive},
};

/// An inclusive interval `[start, end]` of absolute row positions.
///
/// Every block in a block stream carries a `RowRange` describing the contiguous
/// run of positions it covers, and every cursor reports the range of the block
/// it walks. A `RowRange` is never empty: `start <= end` always holds, so a
/// range covers at least one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowRange {
    start: u64,
    end: u64,
}

impl RowRange {
    /// Creates the range `[start, end]`.
    ///
    /// # Panics
    ///
    /// Panics if `start > end`.
    #[inline]
    pub fn new(start: u64, end: u64) -> RowRange {
        assert!(start <= end, "inverted row range [{start}..{end}]");
        RowRange { start, end }
    }

    /// Creates the range `[start, end]`, or returns `None` if `start > end`.
    #[inline]
    pub fn try_new(start: u64, end: u64) -> Option<RowRange> {
        (start <= end).then_some(RowRange { start, end })
    }

    /// Creates a range covering a single position.
    #[inline]
    pub fn single(pos: u64) -> RowRange {
        RowRange {
            start: pos,
            end: pos,
        }
    }

    /// Converts a non-empty half-open range `start..end` into `[start, end - 1]`.
    ///
    /// Returns `None` for an empty half-open range.
    pub fn from_half_open(range: Range<u64>) -> Option<RowRange> {
        if range.is_empty() {
            None
        } else {
            Some(RowRange::new(range.start, range.end - 1))
        }
    }

    #[inline]
    pub fn start(&self) -> u64 {
        self.start
    }

    #[inline]
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Number of positions covered by the range (always at least one).
    ///
    /// Saturates at `u64::MAX` for the full `[0..u64::MAX]` range, which holds
    /// one more position than a `u64` can count.
    #[inline]
    pub fn length(&self) -> u64 {
        (self.end - self.start).saturating_add(1)
    }

    #[inline]
    pub fn contains(&self, pos: u64) -> bool {
        self.start <= pos && pos <= self.end
    }

    /// Returns `true` if the two ranges share at least one position.
    #[inline]
    pub fn overlaps(&self, other: &RowRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Returns `true` if this range ends strictly before `other` starts.
    #[inline]
    pub fn precedes(&self, other: &RowRange) -> bool {
        self.end < other.start
    }

    /// Returns `true` if `other` lies entirely within this range.
    #[inline]
    pub fn encloses(&self, other: &RowRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Returns the positions shared by both ranges, if any.
    pub fn intersect(&self, other: &RowRange) -> Option<RowRange> {
        RowRange::try_new(self.start.max(other.start), self.end.min(other.end))
    }

    /// Returns the equivalent half-open range `start..end + 1`.
    ///
    /// # Panics
    ///
    /// Panics if `end` is `u64::MAX`.
    #[inline]
    pub fn to_half_open(&self) -> Range<u64> {
        self.start..self.end.checked_add(1).expect("row range end overflow")
    }

    /// Iterates over all positions in the range in ascending order.
    pub fn positions(&self) -> RangeInclusive<u64> {
        self.start..=self.end
    }
}

impl fmt::Display for RowRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{}]", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::RowRange;

    #[test]
    fn test_basic_accessors() {
        let r = RowRange::new(10, 19);
        assert_eq!(r.start(), 10);
        assert_eq!(r.end(), 19);
        assert_eq!(r.length(), 10);
        assert!(r.contains(10));
        assert!(r.contains(19));
        assert!(!r.contains(9));
        assert!(!r.contains(20));
        assert_eq!(r.to_string(), "[10..19]");

        let single = RowRange::single(7);
        assert_eq!(single.length(), 1);
        assert!(single.contains(7));
        assert_eq!(single.positions().collect::<Vec<_>>(), vec![7]);
    }

    #[test]
    fn test_length_at_domain_limits() {
        assert_eq!(RowRange::new(0, u64::MAX).length(), u64::MAX);
        assert_eq!(RowRange::new(1, u64::MAX).length(), u64::MAX);
        assert_eq!(RowRange::single(u64::MAX).length(), 1);
    }

    #[test]
    #[should_panic]
    fn test_inverted_range_panics() {
        let _ = RowRange::new(5, 4);
    }

    #[test]
    fn test_try_new() {
        assert!(RowRange::try_new(5, 4).is_none());
        assert_eq!(RowRange::try_new(4, 4), Some(RowRange::single(4)));
    }

    #[test]
    fn test_overlaps() {
        let a = RowRange::new(0, 9);
        assert!(a.overlaps(&RowRange::new(9, 20)));
        assert!(a.overlaps(&RowRange::new(3, 4)));
        assert!(a.overlaps(&RowRange::new(0, 100)));
        assert!(!a.overlaps(&RowRange::new(10, 20)));
        assert!(RowRange::new(5, 14).overlaps(&RowRange::new(10, 19)));
        assert!(!RowRange::new(20, 29).overlaps(&a));
    }

    #[test]
    fn test_precedes_and_encloses() {
        let a = RowRange::new(0, 4);
        let b = RowRange::new(5, 9);
        assert!(a.precedes(&b));
        assert!(!b.precedes(&a));
        assert!(!a.precedes(&RowRange::new(4, 9)));

        assert!(RowRange::new(0, 9).encloses(&a));
        assert!(!a.encloses(&RowRange::new(0, 9)));
    }

    #[test]
    fn test_intersect() {
        let a = RowRange::new(0, 9);
        assert_eq!(a.intersect(&RowRange::new(5, 14)), Some(RowRange::new(5, 9)));
        assert_eq!(a.intersect(&RowRange::new(9, 9)), Some(RowRange::single(9)));
        assert_eq!(a.intersect(&RowRange::new(10, 14)), None);
    }

    #[test]
    fn test_half_open_conversions() {
        assert_eq!(RowRange::new(3, 7).to_half_open(), 3..8);
        assert_eq!(RowRange::from_half_open(3..8), Some(RowRange::new(3, 7)));
        assert_eq!(RowRange::from_half_open(3..3), None);
    }
}
