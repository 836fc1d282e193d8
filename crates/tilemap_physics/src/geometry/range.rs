//! One-dimensional interval used for axis projections

/// Closed interval `[min, max]`
///
/// The interval is empty when `min > max`. [`Range::empty`] uses
/// `[+inf, -inf]` so that extending it by any point yields that point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    /// Lower bound
    pub min: f32,
    /// Upper bound
    pub max: f32,
}

impl Default for Range {
    fn default() -> Self {
        Self::empty()
    }
}

impl Range {
    /// Create a range from explicit bounds (empty if `min > max`)
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// The canonical empty range
    pub const fn empty() -> Self {
        Self {
            min: f32::INFINITY,
            max: f32::NEG_INFINITY,
        }
    }

    /// Grow the range so that it includes `point`
    pub fn extend_to(&mut self, point: f32) {
        if self.min > point {
            self.min = point;
        }
        if self.max < point {
            self.max = point;
        }
    }

    /// Whether `point` lies within the closed interval
    pub fn contains_point(&self, point: f32) -> bool {
        self.min <= point && point <= self.max
    }

    /// Whether `other` lies inside this range
    ///
    /// The upper bound comparison is strict: a range does not contain another
    /// range sharing its maximum.
    pub fn contains_range(&self, other: &Range) -> bool {
        self.min <= other.min && self.max > other.max
    }

    /// Whether the interval is empty
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Interval length, `NaN` when empty
    pub fn length(&self) -> f32 {
        if self.is_empty() {
            f32::NAN
        } else {
            self.max - self.min
        }
    }

    /// Overlap of two ranges, the canonical empty range if they are disjoint
    pub fn intersection(a: &Range, b: &Range) -> Range {
        let range = Range::new(a.min.max(b.min), a.max.min(b.max));
        if range.is_empty() {
            Range::empty()
        } else {
            range
        }
    }

    /// Smallest range covering both inputs
    pub fn bound(a: &Range, b: &Range) -> Range {
        Range::new(a.min.min(b.min), a.max.max(b.max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_range() {
        let range = Range::empty();
        assert!(range.is_empty());
        assert!(range.length().is_nan());
        assert!(!range.contains_point(0.0));
    }

    #[test]
    fn test_extend_from_empty() {
        let mut range = Range::empty();
        range.extend_to(3.0);
        assert_eq!(range, Range::new(3.0, 3.0));
        range.extend_to(-1.0);
        range.extend_to(2.0);
        assert_eq!(range, Range::new(-1.0, 3.0));
        assert_eq!(range.length(), 4.0);
    }

    #[test]
    fn test_intersection_overlapping() {
        let a = Range::new(0.0, 5.0);
        let b = Range::new(3.0, 10.0);
        let overlap = Range::intersection(&a, &b);
        assert!(!overlap.is_empty());
        assert_eq!(overlap, Range::new(3.0, 5.0));
        assert_eq!(overlap.length(), 5.0_f32.min(10.0) - 0.0_f32.max(3.0));
    }

    #[test]
    fn test_intersection_touching_is_not_empty() {
        let overlap = Range::intersection(&Range::new(0.0, 1.0), &Range::new(1.0, 2.0));
        assert!(!overlap.is_empty());
        assert_eq!(overlap.length(), 0.0);
    }

    #[test]
    fn test_intersection_empty_iff_disjoint() {
        let samples = [
            (Range::new(0.0, 1.0), Range::new(2.0, 3.0)),
            (Range::new(2.0, 3.0), Range::new(0.0, 1.0)),
            (Range::new(-1.0, 1.0), Range::new(-0.5, 0.5)),
            (Range::new(-4.0, -2.0), Range::new(-3.0, 7.0)),
            (Range::new(0.0, 0.0), Range::new(0.0, 0.0)),
        ];
        for (a, b) in samples {
            let disjoint = a.max < b.min || a.min > b.max;
            let overlap = Range::intersection(&a, &b);
            assert_eq!(overlap.is_empty(), disjoint, "{a:?} vs {b:?}");
            if !disjoint {
                assert_eq!(overlap.length(), a.max.min(b.max) - a.min.max(b.min));
            }
        }
    }

    #[test]
    fn test_bound_and_containment() {
        let a = Range::new(0.0, 2.0);
        let b = Range::new(5.0, 6.0);
        let bound = Range::bound(&a, &b);
        assert_eq!(bound, Range::new(0.0, 6.0));
        assert!(bound.contains_range(&Range::new(1.0, 5.0)));
        assert!(!bound.contains_range(&b));
    }
}
