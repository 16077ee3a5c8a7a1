//! Running data ranges.
//!
//! A [`Range`] starts out as the empty sentinel (`min = +inf`, `max = -inf`)
//! and widens as values are observed, so growing it is a pair of comparisons.

/// Numeric range with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
}

impl Range {
    /// Sentinel for "no values observed".
    pub const EMPTY: Self = Self {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    /// Create a new range, swapping bounds if needed.
    pub fn new(mut min: f64, mut max: f64) -> Self {
        if min > max {
            std::mem::swap(&mut min, &mut max);
        }
        Self { min, max }
    }

    /// Span of the range.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Check whether the range still holds the empty sentinel.
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Check whether both bounds are finite.
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Check whether `value` lies strictly between the bounds.
    pub fn contains_strictly(&self, value: f64) -> bool {
        self.min < value && value < self.max
    }

    /// Expand the range to include a value.
    ///
    /// Returns `true` when either bound moved. Non-finite values are ignored.
    pub fn expand_to_include(&mut self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        let mut changed = false;
        if value < self.min {
            self.min = value;
            changed = true;
        }
        if value > self.max {
            self.max = value;
            changed = true;
        }
        changed
    }

    /// Union of two ranges; the empty sentinel is the identity.
    pub fn union(a: Self, b: Self) -> Self {
        match (a.is_empty(), b.is_empty()) {
            (true, _) => b,
            (_, true) => a,
            _ => Self {
                min: a.min.min(b.min),
                max: a.max.max(b.max),
            },
        }
    }
}

impl Default for Range {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Running extents of a series on both dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extents {
    /// X extent.
    pub x: Range,
    /// Y extent.
    pub y: Range,
}

impl Extents {
    /// Extents with no points observed.
    pub const EMPTY: Self = Self {
        x: Range::EMPTY,
        y: Range::EMPTY,
    };

    /// Check whether no point has been observed yet.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty() || self.y.is_empty()
    }

    /// Minimum corner.
    pub fn min_point(&self) -> crate::geom::Point {
        crate::geom::Point::new(self.x.min, self.y.min)
    }

    /// Maximum corner.
    pub fn max_point(&self) -> crate::geom::Point {
        crate::geom::Point::new(self.x.max, self.y.max)
    }
}
