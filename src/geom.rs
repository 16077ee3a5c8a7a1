//! Geometric primitives used by the graph pipeline.
//!
//! [`Point`] lives in data space. [`ScreenPoint`] and [`ScreenRect`] are pixel
//! coordinates handed to render sinks, with Y growing downwards.

/// A point in data space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// X value in data coordinates.
    pub x: f64,
    /// Y value in data coordinates.
    pub y: f64,
}

impl Point {
    /// Create a new data point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A point in screen space (pixel coordinates).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    /// X value in screen pixels.
    pub x: f32,
    /// Y value in screen pixels.
    pub y: f32,
}

impl ScreenPoint {
    /// Placeholder for a row without a plottable value. Segments touching it
    /// are not drawn, leaving a gap in the polyline.
    pub const GAP: Self = Self {
        x: f32::NAN,
        y: f32::NAN,
    };

    /// Create a new screen point.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// `true` for [`ScreenPoint::GAP`] and any other non-finite point.
    pub fn is_gap(&self) -> bool {
        !(self.x.is_finite() && self.y.is_finite())
    }
}

/// A rectangle in screen space.
///
/// `min` is the top-left pixel and `max` is one past the bottom-right pixel,
/// so `width()` and `height()` count whole pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    /// Top-left corner.
    pub min: ScreenPoint,
    /// Bottom-right corner (exclusive).
    pub max: ScreenPoint,
}

impl ScreenRect {
    /// Create a new screen rectangle from corners.
    pub fn new(min: ScreenPoint, max: ScreenPoint) -> Self {
        Self { min, max }
    }

    /// Create a rectangle from its origin and size.
    pub fn from_origin_size(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(ScreenPoint::new(x, y), ScreenPoint::new(x + width, y + height))
    }

    /// Rectangle width in pixels.
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Rectangle height in pixels.
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Left pixel column.
    pub fn left(&self) -> f32 {
        self.min.x
    }

    /// Top pixel row.
    pub fn top(&self) -> f32 {
        self.min.y
    }

    /// Last pixel column inside the rectangle.
    pub fn right(&self) -> f32 {
        self.max.x - 1.0
    }

    /// Last pixel row inside the rectangle.
    pub fn bottom(&self) -> f32 {
        self.max.y - 1.0
    }

    /// Check whether the rectangle has positive area.
    pub fn is_valid(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }

    /// Shrink (positive) or grow (negative) the rectangle on every side.
    pub fn inset(&self, amount: f32) -> Self {
        Self::new(
            ScreenPoint::new(self.min.x + amount, self.min.y + amount),
            ScreenPoint::new(self.max.x - amount, self.max.y - amount),
        )
    }

    /// Check whether two rectangles overlap.
    pub fn intersects(&self, other: &Self) -> bool {
        !(self.max.x <= other.min.x
            || self.min.x >= other.max.x
            || self.max.y <= other.min.y
            || self.min.y >= other.max.y)
    }
}
