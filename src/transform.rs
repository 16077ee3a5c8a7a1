//! Coordinate transforms between data and screen space.

use crate::axis::Axis;
use crate::geom::{Point, ScreenPoint, ScreenRect};
use crate::view::Range;

/// Linear map from one X range and one Y range onto a plot rectangle.
///
/// The data range maps onto the first and last pixel inside the rectangle,
/// with Y growing upwards on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    rect: ScreenRect,
    x: Range,
    y: Range,
}

impl Transform {
    /// Create a transform for a pair of axes. Returns `None` for an empty
    /// rectangle.
    pub fn new(rect: ScreenRect, x_axis: &Axis, y_axis: &Axis) -> Option<Self> {
        Self::from_ranges(rect, x_axis.range(), y_axis.range())
    }

    /// Create a transform from explicit ranges.
    pub fn from_ranges(rect: ScreenRect, x: Range, y: Range) -> Option<Self> {
        if !rect.is_valid() {
            return None;
        }
        Some(Self { rect, x, y })
    }

    /// Access the plot rectangle.
    pub fn rect(&self) -> ScreenRect {
        self.rect
    }

    /// Map a data point into screen space. Non-finite input maps to `None`.
    pub fn data_to_screen(&self, point: Point) -> Option<ScreenPoint> {
        if !point.x.is_finite() || !point.y.is_finite() {
            return None;
        }
        let dx = point.x - self.x.min;
        let dy = point.y - self.y.min;
        let sx = self.rect.left() as f64
            + dx * (self.rect.width() as f64 - 1.0) / guarded_span(self.x);
        let sy = self.rect.bottom() as f64
            - dy * (self.rect.height() as f64 - 1.0) / guarded_span(self.y);
        Some(ScreenPoint::new(sx as f32, sy as f32))
    }

    /// Map a screen point into data space.
    pub fn screen_to_data(&self, point: ScreenPoint) -> Point {
        let width = (self.rect.width() as f64 - 1.0).max(1.0);
        let height = (self.rect.height() as f64 - 1.0).max(1.0);
        let x = self.x.min + (point.x as f64 - self.rect.left() as f64) * guarded_span(self.x) / width;
        let y =
            self.y.min + (self.rect.bottom() as f64 - point.y as f64) * guarded_span(self.y) / height;
        Point::new(x, y)
    }
}

/// Span used for division; a zero span (axis not yet autoscaled) counts as 1.
fn guarded_span(range: Range) -> f64 {
    let span = range.span();
    if span == 0.0 { 1.0 } else { span }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> ScreenRect {
        ScreenRect::from_origin_size(10.0, 20.0, 101.0, 51.0)
    }

    #[test]
    fn range_ends_map_to_rect_edges() {
        let transform =
            Transform::from_ranges(rect(), Range::new(0.0, 10.0), Range::new(0.0, 5.0)).unwrap();
        let low = transform.data_to_screen(Point::new(0.0, 0.0)).unwrap();
        let high = transform.data_to_screen(Point::new(10.0, 5.0)).unwrap();
        assert_eq!(low, ScreenPoint::new(10.0, 70.0));
        assert_eq!(high, ScreenPoint::new(110.0, 20.0));
    }

    #[test]
    fn linear_roundtrip() {
        let transform =
            Transform::from_ranges(rect(), Range::new(-4.0, 4.0), Range::new(100.0, 200.0))
                .unwrap();
        let point = Point::new(1.0, 150.0);
        let screen = transform.data_to_screen(point).unwrap();
        let back = transform.screen_to_data(screen);
        assert!((back.x - point.x).abs() < 1e-4);
        assert!((back.y - point.y).abs() < 1e-3);
    }

    #[test]
    fn zero_span_does_not_divide_by_zero() {
        let transform =
            Transform::from_ranges(rect(), Range::new(3.0, 3.0), Range::new(0.0, 0.0)).unwrap();
        let screen = transform.data_to_screen(Point::new(3.0, 0.0)).unwrap();
        assert!(screen.x.is_finite() && screen.y.is_finite());
        assert_eq!(screen, ScreenPoint::new(10.0, 70.0));
    }

    #[test]
    fn empty_rect_has_no_transform() {
        let empty = ScreenRect::from_origin_size(0.0, 0.0, 0.0, 10.0);
        assert!(Transform::from_ranges(empty, Range::new(0.0, 1.0), Range::new(0.0, 1.0)).is_none());
    }
}
