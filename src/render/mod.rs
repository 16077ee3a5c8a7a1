//! Rendering primitives and clipping helpers.
//!
//! These types are backend-agnostic. A [`Frame`] is what the chart emits per
//! update; [`Frame::to_render_list`] flattens it into [`RenderCommand`]s for
//! backends such as the GPUI painter.

mod frame;

pub use frame::{CurveKind, CurveUpdate, Frame};

use serde::{Deserialize, Serialize};

use crate::geom::{ScreenPoint, ScreenRect};

/// Straight-alpha RGBA color with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Opacity.
    pub a: f32,
}

impl Color {
    /// Color from its channels.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque red.
    pub const RED: Self = Self::new(1.0, 0.0, 0.0, 1.0);
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Same color with a different alpha.
    pub const fn with_alpha(self, a: f32) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }
}

/// Line stroke styling.
///
/// The width is expressed in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    /// Stroke color.
    pub color: Color,
    /// Stroke width in pixels.
    pub width: f32,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Color::RED,
            width: 1.0,
        }
    }
}

/// Fill and outline of a rectangle. A transparent fill draws only the outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectStyle {
    /// Interior.
    pub fill: Color,
    /// Outline.
    pub stroke: Color,
    /// Outline width in pixels.
    pub stroke_width: f32,
}

impl Default for RectStyle {
    fn default() -> Self {
        Self {
            fill: Color::TRANSPARENT,
            stroke: Color::WHITE,
            stroke_width: 1.0,
        }
    }
}

/// Tick label appearance.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Glyph color.
    pub color: Color,
    /// Font size in pixels.
    pub size: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            size: 12.0,
        }
    }
}

/// Straight stroke between two screen points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    /// First end.
    pub start: ScreenPoint,
    /// Second end.
    pub end: ScreenPoint,
}

impl LineSegment {
    /// Join `start` to `end`.
    pub fn new(start: ScreenPoint, end: ScreenPoint) -> Self {
        Self { start, end }
    }
}

/// One drawing instruction for a render backend.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Restrict following commands to a rectangle until the matching
    /// [`RenderCommand::ClipEnd`].
    ClipRect(ScreenRect),
    /// Pop the innermost clip.
    ClipEnd,
    /// Stroke a batch of segments with one style.
    LineSegments {
        /// Segments, already clipped.
        segments: Vec<LineSegment>,
        /// Shared stroke.
        style: LineStyle,
    },
    /// Fill and outline a rectangle.
    Rect {
        /// Bounds.
        rect: ScreenRect,
        /// Fill and outline.
        style: RectStyle,
    },
    /// Draw text with its top-left corner at `position`.
    Text {
        /// Top-left corner.
        position: ScreenPoint,
        /// Label.
        text: String,
        /// Color and size.
        style: TextStyle,
    },
}

/// Ordered drawing instructions, replayed front to back.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RenderList {
    commands: Vec<RenderCommand>,
}

impl RenderList {
    /// Empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one command.
    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    /// Append another list's commands, as when layering a delta frame over
    /// previous output.
    pub fn extend(&mut self, other: RenderList) {
        self.commands.extend(other.commands);
    }

    /// Commands in paint order.
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Number of commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// `true` when nothing needs drawing.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Build clipped segments joining consecutive screen points.
pub fn build_line_segments(points: &[ScreenPoint], clip: ScreenRect, out: &mut Vec<LineSegment>) {
    out.clear();
    for window in points.windows(2) {
        if let Some((start, end)) = clip_segment(window[0], window[1], clip) {
            out.push(LineSegment::new(start, end));
        }
    }
}

/// Clip the segment `start..end` to `rect` by its parameter interval.
///
/// Returns `None` when nothing of the segment lies inside or when either end
/// is not finite.
fn clip_segment(
    start: ScreenPoint,
    end: ScreenPoint,
    rect: ScreenRect,
) -> Option<(ScreenPoint, ScreenPoint)> {
    if start.is_gap() || end.is_gap() {
        return None;
    }
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let edges = [
        (-dx, start.x - rect.min.x),
        (dx, rect.max.x - start.x),
        (-dy, start.y - rect.min.y),
        (dy, rect.max.y - start.y),
    ];

    let (mut t0, mut t1) = (0.0_f32, 1.0_f32);
    for (p, q) in edges {
        if p == 0.0 {
            // Parallel to this edge: entirely outside or no constraint.
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }

    let at = |t: f32| ScreenPoint::new(start.x + t * dx, start.y + t * dy);
    let clipped_start = if t0 > 0.0 { at(t0) } else { start };
    let clipped_end = if t1 < 1.0 { at(t1) } else { end };
    Some((clipped_start, clipped_end))
}
