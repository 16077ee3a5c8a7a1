//! Per-update output of the chart: optional grid geometry plus full or delta
//! curves, and their flattening into a [`RenderList`].

use crate::axes::AxisId;
use crate::chart::UpdateStrategy;
use crate::geom::{ScreenPoint, ScreenRect};
use crate::layout::GridGeometry;
use crate::series::SeriesId;
use crate::style::Theme;

use super::{
    Color, LineSegment, LineStyle, RectStyle, RenderCommand, RenderList, TextStyle,
    build_line_segments,
};

/// Whether a curve update replaces or extends the previous output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveKind {
    /// All points of the series; previous output must be discarded.
    Full,
    /// Only points from the previous render cursor onwards.
    Delta,
}

/// Screen-space polyline for one visible series.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveUpdate {
    /// Series the points belong to.
    pub series: SeriesId,
    /// Y axis the series is plotted against.
    pub axis: AxisId,
    /// Line styling.
    pub style: LineStyle,
    /// Full redraw or delta.
    pub kind: CurveKind,
    /// Last point drawn by the previous frame, for joining a delta to it.
    pub anchor: Option<ScreenPoint>,
    /// New points in row order, one per row. Rows without a value are
    /// [`ScreenPoint::GAP`].
    pub points: Vec<ScreenPoint>,
    /// Render cursor after this frame.
    pub cursor: usize,
}

impl CurveUpdate {
    /// Segments joining the anchor and the new points, clipped to `clip`.
    pub fn segments(&self, clip: ScreenRect) -> Vec<LineSegment> {
        let mut out = Vec::new();
        match self.anchor {
            Some(anchor) if self.kind == CurveKind::Delta => {
                let mut points = Vec::with_capacity(self.points.len() + 1);
                points.push(anchor);
                points.extend_from_slice(&self.points);
                build_line_segments(&points, clip, &mut out);
            }
            _ => build_line_segments(&self.points, clip, &mut out),
        }
        out
    }
}

/// Everything a sink needs to bring its output up to date.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// How this frame relates to the previous one.
    pub strategy: UpdateStrategy,
    /// Canvas the frame was laid out for.
    pub canvas: ScreenRect,
    /// Area where curves are drawn.
    pub plot_rect: ScreenRect,
    /// Fresh grid geometry, present only on rebuilds.
    pub grid: Option<GridGeometry>,
    /// One entry per visible bound series.
    pub curves: Vec<CurveUpdate>,
}

impl Frame {
    /// Frame that requires no drawing.
    pub fn empty(canvas: ScreenRect, plot_rect: ScreenRect) -> Self {
        Self {
            strategy: UpdateStrategy::None,
            canvas,
            plot_rect,
            grid: None,
            curves: Vec::new(),
        }
    }

    /// Check whether the sink has anything to do.
    pub fn is_empty(&self) -> bool {
        self.strategy == UpdateStrategy::None
    }

    /// Flatten into render commands.
    ///
    /// Append frames only produce the delta segments, to be drawn over the
    /// previous output. Refresh frames carry no grid, so the sink passes the
    /// grid it kept from the last rebuild as `cached_grid`.
    pub fn to_render_list(&self, cached_grid: Option<&GridGeometry>, theme: &Theme) -> RenderList {
        let mut render = RenderList::new();
        let clip = self.plot_rect.inset(1.0);
        match self.strategy {
            UpdateStrategy::None => return render,
            UpdateStrategy::Append => {
                push_curves(&mut render, &self.curves, clip);
                return render;
            }
            UpdateStrategy::Refresh | UpdateStrategy::Rebuild => {}
        }

        render.push(RenderCommand::Rect {
            rect: self.canvas,
            style: RectStyle {
                fill: theme.background,
                stroke: Color::TRANSPARENT,
                stroke_width: 0.0,
            },
        });
        if let Some(grid) = self.grid.as_ref().or(cached_grid) {
            push_grid(&mut render, grid, theme);
        }
        push_curves(&mut render, &self.curves, clip);
        render
    }
}

fn push_grid(render: &mut RenderList, grid: &GridGeometry, theme: &Theme) {
    if !grid.is_drawable() {
        return;
    }

    let gridlines: Vec<LineSegment> = grid
        .axes()
        .flat_map(|axis| axis.gridlines.iter().copied())
        .collect();
    if !gridlines.is_empty() {
        render.push(RenderCommand::ClipRect(grid.plot_rect));
        render.push(RenderCommand::LineSegments {
            segments: gridlines,
            style: LineStyle {
                color: theme.grid,
                width: 1.0,
            },
        });
        render.push(RenderCommand::ClipEnd);
    }

    render.push(RenderCommand::Rect {
        rect: grid.plot_rect,
        style: RectStyle {
            fill: Color::TRANSPARENT,
            stroke: theme.border,
            stroke_width: 1.0,
        },
    });

    for axis in grid.axes() {
        let mut segments = Vec::with_capacity(axis.tick_marks.len() + 1);
        segments.push(axis.spine);
        segments.extend_from_slice(&axis.tick_marks);
        render.push(RenderCommand::LineSegments {
            segments,
            style: LineStyle {
                color: axis.color,
                width: 1.0,
            },
        });
        for label in &axis.labels {
            render.push(RenderCommand::Text {
                position: label.rect.min,
                text: label.text.clone(),
                style: TextStyle {
                    color: axis.color,
                    size: grid.font_size,
                },
            });
        }
    }
}

fn push_curves(render: &mut RenderList, curves: &[CurveUpdate], clip: ScreenRect) {
    if curves.is_empty() || !clip.is_valid() {
        return;
    }
    render.push(RenderCommand::ClipRect(clip));
    for curve in curves {
        let segments = curve.segments(clip);
        if !segments.is_empty() {
            render.push(RenderCommand::LineSegments {
                segments,
                style: curve.style,
            });
        }
    }
    render.push(RenderCommand::ClipEnd);
}
