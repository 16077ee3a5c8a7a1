//! Plot rectangle and grid geometry.
//!
//! Y axes stack outwards from the left edge of the plot rectangle in binding
//! order, each occupying a band as wide as its widest tick label plus the
//! tick mark and gap. Only the first visible Y axis draws horizontal
//! gridlines. Labels that would overlap the previously drawn label on the
//! same axis are suppressed instead of reducing the tick count.

use crate::axes::{AxisKey, AxisSet};
use crate::axis::Axis;
use crate::config::LayoutConfig;
use crate::geom::{Point, ScreenPoint, ScreenRect};
use crate::render::{Color, LineSegment};
use crate::transform::Transform;

/// Text measurement hook used for layout.
pub trait TextMeasurer {
    /// Return the (width, height) of a text string in pixels.
    fn measure(&self, text: &str, size: f32) -> (f32, f32);
}

/// Fixed-advance measurer for headless use and tests.
///
/// Every character advances by `0.6 * size`; line height is `1.2 * size`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonospaceMeasurer;

impl TextMeasurer for MonospaceMeasurer {
    fn measure(&self, text: &str, size: f32) -> (f32, f32) {
        if text.is_empty() {
            return (0.0, 0.0);
        }
        (text.chars().count() as f32 * size * 0.6, size * 1.2)
    }
}

/// A tick value and its pixel coordinate along the axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickMark {
    /// Data value.
    pub value: f64,
    /// Screen X for the X axis, screen Y for Y axes.
    pub position: f32,
}

/// A tick label that survived collision suppression.
#[derive(Debug, Clone, PartialEq)]
pub struct TickLabel {
    /// Label text.
    pub text: String,
    /// Bounding box; `rect.min` is the text origin.
    pub rect: ScreenRect,
}

/// Geometry for one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisGeometry {
    /// Which axis this describes.
    pub axis: AxisKey,
    /// Axis line color, used for spine, tick marks and labels.
    pub color: Color,
    /// Every tick, including those whose label was suppressed.
    pub ticks: Vec<TickMark>,
    /// Tick mark segments outside the plot rectangle.
    pub tick_marks: Vec<LineSegment>,
    /// Gridlines across the plot rectangle. Empty for secondary Y axes.
    pub gridlines: Vec<LineSegment>,
    /// Axis line.
    pub spine: LineSegment,
    /// Drawn labels.
    pub labels: Vec<TickLabel>,
    /// Number of labels skipped because they would overlap.
    pub suppressed: usize,
}

/// Grid geometry for a full rebuild.
#[derive(Debug, Clone, PartialEq)]
pub struct GridGeometry {
    /// Whole canvas.
    pub canvas: ScreenRect,
    /// Area where curves are drawn.
    pub plot_rect: ScreenRect,
    /// Label font size.
    pub font_size: f32,
    /// X axis geometry, absent when hidden.
    pub x_axis: Option<AxisGeometry>,
    /// Geometry for visible Y axes, in stacking order.
    pub y_axes: Vec<AxisGeometry>,
}

impl GridGeometry {
    /// Iterate geometry for every drawn axis.
    pub fn axes(&self) -> impl Iterator<Item = &AxisGeometry> {
        self.x_axis.iter().chain(self.y_axes.iter())
    }

    /// Check whether the plot rectangle has a drawable area.
    pub fn is_drawable(&self) -> bool {
        self.plot_rect.is_valid()
    }
}

struct MeasuredLabel {
    text: String,
    size: (f32, f32),
}

fn measure_labels(axis: &Axis, font_size: f32, measurer: &dyn TextMeasurer) -> Vec<MeasuredLabel> {
    axis.tick_labels()
        .into_iter()
        .map(|text| {
            let size = measurer.measure(&text, font_size);
            MeasuredLabel { text, size }
        })
        .collect()
}

/// Compute the plot rectangle and all axis geometry for `canvas`.
///
/// `visible_y` is the number of visible Y axes as tracked by the chart; it
/// sizes the output without rescanning the axis list. Refreshes each visible
/// Y axis's cached label width as a side effect.
pub fn build_grid(
    axes: &mut AxisSet,
    visible_y: usize,
    canvas: ScreenRect,
    config: &LayoutConfig,
    measurer: &dyn TextMeasurer,
) -> GridGeometry {
    let font_size = config.font_size;
    let band_extra = config.tick_mark_width + config.label_gap;

    let mut y_labels = Vec::with_capacity(visible_y);
    let mut y_margin = 0.0;
    for (id, axis) in axes.y_axes_mut() {
        axis.clear_max_tick_label_width();
        if !axis.is_visible() {
            continue;
        }
        let labels = measure_labels(axis, font_size, measurer);
        for label in &labels {
            axis.note_tick_label_width(label.size.0 + band_extra);
        }
        y_margin += axis.max_tick_label_width();
        y_labels.push((id, labels));
    }

    let x_visible = axes.x().is_visible();
    let x_labels = if x_visible {
        measure_labels(axes.x(), font_size, measurer)
    } else {
        Vec::new()
    };
    let x_label_height = x_labels
        .iter()
        .map(|label| label.size.1)
        .fold(0.0_f32, f32::max);
    // The last X label is centered on the right edge.
    let right_overhang = x_labels.last().map(|label| label.size.0 * 0.5).unwrap_or(0.0);

    let plot_rect = ScreenRect::new(
        ScreenPoint::new(canvas.min.x + config.margin + y_margin, canvas.min.y + config.margin),
        ScreenPoint::new(
            canvas.max.x - config.margin - right_overhang,
            canvas.max.y - config.margin - config.tick_mark_width - x_label_height,
        ),
    );

    let mut grid = GridGeometry {
        canvas,
        plot_rect,
        font_size,
        x_axis: None,
        y_axes: Vec::with_capacity(visible_y),
    };
    if !plot_rect.is_valid() {
        return grid;
    }

    if x_visible {
        grid.x_axis = Some(x_geometry(axes.x(), x_labels, plot_rect, config));
    }

    let mut band_offset = 0.0;
    for (index, (id, labels)) in y_labels.into_iter().enumerate() {
        let Some(axis) = axes.y(id) else { continue };
        let spine_x = plot_rect.left() - band_offset;
        grid.y_axes.push(y_geometry(
            AxisKey::Y(id),
            axis,
            labels,
            plot_rect,
            spine_x,
            index == 0,
            config,
        ));
        band_offset += axis.max_tick_label_width();
    }

    grid
}

fn x_geometry(
    axis: &Axis,
    labels: Vec<MeasuredLabel>,
    plot_rect: ScreenRect,
    config: &LayoutConfig,
) -> AxisGeometry {
    let bottom = plot_rect.bottom();
    let mut geometry = AxisGeometry {
        axis: AxisKey::X,
        color: axis.line_color(),
        ticks: Vec::with_capacity(labels.len()),
        tick_marks: Vec::with_capacity(labels.len()),
        gridlines: Vec::with_capacity(labels.len()),
        spine: LineSegment::new(
            ScreenPoint::new(plot_rect.left(), bottom),
            ScreenPoint::new(plot_rect.right(), bottom),
        ),
        labels: Vec::new(),
        suppressed: 0,
    };
    let Some(transform) = Transform::from_ranges(plot_rect, axis.range(), axis.range()) else {
        return geometry;
    };

    let mut previous_end = f32::NEG_INFINITY;
    for (value, label) in axis.ticks().zip(labels) {
        let Some(x) = transform.data_to_screen(Point::new(value, axis.min())).map(|p| p.x) else {
            continue;
        };
        geometry.ticks.push(TickMark { value, position: x });
        geometry.gridlines.push(LineSegment::new(
            ScreenPoint::new(x, plot_rect.top()),
            ScreenPoint::new(x, bottom),
        ));
        geometry.tick_marks.push(LineSegment::new(
            ScreenPoint::new(x, bottom),
            ScreenPoint::new(x, bottom + config.tick_mark_width),
        ));

        let (width, height) = label.size;
        let text_left = x - width * 0.5;
        if previous_end < text_left {
            let top = bottom + config.tick_mark_width;
            geometry.labels.push(TickLabel {
                text: label.text,
                rect: ScreenRect::from_origin_size(text_left, top, width, height),
            });
            previous_end = x + width * 0.5 + config.label_gap;
        } else {
            geometry.suppressed += 1;
        }
    }
    geometry
}

fn y_geometry(
    key: AxisKey,
    axis: &Axis,
    labels: Vec<MeasuredLabel>,
    plot_rect: ScreenRect,
    spine_x: f32,
    draws_gridlines: bool,
    config: &LayoutConfig,
) -> AxisGeometry {
    let mut geometry = AxisGeometry {
        axis: key,
        color: axis.line_color(),
        ticks: Vec::with_capacity(labels.len()),
        tick_marks: Vec::with_capacity(labels.len()),
        gridlines: Vec::new(),
        spine: LineSegment::new(
            ScreenPoint::new(spine_x, plot_rect.top()),
            ScreenPoint::new(spine_x, plot_rect.bottom()),
        ),
        labels: Vec::new(),
        suppressed: 0,
    };
    let Some(transform) = Transform::from_ranges(plot_rect, axis.range(), axis.range()) else {
        return geometry;
    };

    let label_right = spine_x - config.tick_mark_width - config.label_gap;
    // Ticks ascend in value, so iterate bottom-to-top on screen.
    let mut previous_top = f32::INFINITY;
    for (value, label) in axis.ticks().zip(labels) {
        let Some(y) = transform.data_to_screen(Point::new(axis.min(), value)).map(|p| p.y) else {
            continue;
        };
        geometry.ticks.push(TickMark { value, position: y });
        if draws_gridlines {
            geometry.gridlines.push(LineSegment::new(
                ScreenPoint::new(plot_rect.left(), y),
                ScreenPoint::new(plot_rect.right(), y),
            ));
        }
        geometry.tick_marks.push(LineSegment::new(
            ScreenPoint::new(spine_x - config.tick_mark_width, y),
            ScreenPoint::new(spine_x, y),
        ));

        let (width, height) = label.size;
        if y + height * 0.5 < previous_top {
            let top = y - height * 0.5;
            geometry.labels.push(TickLabel {
                text: label.text,
                rect: ScreenRect::from_origin_size(label_right - width, top, width, height),
            });
            previous_top = top;
        } else {
            geometry.suppressed += 1;
        }
    }
    geometry
}
