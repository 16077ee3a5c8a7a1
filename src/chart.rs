//! The chart: series bindings, update classification, and frame emission.
//!
//! A [`Chart`] owns the axis set and the Y axis to series binding map. Every
//! data source event is classified by [`Chart::handle`] into an
//! [`UpdateStrategy`]; strategies accumulate until [`Chart::render`] turns
//! them into a [`Frame`].

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace, warn};

use crate::axes::{AxisId, AxisKey, AxisSet};
use crate::axis::{AdjustMode, Axis, AxisConfig, AxisFormatter, AxisKind};
use crate::config::{ChartConfig, LayoutConfig};
use crate::datasource::{DataSource, SourceEvent, SourceObserver, X_COLUMN};
use crate::error::{GraphError, Result};
use crate::geom::{Point, ScreenPoint, ScreenRect};
use crate::layout::{GridGeometry, TextMeasurer, build_grid};
use crate::render::{Color, CurveKind, CurveUpdate, Frame, LineStyle};
use crate::series::{Series, SeriesConfig};
use crate::style::Theme;
use crate::transform::Transform;

/// How much of the previous frame must be redrawn.
///
/// Strategies are ordered by strength; merging two keeps the stronger one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum UpdateStrategy {
    /// Nothing changed.
    #[default]
    None,
    /// Only new trailing points need drawing.
    Append,
    /// Every point must be redrawn; the grid is unchanged.
    Refresh,
    /// Grid geometry and every point must be rebuilt.
    Rebuild,
}

impl UpdateStrategy {
    /// Combine two pending strategies.
    pub fn merge(self, other: Self) -> Self {
        self.max(other)
    }
}

/// Canvas size used until the sink reports one.
const DEFAULT_CANVAS: (f32, f32) = (640.0, 480.0);

/// Real-time chart over a tabular data source.
#[derive(Debug)]
pub struct Chart {
    axes: AxisSet,
    series: BTreeMap<usize, Series>,
    bindings: BTreeMap<AxisId, BTreeSet<usize>>,
    visible_y_axes: usize,
    source_columns: Option<usize>,
    layout: LayoutConfig,
    theme: Theme,
    canvas: ScreenRect,
    grid: Option<GridGeometry>,
    pending: UpdateStrategy,
    rendered: bool,
}

impl Chart {
    /// Create a chart with `y_axis_count` default Y axes (at least one).
    pub fn new(y_axis_count: usize) -> Self {
        let axes = AxisSet::new(y_axis_count.max(1));
        let visible_y_axes = axes.y_count();
        Self::with_axes(axes, visible_y_axes, LayoutConfig::default(), Theme::default())
    }

    /// Create a chart from configuration, binding the configured series.
    ///
    /// Fails when a series references a missing Y axis or the X column.
    pub fn from_config(config: &ChartConfig) -> Result<Self> {
        let default_y = [AxisConfig::default()];
        let y_configs = if config.y_axes.is_empty() {
            &default_y[..]
        } else {
            &config.y_axes[..]
        };
        let axes = AxisSet::from_configs(&config.x_axis, y_configs);
        let visible_y_axes = y_configs.iter().filter(|axis| axis.visible()).count();
        let mut chart = Self::with_axes(axes, visible_y_axes, config.layout, config.theme);
        for series in &config.series {
            chart.add_configured_series(series)?;
        }
        Ok(chart)
    }

    fn with_axes(axes: AxisSet, visible_y_axes: usize, layout: LayoutConfig, theme: Theme) -> Self {
        Self {
            axes,
            series: BTreeMap::new(),
            bindings: BTreeMap::new(),
            visible_y_axes,
            source_columns: None,
            layout,
            theme,
            canvas: ScreenRect::from_origin_size(0.0, 0.0, DEFAULT_CANVAS.0, DEFAULT_CANVAS.1),
            grid: None,
            pending: UpdateStrategy::Rebuild,
            rendered: false,
        }
    }

    fn add_configured_series(&mut self, config: &SeriesConfig) -> Result<()> {
        self.check_binding(config.column, config.axis)?;
        let mut series = Series::new(config.column, String::new());
        series.set_style(config.style);
        series.set_visible(config.visible);
        self.series.insert(config.column, series);
        self.link(config.column, config.axis);
        Ok(())
    }

    fn check_binding(&self, column: usize, axis: AxisId) -> Result<()> {
        if !self.axes.contains(axis) {
            warn!(column, %axis, "rejected binding to missing Y axis");
            return Err(GraphError::UnboundAxis {
                axis,
                axis_count: self.axes.y_count(),
            });
        }
        let outside_source = self
            .source_columns
            .is_some_and(|columns| column >= columns);
        if column == X_COLUMN || outside_source {
            warn!(column, "rejected binding to unusable column");
            return Err(GraphError::UnknownColumn { column });
        }
        Ok(())
    }

    fn link(&mut self, column: usize, axis: AxisId) {
        for members in self.bindings.values_mut() {
            members.remove(&column);
        }
        self.bindings.retain(|_, members| !members.is_empty());
        self.bindings.entry(axis).or_default().insert(column);
    }

    /// Attach a data source.
    ///
    /// Probes headers from column 1 onwards, stopping at the first missing or
    /// empty header, and creates an unbound series for each new column.
    /// Series on columns the new source lacks are dropped with their
    /// bindings; the rest are cleared and rescanned from the new source.
    pub fn attach_source(&mut self, source: &dyn DataSource) {
        self.probe_columns(source);
        self.reload(source);
        debug!(
            rows = source.row_count(),
            columns = source.column_count(),
            series = self.series.len(),
            "source attached"
        );
    }

    fn probe_columns(&mut self, source: &dyn DataSource) {
        let columns = source.column_count();
        self.source_columns = Some(columns);
        let stale = self.series.split_off(&columns);
        for column in stale.keys() {
            warn!(column, columns, "series dropped with its source column");
            for members in self.bindings.values_mut() {
                members.remove(column);
            }
        }
        self.bindings.retain(|_, members| !members.is_empty());
        let mut column = X_COLUMN + 1;
        while let Some(header) = source.header(column).filter(|header| !header.is_empty()) {
            self.series
                .entry(column)
                .or_insert_with(|| Series::new(column, header.clone()))
                .set_name(header);
            column += 1;
        }
    }

    fn reload(&mut self, source: &dyn DataSource) {
        for series in self.series.values_mut() {
            series.clear();
            series.recompute_full_range(source, true);
        }
        self.autoscale_all();
        self.pending = UpdateStrategy::Rebuild;
    }

    /// Bind the series reading `column` to Y axis `axis`.
    ///
    /// The series is created if the header probe did not discover it. A
    /// rejected binding leaves the chart untouched.
    pub fn bind_series(&mut self, source: &dyn DataSource, column: usize, axis: AxisId) -> Result<()> {
        if self.source_columns.is_none() {
            self.source_columns = Some(source.column_count());
        }
        self.check_binding(column, axis)?;
        if !self.series.contains_key(&column) {
            let name = source.header(column).unwrap_or_default();
            let mut series = Series::new(column, name);
            series.recompute_full_range(source, true);
            self.series.insert(column, series);
        }
        self.link(column, axis);
        self.autoscale_all();
        self.pending = self.pending.merge(UpdateStrategy::Rebuild);
        debug!(column, %axis, "series bound");
        Ok(())
    }

    /// Unbind and drop the series reading `column`. Returns `true` if it was
    /// bound.
    pub fn unbind_series(&mut self, column: usize) -> bool {
        let was_bound = self.series_axis(column).is_some();
        self.series.remove(&column);
        for members in self.bindings.values_mut() {
            members.remove(&column);
        }
        self.bindings.retain(|_, members| !members.is_empty());
        if was_bound {
            self.autoscale_all();
            self.pending = self.pending.merge(UpdateStrategy::Rebuild);
            debug!(column, "series unbound");
        }
        was_bound
    }

    /// Y axis the series reading `column` is bound to.
    pub fn series_axis(&self, column: usize) -> Option<AxisId> {
        self.bindings
            .iter()
            .find(|(_, members)| members.contains(&column))
            .map(|(axis, _)| *axis)
    }

    /// Classify a source event and update series and axis state.
    ///
    /// The returned strategy is also merged into the pending strategy for the
    /// next [`Chart::render`].
    pub fn handle(&mut self, source: &dyn DataSource, event: &SourceEvent) -> UpdateStrategy {
        trace!(?event, rows = source.row_count(), "source event");
        let strategy = match event {
            SourceEvent::Reset => {
                self.probe_columns(source);
                self.reload(source);
                UpdateStrategy::Rebuild
            }
            SourceEvent::RowsInserted { first, last } => self.rows_inserted(source, *first, *last),
            SourceEvent::RowsAboutToBeRemoved { first, last } => {
                self.rows_about_to_be_removed(source, *first, *last);
                UpdateStrategy::None
            }
            SourceEvent::RowsRemoved { .. } => self.rows_removed(source),
            SourceEvent::ValuesChanged { columns, .. } => {
                let touches_x = columns.contains(&X_COLUMN);
                for series in self.series.values_mut() {
                    if touches_x || columns.contains(&series.column()) {
                        series.recompute_full_range(source, true);
                    }
                }
                self.rescale_strategy()
            }
        };
        self.pending = self.pending.merge(strategy);
        debug!(?strategy, pending = ?self.pending, "event classified");
        strategy
    }

    fn rows_inserted(&mut self, source: &dyn DataSource, first: usize, last: usize) -> UpdateStrategy {
        let is_tail = self
            .bound_columns()
            .filter_map(|column| self.series.get(&column))
            .all(|series| series.row_count() == first);

        let rows = source.row_count();
        let mut extrema_changed = false;
        for series in self.series.values_mut() {
            let column = series.column();
            for row in first..=last.min(rows.saturating_sub(1)) {
                if let (Some(x), Some(y)) = (source.x(row), source.value(row, column)) {
                    extrema_changed |= series.extend_range(x, y);
                }
            }
            series.set_row_count(rows);
        }

        if extrema_changed && self.autoscale_all() {
            UpdateStrategy::Rebuild
        } else if is_tail {
            UpdateStrategy::Append
        } else {
            UpdateStrategy::Refresh
        }
    }

    fn rows_about_to_be_removed(&mut self, source: &dyn DataSource, first: usize, last: usize) {
        let last = last.min(source.row_count().saturating_sub(1));
        for series in self.series.values_mut() {
            let column = series.column();
            for row in first..=last {
                if series.needs_full_recalc() {
                    break;
                }
                if let (Some(x), Some(y)) = (source.x(row), source.value(row, column)) {
                    series.invalidate_if_boundary(x, y);
                }
            }
        }
    }

    fn rows_removed(&mut self, source: &dyn DataSource) -> UpdateStrategy {
        let rows = source.row_count();
        for series in self.series.values_mut() {
            if series.recompute_full_range(source, false) {
                trace!(column = series.column(), "extents rescanned after removal");
            }
            series.set_row_count(rows);
        }
        self.rescale_strategy()
    }

    fn rescale_strategy(&mut self) -> UpdateStrategy {
        if self.autoscale_all() {
            UpdateStrategy::Rebuild
        } else {
            UpdateStrategy::Refresh
        }
    }

    /// Autoscale the X axis and every Y axis from their bound series.
    ///
    /// Axes without data keep their range. Returns `true` if any range
    /// changed, in which case a rebuild is pending.
    pub fn autoscale_all(&mut self) -> bool {
        let series = &self.series;
        let bindings = &self.bindings;
        let mut changed = false;

        let all_bound = bindings
            .values()
            .flatten()
            .filter_map(|column| series.get(column));
        match self.axes.x_mut().autoscale(all_bound, AxisKind::X) {
            Ok(moved) => changed |= moved,
            Err(err) => trace!(%err, axis = "x", "autoscale skipped"),
        }

        for (id, axis) in self.axes.y_axes_mut() {
            let members = bindings
                .get(&id)
                .into_iter()
                .flatten()
                .filter_map(|column| series.get(column));
            match axis.autoscale(members, AxisKind::Y) {
                Ok(moved) => changed |= moved,
                Err(err) => trace!(%err, %id, "autoscale skipped"),
            }
        }

        if changed {
            self.pending = self.pending.merge(UpdateStrategy::Rebuild);
        }
        changed
    }

    /// Produce the frame for everything that changed since the last call.
    ///
    /// The first frame is always a rebuild. Rebuilds and refreshes reset
    /// every render cursor and emit full curves; appends emit only the points
    /// past each cursor.
    pub fn render(&mut self, source: &dyn DataSource, measurer: &dyn TextMeasurer) -> Frame {
        let strategy = if self.rendered {
            self.pending
        } else {
            UpdateStrategy::Rebuild
        };
        self.pending = UpdateStrategy::None;
        if strategy == UpdateStrategy::None {
            return Frame::empty(self.canvas, self.plot_rect());
        }

        let grid = if strategy == UpdateStrategy::Rebuild || self.grid.is_none() {
            let grid = build_grid(
                &mut self.axes,
                self.visible_y_axes,
                self.canvas,
                &self.layout,
                measurer,
            );
            self.grid = Some(grid.clone());
            Some(grid)
        } else {
            None
        };
        let strategy = if grid.is_some() {
            UpdateStrategy::Rebuild
        } else {
            strategy
        };
        let plot_rect = self.plot_rect();

        if strategy != UpdateStrategy::Append {
            for series in self.series.values_mut() {
                series.clear_render_cursor();
            }
        }

        let rows = source.row_count();
        let cursor_target = isize::try_from(rows).unwrap_or(isize::MAX);
        let mut curves = Vec::new();
        for (axis_id, members) in &self.bindings {
            let Some(y_axis) = self.axes.y(*axis_id) else {
                continue;
            };
            let transform = Transform::new(plot_rect, self.axes.x(), y_axis);
            for column in members {
                let Some(series) = self.series.get_mut(column) else {
                    continue;
                };
                let Some(transform) = transform.filter(|_| series.is_visible()) else {
                    series.advance_render_cursor(cursor_target);
                    continue;
                };

                let mut start = series.render_cursor();
                if start > rows {
                    trace!(column, cursor = start, rows, "render cursor out of range");
                    start = 0;
                }
                let map = |row: usize| {
                    let x = source.x(row)?;
                    let y = source.value(row, *column)?;
                    transform.data_to_screen(Point::new(x, y))
                };
                let kind = if strategy == UpdateStrategy::Append && start > 0 {
                    CurveKind::Delta
                } else {
                    CurveKind::Full
                };
                let anchor = match kind {
                    CurveKind::Delta => map(start - 1),
                    CurveKind::Full => None,
                };
                let points = (start..rows)
                    .map(|row| map(row).unwrap_or(ScreenPoint::GAP))
                    .collect();

                series.advance_render_cursor(cursor_target);
                curves.push(CurveUpdate {
                    series: series.id(),
                    axis: *axis_id,
                    style: series.style(),
                    kind,
                    anchor,
                    points,
                    cursor: series.render_cursor(),
                });
            }
        }

        self.rendered = true;
        debug!(?strategy, curves = curves.len(), "frame rendered");
        Frame {
            strategy,
            canvas: self.canvas,
            plot_rect,
            grid,
            curves,
        }
    }

    /// Request at least `strategy` for the next frame, for sinks that lost
    /// or compacted their previous output.
    pub fn request(&mut self, strategy: UpdateStrategy) {
        self.pending = self.pending.merge(strategy);
    }

    /// Resize the canvas. A change schedules a rebuild.
    pub fn set_canvas(&mut self, canvas: ScreenRect) {
        if self.canvas != canvas {
            self.canvas = canvas;
            self.pending = self.pending.merge(UpdateStrategy::Rebuild);
        }
    }

    /// Resize the canvas keeping its origin at zero.
    pub fn set_canvas_size(&mut self, width: f32, height: f32) {
        self.set_canvas(ScreenRect::from_origin_size(0.0, 0.0, width, height));
    }

    fn axis_mut(&mut self, key: AxisKey) -> Result<&mut Axis> {
        let axis_count = self.axes.y_count();
        self.axes.get_mut(key).ok_or(match key {
            AxisKey::Y(axis) => GraphError::UnboundAxis { axis, axis_count },
            AxisKey::X => GraphError::UnboundAxis {
                axis: AxisId(0),
                axis_count,
            },
        })
    }

    /// Show or hide an axis. Hidden axes take no layout space.
    pub fn set_axis_visible(&mut self, key: AxisKey, visible: bool) -> Result<()> {
        if !self.axis_mut(key)?.set_visible(visible) {
            return Ok(());
        }
        if let AxisKey::Y(_) = key {
            if visible {
                self.visible_y_axes += 1;
            } else {
                self.visible_y_axes = self.visible_y_axes.saturating_sub(1);
            }
        }
        self.pending = self.pending.merge(UpdateStrategy::Rebuild);
        Ok(())
    }

    /// Enable or disable autoscaling. Enabling rescales immediately.
    pub fn set_axis_auto_scale(&mut self, key: AxisKey, enabled: bool) -> Result<()> {
        if self.axis_mut(key)?.set_auto_scale(enabled) && enabled {
            self.autoscale_all();
        }
        Ok(())
    }

    /// Set a manual range, rounded outwards to nice numbers.
    ///
    /// Ignored while the axis autoscales. Returns `true` if the range changed.
    pub fn set_axis_range(&mut self, key: AxisKey, min: f64, max: f64) -> Result<bool> {
        let axis = self.axis_mut(key)?;
        if axis.auto_scale() {
            return Ok(false);
        }
        let changed = axis.adjust(min.min(max), min.max(max), AdjustMode::Forced);
        if changed {
            self.pending = self.pending.merge(UpdateStrategy::Rebuild);
        }
        Ok(changed)
    }

    /// Set the manual minimum. Ignored while the axis autoscales.
    pub fn set_axis_min(&mut self, key: AxisKey, value: f64) -> Result<bool> {
        let changed = self.axis_mut(key)?.set_min(value);
        if changed {
            self.pending = self.pending.merge(UpdateStrategy::Rebuild);
        }
        Ok(changed)
    }

    /// Set the manual maximum. Ignored while the axis autoscales.
    pub fn set_axis_max(&mut self, key: AxisKey, value: f64) -> Result<bool> {
        let changed = self.axis_mut(key)?.set_max(value);
        if changed {
            self.pending = self.pending.merge(UpdateStrategy::Rebuild);
        }
        Ok(changed)
    }

    /// Set the color used for an axis's spine, ticks and labels.
    pub fn set_axis_line_color(&mut self, key: AxisKey, color: Color) -> Result<()> {
        if self.axis_mut(key)?.set_line_color(color) {
            self.pending = self.pending.merge(UpdateStrategy::Rebuild);
        }
        Ok(())
    }

    /// Replace an axis's label formatter.
    pub fn set_axis_formatter(&mut self, key: AxisKey, formatter: AxisFormatter) -> Result<()> {
        self.axis_mut(key)?.set_formatter(formatter);
        self.pending = self.pending.merge(UpdateStrategy::Rebuild);
        Ok(())
    }

    /// Change an axis's tick-count floor and re-round its range.
    pub fn set_axis_min_tick_count(&mut self, key: AxisKey, count: usize) -> Result<()> {
        let axis = self.axis_mut(key)?;
        axis.set_min_tick_count(count);
        if axis.auto_scale() {
            self.autoscale_all();
        } else {
            let (min, max) = (axis.min(), axis.max());
            axis.adjust(min, max, AdjustMode::Forced);
        }
        self.pending = self.pending.merge(UpdateStrategy::Rebuild);
        Ok(())
    }

    /// Grow or shrink the Y axis list (at least one axis remains).
    ///
    /// Series bound to removed axes are dropped.
    pub fn set_y_axis_count(&mut self, count: usize) {
        let count = count.max(1);
        let current = self.axes.y_count();
        if count == current {
            return;
        }
        if count < current {
            let removed_visible = self
                .axes
                .y_axes()
                .skip(count)
                .filter(|(_, axis)| axis.is_visible())
                .count();
            self.visible_y_axes = self.visible_y_axes.saturating_sub(removed_visible);
            let dropped = self.bindings.split_off(&AxisId(count));
            for column in dropped.values().flatten() {
                warn!(column, "series dropped with its Y axis");
                self.series.remove(column);
            }
        } else {
            self.visible_y_axes += count - current;
        }
        self.axes.resize_y(count);
        self.autoscale_all();
        self.pending = self.pending.merge(UpdateStrategy::Rebuild);
    }

    /// Show or hide a series. Returns `true` if the flag changed.
    pub fn set_series_visible(&mut self, column: usize, visible: bool) -> bool {
        let changed = self
            .series
            .get_mut(&column)
            .is_some_and(|series| series.set_visible(visible));
        if changed {
            self.pending = self.pending.merge(UpdateStrategy::Refresh);
        }
        changed
    }

    /// Restyle a series. Returns `true` if the style changed.
    pub fn set_series_style(&mut self, column: usize, style: LineStyle) -> bool {
        let changed = self
            .series
            .get_mut(&column)
            .is_some_and(|series| series.set_style(style));
        if changed {
            self.pending = self.pending.merge(UpdateStrategy::Refresh);
        }
        changed
    }

    /// Replace the layout constants.
    pub fn set_layout(&mut self, layout: LayoutConfig) {
        if self.layout != layout {
            self.layout = layout;
            self.pending = self.pending.merge(UpdateStrategy::Rebuild);
        }
    }

    /// Replace the theme.
    pub fn set_theme(&mut self, theme: Theme) {
        if self.theme != theme {
            self.theme = theme;
            self.pending = self.pending.merge(UpdateStrategy::Refresh);
        }
    }

    /// Access the axes.
    pub fn axes(&self) -> &AxisSet {
        &self.axes
    }

    /// Access the series reading `column`.
    pub fn series(&self, column: usize) -> Option<&Series> {
        self.series.get(&column)
    }

    /// Iterate every known series, bound or not, in column order.
    pub fn series_iter(&self) -> impl Iterator<Item = &Series> {
        self.series.values()
    }

    /// Columns bound to `axis`.
    pub fn bound_to(&self, axis: AxisId) -> impl Iterator<Item = usize> + '_ {
        self.bindings.get(&axis).into_iter().flatten().copied()
    }

    fn bound_columns(&self) -> impl Iterator<Item = usize> + '_ {
        self.bindings.values().flatten().copied()
    }

    /// Number of visible Y axes.
    pub fn visible_y_axis_count(&self) -> usize {
        self.visible_y_axes
    }

    /// Canvas the chart lays out into.
    pub fn canvas(&self) -> ScreenRect {
        self.canvas
    }

    /// Plot rectangle from the last rebuild, or the canvas before the first.
    pub fn plot_rect(&self) -> ScreenRect {
        self.grid
            .as_ref()
            .map(|grid| grid.plot_rect)
            .unwrap_or(self.canvas)
    }

    /// Grid geometry from the last rebuild.
    pub fn grid(&self) -> Option<&GridGeometry> {
        self.grid.as_ref()
    }

    /// Layout constants.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Current theme.
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Strategy the next frame will use (before the first-frame override).
    pub fn pending(&self) -> UpdateStrategy {
        self.pending
    }
}

impl Default for Chart {
    fn default() -> Self {
        Self::new(1)
    }
}

impl SourceObserver for Chart {
    fn on_event(&mut self, source: &dyn DataSource, event: &SourceEvent) {
        self.handle(source, event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::TableSource;
    use crate::layout::MonospaceMeasurer;
    use crate::series::SeriesId;
    use crate::view::Range;

    const Y0: AxisId = AxisId(0);

    fn table(rows: &[(f64, f64)]) -> TableSource {
        TableSource::new(["t", "a"]).with_rows(rows.iter().map(|&(x, y)| vec![x, y]))
    }

    /// Chart with a fixed X range so that only Y autoscales.
    fn fixed_x_chart(source: &TableSource) -> Chart {
        let config = ChartConfig {
            x_axis: AxisConfig::new().with_auto_scale(false).with_range(0.0, 10.0),
            ..ChartConfig::default()
        };
        let mut chart = Chart::from_config(&config).unwrap();
        chart.attach_source(source);
        chart.bind_series(source, 1, Y0).unwrap();
        chart
    }

    fn y_range(chart: &Chart) -> Range {
        chart.axes().y(Y0).unwrap().range()
    }

    fn curve(frame: &Frame) -> &CurveUpdate {
        frame.curves.first().expect("one curve")
    }

    #[test]
    fn strategies_merge_to_the_strongest() {
        use UpdateStrategy::*;
        assert_eq!(None.merge(Append), Append);
        assert_eq!(Refresh.merge(Append), Refresh);
        assert_eq!(Append.merge(Rebuild), Rebuild);
        assert_eq!(UpdateStrategy::default(), None);
    }

    #[test]
    fn initial_series_scales_y_to_unit_steps() {
        let source = table(&[(0.0, 0.0), (1.0, 5.0), (2.0, 3.0)]);
        let mut chart = fixed_x_chart(&source);
        assert_eq!(y_range(&chart), Range::new(0.0, 5.0));
        assert_eq!(chart.axes().y(Y0).unwrap().tick_count(), 5);

        let frame = chart.render(&source, &MonospaceMeasurer);
        assert_eq!(frame.strategy, UpdateStrategy::Rebuild);
        assert!(frame.grid.is_some());
        assert_eq!(curve(&frame).kind, CurveKind::Full);
        assert_eq!(curve(&frame).points.len(), 3);
        assert_eq!(chart.series(1).unwrap().render_cursor(), 3);
    }

    #[test]
    fn tail_append_inside_extents_draws_only_new_point() {
        let mut source = table(&[(0.0, 0.0), (1.0, 5.0), (2.0, 3.0)]);
        let mut chart = fixed_x_chart(&source);
        chart.render(&source, &MonospaceMeasurer);
        let plot_rect = chart.plot_rect();

        source.push_row(vec![3.0, 2.0], &mut chart);
        assert_eq!(chart.pending(), UpdateStrategy::Append);
        assert_eq!(y_range(&chart), Range::new(0.0, 5.0));

        let frame = chart.render(&source, &MonospaceMeasurer);
        assert_eq!(frame.strategy, UpdateStrategy::Append);
        assert!(frame.grid.is_none());
        assert_eq!(frame.plot_rect, plot_rect);
        let delta = curve(&frame);
        assert_eq!(delta.kind, CurveKind::Delta);
        assert_eq!(delta.points.len(), 1);
        assert!(delta.anchor.is_some());
        assert_eq!(delta.cursor, 4);

        // Nothing pending afterwards.
        assert!(chart.render(&source, &MonospaceMeasurer).is_empty());
    }

    #[test]
    fn removing_the_maximum_rescans_and_rebuilds() {
        let mut source = table(&[(0.0, 0.0), (1.0, 5.0), (2.0, 3.0)]);
        let mut chart = fixed_x_chart(&source);
        source.push_row(vec![3.0, 2.0], &mut chart);
        chart.render(&source, &MonospaceMeasurer);
        assert_eq!(chart.series(1).unwrap().render_cursor(), 4);

        source.remove_rows(1, 1, &mut chart);
        assert_eq!(chart.pending(), UpdateStrategy::Rebuild);
        assert!(!chart.series(1).unwrap().needs_full_recalc());
        assert_eq!(chart.series(1).unwrap().extents().y, Range::new(0.0, 3.0));
        assert_eq!(y_range(&chart), Range::new(0.0, 3.0));

        let frame = chart.render(&source, &MonospaceMeasurer);
        assert_eq!(frame.strategy, UpdateStrategy::Rebuild);
        assert_eq!(curve(&frame).kind, CurveKind::Full);
        assert_eq!(curve(&frame).points.len(), 3);
        assert_eq!(curve(&frame).cursor, 3);
    }

    #[test]
    fn removal_flag_is_checked_before_rows_disappear() {
        let mut source = table(&[(0.0, 0.0), (1.0, 5.0), (2.0, 3.0), (3.0, 4.0)]);
        let mut chart = fixed_x_chart(&source);
        let announced =
            chart.handle(&source, &SourceEvent::RowsAboutToBeRemoved { first: 1, last: 1 });
        assert_eq!(announced, UpdateStrategy::None);
        assert!(chart.series(1).unwrap().needs_full_recalc());
        source.remove_rows(1, 1, &mut crate::datasource::NullObserver);
        let removed = chart.handle(&source, &SourceEvent::RowsRemoved { first: 1, last: 1 });
        assert_eq!(removed, UpdateStrategy::Rebuild);
        assert_eq!(chart.series(1).unwrap().extents().y, Range::new(0.0, 4.0));
    }

    #[test]
    fn interior_removal_refreshes_without_rescan() {
        let mut source = table(&[(0.0, 0.0), (1.0, 2.0), (2.0, 5.0), (3.0, 1.0)]);
        let mut chart = fixed_x_chart(&source);
        chart.render(&source, &MonospaceMeasurer);

        source.remove_rows(1, 1, &mut chart);
        assert_eq!(chart.pending(), UpdateStrategy::Refresh);
        assert_eq!(chart.series(1).unwrap().row_count(), 3);

        let frame = chart.render(&source, &MonospaceMeasurer);
        assert_eq!(frame.strategy, UpdateStrategy::Refresh);
        assert!(frame.grid.is_none());
        assert_eq!(curve(&frame).kind, CurveKind::Full);
        assert_eq!(curve(&frame).points.len(), 3);
    }

    #[test]
    fn middle_insert_is_never_an_append() {
        let mut source = table(&[(0.0, 0.0), (1.0, 5.0), (2.0, 3.0)]);
        let mut chart = fixed_x_chart(&source);
        chart.render(&source, &MonospaceMeasurer);

        source.insert_row(1, vec![0.5, 1.0], &mut chart);
        assert_eq!(chart.pending(), UpdateStrategy::Refresh);
        let frame = chart.render(&source, &MonospaceMeasurer);
        assert_eq!(curve(&frame).points.len(), 4);
        assert_eq!(curve(&frame).cursor, 4);
    }

    #[test]
    fn widening_append_triggers_rebuild_and_resets_cursor() {
        let mut source = table(&[(0.0, 0.0), (1.0, 5.0), (2.0, 3.0)]);
        let mut chart = fixed_x_chart(&source);
        chart.render(&source, &MonospaceMeasurer);

        source.push_row(vec![3.0, 42.0], &mut chart);
        assert_eq!(chart.pending(), UpdateStrategy::Rebuild);
        assert_eq!(y_range(&chart).max, 50.0);
        let frame = chart.render(&source, &MonospaceMeasurer);
        assert_eq!(curve(&frame).kind, CurveKind::Full);
        assert_eq!(curve(&frame).points.len(), 4);
    }

    #[test]
    fn value_edits_never_append() {
        let mut source = table(&[(0.0, 0.0), (1.0, 5.0), (2.0, 3.0)]);
        let mut chart = fixed_x_chart(&source);
        chart.render(&source, &MonospaceMeasurer);

        source.set_value(2, 1, 4.0, &mut chart);
        assert_eq!(chart.pending(), UpdateStrategy::Refresh);
        chart.render(&source, &MonospaceMeasurer);

        source.set_value(1, 1, 1.0, &mut chart);
        assert_eq!(chart.pending(), UpdateStrategy::Rebuild);
        assert_eq!(y_range(&chart), Range::new(0.0, 4.0));
    }

    #[test]
    fn pending_strategies_accumulate_between_frames() {
        let mut source = table(&[(0.0, 0.0), (1.0, 5.0)]);
        let mut chart = fixed_x_chart(&source);
        chart.render(&source, &MonospaceMeasurer);

        source.push_row(vec![2.0, 1.0], &mut chart);
        source.insert_row(0, vec![-0.5, 2.0], &mut chart);
        source.push_row(vec![3.0, 1.0], &mut chart);
        assert_eq!(chart.pending(), UpdateStrategy::Refresh);
        let frame = chart.render(&source, &MonospaceMeasurer);
        assert_eq!(frame.strategy, UpdateStrategy::Refresh);
        assert_eq!(curve(&frame).points.len(), 5);
    }

    #[test]
    fn first_frame_is_always_a_rebuild() {
        let source = table(&[]);
        let mut chart = Chart::new(1);
        chart.attach_source(&source);
        chart.pending = UpdateStrategy::None;
        let frame = chart.render(&source, &MonospaceMeasurer);
        assert_eq!(frame.strategy, UpdateStrategy::Rebuild);
        assert!(frame.grid.is_some());
    }

    #[test]
    fn reset_rescans_and_rebuilds() {
        let mut source = table(&[(0.0, 0.0), (1.0, 5.0)]);
        let mut chart = fixed_x_chart(&source);
        chart.render(&source, &MonospaceMeasurer);

        source.replace_rows(vec![vec![0.0, 100.0], vec![1.0, 300.0]], &mut chart);
        assert_eq!(chart.pending(), UpdateStrategy::Rebuild);
        assert_eq!(chart.series(1).unwrap().extents().y, Range::new(100.0, 300.0));
        assert_eq!(chart.series(1).unwrap().row_count(), 2);
        let frame = chart.render(&source, &MonospaceMeasurer);
        assert_eq!(curve(&frame).cursor, 2);
    }

    #[test]
    fn header_probe_stops_at_first_unnamed_column() {
        let source = TableSource::new(["t", "a", "b", "", "d"]);
        let mut chart = Chart::new(1);
        chart.attach_source(&source);
        let columns: Vec<usize> = chart.series_iter().map(Series::column).collect();
        assert_eq!(columns, vec![1, 2]);
        assert_eq!(chart.series(2).unwrap().name(), "b");
        // Discovered series are not bound until asked.
        assert_eq!(chart.bound_to(Y0).count(), 0);
    }

    #[test]
    fn binding_rejections_leave_state_untouched() {
        let source = table(&[(0.0, 1.0)]);
        let mut chart = Chart::new(2);
        chart.attach_source(&source);

        let err = chart.bind_series(&source, 1, AxisId(2)).unwrap_err();
        assert!(matches!(
            err,
            GraphError::UnboundAxis {
                axis: AxisId(2),
                axis_count: 2
            }
        ));
        assert!(matches!(
            chart.bind_series(&source, 0, Y0),
            Err(GraphError::UnknownColumn { column: 0 })
        ));
        assert!(matches!(
            chart.bind_series(&source, 7, Y0),
            Err(GraphError::UnknownColumn { column: 7 })
        ));
        assert!(chart.series_axis(1).is_none());

        chart.bind_series(&source, 1, AxisId(1)).unwrap();
        assert_eq!(chart.series_axis(1), Some(AxisId(1)));
        chart.bind_series(&source, 1, Y0).unwrap();
        assert_eq!(chart.series_axis(1), Some(Y0));
        assert_eq!(chart.bound_to(AxisId(1)).count(), 0);
    }

    #[test]
    fn config_rejects_series_on_missing_axis() {
        let config = ChartConfig {
            series: vec![SeriesConfig::new(1, AxisId(3))],
            ..ChartConfig::default()
        };
        assert!(matches!(
            Chart::from_config(&config),
            Err(GraphError::UnboundAxis { .. })
        ));
    }

    #[test]
    fn configured_series_pick_up_source_data() {
        let config = ChartConfig::from_json(
            r#"{ "series": [{ "column": 2, "style": { "color": { "r": 0.0, "g": 0.0, "b": 1.0, "a": 1.0 }, "width": 2.0 } }] }"#,
        )
        .unwrap();
        let mut chart = Chart::from_config(&config).unwrap();
        let source = TableSource::new(["t", "a", "b"])
            .with_rows([vec![0.0, 1.0, -3.0], vec![1.0, 2.0, 8.0]]);
        chart.attach_source(&source);
        assert_eq!(chart.series_axis(2), Some(Y0));
        assert_eq!(chart.series(2).unwrap().name(), "b");
        assert_eq!(chart.series(2).unwrap().style().width, 2.0);
        assert_eq!(y_range(&chart), Range::new(-4.0, 8.0));
        // Column 1 was discovered but is not bound, so it does not scale Y0.
        assert!(chart.series(1).unwrap().has_data());
    }

    #[test]
    fn visible_axis_count_tracks_toggles() {
        let mut chart = Chart::new(3);
        assert_eq!(chart.visible_y_axis_count(), 3);
        chart.set_axis_visible(AxisKey::Y(AxisId(1)), false).unwrap();
        chart.set_axis_visible(AxisKey::Y(AxisId(1)), false).unwrap();
        assert_eq!(chart.visible_y_axis_count(), 2);
        chart.set_axis_visible(AxisKey::X, false).unwrap();
        assert_eq!(chart.visible_y_axis_count(), 2);
        chart.set_axis_visible(AxisKey::Y(AxisId(1)), true).unwrap();
        assert_eq!(chart.visible_y_axis_count(), 3);
        assert!(chart.set_axis_visible(AxisKey::Y(AxisId(5)), true).is_err());

        chart.set_y_axis_count(1);
        assert_eq!(chart.visible_y_axis_count(), 1);
        chart.set_y_axis_count(2);
        assert_eq!(chart.visible_y_axis_count(), 2);
    }

    #[test]
    fn hiding_a_series_skips_its_curve() {
        let mut source = table(&[(0.0, 0.0), (1.0, 5.0)]);
        let mut chart = fixed_x_chart(&source);
        chart.render(&source, &MonospaceMeasurer);

        assert!(chart.set_series_visible(1, false));
        source.push_row(vec![2.0, 1.0], &mut chart);
        let frame = chart.render(&source, &MonospaceMeasurer);
        assert_eq!(frame.strategy, UpdateStrategy::Refresh);
        assert!(frame.curves.is_empty());

        assert!(chart.set_series_visible(1, true));
        let frame = chart.render(&source, &MonospaceMeasurer);
        assert_eq!(curve(&frame).points.len(), 3);
    }

    #[test]
    fn manual_range_only_applies_without_autoscale() {
        let mut chart = Chart::new(1);
        let key = AxisKey::Y(Y0);
        assert!(!chart.set_axis_range(key, 0.0, 42.0).unwrap());
        chart.set_axis_auto_scale(key, false).unwrap();
        assert!(chart.set_axis_range(key, 0.0, 42.0).unwrap());
        assert_eq!(chart.axes().y(Y0).unwrap().max(), 50.0);
        assert!(chart.set_axis_max(key, 80.0).unwrap());
        assert_eq!(chart.axes().y(Y0).unwrap().max(), 80.0);
    }

    #[test]
    fn unbinding_drops_the_series() {
        let source = table(&[(0.0, 0.0), (1.0, 5.0)]);
        let mut chart = fixed_x_chart(&source);
        assert!(chart.unbind_series(1));
        assert!(chart.series(1).is_none());
        assert!(!chart.unbind_series(1));
        let frame = chart.render(&source, &MonospaceMeasurer);
        assert!(frame.curves.is_empty());
    }

    #[test]
    fn frames_flatten_with_the_cached_grid() {
        let mut source = table(&[(0.0, 0.0), (1.0, 5.0), (2.0, 3.0)]);
        let mut chart = fixed_x_chart(&source);
        let first = chart.render(&source, &MonospaceMeasurer);
        let rebuild = first.to_render_list(None, chart.theme());
        assert!(rebuild.commands().iter().any(|command| matches!(
            command,
            crate::render::RenderCommand::Text { .. }
        )));

        source.insert_row(0, vec![-1.0, 1.0], &mut chart);
        let refresh = chart.render(&source, &MonospaceMeasurer);
        let list = refresh.to_render_list(chart.grid(), chart.theme());
        assert_eq!(
            list.commands()
                .iter()
                .filter(|command| matches!(command, crate::render::RenderCommand::Text { .. }))
                .count(),
            rebuild
                .commands()
                .iter()
                .filter(|command| matches!(command, crate::render::RenderCommand::Text { .. }))
                .count()
        );
    }

    /// Chart over `t, a, b, c` with `a` and `b` on the first Y axis, `c` on
    /// the second, and a fixed X range.
    fn two_axis_chart(source: &TableSource) -> Chart {
        let config = ChartConfig {
            x_axis: AxisConfig::new().with_auto_scale(false).with_range(0.0, 10.0),
            y_axes: vec![AxisConfig::new(), AxisConfig::new()],
            ..ChartConfig::default()
        };
        let mut chart = Chart::from_config(&config).unwrap();
        chart.attach_source(source);
        chart.bind_series(source, 1, Y0).unwrap();
        chart.bind_series(source, 2, Y0).unwrap();
        chart.bind_series(source, 3, AxisId(1)).unwrap();
        chart
    }

    #[test]
    fn axes_scale_over_their_own_series() {
        let mut source = TableSource::new(["t", "a", "b", "c"]).with_rows([
            vec![0.0, 0.0, 1.0, 100.0],
            vec![1.0, 5.0, 2.0, 200.0],
            vec![2.0, 3.0, 4.0, 300.0],
        ]);
        let mut chart = two_axis_chart(&source);
        assert_eq!(y_range(&chart), Range::new(0.0, 5.0));
        assert_eq!(chart.axes().y(AxisId(1)).unwrap().range(), Range::new(100.0, 300.0));
        assert_eq!(chart.render(&source, &MonospaceMeasurer).curves.len(), 3);

        source.push_row(vec![3.0, 4.0, 3.0, 250.0], &mut chart);
        let frame = chart.render(&source, &MonospaceMeasurer);
        assert_eq!(frame.strategy, UpdateStrategy::Append);
        assert_eq!(frame.curves.len(), 3);
        assert!(frame.curves.iter().all(|curve| curve.kind == CurveKind::Delta));

        // Widening only the second axis still rebuilds the whole frame.
        source.push_row(vec![4.0, 2.0, 1.0, 900.0], &mut chart);
        assert_eq!(chart.pending(), UpdateStrategy::Rebuild);
        assert_eq!(y_range(&chart), Range::new(0.0, 5.0));
        assert_eq!(chart.axes().y(AxisId(1)).unwrap().range(), Range::new(100.0, 900.0));

        let frame = chart.render(&source, &MonospaceMeasurer);
        assert_eq!(frame.strategy, UpdateStrategy::Rebuild);
        assert!(frame.grid.is_some());
        assert!(frame.curves.iter().all(|curve| curve.kind == CurveKind::Full));
        assert!(frame.curves.iter().all(|curve| curve.points.len() == 5));
        let on_second: Vec<_> = frame
            .curves
            .iter()
            .filter(|curve| curve.axis == AxisId(1))
            .collect();
        assert_eq!(on_second.len(), 1);
        assert_eq!(on_second[0].series, SeriesId(3));
    }

    #[test]
    fn batch_tail_append_advances_every_cursor() {
        let mut source = TableSource::new(["t", "a", "b", "c"]).with_rows([
            vec![0.0, 0.0, 1.0, 100.0],
            vec![1.0, 5.0, 2.0, 200.0],
            vec![2.0, 3.0, 4.0, 300.0],
        ]);
        let mut chart = two_axis_chart(&source);
        chart.render(&source, &MonospaceMeasurer);

        source.extend_rows(
            [vec![3.0, 2.0, 1.0, 260.0], vec![4.0, 1.0, 2.0, 270.0]],
            &mut chart,
        );
        let frame = chart.render(&source, &MonospaceMeasurer);
        assert_eq!(frame.strategy, UpdateStrategy::Append);
        assert!(frame.grid.is_none());
        assert_eq!(frame.curves.len(), 3);
        for curve in &frame.curves {
            assert_eq!(curve.kind, CurveKind::Delta);
            assert_eq!(curve.points.len(), 2);
            assert!(curve.anchor.is_some());
            assert_eq!(curve.cursor, 5);
        }
    }

    #[test]
    fn x_axis_spans_every_bound_series() {
        let source = TableSource::new(["t", "a", "c"]).with_rows([
            vec![0.0, 1.0, 10.0],
            vec![1.0, 2.0, 20.0],
            vec![8.0, f64::NAN, 30.0],
        ]);
        let mut chart = Chart::new(2);
        chart.attach_source(&source);
        chart.bind_series(&source, 1, Y0).unwrap();
        assert!(chart.axes().x().max() < 8.0);

        chart.bind_series(&source, 2, AxisId(1)).unwrap();
        assert_eq!(chart.axes().x().range(), Range::new(0.0, 8.0));

        assert!(chart.unbind_series(2));
        assert!(chart.axes().x().max() < 8.0);
    }

    #[test]
    fn replacing_the_source_drops_series_it_lacks() {
        let wide = TableSource::new(["t", "a", "b"])
            .with_rows([vec![0.0, 1.0, 2.0], vec![1.0, 3.0, 4.0]]);
        let mut chart = Chart::new(1);
        chart.attach_source(&wide);
        chart.bind_series(&wide, 1, Y0).unwrap();
        chart.bind_series(&wide, 2, Y0).unwrap();

        let narrow = table(&[(0.0, 1.0), (1.0, 2.0)]);
        chart.attach_source(&narrow);
        assert!(chart.series(2).is_none());
        assert_eq!(chart.series_axis(2), None);
        assert_eq!(chart.series_axis(1), Some(Y0));
        assert!(matches!(
            chart.bind_series(&narrow, 2, Y0),
            Err(GraphError::UnknownColumn { column: 2 })
        ));

        let frame = chart.render(&narrow, &MonospaceMeasurer);
        assert_eq!(frame.curves.len(), 1);
        assert_eq!(curve(&frame).series, SeriesId(1));
    }

    #[test]
    fn missing_values_break_the_line() {
        let source = table(&[(0.0, 1.0), (1.0, f64::NAN), (2.0, 3.0), (3.0, 4.0)]);
        let mut chart = fixed_x_chart(&source);
        let frame = chart.render(&source, &MonospaceMeasurer);
        let line = curve(&frame);
        assert_eq!(line.points.len(), 4);
        assert!(line.points[1].is_gap());
        assert!(!line.points[2].is_gap());
        assert_eq!(line.segments(frame.plot_rect).len(), 1);
    }
}
