//! Data series bound to a source column.
//!
//! A series never copies sample data. It keeps running extents that are
//! updated in O(1) per observed point, a flag that requests a full rescan
//! when a removed point may have been an extremum, and a render cursor that
//! records how many rows the last frame already drew.

use serde::{Deserialize, Serialize};

use crate::axes::AxisId;
use crate::datasource::DataSource;
use crate::geom::Point;
use crate::render::{Color, LineStyle};
use crate::view::Extents;

/// Identifier for a series: the source column it reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeriesId(pub usize);

impl SeriesId {
    /// Source column of the series.
    pub fn column(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for SeriesId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "column {}", self.0)
    }
}

/// Serializable series configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesConfig {
    /// Source column.
    pub column: usize,
    /// Y axis the series is bound to.
    #[serde(default)]
    pub axis: AxisId,
    /// Visibility.
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Line styling.
    #[serde(default)]
    pub style: LineStyle,
}

fn default_visible() -> bool {
    true
}

impl SeriesConfig {
    /// Configuration for `column` bound to `axis` with default styling.
    pub fn new(column: usize, axis: AxisId) -> Self {
        Self {
            column,
            axis,
            visible: true,
            style: LineStyle::default(),
        }
    }

    /// Set the line color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.style.color = color;
        self
    }

    /// Set the line width.
    pub fn with_width(mut self, width: f32) -> Self {
        self.style.width = width;
        self
    }

    /// Set visibility.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

/// Incremental state for one data stream.
#[derive(Debug, Clone)]
pub struct Series {
    id: SeriesId,
    name: String,
    style: LineStyle,
    visible: bool,
    extents: Extents,
    render_cursor: usize,
    needs_full_recalc: bool,
    row_count: usize,
}

impl Series {
    /// Create an empty series reading `column`.
    pub fn new(column: usize, name: impl Into<String>) -> Self {
        Self {
            id: SeriesId(column),
            name: name.into(),
            style: LineStyle::default(),
            visible: true,
            extents: Extents::EMPTY,
            render_cursor: 0,
            needs_full_recalc: false,
            row_count: 0,
        }
    }

    /// Access the series identifier.
    pub fn id(&self) -> SeriesId {
        self.id
    }

    /// Source column.
    pub fn column(&self) -> usize {
        self.id.0
    }

    /// Access the series name (the column header).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Access the line style.
    pub fn style(&self) -> LineStyle {
        self.style
    }

    /// Replace the line style. Returns `true` if it changed.
    pub fn set_style(&mut self, style: LineStyle) -> bool {
        let changed = self.style != style;
        self.style = style;
        changed
    }

    /// Check if the series is visible.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Toggle visibility. Returns `true` if the flag changed.
    pub fn set_visible(&mut self, visible: bool) -> bool {
        let changed = self.visible != visible;
        self.visible = visible;
        changed
    }

    /// Running extents.
    pub fn extents(&self) -> Extents {
        self.extents
    }

    /// Minimum corner of the extents (`+inf` when empty).
    pub fn min_point(&self) -> Point {
        self.extents.min_point()
    }

    /// Maximum corner of the extents (`-inf` when empty).
    pub fn max_point(&self) -> Point {
        self.extents.max_point()
    }

    /// Check whether at least one point has been observed.
    pub fn has_data(&self) -> bool {
        !self.extents.is_empty()
    }

    /// Number of points already represented in the last rendered frame.
    pub fn render_cursor(&self) -> usize {
        self.render_cursor
    }

    /// Check whether a removal may have invalidated the extents.
    pub fn needs_full_recalc(&self) -> bool {
        self.needs_full_recalc
    }

    /// Number of source rows observed so far.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub(crate) fn set_row_count(&mut self, rows: usize) {
        self.row_count = rows;
    }

    /// Grow the extents to include `(x, y)`.
    ///
    /// Returns `true` when any bound moved. Points with a non-finite
    /// coordinate are not drawn and never move a bound.
    pub fn extend_range(&mut self, x: f64, y: f64) -> bool {
        if !x.is_finite() || !y.is_finite() {
            return false;
        }
        let moved_x = self.extents.x.expand_to_include(x);
        let moved_y = self.extents.y.expand_to_include(y);
        moved_x || moved_y
    }

    /// Inspect a point that is about to be removed.
    ///
    /// Unless the point lies strictly inside the extents on both axes, it
    /// may have been the only extremum, so a full rescan is requested. The
    /// flag stays set until [`Series::recompute_full_range`] runs.
    pub fn invalidate_if_boundary(&mut self, x: f64, y: f64) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        if !self.extents.x.contains_strictly(x) || !self.extents.y.contains_strictly(y) {
            self.needs_full_recalc = true;
        }
    }

    /// Rescan every row of `source` if flagged or `forced`.
    ///
    /// This is the only O(n) operation on a series. Returns `true` when a
    /// rescan happened.
    pub fn recompute_full_range<S>(&mut self, source: &S, forced: bool) -> bool
    where
        S: DataSource + ?Sized,
    {
        if !self.needs_full_recalc && !forced {
            return false;
        }
        self.extents = Extents::EMPTY;
        let rows = source.row_count();
        let column = self.column();
        for row in 0..rows {
            if let (Some(x), Some(y)) = (source.x(row), source.value(row, column)) {
                self.extend_range(x, y);
            }
        }
        self.row_count = rows;
        self.needs_full_recalc = false;
        true
    }

    /// Forget all data-derived state.
    pub fn clear(&mut self) {
        self.extents = Extents::EMPTY;
        self.render_cursor = 0;
        self.needs_full_recalc = false;
        self.row_count = 0;
    }

    /// Force the next render to start from the first point.
    pub fn clear_render_cursor(&mut self) {
        self.render_cursor = 0;
    }

    /// Move the render cursor. Negative positions clamp to zero.
    pub fn advance_render_cursor(&mut self, to: isize) {
        self.render_cursor = usize::try_from(to).unwrap_or(0);
    }
}

#[cfg(test)]
mod tests {
    use rand::seq::SliceRandom;

    use super::*;
    use crate::datasource::{NullObserver, TableSource};
    use crate::view::Range;

    fn fed(points: &[(f64, f64)]) -> Series {
        let mut series = Series::new(1, "a");
        for &(x, y) in points {
            series.extend_range(x, y);
        }
        series
    }

    #[test]
    fn empty_series_reports_sentinels() {
        let series = Series::new(1, "a");
        assert!(!series.has_data());
        assert_eq!(series.min_point(), Point::new(f64::INFINITY, f64::INFINITY));
        assert_eq!(
            series.max_point(),
            Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY)
        );
    }

    #[test]
    fn extents_are_order_independent() {
        let mut rng = rand::rng();
        let mut points: Vec<(f64, f64)> = (0..200)
            .map(|i| {
                let x = i as f64 * 0.5;
                (x, (x * 0.37).sin() * 40.0 + x)
            })
            .collect();
        let reference = fed(&points).extents();
        let true_y = points
            .iter()
            .map(|p| p.1)
            .fold(Range::EMPTY, |mut range, y| {
                range.expand_to_include(y);
                range
            });
        assert_eq!(reference.y, true_y);
        assert_eq!(reference.x, Range::new(0.0, 99.5));

        for _ in 0..20 {
            points.shuffle(&mut rng);
            assert_eq!(fed(&points).extents(), reference);
        }
    }

    #[test]
    fn extend_reports_only_bound_moves() {
        let mut series = Series::new(1, "a");
        assert!(series.extend_range(0.0, 0.0));
        assert!(series.extend_range(1.0, 5.0));
        assert!(!series.extend_range(0.5, 2.0));
        assert!(!series.extend_range(f64::NAN, 100.0));
        assert_eq!(series.max_point(), Point::new(1.0, 5.0));
    }

    #[test]
    fn interior_removal_keeps_extents() {
        let mut series = fed(&[(0.0, 0.0), (1.0, 5.0), (2.0, 3.0)]);
        let before = series.extents();
        series.invalidate_if_boundary(1.5, 2.0);
        assert!(!series.needs_full_recalc());
        assert_eq!(series.extents(), before);
    }

    #[test]
    fn removal_on_a_bound_requests_rescan() {
        let mut series = fed(&[(0.0, 0.0), (1.0, 5.0), (2.0, 3.0)]);
        // Interior on Y, but X sits on the minimum.
        series.invalidate_if_boundary(0.0, 2.0);
        assert!(series.needs_full_recalc());
    }

    #[test]
    fn rescan_after_max_removal_restores_true_extremum() {
        let mut table = TableSource::new(["t", "a"]).with_rows([
            vec![0.0, 0.0],
            vec![1.0, 5.0],
            vec![2.0, 3.0],
        ]);
        let mut series = Series::new(1, "a");
        assert!(series.recompute_full_range(&table, true));
        assert_eq!(series.extents().y, Range::new(0.0, 5.0));

        series.invalidate_if_boundary(1.0, 5.0);
        assert!(series.needs_full_recalc());
        table.remove_rows(1, 1, &mut NullObserver);

        assert!(series.recompute_full_range(&table, false));
        assert!(!series.needs_full_recalc());
        assert_eq!(series.extents().y, Range::new(0.0, 3.0));
        assert_eq!(series.row_count(), 2);
        assert!(!series.recompute_full_range(&table, false));
    }

    #[test]
    fn rescan_of_empty_source_keeps_sentinels() {
        let table = TableSource::new(["t", "a"]);
        let mut series = fed(&[(1.0, 1.0)]);
        assert!(series.recompute_full_range(&table, true));
        assert!(!series.has_data());
    }

    #[test]
    fn cursor_clamps_negative_positions() {
        let mut series = Series::new(1, "a");
        series.advance_render_cursor(7);
        assert_eq!(series.render_cursor(), 7);
        series.advance_render_cursor(-3);
        assert_eq!(series.render_cursor(), 0);
        series.advance_render_cursor(4);
        series.clear_render_cursor();
        assert_eq!(series.render_cursor(), 0);
    }
}
