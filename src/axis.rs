//! Axis state, nice-number autoscaling, and tick label formatting.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::GraphError;
use crate::render::Color;
use crate::series::Series;
use crate::view::Range;

/// Default lower bound on the number of tick intervals.
pub const MIN_TICK_COUNT: usize = 4;

/// How an [`Axis::adjust`] call treats the autoscale flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustMode {
    /// Only adjust when autoscale is enabled.
    AutoIfEnabled,
    /// Adjust regardless of the autoscale flag.
    Forced,
}

/// Data dimension an axis aggregates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisKind {
    /// Shared horizontal axis.
    X,
    /// Vertical value axis.
    Y,
}

/// Compute the nice tick step for a raw range.
///
/// The step is always 1, 2, or 5 times a power of ten. The 5x candidate is
/// checked before the 2x candidate.
pub fn nice_step(raw_min: f64, raw_max: f64, min_ticks: usize) -> Result<f64, GraphError> {
    let gross_step = (raw_max - raw_min) / min_ticks.max(1) as f64;
    let mut step = 10_f64.powf(gross_step.log10().floor());
    if !step.is_finite() || step == 0.0 {
        return Err(GraphError::DegenerateRange {
            min: raw_min,
            max: raw_max,
        });
    }
    if 5.0 * step < gross_step {
        step *= 5.0;
    } else if 2.0 * step < gross_step {
        step *= 2.0;
    }
    Ok(step)
}

/// Built-in label formats that can be stored in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelFormat {
    /// Plain decimal notation with as many decimals as the tick spacing needs.
    #[default]
    Decimal,
    /// Engineering notation with SI prefixes (`1.5k`, `20m`).
    SiPrefix,
}

/// Formatter for axis tick labels.
#[derive(Clone, Default)]
pub enum AxisFormatter {
    /// Plain decimal formatter.
    #[default]
    Default,
    /// SI prefix formatter.
    SiPrefix,
    /// Custom formatter callback.
    Custom(Arc<dyn Fn(f64) -> String + Send + Sync>),
}

impl AxisFormatter {
    /// Format a tick value. `spacing` is the distance between adjacent ticks.
    pub fn format(&self, value: f64, spacing: f64) -> String {
        match self {
            Self::Default => format_decimal(value, spacing),
            Self::SiPrefix => format_si(value),
            Self::Custom(formatter) => formatter(value),
        }
    }
}

impl From<LabelFormat> for AxisFormatter {
    fn from(format: LabelFormat) -> Self {
        match format {
            LabelFormat::Decimal => Self::Default,
            LabelFormat::SiPrefix => Self::SiPrefix,
        }
    }
}

impl std::fmt::Debug for AxisFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Default => write!(f, "AxisFormatter::Default"),
            Self::SiPrefix => write!(f, "AxisFormatter::SiPrefix"),
            Self::Custom(_) => write!(f, "AxisFormatter::Custom(..)"),
        }
    }
}

fn format_decimal(value: f64, spacing: f64) -> String {
    let mut decimals = 0;
    if spacing.is_finite() && spacing > 0.0 {
        while decimals < 9 {
            let scaled = spacing * 10_f64.powi(decimals as i32);
            if (scaled - scaled.round()).abs() < 1e-6 * scaled.abs().max(1.0) {
                break;
            }
            decimals += 1;
        }
    }
    let text = format!("{value:.decimals$}");
    if text.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
        text.trim_start_matches('-').to_string()
    } else {
        text
    }
}

const SI_PREFIXES: [&str; 17] = [
    "y", "z", "a", "f", "p", "n", "µ", "m", "", "k", "M", "G", "T", "P", "E", "Z", "Y",
];

fn format_si(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{}", if value.is_finite() { 0.0 } else { value });
    }
    let exponent = (value.abs().log10() / 3.0).floor().clamp(-8.0, 8.0) as i32;
    let scaled = value / 10_f64.powi(exponent * 3);
    let mut text = format!("{scaled:.3}");
    if text.contains('.') {
        text = text.trim_end_matches('0').trim_end_matches('.').to_string();
    }
    text.push_str(SI_PREFIXES[(exponent + 8) as usize]);
    text
}

/// Serializable axis configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisConfig {
    visible: bool,
    auto_scale: bool,
    min: f64,
    max: f64,
    min_tick_count: usize,
    line_color: Color,
    label_format: LabelFormat,
}

impl AxisConfig {
    /// Create the default configuration: visible, autoscaled, `0..10`.
    pub fn new() -> Self {
        Self {
            visible: true,
            auto_scale: true,
            min: 0.0,
            max: 10.0,
            min_tick_count: MIN_TICK_COUNT,
            line_color: Color::WHITE,
            label_format: LabelFormat::default(),
        }
    }

    /// Set visibility.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Enable or disable autoscaling.
    pub fn with_auto_scale(mut self, auto_scale: bool) -> Self {
        self.auto_scale = auto_scale;
        self
    }

    /// Set the manual range, used when autoscaling is disabled.
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        let range = Range::new(min, max);
        self.min = range.min;
        self.max = range.max;
        self
    }

    /// Set the tick-count floor.
    pub fn with_min_tick_count(mut self, count: usize) -> Self {
        self.min_tick_count = count;
        self
    }

    /// Set the axis line color.
    pub fn with_line_color(mut self, color: Color) -> Self {
        self.line_color = color;
        self
    }

    /// Set the label format.
    pub fn with_label_format(mut self, format: LabelFormat) -> Self {
        self.label_format = format;
        self
    }

    /// Check visibility.
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Check whether autoscale is enabled.
    pub fn auto_scale(&self) -> bool {
        self.auto_scale
    }

    /// Manual range.
    pub fn range(&self) -> Range {
        Range::new(self.min, self.max)
    }

    /// Tick-count floor.
    pub fn min_tick_count(&self) -> usize {
        self.min_tick_count
    }

    /// Axis line color.
    pub fn line_color(&self) -> Color {
        self.line_color
    }

    /// Label format.
    pub fn label_format(&self) -> LabelFormat {
        self.label_format
    }
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Runtime state of one axis.
///
/// `min`/`max` hold the displayed, rounded range, which is distinct from the
/// raw extents of the data bound to the axis.
#[derive(Debug, Clone)]
pub struct Axis {
    min: f64,
    max: f64,
    tick_count: usize,
    min_tick_count: usize,
    auto_scale: bool,
    visible: bool,
    line_color: Color,
    max_tick_label_width: f32,
    formatter: AxisFormatter,
}

impl Axis {
    /// Create an axis with the default configuration.
    pub fn new() -> Self {
        Self::from_config(&AxisConfig::default())
    }

    /// Create an axis from configuration.
    ///
    /// A manual range only applies when autoscaling is disabled, and is
    /// rounded outwards like any other adjustment.
    pub fn from_config(config: &AxisConfig) -> Self {
        let mut axis = Self {
            min: 0.0,
            max: 10.0,
            tick_count: 5,
            min_tick_count: config.min_tick_count.max(1),
            auto_scale: config.auto_scale,
            visible: config.visible,
            line_color: config.line_color,
            max_tick_label_width: 0.0,
            formatter: config.label_format.into(),
        };
        if !config.auto_scale {
            axis.adjust(config.min, config.max, AdjustMode::Forced);
        }
        axis
    }

    /// Displayed minimum.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Displayed maximum.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Displayed range.
    pub fn range(&self) -> Range {
        Range::new(self.min, self.max)
    }

    /// Displayed span.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Number of tick intervals.
    pub fn tick_count(&self) -> usize {
        self.tick_count
    }

    /// Tick-count floor.
    pub fn min_tick_count(&self) -> usize {
        self.min_tick_count
    }

    /// Set the tick-count floor. Takes effect on the next adjustment.
    pub fn set_min_tick_count(&mut self, count: usize) {
        self.min_tick_count = count.max(1);
    }

    /// Check whether autoscale is enabled.
    pub fn auto_scale(&self) -> bool {
        self.auto_scale
    }

    /// Enable or disable autoscaling. Returns `true` if the flag changed.
    pub fn set_auto_scale(&mut self, auto_scale: bool) -> bool {
        let changed = self.auto_scale != auto_scale;
        self.auto_scale = auto_scale;
        changed
    }

    /// Check visibility.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Toggle visibility. Returns `true` if the flag changed.
    pub(crate) fn set_visible(&mut self, visible: bool) -> bool {
        let changed = self.visible != visible;
        self.visible = visible;
        changed
    }

    /// Axis line color.
    pub fn line_color(&self) -> Color {
        self.line_color
    }

    /// Set the axis line color. Returns `true` if it changed.
    pub fn set_line_color(&mut self, color: Color) -> bool {
        let changed = self.line_color != color;
        self.line_color = color;
        changed
    }

    /// Access the label formatter.
    pub fn formatter(&self) -> &AxisFormatter {
        &self.formatter
    }

    /// Replace the label formatter.
    pub fn set_formatter(&mut self, formatter: AxisFormatter) {
        self.formatter = formatter;
    }

    /// Set the displayed minimum. Only effective while autoscale is disabled.
    pub fn set_min(&mut self, value: f64) -> bool {
        if self.auto_scale || self.min == value {
            return false;
        }
        self.adjust(value, self.max, AdjustMode::Forced)
    }

    /// Set the displayed maximum. Only effective while autoscale is disabled.
    pub fn set_max(&mut self, value: f64) -> bool {
        if self.auto_scale || self.max == value {
            return false;
        }
        self.adjust(self.min, value, AdjustMode::Forced)
    }

    /// Round `raw_min..raw_max` outwards to a nice range and commit it.
    ///
    /// Returns `true` only when the displayed range changed. Degenerate input
    /// (single value, all-equal data, non-finite bounds) keeps the previous
    /// range and returns `false`.
    pub fn adjust(&mut self, raw_min: f64, raw_max: f64, mode: AdjustMode) -> bool {
        if mode == AdjustMode::AutoIfEnabled && !self.auto_scale {
            return false;
        }
        let step = match nice_step(raw_min, raw_max, self.min_tick_count) {
            Ok(step) => step,
            Err(err) => {
                trace!(%err, "axis adjustment skipped");
                return false;
            }
        };

        let first = (raw_min / step).floor();
        let last = (raw_max / step).ceil();
        let min = first * step;
        let max = last * step;
        // Rounding outwards can overflow near the ends of the f64 range.
        if !(max - min).is_finite() {
            let err = GraphError::DegenerateRange {
                min: raw_min,
                max: raw_max,
            };
            trace!(%err, "axis adjustment skipped");
            return false;
        }
        self.tick_count = ((last - first) as usize).max(self.min_tick_count);

        if self.min != min || self.max != max {
            self.min = min;
            self.max = max;
            true
        } else {
            false
        }
    }

    /// Reduce the extents of `series` on one dimension, skipping empty series.
    ///
    /// Returns the empty sentinel when no series has data.
    pub fn aggregate<'a, I>(series: I, kind: AxisKind) -> Range
    where
        I: IntoIterator<Item = &'a Series>,
    {
        series
            .into_iter()
            .filter(|series| series.has_data())
            .map(|series| match kind {
                AxisKind::X => series.extents().x,
                AxisKind::Y => series.extents().y,
            })
            .fold(Range::EMPTY, Range::union)
    }

    /// Aggregate `series` and adjust to the result if autoscale is enabled.
    pub fn autoscale<'a, I>(&mut self, series: I, kind: AxisKind) -> Result<bool, GraphError>
    where
        I: IntoIterator<Item = &'a Series>,
    {
        let range = Self::aggregate(series, kind);
        if range.is_empty() {
            return Err(GraphError::EmptyAggregate);
        }
        Ok(self.adjust(range.min, range.max, AdjustMode::AutoIfEnabled))
    }

    /// Distance between adjacent ticks.
    pub fn tick_spacing(&self) -> f64 {
        self.span() / self.tick_count.max(1) as f64
    }

    /// Value of tick `index`, for `index` in `0..=tick_count`.
    pub fn tick_value(&self, index: usize) -> f64 {
        self.min + index as f64 * self.span() / self.tick_count.max(1) as f64
    }

    /// All tick values from `min` to `max`.
    pub fn ticks(&self) -> impl Iterator<Item = f64> + '_ {
        (0..=self.tick_count.max(1)).map(|index| self.tick_value(index))
    }

    /// Formatted label for every tick.
    pub fn tick_labels(&self) -> Vec<String> {
        let spacing = self.tick_spacing();
        self.ticks()
            .map(|value| self.formatter.format(value, spacing))
            .collect()
    }

    /// Widest tick label measured during the last layout, in pixels.
    pub fn max_tick_label_width(&self) -> f32 {
        self.max_tick_label_width
    }

    pub(crate) fn clear_max_tick_label_width(&mut self) {
        self.max_tick_label_width = 0.0;
    }

    pub(crate) fn note_tick_label_width(&mut self, width: f32) {
        if self.max_tick_label_width < width {
            self.max_tick_label_width = width;
        }
    }
}

impl Default for Axis {
    fn default() -> Self {
        Self::new()
    }
}
