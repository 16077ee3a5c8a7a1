//! Serializable chart configuration.

use serde::{Deserialize, Serialize};

use crate::axis::AxisConfig;
use crate::error::Result;
use crate::series::SeriesConfig;
use crate::style::Theme;

/// Spacing constants used when laying out the plot area.
///
/// All values are in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Padding between the canvas edge and the axis bands.
    pub margin: f32,
    /// Length of tick marks.
    pub tick_mark_width: f32,
    /// Gap between a tick mark and its label, and between adjacent X labels.
    pub label_gap: f32,
    /// Tick label font size.
    pub font_size: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin: 10.0,
            tick_mark_width: 5.0,
            label_gap: 5.0,
            font_size: 12.0,
        }
    }
}

/// Complete chart configuration.
///
/// ```
/// use gpui_livegraph::ChartConfig;
///
/// let config = ChartConfig::from_json(r#"{ "series": [{ "column": 1 }] }"#).unwrap();
/// assert_eq!(config.y_axes.len(), 1);
/// assert_eq!(config.series[0].column, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Shared X axis.
    pub x_axis: AxisConfig,
    /// Y axes in stacking order. An empty list is treated as one default axis.
    pub y_axes: Vec<AxisConfig>,
    /// Series to bind up front.
    pub series: Vec<SeriesConfig>,
    /// Layout constants.
    pub layout: LayoutConfig,
    /// Colors not tied to an axis or series.
    pub theme: Theme,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            x_axis: AxisConfig::default(),
            y_axes: vec![AxisConfig::default()],
            series: Vec::new(),
            layout: LayoutConfig::default(),
            theme: Theme::default(),
        }
    }
}

impl ChartConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the configuration to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
