//! Chart theming.

use serde::{Deserialize, Serialize};

use crate::render::Color;

/// Visual theme for charts.
///
/// Axis spines and tick labels use each axis's own line color; the theme
/// covers everything that is not tied to a particular axis or series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Canvas background.
    pub background: Color,
    /// Plot area border.
    pub border: Color,
    /// Gridline color.
    pub grid: Color,
}

impl Theme {
    /// Create the default dark theme.
    pub fn new() -> Self {
        Self {
            background: Color::BLACK,
            border: Color::new(0.6, 0.6, 0.6, 1.0),
            grid: Color::WHITE.with_alpha(0.4),
        }
    }

    /// Light theme for white backgrounds.
    pub fn light() -> Self {
        Self {
            background: Color::WHITE,
            border: Color::new(0.3, 0.3, 0.3, 1.0),
            grid: Color::BLACK.with_alpha(0.25),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new()
    }
}
