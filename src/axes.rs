//! The shared X axis and the ordered collection of Y axes.

use serde::{Deserialize, Serialize};

use crate::axis::{Axis, AxisConfig};

/// Index of a Y axis inside an [`AxisSet`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct AxisId(pub usize);

impl std::fmt::Display for AxisId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "y{}", self.0)
    }
}

/// Address of any axis in a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisKey {
    /// The shared X axis.
    X,
    /// A Y axis.
    Y(AxisId),
}

/// One X axis plus an ordered list of Y axes.
#[derive(Debug, Clone)]
pub struct AxisSet {
    x: Axis,
    y: Vec<Axis>,
}

impl AxisSet {
    /// Create a set with default axes and `y_count` Y axes.
    pub fn new(y_count: usize) -> Self {
        Self {
            x: Axis::new(),
            y: (0..y_count).map(|_| Axis::new()).collect(),
        }
    }

    /// Create a set from axis configurations.
    pub fn from_configs(x: &AxisConfig, y: &[AxisConfig]) -> Self {
        Self {
            x: Axis::from_config(x),
            y: y.iter().map(Axis::from_config).collect(),
        }
    }

    /// Access the X axis.
    pub fn x(&self) -> &Axis {
        &self.x
    }

    pub(crate) fn x_mut(&mut self) -> &mut Axis {
        &mut self.x
    }

    /// Access a Y axis.
    pub fn y(&self, id: AxisId) -> Option<&Axis> {
        self.y.get(id.0)
    }

    pub(crate) fn y_mut(&mut self, id: AxisId) -> Option<&mut Axis> {
        self.y.get_mut(id.0)
    }

    /// Access any axis by key.
    pub fn get(&self, key: AxisKey) -> Option<&Axis> {
        match key {
            AxisKey::X => Some(&self.x),
            AxisKey::Y(id) => self.y(id),
        }
    }

    pub(crate) fn get_mut(&mut self, key: AxisKey) -> Option<&mut Axis> {
        match key {
            AxisKey::X => Some(&mut self.x),
            AxisKey::Y(id) => self.y_mut(id),
        }
    }

    /// Iterate Y axes in order.
    pub fn y_axes(&self) -> impl Iterator<Item = (AxisId, &Axis)> {
        self.y.iter().enumerate().map(|(i, axis)| (AxisId(i), axis))
    }

    pub(crate) fn y_axes_mut(&mut self) -> impl Iterator<Item = (AxisId, &mut Axis)> {
        self.y.iter_mut().enumerate().map(|(i, axis)| (AxisId(i), axis))
    }

    /// Number of Y axes.
    pub fn y_count(&self) -> usize {
        self.y.len()
    }

    /// Check whether `id` names a Y axis in this set.
    pub fn contains(&self, id: AxisId) -> bool {
        id.0 < self.y.len()
    }

    /// Grow or shrink the Y axis list. New axes use the default configuration.
    pub(crate) fn resize_y(&mut self, count: usize) {
        self.y.resize_with(count, Axis::new);
    }
}

impl Default for AxisSet {
    fn default() -> Self {
        Self::new(1)
    }
}
