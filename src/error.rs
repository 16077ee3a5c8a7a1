//! Error types for the graph engine.

use thiserror::Error;

use crate::axes::AxisId;

/// Errors raised by the graph engine.
///
/// Only configuration problems are returned to callers. Range problems are
/// absorbed where they occur and the previous state is kept.
#[derive(Error, Debug)]
pub enum GraphError {
    /// The autoscale input produced a non-finite or zero tick step.
    #[error("degenerate axis range [{min}, {max}]")]
    DegenerateRange {
        /// Raw minimum passed to the autoscale step.
        min: f64,
        /// Raw maximum passed to the autoscale step.
        max: f64,
    },

    /// No bound series had valid extents on the requested dimension.
    #[error("no series with data to aggregate")]
    EmptyAggregate,

    /// A series referenced a Y axis that is not part of the axis set.
    #[error("Y axis {axis} is not part of the chart ({axis_count} Y axes)")]
    UnboundAxis {
        /// Requested axis.
        axis: AxisId,
        /// Number of Y axes the chart owns.
        axis_count: usize,
    },

    /// The column is reserved for X values or does not exist in the source.
    #[error("column {column} cannot be bound to a series")]
    UnknownColumn {
        /// Offending column index.
        column: usize,
    },

    /// Configuration JSON could not be parsed.
    #[error("invalid chart configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type returned by fallible chart operations.
pub type Result<T> = std::result::Result<T, GraphError>;
