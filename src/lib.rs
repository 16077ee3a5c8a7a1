//! gpui_livegraph is an incremental real-time graph engine.
//!
//! Series keep running extents instead of rescanning their data, axes round
//! raw extents to "nice" tick ranges, and every data source event is
//! classified so that pure tail appends only draw the new points. Frames are
//! backend-agnostic; the `gpui` feature adds a GPUI painter.

#![forbid(unsafe_code)]

pub mod axes;
pub mod axis;
pub mod chart;
pub mod config;
pub mod datasource;
pub mod error;
pub mod geom;
pub mod layout;
pub mod render;
pub mod series;
pub mod style;
pub mod transform;
pub mod view;

#[cfg(feature = "gpui")]
pub mod gpui_backend;

pub use axes::{AxisId, AxisKey, AxisSet};
pub use axis::{AdjustMode, Axis, AxisConfig, AxisFormatter, AxisKind, LabelFormat, nice_step};
pub use chart::{Chart, UpdateStrategy};
pub use config::{ChartConfig, LayoutConfig};
pub use datasource::{DataSource, NullObserver, SourceEvent, SourceObserver, TableSource};
pub use error::{GraphError, Result};
pub use geom::{Point, ScreenPoint, ScreenRect};
pub use layout::{
    AxisGeometry, GridGeometry, MonospaceMeasurer, TextMeasurer, TickLabel, TickMark, build_grid,
};
pub use render::{
    Color, CurveKind, CurveUpdate, Frame, LineSegment, LineStyle, RectStyle, RenderCommand,
    RenderList, TextStyle, build_line_segments,
};
pub use series::{Series, SeriesConfig, SeriesId};
pub use style::Theme;
pub use transform::Transform;
pub use view::{Extents, Range};
