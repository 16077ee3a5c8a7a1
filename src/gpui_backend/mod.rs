//! GPUI integration for gpui_livegraph.
//!
//! This module provides a GPUI view that feeds a [`Chart`](crate::chart::Chart)
//! from a shared data source and paints its frames. Append frames are layered
//! over the previously painted commands; refreshes and rebuilds replace them.

mod paint;
mod text;
mod view;

pub use text::GpuiTextMeasurer;
pub use view::{GpuiGraphView, GraphHandle};
