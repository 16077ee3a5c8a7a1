use std::sync::{Arc, PoisonError, RwLock};

use gpui::prelude::*;
use gpui::{Window, canvas, div};

use crate::chart::{Chart, UpdateStrategy};
use crate::datasource::DataSource;
use crate::render::RenderList;

use super::paint::{hsla, paint_list, screen_rect_of};
use super::text::GpuiTextMeasurer;

/// Painted commands kept between frames before the view asks for a refresh
/// to compact them.
const MAX_LAYERED_COMMANDS: usize = 4096;

struct GraphState<S> {
    source: S,
    chart: Chart,
    painted: RenderList,
}

impl<S: DataSource> GraphState<S> {
    fn next_list(&mut self, window: &Window) -> RenderList {
        if self.painted.len() > MAX_LAYERED_COMMANDS {
            self.chart.request(UpdateStrategy::Refresh);
        }
        let measurer = GpuiTextMeasurer::new(window);
        let frame = self.chart.render(&self.source, &measurer);
        match frame.strategy {
            UpdateStrategy::None => {}
            UpdateStrategy::Append => {
                self.painted
                    .extend(frame.to_render_list(None, self.chart.theme()));
            }
            UpdateStrategy::Refresh | UpdateStrategy::Rebuild => {
                self.painted = frame.to_render_list(self.chart.grid(), self.chart.theme());
            }
        }
        self.painted.clone()
    }
}

/// A GPUI view that renders a [`Chart`] over a data source it owns.
///
/// Mutate the source through a [`GraphHandle`] so that every change reaches
/// the chart as an ordered event.
pub struct GpuiGraphView<S> {
    state: Arc<RwLock<GraphState<S>>>,
}

impl<S> Clone for GpuiGraphView<S> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<S: DataSource> GpuiGraphView<S> {
    /// Create a view. The chart is attached to `source` immediately.
    pub fn new(source: S, mut chart: Chart) -> Self {
        chart.attach_source(&source);
        Self {
            state: Arc::new(RwLock::new(GraphState {
                source,
                chart,
                painted: RenderList::new(),
            })),
        }
    }

    /// Get a handle for mutating the source and chart.
    ///
    /// This is useful for streaming updates from async tasks.
    pub fn handle(&self) -> GraphHandle<S> {
        GraphHandle {
            state: Arc::clone(&self.state),
        }
    }
}

impl<S: DataSource + Send + Sync + 'static> Render for GpuiGraphView<S> {
    fn render(&mut self, _window: &mut Window, _cx: &mut Context<Self>) -> impl IntoElement {
        let state = Arc::clone(&self.state);
        let background = {
            let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
            state.chart.theme().background
        };

        div().size_full().bg(hsla(background)).child(
            canvas(
                move |bounds, window, _| {
                    let mut state = state.write().unwrap_or_else(PoisonError::into_inner);
                    state.chart.set_canvas(screen_rect_of(bounds));
                    state.next_list(window)
                },
                move |_, list, window, cx| {
                    paint_list(&list, window, cx);
                },
            )
            .size_full(),
        )
    }
}

/// A handle for mutating the source and chart held inside a
/// [`GpuiGraphView`].
///
/// The handle clones cheaply and can be moved into async tasks.
pub struct GraphHandle<S> {
    state: Arc<RwLock<GraphState<S>>>,
}

impl<S> Clone for GraphHandle<S> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<S> GraphHandle<S> {
    /// Read the source and chart.
    pub fn read<R>(&self, f: impl FnOnce(&S, &Chart) -> R) -> R {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state.source, &state.chart)
    }

    /// Mutate the source and chart together.
    ///
    /// Pass the chart as the observer of source mutations, for example
    /// `handle.write(|table, chart| table.push_row(row, chart))`.
    pub fn write<R>(&self, f: impl FnOnce(&mut S, &mut Chart) -> R) -> R {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let GraphState { source, chart, .. } = &mut *state;
        f(source, chart)
    }
}
