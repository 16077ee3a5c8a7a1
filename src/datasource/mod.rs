//! Data source contract and change notifications.
//!
//! The engine never owns sample data. It reads a row/column oriented
//! [`DataSource`] where column [`X_COLUMN`] holds the shared X value and every
//! other column may feed one series. Sources report mutations as ordered
//! [`SourceEvent`]s to a [`SourceObserver`].

mod table;

pub use table::TableSource;

use std::ops::RangeInclusive;

/// Column reserved for the shared X value.
pub const X_COLUMN: usize = 0;

/// Tabular data provider read by the engine.
pub trait DataSource {
    /// Number of rows currently held.
    fn row_count(&self) -> usize;

    /// Number of columns, including the X column.
    fn column_count(&self) -> usize;

    /// Header text for a column, if the column exists and is named.
    fn header(&self, column: usize) -> Option<String>;

    /// Value at `(row, column)`, or `None` when absent or not numeric.
    fn value(&self, row: usize, column: usize) -> Option<f64>;

    /// Shared X value for a row.
    fn x(&self, row: usize) -> Option<f64> {
        self.value(row, X_COLUMN)
    }
}

/// A mutation reported by a data source.
///
/// Row and column bounds are inclusive, matching the range passed by the
/// source at notification time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceEvent {
    /// The whole source was replaced.
    Reset,
    /// Rows `first..=last` were inserted; values are readable.
    RowsInserted {
        /// First inserted row.
        first: usize,
        /// Last inserted row.
        last: usize,
    },
    /// Rows `first..=last` are about to go away; values are still readable.
    RowsAboutToBeRemoved {
        /// First row to remove.
        first: usize,
        /// Last row to remove.
        last: usize,
    },
    /// Rows `first..=last` were removed.
    RowsRemoved {
        /// First removed row.
        first: usize,
        /// Last removed row.
        last: usize,
    },
    /// Values inside the given block changed in place.
    ValuesChanged {
        /// Changed rows.
        rows: RangeInclusive<usize>,
        /// Changed columns.
        columns: RangeInclusive<usize>,
    },
}

impl SourceEvent {
    /// Number of rows covered by an insert or removal event.
    pub fn row_span(&self) -> usize {
        match self {
            Self::RowsInserted { first, last }
            | Self::RowsAboutToBeRemoved { first, last }
            | Self::RowsRemoved { first, last } => last.saturating_sub(*first) + 1,
            Self::ValuesChanged { rows, .. } => rows.end().saturating_sub(*rows.start()) + 1,
            Self::Reset => 0,
        }
    }
}

/// Receiver of source notifications.
///
/// Events must be delivered in the order they happen at the source, each one
/// fully handled before the next.
pub trait SourceObserver {
    /// Handle one event. `source` reflects the state right after (or, for
    /// [`SourceEvent::RowsAboutToBeRemoved`], right before) the mutation.
    fn on_event(&mut self, source: &dyn DataSource, event: &SourceEvent);
}

impl SourceObserver for Vec<SourceEvent> {
    fn on_event(&mut self, _source: &dyn DataSource, event: &SourceEvent) {
        self.push(event.clone());
    }
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl SourceObserver for NullObserver {
    fn on_event(&mut self, _source: &dyn DataSource, _event: &SourceEvent) {}
}
