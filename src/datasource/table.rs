//! In-memory table source with ordered change notifications.

use crate::datasource::{DataSource, SourceEvent, SourceObserver};

/// Row-major numeric table.
///
/// Every mutation notifies the observer in source order: removals announce
/// [`SourceEvent::RowsAboutToBeRemoved`] while the rows are still readable.
/// Rows shorter than the header list are padded with `NaN`, which the engine
/// treats as a missing value.
#[derive(Debug, Clone, Default)]
pub struct TableSource {
    headers: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl TableSource {
    /// Create an empty table. The first header names the X column.
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Build a table with initial rows and no notifications.
    pub fn with_rows<I>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = Vec<f64>>,
    {
        for row in rows {
            let row = self.normalize(row);
            self.rows.push(row);
        }
        self
    }

    /// Access all rows.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Append a row at the end.
    pub fn push_row<O>(&mut self, row: Vec<f64>, observer: &mut O) -> usize
    where
        O: SourceObserver + ?Sized,
    {
        let index = self.rows.len();
        self.insert_row(index, row, observer);
        index
    }

    /// Append several rows with a single notification.
    pub fn extend_rows<I, O>(&mut self, rows: I, observer: &mut O) -> usize
    where
        I: IntoIterator<Item = Vec<f64>>,
        O: SourceObserver + ?Sized,
    {
        let first = self.rows.len();
        for row in rows {
            let row = self.normalize(row);
            self.rows.push(row);
        }
        let added = self.rows.len() - first;
        if added > 0 {
            observer.on_event(
                self,
                &SourceEvent::RowsInserted {
                    first,
                    last: first + added - 1,
                },
            );
        }
        added
    }

    /// Insert a row before `index` (clamped to the row count).
    pub fn insert_row<O>(&mut self, index: usize, row: Vec<f64>, observer: &mut O)
    where
        O: SourceObserver + ?Sized,
    {
        let index = index.min(self.rows.len());
        let row = self.normalize(row);
        self.rows.insert(index, row);
        observer.on_event(
            self,
            &SourceEvent::RowsInserted {
                first: index,
                last: index,
            },
        );
    }

    /// Remove rows `first..=last`. Out-of-range bounds are clipped; an empty
    /// selection emits nothing.
    pub fn remove_rows<O>(&mut self, first: usize, last: usize, observer: &mut O)
    where
        O: SourceObserver + ?Sized,
    {
        if first > last || first >= self.rows.len() {
            return;
        }
        let last = last.min(self.rows.len() - 1);
        observer.on_event(self, &SourceEvent::RowsAboutToBeRemoved { first, last });
        self.rows.drain(first..=last);
        observer.on_event(self, &SourceEvent::RowsRemoved { first, last });
    }

    /// Overwrite one cell. Returns `false` when the cell does not exist.
    pub fn set_value<O>(&mut self, row: usize, column: usize, value: f64, observer: &mut O) -> bool
    where
        O: SourceObserver + ?Sized,
    {
        let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(column)) else {
            return false;
        };
        *cell = value;
        observer.on_event(
            self,
            &SourceEvent::ValuesChanged {
                rows: row..=row,
                columns: column..=column,
            },
        );
        true
    }

    /// Replace every row and announce a reset.
    pub fn replace_rows<I, O>(&mut self, rows: I, observer: &mut O)
    where
        I: IntoIterator<Item = Vec<f64>>,
        O: SourceObserver + ?Sized,
    {
        self.rows.clear();
        for row in rows {
            let row = self.normalize(row);
            self.rows.push(row);
        }
        observer.on_event(self, &SourceEvent::Reset);
    }

    fn normalize(&self, mut row: Vec<f64>) -> Vec<f64> {
        row.resize(self.headers.len(), f64::NAN);
        row
    }
}

impl DataSource for TableSource {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_count(&self) -> usize {
        self.headers.len()
    }

    fn header(&self, column: usize) -> Option<String> {
        self.headers.get(column).cloned()
    }

    fn value(&self, row: usize, column: usize) -> Option<f64> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .copied()
            .filter(|value| !value.is_nan())
    }
}
