//! # Selection List
//!
//! An ordered, navigable, filterable collection of records with its own
//! cursor. The dashboard owns two of these (task lists and tasks).
//!
//! The cursor indexes the *visible* (filtered) records. Replacing the records
//! clamps the cursor to the new bounds; nothing else about the old position is
//! preserved.

use std::ops::Range;

use super::record::Record;

pub struct SelectionList<T> {
    records: Vec<T>,
    /// Indices into `records` that pass the filter, in record order.
    visible: Vec<usize>,
    cursor: usize,
    filter: String,
}

impl<T: Record> Default for SelectionList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> SelectionList<T> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            visible: Vec::new(),
            cursor: 0,
            filter: String::new(),
        }
    }

    pub fn set_records(&mut self, records: Vec<T>) {
        self.records = records;
        self.refresh_visible();
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.visible.clear();
        self.cursor = 0;
    }

    /// All records, ignoring the filter.
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Number of visible records.
    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected(&self) -> Option<&T> {
        self.visible
            .get(self.cursor)
            .and_then(|&i| self.records.get(i))
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected().map(Record::id)
    }

    /// Moves the cursor down one row. Returns whether it moved.
    pub fn select_next(&mut self) -> bool {
        if self.cursor + 1 < self.visible.len() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    /// Moves the cursor up one row. Returns whether it moved.
    pub fn select_previous(&mut self) -> bool {
        if self.cursor > 0 && !self.visible.is_empty() {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    /// Puts the cursor on the visible record with `id`, if there is one.
    pub fn select_id(&mut self, id: &str) -> bool {
        match self.position_of(id) {
            Some(pos) => {
                self.cursor = pos;
                true
            }
            None => false,
        }
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Narrows the visible records to those whose filter value contains
    /// `filter` (case-insensitive). Keeps the selected record under the
    /// cursor when it survives the filter.
    pub fn set_filter(&mut self, filter: &str) {
        if self.filter == filter {
            return;
        }
        let previous = self.selected_id().map(str::to_string);
        self.filter = filter.to_string();
        self.refresh_visible();
        if let Some(id) = previous {
            self.select_id(&id);
        }
    }

    /// Swaps in a new version of an existing record (matched by id).
    pub fn replace(&mut self, record: T) -> bool {
        match self.records.iter().position(|r| r.id() == record.id()) {
            Some(i) => {
                self.records[i] = record;
                self.refresh_visible();
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id() != id);
        let removed = self.records.len() != before;
        if removed {
            self.refresh_visible();
        }
        removed
    }

    pub fn iter_visible(&self) -> impl Iterator<Item = &T> {
        self.visible.iter().filter_map(|&i| self.records.get(i))
    }

    /// Rows to draw in a viewport `height` rows tall so the cursor stays
    /// on screen. Derived from the cursor alone; no scroll state is kept.
    pub fn window(&self, height: usize) -> Range<usize> {
        if height == 0 {
            return 0..0;
        }
        let start = (self.cursor + 1).saturating_sub(height);
        start..(start + height).min(self.visible.len())
    }

    fn position_of(&self, id: &str) -> Option<usize> {
        self.visible
            .iter()
            .position(|&i| self.records.get(i).is_some_and(|r| r.id() == id))
    }

    fn refresh_visible(&mut self) {
        let needle = self.filter.to_lowercase();
        self.visible = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| needle.is_empty() || r.filter_value().to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect();
        self.cursor = self.cursor.min(self.visible.len().saturating_sub(1));
    }
}
