//! Presentation accessors shared by both record kinds, so one selection
//! component type can hold either lists or tasks.

use crate::store::{ItemRecord, ListRecord};

pub trait Record {
    fn id(&self) -> &str;
    fn title(&self) -> &str;
    /// Secondary line shown under the title in detail views.
    fn description(&self) -> &str;

    /// Text matched by the pane filter.
    fn filter_value(&self) -> &str {
        self.title()
    }
}

impl Record for ListRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        &self.id
    }
}

impl Record for ItemRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        &self.notes
    }
}
