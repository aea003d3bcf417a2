//! Sort orders shared by every store implementation.
//!
//! Stores receive a `SortKey` with each listing request and apply it before
//! returning, so the engine never sorts records itself.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::types::{ItemRecord, ListRecord};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    Alphabetical,
    LastModified,
    #[serde(rename = "uncompleted-tasks")]
    UncompletedFirst,
    DueDate,
}

impl SortKey {
    pub fn name(self) -> &'static str {
        match self {
            SortKey::Alphabetical => "alphabetical",
            SortKey::LastModified => "last-modified",
            SortKey::UncompletedFirst => "uncompleted-tasks",
            SortKey::DueDate => "due-date",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sorts task lists in place.
///
/// `open_items` reports how many uncompleted tasks a list holds. Stores that
/// cannot answer cheaply pass `|_| 0`, which degrades `UncompletedFirst` to
/// alphabetical order. Lists have no due date, so `DueDate` is alphabetical too.
pub fn sort_lists<F>(lists: &mut [ListRecord], key: SortKey, open_items: F)
where
    F: Fn(&ListRecord) -> usize,
{
    match key {
        SortKey::Alphabetical | SortKey::DueDate => lists.sort_by(|a, b| a.title.cmp(&b.title)),
        SortKey::LastModified => lists.sort_by(|a, b| b.updated.cmp(&a.updated)),
        SortKey::UncompletedFirst => lists.sort_by(|a, b| {
            open_items(b)
                .cmp(&open_items(a))
                .then_with(|| a.title.cmp(&b.title))
        }),
    }
}

/// Sorts tasks in place.
pub fn sort_items(items: &mut [ItemRecord], key: SortKey) {
    match key {
        SortKey::Alphabetical => items.sort_by(|a, b| a.title.cmp(&b.title)),
        SortKey::LastModified => items.sort_by(|a, b| b.updated.cmp(&a.updated)),
        SortKey::UncompletedFirst => items.sort_by(|a, b| {
            a.status
                .is_completed()
                .cmp(&b.status.is_completed())
                .then_with(|| a.title.cmp(&b.title))
        }),
        SortKey::DueDate => items.sort_by(compare_due),
    }
}

fn parse_due(due: Option<&str>) -> Option<DateTime<FixedOffset>> {
    due.and_then(|d| DateTime::parse_from_rfc3339(d).ok())
}

// Undated (or unparseable) tasks sink to the bottom; ties fall back to title.
fn compare_due(a: &ItemRecord, b: &ItemRecord) -> Ordering {
    match (parse_due(a.due.as_deref()), parse_due(b.due.as_deref())) {
        (Some(da), Some(db)) => da.cmp(&db).then_with(|| a.title.cmp(&b.title)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.title.cmp(&b.title),
    }
}
