//! # Application State
//!
//! Everything the dashboard knows, in one struct. No terminal types live here;
//! presentation is derived from this state by `tui::view`.
//!
//! ```text
//! App
//! ├── focused: Pane                      // which pane receives navigation
//! ├── lists: SelectionList<ListRecord>   // left pane
//! ├── items: SelectionList<ItemRecord>   // right pane
//! ├── items_list_id: Option<String>      // list the loaded items belong to
//! ├── items_status: ItemsStatus          // Idle / Loading / Ready
//! ├── modal: Modal                       // current sub-interaction
//! ├── input: String                      // text buffer for modals
//! ├── sort: SortRotation                 // head = active comparator
//! ├── debounce: Debounce                 // generation of the latest reset
//! ├── status_message: String             // bottom status line
//! └── should_quit: bool
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use crate::core::config::{DEFAULT_DETAIL_HEIGHT, DEFAULT_SORT_ORDER, ResolvedConfig};
use crate::core::record::Record;
use crate::core::selection::SelectionList;
use crate::store::{ItemQuery, ItemRecord, ListRecord, SortKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Lists,
    Items,
}

/// A sub-interaction that restricts which keys mean anything.
///
/// Deletion and detail modals capture the ids they act on when they open, so
/// results arriving in the meantime cannot change their target.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Modal {
    #[default]
    Default,
    CreatingList,
    CreatingItem {
        list_id: String,
    },
    ConfirmingListDeletion {
        list_id: String,
        title: String,
    },
    ConfirmingItemDeletion {
        list_id: String,
        item_id: String,
        title: String,
    },
    ViewingItemDetail {
        list_id: String,
        item_id: String,
    },
    /// Typing narrows the focused pane.
    Filtering,
}

impl Modal {
    /// Whether characters typed in this modal go into the input buffer.
    pub fn accepts_text(&self) -> bool {
        matches!(
            self,
            Modal::CreatingList | Modal::CreatingItem { .. } | Modal::Filtering
        )
    }

    pub fn is_confirmation(&self) -> bool {
        matches!(
            self,
            Modal::ConfirmingListDeletion { .. } | Modal::ConfirmingItemDeletion { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemsStatus {
    /// Nothing requested yet.
    Idle,
    /// Cleared for a new list selection; a fetch is pending or in flight.
    Loading,
    /// Holds the result of the latest fetch (possibly empty).
    Ready,
}

/// Fixed-size ring of sort keys. The head is the active comparator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortRotation {
    keys: Vec<SortKey>,
}

impl SortRotation {
    pub fn new(keys: Vec<SortKey>) -> Self {
        if keys.is_empty() {
            return Self::default();
        }
        Self { keys }
    }

    pub fn current(&self) -> SortKey {
        self.keys[0]
    }

    /// Left-rotates by one and returns the new head.
    pub fn advance(&mut self) -> SortKey {
        self.keys.rotate_left(1);
        self.current()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Default for SortRotation {
    fn default() -> Self {
        Self {
            keys: DEFAULT_SORT_ORDER.to_vec(),
        }
    }
}

/// Bookkeeping for the navigation debounce. The timer itself lives in the
/// runtime; the engine only tracks which reset is the latest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Debounce {
    pub generation: u64,
    /// A navigation happened since the last items fetch was issued.
    pub pending: bool,
}

impl Debounce {
    /// Starts a new debounce window and returns its generation.
    pub fn reset(&mut self) -> u64 {
        self.generation += 1;
        self.pending = true;
        self.generation
    }

    /// Consumes the pending fetch if `generation` is the latest reset.
    pub fn fire(&mut self, generation: u64) -> bool {
        if self.pending && generation == self.generation {
            self.pending = false;
            true
        } else {
            false
        }
    }

    pub fn cancel(&mut self) {
        self.pending = false;
    }
}

pub struct App {
    pub focused: Pane,
    pub lists: SelectionList<ListRecord>,
    pub items: SelectionList<ItemRecord>,
    pub items_list_id: Option<String>,
    pub items_status: ItemsStatus,
    pub modal: Modal,
    pub input: String,
    pub sort: SortRotation,
    pub debounce: Debounce,
    pub status_message: String,
    /// List id to put the cursor on when the next lists load arrives.
    pub pending_selection: Option<String>,
    pub show_completed: bool,
    pub show_hidden: bool,
    pub width: u16,
    pub height: u16,
    pub detail_height: u16,
    pub should_quit: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            focused: Pane::Lists,
            lists: SelectionList::new(),
            items: SelectionList::new(),
            items_list_id: None,
            items_status: ItemsStatus::Idle,
            modal: Modal::Default,
            input: String::new(),
            sort: SortRotation::default(),
            debounce: Debounce::default(),
            status_message: String::from("Ready"),
            pending_selection: None,
            show_completed: true,
            show_hidden: false,
            width: 80,
            height: 24,
            detail_height: DEFAULT_DETAIL_HEIGHT,
            should_quit: false,
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self {
            sort: SortRotation::new(config.sort_order.clone()),
            show_completed: config.show_completed,
            show_hidden: config.show_hidden,
            detail_height: config.detail_height,
            ..Self::new()
        }
    }

    pub fn selected_list(&self) -> Option<&ListRecord> {
        self.lists.selected()
    }

    pub fn selected_item(&self) -> Option<&ItemRecord> {
        self.items.selected()
    }

    /// Finds a loaded item by id, ignoring the pane filter.
    pub fn find_item(&self, item_id: &str) -> Option<&ItemRecord> {
        self.items.records().iter().find(|i| i.id() == item_id)
    }

    pub fn is_selected_list(&self, list_id: &str) -> bool {
        self.lists.selected_id() == Some(list_id)
    }

    pub fn item_query(&self, list_id: &str) -> ItemQuery {
        ItemQuery {
            list_id: list_id.to_string(),
            include_completed: self.show_completed,
            include_hidden: self.show_hidden,
            sort: self.sort.current(),
        }
    }

    pub fn focused_filter(&self) -> &str {
        match self.focused {
            Pane::Lists => self.lists.filter(),
            Pane::Items => self.items.filter(),
        }
    }
}
