//! # Actions
//!
//! Everything that can happen in the dashboard becomes an `Action`.
//! User presses `j`? That's `Action::Key(KeyAction::MoveDown)`.
//! The store answers? That's `Action::ItemsLoaded { .. }`.
//!
//! The `update()` function takes the current state and an action, mutates the
//! state, and returns the follow-up work as a list of `Effect`s. No side
//! effects here. I/O happens in the runtime.
//!
//! ```text
//! App + Action  →  update()  →  App' + Vec<Effect>
//! ```
//!
//! ## Item pane invalidation
//!
//! Whenever the selected task list changes, the task pane is cleared and
//! marked Loading *immediately*, and the fetch for the new list is deferred
//! behind a debounce. Only the latest debounce generation may fetch, and a
//! late `ItemsLoaded` for a list that is no longer selected is dropped, so
//! the task pane can never show tasks of a list other than the selected one.

use log::{debug, info};

use crate::core::command::{Command, Operation};
use crate::core::state::{App, ItemsStatus, Modal, Pane};
use crate::store::{ItemRecord, ItemStatus, ListRecord, NewItem, SortKey};

/// Abstract key intents. The runtime's key table maps physical keys to these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    SwitchPane,
    New,
    Delete,
    Confirm,
    Cancel,
    Open,
    ToggleComplete,
    Sort,
    Filter,
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // User input
    Key(KeyAction),
    Input(char),
    Backspace,
    Resize { width: u16, height: u16 },

    // Timer
    DebounceFired(u64),

    // Store results
    ListsLoaded {
        sort: SortKey,
        lists: Vec<ListRecord>,
    },
    ItemsLoaded {
        list_id: String,
        sort: SortKey,
        items: Vec<ItemRecord>,
    },
    ListCreated(ListRecord),
    ListDeleted {
        list_id: String,
    },
    ItemCreated {
        list_id: String,
        item: ItemRecord,
    },
    ItemUpdated {
        list_id: String,
        item: ItemRecord,
    },
    ItemDeleted {
        list_id: String,
        item_id: String,
    },
    OperationFailed {
        operation: Operation,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Run a store command off the loop; its result comes back as an Action.
    Run(Command),
    /// (Re)start the navigation timer. Fires `Action::DebounceFired(generation)`.
    Debounce(u64),
    Quit,
}

/// Effects to run once at startup.
pub fn init(app: &App) -> Vec<Effect> {
    vec![Effect::Run(Command::LoadLists {
        sort: app.sort.current(),
    })]
}

pub fn update(app: &mut App, action: Action) -> Vec<Effect> {
    match action {
        Action::Key(KeyAction::Quit) => {
            info!("Quit requested");
            app.should_quit = true;
            vec![Effect::Quit]
        }
        Action::Key(key) if app.modal == Modal::Default => handle_key(app, key),
        Action::Key(key) => handle_modal_key(app, key),
        Action::Input(c) => {
            if !app.modal.accepts_text() {
                return vec![];
            }
            app.input.push(c);
            after_input_edit(app)
        }
        Action::Backspace => {
            if !app.modal.accepts_text() || app.input.pop().is_none() {
                return vec![];
            }
            after_input_edit(app)
        }
        Action::Resize { width, height } => {
            app.width = width;
            app.height = height;
            vec![]
        }

        Action::DebounceFired(generation) => {
            if app.focused != Pane::Lists || !app.debounce.fire(generation) {
                debug!("Ignoring debounce generation {}", generation);
                return vec![];
            }
            match app.lists.selected_id() {
                Some(list_id) => vec![Effect::Run(Command::LoadItems(app.item_query(list_id)))],
                None => vec![],
            }
        }

        Action::ListsLoaded { sort, lists } => {
            if sort != app.sort.current() {
                debug!("Discarding task lists sorted by {}", sort);
                return vec![];
            }
            let previous = app.lists.selected_id().map(str::to_string);
            app.lists.set_records(lists);
            if let Some(id) = app.pending_selection.take() {
                app.lists.select_id(&id);
            }
            if app.lists.selected_id() == previous.as_deref() {
                return vec![];
            }
            if app.focused == Pane::Items {
                app.focused = Pane::Lists;
            }
            selected_list_changed(app)
        }
        Action::ItemsLoaded {
            list_id,
            sort,
            items,
        } => {
            if !app.is_selected_list(&list_id) {
                debug!("Discarding stale tasks for list {}", list_id);
                return vec![];
            }
            if sort != app.sort.current() {
                debug!("Discarding tasks of list {} sorted by {}", list_id, sort);
                return vec![];
            }
            app.items.set_records(items);
            app.items_list_id = Some(list_id);
            app.items_status = ItemsStatus::Ready;
            vec![]
        }

        Action::ListCreated(list) => {
            app.status_message = String::from("Task list created");
            app.pending_selection = Some(list.id);
            vec![reload_lists(app)]
        }
        Action::ListDeleted { list_id } => {
            debug!("List {} deleted", list_id);
            app.status_message = String::from("Task list deleted");
            vec![reload_lists(app)]
        }
        Action::ItemCreated { list_id, item } => {
            debug!("Task {} created in list {}", item.id, list_id);
            app.status_message = String::from("Task created");
            refresh_items_of(app, &list_id)
        }
        Action::ItemUpdated { list_id, item } => {
            app.status_message = match item.status {
                ItemStatus::Completed => String::from("Task completed"),
                ItemStatus::NeedsAction => String::from("Task un-completed"),
            };
            if items_belong_to(app, &list_id) {
                app.items.replace(item);
            }
            refresh_items_of(app, &list_id)
        }
        Action::ItemDeleted { list_id, item_id } => {
            app.status_message = String::from("Task deleted");
            if items_belong_to(app, &list_id) {
                app.items.remove(&item_id);
            }
            refresh_items_of(app, &list_id)
        }
        Action::OperationFailed { operation, message } => {
            app.status_message = format!("{} failed: {}", operation, message);
            vec![]
        }
    }
}

/// Keys in the Default modal.
fn handle_key(app: &mut App, key: KeyAction) -> Vec<Effect> {
    match key {
        KeyAction::MoveUp | KeyAction::MoveDown => move_cursor(app, key == KeyAction::MoveDown),
        KeyAction::SwitchPane => match app.focused {
            Pane::Lists => focus_items(app),
            Pane::Items => focus_lists(app),
        },
        KeyAction::MoveRight if app.focused == Pane::Lists => focus_items(app),
        KeyAction::MoveLeft if app.focused == Pane::Items => focus_lists(app),
        KeyAction::MoveLeft | KeyAction::MoveRight => vec![],
        KeyAction::Open => match app.focused {
            Pane::Lists => focus_items(app),
            Pane::Items => {
                if let (Some(list_id), Some(item)) = (app.items_list_id.clone(), app.selected_item())
                {
                    app.modal = Modal::ViewingItemDetail {
                        list_id,
                        item_id: item.id.clone(),
                    };
                }
                vec![]
            }
        },
        KeyAction::New => {
            match app.focused {
                Pane::Lists => {
                    app.modal = Modal::CreatingList;
                    app.status_message = String::from("New task list");
                }
                Pane::Items => {
                    let Some(list_id) = app.lists.selected_id().map(str::to_string) else {
                        return vec![];
                    };
                    app.modal = Modal::CreatingItem { list_id };
                    app.status_message = String::from("New task");
                }
            }
            app.input.clear();
            vec![]
        }
        KeyAction::Delete => {
            let modal = match app.focused {
                Pane::Lists => app.selected_list().map(|l| Modal::ConfirmingListDeletion {
                    list_id: l.id.clone(),
                    title: l.title.clone(),
                }),
                Pane::Items => match (&app.items_list_id, app.selected_item()) {
                    (Some(list_id), Some(item)) => Some(Modal::ConfirmingItemDeletion {
                        list_id: list_id.clone(),
                        item_id: item.id.clone(),
                        title: item.title.clone(),
                    }),
                    _ => None,
                },
            };
            if let Some(modal) = modal {
                app.modal = modal;
            }
            vec![]
        }
        KeyAction::ToggleComplete => {
            if app.focused != Pane::Items {
                return vec![];
            }
            let (Some(list_id), Some(item)) = (app.items_list_id.clone(), app.selected_item())
            else {
                return vec![];
            };
            let item_id = item.id.clone();
            let command = if item.status.is_completed() {
                app.status_message = String::from("Un-completing task...");
                Command::UncompleteItem { list_id, item_id }
            } else {
                app.status_message = String::from("Completing task...");
                Command::CompleteItem { list_id, item_id }
            };
            vec![Effect::Run(command)]
        }
        KeyAction::Sort => {
            let key = app.sort.advance();
            app.status_message = format!("Sorted by {}", key);
            info!("Sort key is now {}", key);
            match app.focused {
                Pane::Lists => vec![reload_lists(app)],
                Pane::Items => match app.lists.selected_id() {
                    Some(list_id) => vec![Effect::Run(Command::LoadItems(app.item_query(list_id)))],
                    None => vec![],
                },
            }
        }
        KeyAction::Filter => {
            app.input = app.focused_filter().to_string();
            app.modal = Modal::Filtering;
            vec![]
        }
        KeyAction::Cancel => {
            if app.focused_filter().is_empty() {
                return vec![];
            }
            apply_filter(app, "")
        }
        // Confirm only means something inside a modal; Quit never reaches here
        KeyAction::Confirm | KeyAction::Quit => vec![],
    }
}

/// Keys while a modal is open. Everything but confirm/cancel (and leaving the
/// detail view) is swallowed.
fn handle_modal_key(app: &mut App, key: KeyAction) -> Vec<Effect> {
    match key {
        KeyAction::Cancel => {
            let was_filtering = app.modal == Modal::Filtering;
            close_modal(app);
            if was_filtering {
                return apply_filter(app, "");
            }
            vec![]
        }
        KeyAction::Confirm => confirm_modal(app),
        KeyAction::Open if matches!(app.modal, Modal::ViewingItemDetail { .. }) => {
            close_modal(app);
            vec![]
        }
        _ => vec![],
    }
}

fn confirm_modal(app: &mut App) -> Vec<Effect> {
    match app.modal.clone() {
        Modal::CreatingList => {
            let title = app.input.trim().to_string();
            if title.is_empty() {
                return vec![];
            }
            close_modal(app);
            app.status_message = String::from("Creating task list...");
            vec![Effect::Run(Command::CreateList { title })]
        }
        Modal::CreatingItem { list_id } => {
            let title = app.input.trim().to_string();
            if title.is_empty() {
                return vec![];
            }
            close_modal(app);
            app.status_message = String::from("Creating task...");
            vec![Effect::Run(Command::CreateItem {
                list_id,
                item: NewItem {
                    title,
                    ..Default::default()
                },
            })]
        }
        Modal::ConfirmingListDeletion { list_id, .. } => {
            close_modal(app);
            app.status_message = String::from("Deleting task list...");
            vec![Effect::Run(Command::DeleteList { list_id })]
        }
        Modal::ConfirmingItemDeletion {
            list_id, item_id, ..
        } => {
            close_modal(app);
            app.status_message = String::from("Deleting task...");
            vec![Effect::Run(Command::DeleteItem { list_id, item_id })]
        }
        Modal::ViewingItemDetail { .. } => {
            close_modal(app);
            vec![]
        }
        // Keep the typed filter
        Modal::Filtering => {
            close_modal(app);
            vec![]
        }
        Modal::Default => vec![],
    }
}

fn close_modal(app: &mut App) {
    app.modal = Modal::Default;
    app.input.clear();
}

fn after_input_edit(app: &mut App) -> Vec<Effect> {
    if app.modal != Modal::Filtering {
        return vec![];
    }
    let filter = app.input.clone();
    apply_filter(app, &filter)
}

/// Filters the focused pane. Narrowing the lists pane can move the selection,
/// which invalidates the task pane like any other selection change.
fn apply_filter(app: &mut App, filter: &str) -> Vec<Effect> {
    match app.focused {
        Pane::Lists => {
            let previous = app.lists.selected_id().map(str::to_string);
            app.lists.set_filter(filter);
            if app.lists.selected_id() == previous.as_deref() {
                return vec![];
            }
            selected_list_changed(app)
        }
        Pane::Items => {
            app.items.set_filter(filter);
            vec![]
        }
    }
}

fn move_cursor(app: &mut App, down: bool) -> Vec<Effect> {
    match app.focused {
        Pane::Lists => {
            let moved = if down {
                app.lists.select_next()
            } else {
                app.lists.select_previous()
            };
            if !moved {
                return vec![];
            }
            selected_list_changed(app)
        }
        Pane::Items => {
            if down {
                app.items.select_next();
            } else {
                app.items.select_previous();
            }
            vec![]
        }
    }
}

/// Clears the task pane and restarts the debounce for the new selection.
fn selected_list_changed(app: &mut App) -> Vec<Effect> {
    app.items.clear();
    app.items_list_id = None;
    if app.lists.selected().is_none() {
        app.items_status = ItemsStatus::Idle;
        app.debounce.cancel();
        return vec![];
    }
    app.items_status = ItemsStatus::Loading;
    vec![Effect::Debounce(app.debounce.reset())]
}

fn focus_items(app: &mut App) -> Vec<Effect> {
    let Some(list_id) = app.lists.selected_id().map(str::to_string) else {
        return vec![];
    };
    app.focused = Pane::Items;
    app.status_message = String::from("Tasks");
    if app.items_list_id.as_deref() != Some(list_id.as_str()) {
        app.items.clear();
        app.items_status = ItemsStatus::Loading;
    }
    app.debounce.cancel();
    vec![Effect::Run(Command::LoadItems(app.item_query(&list_id)))]
}

fn focus_lists(app: &mut App) -> Vec<Effect> {
    app.focused = Pane::Lists;
    app.status_message = String::from("Task lists");
    vec![]
}

fn reload_lists(app: &App) -> Effect {
    Effect::Run(Command::LoadLists {
        sort: app.sort.current(),
    })
}

/// Whether the loaded tasks are those of `list_id` and it is still selected.
fn items_belong_to(app: &App, list_id: &str) -> bool {
    app.is_selected_list(list_id) && app.items_list_id.as_deref() == Some(list_id)
}

fn refresh_items_of(app: &App, list_id: &str) -> Vec<Effect> {
    if !app.is_selected_list(list_id) {
        return vec![];
    }
    vec![Effect::Run(Command::LoadItems(app.item_query(list_id)))]
}
