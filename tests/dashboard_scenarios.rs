//! End-to-end dashboard flows: the engine driven by key presses, with every
//! command executed against a real in-memory store. Debounce timers fire
//! immediately.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use gtasks::core::action::{Action, Effect, KeyAction, init, update};
use gtasks::core::command::{self, Command};
use gtasks::core::state::{App, ItemsStatus, Pane};
use gtasks::store::{
    ItemQuery, ItemRecord, ItemStatus, ListRecord, MemoryStore, NewItem, SortKey, StoreError,
    TaskStore,
};
use gtasks::tui::view::render;
use tokio_test::assert_ok;

// ============================================================================
// Harness
// ============================================================================

struct Dashboard {
    app: App,
    store: Arc<dyn TaskStore>,
}

impl Dashboard {
    async fn start(store: Arc<dyn TaskStore>) -> Self {
        let mut dashboard = Self {
            app: App::new(),
            store,
        };
        let effects = init(&dashboard.app);
        dashboard.settle(effects).await;
        dashboard
    }

    /// Runs effects (and everything they lead to) until nothing is left.
    async fn settle(&mut self, effects: Vec<Effect>) {
        let mut queue: VecDeque<Effect> = effects.into();
        while let Some(effect) = queue.pop_front() {
            let follow_up = match effect {
                Effect::Run(command) => {
                    let action = command::execute(self.store.as_ref(), command).await;
                    update(&mut self.app, action)
                }
                Effect::Debounce(generation) => {
                    update(&mut self.app, Action::DebounceFired(generation))
                }
                Effect::Quit => vec![],
            };
            queue.extend(follow_up);
        }
    }

    async fn press(&mut self, key: KeyAction) {
        let effects = update(&mut self.app, Action::Key(key));
        self.settle(effects).await;
    }

    async fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            let effects = update(&mut self.app, Action::Input(c));
            self.settle(effects).await;
        }
    }

    fn list_titles(&self) -> Vec<String> {
        self.app
            .lists
            .iter_visible()
            .map(|l| l.title.clone())
            .collect()
    }
}

async fn seeded_store(lists: &[(&str, &[&str])]) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    for (title, items) in lists {
        let list = store.create_list(title).await.unwrap();
        for item in *items {
            store
                .create_item(
                    &list.id,
                    &NewItem {
                        title: item.to_string(),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
        }
    }
    store
}

/// Delegates to a memory store but refuses to delete lists.
struct NoDeleteStore {
    inner: MemoryStore,
}

#[async_trait]
impl TaskStore for NoDeleteStore {
    fn name(&self) -> &str {
        "no-delete"
    }

    async fn list_lists(&self, sort: SortKey) -> Result<Vec<ListRecord>, StoreError> {
        self.inner.list_lists(sort).await
    }

    async fn create_list(&self, title: &str) -> Result<ListRecord, StoreError> {
        self.inner.create_list(title).await
    }

    async fn get_list(&self, list_id: &str) -> Result<ListRecord, StoreError> {
        self.inner.get_list(list_id).await
    }

    async fn delete_list(&self, _list_id: &str) -> Result<(), StoreError> {
        Err(StoreError::Api {
            status: 503,
            message: "service unavailable".to_string(),
        })
    }

    async fn list_items(&self, query: &ItemQuery) -> Result<Vec<ItemRecord>, StoreError> {
        self.inner.list_items(query).await
    }

    async fn create_item(&self, list_id: &str, item: &NewItem) -> Result<ItemRecord, StoreError> {
        self.inner.create_item(list_id, item).await
    }

    async fn complete_item(&self, list_id: &str, item_id: &str) -> Result<ItemRecord, StoreError> {
        self.inner.complete_item(list_id, item_id).await
    }

    async fn uncomplete_item(
        &self,
        list_id: &str,
        item_id: &str,
    ) -> Result<ItemRecord, StoreError> {
        self.inner.uncomplete_item(list_id, item_id).await
    }

    async fn delete_item(&self, list_id: &str, item_id: &str) -> Result<(), StoreError> {
        self.inner.delete_item(list_id, item_id).await
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn test_startup_loads_lists_then_items_of_first_list() {
    let store = seeded_store(&[("Alpha", &["Milk", "Eggs"]), ("Beta", &[])]).await;
    let dashboard = Dashboard::start(store).await;

    assert_eq!(dashboard.list_titles(), vec!["Alpha", "Beta"]);
    assert_eq!(dashboard.app.items_status, ItemsStatus::Ready);
    let items: Vec<&str> = dashboard
        .app
        .items
        .iter_visible()
        .map(|i| i.title.as_str())
        .collect();
    assert_eq!(items, vec!["Eggs", "Milk"]);
}

#[tokio::test]
async fn test_create_list_then_it_is_selected() {
    let store = seeded_store(&[("Alpha", &["Milk"]), ("Beta", &[])]).await;
    let mut dashboard = Dashboard::start(store.clone()).await;

    dashboard.press(KeyAction::New).await;
    dashboard.type_text("Zeta").await;
    dashboard.press(KeyAction::Confirm).await;

    let selected = dashboard.app.selected_list().map(|l| l.title.clone());
    assert_eq!(selected.as_deref(), Some("Zeta"));
    assert_eq!(dashboard.app.items_status, ItemsStatus::Ready);
    assert!(dashboard.app.items.is_empty());
    assert!(render(&dashboard.app).contains("Empty task list"));

    let stored = assert_ok!(store.list_lists(SortKey::Alphabetical).await);
    assert_eq!(stored.len(), 3);
}

#[tokio::test]
async fn test_toggle_twice_restores_status() {
    let store = seeded_store(&[("Alpha", &["Milk"])]).await;
    let mut dashboard = Dashboard::start(store.clone()).await;

    dashboard.press(KeyAction::SwitchPane).await;
    assert_eq!(dashboard.app.focused, Pane::Items);

    dashboard.press(KeyAction::ToggleComplete).await;
    assert_eq!(
        dashboard.app.selected_item().map(|i| i.status),
        Some(ItemStatus::Completed)
    );
    assert_eq!(dashboard.app.status_message, "Task completed");

    dashboard.press(KeyAction::ToggleComplete).await;
    assert_eq!(
        dashboard.app.selected_item().map(|i| i.status),
        Some(ItemStatus::NeedsAction)
    );

    let list_id = dashboard.app.lists.selected_id().unwrap().to_string();
    let stored = assert_ok!(
        store
            .list_items(&dashboard.app.item_query(&list_id))
            .await
    );
    assert_eq!(stored[0].status, ItemStatus::NeedsAction);
}

#[tokio::test]
async fn test_failed_delete_keeps_list() {
    let inner = MemoryStore::new();
    inner.create_list("Alpha").await.unwrap();
    inner.create_list("Beta").await.unwrap();
    let mut dashboard = Dashboard::start(Arc::new(NoDeleteStore { inner })).await;

    dashboard.press(KeyAction::Delete).await;
    dashboard.press(KeyAction::Confirm).await;

    assert_eq!(dashboard.list_titles(), vec!["Alpha", "Beta"]);
    assert_eq!(
        dashboard.app.selected_list().map(|l| l.title.as_str()),
        Some("Alpha")
    );
    assert_eq!(
        dashboard.app.status_message,
        "Deleting task list failed: API error (HTTP 503): service unavailable"
    );
}

#[tokio::test]
async fn test_delete_list_reselects_remaining() {
    let store = seeded_store(&[("Alpha", &["Milk"]), ("Beta", &["Report"])]).await;
    let mut dashboard = Dashboard::start(store).await;

    dashboard.press(KeyAction::Delete).await;
    dashboard.press(KeyAction::Confirm).await;

    assert_eq!(dashboard.list_titles(), vec!["Beta"]);
    assert_eq!(dashboard.app.status_message, "Task list deleted");
    let items: Vec<&str> = dashboard
        .app
        .items
        .iter_visible()
        .map(|i| i.title.as_str())
        .collect();
    assert_eq!(items, vec!["Report"]);
}

#[tokio::test]
async fn test_sort_rotation_restores_initial_order() {
    let store = seeded_store(&[("Charlie", &[]), ("Alpha", &["x"]), ("Bravo", &[])]).await;
    let mut dashboard = Dashboard::start(store).await;
    let initial = dashboard.list_titles();
    assert_eq!(initial, vec!["Alpha", "Bravo", "Charlie"]);

    dashboard.press(KeyAction::Sort).await;
    assert_eq!(dashboard.app.status_message, "Sorted by last-modified");

    // Lists with open tasks come first
    dashboard.press(KeyAction::Sort).await;
    assert_eq!(dashboard.list_titles()[0], "Alpha");

    dashboard.press(KeyAction::Sort).await;
    assert_eq!(dashboard.list_titles(), initial);
}

#[tokio::test]
async fn test_late_items_for_previous_list_never_show() {
    let store = seeded_store(&[("Alpha", &["Milk"]), ("Beta", &["Report"])]).await;
    let mut dashboard = Dashboard::start(store).await;

    let alpha_id = dashboard.app.lists.selected_id().unwrap().to_string();
    let stale_fetch = Command::LoadItems(dashboard.app.item_query(&alpha_id));

    // Navigate, but hold the debounce so the Beta fetch has not happened yet
    let pending = update(&mut dashboard.app, Action::Key(KeyAction::MoveDown));
    assert!(dashboard.app.items.is_empty());

    let late = command::execute(dashboard.store.as_ref(), stale_fetch).await;
    assert!(update(&mut dashboard.app, late).is_empty());
    assert!(dashboard.app.items.is_empty());
    assert_eq!(dashboard.app.items_status, ItemsStatus::Loading);

    dashboard.settle(pending).await;
    let items: Vec<&str> = dashboard
        .app
        .items
        .iter_visible()
        .map(|i| i.title.as_str())
        .collect();
    assert_eq!(items, vec!["Report"]);
}

#[tokio::test]
async fn test_filter_narrows_lists_and_loads_match() {
    let store = seeded_store(&[("Alpha", &["Milk"]), ("Beta", &["Report"])]).await;
    let mut dashboard = Dashboard::start(store).await;

    dashboard.press(KeyAction::Filter).await;
    dashboard.type_text("bet").await;
    dashboard.press(KeyAction::Confirm).await;

    assert_eq!(dashboard.list_titles(), vec!["Beta"]);
    assert_eq!(
        dashboard
            .app
            .selected_item()
            .map(|i| i.title.as_str()),
        Some("Report")
    );
}
