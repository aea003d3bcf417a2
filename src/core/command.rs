//! # Commands
//!
//! A `Command` describes one Task Store call. `update()` only ever *returns*
//! commands; the runtime runs them with [`execute`] on a background task and
//! feeds the resulting `Action` back into the loop.
//!
//! Every command yields exactly one action. Failures of any kind collapse into
//! `Action::OperationFailed` so the engine has a single failure path.

use std::fmt;

use log::{debug, warn};

use crate::core::action::Action;
use crate::store::{ItemQuery, NewItem, SortKey, StoreError, TaskStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    LoadLists { sort: SortKey },
    LoadItems(ItemQuery),
    CreateList { title: String },
    DeleteList { list_id: String },
    CreateItem { list_id: String, item: NewItem },
    CompleteItem { list_id: String, item_id: String },
    UncompleteItem { list_id: String, item_id: String },
    DeleteItem { list_id: String, item_id: String },
}

/// Which kind of command failed, for the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    LoadLists,
    LoadItems,
    CreateList,
    DeleteList,
    CreateItem,
    CompleteItem,
    UncompleteItem,
    DeleteItem,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Operation::LoadLists => "Loading task lists",
            Operation::LoadItems => "Loading tasks",
            Operation::CreateList => "Creating task list",
            Operation::DeleteList => "Deleting task list",
            Operation::CreateItem => "Creating task",
            Operation::CompleteItem => "Completing task",
            Operation::UncompleteItem => "Un-completing task",
            Operation::DeleteItem => "Deleting task",
        };
        f.write_str(label)
    }
}

impl Command {
    pub fn operation(&self) -> Operation {
        match self {
            Command::LoadLists { .. } => Operation::LoadLists,
            Command::LoadItems(_) => Operation::LoadItems,
            Command::CreateList { .. } => Operation::CreateList,
            Command::DeleteList { .. } => Operation::DeleteList,
            Command::CreateItem { .. } => Operation::CreateItem,
            Command::CompleteItem { .. } => Operation::CompleteItem,
            Command::UncompleteItem { .. } => Operation::UncompleteItem,
            Command::DeleteItem { .. } => Operation::DeleteItem,
        }
    }
}

/// Runs one command against the store and wraps the outcome as an `Action`.
pub async fn execute(store: &dyn TaskStore, command: Command) -> Action {
    let operation = command.operation();
    debug!("Executing {:?} against {} store", command, store.name());

    let result: Result<Action, StoreError> = match command {
        Command::LoadLists { sort } => store
            .list_lists(sort)
            .await
            .map(|lists| Action::ListsLoaded { sort, lists }),
        Command::LoadItems(query) => {
            store
                .list_items(&query)
                .await
                .map(|items| Action::ItemsLoaded {
                    list_id: query.list_id,
                    sort: query.sort,
                    items,
                })
        }
        Command::CreateList { title } => store.create_list(&title).await.map(Action::ListCreated),
        Command::DeleteList { list_id } => store
            .delete_list(&list_id)
            .await
            .map(|()| Action::ListDeleted { list_id }),
        Command::CreateItem { list_id, item } => store
            .create_item(&list_id, &item)
            .await
            .map(|item| Action::ItemCreated { list_id, item }),
        Command::CompleteItem { list_id, item_id } => store
            .complete_item(&list_id, &item_id)
            .await
            .map(|item| Action::ItemUpdated { list_id, item }),
        Command::UncompleteItem { list_id, item_id } => store
            .uncomplete_item(&list_id, &item_id)
            .await
            .map(|item| Action::ItemUpdated { list_id, item }),
        Command::DeleteItem { list_id, item_id } => store
            .delete_item(&list_id, &item_id)
            .await
            .map(|()| Action::ItemDeleted { list_id, item_id }),
    };

    result.unwrap_or_else(|e| {
        warn!("{} failed: {}", operation, e);
        Action::OperationFailed {
            operation,
            message: e.to_string(),
        }
    })
}
