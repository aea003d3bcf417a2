//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use async_trait::async_trait;

use crate::store::{
    ItemQuery, ItemRecord, ItemStatus, ListRecord, NewItem, SortKey, StoreError, TaskStore,
};

/// A store whose every call fails with the same API error.
pub struct FailingStore {
    message: String,
}

impl FailingStore {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }

    fn error(&self) -> StoreError {
        StoreError::Api {
            status: 500,
            message: self.message.clone(),
        }
    }
}

#[async_trait]
impl TaskStore for FailingStore {
    fn name(&self) -> &str {
        "failing"
    }

    async fn list_lists(&self, _sort: SortKey) -> Result<Vec<ListRecord>, StoreError> {
        Err(self.error())
    }

    async fn create_list(&self, _title: &str) -> Result<ListRecord, StoreError> {
        Err(self.error())
    }

    async fn get_list(&self, _list_id: &str) -> Result<ListRecord, StoreError> {
        Err(self.error())
    }

    async fn delete_list(&self, _list_id: &str) -> Result<(), StoreError> {
        Err(self.error())
    }

    async fn list_items(&self, _query: &ItemQuery) -> Result<Vec<ItemRecord>, StoreError> {
        Err(self.error())
    }

    async fn create_item(&self, _list_id: &str, _item: &NewItem) -> Result<ItemRecord, StoreError> {
        Err(self.error())
    }

    async fn complete_item(&self, _list_id: &str, _item_id: &str) -> Result<ItemRecord, StoreError> {
        Err(self.error())
    }

    async fn uncomplete_item(
        &self,
        _list_id: &str,
        _item_id: &str,
    ) -> Result<ItemRecord, StoreError> {
        Err(self.error())
    }

    async fn delete_item(&self, _list_id: &str, _item_id: &str) -> Result<(), StoreError> {
        Err(self.error())
    }
}

pub fn list(id: &str, title: &str) -> ListRecord {
    ListRecord {
        id: id.to_string(),
        title: title.to_string(),
        updated: String::new(),
    }
}

/// An open task with no notes or due date.
pub fn item(id: &str, title: &str) -> ItemRecord {
    ItemRecord {
        id: id.to_string(),
        title: title.to_string(),
        notes: String::new(),
        due: None,
        status: ItemStatus::NeedsAction,
        hidden: false,
        updated: String::new(),
    }
}
