//! # Memory Store
//!
//! A `TaskStore` that keeps everything in process memory, optionally mirrored
//! to a JSON file so `--offline` sessions survive restarts.
//!
//! Writes go through `.tmp` + `rename()` so a crash mid-write never leaves a
//! truncated data file behind.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::provider::{StoreError, TaskStore};
use super::sort::{SortKey, sort_items, sort_lists};
use super::types::{ItemQuery, ItemRecord, ItemStatus, ListRecord, NewItem};

#[derive(Serialize, Deserialize, Debug, Clone)]
struct Data {
    lists: BTreeMap<String, ListRecord>,
    /// list id -> task id -> task
    items: BTreeMap<String, BTreeMap<String, ItemRecord>>,
    next_id: u64,
}

impl Default for Data {
    fn default() -> Self {
        Self {
            lists: BTreeMap::new(),
            items: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl Data {
    fn new_id(&mut self) -> String {
        let id = format!("id{}", self.next_id);
        self.next_id += 1;
        id
    }

    fn item_mut(&mut self, list_id: &str, item_id: &str) -> Result<&mut ItemRecord, StoreError> {
        self.items
            .get_mut(list_id)
            .ok_or_else(|| StoreError::NotFound(format!("task list {list_id}")))?
            .get_mut(item_id)
            .ok_or_else(|| StoreError::NotFound(format!("task {item_id}")))
    }

    fn open_items(&self, list_id: &str) -> usize {
        self.items
            .get(list_id)
            .map(|items| items.values().filter(|i| !i.status.is_completed()).count())
            .unwrap_or(0)
    }
}

pub struct MemoryStore {
    data: Mutex<Data>,
    /// Where to mirror the data; `None` keeps the store transient.
    path: Option<PathBuf>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// A transient store that never touches the disk.
    pub fn new() -> Self {
        Self {
            data: Mutex::new(Data::default()),
            path: None,
        }
    }

    /// Opens (or creates) a store persisted at `path`.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let data = if path.exists() {
            let contents = fs::read_to_string(path)?;
            if contents.trim().is_empty() {
                Data::default()
            } else {
                serde_json::from_str(&contents).map_err(|e| StoreError::Parse(e.to_string()))?
            }
        } else {
            Data::default()
        };

        info!(
            "Opened offline store at {} ({} lists)",
            path.display(),
            data.lists.len()
        );

        let store = Self {
            data: Mutex::new(data),
            path: Some(path.to_path_buf()),
        };
        // Make sure the file exists from the first run on
        store.persist(&store.lock())?;
        Ok(store)
    }

    fn lock(&self) -> MutexGuard<'_, Data> {
        // Mutations only ever swap in a complete copy, so a poisoned lock
        // still guards consistent data.
        self.data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Applies `change` to a copy of the data and swaps it in only once the
    /// copy is persisted. A failed change or write leaves the store untouched.
    fn commit<R>(
        &self,
        change: impl FnOnce(&mut Data) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let mut data = self.lock();
        let mut next = data.clone();
        let out = change(&mut next)?;
        self.persist(&next)?;
        *data = next;
        Ok(out)
    }

    fn persist(&self, data: &Data) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let tmp_path = path.with_extension("tmp");
        let json =
            serde_json::to_string_pretty(data).map_err(|e| StoreError::Parse(e.to_string()))?;
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, path)?;
        debug!("Offline store persisted to {}", path.display());
        Ok(())
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[async_trait]
impl TaskStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn list_lists(&self, sort: SortKey) -> Result<Vec<ListRecord>, StoreError> {
        let data = self.lock();
        let mut lists: Vec<ListRecord> = data.lists.values().cloned().collect();
        sort_lists(&mut lists, sort, |l| data.open_items(&l.id));
        Ok(lists)
    }

    async fn create_list(&self, title: &str) -> Result<ListRecord, StoreError> {
        self.commit(|data| {
            let id = data.new_id();
            let list = ListRecord {
                id: id.clone(),
                title: title.to_string(),
                updated: now(),
            };
            data.lists.insert(id.clone(), list.clone());
            data.items.insert(id, BTreeMap::new());
            Ok(list)
        })
    }

    async fn get_list(&self, list_id: &str) -> Result<ListRecord, StoreError> {
        self.lock()
            .lists
            .get(list_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("task list {list_id}")))
    }

    async fn delete_list(&self, list_id: &str) -> Result<(), StoreError> {
        self.commit(|data| {
            if data.lists.remove(list_id).is_none() {
                return Err(StoreError::NotFound(format!("task list {list_id}")));
            }
            data.items.remove(list_id);
            Ok(())
        })
    }

    async fn list_items(&self, query: &ItemQuery) -> Result<Vec<ItemRecord>, StoreError> {
        let data = self.lock();
        let items = data
            .items
            .get(&query.list_id)
            .ok_or_else(|| StoreError::NotFound(format!("task list {}", query.list_id)))?;
        let mut items: Vec<ItemRecord> = items
            .values()
            .filter(|i| query.include_completed || !i.status.is_completed())
            .filter(|i| query.include_hidden || !i.hidden)
            .cloned()
            .collect();
        sort_items(&mut items, query.sort);
        Ok(items)
    }

    async fn create_item(&self, list_id: &str, item: &NewItem) -> Result<ItemRecord, StoreError> {
        self.commit(|data| {
            if !data.lists.contains_key(list_id) {
                return Err(StoreError::NotFound(format!("task list {list_id}")));
            }
            let id = data.new_id();
            let record = ItemRecord {
                id: id.clone(),
                title: item.title.clone(),
                notes: item.notes.clone(),
                due: item.due.clone(),
                status: ItemStatus::NeedsAction,
                hidden: false,
                updated: now(),
            };
            data.items
                .entry(list_id.to_string())
                .or_default()
                .insert(id, record.clone());
            Ok(record)
        })
    }

    async fn complete_item(
        &self,
        list_id: &str,
        item_id: &str,
    ) -> Result<ItemRecord, StoreError> {
        self.commit(|data| {
            let item = data.item_mut(list_id, item_id)?;
            item.status = ItemStatus::Completed;
            item.updated = now();
            Ok(item.clone())
        })
    }

    async fn uncomplete_item(
        &self,
        list_id: &str,
        item_id: &str,
    ) -> Result<ItemRecord, StoreError> {
        self.commit(|data| {
            let item = data.item_mut(list_id, item_id)?;
            item.status = ItemStatus::NeedsAction;
            item.updated = now();
            Ok(item.clone())
        })
    }

    async fn delete_item(&self, list_id: &str, item_id: &str) -> Result<(), StoreError> {
        self.commit(|data| {
            let removed = data
                .items
                .get_mut(list_id)
                .and_then(|items| items.remove(item_id));
            match removed {
                Some(_) => Ok(()),
                None => Err(StoreError::NotFound(format!("task {item_id}"))),
            }
        })
    }
}
