use std::fmt;

use async_trait::async_trait;

use super::sort::SortKey;
use super::types::{ItemQuery, ItemRecord, ListRecord, NewItem};

/// Errors a task store can report. The dashboard only ever shows the
/// `Display` text, so every variant carries a readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Store misconfigured (missing token, bad URL).
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// The service answered with a non-success status.
    Api { status: u16, message: String },
    /// The response body could not be decoded.
    Parse(String),
    /// A list or task id that the store does not know.
    NotFound(String),
    /// Local persistence failed.
    Io(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Config(msg) => write!(f, "config error: {msg}"),
            StoreError::Network(msg) => write!(f, "network error: {msg}"),
            StoreError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            StoreError::Parse(msg) => write!(f, "parse error: {msg}"),
            StoreError::NotFound(what) => write!(f, "not found: {what}"),
            StoreError::Io(msg) => write!(f, "storage error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e.to_string())
    }
}

/// CRUD over task lists and the tasks inside them.
///
/// Implementations are called from detached tokio tasks, possibly several at
/// once, so they must be `Send + Sync`.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Short name for logs ("http", "memory").
    fn name(&self) -> &str;

    async fn list_lists(&self, sort: SortKey) -> Result<Vec<ListRecord>, StoreError>;

    async fn create_list(&self, title: &str) -> Result<ListRecord, StoreError>;

    async fn get_list(&self, list_id: &str) -> Result<ListRecord, StoreError>;

    async fn delete_list(&self, list_id: &str) -> Result<(), StoreError>;

    async fn list_items(&self, query: &ItemQuery) -> Result<Vec<ItemRecord>, StoreError>;

    async fn create_item(&self, list_id: &str, item: &NewItem) -> Result<ItemRecord, StoreError>;

    async fn complete_item(&self, list_id: &str, item_id: &str)
    -> Result<ItemRecord, StoreError>;

    async fn uncomplete_item(
        &self,
        list_id: &str,
        item_id: &str,
    ) -> Result<ItemRecord, StoreError>;

    async fn delete_item(&self, list_id: &str, item_id: &str) -> Result<(), StoreError>;
}
