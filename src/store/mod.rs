//! # Task Store
//!
//! The collaborator the dashboard reads from and writes to. The engine never
//! calls it directly: commands produced by `core::action::update` are run
//! against a `TaskStore` by `core::command::execute`.
//!
//! - [`HttpStore`]: the hosted Tasks REST API
//! - [`MemoryStore`]: in-process store, optionally persisted to disk (`--offline`)

pub mod http;
pub mod memory;
pub mod provider;
pub mod sort;
pub mod types;

pub use http::HttpStore;
pub use memory::MemoryStore;
pub use provider::{StoreError, TaskStore};
pub use sort::SortKey;
pub use types::{ItemQuery, ItemRecord, ItemStatus, ListRecord, NewItem};
