//! # Core Application Logic
//!
//! The dashboard engine. It knows nothing about terminals or HTTP.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (App)          │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • Command (store work) │
//!                    │                         │
//!                    │  No I/O in update().    │
//!                    └───────────┬─────────────┘
//!                                │
//!                ┌───────────────┴───────────────┐
//!                ▼                               ▼
//!         ┌────────────┐                  ┌────────────┐
//!         │    TUI     │                  │   Store    │
//!         │  Adapter   │                  │ (http or   │
//!         │ (ratatui)  │                  │  offline)  │
//!         └────────────┘                  └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all dashboard state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`command`]: Store commands and their executor
//! - [`selection`]: Cursor + filter over a list of records
//! - [`record`]: Accessors shared by task lists and tasks
//! - [`config`]: Layered configuration

pub mod action;
pub mod command;
pub mod config;
pub mod record;
pub mod selection;
pub mod state;
