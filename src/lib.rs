//! Bookshelf book lending server
//!
//! User registration and login plus a de-duplicated book catalog, served
//! over a REST JSON API. State lives behind the [`storage::Storage`] trait,
//! backed by PostgreSQL or, when the database is unreachable, by memory.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;

pub use crate::config::AppConfig;
pub use crate::error::{AppError, AppResult};

use crate::storage::{BackendKind, Storage};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub backend: BackendKind,
}
