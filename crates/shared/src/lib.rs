//! Shared library for the anime catalog client.
//!
//! This crate provides common functionality used by the client binary:
//! - Configuration management
//! - Logging infrastructure
//! - Anime data models
//! - Key-value persistence (SQLite and in-memory)
//! - The favorites/recents library

pub mod config;
pub mod db;
pub mod library;
pub mod logging;
pub mod models;
pub mod store;

// Re-export commonly used types
pub use config::Config;
pub use db::SqliteStore;
pub use library::AnimeLibrary;
pub use logging::LogConfig;
pub use models::*;
pub use store::{KeyValueStore, MemoryStore};

/// Common result type using anyhow::Error
pub type Result<T> = anyhow::Result<T>;
