//! shelf-core - Core library for shelf
//!
//! This crate contains the shared models, local cache store, transport
//! client, and sync logic used by the CLI and the server.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod install;
pub mod models;
pub mod sync;
pub mod util;

pub use error::{Error, Result};
pub use models::{CachedScript, Script, ScriptListItem, ScriptType, SyncAction, SyncLogEntry};
