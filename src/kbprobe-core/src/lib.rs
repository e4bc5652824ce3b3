//! kbprobe Core Library
//!
//! This crate provides the store-access side of kbprobe:
//! - Connection resolution across networked and embedded deployments
//! - Idempotent collection bootstrap
//! - Read-only inspection (collection listing, record sampling)
//! - Embedded (SQLite) and networked (REST) store backends

pub mod config;
pub mod connector;
pub mod embedded;
pub mod error;
pub mod initializer;
pub mod inspect;
pub mod models;
pub mod remote;
pub mod store;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use config::Config;
pub use connector::{acquire_store, BackendOpener, Connector, StoreOpener};
pub use embedded::EmbeddedStore;
pub use error::{Error, ModeFailure, Result, StoreError, StoreResult};
pub use initializer::{ensure_collection, EnsureOutcome};
pub use models::*;
pub use remote::RemoteStore;
pub use store::{StoreHandle, VectorStore};
