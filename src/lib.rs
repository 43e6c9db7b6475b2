//! SQLite-backed customer store.
//!
//! # Intention
//!
//! - Keep a single `customers` table in a local SQLite file, keyed by CPF.
//! - Expose the connection lifecycle (`connect`/`disconnect`) and the
//!   insert, lookup and delete operations on [`CustomerStore`].
//! - Report every condition as a typed result, while still printing a
//!   console line and emitting a log event for each operation.
//!
//! # Architectural Boundaries
//!
//! - One table, one connection per store, no pooling or migrations.
//! - The store is constructed explicitly and passed to callers; there is
//!   no process-wide instance.

pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod schema;
pub mod store;

pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use logging::LogConfig;
pub use model::{Customer, DeleteOutcome, InsertOutcome};
pub use store::CustomerStore;
