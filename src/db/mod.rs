//! Database layer
//!
//! SQLite connection pooling, embedded migrations and the typed
//! repositories (persistence stores).
//!
//! Repository methods take an explicit `&mut SqliteConnection` executor, so
//! a service-level transaction can span several stores: the service begins
//! the transaction, threads the connection through every store call, and
//! commits only if all of them succeed. Dropping the transaction rolls back.

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_test_pool};
