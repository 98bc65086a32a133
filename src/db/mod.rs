//! Database clients and repositories.
//!
//! This module provides the persistence layer for users and todos:
//! - **Repositories**: `UserRepository` and `TodoRepository` traits consumed by
//!   the use cases in [`services`](crate::services)
//! - **Turso/SQLite**: the libsql-backed implementation of both
//!
//! Enable remote Turso via Cargo features:
//! ```toml
//! todo-server = { version = "*", features = ["turso"] }
//! ```

// Relational database
pub mod traits;
pub mod turso;

// Re-exports
pub use traits::{DatabaseProvider, TodoRepository, UserRepository};
pub use turso::TursoClient;
