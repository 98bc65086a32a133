//! Database abstraction traits
//!
//! This module provides the repository traits the use cases depend on and the
//! `DatabaseProvider` switch that picks a backend (in-memory SQLite,
//! file-based SQLite, remote Turso).
//!
//! # Example
//!
//! ```rust,ignore
//! use todos::db::DatabaseProvider;
//!
//! // Use in-memory database (default for development/testing)
//! let db = DatabaseProvider::Memory.create_client().await?;
//!
//! // Use file-based SQLite
//! let db = DatabaseProvider::SQLite { path: "todos.db".into() }.create_client().await?;
//! ```

use super::turso::TursoClient;
use crate::types::{Result, Todo, TodoFilter, User};
use async_trait::async_trait;

/// Database provider configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DatabaseProvider {
    /// In-memory SQLite database (ephemeral, lost on restart)
    #[default]
    Memory,
    /// File-based SQLite database
    SQLite {
        /// Path to the SQLite database file
        path: String,
    },
    /// Remote Turso database (requires network access)
    #[cfg(feature = "turso")]
    Turso {
        /// The Turso database URL (e.g., `libsql://your-db.turso.io`)
        url: String,
        /// Authentication token for the Turso database
        auth_token: String,
    },
}

impl DatabaseProvider {
    /// Create a database client from this provider configuration
    pub async fn create_client(&self) -> Result<TursoClient> {
        match self {
            DatabaseProvider::Memory => TursoClient::new_memory().await,
            DatabaseProvider::SQLite { path } => TursoClient::new_local(path).await,
            #[cfg(feature = "turso")]
            DatabaseProvider::Turso { url, auth_token } => {
                TursoClient::new_remote(url.clone(), auth_token.clone()).await
            }
        }
    }

    /// Picks a provider from a path and optional Turso credentials.
    ///
    /// Remote credentials win when the `turso` feature is enabled and both
    /// are non-empty; `:memory:` or an empty path selects the in-memory store.
    pub fn resolve(path: &str, turso: Option<(String, String)>) -> Self {
        #[cfg(feature = "turso")]
        {
            if let Some((url, auth_token)) = turso {
                if !url.is_empty() && !auth_token.is_empty() {
                    return DatabaseProvider::Turso { url, auth_token };
                }
            }
        }
        #[cfg(not(feature = "turso"))]
        let _ = turso;

        if path.is_empty() || path == ":memory:" {
            DatabaseProvider::Memory
        } else {
            DatabaseProvider::SQLite {
                path: path.to_string(),
            }
        }
    }
}

/// Where the data lives, without credentials.
impl std::fmt::Display for DatabaseProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatabaseProvider::Memory => write!(f, "sqlite (:memory:)"),
            DatabaseProvider::SQLite { path } => write!(f, "sqlite ({})", path),
            #[cfg(feature = "turso")]
            DatabaseProvider::Turso { url, .. } => write!(f, "turso ({})", url),
        }
    }
}

/// Account storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user
    async fn create_user(&self, user: &User) -> Result<()>;

    /// Get a user by ID
    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>>;

    /// Get a user by (normalized) email; the login lookup
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn exists_by_username(&self, username: &str) -> Result<bool>;

    async fn exists_by_email(&self, email: &str) -> Result<bool>;

    /// Persist profile and password changes
    async fn update_user(&self, user: &User) -> Result<()>;
}

/// Todo storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoRepository: Send + Sync {
    async fn create_todo(&self, todo: &Todo) -> Result<()>;

    /// Get a todo by primary key, regardless of owner
    async fn get_todo(&self, id: &str) -> Result<Option<Todo>>;

    /// Owner of a todo, or `None` if it does not exist
    async fn fetch_owner(&self, id: &str) -> Result<Option<String>> {
        Ok(self.get_todo(id).await?.map(|todo| todo.user_id))
    }

    /// One page of the filtered todos, newest first
    async fn list_todos(&self, filter: &TodoFilter) -> Result<Vec<Todo>>;

    /// Number of todos matching the filter, ignoring pagination
    async fn count_todos(&self, filter: &TodoFilter) -> Result<i64>;

    async fn update_todo(&self, todo: &Todo) -> Result<()>;

    async fn delete_todo(&self, id: &str) -> Result<()>;
}
