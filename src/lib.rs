//! # todo-server
//!
//! A multi-user todo service with stateless bearer-token authentication and
//! per-resource ownership checks, built on axum and libsql.
//!
//! ## Overview
//!
//! The crate can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `todo-server` binary
//! 2. **As a library** - Mount [`api::routes::create_router`] in your own app
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use todos::{auth::jwt::TokenService, auth::password::PasswordHasher, db::TursoClient, AppState};
//! use std::sync::Arc;
//!
//! let db = Arc::new(TursoClient::new_memory().await?);
//! let tokens = Arc::new(TokenService::new(&secret, chrono::Duration::hours(24))?);
//! let state = AppState::new(db.clone(), db, tokens, PasswordHasher::default());
//! let app = todos::api::routes::create_router(state);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `turso` | Remote Turso database; local SQLite is always available |
//!
//! ## Modules
//!
//! - [`api`] - REST API handlers and routes
//! - [`auth`] - Tokens, password hashing, the request gate and ownership guard
//! - [`db`] - Repository traits and the libsql implementation
//! - [`services`] - Account and todo use cases
//! - [`types`] - Domain entities, DTOs and error handling
//! - [`utils`] - Environment configuration

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// Authentication and ownership authorization.
pub mod auth;
/// Database clients and repositories.
pub mod db;
/// Command-line interface.
pub mod cli;
/// Account and todo use cases.
pub mod services;
/// Core types (entities, requests, responses, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

// Re-export commonly used types
pub use db::TursoClient;
pub use types::{AppError, Result};
pub use utils::config::Config;

use crate::auth::jwt::TokenService;
use crate::auth::password::PasswordHasher;
use crate::db::{TodoRepository, UserRepository};
use crate::services::{AccountService, TodoService};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Token issuance and verification; also feeds the auth middleware
    pub tokens: Arc<TokenService>,
    /// Registration, login and profile use cases
    pub accounts: Arc<AccountService>,
    /// Todo use cases
    pub todos: Arc<TodoService>,
}

impl AppState {
    /// Wires the use cases over the given repositories.
    pub fn new(
        users: Arc<dyn UserRepository>,
        todos: Arc<dyn TodoRepository>,
        tokens: Arc<TokenService>,
        hasher: PasswordHasher,
    ) -> Self {
        Self {
            accounts: Arc::new(AccountService::new(users, tokens.clone(), hasher)),
            todos: Arc::new(TodoService::new(todos)),
            tokens,
        }
    }
}
