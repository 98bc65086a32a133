//! Authentication and Authorization
//!
//! This module provides the security core of the todo service: credential
//! hashing, stateless bearer tokens, the request gate that turns a token into
//! an [`Identity`](crate::types::Identity), and the ownership guard.
//!
//! # Module Structure
//!
//! - [`auth::password`](crate::auth::password) - Argon2id hashing and verification
//! - [`auth::jwt`](crate::auth::jwt) - Token issuance and verification, injectable clock
//! - [`auth::middleware`](crate::auth::middleware) - Axum gate and `AuthUser` extractor
//! - [`auth::guard`](crate::auth::guard) - Ownership allow/deny decisions
//!
//! # Security Features
//!
//! - **Password Hashing**: Argon2id with a per-hash random salt and configurable cost
//! - **Tokens**: HS256 signed, fixed lifetime, nothing stored server-side
//! - **Opaque Rejections**: clients see one "invalid or expired" answer for
//!   every bad token; the precise reason goes to the debug log
//!
//! # Usage
//!
//! ```ignore
//! use todos::auth::{jwt::TokenService, middleware::auth_middleware};
//!
//! let tokens = Arc::new(TokenService::new(&secret, Duration::hours(24))?);
//! let protected = Router::new()
//!     .route("/todos", get(list_todos))
//!     .layer(middleware::from_fn_with_state(tokens.clone(), auth_middleware));
//! ```
//!
//! # Configuration
//!
//! ```text
//! JWT_SECRET=...                # Required, use a strong random value
//! JWT_EXPIRATION_HOURS=24       # Token validity duration
//! PASSWORD_HASH_COST=2          # Argon2 iterations
//! PASSWORD_HASH_MEMORY_KIB=19456
//! ```

/// Ownership-based authorization decisions.
pub mod guard;
/// Token issuance and verification.
pub mod jwt;
/// Authentication middleware and extractors for protected routes.
pub mod middleware;
/// Password hashing and verification.
pub mod password;
