//! HTTP API Handlers and Routes
//!
//! This module provides the REST API layer, built on the Axum web framework.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and router configuration
//! - [`api::validation`](crate::api::validation) - Request body checks
//!
//! # API Endpoints
//!
//! ## Authentication (`/api/auth`)
//! - `POST /api/auth/register` - Register new user
//! - `POST /api/auth/login` - Login and receive a bearer token
//!
//! ## Profile (`/api/users/me`)
//! - `GET /api/users/me` - Current user
//! - `PUT /api/users/me` - Update username and email
//! - `PUT /api/users/me/password` - Change password
//!
//! ## Todos (`/api/todos`)
//! - `POST /api/todos` - Create a todo
//! - `GET /api/todos` - List own todos (`completed`, `search`, `page`, `page_size`)
//! - `GET /api/todos/{id}` - Get a todo
//! - `PUT /api/todos/{id}` - Update a todo
//! - `PATCH /api/todos/{id}/complete` - Mark a todo completed
//! - `DELETE /api/todos/{id}` - Delete a todo
//!
//! ## Service
//! - `GET /` - Name and version
//! - `GET /health` - Health check endpoint
//! - `GET /api-docs/openapi.json` - OpenAPI document
//!
//! # Authentication
//!
//! Profile and todo endpoints require a valid token in the `Authorization` header:
//! ```text
//! Authorization: Bearer <token>
//! ```
//!
//! A todo owned by someone else answers `403`; a todo that does not exist
//! answers `404`.

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;
/// Input validation helpers.
pub mod validation;
