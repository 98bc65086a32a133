//! API request handlers.
//!
//! This module contains all HTTP request handlers organized by functionality.

/// Authentication handlers (register, login).
pub mod auth;
/// Service banner and liveness.
pub mod health;
/// Todo CRUD handlers.
pub mod todos;
/// Profile handlers for the authenticated caller.
pub mod users;
