//! Application use cases.
//!
//! Services sit between the HTTP handlers and the repositories. They take
//! the caller's [`Identity`](crate::types::Identity) explicitly and never
//! touch request state.

pub mod accounts;
pub mod todos;

pub use accounts::{AccountService, LoginOutcome};
pub use todos::TodoService;
