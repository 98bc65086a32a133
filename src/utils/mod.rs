//! Configuration utilities.
//!
//! Settings come from environment variables, optionally seeded from a `.env`
//! file, and are read once at startup.

/// Environment-based configuration.
pub mod config;
