//! Module containing concrete implementations from the [core](crate::core) module.

/// Access token authentication middleware.
pub mod auth;

/// Repository implementations.
pub mod repo;

/// Application state configuration.
pub mod state;

/// HTTP server implementation.
pub mod server;
