//! Report-Media - Report-scoped photo store
//!
//! This library crate exposes the store, configuration and HTTP server for
//! the binary and for integration testing.

pub mod config;
pub mod media;
pub mod server;
