//! Infrastructure layer for Classmart.
//!
//! Contains implementations of the ports defined in `classmart-core`: an
//! in-memory persistence gateway, a tracing-backed notifier, and the
//! `sync.toml` configuration loader.

pub mod config;
pub mod memory_store;
pub mod notify;
