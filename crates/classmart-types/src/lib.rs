//! Shared domain types for the Classmart sync engine.
//!
//! This crate contains the plain data used across the workspace: autosave
//! documents and status, ordered items and reorder batches, notifications,
//! normalized commerce records, configuration, and their error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod commerce;
pub mod config;
pub mod document;
pub mod error;
pub mod notification;
pub mod ordering;
