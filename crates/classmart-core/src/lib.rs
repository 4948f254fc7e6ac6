//! Client-side optimistic synchronization engine for Classmart.
//!
//! This crate defines the "ports" (gateway and notification traits) that the
//! infrastructure layer implements, plus the two state machines built on
//! them: the autosave controller and the reorder manager. It depends only on
//! `classmart-types` -- never on `classmart-infra` or any storage crate.

pub mod autosave;
pub mod gateway;
pub mod normalize;
pub mod notify;
pub mod reorder;
