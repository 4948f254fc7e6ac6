//! Optimistic reordering of ordered collections.
//!
//! `ordering` holds the pure list arithmetic (splice, reindex, normalize);
//! `manager` drives the per-gesture state machine on top of a
//! `PositionGateway`.

pub mod manager;
pub mod ordering;

pub use manager::{ReorderManager, ReorderOutcome, ReorderTicket};
