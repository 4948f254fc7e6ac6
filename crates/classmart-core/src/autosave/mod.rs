//! Autosave of an in-progress document.
//!
//! See [`AutosaveController`] for the trigger model.

pub mod controller;

pub use controller::AutosaveController;
