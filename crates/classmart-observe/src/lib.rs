//! Observability setup for applications embedding the Classmart sync engine.
//!
//! The engine itself only emits `tracing` events; hosts call
//! [`tracing_setup::init_tracing`] once at startup to choose pretty or JSON
//! output and whether spans go to OpenTelemetry.

pub mod tracing_setup;
